//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// Transport methods never return these to the caller; they are logged and
/// surfaced as [`crate::PlaybackEvent`]s. They stay typed so that internal
/// helpers can use `?`.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No decoded buffer is loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Playlist is empty
    #[error("Playlist is empty")]
    PlaylistEmpty,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Collaborator failure (fetch, decode, device, storage)
    #[error(transparent)]
    Core(#[from] aura_core::CoreError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
