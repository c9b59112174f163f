//! Playback Events
//!
//! Event-based communication with the UI. The controller queues events as
//! transport methods run; the UI drains them once per frame. Load failures
//! travel this way instead of as errors, so they can be shown as a
//! transient notice.

use crate::types::PlaybackState;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A track finished loading and is now the active buffer
    TrackLoaded {
        /// Playlist index, or `None` for an uploaded file
        index: Option<usize>,
        /// Display name
        name: String,
        /// Decoded duration in seconds
        duration_secs: f64,
    },

    /// Loading a track failed (network, HTTP status or decode)
    LoadFailed {
        /// Display name of the track that failed
        name: String,
        /// Human-readable reason
        message: String,
    },

    /// Starting audio failed (device suspended and resume denied, or the
    /// source could not be started)
    PlaybackFailed {
        /// Human-readable reason
        message: String,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume (0.0 - 1.0)
        volume: f32,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Loop flag changed
    LoopChanged {
        /// New loop flag
        looping: bool,
    },
}

impl PlaybackEvent {
    /// Text for a transient user-visible notice, if this event warrants one
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::LoadFailed { name, message } => {
                Some(format!("Could not load {}: {}", name, message))
            }
            Self::PlaybackFailed { message } => Some(format!("Playback failed: {}", message)),
            _ => None,
        }
    }
}
