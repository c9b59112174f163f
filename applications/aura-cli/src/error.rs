/// CLI error types
use aura_core::CoreError;
use thiserror::Error;

/// Result alias for the CLI library
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors raised before the frame loop starts
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Nothing to play
    #[error("No tracks to play (pass track paths/URLs or set playback.tracks)")]
    NoTracks,

    /// A file was offered that is not audio
    #[error("Please select an audio file: {0}")]
    NotAudio(String),

    /// Platform collaborator failure
    #[error(transparent)]
    Core(#[from] CoreError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
