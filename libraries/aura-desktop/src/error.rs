/// Desktop backend errors
use aura_core::CoreError;
use thiserror::Error;

/// Result type for desktop backend operations
pub type Result<T> = std::result::Result<T, DesktopError>;

/// Errors raised while opening or driving the native audio device
#[derive(Debug, Error)]
pub enum DesktopError {
    /// No default output device
    #[error("Audio device not found")]
    DeviceNotFound,

    /// The device rejected its default configuration
    #[error("Device error: {0}")]
    DeviceError(String),

    /// Failed to build output stream
    #[error("Failed to build output stream: {0}")]
    StreamBuildError(String),

    /// Failed to start the output stream
    #[error("Failed to play stream: {0}")]
    PlayError(String),

    /// The audio thread is gone
    #[error("Audio thread disconnected")]
    Disconnected,
}

impl From<cpal::BuildStreamError> for DesktopError {
    fn from(err: cpal::BuildStreamError) -> Self {
        DesktopError::StreamBuildError(err.to_string())
    }
}

impl From<cpal::PlayStreamError> for DesktopError {
    fn from(err: cpal::PlayStreamError) -> Self {
        DesktopError::PlayError(err.to_string())
    }
}

impl From<cpal::DefaultStreamConfigError> for DesktopError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        DesktopError::DeviceError(err.to_string())
    }
}

impl From<DesktopError> for CoreError {
    fn from(err: DesktopError) -> Self {
        CoreError::device(err.to_string())
    }
}
