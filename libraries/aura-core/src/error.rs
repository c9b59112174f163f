/// Core error types for Aura Visualizer
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type shared by every collaborator
#[derive(Error, Debug)]
pub enum CoreError {
    /// Transport-level fetch failure (DNS, connection reset, ...)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Server answered with a non-2xx status
    #[error("HTTP error! status: {status}")]
    Http {
        /// Response status code
        status: u16,
    },

    /// Encoded bytes could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Audio device refused an operation (e.g. resume was denied)
    #[error("Audio device error: {0}")]
    Device(String),

    /// Key-value storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a device error
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error came from loading a track (network or decode)
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::Fetch(_) | Self::Http { .. } | Self::Decode(_) | Self::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_message_carries_status() {
        let err = CoreError::Http { status: 404 };
        assert_eq!(err.to_string(), "HTTP error! status: 404");
        assert!(err.is_load_error());
    }

    #[test]
    fn device_error_is_not_a_load_error() {
        assert!(!CoreError::device("resume denied").is_load_error());
    }
}
