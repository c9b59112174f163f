//! Error types for the animator

use thiserror::Error;

/// Visualizer errors
///
/// Host errors never stop the frame loop: the animator logs them and skips
/// the frame.
#[derive(Debug, Error)]
pub enum VisualizerError {
    /// The particle host has no live particle set yet
    #[error("Particle host is not initialized")]
    NotInitialized,

    /// The particle host failed for another reason
    #[error("Particle host error: {0}")]
    Host(String),

    /// Reaction gains outside their usable range
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),
}

impl VisualizerError {
    /// Create a host error for [`ParticleHost`](crate::ParticleHost)
    /// implementations outside this crate
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }
}

/// Result type for visualizer operations
pub type Result<T> = std::result::Result<T, VisualizerError>;
