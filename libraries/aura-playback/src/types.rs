//! Core types for playback management

use serde::{Deserialize, Serialize};

/// Playback state
///
/// Exactly one variant holds at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing is playing; timestamps are zero
    #[default]
    Stopped,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

/// Audio-clock timestamps for the current play segment
///
/// `start_time` is the clock time that corresponds to position 0 of the
/// track while playing; `paused_at` is the clock time at the moment of
/// pausing. Resuming starts at `paused_at - start_time`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Timing {
    /// Clock time of track position 0 for the current segment (seconds)
    pub start_time: f64,

    /// Clock time when playback was paused (seconds)
    pub paused_at: f64,
}

impl Timing {
    /// Offset into the track at which a paused segment resumes
    pub fn resume_offset(&self) -> f64 {
        (self.paused_at - self.start_time).max(0.0)
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Storage key the volume is persisted under (default: `audioVolume`)
    pub volume_key: String,

    /// Volume used when nothing is persisted (0.0 - 1.0, default: 1.0)
    pub default_volume: f32,

    /// Initial loop flag (default: false)
    pub looping: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume_key: "audioVolume".to_string(),
            default_volume: 1.0,
            looping: false,
        }
    }
}
