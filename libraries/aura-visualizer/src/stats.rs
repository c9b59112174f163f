//! Frame statistics

use serde::{Deserialize, Serialize};

/// Statistics for one rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameStats {
    /// Frames per second from the gap to the previous frame (0 on the first)
    pub fps: f32,
    /// Live particles
    pub particle_count: usize,
    /// Mean snapshot level (0.0 - 1.0)
    pub audio_level: f32,
}

/// Derives frame rate from consecutive frame timestamps
#[derive(Debug, Clone, Default)]
pub struct StatsTracker {
    last_timestamp_ms: Option<f64>,
}

impl StatsTracker {
    /// Create a tracker with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `timestamp_ms`
    pub fn record(&mut self, timestamp_ms: f64, particle_count: usize, audio_level: f32) -> FrameStats {
        let fps = match self.last_timestamp_ms {
            Some(last) if timestamp_ms > last => (1000.0 / (timestamp_ms - last)) as f32,
            _ => 0.0,
        };
        self.last_timestamp_ms = Some(timestamp_ms);

        FrameStats {
            fps,
            particle_count,
            audio_level,
        }
    }

    /// Forget the previous timestamp (after the loop was stopped)
    pub fn reset(&mut self) {
        self.last_timestamp_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_from_frame_gap() {
        let mut tracker = StatsTracker::new();
        assert_eq!(tracker.record(1000.0, 50, 0.5).fps, 0.0);

        let stats = tracker.record(1020.0, 50, 0.5);
        assert_eq!(stats.fps, 50.0);
        assert_eq!(stats.particle_count, 50);
    }

    #[test]
    fn non_increasing_timestamps_report_zero() {
        let mut tracker = StatsTracker::new();
        tracker.record(500.0, 1, 0.0);
        assert_eq!(tracker.record(500.0, 1, 0.0).fps, 0.0);

        tracker.reset();
        assert_eq!(tracker.record(600.0, 1, 0.0).fps, 0.0);
    }
}
