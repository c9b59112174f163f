//! Audio controls: volume, mute and loop
//!
//! Volume is a linear gain in 0.0-1.0 written straight to the gain node.
//! Muting zeroes the volume and remembers the previous value so unmuting can
//! restore it exactly.

use tracing::warn;

/// Volume, mute and loop state
#[derive(Debug, Clone, PartialEq)]
pub struct AudioControls {
    /// Current volume (0.0 - 1.0); 0.0 while muted
    volume: f32,

    /// Mute state
    muted: bool,

    /// Volume before muting, restored on unmute
    previous_volume: f32,

    /// Replay the current track when it ends
    looping: bool,
}

impl AudioControls {
    /// Create controls with an initial volume
    pub fn new(volume: f32) -> Self {
        let volume = clamp_volume(volume);
        Self {
            volume,
            muted: false,
            previous_volume: volume,
            looping: false,
        }
    }

    /// Set volume level (clamped to 0.0 - 1.0)
    ///
    /// An explicit volume change ends a mute.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = clamp_volume(volume);
        self.muted = false;
    }

    /// Current volume
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Volume remembered from before the last mute
    pub fn previous_volume(&self) -> f32 {
        self.previous_volume
    }

    /// Mute audio, remembering the current volume
    pub fn mute(&mut self) {
        if self.muted {
            return;
        }
        self.previous_volume = self.volume;
        self.volume = 0.0;
        self.muted = true;
    }

    /// Unmute audio, restoring the pre-mute volume
    pub fn unmute(&mut self) {
        if !self.muted {
            return;
        }
        self.volume = self.previous_volume;
        self.muted = false;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.unmute();
        } else {
            self.mute();
        }
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Set loop flag
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Check loop flag
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Linear gain for the gain node
    pub fn gain(&self) -> f32 {
        self.volume
    }
}

impl Default for AudioControls {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Parse a persisted volume string
///
/// Returns `None` (and logs) for values that are not a finite number in
/// 0.0 - 1.0.
pub fn parse_persisted_volume(raw: &str) -> Option<f32> {
    match raw.trim().parse::<f32>() {
        Ok(volume) if volume.is_finite() && (0.0..=1.0).contains(&volume) => Some(volume),
        Ok(volume) => {
            warn!("Ignoring persisted volume out of range: {}", volume);
            None
        }
        Err(e) => {
            warn!("Ignoring unparsable persisted volume {:?}: {}", raw, e);
            None
        }
    }
}

/// Format a volume for persistence
pub fn format_persisted_volume(volume: f32) -> String {
    volume.to_string()
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}
