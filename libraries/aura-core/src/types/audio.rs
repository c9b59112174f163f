/// Audio-related types
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// Common sample rates
    pub const CD_QUALITY: Self = Self(44_100);
    pub const DVD_QUALITY: Self = Self(48_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }
}

/// Fully decoded audio track
///
/// Samples are stored as f32 in the range [-1.0, 1.0], interleaved
/// (`[L, R, L, R, ...]` for stereo). The sample buffer is shared so that
/// every one-shot source created from the same decode points at one
/// allocation.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Audio samples (f32, interleaved)
    samples: Arc<[f32]>,

    /// Sample rate of the decoded stream
    sample_rate: SampleRate,

    /// Number of interleaved channels
    channels: u16,
}

impl DecodedAudio {
    /// Create a decoded buffer from interleaved samples
    ///
    /// A channel count of zero is treated as mono.
    pub fn new(samples: Vec<f32>, sample_rate: SampleRate, channels: u16) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
            channels: channels.max(1),
        }
    }

    /// Interleaved samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Shared handle to the sample buffer
    pub fn shared_samples(&self) -> Arc<[f32]> {
        Arc::clone(&self.samples)
    }

    /// Sample rate
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Number of channels
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Get the number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Sample-accurate duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate.as_hz() == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate.as_hz())
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mono mix of the frame at `frame`, or 0.0 past the end
    pub fn mono_frame(&self, frame: usize) -> f32 {
        let channels = self.channels as usize;
        let start = frame * channels;
        match self.samples.get(start..start + channels) {
            Some(chunk) => chunk.iter().sum::<f32>() / channels as f32,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_is_sample_accurate() {
        // 1.5 s of 48 kHz stereo
        let audio = DecodedAudio::new(vec![0.0; 48_000 * 3], SampleRate::DVD_QUALITY, 2);
        assert_eq!(audio.frames(), 72_000);
        assert!((audio.duration_secs() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn zero_channels_means_mono() {
        let audio = DecodedAudio::new(vec![0.25; 10], SampleRate::CD_QUALITY, 0);
        assert_eq!(audio.channels(), 1);
        assert_eq!(audio.frames(), 10);
    }

    #[test]
    fn mono_frame_mixes_channels() {
        let audio = DecodedAudio::new(vec![1.0, 0.0, 0.5, 0.5], SampleRate::CD_QUALITY, 2);
        assert_eq!(audio.mono_frame(0), 0.5);
        assert_eq!(audio.mono_frame(1), 0.5);
        assert_eq!(audio.mono_frame(2), 0.0);
    }

    #[test]
    fn zero_rate_has_zero_duration() {
        let audio = DecodedAudio::new(vec![0.0; 4], SampleRate::new(0), 2);
        assert_eq!(audio.duration_secs(), 0.0);
    }
}
