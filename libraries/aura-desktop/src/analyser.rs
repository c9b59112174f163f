//! FFT frequency analyser
//!
//! Produces byte magnitudes the way a browser analyser node does: Blackman
//! window, forward FFT, magnitude scaled by 1/N, exponential smoothing over
//! time, then a linear map of -100..-30 dB onto 0..255.

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f32::consts::PI;
use std::fmt;
use std::sync::Arc;

/// Default FFT size (1024 frequency bins)
pub const DEFAULT_FFT_SIZE: usize = 2048;

/// Default time smoothing constant
pub const DEFAULT_SMOOTHING: f32 = 0.8;

/// Magnitude mapped to byte 0
pub const DEFAULT_MIN_DECIBELS: f32 = -100.0;

/// Magnitude mapped to byte 255
pub const DEFAULT_MAX_DECIBELS: f32 = -30.0;

/// Spectrum analyser over a sliding time-domain window
pub struct FrequencyAnalyser {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    window: Vec<f32>,
    smoothed: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    smoothing: f32,
    min_db: f32,
    max_db: f32,
}

impl FrequencyAnalyser {
    /// Create an analyser with `fft_size` points (rounded up to a power of two, minimum 32)
    pub fn new(fft_size: usize) -> Self {
        let fft_size = fft_size.max(32).next_power_of_two();
        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        Self {
            fft,
            fft_size,
            window: blackman_window(fft_size),
            smoothed: vec![0.0; fft_size / 2],
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            smoothing: DEFAULT_SMOOTHING,
            min_db: DEFAULT_MIN_DECIBELS,
            max_db: DEFAULT_MAX_DECIBELS,
        }
    }

    /// FFT size in samples
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of frequency bins (half the FFT size)
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Set the smoothing constant (clamped to 0.0 - 1.0)
    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, 1.0);
    }

    /// Set the decibel range mapped onto 0..255
    ///
    /// Ignored unless `min_db < max_db`.
    pub fn set_decibel_range(&mut self, min_db: f32, max_db: f32) {
        if min_db < max_db {
            self.min_db = min_db;
            self.max_db = max_db;
        }
    }

    /// Forget smoothing history
    pub fn reset(&mut self) {
        self.smoothed.fill(0.0);
    }

    /// Analyse the most recent `fft_size` samples and write byte magnitudes
    ///
    /// `time_domain` shorter than the FFT size is zero-padded at the front.
    /// At most `bin_count()` bytes of `out` are written.
    pub fn analyse(&mut self, time_domain: &[f32], out: &mut [u8]) {
        let n = self.fft_size;
        let tail = &time_domain[time_domain.len().saturating_sub(n)..];
        let pad = n - tail.len();

        for (i, slot) in self.scratch.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { tail[i - pad] };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.scratch);

        let scale = 1.0 / n as f32;
        let range = self.max_db - self.min_db;
        for (bin, smoothed) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.scratch[bin].norm() * scale;
            *smoothed = self.smoothing * *smoothed + (1.0 - self.smoothing) * magnitude;

            if let Some(byte) = out.get_mut(bin) {
                let db = if *smoothed > 0.0 {
                    20.0 * smoothed.log10()
                } else {
                    f32::NEG_INFINITY
                };
                let scaled = 255.0 / range * (db - self.min_db);
                *byte = scaled.clamp(0.0, 255.0) as u8;
            }
        }
    }
}

impl Default for FrequencyAnalyser {
    fn default() -> Self {
        Self::new(DEFAULT_FFT_SIZE)
    }
}

impl fmt::Debug for FrequencyAnalyser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrequencyAnalyser")
            .field("fft_size", &self.fft_size)
            .field("smoothing", &self.smoothing)
            .field("min_db", &self.min_db)
            .field("max_db", &self.max_db)
            .finish()
    }
}

fn blackman_window(n: usize) -> Vec<f32> {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;

    (0..n)
        .map(|i| {
            let phase = 2.0 * PI * i as f32 / n as f32;
            A0 - A1 * phase.cos() + A2 * (2.0 * phase).cos()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / rate).sin())
            .collect()
    }

    #[test]
    fn silence_maps_to_zero() {
        let mut analyser = FrequencyAnalyser::new(256);
        let mut out = vec![7u8; analyser.bin_count()];
        analyser.analyse(&[0.0; 256], &mut out);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn tone_peaks_at_its_bin() {
        let mut analyser = FrequencyAnalyser::new(1024);
        analyser.set_smoothing(0.0);
        analyser.set_decibel_range(-100.0, 0.0);
        // Bin 64 of a 1024-point FFT at 1024 Hz sample rate
        let signal = sine(64.0, 1024.0, 1024);
        let mut out = vec![0u8; analyser.bin_count()];
        analyser.analyse(&signal, &mut out);

        let loudest = out
            .iter()
            .enumerate()
            .max_by_key(|(_, &b)| b)
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(loudest, 64);
        assert!(out[64] > 200);
        assert!(out[300] < out[64]);
    }

    #[test]
    fn smoothing_decays_gradually() {
        let mut analyser = FrequencyAnalyser::new(1024);
        analyser.set_decibel_range(-100.0, 0.0);
        let signal = sine(64.0, 1024.0, 1024);
        let mut out = vec![0u8; analyser.bin_count()];
        analyser.analyse(&signal, &mut out);
        let loud = out[64];

        analyser.analyse(&[0.0; 1024], &mut out);
        assert!(out[64] > 0);
        assert!(out[64] < loud);

        analyser.reset();
        analyser.analyse(&[0.0; 1024], &mut out);
        assert_eq!(out[64], 0);
    }

    #[test]
    fn size_rounds_to_power_of_two() {
        assert_eq!(FrequencyAnalyser::new(1000).fft_size(), 1024);
        assert_eq!(FrequencyAnalyser::new(1).fft_size(), 32);
        assert_eq!(FrequencyAnalyser::default().bin_count(), 1024);
    }

    #[test]
    fn short_output_is_not_overrun() {
        let mut analyser = FrequencyAnalyser::new(64);
        let mut out = [0u8; 4];
        analyser.analyse(&sine(4.0, 64.0, 64), &mut out);
        assert!(out[3] > 0);
    }
}
