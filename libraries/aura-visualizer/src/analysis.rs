//! Spectrum analysis
//!
//! Splits a byte frequency snapshot (0-255 per bin, low to high) into four
//! bands and reduces each to a normalized energy.
//!
//! Band layout by bin index fraction:
//! ```text
//! [0%, 5%)    sub-bass
//! [5%, 20%)   bass
//! [20%, 60%)  mid
//! [60%, 100%] high
//! ```

use serde::{Deserialize, Serialize};

/// Default threshold above which sub-bass or bass energy counts as a beat
pub const DEFAULT_BEAT_THRESHOLD: f32 = 0.8;

/// The four band slices of one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bands<'a> {
    /// Bins `[0%, 5%)`
    pub sub_bass: &'a [u8],
    /// Bins `[5%, 20%)`
    pub bass: &'a [u8],
    /// Bins `[20%, 60%)`
    pub mid: &'a [u8],
    /// Bins `[60%, 100%]`
    pub high: &'a [u8],
}

/// Split a snapshot into bands using floored index boundaries
///
/// Short snapshots yield empty bands rather than panicking.
pub fn split_bands(snapshot: &[u8]) -> Bands<'_> {
    let len = snapshot.len();
    let sub_end = len * 5 / 100;
    let bass_end = len / 5;
    let mid_end = len * 3 / 5;

    Bands {
        sub_bass: &snapshot[..sub_end],
        bass: &snapshot[sub_end..bass_end],
        mid: &snapshot[bass_end..mid_end],
        high: &snapshot[mid_end..],
    }
}

/// `(average + max) / (2 * 255)`, or 0 for an empty band
pub fn peak_energy(band: &[u8]) -> f32 {
    let Some(&max) = band.iter().max() else {
        return 0.0;
    };
    (mean(band) + f32::from(max)) / (2.0 * 255.0)
}

/// Mean of the raw snapshot normalized to 0.0 - 1.0
pub fn average_level(snapshot: &[u8]) -> f32 {
    mean(snapshot) / 255.0
}

/// Per-band energies for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BandEnergies {
    /// Sub-bass energy (0.0 - 1.0)
    pub sub_bass: f32,
    /// Bass energy (0.0 - 1.0)
    pub bass: f32,
    /// Mid energy (0.0 - 1.0)
    pub mid: f32,
    /// High energy (0.0 - 1.0)
    pub high: f32,
}

impl BandEnergies {
    /// Compute energies for a snapshot
    pub fn from_snapshot(snapshot: &[u8]) -> Self {
        let bands = split_bands(snapshot);
        Self {
            sub_bass: peak_energy(bands.sub_bass),
            bass: peak_energy(bands.bass),
            mid: peak_energy(bands.mid),
            high: peak_energy(bands.high),
        }
    }

    /// Mean of the four band energies; drives particle speed
    pub fn overall(&self) -> f32 {
        (self.sub_bass + self.bass + self.mid + self.high) / 4.0
    }

    /// Whether sub-bass or bass exceeds `threshold`
    pub fn beat_detected(&self, threshold: f32) -> bool {
        self.sub_bass > threshold || self.bass > threshold
    }

    /// Energy driving particle group `group` (0 sub-bass .. 3 high)
    pub fn for_group(&self, group: usize) -> f32 {
        match group % 4 {
            0 => self.sub_bass,
            1 => self.bass,
            2 => self.mid,
            _ => self.high,
        }
    }
}

/// Summary of one spectrum chunk
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChunkStats {
    /// Mean magnitude
    pub average: f32,
    /// Largest magnitude
    pub peak: u8,
    /// Population variance of the magnitudes
    pub variance: f32,
}

/// Split the snapshot into `chunks` equal parts and summarize each
///
/// Trailing bins that do not fill a whole chunk are ignored. Empty chunks
/// summarize to zeros.
pub fn frequency_characteristics(snapshot: &[u8], chunks: usize) -> Vec<ChunkStats> {
    if chunks == 0 {
        return Vec::new();
    }
    let chunk_size = snapshot.len() / chunks;

    (0..chunks)
        .map(|i| {
            let chunk = &snapshot[i * chunk_size..(i + 1) * chunk_size];
            let average = mean(chunk);
            let variance = if chunk.is_empty() {
                0.0
            } else {
                chunk
                    .iter()
                    .map(|&v| (f32::from(v) - average).powi(2))
                    .sum::<f32>()
                    / chunk.len() as f32
            };
            ChunkStats {
                average,
                peak: chunk.iter().copied().max().unwrap_or(0),
                variance,
            }
        })
        .collect()
}

fn mean(values: &[u8]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u64 = values.iter().map(|&v| u64::from(v)).sum();
    sum as f32 / values.len() as f32
}
