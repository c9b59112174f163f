/// Collaborator traits for Aura Visualizer
///
/// The playback controller and the animator never talk to a device, the
/// network or the disk directly. Each platform supplies these seams.
use crate::error::Result;
use crate::types::{DecodedAudio, SourceId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// A single audio-graph session: source → gain → analyser → output
///
/// Modeled on a browser audio context. Sources are one-shot: once stopped
/// they cannot be restarted, so every transition into playing creates a new
/// one with [`AudioGraph::start_source`].
pub trait AudioGraph: Send {
    /// Audio clock in seconds (monotonic, device time)
    fn current_time(&self) -> f64;

    /// Whether the output device is suspended (e.g. autoplay policy)
    fn is_suspended(&self) -> bool;

    /// Resume a suspended device
    ///
    /// # Errors
    /// Returns an error if the platform denies the resume
    fn resume(&mut self) -> Result<()>;

    /// Create a one-shot source bound to `audio`, route it through the gain
    /// node into the analyser and output, and start it at `offset_secs`
    ///
    /// # Errors
    /// Returns an error if the device cannot start the source
    fn start_source(&mut self, audio: &DecodedAudio, offset_secs: f64) -> Result<SourceId>;

    /// Stop and disconnect a source. Unknown or already stopped ids are ignored.
    fn stop_source(&mut self, id: SourceId);

    /// Set the gain node value (linear, 0.0 - 1.0)
    fn set_gain(&mut self, gain: f32);

    /// Current gain node value
    fn gain(&self) -> f32;

    /// Number of analyser frequency bins (half the FFT size)
    fn frequency_bin_count(&self) -> usize;

    /// Copy the latest byte magnitudes (0-255) into `out`
    ///
    /// `out` is expected to be `frequency_bin_count()` long; extra slots are
    /// left untouched.
    fn fill_frequency_data(&mut self, out: &mut [u8]);

    /// Drain end-of-track notifications for sources that played to the end
    fn take_ended(&mut self) -> Vec<SourceId>;

    /// Close the session and release the device
    fn close(&mut self);
}

/// Fetches encoded track bytes by URL
#[async_trait]
pub trait TrackFetcher: Send + Sync {
    /// Fetch the full body of `url`
    ///
    /// # Errors
    /// Network failures and non-2xx responses are errors
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Decodes encoded audio bytes into PCM
#[async_trait]
pub trait AudioDecoder: Send + Sync {
    /// Decode a complete encoded file
    ///
    /// `hint` is an optional lowercase file extension.
    ///
    /// # Errors
    /// Returns an error if the bytes are not decodable audio
    async fn decode(&self, bytes: Arc<[u8]>, hint: Option<&str>) -> Result<DecodedAudio>;
}

/// Process-wide keyed storage for small persisted settings
pub trait KeyValueStore: Send {
    /// Read a value
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be read
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Producer of per-frame frequency snapshots
///
/// Implemented by the playback controller and consumed by the animator once
/// per display refresh. The returned slice is only valid for the frame.
pub trait SpectrumSource {
    /// Whether audio is currently playing
    fn is_playing(&self) -> bool;

    /// Refresh the snapshot from the analyser and lend it
    fn frequency_snapshot(&mut self) -> &[u8];
}

/// In-memory [`KeyValueStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self { entries }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("audioVolume").unwrap(), None);

        store.set("audioVolume", "0.8").unwrap();
        assert_eq!(store.get("audioVolume").unwrap().as_deref(), Some("0.8"));

        store.set("audioVolume", "0.5").unwrap();
        assert_eq!(store.get("audioVolume").unwrap().as_deref(), Some("0.5"));
    }

    #[test]
    fn memory_store_with_entry() {
        let store = MemoryStore::with_entry("audioVolume", "0.7");
        assert_eq!(store.get("audioVolume").unwrap().as_deref(), Some("0.7"));
    }
}
