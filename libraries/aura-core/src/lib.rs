//! Aura Visualizer Core
//!
//! Platform-agnostic types, collaborator traits, and error handling shared by
//! the playback controller, the particle animator and the platform backends.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackRef`, `DecodedAudio`, `SourceId`
//! - **Collaborator Traits**: `AudioGraph`, `TrackFetcher`, `AudioDecoder`,
//!   `KeyValueStore`, `SpectrumSource`
//! - **Error Handling**: Unified `CoreError` and `Result` types
//! - **Time Helpers**: transport display formatting
//!
//! Nothing here touches a real audio device, the network or the disk. Platform
//! crates implement the traits; the playback and visualizer crates consume them.
//!
//! # Example
//!
//! ```rust
//! use aura_core::{DecodedAudio, SampleRate, TrackRef};
//!
//! let track = TrackRef::url("https://example.com/track.mp3");
//! assert_eq!(track.display_name(), "track.mp3");
//!
//! // One second of stereo silence
//! let audio = DecodedAudio::new(vec![0.0; 88_200], SampleRate::CD_QUALITY, 2);
//! assert!((audio.duration_secs() - 1.0).abs() < 1e-9);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod time;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use traits::{AudioDecoder, AudioGraph, KeyValueStore, MemoryStore, SpectrumSource, TrackFetcher};
pub use types::{DecodedAudio, SampleRate, SourceId, TrackRef};
