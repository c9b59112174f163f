//! Aura Desktop - Native Collaborators
//!
//! Implements the collaborator traits from `aura-core` for a native process.
//!
//! This crate provides:
//! - [`SymphoniaDecoder`]: in-memory decode of MP3, FLAC, OGG, WAV, AAC and more
//! - [`HttpFetcher`]: `http(s)://` downloads via reqwest, local files via tokio
//! - [`SoftwareGraph`]: a browser-style audio context with a rustfft analyser
//! - [`CpalSink`]: optional audible output on a dedicated audio thread
//! - [`JsonFileStore`]: settings persisted as a JSON object
//!
//! # Example
//!
//! ```rust
//! use aura_core::{AudioGraph, DecodedAudio, SampleRate};
//! use aura_desktop::{ManualClock, SoftwareGraph};
//!
//! let clock = ManualClock::new();
//! let mut graph = SoftwareGraph::with_clock(Box::new(clock.clone()));
//! graph.resume().unwrap();
//!
//! let audio = DecodedAudio::new(vec![0.0; 8000], SampleRate::new(8000), 1);
//! let id = graph.start_source(&audio, 0.0).unwrap();
//!
//! clock.advance_secs(1.5);
//! assert_eq!(graph.take_ended(), vec![id]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analyser;
pub mod clock;
pub mod decoder;
mod error;
pub mod fetcher;
pub mod graph;
mod output;
pub mod store;

pub use analyser::FrequencyAnalyser;
pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use decoder::SymphoniaDecoder;
pub use error::{DesktopError, Result};
pub use fetcher::HttpFetcher;
pub use graph::SoftwareGraph;
pub use output::CpalSink;
pub use store::JsonFileStore;
