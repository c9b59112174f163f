//! Aura Visualizer - Playback Control
//!
//! Platform-agnostic transport for a small wrapping playlist.
//!
//! This crate provides:
//! - Play / pause / stop / seek against a one-shot-source audio graph
//! - Pause/resume offsets computed from the audio clock
//! - Wrapping next/previous navigation and automatic advance at track end
//! - Loop flag, volume and mute, with the volume persisted across sessions
//! - An uploaded-file override that bypasses the playlist
//! - The per-frame frequency snapshot consumed by the animator
//!
//! # Architecture
//!
//! `aura-playback` never touches a device, the network or the disk. The
//! platform provides an [`aura_core::AudioGraph`], a fetcher, a decoder and a
//! key-value store; the controller orchestrates them.
//!
//! # Example
//!
//! ```rust
//! use aura_playback::{AudioControls, Playlist};
//!
//! let mut playlist = Playlist::from_urls(["media/01.mp3", "media/02.mp3"]);
//! assert_eq!(playlist.next(), Some(1));
//! assert_eq!(playlist.next(), Some(0));
//!
//! let mut controls = AudioControls::new(0.8);
//! controls.toggle_mute();
//! assert_eq!(controls.gain(), 0.0);
//! controls.toggle_mute();
//! assert_eq!(controls.gain(), 0.8);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod controller;
pub mod error;
pub mod events;
pub mod playlist;
pub mod types;
pub mod volume;

pub use controller::{Collaborators, Disposer, PlaybackController};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use playlist::Playlist;
pub use types::{PlaybackConfig, PlaybackState, Timing};
pub use volume::{AudioControls, format_persisted_volume, parse_persisted_volume};
