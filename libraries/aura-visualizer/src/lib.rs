//! Aura Visualizer - Particle Animator
//!
//! Turns per-frame frequency snapshots into particle motion.
//!
//! This crate provides:
//! - Band analysis (sub-bass, bass, mid, high) and beat detection
//! - Per-particle kinematics driven by band energy
//! - The [`Animator`] frame step, mode switching, colors and palettes
//! - Visual mode presets in a particle-renderer config shape
//! - An in-memory [`ParticleField`] host and a [`FrameLoop`] scheduler
//!
//! # Architecture
//!
//! The animator reads audio through [`aura_core::SpectrumSource`] and writes
//! particles through [`ParticleHost`]. It never draws and never owns the
//! particle set.
//!
//! # Example
//!
//! ```rust
//! use aura_visualizer::{Animator, ParticleField, ParticleHost, VisualMode};
//!
//! let mut field = ParticleField::new(800.0, 600.0);
//! let mut animator = Animator::default();
//! animator.init(&mut field);
//! assert_eq!(field.live().unwrap().len(), 50);
//!
//! animator.set_mode(VisualMode::Pulse, &mut field);
//! assert!(animator.is_running());
//!
//! // Bass-heavy snapshot
//! let mut snapshot = vec![0u8; 1024];
//! snapshot[..200].fill(240);
//! let energies = animator.update_particles(&snapshot, &mut field.live().unwrap().particles);
//! assert!(energies.beat_detected(0.8));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analysis;
pub mod animator;
pub mod color;
pub mod error;
pub mod field;
pub mod frame_loop;
pub mod kinematics;
pub mod modes;
pub mod palette;
pub mod particle;
pub mod settings;
pub mod stats;

pub use analysis::{average_level, frequency_characteristics, peak_energy, split_bands, BandEnergies, ChunkStats};
pub use animator::{Animator, FrameOutcome};
pub use color::{hex_to_rgb, hsl_to_rgb, rgb_to_hex, rgb_to_hsl, shift_hue, ColorError, Hsl, Rgb};
pub use error::{Result, VisualizerError};
pub use field::ParticleField;
pub use frame_loop::FrameLoop;
pub use kinematics::{adjust_particle, Drive, GroupProfile, ReactiveTuning, GROUP_PROFILES};
pub use modes::{available_modes, ColorValue, ModeInfo, ParticleConfig, VisualMode};
pub use palette::{Palette, SPECTRUM_COLORS};
pub use particle::{Particle, ParticleHost, ParticleSet};
pub use settings::{ColorMode, SettingsPatch, VisualizerSettings};
pub use stats::{FrameStats, StatsTracker};
