//! Aura CLI - terminal front end
//!
//! Wires the native collaborators from `aura-desktop` into a playback
//! controller, drives the animator from it once per frame and reports
//! playback notices through `tracing`.

pub mod args;
pub mod config;
pub mod error;
pub mod session;

pub use args::Args;
pub use config::AuraConfig;
pub use error::{CliError, Result};
pub use session::{read_upload, RunSummary, Session, StopReason};
