//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

/// Play audio tracks and drive a particle field from their spectrum
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "aura")]
#[command(about = "Audio-reactive particle visualizer", long_about = None, version)]
pub struct Args {
    /// Track paths or URLs, in playlist order
    pub tracks: Vec<String>,

    /// Configuration file path (default: ./aura.toml when present)
    #[arg(short, long, env = "AURA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Play a local file once before the playlist
    #[arg(short, long)]
    pub upload: Option<PathBuf>,

    /// Target frames per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Reaction strength (> 0)
    #[arg(short, long)]
    pub sensitivity: Option<f32>,

    /// Number of particles
    #[arg(short = 'n', long)]
    pub particles: Option<u32>,

    /// Visualization mode: particles, wave, circular, pulse
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Color palette: neon, sunset, aurora, retro, galaxy
    #[arg(short, long)]
    pub palette: Option<String>,

    /// Color mode: spectrum, solid, gradient
    #[arg(long)]
    pub color_mode: Option<String>,

    /// Base hex color for solid and gradient modes
    #[arg(long)]
    pub base_color: Option<String>,

    /// Initial volume (0.0 - 1.0); persisted
    #[arg(long)]
    pub volume: Option<f32>,

    /// Repeat the current track
    #[arg(long = "loop")]
    pub looping: bool,

    /// Log frame stats
    #[arg(long)]
    pub stats: bool,

    /// Do not open an audio device
    #[arg(long)]
    pub silent: bool,

    /// Stop after this many frames
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// Print the visualization modes as JSON and exit
    #[arg(long)]
    pub list_modes: bool,
}
