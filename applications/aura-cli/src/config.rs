/// Application configuration
use crate::args::Args;
use crate::error::{CliError, Result};
use aura_playback::PlaybackConfig;
use aura_visualizer::{ColorMode, ReactiveTuning, VisualMode, VisualizerSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Extensions accepted for local files
pub const AUDIO_EXTENSIONS: [&str; 9] = [
    "mp3", "wav", "flac", "ogg", "oga", "m4a", "aac", "opus", "aiff",
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuraConfig {
    #[serde(default)]
    pub playback: PlaybackSettings,

    #[serde(default)]
    pub visualizer: VisualizerSettings,

    #[serde(default)]
    pub tuning: ReactiveTuning,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub audio: AudioSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default)]
    pub tracks: Vec<String>,

    #[serde(default)]
    pub looping: bool,

    /// Start over after the last track instead of exiting
    #[serde(default)]
    pub repeat_playlist: bool,

    #[serde(default = "default_volume")]
    pub default_volume: f32,

    #[serde(default = "default_volume_key")]
    pub volume_key: String,

    /// Where the volume is persisted; `None` keeps it in memory
    #[serde(default = "default_settings_file")]
    pub settings_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplaySettings {
    #[serde(default = "default_fps")]
    pub fps: u32,

    #[serde(default = "default_width")]
    pub width: f32,

    #[serde(default = "default_height")]
    pub height: f32,

    #[serde(default)]
    pub palette: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioSettings {
    #[serde(default)]
    pub silent: bool,

    #[serde(default = "default_fft_size")]
    pub fft_size: usize,

    #[serde(default = "default_smoothing")]
    pub smoothing: f32,
}

impl AuraConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `./aura.toml` is read if
    /// present. `AURA_`-prefixed variables override the file, with `__`
    /// between levels (`AURA_DISPLAY__FPS=30`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from("aura.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("AURA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("playback.tracks"),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Layer command-line flags over the loaded values
    pub fn apply_args(&mut self, args: &Args) {
        if !args.tracks.is_empty() {
            self.playback.tracks = args.tracks.clone();
        }
        if args.looping {
            self.playback.looping = true;
        }
        if let Some(fps) = args.fps {
            self.display.fps = fps;
        }
        if let Some(palette) = &args.palette {
            self.display.palette = Some(palette.clone());
        }
        if args.silent {
            self.audio.silent = true;
        }

        let visualizer = &mut self.visualizer;
        if let Some(sensitivity) = args.sensitivity {
            visualizer.sensitivity = sensitivity;
        }
        if let Some(count) = args.particles {
            visualizer.particle_count = count;
        }
        if let Some(mode) = &args.mode {
            visualizer.mode = parse_mode(mode);
        }
        if let Some(color_mode) = &args.color_mode {
            visualizer.color_mode = ColorMode::from_id(color_mode);
        }
        if let Some(base_color) = &args.base_color {
            visualizer.base_color = base_color.clone();
        }
        if args.stats {
            visualizer.show_stats = true;
        }
    }

    /// Validate configuration
    ///
    /// `has_upload` allows an empty playlist when a file is uploaded.
    pub fn validate(&self, has_upload: bool) -> Result<()> {
        if self.playback.tracks.is_empty() && !has_upload {
            return Err(CliError::NoTracks);
        }
        if self.display.fps == 0 {
            return Err(CliError::Config("display.fps must be at least 1".to_string()));
        }
        let sensitivity = self.visualizer.sensitivity;
        if !(sensitivity.is_finite() && sensitivity > 0.0) {
            return Err(CliError::Config(format!(
                "visualizer.sensitivity must be positive, got {}",
                sensitivity
            )));
        }
        if !(0.0..=1.0).contains(&self.playback.default_volume) {
            return Err(CliError::Config(format!(
                "playback.default_volume must be within 0.0 - 1.0, got {}",
                self.playback.default_volume
            )));
        }
        self.tuning
            .validate()
            .map_err(|e| CliError::Config(format!("tuning: {}", e)))?;
        Ok(())
    }

    /// Configured tracks minus local files that are not audio
    pub fn playable_tracks(&self) -> Vec<String> {
        self.playback
            .tracks
            .iter()
            .filter(|track| {
                let playable = is_audio_track(track);
                if !playable {
                    warn!("Skipping {}: not an audio file", track);
                }
                playable
            })
            .cloned()
            .collect()
    }

    /// Controller settings
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            volume_key: self.playback.volume_key.clone(),
            default_volume: self.playback.default_volume,
            looping: self.playback.looping,
        }
    }
}

/// Parse a mode id, warning when it falls back to particles
pub fn parse_mode(id: &str) -> VisualMode {
    let mode = VisualMode::from_id(id);
    if !mode.id().eq_ignore_ascii_case(id.trim()) {
        warn!("Unknown visual mode '{}', using {}", id, mode.id());
    }
    mode
}

/// Whether a track reference looks playable
///
/// Remote URLs are trusted (servers may omit an extension); local paths
/// need a known audio extension.
pub fn is_audio_track(track: &str) -> bool {
    let lower = track.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return true;
    }
    has_audio_extension(track)
}

/// Whether `name` ends in a known audio extension
pub fn has_audio_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

// Default values
fn default_volume() -> f32 {
    1.0
}

fn default_volume_key() -> String {
    "audioVolume".to_string()
}

fn default_settings_file() -> Option<PathBuf> {
    Some(PathBuf::from("aura-settings.json"))
}

fn default_fps() -> u32 {
    aura_visualizer::frame_loop::DEFAULT_FPS
}

fn default_width() -> f32 {
    800.0
}

fn default_height() -> f32 {
    600.0
}

fn default_fft_size() -> usize {
    2048
}

fn default_smoothing() -> f32 {
    0.8
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            looping: false,
            repeat_playlist: false,
            default_volume: default_volume(),
            volume_key: default_volume_key(),
            settings_file: default_settings_file(),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            width: default_width(),
            height: default_height(),
            palette: None,
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            silent: false,
            fft_size: default_fft_size(),
            smoothing: default_smoothing(),
        }
    }
}
