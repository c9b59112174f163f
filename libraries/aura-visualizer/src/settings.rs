//! User-facing visualizer settings

use crate::color::{hex_to_rgb, shift_hue};
use crate::modes::{ColorValue, VisualMode};
use crate::palette::SPECTRUM_COLORS;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How particle colors are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Fixed designer palette
    #[default]
    Spectrum,
    /// The base color only
    Solid,
    /// The base color and two hue-rotated companions
    Gradient,
}

impl ColorMode {
    /// Parse a mode id, falling back to [`ColorMode::Spectrum`]
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "solid" => ColorMode::Solid,
            "gradient" => ColorMode::Gradient,
            _ => ColorMode::Spectrum,
        }
    }
}

/// Visualizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerSettings {
    /// Reaction strength (> 0, default 1.0)
    pub sensitivity: f32,

    /// Particle count, applied on the next reinit (default 50)
    pub particle_count: u32,

    /// Color selection (default spectrum)
    pub color_mode: ColorMode,

    /// Base hex color for solid and gradient modes (default `#ffffff`)
    pub base_color: String,

    /// Log frame stats (default off)
    pub show_stats: bool,

    /// Visualization mode (default particles)
    pub mode: VisualMode,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            particle_count: 50,
            color_mode: ColorMode::Spectrum,
            base_color: "#ffffff".to_string(),
            show_stats: false,
            mode: VisualMode::Particles,
        }
    }
}

impl VisualizerSettings {
    /// Merge `patch`, rejecting (and logging) invalid values
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(sensitivity) = patch.sensitivity {
            if sensitivity.is_finite() && sensitivity > 0.0 {
                self.sensitivity = sensitivity;
            } else {
                warn!("Ignoring non-positive sensitivity {}", sensitivity);
            }
        }
        if let Some(count) = patch.particle_count {
            self.particle_count = count;
        }
        if let Some(color_mode) = patch.color_mode {
            self.color_mode = color_mode;
        }
        if let Some(base_color) = patch.base_color {
            match hex_to_rgb(&base_color) {
                Ok(_) => self.base_color = base_color,
                Err(e) => warn!("Ignoring base color: {}", e),
            }
        }
        if let Some(show_stats) = patch.show_stats {
            self.show_stats = show_stats;
        }
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
    }

    /// Colors particles are drawn with under the current color mode
    ///
    /// A gradient whose base color cannot be parsed degrades to the base
    /// color alone.
    pub fn particle_colors(&self) -> ColorValue {
        match self.color_mode {
            ColorMode::Solid => ColorValue::Single(self.base_color.clone()),
            ColorMode::Gradient => {
                let shifted = shift_hue(&self.base_color, 60.0)
                    .and_then(|a| shift_hue(&self.base_color, 120.0).map(|b| (a, b)));
                match shifted {
                    Ok((plus_60, plus_120)) => {
                        ColorValue::Many(vec![self.base_color.clone(), plus_60, plus_120])
                    }
                    Err(e) => {
                        warn!("Gradient unavailable: {}", e);
                        ColorValue::Single(self.base_color.clone())
                    }
                }
            }
            ColorMode::Spectrum => {
                ColorValue::Many(SPECTRUM_COLORS.iter().map(|c| (*c).to_string()).collect())
            }
        }
    }
}

/// Partial settings update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    /// New sensitivity
    pub sensitivity: Option<f32>,
    /// New particle count
    pub particle_count: Option<u32>,
    /// New color mode
    pub color_mode: Option<ColorMode>,
    /// New base color
    pub base_color: Option<String>,
    /// New stats flag
    pub show_stats: Option<bool>,
    /// New mode
    pub mode: Option<VisualMode>,
}
