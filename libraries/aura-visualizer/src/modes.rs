//! Visualization modes and their particle configuration presets
//!
//! A preset is a declarative particle configuration in the shape popular
//! particle renderers accept (`particles.number.value`, `particles.move`,
//! ...). Every mode is a variant of the same default; the animator merges
//! the user's particle count and colors on top before handing it to the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One color or a list of colors to draw from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// A single hex color
    Single(String),
    /// Several hex colors; particles pick one each
    Many(Vec<String>),
}

impl ColorValue {
    /// All colors as a list
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            ColorValue::Single(color) => vec![color.clone()],
            ColorValue::Many(colors) => colors.clone(),
        }
    }
}

impl Default for ColorValue {
    fn default() -> Self {
        ColorValue::Single("#ffffff".to_string())
    }
}

/// Full renderer configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// Particle section
    pub particles: ParticlesSection,
}

/// `particles` section of the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticlesSection {
    /// Particle count and density
    pub number: NumberConfig,
    /// Particle colors
    pub color: ColorConfig,
    /// Shapes
    pub shape: ShapeConfig,
    /// Opacity
    pub opacity: OpacityConfig,
    /// Size
    pub size: SizeConfig,
    /// Lines between nearby particles
    pub line_linked: LineLinkedConfig,
    /// Motion
    #[serde(rename = "move")]
    pub movement: MoveConfig,
}

/// Particle count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberConfig {
    /// Number of particles
    pub value: u32,
    /// Density scaling
    pub density: DensityConfig,
}

/// Density scaling by canvas area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityConfig {
    /// Scale the count by canvas area
    pub enable: bool,
    /// Area (px²/1000) holding `value` particles
    pub value_area: u32,
}

/// Particle colors
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorConfig {
    /// One or several hex colors
    pub value: ColorValue,
}

/// Shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeConfig {
    /// Shape names drawn at random
    #[serde(rename = "type")]
    pub kind: Vec<String>,
    /// Outline
    pub stroke: StrokeConfig,
    /// Polygon shape options
    pub polygon: PolygonConfig,
}

/// Shape outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeConfig {
    /// Outline width
    pub width: f32,
    /// Outline color
    pub color: String,
}

/// Polygon options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonConfig {
    /// Number of sides
    pub nb_sides: u32,
}

/// Opacity options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpacityConfig {
    /// Base opacity
    pub value: f32,
    /// Randomize per particle
    pub random: bool,
    /// Opacity animation
    pub anim: OpacityAnim,
}

/// Opacity animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpacityAnim {
    /// Animate opacity
    pub enable: bool,
    /// Animation speed
    pub speed: f32,
    /// Lowest opacity reached
    pub opacity_min: f32,
    /// Animate every particle in phase
    pub sync: bool,
}

/// Size options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeConfig {
    /// Base size
    pub value: f32,
    /// Randomize per particle
    pub random: bool,
    /// Size animation
    pub anim: SizeAnim,
}

/// Size animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeAnim {
    /// Animate size
    pub enable: bool,
    /// Animation speed
    pub speed: f32,
    /// Smallest size reached
    pub size_min: f32,
    /// Animate every particle in phase
    pub sync: bool,
}

/// Linking lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineLinkedConfig {
    /// Draw lines
    pub enable: bool,
    /// Maximum link distance
    pub distance: f32,
    /// Line color
    pub color: String,
    /// Line opacity
    pub opacity: f32,
    /// Line width
    pub width: f32,
}

/// Motion options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveConfig {
    /// Move at all
    pub enable: bool,
    /// Base speed
    pub speed: f32,
    /// `none`, `top`, `bottom`, ...
    pub direction: String,
    /// Randomize speed
    pub random: bool,
    /// Keep heading fixed
    pub straight: bool,
    /// `out` wraps around the canvas, `bounce` reflects
    pub out_mode: String,
    /// Bounce off other particles
    pub bounce: bool,
    /// Attraction toward the center
    pub attract: AttractConfig,
}

/// Attraction options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractConfig {
    /// Attract
    pub enable: bool,
    /// Horizontal attraction radius
    #[serde(rename = "rotateX")]
    pub rotate_x: f32,
    /// Vertical attraction radius
    #[serde(rename = "rotateY")]
    pub rotate_y: f32,
}

impl Default for ParticlesSection {
    fn default() -> Self {
        Self {
            number: NumberConfig {
                value: 50,
                density: DensityConfig {
                    enable: true,
                    value_area: 800,
                },
            },
            color: ColorConfig::default(),
            shape: ShapeConfig {
                kind: ["circle", "edge", "triangle", "polygon"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                stroke: StrokeConfig {
                    width: 0.0,
                    color: "#000000".to_string(),
                },
                polygon: PolygonConfig { nb_sides: 5 },
            },
            opacity: OpacityConfig {
                value: 0.5,
                random: false,
                anim: OpacityAnim {
                    enable: false,
                    speed: 1.0,
                    opacity_min: 0.1,
                    sync: false,
                },
            },
            size: SizeConfig {
                value: 5.0,
                random: true,
                anim: SizeAnim {
                    enable: false,
                    speed: 80.0,
                    size_min: 0.1,
                    sync: false,
                },
            },
            line_linked: LineLinkedConfig {
                enable: true,
                distance: 300.0,
                color: "#ffffff".to_string(),
                opacity: 0.2,
                width: 2.0,
            },
            movement: MoveConfig {
                enable: true,
                speed: 2.0,
                direction: "none".to_string(),
                random: true,
                straight: false,
                out_mode: "out".to_string(),
                bounce: false,
                attract: AttractConfig {
                    enable: false,
                    rotate_x: 600.0,
                    rotate_y: 1200.0,
                },
            },
        }
    }
}

impl ParticleConfig {
    /// Copy of this config with the count and colors replaced
    pub fn with_overrides(&self, count: u32, colors: ColorValue) -> Self {
        let mut config = self.clone();
        config.particles.number.value = count;
        config.particles.color.value = colors;
        config
    }
}

/// Visualization mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualMode {
    /// Free movement reacting to intensity
    #[default]
    Particles,
    /// Particles stream upward in straight lines
    Wave,
    /// Particles orbit under attraction
    Circular,
    /// Opacity and size pulse in sync
    Pulse,
}

/// Menu entry for a mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeInfo {
    /// Stable id
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
}

impl VisualMode {
    /// Every mode, in menu order
    pub const ALL: [VisualMode; 4] = [
        VisualMode::Particles,
        VisualMode::Wave,
        VisualMode::Circular,
        VisualMode::Pulse,
    ];

    /// Look up a mode by id, falling back to [`VisualMode::Particles`]
    pub fn from_id(id: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|mode| mode.id().eq_ignore_ascii_case(id.trim()))
            .unwrap_or_default()
    }

    /// Stable lowercase id
    pub fn id(self) -> &'static str {
        match self {
            VisualMode::Particles => "particles",
            VisualMode::Wave => "wave",
            VisualMode::Circular => "circular",
            VisualMode::Pulse => "pulse",
        }
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            VisualMode::Particles => "Particles Dance",
            VisualMode::Wave => "Wave Form",
            VisualMode::Circular => "Circular Motion",
            VisualMode::Pulse => "Pulse",
        }
    }

    /// One-line description
    pub fn description(self) -> &'static str {
        match self {
            VisualMode::Particles => "Particles move and react to the music's intensity",
            VisualMode::Wave => "Particles move in a wave pattern synced to the music",
            VisualMode::Circular => "Particles orbit around a central point, reacting to the music",
            VisualMode::Pulse => "Particles pulse with the beat of the music",
        }
    }

    /// Menu entry
    pub fn info(self) -> ModeInfo {
        ModeInfo {
            id: self.id(),
            name: self.name(),
            description: self.description(),
        }
    }

    /// Configuration preset for this mode
    pub fn preset(self) -> ParticleConfig {
        let mut config = ParticleConfig::default();
        let particles = &mut config.particles;

        match self {
            VisualMode::Particles => {}
            VisualMode::Wave => {
                particles.movement.direction = "top".to_string();
                particles.movement.straight = true;
            }
            VisualMode::Circular => {
                particles.movement.random = false;
                particles.movement.attract.enable = true;
            }
            VisualMode::Pulse => {
                particles.opacity.random = true;
                particles.opacity.anim = OpacityAnim {
                    enable: true,
                    speed: 1.0,
                    opacity_min: 0.1,
                    sync: true,
                };
                particles.size.anim = SizeAnim {
                    enable: true,
                    speed: 40.0,
                    size_min: 0.1,
                    sync: true,
                };
            }
        }

        config
    }
}

impl fmt::Display for VisualMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Menu entries for every mode
pub fn available_modes() -> Vec<ModeInfo> {
    VisualMode::ALL.into_iter().map(VisualMode::info).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_mode_falls_back_to_particles() {
        assert_eq!(VisualMode::from_id("wave"), VisualMode::Wave);
        assert_eq!(VisualMode::from_id("Pulse"), VisualMode::Pulse);
        assert_eq!(VisualMode::from_id("spiral"), VisualMode::Particles);
    }

    #[test]
    fn presets_differ_only_where_expected() {
        let base = VisualMode::Particles.preset();

        let wave = VisualMode::Wave.preset();
        assert_eq!(wave.particles.movement.direction, "top");
        assert!(wave.particles.movement.straight);
        assert_eq!(wave.particles.opacity, base.particles.opacity);

        let circular = VisualMode::Circular.preset();
        assert!(circular.particles.movement.attract.enable);
        assert!(!circular.particles.movement.random);

        let pulse = VisualMode::Pulse.preset();
        assert!(pulse.particles.opacity.anim.sync);
        assert_eq!(pulse.particles.size.anim.speed, 40.0);
        assert_eq!(pulse.particles.movement, base.particles.movement);
    }

    #[test]
    fn config_serializes_in_renderer_shape() {
        let config = VisualMode::Circular
            .preset()
            .with_overrides(80, ColorValue::Many(vec!["#ff00ff".into(), "#00ffff".into()]));
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["particles"]["number"]["value"], 80);
        assert_eq!(json["particles"]["color"]["value"][1], "#00ffff");
        assert_eq!(json["particles"]["move"]["attract"]["rotateX"], 600.0);
        assert_eq!(json["particles"]["shape"]["type"][0], "circle");

        let back: ParticleConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn single_color_serializes_as_string() {
        let json = serde_json::to_value(ColorValue::Single("#abcdef".into())).unwrap();
        assert_eq!(json, "#abcdef");
    }

    #[test]
    fn lists_all_modes() {
        let modes = available_modes();
        assert_eq!(modes.len(), 4);
        assert_eq!(modes[2].name, "Circular Motion");
    }
}
