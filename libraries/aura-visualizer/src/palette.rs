//! Designer color palettes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Colors used by spectrum color mode
pub const SPECTRUM_COLORS: [&str; 5] = ["#FF6B6B", "#FFB067", "#FFE66D", "#4ECDC4", "#45B7D1"];

/// Named five-color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    /// Magenta, cyan, pink, purple, electric blue
    #[default]
    Neon,
    /// Coral through sky blue
    Sunset,
    /// Mint, green, peach, pink, coral
    Aurora,
    /// Hot pink and deep blues
    Retro,
    /// Purples and pinks
    Galaxy,
}

impl Palette {
    /// Every palette, in menu order
    pub const ALL: [Palette; 5] = [
        Palette::Neon,
        Palette::Sunset,
        Palette::Aurora,
        Palette::Retro,
        Palette::Galaxy,
    ];

    /// Look up a palette by id, falling back to [`Palette::Neon`]
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }

    /// Stable lowercase id
    pub fn id(self) -> &'static str {
        match self {
            Palette::Neon => "neon",
            Palette::Sunset => "sunset",
            Palette::Aurora => "aurora",
            Palette::Retro => "retro",
            Palette::Galaxy => "galaxy",
        }
    }

    /// Human-readable name
    pub fn display_name(self) -> &'static str {
        match self {
            Palette::Neon => "Neon Dreams",
            Palette::Sunset => "Sunset Vibes",
            Palette::Aurora => "Aurora Lights",
            Palette::Retro => "Retro Wave",
            Palette::Galaxy => "Galaxy",
        }
    }

    /// The five palette colors
    pub fn colors(self) -> &'static [&'static str; 5] {
        match self {
            Palette::Neon => &["#FF00FF", "#00FFFF", "#FF3F8C", "#7A04EB", "#0FF0FC"],
            Palette::Sunset => &SPECTRUM_COLORS,
            Palette::Aurora => &["#A8E6CF", "#DCEDC1", "#FFD3B6", "#FFAAA5", "#FF8B94"],
            Palette::Retro => &["#FF2A6D", "#05D9E8", "#005678", "#01012B", "#D1F7FF"],
            Palette::Galaxy => &["#5D12D2", "#B931FC", "#FF5EDC", "#FFA9F9", "#FFE5FF"],
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
