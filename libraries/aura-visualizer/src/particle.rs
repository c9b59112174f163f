//! Particles and the host that owns them
//!
//! The animator never creates or destroys particles. It borrows the host's
//! live set for one frame at a time and mutates particles in place; after a
//! reinit the previous set is gone, so nothing may hold on to it.

use crate::error::Result;
use crate::modes::ParticleConfig;
use serde::{Deserialize, Serialize};

/// One particle of the live set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Horizontal position (canvas pixels)
    pub x: f32,
    /// Vertical position (canvas pixels)
    pub y: f32,
    /// Horizontal velocity (pixels per refresh)
    pub vx: f32,
    /// Vertical velocity (pixels per refresh)
    pub vy: f32,
    /// Current radius
    pub radius: f32,
    /// Opacity (0.0 - 1.0)
    pub opacity: f32,
    /// Accumulated rotation; wrapping is the renderer's concern
    pub rotation: f32,
    /// Hex color
    pub color: String,
    /// Radius seen the first time the animator touched this particle
    pub base_radius: Option<f32>,
}

impl Particle {
    /// Create a resting particle
    pub fn new(x: f32, y: f32, radius: f32, color: impl Into<String>) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            radius,
            opacity: 1.0,
            rotation: 0.0,
            color: color.into(),
            base_radius: None,
        }
    }

    /// Restore the cached radius and zero the velocity
    pub fn reset(&mut self) {
        if let Some(base) = self.base_radius {
            self.radius = base;
        }
        self.vx = 0.0;
        self.vy = 0.0;
    }
}

/// Live particle collection plus the color config it was drawn with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleSet {
    /// Particles in draw order; group is `index % 4`
    pub particles: Vec<Particle>,

    /// Colors new particles are drawn from
    pub colors: Vec<String>,

    /// Color of the lines linking nearby particles
    pub line_color: String,
}

impl ParticleSet {
    /// Number of live particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Rendering collaborator that owns the live particle set
pub trait ParticleHost {
    /// Discard the current set and build a new one from `config`
    fn reinit(&mut self, config: &ParticleConfig);

    /// Borrow the live set for this frame
    ///
    /// # Errors
    /// Fails when the host has not been initialized
    fn live(&mut self) -> Result<&mut ParticleSet>;

    /// Redraw (and advance) the set
    ///
    /// # Errors
    /// Fails when the host has not been initialized
    fn refresh(&mut self) -> Result<()>;
}
