//! In-memory particle host
//!
//! Seeds particles from a [`ParticleConfig`] inside a bounded canvas and
//! integrates their positions on every refresh. Headless hosts and tests use
//! it directly; a real renderer would draw the same set.

use crate::error::{Result, VisualizerError};
use crate::modes::{MoveConfig, ParticleConfig};
use crate::particle::{Particle, ParticleHost, ParticleSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use tracing::debug;

/// Particle host backed by a plain `Vec`
#[derive(Debug)]
pub struct ParticleField {
    width: f32,
    height: f32,
    rng: StdRng,
    set: Option<ParticleSet>,
    movement: Option<MoveConfig>,
    reinits: u64,
    refreshes: u64,
}

impl ParticleField {
    /// Create an uninitialized field of `width` x `height` pixels
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_rng(width, height, StdRng::from_entropy())
    }

    /// Create a field with a fixed random source
    pub fn with_rng(width: f32, height: f32, rng: StdRng) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            rng,
            set: None,
            movement: None,
            reinits: 0,
            refreshes: 0,
        }
    }

    /// Whether a set has been built
    pub fn is_initialized(&self) -> bool {
        self.set.is_some()
    }

    /// Read-only view of the live set
    pub fn particles(&self) -> Option<&ParticleSet> {
        self.set.as_ref()
    }

    /// Number of `reinit` calls so far
    pub fn reinit_count(&self) -> u64 {
        self.reinits
    }

    /// Number of `refresh` calls so far
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    fn seed_particle(&mut self, config: &ParticleConfig, colors: &[String]) -> Particle {
        let section = &config.particles;

        let x = self.rng.gen_range(0.0..self.width);
        let y = self.rng.gen_range(0.0..self.height);
        let radius = if section.size.random {
            self.rng.gen::<f32>() * section.size.value
        } else {
            section.size.value
        };
        let color = if colors.is_empty() {
            "#ffffff".to_string()
        } else {
            colors[self.rng.gen_range(0..colors.len())].clone()
        };

        let mut particle = Particle::new(x, y, radius, color);
        particle.opacity = if section.opacity.random {
            self.rng.gen::<f32>() * section.opacity.value
        } else {
            section.opacity.value
        };

        let (vx, vy) = self.initial_velocity(&section.movement);
        particle.vx = vx;
        particle.vy = vy;
        particle
    }

    fn initial_velocity(&mut self, movement: &MoveConfig) -> (f32, f32) {
        if !movement.enable {
            return (0.0, 0.0);
        }

        let speed = if movement.random {
            movement.speed * self.rng.gen::<f32>()
        } else {
            movement.speed
        };

        let heading = match movement.direction.as_str() {
            "top" => -TAU / 4.0,
            "bottom" => TAU / 4.0,
            "left" => TAU / 2.0,
            "right" => 0.0,
            _ => self.rng.gen_range(0.0..TAU),
        };
        let heading = if movement.straight {
            heading
        } else {
            heading + self.rng.gen_range(-0.5..0.5)
        };

        (speed * heading.cos(), speed * heading.sin())
    }
}

impl ParticleHost for ParticleField {
    fn reinit(&mut self, config: &ParticleConfig) {
        let colors = config.particles.color.value.to_vec();
        let count = config.particles.number.value as usize;

        let particles = (0..count)
            .map(|_| self.seed_particle(config, &colors))
            .collect();

        self.set = Some(ParticleSet {
            particles,
            colors,
            line_color: config.particles.line_linked.color.clone(),
        });
        self.movement = Some(config.particles.movement.clone());
        self.reinits += 1;

        debug!("Particle field reinitialized with {} particles", count);
    }

    fn live(&mut self) -> Result<&mut ParticleSet> {
        self.set.as_mut().ok_or(VisualizerError::NotInitialized)
    }

    fn refresh(&mut self) -> Result<()> {
        let (Some(set), Some(movement)) = (self.set.as_mut(), self.movement.as_ref()) else {
            return Err(VisualizerError::NotInitialized);
        };

        let (width, height) = (self.width, self.height);
        let (cx, cy) = (width / 2.0, height / 2.0);

        for particle in &mut set.particles {
            if movement.attract.enable {
                particle.vx -= (particle.x - cx) / (movement.attract.rotate_x * 1000.0);
                particle.vy -= (particle.y - cy) / (movement.attract.rotate_y * 1000.0);
            }

            particle.x += particle.vx;
            particle.y += particle.vy;

            if movement.out_mode == "bounce" {
                if particle.x < 0.0 || particle.x > width {
                    particle.vx = -particle.vx;
                    particle.x = particle.x.clamp(0.0, width);
                }
                if particle.y < 0.0 || particle.y > height {
                    particle.vy = -particle.vy;
                    particle.y = particle.y.clamp(0.0, height);
                }
            } else {
                let r = particle.radius.max(0.0);
                if particle.x - r > width {
                    particle.x = -r;
                } else if particle.x + r < 0.0 {
                    particle.x = width + r;
                }
                if particle.y - r > height {
                    particle.y = -r;
                } else if particle.y + r < 0.0 {
                    particle.y = height + r;
                }
            }
        }

        self.refreshes += 1;
        Ok(())
    }
}
