//! Per-particle reaction to band energy
//!
//! Velocity eases toward a random-signed target speed and is clamped; radius
//! eases toward a size picked from the particle group's range (bigger on a
//! beat for the low groups); opacity follows energy directly; rotation
//! accumulates.

use crate::analysis::DEFAULT_BEAT_THRESHOLD;
use crate::error::{Result, VisualizerError};
use crate::particle::Particle;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Gains of the energy-to-motion mapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactiveTuning {
    /// Target speed per unit of overall energy
    pub speed_gain: f32,
    /// Velocity smoothing factor per unit of sensitivity
    pub acceleration_gain: f32,
    /// Velocity clamp per unit of sensitivity
    pub velocity_gain: f32,
    /// Radius multiplier on a beat for pulsing groups
    pub pulse_factor: f32,
    /// Band energy that counts as a beat
    pub beat_threshold: f32,
    /// Fraction of the radius gap closed each frame
    pub radius_smoothing: f32,
    /// Opacity at zero energy
    pub opacity_base: f32,
    /// Opacity added at full energy
    pub opacity_scale: f32,
    /// Rotation added per unit of energy each frame
    pub rotation_gain: f32,
}

impl Default for ReactiveTuning {
    fn default() -> Self {
        Self {
            speed_gain: 3.0,
            acceleration_gain: 0.15,
            velocity_gain: 5.0,
            pulse_factor: 1.5,
            beat_threshold: DEFAULT_BEAT_THRESHOLD,
            radius_smoothing: 0.1,
            opacity_base: 0.3,
            opacity_scale: 0.7,
            rotation_gain: 2.0,
        }
    }
}

impl ReactiveTuning {
    /// Largest velocity component allowed at `sensitivity`
    pub fn max_velocity(&self, sensitivity: f32) -> f32 {
        self.velocity_gain * sensitivity
    }

    /// Check that every gain keeps motion bounded
    ///
    /// The velocity clamp needs a positive bound and radius easing only
    /// converges for a smoothing factor in (0, 1].
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("speed_gain", self.speed_gain),
            ("acceleration_gain", self.acceleration_gain),
            ("velocity_gain", self.velocity_gain),
            ("pulse_factor", self.pulse_factor),
            ("beat_threshold", self.beat_threshold),
            ("radius_smoothing", self.radius_smoothing),
            ("opacity_base", self.opacity_base),
            ("opacity_scale", self.opacity_scale),
            ("rotation_gain", self.rotation_gain),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(invalid(format!("{} must be finite, got {}", name, value)));
        }

        if self.velocity_gain <= 0.0 {
            return Err(invalid(format!(
                "velocity_gain must be positive, got {}",
                self.velocity_gain
            )));
        }
        if self.speed_gain < 0.0 {
            return Err(invalid(format!(
                "speed_gain must not be negative, got {}",
                self.speed_gain
            )));
        }
        if self.acceleration_gain < 0.0 {
            return Err(invalid(format!(
                "acceleration_gain must not be negative, got {}",
                self.acceleration_gain
            )));
        }
        if self.radius_smoothing <= 0.0 || self.radius_smoothing > 1.0 {
            return Err(invalid(format!(
                "radius_smoothing must be within (0, 1], got {}",
                self.radius_smoothing
            )));
        }
        if self.pulse_factor < 1.0 {
            return Err(invalid(format!(
                "pulse_factor must be at least 1, got {}",
                self.pulse_factor
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> VisualizerError {
    VisualizerError::InvalidTuning(msg)
}

/// Size range of one particle group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupProfile {
    /// Radius at full energy
    pub max_size: u8,
    /// Radius at zero energy
    pub min_size: u8,
    /// Whether radius jumps on a detected beat
    pub pulse_on_beat: bool,
}

/// Profiles for groups 0 (sub-bass) through 3 (high)
pub const GROUP_PROFILES: [GroupProfile; 4] = [
    GroupProfile {
        max_size: 30,
        min_size: 8,
        pulse_on_beat: true,
    },
    GroupProfile {
        max_size: 25,
        min_size: 6,
        pulse_on_beat: true,
    },
    GroupProfile {
        max_size: 15,
        min_size: 4,
        pulse_on_beat: false,
    },
    GroupProfile {
        max_size: 10,
        min_size: 2,
        pulse_on_beat: false,
    },
];

impl GroupProfile {
    /// Profile for the particle at `index`
    pub fn for_index(index: usize) -> Self {
        GROUP_PROFILES[index % GROUP_PROFILES.len()]
    }

    /// Largest radius a particle of this group is driven toward
    pub fn radius_bound(&self, tuning: &ReactiveTuning) -> f32 {
        let max = f32::from(self.max_size);
        if self.pulse_on_beat {
            max * tuning.pulse_factor.max(1.0)
        } else {
            max
        }
    }
}

/// Frame-wide inputs for one particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drive {
    /// Energy of the particle's band (0.0 - 1.0)
    pub energy: f32,
    /// Mean energy of all bands; sets the target speed
    pub overall: f32,
    /// Beat detected this frame
    pub beat: bool,
}

/// Apply one frame of reaction to `particle`
pub fn adjust_particle<R: Rng + ?Sized>(
    particle: &mut Particle,
    drive: Drive,
    profile: GroupProfile,
    sensitivity: f32,
    tuning: &ReactiveTuning,
    rng: &mut R,
) {
    if particle.base_radius.is_none() {
        particle.base_radius = Some(particle.radius);
    }

    let energy = drive.energy.clamp(0.0, 1.0);

    // Velocity: random-signed exponential smoothing toward the target speed
    let acceleration = tuning.acceleration_gain * sensitivity;
    let target_speed = drive.overall * tuning.speed_gain * sensitivity;
    particle.vx += rng.gen_range(-1.0f32..=1.0) * (target_speed - particle.vx.abs()) * acceleration;
    particle.vy += rng.gen_range(-1.0f32..=1.0) * (target_speed - particle.vy.abs()) * acceleration;

    let max_velocity = tuning.max_velocity(sensitivity);
    particle.vx = particle.vx.clamp(-max_velocity, max_velocity);
    particle.vy = particle.vy.clamp(-max_velocity, max_velocity);

    // Radius eases toward the group's energy-scaled size
    let min = f32::from(profile.min_size);
    let max = f32::from(profile.max_size);
    let mut target_radius = min + (max - min) * energy;
    if profile.pulse_on_beat && drive.beat {
        target_radius *= tuning.pulse_factor;
    }
    particle.radius += (target_radius - particle.radius) * tuning.radius_smoothing;

    particle.opacity = tuning.opacity_base + tuning.opacity_scale * energy;
    particle.rotation += energy * tuning.rotation_gain;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn drive(energy: f32, beat: bool) -> Drive {
        Drive {
            energy,
            overall: energy,
            beat,
        }
    }

    #[test]
    fn first_touch_caches_base_radius() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut particle = Particle::new(0.0, 0.0, 3.5, "#fff000");
        let tuning = ReactiveTuning::default();

        adjust_particle(&mut particle, drive(1.0, false), GROUP_PROFILES[0], 1.0, &tuning, &mut rng);
        adjust_particle(&mut particle, drive(1.0, false), GROUP_PROFILES[0], 1.0, &tuning, &mut rng);

        assert_eq!(particle.base_radius, Some(3.5));
    }

    #[test]
    fn radius_eases_instead_of_jumping() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut particle = Particle::new(0.0, 0.0, 8.0, "#ffffff");
        let tuning = ReactiveTuning::default();

        adjust_particle(&mut particle, drive(1.0, false), GROUP_PROFILES[0], 1.0, &tuning, &mut rng);

        // target 30, 10% of the gap from 8
        assert!((particle.radius - 10.2).abs() < 1e-5);
    }

    #[test]
    fn beat_pulses_low_groups_only() {
        let tuning = ReactiveTuning::default();
        let mut rng = StdRng::seed_from_u64(1);

        let mut low = Particle::new(0.0, 0.0, 0.0, "#ffffff");
        adjust_particle(&mut low, drive(1.0, true), GROUP_PROFILES[1], 1.0, &tuning, &mut rng);
        assert!((low.radius - 25.0 * 1.5 * 0.1).abs() < 1e-5);

        let mut high = Particle::new(0.0, 0.0, 0.0, "#ffffff");
        adjust_particle(&mut high, drive(1.0, true), GROUP_PROFILES[3], 1.0, &tuning, &mut rng);
        assert!((high.radius - 10.0 * 0.1).abs() < 1e-5);
    }

    #[test]
    fn opacity_and_rotation_follow_energy() {
        let tuning = ReactiveTuning::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut particle = Particle::new(0.0, 0.0, 5.0, "#ffffff");

        adjust_particle(&mut particle, drive(0.5, false), GROUP_PROFILES[2], 1.0, &tuning, &mut rng);
        assert!((particle.opacity - 0.65).abs() < 1e-6);
        assert!((particle.rotation - 1.0).abs() < 1e-6);

        adjust_particle(&mut particle, drive(0.5, false), GROUP_PROFILES[2], 1.0, &tuning, &mut rng);
        assert!((particle.rotation - 2.0).abs() < 1e-6);
    }

    #[test]
    fn velocity_is_clamped() {
        let tuning = ReactiveTuning::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut particle = Particle::new(0.0, 0.0, 5.0, "#ffffff");
        particle.vx = 40.0;
        particle.vy = -40.0;

        adjust_particle(&mut particle, drive(1.0, true), GROUP_PROFILES[0], 0.5, &tuning, &mut rng);

        assert!(particle.vx.abs() <= 2.5);
        assert!(particle.vy.abs() <= 2.5);
    }

    #[test]
    fn default_tuning_is_valid() {
        assert!(ReactiveTuning::default().validate().is_ok());
    }

    #[test]
    fn rejects_unbounded_tuning() {
        let cases = [
            ReactiveTuning { velocity_gain: -1.0, ..Default::default() },
            ReactiveTuning { velocity_gain: 0.0, ..Default::default() },
            ReactiveTuning { velocity_gain: f32::NAN, ..Default::default() },
            ReactiveTuning { speed_gain: -0.5, ..Default::default() },
            ReactiveTuning { acceleration_gain: -0.1, ..Default::default() },
            ReactiveTuning { radius_smoothing: 0.0, ..Default::default() },
            ReactiveTuning { radius_smoothing: 2.5, ..Default::default() },
            ReactiveTuning { pulse_factor: 0.5, ..Default::default() },
            ReactiveTuning { rotation_gain: f32::INFINITY, ..Default::default() },
        ];
        for tuning in cases {
            assert!(
                matches!(tuning.validate(), Err(VisualizerError::InvalidTuning(_))),
                "{:?}",
                tuning
            );
        }

        let edge = ReactiveTuning {
            radius_smoothing: 1.0,
            pulse_factor: 1.0,
            speed_gain: 0.0,
            acceleration_gain: 0.0,
            ..Default::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn profiles_cycle_by_index() {
        assert_eq!(GroupProfile::for_index(4), GROUP_PROFILES[0]);
        assert_eq!(GroupProfile::for_index(7), GROUP_PROFILES[3]);
        assert_eq!(GROUP_PROFILES[0].radius_bound(&ReactiveTuning::default()), 45.0);
        assert_eq!(GROUP_PROFILES[2].radius_bound(&ReactiveTuning::default()), 15.0);
    }
}
