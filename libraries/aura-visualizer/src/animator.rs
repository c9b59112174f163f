//! Particle-reactive animator
//!
//! Once per display frame, while playback is playing, the animator pulls the
//! frequency snapshot, reduces it to band energies and nudges every particle
//! of the host's live set. It owns no particles: the host's set is borrowed
//! fresh each frame because a reinit replaces it.

use crate::analysis::{average_level, BandEnergies};
use crate::kinematics::{adjust_particle, Drive, GroupProfile, ReactiveTuning};
use crate::modes::{ColorValue, ParticleConfig, VisualMode};
use crate::palette::Palette;
use crate::particle::{Particle, ParticleHost};
use crate::settings::{SettingsPatch, VisualizerSettings};
use crate::stats::{FrameStats, StatsTracker};
use aura_core::SpectrumSource;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// What one loop iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The loop is stopped; do not reschedule
    Halted,
    /// Playback is not playing; nothing reacted
    Idle,
    /// The host was unavailable; the frame was dropped
    Skipped,
    /// Particles were updated
    Updated,
}

/// Drives the particle host from the audio spectrum
#[derive(Debug)]
pub struct Animator {
    settings: VisualizerSettings,
    tuning: ReactiveTuning,
    rng: StdRng,

    // Loop state
    running: bool,
    disposed: bool,

    // Diagnostics
    stats: StatsTracker,
    last_stats: Option<FrameStats>,
    last_energies: BandEnergies,
}

impl Animator {
    /// Create a stopped animator
    pub fn new(settings: VisualizerSettings) -> Self {
        Self::with_rng(settings, ReactiveTuning::default(), StdRng::from_entropy())
    }

    /// Create a stopped animator with explicit tuning and random source
    ///
    /// Tuning that fails [`ReactiveTuning::validate`] is logged and replaced
    /// by the defaults.
    pub fn with_rng(settings: VisualizerSettings, tuning: ReactiveTuning, rng: StdRng) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                warn!("{}; using default tuning", e);
                ReactiveTuning::default()
            }
        };
        Self {
            settings,
            tuning,
            rng,
            running: false,
            disposed: false,
            stats: StatsTracker::new(),
            last_stats: None,
            last_energies: BandEnergies::default(),
        }
    }

    /// Build the host's particle set from the current settings and start
    pub fn init<H: ParticleHost + ?Sized>(&mut self, host: &mut H) {
        if self.disposed {
            return;
        }
        host.reinit(&self.current_config());
        self.start();
    }

    // ===== Loop Control =====

    /// Start the frame loop
    pub fn start(&mut self) {
        if self.disposed {
            return;
        }
        self.running = true;
    }

    /// Stop the frame loop
    pub fn stop(&mut self) {
        self.running = false;
        self.stats.reset();
    }

    /// Whether frames are being processed
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Halt the loop permanently
    pub fn dispose(&mut self) {
        self.stop();
        self.disposed = true;
        info!("Animator disposed");
    }

    /// Whether `dispose` was called
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // ===== Frame =====

    /// Run one loop iteration at `timestamp_ms`
    ///
    /// Host failures are logged and drop the frame; they never stop the loop.
    pub fn frame<S, H>(&mut self, source: &mut S, host: &mut H, timestamp_ms: f64) -> FrameOutcome
    where
        S: SpectrumSource + ?Sized,
        H: ParticleHost + ?Sized,
    {
        if !self.running {
            return FrameOutcome::Halted;
        }

        if !source.is_playing() {
            if let Err(e) = host.refresh() {
                debug!("Idle refresh skipped: {}", e);
            }
            return FrameOutcome::Idle;
        }

        let snapshot = source.frequency_snapshot();

        let set = match host.live() {
            Ok(set) => set,
            Err(e) => {
                warn!("Skipping frame: {}", e);
                return FrameOutcome::Skipped;
            }
        };
        self.update_particles(snapshot, &mut set.particles);
        let particle_count = set.particles.len();

        if self.settings.show_stats {
            let stats = self
                .stats
                .record(timestamp_ms, particle_count, average_level(snapshot));
            debug!(
                "fps {:.1} | particles {} | level {:.2}",
                stats.fps, stats.particle_count, stats.audio_level
            );
            self.last_stats = Some(stats);
        }

        if let Err(e) = host.refresh() {
            warn!("Skipping frame: {}", e);
            return FrameOutcome::Skipped;
        }

        FrameOutcome::Updated
    }

    /// React every particle to one snapshot
    ///
    /// Particle `i` belongs to group `i % 4` (sub-bass, bass, mid, high).
    pub fn update_particles(&mut self, snapshot: &[u8], particles: &mut [Particle]) -> BandEnergies {
        let energies = BandEnergies::from_snapshot(snapshot);
        let overall = energies.overall();
        let beat = energies.beat_detected(self.tuning.beat_threshold);
        let sensitivity = self.settings.sensitivity;

        for (index, particle) in particles.iter_mut().enumerate() {
            let drive = Drive {
                energy: energies.for_group(index),
                overall,
                beat,
            };
            adjust_particle(
                particle,
                drive,
                GroupProfile::for_index(index),
                sensitivity,
                &self.tuning,
                &mut self.rng,
            );
        }

        self.last_energies = energies;
        energies
    }

    // ===== Modes & Settings =====

    /// Switch visualization mode and rebuild the particle set
    pub fn set_mode<H: ParticleHost + ?Sized>(&mut self, mode: VisualMode, host: &mut H) {
        if self.disposed {
            return;
        }
        info!("Switching visual mode to {}", mode);
        self.stop();
        self.settings.mode = mode;
        host.reinit(&self.current_config());
        self.start();
    }

    /// Merge a settings patch and rebuild the particle set
    pub fn update_settings<H: ParticleHost + ?Sized>(&mut self, patch: SettingsPatch, host: &mut H) {
        if self.disposed {
            return;
        }
        self.settings.apply(patch);
        host.reinit(&self.current_config());
    }

    /// Colors for the current color mode
    pub fn particle_colors(&self) -> ColorValue {
        self.settings.particle_colors()
    }

    /// Preset of the current mode with the particle count and colors applied
    pub fn current_config(&self) -> ParticleConfig {
        self.settings
            .mode
            .preset()
            .with_overrides(self.settings.particle_count, self.particle_colors())
    }

    /// Recolor the live set with a named palette (unknown names use neon)
    ///
    /// Particle `i` takes palette color `i % 5`; link lines take the first
    /// color. The next reinit reverts to the color mode's colors.
    pub fn set_color_palette<H: ParticleHost + ?Sized>(&mut self, name: &str, host: &mut H) -> Palette {
        let palette = Palette::from_name(name);
        let colors: Vec<String> = palette.colors().iter().map(|c| (*c).to_string()).collect();

        match host.live() {
            Ok(set) => {
                for (index, particle) in set.particles.iter_mut().enumerate() {
                    particle.color = colors[index % colors.len()].clone();
                }
                set.line_color = colors[0].clone();
                set.colors = colors;
            }
            Err(e) => {
                warn!("Cannot apply palette {}: {}", palette.id(), e);
                return palette;
            }
        }

        if let Err(e) = host.refresh() {
            warn!("Palette refresh failed: {}", e);
        }
        debug!("Applied palette {}", palette);
        palette
    }

    /// Restore cached base radii and zero velocities
    pub fn reset_particles<H: ParticleHost + ?Sized>(&mut self, host: &mut H) {
        match host.live() {
            Ok(set) => set.particles.iter_mut().for_each(Particle::reset),
            Err(e) => warn!("Cannot reset particles: {}", e),
        }
    }

    // ===== Accessors =====

    /// Current settings
    pub fn settings(&self) -> &VisualizerSettings {
        &self.settings
    }

    /// Current visualization mode
    pub fn mode(&self) -> VisualMode {
        self.settings.mode
    }

    /// Reaction gains
    pub fn tuning(&self) -> &ReactiveTuning {
        &self.tuning
    }

    /// Replace the reaction gains
    ///
    /// Invalid tuning is logged and the current gains are kept. Returns
    /// whether the new gains were applied.
    pub fn set_tuning(&mut self, tuning: ReactiveTuning) -> bool {
        match tuning.validate() {
            Ok(()) => {
                self.tuning = tuning;
                true
            }
            Err(e) => {
                warn!("{}; keeping current tuning", e);
                false
            }
        }
    }

    /// Stats of the last updated frame (only while stats are enabled)
    pub fn last_stats(&self) -> Option<FrameStats> {
        self.last_stats
    }

    /// Band energies of the last updated frame
    pub fn last_energies(&self) -> BandEnergies {
        self.last_energies
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(VisualizerSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animator() -> Animator {
        Animator::with_rng(
            VisualizerSettings::default(),
            ReactiveTuning::default(),
            StdRng::seed_from_u64(5),
        )
    }

    #[test]
    fn update_assigns_groups_by_index() {
        let mut animator = animator();
        let mut particles: Vec<Particle> = (0..8)
            .map(|_| Particle::new(0.0, 0.0, 0.0, "#ffffff"))
            .collect();

        // Silence below 60%, full scale above: only group 3 has energy
        let mut snapshot = vec![0u8; 100];
        snapshot[60..].fill(255);

        let energies = animator.update_particles(&snapshot, &mut particles);
        assert_eq!(energies.high, 1.0);
        assert_eq!(energies.sub_bass, 0.0);

        // group 0 eases toward its min size, group 3 toward its max
        assert!((particles[0].radius - 0.8).abs() < 1e-5);
        assert!((particles[3].radius - 1.0).abs() < 1e-5);
        assert!((particles[7].opacity - 1.0).abs() < 1e-6);
        assert!((particles[4].opacity - 0.3).abs() < 1e-6);
    }

    #[test]
    fn config_merges_settings_into_preset() {
        let mut animator = animator();
        animator.settings.particle_count = 80;
        animator.settings.mode = VisualMode::Wave;

        let config = animator.current_config();
        assert_eq!(config.particles.number.value, 80);
        assert_eq!(config.particles.movement.direction, "top");
        assert_eq!(config.particles.color.value.to_vec().len(), 5);
    }

    #[test]
    fn dispose_is_permanent() {
        let mut animator = animator();
        animator.start();
        animator.dispose();
        animator.start();
        assert!(!animator.is_running());
        assert!(animator.is_disposed());
    }
}
