//! Frame scheduling
//!
//! Each frame is scheduled only after the previous one has finished: the
//! next deadline is one frame interval after the start of the last frame,
//! and a late frame never queues catch-up frames behind it.

use crate::animator::{Animator, FrameOutcome};
use crate::particle::ParticleHost;
use aura_core::SpectrumSource;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Default display refresh rate
pub const DEFAULT_FPS: u32 = 60;

/// Per-frame scheduler
#[derive(Debug)]
pub struct FrameLoop {
    interval: Duration,
    origin: Instant,
    last_frame: Option<Instant>,
}

impl FrameLoop {
    /// Create a scheduler targeting `fps` frames per second (minimum 1)
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / fps.max(1),
            origin: Instant::now(),
            last_frame: None,
        }
    }

    /// Time between frame starts
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the next frame and return its timestamp in milliseconds
    /// since the loop was created
    pub async fn tick(&mut self) -> f64 {
        if let Some(last) = self.last_frame {
            sleep_until(last + self.interval).await;
        }
        let now = Instant::now();
        self.last_frame = Some(now);
        now.duration_since(self.origin).as_secs_f64() * 1000.0
    }

    /// Drive `animator` until it halts or `max_frames` frames have run
    ///
    /// Returns the number of frames that ran (the halting check excluded).
    pub async fn run<S, H>(
        &mut self,
        animator: &mut Animator,
        source: &mut S,
        host: &mut H,
        max_frames: Option<u64>,
    ) -> u64
    where
        S: SpectrumSource + ?Sized,
        H: ParticleHost + ?Sized,
    {
        let mut frames = 0;
        while max_frames.map_or(true, |max| frames < max) {
            let timestamp = self.tick().await;
            if animator.frame(source, host, timestamp) == FrameOutcome::Halted {
                break;
            }
            frames += 1;
        }
        frames
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}
