//! Software audio graph
//!
//! A native stand-in for a browser audio context: a clock that only runs
//! while the device is resumed, one active source at a time, a gain node,
//! and an analyser tapped after the gain. Sources end when the clock passes
//! their duration. An optional [`CpalSink`] makes the graph audible.

use crate::analyser::{FrequencyAnalyser, DEFAULT_FFT_SIZE};
use crate::clock::{Clock, SystemClock};
use crate::output::CpalSink;
use aura_core::{AudioGraph, CoreError, DecodedAudio, Result, SourceId};
use std::time::Duration;
use tracing::{debug, info, warn};

struct ActiveSource {
    id: SourceId,
    audio: DecodedAudio,
    /// Playback offset into the buffer at `started_at`
    offset: f64,
    /// Graph time when the source started
    started_at: f64,
}

impl ActiveSource {
    fn position(&self, now: f64) -> f64 {
        self.offset + (now - self.started_at).max(0.0)
    }

    fn has_ended(&self, now: f64) -> bool {
        self.position(now) >= self.audio.duration_secs()
    }
}

/// [`AudioGraph`] implemented in software
pub struct SoftwareGraph {
    clock: Box<dyn Clock>,

    // Graph time accumulated while resumed
    banked: Duration,
    resumed_at: Option<Duration>,
    closed: bool,

    source: Option<ActiveSource>,
    last_id: SourceId,
    ended: Vec<SourceId>,

    gain: f32,
    analyser: FrequencyAnalyser,
    window: Vec<f32>,

    sink: Option<CpalSink>,
    deny_resume: bool,
}

impl SoftwareGraph {
    /// Create a suspended graph on the system clock
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock::new()))
    }

    /// Create a suspended graph on `clock`
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        let analyser = FrequencyAnalyser::new(DEFAULT_FFT_SIZE);
        let fft_size = analyser.fft_size();
        Self {
            clock,
            banked: Duration::ZERO,
            resumed_at: None,
            closed: false,
            source: None,
            last_id: SourceId::new(0),
            ended: Vec::new(),
            gain: 1.0,
            analyser,
            window: vec![0.0; fft_size],
            sink: None,
            deny_resume: false,
        }
    }

    /// Route output to `sink`
    pub fn with_sink(mut self, sink: CpalSink) -> Self {
        sink.set_gain(self.gain);
        self.sink = Some(sink);
        self
    }

    /// Replace the analyser (e.g. a different FFT size)
    pub fn with_analyser(mut self, analyser: FrequencyAnalyser) -> Self {
        self.window = vec![0.0; analyser.fft_size()];
        self.analyser = analyser;
        self
    }

    /// Make every `resume()` fail, as a browser does before a user gesture
    pub fn deny_resume(mut self, deny: bool) -> Self {
        self.deny_resume = deny;
        self
    }

    /// Whether `close()` was called
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Playback position of the active source, if any
    pub fn source_position(&self) -> Option<f64> {
        let now = self.current_time();
        self.source.as_ref().map(|s| s.position(now))
    }

    /// Id of the active source, if any
    pub fn active_source(&self) -> Option<SourceId> {
        self.source.as_ref().map(|s| s.id)
    }

    fn now(&self) -> Duration {
        match self.resumed_at {
            Some(since) => self.banked + self.clock.elapsed().saturating_sub(since),
            None => self.banked,
        }
    }

    /// Move a finished source onto the ended list
    fn reap(&mut self) {
        let now = self.current_time();
        if self.source.as_ref().is_some_and(|s| s.has_ended(now)) {
            if let Some(source) = self.source.take() {
                debug!("Source {} reached its end", source.id);
                self.ended.push(source.id);
            }
        }
    }

    /// Mono mix of the `fft_size` samples leading up to the play head, after gain
    fn capture_window(&mut self) {
        self.window.fill(0.0);
        let now = self.current_time();
        let Some(source) = self.source.as_ref() else {
            return;
        };

        let rate = f64::from(source.audio.sample_rate().as_hz());
        let head = (source.position(now) * rate) as usize;
        let len = self.window.len();

        for (i, slot) in self.window.iter_mut().enumerate() {
            // Slot len-1 is the frame at the play head
            let back = len - 1 - i;
            if let Some(frame) = head.checked_sub(back) {
                *slot = source.audio.mono_frame(frame) * self.gain;
            }
        }
    }
}

impl Default for SoftwareGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SoftwareGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareGraph")
            .field("time", &self.current_time())
            .field("suspended", &self.is_suspended())
            .field("closed", &self.closed)
            .field("source", &self.active_source())
            .field("gain", &self.gain)
            .field("sink", &self.sink)
            .finish()
    }
}

impl AudioGraph for SoftwareGraph {
    fn current_time(&self) -> f64 {
        self.now().as_secs_f64()
    }

    fn is_suspended(&self) -> bool {
        self.resumed_at.is_none()
    }

    fn resume(&mut self) -> Result<()> {
        if self.closed {
            return Err(CoreError::device("audio graph is closed"));
        }
        if self.deny_resume {
            return Err(CoreError::device("resume not allowed"));
        }
        if self.resumed_at.is_none() {
            self.resumed_at = Some(self.clock.elapsed());
            debug!("Audio graph resumed");
        }
        Ok(())
    }

    fn start_source(&mut self, audio: &DecodedAudio, offset_secs: f64) -> Result<SourceId> {
        if self.closed {
            return Err(CoreError::device("audio graph is closed"));
        }

        if let Some(previous) = self.source.take() {
            debug!("Replacing source {}", previous.id);
        }

        let duration = audio.duration_secs();
        let offset = if offset_secs.is_finite() {
            offset_secs.clamp(0.0, duration)
        } else {
            0.0
        };

        self.last_id = self.last_id.next();
        let id = self.last_id;

        if let Some(sink) = &self.sink {
            let start_frame = (offset * f64::from(audio.sample_rate().as_hz())) as usize;
            sink.play(
                audio.shared_samples(),
                audio.channels(),
                audio.sample_rate().as_hz(),
                start_frame,
            )?;
        }

        self.source = Some(ActiveSource {
            id,
            audio: audio.clone(),
            offset,
            started_at: self.current_time(),
        });
        debug!("Started source {} at {:.2}s of {:.2}s", id, offset, duration);
        Ok(id)
    }

    fn stop_source(&mut self, id: SourceId) {
        if self.active_source() != Some(id) {
            return;
        }
        self.source = None;
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.stop() {
                warn!("Failed to stop output: {}", e);
            }
        }
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_gain(self.gain);
        }
    }

    fn gain(&self) -> f32 {
        self.gain
    }

    fn frequency_bin_count(&self) -> usize {
        self.analyser.bin_count()
    }

    fn fill_frequency_data(&mut self, out: &mut [u8]) {
        self.reap();
        self.capture_window();
        self.analyser.analyse(&self.window, out);
    }

    fn take_ended(&mut self) -> Vec<SourceId> {
        self.reap();
        std::mem::take(&mut self.ended)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.banked = self.now();
        self.resumed_at = None;
        self.source = None;
        self.ended.clear();
        if let Some(mut sink) = self.sink.take() {
            sink.shutdown();
        }
        self.closed = true;
        info!("Audio graph closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use aura_core::SampleRate;

    fn graph() -> (SoftwareGraph, ManualClock) {
        let clock = ManualClock::new();
        (SoftwareGraph::with_clock(Box::new(clock.clone())), clock)
    }

    fn tone(seconds: usize) -> DecodedAudio {
        let rate = 8000;
        let samples = (0..rate * seconds)
            .map(|i| (i as f32 * 0.3).sin() * 0.8)
            .collect();
        DecodedAudio::new(samples, SampleRate::new(rate as u32), 1)
    }

    #[test]
    fn clock_is_frozen_until_resumed() {
        let (mut graph, clock) = graph();
        assert!(graph.is_suspended());
        clock.advance_secs(3.0);
        assert_eq!(graph.current_time(), 0.0);

        graph.resume().unwrap();
        clock.advance_secs(2.0);
        assert!((graph.current_time() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn window_ends_at_play_head() {
        let (mut graph, clock) = graph();
        graph.resume().unwrap();
        graph.start_source(&tone(1), 0.0).unwrap();

        // Nothing has played yet: all but the last slot are before the start
        graph.capture_window();
        assert!(graph.window[..graph.window.len() - 1].iter().all(|&s| s == 0.0));

        clock.advance_secs(0.5);
        graph.capture_window();
        assert!(graph.window.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn gain_scales_the_analysed_signal() {
        let (mut graph, clock) = graph();
        graph.resume().unwrap();
        graph.start_source(&tone(1), 0.0).unwrap();
        clock.advance_secs(0.5);

        graph.set_gain(0.0);
        graph.capture_window();
        assert!(graph.window.iter().all(|&s| s == 0.0));
    }
}
