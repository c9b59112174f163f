//! A visualizer session: playback controller, animator and particle field
//! driven by one frame loop

use crate::config::{has_audio_extension, AuraConfig};
use crate::error::{CliError, Result};
use aura_core::time::{format_duration, format_time};
use aura_core::{AudioGraph, KeyValueStore, MemoryStore};
use aura_desktop::{
    CpalSink, FrequencyAnalyser, HttpFetcher, JsonFileStore, SoftwareGraph, SymphoniaDecoder,
};
use aura_playback::{Collaborators, PlaybackController, PlaybackEvent, PlaybackState, Playlist};
use aura_visualizer::{Animator, FrameLoop, ParticleField};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Why the frame loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last playlist entry finished
    PlaylistFinished,
    /// Playback stopped on its own (e.g. the next track failed to load)
    PlaybackStopped,
    /// The shutdown signal fired
    Interrupted,
    /// The frame limit was reached
    FrameLimit,
}

/// Outcome of [`Session::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub tracks_loaded: usize,
    pub reason: StopReason,
}

pub struct Session<G: AudioGraph> {
    controller: PlaybackController<G>,
    animator: Animator,
    field: ParticleField,
    frames: FrameLoop,
    palette: Option<String>,
    repeat_playlist: bool,
    stats_every: u64,
    tracks_loaded: usize,
}

impl Session<SoftwareGraph> {
    /// Build a session on the native audio backend
    ///
    /// A missing output device is not fatal: the session runs silent.
    pub fn build(config: &AuraConfig) -> Result<Self> {
        let mut graph = SoftwareGraph::new().with_analyser(analyser(config));
        if !config.audio.silent {
            match CpalSink::new() {
                Ok(sink) => graph = graph.with_sink(sink),
                Err(e) => warn!("No audio output ({}); running silent", e),
            }
        }
        Self::with_graph(graph, config)
    }
}

impl<G: AudioGraph> Session<G> {
    /// Build a session around `graph` with native fetcher, decoder and store
    pub fn with_graph(graph: G, config: &AuraConfig) -> Result<Self> {
        let store: Box<dyn KeyValueStore> = match &config.playback.settings_file {
            Some(path) => Box::new(JsonFileStore::open(path)?),
            None => Box::new(MemoryStore::new()),
        };

        let collaborators = Collaborators {
            fetcher: Arc::new(HttpFetcher::new()),
            decoder: Arc::new(SymphoniaDecoder::new()),
            store,
        };

        let playlist = Playlist::from_urls(config.playable_tracks());
        let controller =
            PlaybackController::new(graph, collaborators, playlist, config.playback_config());

        let mut animator = Animator::new(config.visualizer.clone());
        animator.set_tuning(config.tuning);

        let fps = config.display.fps.max(1);
        Ok(Self {
            controller,
            animator,
            field: ParticleField::new(config.display.width, config.display.height),
            frames: FrameLoop::new(fps),
            palette: config.display.palette.clone(),
            repeat_playlist: config.playback.repeat_playlist,
            stats_every: u64::from(fps),
            tracks_loaded: 0,
        })
    }

    /// Playback controller
    pub fn controller(&self) -> &PlaybackController<G> {
        &self.controller
    }

    /// Mutable playback controller
    pub fn controller_mut(&mut self) -> &mut PlaybackController<G> {
        &mut self.controller
    }

    /// Animator
    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Particle field host
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Seed the particle field and start playback
    ///
    /// An uploaded file plays first; otherwise the first playlist entry.
    /// Returns whether audio is playing.
    pub async fn start(&mut self, upload: Option<(String, Vec<u8>)>) -> bool {
        self.animator.init(&mut self.field);
        if let Some(name) = self.palette.clone() {
            let palette = self.animator.set_color_palette(&name, &mut self.field);
            info!("Palette: {}", palette);
        }

        let playing = match upload {
            Some((name, bytes)) => self.controller.upload_file(name, bytes).await,
            None => self.controller.play().await,
        };
        self.report_events();
        playing
    }

    /// Run frames until the playlist finishes, playback stops, `shutdown`
    /// resolves or `max_frames` frames have run, then dispose everything
    pub async fn run<F>(&mut self, shutdown: F, max_frames: Option<u64>) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut frames = 0u64;

        let reason = loop {
            if max_frames.is_some_and(|max| frames >= max) {
                break StopReason::FrameLimit;
            }

            let tick = tokio::select! {
                () = &mut shutdown => None,
                timestamp = self.frames.tick() => Some(timestamp),
            };
            let Some(timestamp) = tick else {
                info!("Interrupted");
                break StopReason::Interrupted;
            };

            let before = self.controller.loaded_index();
            self.controller.poll_ended().await;
            self.animator
                .frame(&mut self.controller, &mut self.field, timestamp);
            frames += 1;

            let wrapped = self.report_events().into_iter().any(|index| {
                matches!((before, index), (Some(prev), Some(next)) if next <= prev)
            });

            if frames % self.stats_every == 0 {
                self.log_progress();
            }

            if wrapped && !self.repeat_playlist && !self.controller.controls().is_looping() {
                info!("Playlist finished");
                break StopReason::PlaylistFinished;
            }
            if self.controller.state() == PlaybackState::Stopped {
                break StopReason::PlaybackStopped;
            }
        };

        self.animator.dispose();
        self.controller.dispose();

        RunSummary {
            frames,
            tracks_loaded: self.tracks_loaded,
            reason,
        }
    }

    /// Log drained playback events; returns the playlist indices loaded
    fn report_events(&mut self) -> Vec<Option<usize>> {
        let mut loaded = Vec::new();
        for event in self.controller.drain_events() {
            if let Some(notice) = event.notice() {
                warn!("{}", notice);
                continue;
            }
            match event {
                PlaybackEvent::TrackLoaded {
                    index,
                    name,
                    duration_secs,
                } => {
                    info!("Now playing {} ({})", name, format_duration(duration_secs));
                    self.tracks_loaded += 1;
                    loaded.push(index);
                }
                other => debug!("{:?}", other),
            }
        }
        loaded
    }

    fn log_progress(&self) {
        let position = format_time(self.controller.current_position());
        let duration = format_time(self.controller.duration().unwrap_or(0.0));
        match self.animator.last_stats() {
            Some(stats) => info!(
                "{} / {} | fps {:.1} | particles {} | level {:.2}",
                position, duration, stats.fps, stats.particle_count, stats.audio_level
            ),
            None => debug!("{} / {}", position, duration),
        }
    }
}

/// Read a local file for upload, rejecting anything that is not audio
pub fn read_upload(path: &Path) -> Result<(String, Vec<u8>)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    if !has_audio_extension(&name) {
        return Err(CliError::NotAudio(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    Ok((name, bytes))
}

/// Analyser sized from the configuration
pub fn analyser(config: &AuraConfig) -> FrequencyAnalyser {
    let mut analyser = FrequencyAnalyser::new(config.audio.fft_size);
    analyser.set_smoothing(config.audio.smoothing);
    analyser
}
