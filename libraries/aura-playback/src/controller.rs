//! Playback controller - transport orchestration
//!
//! Owns one audio-graph session and drives it through play, pause, stop,
//! seek and track changes. Sources are one-shot: every transition into
//! playing tears down the previous source and creates a fresh one.

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    playlist::Playlist,
    types::{PlaybackConfig, PlaybackState, Timing},
    volume::{format_persisted_volume, parse_persisted_volume, AudioControls},
};
use aura_core::{
    time::percentage_to_time, AudioDecoder, AudioGraph, CoreError, DecodedAudio, KeyValueStore,
    SourceId, SpectrumSource, TrackFetcher, TrackRef,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Platform collaborators used for loading tracks and persisting volume
pub struct Collaborators {
    /// Fetches encoded bytes for URL tracks
    pub fetcher: Arc<dyn TrackFetcher>,

    /// Decodes encoded bytes into PCM
    pub decoder: Arc<dyn AudioDecoder>,

    /// Keyed storage holding the persisted volume
    pub store: Box<dyn KeyValueStore>,
}

/// Cloneable handle that disposes a controller from elsewhere
///
/// Flipping the flag does not touch the graph by itself: a load that is in
/// flight discards its result when it completes, and the controller's next
/// call stops the source and closes the graph.
#[derive(Debug, Clone)]
pub struct Disposer {
    alive: Arc<AtomicBool>,
}

impl Disposer {
    /// Mark the controller as disposed
    pub fn dispose(&self) {
        self.alive.store(false, Ordering::Release);
    }

    /// Whether the controller has been disposed
    pub fn is_disposed(&self) -> bool {
        !self.alive.load(Ordering::Acquire)
    }
}

/// What to do with transport once a load completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartPolicy {
    /// Only install the buffer
    Never,
    /// Start from 0 unless the user stopped playback
    IfActive,
    /// Start from 0 unconditionally (user upload)
    Always,
}

/// Central playback control
///
/// Orchestrates:
/// - Transport state machine (Stopped, Playing, Paused)
/// - Pause/resume/seek timing offsets against the audio clock
/// - Wrapping playlist with an uploaded-file override
/// - Volume, mute and loop, with the volume persisted on every change
/// - The per-frame frequency snapshot handed to the animator
pub struct PlaybackController<G: AudioGraph> {
    // Audio session
    graph: G,
    active_source: Option<SourceId>,
    buffer: Option<DecodedAudio>,
    loaded_index: Option<usize>,

    // Collaborators
    fetcher: Arc<dyn TrackFetcher>,
    decoder: Arc<dyn AudioDecoder>,
    store: Box<dyn KeyValueStore>,
    config: PlaybackConfig,

    // Transport
    state: PlaybackState,
    timing: Timing,
    playlist: Playlist,
    controls: AudioControls,

    // Analyser output, refreshed in place every frame
    snapshot: Vec<u8>,

    // Lifecycle
    alive: Arc<AtomicBool>,
    closed: bool,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl<G: AudioGraph> PlaybackController<G> {
    /// Create a new controller
    ///
    /// Loads the persisted volume (falling back to the configured default)
    /// and writes it to the gain node. No track is loaded yet; the first
    /// `play()` loads the current playlist entry.
    pub fn new(
        mut graph: G,
        collaborators: Collaborators,
        playlist: Playlist,
        config: PlaybackConfig,
    ) -> Self {
        let Collaborators {
            fetcher,
            decoder,
            store,
        } = collaborators;

        let volume = match store.get(&config.volume_key) {
            Ok(Some(raw)) => parse_persisted_volume(&raw).unwrap_or(config.default_volume),
            Ok(None) => config.default_volume,
            Err(e) => {
                warn!("Failed to read persisted volume: {}", e);
                config.default_volume
            }
        };

        let mut controls = AudioControls::new(volume);
        controls.set_looping(config.looping);
        graph.set_gain(controls.gain());

        let snapshot = vec![0; graph.frequency_bin_count()];

        debug!(
            "Playback controller ready: {} tracks, volume {:.2}, {} analyser bins",
            playlist.len(),
            controls.volume(),
            snapshot.len()
        );

        Self {
            graph,
            active_source: None,
            buffer: None,
            loaded_index: None,
            fetcher,
            decoder,
            store,
            config,
            state: PlaybackState::Stopped,
            timing: Timing::default(),
            playlist,
            controls,
            snapshot,
            alive: Arc::new(AtomicBool::new(true)),
            closed: false,
            pending_events: Vec::new(),
        }
    }

    // ===== Playback Control =====

    /// Start or resume playback
    ///
    /// Idempotent while playing. Resumes a suspended device first and loads
    /// the current track if nothing is loaded. Failures leave the transport
    /// where it was and surface as events.
    ///
    /// Returns whether audio is playing afterwards.
    pub async fn play(&mut self) -> bool {
        if !self.ensure_alive() {
            return false;
        }

        if self.state == PlaybackState::Playing {
            debug!("play() while already playing; ignoring");
            return true;
        }

        if !self.ensure_device_running() {
            return false;
        }

        if self.buffer.is_none() {
            let Some(track) = self.playlist.current().cloned() else {
                warn!("play() with an empty playlist");
                self.emit(PlaybackEvent::PlaybackFailed {
                    message: PlaybackError::PlaylistEmpty.to_string(),
                });
                return false;
            };
            let index = if self.playlist.override_file().is_some() {
                None
            } else {
                Some(self.playlist.current_index())
            };

            if !self.load(track, index, StartPolicy::Never).await {
                return false;
            }
        }

        let offset = if self.state == PlaybackState::Paused {
            self.timing.resume_offset()
        } else {
            0.0
        };

        self.start_at(offset)
    }

    /// Pause playback
    ///
    /// The one-shot source is destroyed; resuming creates a new one at the
    /// paused offset.
    pub fn pause(&mut self) {
        if !self.ensure_alive() || self.state != PlaybackState::Playing {
            return;
        }

        self.teardown_source();
        self.timing.paused_at = self.graph.current_time();
        self.set_state(PlaybackState::Paused);
    }

    /// Toggle between playing and paused
    pub async fn toggle_play_pause(&mut self) -> bool {
        if self.state == PlaybackState::Playing {
            self.pause();
            false
        } else {
            self.play().await
        }
    }

    /// Stop playback
    ///
    /// Stops and clears the source and resets both timestamps, from any state.
    /// The loaded buffer is kept.
    pub fn stop(&mut self) {
        if !self.ensure_alive() {
            return;
        }

        self.teardown_source();
        self.timing = Timing::default();
        self.set_state(PlaybackState::Stopped);
    }

    // ===== Seek =====

    /// Seek to `time` seconds in the current track
    ///
    /// Clamped to `[0, duration]`. Keeps playing if playing; otherwise enters
    /// Paused so that the next `play()` resumes at the new position. No-op
    /// when no track is loaded.
    pub fn seek(&mut self, time: f64) {
        if !self.ensure_alive() {
            return;
        }

        let Some(duration) = self.buffer.as_ref().map(DecodedAudio::duration_secs) else {
            debug!("seek() with no track loaded; ignoring");
            return;
        };

        let target = if time.is_nan() {
            0.0
        } else {
            time.clamp(0.0, duration)
        };

        if self.state == PlaybackState::Playing {
            self.start_at(target);
        } else {
            self.teardown_source();
            let now = self.graph.current_time();
            self.timing = Timing {
                start_time: now - target,
                paused_at: now,
            };
            self.set_state(PlaybackState::Paused);
        }
    }

    /// Seek by percentage (0-100) of the current track
    pub fn seek_percent(&mut self, percent: f64) {
        if let Some(duration) = self.duration() {
            self.seek(percentage_to_time(percent.clamp(0.0, 100.0), duration));
        }
    }

    // ===== Track End =====

    /// Drain end-of-track notifications from the graph and react to them
    pub async fn poll_ended(&mut self) {
        if !self.ensure_alive() {
            return;
        }

        for id in self.graph.take_ended() {
            self.handle_source_end(id).await;
        }
    }

    /// React to a source playing to its end
    ///
    /// Stale ids (sources stopped by pause, seek or stop) are ignored. With
    /// looping the same buffer replays; otherwise the playlist advances
    /// (ignoring any uploaded-file override) and the next track autoplays.
    pub async fn handle_source_end(&mut self, id: SourceId) {
        if !self.ensure_alive() {
            return;
        }

        if self.active_source != Some(id) {
            debug!("Ignoring end of stale {}", id);
            return;
        }
        self.active_source = None;

        if self.state != PlaybackState::Playing {
            return;
        }

        if self.controls.is_looping() {
            debug!("Track ended; looping");
            self.start_at(0.0);
            return;
        }

        let Some(next) = self.playlist.next() else {
            self.stop();
            return;
        };

        info!("Track ended; advancing to playlist index {}", next);
        if !self.load_track(next, true).await {
            self.stop();
        }
    }

    // ===== Track Loading =====

    /// Load the playlist entry at `index`
    ///
    /// On success the decoded buffer replaces the current one and the
    /// playlist cursor moves to `index`. With `autoplay`, playback restarts
    /// from the beginning of the new track unless the user stopped playback.
    /// Without it, a running source is stopped so audio never outlives its
    /// buffer.
    ///
    /// Failures are logged and queued as [`PlaybackEvent::LoadFailed`];
    /// returns whether the track loaded.
    pub async fn load_track(&mut self, index: usize, autoplay: bool) -> bool {
        if !self.ensure_alive() {
            return false;
        }

        let Some(track) = self.playlist.get(index).cloned() else {
            let err = PlaybackError::IndexOutOfBounds(index);
            warn!("Cannot load track: {}", err);
            self.emit(PlaybackEvent::LoadFailed {
                name: format!("track {}", index),
                message: err.to_string(),
            });
            return false;
        };

        let policy = if autoplay {
            StartPolicy::IfActive
        } else {
            StartPolicy::Never
        };
        self.load(track, Some(index), policy).await
    }

    /// Advance to the next playlist entry (wrapping) and autoplay it
    pub async fn next_track(&mut self) -> bool {
        if !self.ensure_alive() {
            return false;
        }
        match self.playlist.next() {
            Some(index) => self.load_track(index, true).await,
            None => self.report_empty_playlist(),
        }
    }

    /// Go back to the previous playlist entry (wrapping) and autoplay it
    pub async fn previous_track(&mut self) -> bool {
        if !self.ensure_alive() {
            return false;
        }
        match self.playlist.prev() {
            Some(index) => self.load_track(index, true).await,
            None => self.report_empty_playlist(),
        }
    }

    /// Play a user-supplied file
    ///
    /// The file becomes the playlist override and starts playing from the
    /// beginning once decoded.
    pub async fn upload_file(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> bool {
        if !self.ensure_alive() {
            return false;
        }

        let track = TrackRef::file(name, bytes);
        self.playlist.set_override(track.clone());
        self.load(track, None, StartPolicy::Always).await
    }

    /// Remove the uploaded-file override
    ///
    /// Returns whether an override was set.
    pub fn clear_uploaded_file(&mut self) -> bool {
        self.playlist.clear_override().is_some()
    }

    async fn load(&mut self, track: TrackRef, index: Option<usize>, policy: StartPolicy) -> bool {
        let name = track.display_name();
        info!("Loading track: {}", name);

        let alive = Arc::clone(&self.alive);
        let result =
            fetch_and_decode(Arc::clone(&self.fetcher), Arc::clone(&self.decoder), &track).await;

        if !alive.load(Ordering::Acquire) {
            debug!("Controller disposed while loading {}; discarding", name);
            self.ensure_alive();
            return false;
        }

        match result {
            Ok(audio) => {
                self.install(audio, index, name, policy);
                true
            }
            Err(e) => {
                error!("Error loading track {}: {}", name, e);
                self.emit(PlaybackEvent::LoadFailed {
                    name,
                    message: e.to_string(),
                });
                false
            }
        }
    }

    fn install(
        &mut self,
        audio: DecodedAudio,
        index: Option<usize>,
        name: String,
        policy: StartPolicy,
    ) {
        let duration_secs = audio.duration_secs();
        if let Some(index) = index {
            self.playlist.set_current(index);
        }
        self.buffer = Some(audio);
        self.loaded_index = index;

        info!("Loaded {} ({:.1}s)", name, duration_secs);
        self.emit(PlaybackEvent::TrackLoaded {
            index,
            name,
            duration_secs,
        });

        let start = match policy {
            StartPolicy::Never => false,
            StartPolicy::IfActive => self.state != PlaybackState::Stopped,
            StartPolicy::Always => true,
        };

        if start {
            if self.ensure_device_running() {
                self.start_at(0.0);
            }
        } else if self.state != PlaybackState::Stopped {
            self.stop();
        }
    }

    fn report_empty_playlist(&mut self) -> bool {
        warn!("Track navigation with an empty playlist");
        self.emit(PlaybackEvent::PlaybackFailed {
            message: PlaybackError::PlaylistEmpty.to_string(),
        });
        false
    }

    // ===== Volume =====

    /// Set volume (0.0 - 1.0, clamped)
    pub fn set_volume(&mut self, volume: f32) {
        if !self.ensure_alive() {
            return;
        }
        self.controls.set_volume(volume);
        self.apply_volume();
    }

    /// Get current volume
    pub fn volume(&self) -> f32 {
        self.controls.volume()
    }

    /// Mute audio
    pub fn mute(&mut self) {
        if !self.ensure_alive() {
            return;
        }
        self.controls.mute();
        self.apply_volume();
    }

    /// Unmute audio
    pub fn unmute(&mut self) {
        if !self.ensure_alive() {
            return;
        }
        self.controls.unmute();
        self.apply_volume();
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        if !self.ensure_alive() {
            return;
        }
        self.controls.toggle_mute();
        self.apply_volume();
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.controls.is_muted()
    }

    /// Write the volume through the gain node and mirror it into storage
    ///
    /// A mute is stored as `0`: a controller created after quitting while
    /// muted starts at volume 0 and the pre-mute level is gone.
    fn apply_volume(&mut self) {
        self.graph.set_gain(self.controls.gain());

        let raw = format_persisted_volume(self.controls.volume());
        if let Err(e) = self.store.set(&self.config.volume_key, &raw) {
            warn!("Failed to persist volume: {}", e);
        }

        self.emit(PlaybackEvent::VolumeChanged {
            volume: self.controls.volume(),
            is_muted: self.controls.is_muted(),
        });
    }

    // ===== Loop =====

    /// Set loop flag
    pub fn set_looping(&mut self, looping: bool) {
        if self.controls.is_looping() == looping {
            return;
        }
        self.controls.set_looping(looping);
        self.emit(PlaybackEvent::LoopChanged { looping });
    }

    /// Toggle loop flag, returning the new value
    pub fn toggle_loop(&mut self) -> bool {
        let looping = !self.controls.is_looping();
        self.set_looping(looping);
        looping
    }

    // ===== State Queries =====

    /// Get current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Audio-clock timestamps of the current segment
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Volume, mute and loop state
    pub fn controls(&self) -> &AudioControls {
        &self.controls
    }

    /// Playlist
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Mutable playlist (adding tracks from the UI)
    pub fn playlist_mut(&mut self) -> &mut Playlist {
        &mut self.playlist
    }

    /// Playlist index of the loaded buffer (`None` for an upload or nothing)
    pub fn loaded_index(&self) -> Option<usize> {
        self.loaded_index
    }

    /// Whether a decoded buffer is loaded
    pub fn has_track(&self) -> bool {
        self.buffer.is_some()
    }

    /// Duration of the loaded track in seconds
    pub fn duration(&self) -> Option<f64> {
        self.buffer.as_ref().map(DecodedAudio::duration_secs)
    }

    /// Position in the current track in seconds
    pub fn current_position(&self) -> f64 {
        let position = match self.state {
            PlaybackState::Playing => self.graph.current_time() - self.timing.start_time,
            PlaybackState::Paused => self.timing.resume_offset(),
            PlaybackState::Stopped => 0.0,
        };
        position.clamp(0.0, self.duration().unwrap_or(0.0))
    }

    /// Id of the one active source, if any
    pub fn active_source(&self) -> Option<SourceId> {
        self.active_source
    }

    /// Underlying audio graph
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Mutable access to the underlying audio graph
    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph
    }

    /// Handle for disposing this controller from another task
    pub fn disposer(&self) -> Disposer {
        Disposer {
            alive: Arc::clone(&self.alive),
        }
    }

    /// Whether the controller is still usable
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    // ===== Analysis =====

    /// The snapshot produced by the last `frequency_snapshot()` call
    pub fn last_snapshot(&self) -> &[u8] {
        &self.snapshot
    }

    /// Mean of the last snapshot normalized to 0.0 - 1.0
    pub fn average_audio_level(&self) -> f32 {
        if self.snapshot.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.snapshot.iter().map(|&v| u64::from(v)).sum();
        sum as f32 / (self.snapshot.len() as f32 * 255.0)
    }

    // ===== Events =====

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Lifecycle =====

    /// Stop and disconnect the source and close the graph
    ///
    /// Every method is a no-op afterwards. A load in flight discards its
    /// result when it completes.
    pub fn dispose(&mut self) {
        self.alive.store(false, Ordering::Release);
        self.ensure_alive();
    }

    // ===== Internals =====

    /// Returns whether the controller is alive, finishing teardown once if
    /// it was disposed through a [`Disposer`]
    fn ensure_alive(&mut self) -> bool {
        if self.alive.load(Ordering::Acquire) {
            return true;
        }

        if !self.closed {
            self.teardown_source();
            self.graph.close();
            self.timing = Timing::default();
            self.state = PlaybackState::Stopped;
            self.closed = true;
            info!("Playback controller disposed");
        }
        false
    }

    fn ensure_device_running(&mut self) -> bool {
        if !self.graph.is_suspended() {
            return true;
        }

        match self.graph.resume() {
            Ok(()) => {
                debug!("Audio device resumed");
                true
            }
            Err(e) => {
                warn!("Audio device resume denied: {}", e);
                self.emit(PlaybackEvent::PlaybackFailed {
                    message: e.to_string(),
                });
                false
            }
        }
    }

    /// Tear down any source and start a fresh one at `offset`
    fn start_at(&mut self, offset: f64) -> bool {
        self.teardown_source();

        let Some(buffer) = self.buffer.as_ref() else {
            warn!("Cannot start playback: {}", PlaybackError::NoTrackLoaded);
            return false;
        };
        let offset = offset.clamp(0.0, buffer.duration_secs());

        match self.graph.start_source(buffer, offset) {
            Ok(id) => {
                let now = self.graph.current_time();
                self.active_source = Some(id);
                self.timing = Timing {
                    start_time: now - offset,
                    paused_at: 0.0,
                };
                debug!("Started {} at {:.3}s", id, offset);
                self.set_state(PlaybackState::Playing);
                true
            }
            Err(e) => {
                error!("Failed to start audio source: {}", e);
                self.timing = Timing::default();
                self.set_state(PlaybackState::Stopped);
                self.emit(PlaybackEvent::PlaybackFailed {
                    message: e.to_string(),
                });
                false
            }
        }
    }

    fn teardown_source(&mut self) {
        if let Some(id) = self.active_source.take() {
            self.graph.stop_source(id);
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!("Playback state {:?} -> {:?}", self.state, state);
            self.state = state;
            self.emit(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }
}

impl<G: AudioGraph> SpectrumSource for PlaybackController<G> {
    fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing && self.is_alive()
    }

    fn frequency_snapshot(&mut self) -> &[u8] {
        if self.is_alive() {
            let bins = self.graph.frequency_bin_count();
            if self.snapshot.len() != bins {
                self.snapshot.resize(bins, 0);
            }
            self.graph.fill_frequency_data(&mut self.snapshot);
        } else {
            self.snapshot.fill(0);
        }
        &self.snapshot
    }
}

async fn fetch_and_decode(
    fetcher: Arc<dyn TrackFetcher>,
    decoder: Arc<dyn AudioDecoder>,
    track: &TrackRef,
) -> Result<DecodedAudio> {
    let hint = track.extension_hint();
    let bytes: Arc<[u8]> = match track {
        TrackRef::Url(url) => fetcher.fetch(url).await?.into(),
        TrackRef::File { bytes, .. } => Arc::clone(bytes),
    };

    let audio = decoder.decode(bytes, hint.as_deref()).await?;
    if audio.is_empty() {
        return Err(CoreError::decode("decoded track contains no samples").into());
    }
    Ok(audio)
}
