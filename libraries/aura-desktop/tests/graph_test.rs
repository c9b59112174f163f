//! Integration tests for the software audio graph
//!
//! Time is stepped by hand through `ManualClock`. The last tests drive a
//! full playback controller over the native collaborators.

use aura_core::{AudioGraph, DecodedAudio, MemoryStore, SampleRate, SpectrumSource};
use aura_desktop::{
    FrequencyAnalyser, HttpFetcher, ManualClock, SoftwareGraph, SymphoniaDecoder,
};
use aura_playback::{
    Collaborators, PlaybackConfig, PlaybackController, PlaybackEvent, PlaybackState, Playlist,
};
use std::sync::Arc;

// ===== Test Helpers =====

fn graph() -> (SoftwareGraph, ManualClock) {
    let clock = ManualClock::new();
    (SoftwareGraph::with_clock(Box::new(clock.clone())), clock)
}

fn running_graph() -> (SoftwareGraph, ManualClock) {
    let (mut graph, clock) = graph();
    graph.resume().unwrap();
    (graph, clock)
}

/// `seconds` of a 500 Hz sine at 8 kHz
fn tone(seconds: f32) -> DecodedAudio {
    let rate = 8000u32;
    let frames = (rate as f32 * seconds) as usize;
    let samples = (0..frames)
        .map(|i| (2.0 * std::f32::consts::PI * 500.0 * i as f32 / rate as f32).sin())
        .collect();
    DecodedAudio::new(samples, SampleRate::new(rate), 1)
}

/// 16-bit mono PCM WAV of a 300 Hz sine
fn wav_bytes(sample_rate: u32, duration_secs: f32) -> Vec<u8> {
    let frames = (sample_rate as f32 * duration_secs) as usize;
    let data_size = (frames * 2) as u32;

    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_size).to_le_bytes());
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_size.to_le_bytes());
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let sample = ((2.0 * std::f32::consts::PI * 300.0 * t).sin() * 20000.0) as i16;
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

// ===== Clock & Device =====

#[test]
fn starts_suspended() {
    let (graph, _clock) = graph();
    assert!(graph.is_suspended());
    assert_eq!(graph.current_time(), 0.0);
}

#[test]
fn denied_resume_stays_suspended() {
    let (graph, _clock) = graph();
    let mut graph = graph.deny_resume(true);
    assert!(graph.resume().is_err());
    assert!(graph.is_suspended());
}

#[test]
fn close_freezes_clock_and_rejects_sources() {
    let (mut graph, clock) = running_graph();
    clock.advance_secs(1.0);
    graph.close();
    clock.advance_secs(5.0);

    assert!(graph.is_closed());
    assert!((graph.current_time() - 1.0).abs() < 1e-9);
    assert!(graph.start_source(&tone(1.0), 0.0).is_err());
    assert!(graph.resume().is_err());
}

// ===== Sources =====

#[test]
fn source_ends_when_clock_passes_duration() {
    let (mut graph, clock) = running_graph();
    let id = graph.start_source(&tone(2.0), 0.5).unwrap();

    clock.advance_secs(1.0);
    assert!(graph.take_ended().is_empty());
    assert!((graph.source_position().unwrap() - 1.5).abs() < 1e-9);

    clock.advance_secs(0.6);
    assert_eq!(graph.take_ended(), vec![id]);
    assert!(graph.take_ended().is_empty());
    assert_eq!(graph.active_source(), None);
}

#[test]
fn ids_are_fresh_per_start() {
    let (mut graph, _clock) = running_graph();
    let audio = tone(1.0);
    let first = graph.start_source(&audio, 0.0).unwrap();
    let second = graph.start_source(&audio, 0.0).unwrap();

    assert!(second > first);
    assert_eq!(graph.active_source(), Some(second));
}

#[test]
fn stopping_a_stale_id_keeps_the_active_source() {
    let (mut graph, _clock) = running_graph();
    let audio = tone(1.0);
    let stale = graph.start_source(&audio, 0.0).unwrap();
    let active = graph.start_source(&audio, 0.0).unwrap();

    graph.stop_source(stale);
    assert_eq!(graph.active_source(), Some(active));

    graph.stop_source(active);
    assert_eq!(graph.active_source(), None);
}

#[test]
fn stopped_source_never_reports_ended() {
    let (mut graph, clock) = running_graph();
    let id = graph.start_source(&tone(1.0), 0.0).unwrap();
    graph.stop_source(id);
    clock.advance_secs(3.0);
    assert!(graph.take_ended().is_empty());
}

#[test]
fn offset_is_clamped_to_duration() {
    let (mut graph, _clock) = running_graph();
    graph.start_source(&tone(1.0), 7.0).unwrap();
    assert!((graph.source_position().unwrap() - 1.0).abs() < 1e-9);
}

// ===== Analyser =====

#[test]
fn bin_count_follows_analyser() {
    let (graph, _clock) = graph();
    assert_eq!(graph.frequency_bin_count(), 1024);

    let graph = graph.with_analyser(FrequencyAnalyser::new(512));
    assert_eq!(graph.frequency_bin_count(), 256);
}

#[test]
fn playing_tone_lights_up_spectrum() {
    let (mut graph, clock) = running_graph();
    let mut bins = vec![0u8; graph.frequency_bin_count()];

    graph.fill_frequency_data(&mut bins);
    assert!(bins.iter().all(|&b| b == 0));

    graph.start_source(&tone(2.0), 0.0).unwrap();
    clock.advance_secs(0.5);
    graph.fill_frequency_data(&mut bins);

    // 500 Hz at 8 kHz over 2048 points lands on bin 128
    let loudest = (0..bins.len()).max_by_key(|&i| bins[i]).unwrap();
    assert!((126..=130).contains(&loudest), "loudest bin {}", loudest);
}

#[test]
fn zero_gain_silences_analyser() {
    let (mut graph, clock) = running_graph();
    graph.set_gain(0.0);
    graph.start_source(&tone(2.0), 0.0).unwrap();
    clock.advance_secs(0.5);

    let mut bins = vec![0u8; graph.frequency_bin_count()];
    graph.fill_frequency_data(&mut bins);
    assert!(bins.iter().all(|&b| b == 0));
}

#[test]
fn gain_is_clamped() {
    let (mut graph, _clock) = graph();
    graph.set_gain(1.7);
    assert_eq!(graph.gain(), 1.0);
    graph.set_gain(-0.2);
    assert_eq!(graph.gain(), 0.0);
}

// ===== Controller over native collaborators =====

fn controller(
    graph: SoftwareGraph,
    urls: Vec<String>,
) -> PlaybackController<SoftwareGraph> {
    PlaybackController::new(
        graph,
        Collaborators {
            fetcher: Arc::new(HttpFetcher::new()),
            decoder: Arc::new(SymphoniaDecoder::new()),
            store: Box::new(MemoryStore::new()),
        },
        Playlist::from_urls(urls),
        PlaybackConfig::default(),
    )
}

#[tokio::test]
async fn controller_plays_local_files_and_advances() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("01.wav");
    let second = dir.path().join("02.wav");
    std::fs::write(&first, wav_bytes(8000, 1.0)).unwrap();
    std::fs::write(&second, wav_bytes(8000, 2.0)).unwrap();

    let (graph, clock) = graph();
    let mut controller = controller(
        graph,
        vec![
            first.display().to_string(),
            second.display().to_string(),
        ],
    );

    assert!(controller.play().await);
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(controller.duration(), Some(1.0));
    assert!(!controller.graph().is_suspended());

    clock.advance_secs(0.5);
    assert!(controller.is_playing());
    assert!(controller.frequency_snapshot().iter().any(|&b| b > 0));

    clock.advance_secs(0.6);
    controller.poll_ended().await;

    assert_eq!(controller.loaded_index(), Some(1));
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(controller.duration(), Some(2.0));
}

#[tokio::test]
async fn controller_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone.mp3");

    let (graph, _clock) = graph();
    let mut controller = controller(graph, vec![missing.display().to_string()]);

    assert!(!controller.play().await);
    assert_eq!(controller.state(), PlaybackState::Stopped);

    let events = controller.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, PlaybackEvent::LoadFailed { name, .. } if name == "gone.mp3")));
}

#[tokio::test]
async fn disposing_controller_closes_graph() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("01.wav");
    std::fs::write(&path, wav_bytes(8000, 1.0)).unwrap();

    let (graph, _clock) = graph();
    let mut controller = controller(graph, vec![path.display().to_string()]);
    controller.play().await;

    controller.dispose();
    assert!(controller.graph().is_closed());
    assert!(!controller.is_playing());
}
