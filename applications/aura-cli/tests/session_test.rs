//! End-to-end session tests
//!
//! The graph runs on `TokioClock`, so a paused tokio runtime fast-forwards
//! both the frame loop and the audio clock.

use aura_cli::{read_upload, AuraConfig, CliError, Session, StopReason};
use aura_core::AudioGraph;
use aura_desktop::{SoftwareGraph, TokioClock};
use aura_playback::PlaybackState;
use std::path::{Path, PathBuf};

/// 16-bit mono PCM WAV of a 250 Hz sine
fn write_wav(path: &Path, sample_rate: u32, duration_secs: f32) {
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
        let sample = ((2.0 * std::f32::consts::PI * 250.0 * t).sin() * 24000.0) as i16;
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(path, bytes).unwrap();
}

fn config(dir: &Path, tracks: Vec<PathBuf>) -> AuraConfig {
    let mut config = AuraConfig::default();
    config.playback.tracks = tracks.iter().map(|p| p.display().to_string()).collect();
    config.playback.settings_file = Some(dir.join("settings.json"));
    config.audio.silent = true;
    config.display.fps = 20;
    config.visualizer.show_stats = true;
    config
}

fn session(config: &AuraConfig) -> Session<SoftwareGraph> {
    let graph = SoftwareGraph::with_clock(Box::new(TokioClock::new()));
    Session::with_graph(graph, config).unwrap()
}

#[tokio::test(start_paused = true)]
async fn plays_playlist_to_the_end() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("01.wav");
    let second = dir.path().join("02.wav");
    write_wav(&first, 8000, 0.5);
    write_wav(&second, 8000, 0.5);

    let config = config(dir.path(), vec![first, second]);
    let mut session = session(&config);

    assert!(session.start(None).await);
    assert_eq!(session.controller().state(), PlaybackState::Playing);
    assert_eq!(session.field().particles().unwrap().len(), 50);

    let summary = session.run(std::future::pending(), Some(1000)).await;

    assert_eq!(summary.reason, StopReason::PlaylistFinished);
    // 01, 02, then the wrap back to 01 that ends the run
    assert_eq!(summary.tracks_loaded, 3);
    assert!(summary.frames >= 15);
    assert!(summary.frames < 1000);
    assert!(session.controller().graph().is_closed());
    assert!(session.animator().is_disposed());
}

#[tokio::test(start_paused = true)]
async fn looping_runs_until_frame_limit() {
    let dir = tempfile::tempdir().unwrap();
    let track = dir.path().join("loop.wav");
    write_wav(&track, 8000, 0.25);

    let mut config = config(dir.path(), vec![track]);
    config.playback.looping = true;
    let mut session = session(&config);

    assert!(session.start(None).await);
    let summary = session.run(std::future::pending(), Some(40)).await;

    assert_eq!(summary.reason, StopReason::FrameLimit);
    assert_eq!(summary.frames, 40);
    assert_eq!(summary.tracks_loaded, 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_signal_interrupts() {
    let dir = tempfile::tempdir().unwrap();
    let track = dir.path().join("long.wav");
    write_wav(&track, 8000, 5.0);

    let config = config(dir.path(), vec![track]);
    let mut session = session(&config);
    assert!(session.start(None).await);

    let shutdown = tokio::time::sleep(std::time::Duration::from_millis(500));
    let summary = session.run(shutdown, None).await;

    assert_eq!(summary.reason, StopReason::Interrupted);
    assert!(summary.frames >= 9 && summary.frames <= 11, "{} frames", summary.frames);
    assert!(!session.controller().is_alive());
}

#[tokio::test(start_paused = true)]
async fn missing_track_does_not_start() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), vec![dir.path().join("missing.mp3")]);
    let mut session = session(&config);

    assert!(!session.start(None).await);
    assert_eq!(session.controller().state(), PlaybackState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn upload_plays_before_playlist() {
    let dir = tempfile::tempdir().unwrap();
    let upload = dir.path().join("upload.wav");
    write_wav(&upload, 8000, 0.5);

    let config = config(dir.path(), vec![]);
    let mut session = session(&config);

    let file = read_upload(&upload).unwrap();
    assert!(session.start(Some(file)).await);
    assert_eq!(session.controller().loaded_index(), None);
    assert!(session.controller().playlist().override_file().is_some());
}

#[tokio::test(start_paused = true)]
async fn volume_is_persisted_to_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let track = dir.path().join("01.wav");
    write_wav(&track, 8000, 0.5);
    let config = config(dir.path(), vec![track]);

    {
        let mut session = session(&config);
        session.controller_mut().set_volume(0.25);
    }

    let session = session(&config);
    assert_eq!(session.controller().volume(), 0.25);
    assert_eq!(session.controller().graph().gain(), 0.25);
}

#[test]
fn upload_rejects_non_audio() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "la la la").unwrap();

    assert!(matches!(read_upload(&notes), Err(CliError::NotAudio(_))));
}
