/// Integration tests for the Symphonia decoder
///
/// WAV files are synthesized in memory so the tests need no fixtures.
use aura_core::AudioDecoder;
use aura_desktop::SymphoniaDecoder;
use std::sync::Arc;

/// Build a 16-bit PCM WAV holding a 440 Hz sine
fn wav_bytes(sample_rate: u32, duration_secs: f32, channels: u16) -> Vec<u8> {
    let num_samples = (sample_rate as f32 * duration_secs) as usize;
    let byte_rate = sample_rate * u32::from(channels) * 2;
    let block_align = channels * 2;
    let data_size = (num_samples * usize::from(channels) * 2) as u32;

    let mut bytes = Vec::with_capacity(44 + data_size as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_size).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&channels.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());

    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_size.to_le_bytes());

    for i in 0..num_samples {
        let t = i as f32 / sample_rate as f32;
        let sample = (2.0 * std::f32::consts::PI * 440.0 * t).sin();
        let sample = (sample * f32::from(i16::MAX)) as i16;
        for _ in 0..channels {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
    }
    bytes
}

#[test]
fn decodes_mono_wav() {
    let bytes: Arc<[u8]> = Arc::from(wav_bytes(8000, 1.0, 1));
    let audio = SymphoniaDecoder::decode_blocking(bytes, Some("wav")).unwrap();

    assert_eq!(audio.sample_rate().as_hz(), 8000);
    assert_eq!(audio.channels(), 1);
    assert_eq!(audio.frames(), 8000);
    assert!((audio.duration_secs() - 1.0).abs() < 1e-9);
}

#[test]
fn decodes_stereo_wav_interleaved() {
    let bytes: Arc<[u8]> = Arc::from(wav_bytes(22050, 0.5, 2));
    let audio = SymphoniaDecoder::decode_blocking(bytes, None).unwrap();

    assert_eq!(audio.channels(), 2);
    assert_eq!(audio.samples().len(), 22050);

    // Both channels carry the same signal
    for frame in audio.samples().chunks(2).take(200) {
        assert_eq!(frame[0], frame[1]);
    }
}

#[test]
fn samples_stay_in_range() {
    let bytes: Arc<[u8]> = Arc::from(wav_bytes(8000, 0.25, 1));
    let audio = SymphoniaDecoder::decode_blocking(bytes, Some("wav")).unwrap();

    assert!(audio.samples().iter().all(|s| (-1.0..=1.0).contains(s)));
    let peak = audio.samples().iter().fold(0.0f32, |m, s| m.max(s.abs()));
    assert!(peak > 0.9, "peak {} too low for a full-scale sine", peak);
}

#[test]
fn header_without_data_is_rejected() {
    let bytes: Arc<[u8]> = Arc::from(wav_bytes(8000, 0.0, 1));
    assert!(SymphoniaDecoder::decode_blocking(bytes, Some("wav")).is_err());
}

#[tokio::test]
async fn async_decode_runs_off_thread() {
    let decoder = SymphoniaDecoder::new();
    let bytes: Arc<[u8]> = Arc::from(wav_bytes(16000, 0.5, 1));

    let audio = decoder.decode(bytes, Some("wav")).await.unwrap();
    assert_eq!(audio.frames(), 8000);
}
