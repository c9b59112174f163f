//! Symphonia-based decoder
//!
//! Decodes a complete in-memory file (MP3, FLAC, OGG, WAV, AAC, ...) into
//! interleaved f32 samples at the stream's native rate and channel count.

use async_trait::async_trait;
use aura_core::{AudioDecoder, CoreError, DecodedAudio, Result, SampleRate};
use std::io::Cursor;
use std::sync::Arc;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// [`AudioDecoder`] backed by Symphonia
///
/// Decoding is CPU-bound, so the async entry point moves the work onto
/// tokio's blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    /// Decode `bytes` on the calling thread
    ///
    /// `hint` is an optional file extension that helps the format probe.
    ///
    /// # Errors
    /// Returns an error if the bytes are not a supported audio file
    pub fn decode_blocking(bytes: Arc<[u8]>, hint: Option<&str>) -> Result<DecodedAudio> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

        let mut probe_hint = Hint::new();
        if let Some(ext) = hint {
            probe_hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &probe_hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| CoreError::decode(format!("Failed to probe stream: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| CoreError::decode("No audio tracks found"))?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate.unwrap_or(44100);
        let mut channels = track
            .codec_params
            .channels
            .map(|c| c.count() as u16)
            .unwrap_or(2);

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| CoreError::decode(format!("Failed to create decoder: {}", e)))?;

        let mut samples: Vec<f32> = Vec::new();
        let mut sample_buf: Option<SampleBuffer<f32>> = None;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => {
                    return Err(CoreError::decode(format!("Failed to read packet: {}", e)));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    // Corrupt frame; keep going
                    warn!("Skipping undecodable packet: {}", e);
                    continue;
                }
                Err(e) => return Err(CoreError::decode(e.to_string())),
            };

            let spec = *decoded.spec();
            sample_rate = spec.rate;
            channels = spec.channels.count() as u16;

            // Grow the scratch buffer when a packet outsizes it
            let needed = decoded.capacity() * spec.channels.count();
            if sample_buf.as_ref().map_or(true, |buf| buf.capacity() < needed) {
                sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
            }

            if let Some(buf) = sample_buf.as_mut() {
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
        }

        if samples.is_empty() {
            return Err(CoreError::decode("Stream contained no audio"));
        }

        debug!(
            "Decoded {} samples at {} Hz, {} channel(s)",
            samples.len(),
            sample_rate,
            channels
        );

        Ok(DecodedAudio::new(
            samples,
            SampleRate::new(sample_rate),
            channels.max(1),
        ))
    }
}

#[async_trait]
impl AudioDecoder for SymphoniaDecoder {
    async fn decode(&self, bytes: Arc<[u8]>, hint: Option<&str>) -> Result<DecodedAudio> {
        let hint = hint.map(str::to_owned);
        tokio::task::spawn_blocking(move || Self::decode_blocking(bytes, hint.as_deref()))
            .await
            .map_err(|e| CoreError::decode(format!("Decode task failed: {}", e)))?
    }
}
