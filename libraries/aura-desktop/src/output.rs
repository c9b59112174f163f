/// CPAL output sink driven from a dedicated audio thread
use crate::error::{DesktopError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, warn};

/// Commands sent to the audio thread
enum SinkCommand {
    /// Replace whatever is playing with `samples` from `start_frame`
    Play {
        samples: Arc<[f32]>,
        channels: u16,
        sample_rate: u32,
        start_frame: usize,
    },
    /// Silence the output
    Stop,
    /// Shutdown the audio thread
    Shutdown,
}

/// Audible output for the software graph
///
/// **Architecture**: The CPAL stream lives on its own thread, which owns it
/// for its whole life and takes commands over a bounded channel. This keeps
/// the non-`Send` stream off the caller's thread. Gain is shared through an
/// atomic so the callback never blocks.
pub struct CpalSink {
    command_tx: Sender<SinkCommand>,
    sample_rate: u32,
    channels: u16,
    gain: Arc<AtomicU32>,
    audio_thread: Option<JoinHandle<()>>,
}

impl CpalSink {
    /// Open the default output device
    ///
    /// # Errors
    /// Returns an error if no audio device is found or configuration fails
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(DesktopError::DeviceNotFound)?;

        let config = device.default_output_config()?;
        let sample_rate = config.sample_rate();
        let config = config.config();

        Ok(Self::with_device_and_config(device, config, sample_rate))
    }

    fn with_device_and_config(device: Device, config: StreamConfig, sample_rate: u32) -> Self {
        let channels = config.channels;
        let gain = Arc::new(AtomicU32::new(1.0f32.to_bits()));
        let (command_tx, command_rx) = bounded::<SinkCommand>(32);

        let gain_for_thread = Arc::clone(&gain);
        let audio_thread = thread::spawn(move || {
            Self::audio_thread_run(device, config, sample_rate, gain_for_thread, command_rx);
        });

        debug!(
            "Opened output device at {} Hz, {} channel(s)",
            sample_rate, channels
        );

        Self {
            command_tx,
            sample_rate,
            channels,
            gain,
            audio_thread: Some(audio_thread),
        }
    }

    /// Output device sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Output device channel count
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Start `samples` (interleaved, `channels` wide, at `sample_rate`)
    /// from `start_frame`, replacing anything already playing
    ///
    /// # Errors
    /// Returns an error if the audio thread has exited
    pub fn play(
        &self,
        samples: Arc<[f32]>,
        channels: u16,
        sample_rate: u32,
        start_frame: usize,
    ) -> Result<()> {
        self.command_tx
            .send(SinkCommand::Play {
                samples,
                channels,
                sample_rate,
                start_frame,
            })
            .map_err(|_| DesktopError::Disconnected)
    }

    /// Silence the output
    ///
    /// # Errors
    /// Returns an error if the audio thread has exited
    pub fn stop(&self) -> Result<()> {
        self.command_tx
            .send(SinkCommand::Stop)
            .map_err(|_| DesktopError::Disconnected)
    }

    /// Set output gain (linear)
    pub fn set_gain(&self, gain: f32) {
        self.gain.store(gain.to_bits(), Ordering::Relaxed);
    }

    /// Stop the audio thread and release the device
    pub fn shutdown(&mut self) {
        let _ = self.command_tx.send(SinkCommand::Shutdown);
        if let Some(handle) = self.audio_thread.take() {
            if handle.join().is_err() {
                warn!("Audio thread panicked during shutdown");
            }
        }
    }

    /// Audio thread main loop
    fn audio_thread_run(
        device: Device,
        config: StreamConfig,
        device_rate: u32,
        gain: Arc<AtomicU32>,
        command_rx: Receiver<SinkCommand>,
    ) {
        let mut stream: Option<Stream> = None;

        while let Ok(cmd) = command_rx.recv() {
            match cmd {
                SinkCommand::Play {
                    samples,
                    channels,
                    sample_rate,
                    start_frame,
                } => {
                    // Drop the old stream first
                    stream = None;

                    let mut head = ReadHead::new(
                        samples,
                        channels,
                        f64::from(sample_rate) / f64::from(device_rate.max(1)),
                        start_frame,
                    );
                    let out_channels = usize::from(config.channels);
                    let gain_for_callback = Arc::clone(&gain);

                    let built = device.build_output_stream(
                        &config,
                        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                            let gain = f32::from_bits(gain_for_callback.load(Ordering::Relaxed));
                            head.fill(data, out_channels, gain);
                        },
                        |err| error!("Audio stream error: {}", err),
                        None,
                    );

                    match built {
                        Ok(s) => match s.play() {
                            Ok(()) => stream = Some(s),
                            Err(e) => error!("Failed to start stream: {}", e),
                        },
                        Err(e) => error!("Failed to build stream: {}", e),
                    }
                }
                SinkCommand::Stop => {
                    stream = None;
                }
                SinkCommand::Shutdown => break,
            }
        }

        drop(stream);
        debug!("Audio thread exited");
    }
}

impl std::fmt::Debug for CpalSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpalSink")
            .field("sample_rate", &self.sample_rate)
            .field("channels", &self.channels)
            .finish()
    }
}

impl Drop for CpalSink {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Read head over a decoded buffer with nearest-frame rate conversion
struct ReadHead {
    samples: Arc<[f32]>,
    channels: usize,
    step: f64,
    position: f64,
}

impl ReadHead {
    fn new(samples: Arc<[f32]>, channels: u16, step: f64, start_frame: usize) -> Self {
        Self {
            samples,
            channels: usize::from(channels.max(1)),
            step,
            position: start_frame as f64,
        }
    }

    fn fill(&mut self, output: &mut [f32], out_channels: usize, gain: f32) {
        let frames = self.samples.len() / self.channels;

        for frame in output.chunks_mut(out_channels.max(1)) {
            let index = self.position as usize;
            if index >= frames {
                frame.fill(0.0);
                continue;
            }

            let start = index * self.channels;
            for (c, out) in frame.iter_mut().enumerate() {
                *out = self.samples[start + c % self.channels] * gain;
            }
            self.position += self.step;
        }
    }
}
