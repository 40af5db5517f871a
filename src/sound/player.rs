//! Sound player implementation using rodio.
//!
//! This module provides the `RodioSoundPlayer` which uses the rodio v0.20
//! audio library for cross-platform sound playback.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::source::{SineWave, Source, Zero};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::SoundSource;
use super::tone::ToneSpec;
use super::{Playback, SoundPlayer};

const TONE_SAMPLE_RATE: u32 = 48_000;

/// A sound player that uses rodio for audio playback.
///
/// Each call to [`SoundPlayer::start`] queues one cycle of the sound on a
/// fresh sink and returns immediately; the returned handle reports when the
/// cycle has drained.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
}

impl RodioSoundPlayer {
    /// Opens the default audio output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    fn new_sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }

    /// Queues a sound file on a new sink.
    fn start_file(&self, path: &Path) -> Result<Sink, SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| SoundError::DecodeError(format!("{}: {}", path.display(), e)))?;

        let sink = self.new_sink()?;
        sink.append(decoder);
        Ok(sink)
    }

    /// Queues one cycle of the synthesized tone on a new sink.
    fn start_tone(&self, tone: &ToneSpec) -> Result<Sink, SoundError> {
        let sink = self.new_sink()?;

        for _ in 0..tone.beeps {
            sink.append(
                SineWave::new(tone.frequency)
                    .take_duration(tone.beep)
                    .amplify(tone.volume),
            );
            sink.append(Zero::<f32>::new(1, TONE_SAMPLE_RATE).take_duration(tone.gap));
        }

        Ok(sink)
    }
}

impl SoundPlayer for RodioSoundPlayer {
    fn start(&self, source: &SoundSource) -> Result<Box<dyn Playback>, SoundError> {
        let sink = match source {
            SoundSource::File { path } => match self.start_file(path) {
                Ok(sink) => sink,
                Err(e) if e.should_fallback_to_tone() => {
                    warn!("Failed to open sound file: {}, falling back to tone", e);
                    self.start_tone(&ToneSpec::default())?
                }
                Err(e) => return Err(e),
            },
            SoundSource::Tone(tone) => self.start_tone(tone)?,
        };

        debug!(source = %source.name(), "Sound playback started");
        Ok(Box::new(sink))
    }
}

impl Playback for Sink {
    fn is_finished(&self) -> bool {
        self.empty()
    }

    fn stop(&self) {
        Sink::stop(self);
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
    }
}
