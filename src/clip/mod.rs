//! The in-memory clip: interleaved signed 16-bit samples plus the format they
//! are played back with.
//!
//! Every mutating method validates all of its arguments before it touches the
//! samples, so a call that returns an error leaves the clip exactly as it was.

use std::path::Path;

use crate::check;
use crate::codec;
use crate::error::{ClipError, Result};
use crate::playback::{DevicePlayer, Player};
use crate::shared::{ClipFormat, DEFAULT_FRAME_RATE, SAMPLE_WIDTH};

mod edit;
mod envelope;
mod pitch;
mod speed;
mod structure;

pub(crate) use pitch::positive_spectrum;
pub(crate) use speed::{remix, resample_linear};

pub const DEFAULT_RAMP_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_PITCH_WINDOW_MS: f64 = 50.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clip {
    samples: Vec<i16>, // interleaved when channels > 1
    format: ClipFormat,
}

impl Default for Clip {
    fn default() -> Self {
        Self {
            samples: Vec::new(),
            format: ClipFormat::mono(DEFAULT_FRAME_RATE),
        }
    }
}

impl Clip {
    pub const MAX_AMPLITUDE: i16 = i16::MAX;
    pub const MIN_AMPLITUDE: i16 = i16::MIN;

    /// An empty mono clip at 44100 Hz.
    pub fn new() -> Self {
        Self::default()
    }

    /// A silent mono clip `duration_ms` long.
    pub fn silent(duration_ms: u64, frame_rate: u32) -> Result<Self> {
        let frame_rate = check::positive_rate("frame_rate", frame_rate)?;
        let format = ClipFormat::mono(frame_rate);
        let frames = format.frame_index(duration_ms as f64);
        Ok(Self {
            samples: vec![0; frames],
            format,
        })
    }

    pub fn from_samples(samples: impl Into<Vec<i16>>, format: ClipFormat) -> Result<Self> {
        let mut clip = Self::new();
        clip.load_from_samples(samples, format)?;
        Ok(clip)
    }

    /// Decodes an audio file into a new clip.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let decoded = codec::decode(path.as_ref())?;
        Self::from_samples(decoded.samples, decoded.format)
    }

    /// Replaces this clip's contents with the decoded file.
    pub fn open_in_place(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let decoded = codec::decode(path.as_ref())?;
        self.load_from_samples(decoded.samples, decoded.format)
    }

    /// Writes the clip out; the format comes from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        codec::encode(&self.samples, self.format, path.as_ref())
    }

    /// Rebuilds the clip from `samples`, taking frame rate and channel count from
    /// `template`. Pads the tail with silence until the samples fill whole frames.
    pub fn load_from_samples(&mut self, samples: impl Into<Vec<i16>>, template: ClipFormat) -> Result<()> {
        check::positive_rate("frame_rate", template.frame_rate)?;
        if template.channels == 0 {
            return Err(ClipError::invalid("channels", "at least one channel", template.channels));
        }
        if template.sample_width != SAMPLE_WIDTH {
            return Err(ClipError::invalid(
                "sample_width",
                format!("{SAMPLE_WIDTH} bytes (16-bit audio)"),
                template.sample_width,
            ));
        }
        self.format = template;
        self.load_samples(samples);
        Ok(())
    }

    /// Same as [`Clip::load_from_samples`] with this clip's own format.
    pub fn load_samples(&mut self, samples: impl Into<Vec<i16>>) {
        let mut samples = samples.into();
        let channels = self.channels();
        let rem = samples.len() % channels;
        if rem != 0 {
            samples.resize(samples.len() + channels - rem, 0);
        }
        self.samples = samples;
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_list(&self) -> Vec<i16> {
        self.samples.clone()
    }

    pub fn format(&self) -> ClipFormat {
        self.format
    }

    pub fn frame_rate(&self) -> u32 {
        self.format.frame_rate
    }

    pub fn channels(&self) -> usize {
        self.format.channels as usize
    }

    pub fn sample_width(&self) -> u16 {
        self.format.sample_width
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in milliseconds.
    pub fn length_ms(&self) -> f64 {
        self.format.duration_ms(self.frame_count())
    }

    /// Raw little-endian PCM, the layout playback devices and WAV data chunks use.
    pub fn to_pcm_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    /// Plays the clip on the default output device and waits for it to finish.
    /// Without a device this does nothing.
    pub fn play(&self) {
        self.play_with(&DevicePlayer);
    }

    pub fn play_with(&self, player: &dyn Player) {
        if self.is_empty() {
            return;
        }
        player.play(&self.samples, self.format);
    }

    /// Validates a `[start_ms, end_ms)` window and returns it as frame indices.
    /// An `end_ms` of `None`, or one at the clip's duration, ends after the last frame.
    fn frame_window(&self, start_ms: f64, end_ms: Option<f64>) -> Result<(usize, usize)> {
        let duration = self.length_ms();
        let (start_ms, end_ms) = check::time_range(start_ms, end_ms.unwrap_or(duration), duration)?;
        let end = self.end_frame(end_ms);
        Ok((self.format.frame_index(start_ms).min(end), end))
    }

    // duration_ms round-trips through floats, so snap it to the frame count
    fn end_frame(&self, end_ms: f64) -> usize {
        let frames = self.frame_count();
        if end_ms >= self.length_ms() {
            frames
        } else {
            self.format.frame_index(end_ms).min(frames)
        }
    }

    fn frames_mut(&mut self) -> std::slice::ChunksExactMut<'_, i16> {
        let channels = self.channels();
        self.samples.chunks_exact_mut(channels)
    }
}

// Scale and truncate toward zero, then clamp into the 16-bit range.
pub(crate) fn scale_sample(sample: i16, multiplier: f64) -> i16 {
    clamp_sample((sample as f64 * multiplier).trunc())
}

pub(crate) fn clamp_sample(value: f64) -> i16 {
    value.clamp(Clip::MIN_AMPLITUDE as f64, Clip::MAX_AMPLITUDE as f64) as i16
}

pub(crate) fn clamp_wide(value: i64) -> i16 {
    value.clamp(Clip::MIN_AMPLITUDE as i64, Clip::MAX_AMPLITUDE as i64) as i16
}
