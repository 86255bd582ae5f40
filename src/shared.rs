// Types shared between the clip core and its collaborators (codec, playback,
// viewer). Kept small on purpose: anything here is part of every layer's API.
use serde::{Deserialize, Serialize};

pub const DEFAULT_FRAME_RATE: u32 = 44100;
pub const SAMPLE_WIDTH: u16 = 2; // bytes, 16-bit PCM only

/// Metadata template a clip is rebuilt from.
///
/// Passed by value, so loading samples "with another clip's format" copies three
/// numbers instead of holding on to the other clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipFormat {
    pub frame_rate: u32,
    pub channels: u16,
    pub sample_width: u16,
}

impl ClipFormat {
    pub const fn mono(frame_rate: u32) -> Self {
        Self { frame_rate, channels: 1, sample_width: SAMPLE_WIDTH }
    }

    pub const fn new(frame_rate: u32, channels: u16) -> Self {
        Self { frame_rate, channels, sample_width: SAMPLE_WIDTH }
    }

    /// Frame index addressed by `time_ms`: `floor(time_ms * frame_rate / 1000)`.
    ///
    /// Multiplies before dividing, so whole-millisecond times land on the exact
    /// frame at any rate.
    pub fn frame_index(&self, time_ms: f64) -> usize {
        (time_ms * self.frame_rate as f64 / 1000.0).floor().max(0.0) as usize
    }

    pub fn duration_ms(&self, frames: usize) -> f64 {
        frames as f64 * 1000.0 / self.frame_rate as f64
    }
}

impl Default for ClipFormat {
    fn default() -> Self {
        Self::mono(DEFAULT_FRAME_RATE)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumBin {
    pub frequency: f64,
    pub magnitude: f64,
}
