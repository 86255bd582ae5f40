//! Friendly, checked audio editing for people learning to program.
//!
//! A [`Clip`] is a run of signed 16-bit samples plus its frame rate and channel
//! count. Load one from a file, generate a tone or a note, then reshape it:
//! gain, fades, crescendos, speed changes, slicing, looping, overlaying, or
//! editing individual samples by time. Every time argument is in milliseconds.
//!
//! ```no_run
//! use clipkit::{Clip, Waveform, generate_note};
//!
//! let mut melody = generate_note("C4", 400, Waveform::Sine, 0.0)?;
//! melody += &generate_note("E4", 400, Waveform::Sine, 0.0)?;
//! melody += &generate_note("G4", 800, Waveform::Sine, -3.0)?;
//! melody.crescendo(0.0, None, clipkit::clip::DEFAULT_RAMP_MULTIPLIER)?;
//! melody.save("melody.wav")?;
//! # Ok::<(), clipkit::ClipError>(())
//! ```

mod check;
pub mod clip;
pub mod codec;
pub mod config;
pub mod error;
pub mod notes;
pub mod playback;
pub mod shared;
pub mod synth;
pub mod viewer;

pub use clip::Clip;
pub use error::{ClipError, Result};
pub use shared::{ClipFormat, SpectrumBin};
pub use synth::{Waveform, generate_note, generate_note_with};
