//! Tone generation: the four classic waveforms, rendered at full scale into
//! mono 16-bit samples.

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use crate::check;
use crate::clip::Clip;
use crate::config::Settings;
use crate::error::{ClipError, Result};
use crate::notes;
use crate::shared::ClipFormat;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [Waveform::Sine, Waveform::Square, Waveform::Sawtooth, Waveform::Triangle];

    pub fn label(self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Square => "Square",
            Waveform::Sawtooth => "Sawtooth",
            Waveform::Triangle => "Triangle",
        }
    }

    // One sample in [-1, 1] at `position` cycles into the waveform (0.0..1.0).
    fn value(self, position: f64) -> f64 {
        match self {
            Waveform::Sine => (TAU * position).sin(),
            Waveform::Square => {
                if position < 0.5 { 1.0 } else { -1.0 }
            }
            Waveform::Sawtooth => 2.0 * position - 1.0,
            Waveform::Triangle => {
                if position < 0.5 {
                    4.0 * position - 1.0
                } else {
                    1.0 - 4.0 * (position - 0.5)
                }
            }
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Waveform {
    type Err = ClipError;

    fn from_str(s: &str) -> Result<Self> {
        Waveform::ALL
            .into_iter()
            .find(|w| w.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClipError::invalid("waveform", "one of Sine, Square, Sawtooth or Triangle", format!("\"{s}\"")))
    }
}

/// Renders `duration_ms` of `waveform` at `frequency_hz`.
pub fn generate(waveform: Waveform, frequency_hz: f64, duration_ms: u64, frame_rate: u32) -> Result<Vec<i16>> {
    let frequency_hz = check::finite("frequency_hz", frequency_hz)?;
    if frequency_hz <= 0.0 {
        return Err(ClipError::invalid("frequency_hz", "a positive frequency", frequency_hz));
    }
    let frame_rate = check::positive_rate("frame_rate", frame_rate)?;

    let count = (frame_rate as f64 * duration_ms as f64 / 1000.0) as usize;
    let cycle_length = frame_rate as f64 / frequency_hz; // in frames
    Ok((0..count)
        .map(|i| {
            let position = (i as f64 % cycle_length) / cycle_length;
            (waveform.value(position) * Clip::MAX_AMPLITUDE as f64) as i16
        })
        .collect())
}

/// A note by name, e.g. `"A4"` or `"C#5"`, shaped with a short fade so it
/// doesn't click, then adjusted by `gain_db`.
pub fn generate_note(name: &str, duration_ms: u64, waveform: Waveform, gain_db: f64) -> Result<Clip> {
    generate_note_with(&Settings::default(), name, duration_ms, waveform, gain_db)
}

pub fn generate_note_with(
    settings: &Settings,
    name: &str,
    duration_ms: u64,
    waveform: Waveform,
    gain_db: f64,
) -> Result<Clip> {
    let frequency = notes::frequency(name)
        .ok_or_else(|| ClipError::invalid("note", "a note name like A4, C#5 or Bb3", format!("\"{name}\"")))?;
    check::finite("gain_db", gain_db)?;

    let mut clip = Clip::tone(waveform, frequency as f64, duration_ms, settings.default_frame_rate)?;
    clip.fade(settings.note_fade_in_ms, settings.note_fade_out_ms);
    clip.apply_gain(gain_db)?;
    Ok(clip)
}

impl Clip {
    /// A new mono clip holding a generated tone.
    pub fn tone(waveform: Waveform, frequency_hz: f64, duration_ms: u64, frame_rate: u32) -> Result<Clip> {
        let samples = generate(waveform, frequency_hz, duration_ms, frame_rate)?;
        Clip::from_samples(samples, ClipFormat::mono(frame_rate))
    }

    /// Replaces this clip with a generated tone, keeping its frame rate.
    pub fn generate_tone(&mut self, waveform: Waveform, frequency_hz: f64, duration_ms: u64) -> Result<()> {
        let frame_rate = self.frame_rate();
        let samples = generate(waveform, frequency_hz, duration_ms, frame_rate)?;
        self.load_from_samples(samples, ClipFormat::mono(frame_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_waveform_case_insensitive() {
        assert_eq!("sine".parse::<Waveform>().unwrap(), Waveform::Sine);
        assert_eq!("SAWTOOTH".parse::<Waveform>().unwrap(), Waveform::Sawtooth);
        let err = "noise".parse::<Waveform>().unwrap_err();
        assert!(matches!(err, ClipError::InvalidArgument { name: "waveform", .. }));
        assert!(err.to_string().contains("noise"));
    }

    #[test]
    fn test_generate_length_and_range() {
        for waveform in Waveform::ALL {
            let samples = generate(waveform, 440.0, 250, 44100).unwrap();
            assert_eq!(samples.len(), 11025);
            assert!(samples.iter().any(|&s| s > 30000), "{waveform} never peaks");
        }
    }

    #[test]
    fn test_square_alternates() {
        // 4 frames per cycle
        let samples = generate(Waveform::Square, 250.0, 8, 1000).unwrap();
        assert_eq!(samples, vec![32767, 32767, -32767, -32767, 32767, 32767, -32767, -32767]);
    }

    #[test]
    fn test_generate_rejects_bad_frequency() {
        assert!(generate(Waveform::Sine, 0.0, 100, 44100).is_err());
        assert!(generate(Waveform::Sine, f64::NAN, 100, 44100).is_err());
    }

    #[test]
    fn test_generated_note_pitch() {
        let clip = generate_note("A4", 1000, Waveform::Sine, 0.0).unwrap();
        assert_eq!(clip.frame_rate(), 44100);
        assert_eq!(clip.length_ms(), 1000.0);
        let pitch = clip.pitch_at_time(500.0).unwrap();
        assert!((pitch - 440.0).abs() <= 20.0, "got {pitch}");
    }

    #[test]
    fn test_generated_note_is_faded() {
        let clip = generate_note("C4", 500, Waveform::Square, 0.0).unwrap();
        assert_eq!(clip.samples()[0], 0);
        assert_eq!(*clip.samples().last().unwrap(), 0);
        assert_eq!(clip.amplitude_at(250.0).unwrap().abs(), 32767);
    }

    #[test]
    fn test_unknown_note() {
        let err = generate_note("H2", 100, Waveform::Sine, 0.0).unwrap_err();
        assert!(matches!(err, ClipError::InvalidArgument { name: "note", .. }));
    }

    #[test]
    fn test_generate_tone_in_place_keeps_rate() {
        let mut clip = Clip::silent(0, 8000).unwrap();
        clip.generate_tone(Waveform::Triangle, 100.0, 1000).unwrap();
        assert_eq!(clip.frame_rate(), 8000);
        assert_eq!(clip.frame_count(), 8000);
    }
}
