// Concatenation, looping, slicing and overlay, plus operator sugar on top of the
// named methods.
use std::ops::{Add, AddAssign, Bound, Mul, MulAssign, RangeBounds};

use super::{Clip, clamp_wide};
use crate::error::{ClipError, Result};
use crate::shared::{ClipFormat, SAMPLE_WIDTH};

impl Clip {
    /// A new clip with `other` appended. Neither operand changes.
    pub fn concat(&self, other: &Clip) -> Clip {
        let target = common_format(self.format, other.format);
        let mut samples = self.converted_to(target);
        samples.extend(other.converted_to(target));
        Clip { samples, format: target }
    }

    pub fn concat_in_place(&mut self, other: &Clip) {
        *self = self.concat(other);
    }

    /// A new clip playing this one `times` times in a row.
    ///
    /// # Panics
    ///
    /// Panics if the looped clip would not fit in memory, like [`slice::repeat`].
    /// Use [`Clip::try_repeat`] to get an error instead.
    pub fn repeat(&self, times: usize) -> Clip {
        Clip {
            samples: self.samples.repeat(times),
            format: self.format,
        }
    }

    /// Same as [`Clip::repeat`], with the same panic.
    pub fn repeat_in_place(&mut self, times: usize) {
        self.samples = self.samples.repeat(times);
    }

    /// [`Clip::repeat`] that reports an oversized result as `InvalidArgument`.
    pub fn try_repeat(&self, times: usize) -> Result<Clip> {
        let max_samples = isize::MAX as usize / std::mem::size_of::<i16>();
        match self.samples.len().checked_mul(times) {
            Some(total) if total <= max_samples => Ok(self.repeat(times)),
            _ => Err(ClipError::invalid(
                "times",
                format!("a repeat count that fits in memory for {} samples", self.samples.len()),
                times,
            )),
        }
    }

    /// The part of the clip covered by a millisecond range, e.g. `clip.slice(250..750)`
    /// or `clip.slice(1000..)`. Ranges past the end are clamped; an empty or
    /// inverted range gives an empty clip.
    pub fn slice(&self, range_ms: impl RangeBounds<u64>) -> Clip {
        let frames = self.frame_count();
        let start_ms = match range_ms.start_bound() {
            Bound::Included(&ms) => ms,
            Bound::Excluded(&ms) => ms.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range_ms.end_bound() {
            Bound::Included(&ms) => self.format.frame_index(ms.saturating_add(1) as f64),
            Bound::Excluded(&ms) => self.format.frame_index(ms as f64),
            Bound::Unbounded => frames,
        }
        .min(frames);
        let start = self.format.frame_index(start_ms as f64).min(end);

        let channels = self.channels();
        Clip {
            samples: self.samples[start * channels..end * channels].to_vec(),
            format: self.format,
        }
    }

    /// The single millisecond starting at `ms`.
    pub fn slice_at(&self, ms: u64) -> Clip {
        self.slice(ms..ms.saturating_add(1))
    }

    /// Mixes `other` into this clip starting at `position_ms`. The result keeps
    /// this clip's length; with `looped`, `other` repeats until the end.
    /// Sums are clamped to the 16-bit range.
    pub fn overlay(&mut self, other: &Clip, position_ms: u64, looped: bool) {
        *self = self.overlaid(other, position_ms, looped);
    }

    pub fn overlaid(&self, other: &Clip, position_ms: u64, looped: bool) -> Clip {
        let target = common_format(self.format, other.format);
        let mut base = self.converted_to(target);
        let top = other.converted_to(target);
        let channels = target.channels as usize;

        let start = target.frame_index(position_ms as f64);
        let top_frames: Vec<&[i16]> = top.chunks_exact(channels).collect();
        if !top_frames.is_empty() {
            for (k, frame) in base.chunks_exact_mut(channels).skip(start).enumerate() {
                let src = if looped {
                    top_frames[k % top_frames.len()]
                } else if let Some(&src) = top_frames.get(k) {
                    src
                } else {
                    break;
                };
                for (s, &t) in frame.iter_mut().zip(src.iter()) {
                    *s = clamp_wide(*s as i64 + t as i64);
                }
            }
        }
        Clip { samples: base, format: target }
    }
}

// Operands are brought to the higher frame rate and the larger channel count.
fn common_format(a: ClipFormat, b: ClipFormat) -> ClipFormat {
    ClipFormat {
        frame_rate: a.frame_rate.max(b.frame_rate),
        channels: a.channels.max(b.channels),
        sample_width: SAMPLE_WIDTH,
    }
}

impl Add<&Clip> for &Clip {
    type Output = Clip;

    fn add(self, rhs: &Clip) -> Clip {
        self.concat(rhs)
    }
}

impl Add<&Clip> for Clip {
    type Output = Clip;

    fn add(mut self, rhs: &Clip) -> Clip {
        self.concat_in_place(rhs);
        self
    }
}

impl AddAssign<&Clip> for Clip {
    fn add_assign(&mut self, rhs: &Clip) {
        self.concat_in_place(rhs);
    }
}

impl Mul<usize> for &Clip {
    type Output = Clip;

    fn mul(self, times: usize) -> Clip {
        self.repeat(times)
    }
}

impl Mul<usize> for Clip {
    type Output = Clip;

    fn mul(mut self, times: usize) -> Clip {
        self.repeat_in_place(times);
        self
    }
}

impl MulAssign<usize> for Clip {
    fn mul_assign(&mut self, times: usize) {
        self.repeat_in_place(times);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{self, Waveform};

    fn mono(samples: Vec<i16>, rate: u32) -> Clip {
        Clip::from_samples(samples, ClipFormat::mono(rate)).unwrap()
    }

    #[test]
    fn test_concat_leaves_operands() {
        let a = mono(vec![1, 2], 1000);
        let b = mono(vec![3], 1000);
        let joined = &a + &b;
        assert_eq!(joined.samples(), &[1, 2, 3]);
        assert_eq!(a.samples(), &[1, 2]);
        assert_eq!(b.samples(), &[3]);
    }

    #[test]
    fn test_concat_in_place() {
        let mut a = mono(vec![1, 2], 1000);
        a += &mono(vec![3, 4], 1000);
        assert_eq!(a.samples(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_concat_upmixes_mono_into_stereo() {
        let a = mono(vec![5], 1000);
        let b = Clip::from_samples(vec![1, 2], ClipFormat::new(1000, 2)).unwrap();
        let joined = a.concat(&b);
        assert_eq!(joined.channels(), 2);
        assert_eq!(joined.samples(), &[5, 5, 1, 2]);
    }

    #[test]
    fn test_concat_resamples_to_higher_rate() {
        let a = mono(vec![0; 10], 1000);
        let b = mono(vec![0; 20], 2000);
        let joined = a.concat(&b);
        assert_eq!(joined.frame_rate(), 2000);
        assert_eq!(joined.length_ms(), 20.0);
    }

    #[test]
    fn test_repeat() {
        let a = mono(vec![1, 2], 1000);
        assert_eq!((&a * 3).samples(), &[1, 2, 1, 2, 1, 2]);
        assert!(a.repeat(0).is_empty());
        let mut b = a.clone();
        b *= 2;
        assert_eq!(b.samples(), &[1, 2, 1, 2]);
    }

    #[test]
    fn test_try_repeat_reports_overflow() {
        let a = mono(vec![1, 2], 1000);
        let err = a.try_repeat(usize::MAX).unwrap_err();
        assert!(matches!(err, ClipError::InvalidArgument { name: "times", .. }));
        assert_eq!(a.try_repeat(2).unwrap().samples(), &[1, 2, 1, 2]);
        assert!(Clip::new().try_repeat(usize::MAX).unwrap().is_empty());
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_repeat_overflow_panics() {
        let _ = mono(vec![1, 2], 1000).repeat(usize::MAX);
    }

    #[test]
    fn test_slice_ranges() {
        let clip = mono((0..10).collect(), 1000);
        assert_eq!(clip.slice(2..5).samples(), &[2, 3, 4]);
        assert_eq!(clip.slice(..3).samples(), &[0, 1, 2]);
        assert_eq!(clip.slice(7..).samples(), &[7, 8, 9]);
        assert_eq!(clip.slice(8..=9).samples(), &[8, 9]);
        assert_eq!(clip.slice_at(4).samples(), &[4]);
    }

    #[test]
    fn test_slice_out_of_range_is_empty() {
        let clip = mono((0..10).collect(), 1000);
        assert!(clip.slice(20..30).is_empty());
        assert_eq!(clip.slice(5..50).samples(), &[5, 6, 7, 8, 9]);
        #[allow(clippy::reversed_empty_ranges)]
        let inverted = clip.slice(6..2);
        assert!(inverted.is_empty());
    }

    #[test]
    fn test_slice_keeps_whole_stereo_frames() {
        let clip = Clip::from_samples((0..8).collect::<Vec<i16>>(), ClipFormat::new(1000, 2)).unwrap();
        assert_eq!(clip.slice(1..3).samples(), &[2, 3, 4, 5]);
    }

    #[test]
    fn test_overlay_at_position() {
        let mut base = mono(vec![10; 6], 1000);
        base.overlay(&mono(vec![1, 2], 1000), 2, false);
        assert_eq!(base.samples(), &[10, 10, 11, 12, 10, 10]);
    }

    #[test]
    fn test_overlay_looped_and_truncated() {
        let mut base = mono(vec![0; 5], 1000);
        base.overlay(&mono(vec![1, 2], 1000), 1, true);
        assert_eq!(base.samples(), &[0, 1, 2, 1, 2]);

        let mut short = mono(vec![0; 2], 1000);
        short.overlay(&mono(vec![7; 5], 1000), 0, false);
        assert_eq!(short.samples(), &[7, 7]);
    }

    #[test]
    fn test_overlay_clamps() {
        let base = mono(vec![30000, -30000], 1000);
        let mixed = base.overlaid(&base, 0, false);
        assert_eq!(mixed.samples(), &[32767, -32768]);
        assert_eq!(base.samples(), &[30000, -30000]);
    }

    #[test]
    fn test_overlay_past_end_is_noop() {
        let mut base = mono(vec![3; 4], 1000);
        base.overlay(&mono(vec![1; 4], 1000), 100, true);
        assert_eq!(base.samples(), &[3; 4]);
    }

    #[test]
    fn test_overlaid_sines_are_louder_but_not_double() {
        let tone = Clip::from_samples(
            synth::generate(Waveform::Sine, 220.0, 3000, 44100).unwrap(),
            ClipFormat::mono(44100),
        )
        .unwrap();
        let single = tone.average_amplitude(0.0, Some(3000.0)).unwrap();
        let mixed = tone.overlaid(&tone, 0, false).average_amplitude(0.0, Some(3000.0)).unwrap();
        assert!(mixed > single);
        assert!(mixed <= single * 2.0);
    }
}
