// Amplitude transforms: gain, fades, normalization and the crescendo ramps.
use super::{Clip, clamp_sample, clamp_wide, scale_sample};
use crate::check;
use crate::error::{ClipError, Result};

impl Clip {
    /// Changes the volume by `db` decibels (`+6` is roughly twice as loud).
    pub fn apply_gain(&mut self, db: f64) -> Result<()> {
        let db = check::finite("db", db)?;
        let factor = 10f64.powf(db / 20.0);
        for s in self.samples.iter_mut() {
            *s = clamp_sample((*s as f64 * factor).round());
        }
        Ok(())
    }

    /// Ramps the first `ms` milliseconds up from silence.
    pub fn fade_in(&mut self, ms: u64) {
        let n = self.format.frame_index(ms as f64).min(self.frame_count());
        for (i, frame) in self.frames_mut().take(n).enumerate() {
            let gain = i as f64 / n as f64;
            frame.iter_mut().for_each(|s| *s = scale_sample(*s, gain));
        }
    }

    /// Ramps the last `ms` milliseconds down to silence.
    pub fn fade_out(&mut self, ms: u64) {
        let frames = self.frame_count();
        let n = self.format.frame_index(ms as f64).min(frames);
        for (i, frame) in self.frames_mut().skip(frames - n).enumerate() {
            let gain = 1.0 - (i + 1) as f64 / n as f64;
            frame.iter_mut().for_each(|s| *s = scale_sample(*s, gain));
        }
    }

    /// Fade in, then fade out. Overlapping windows compound.
    pub fn fade(&mut self, in_ms: u64, out_ms: u64) {
        self.fade_in(in_ms);
        self.fade_out(out_ms);
    }

    /// Scales the clip so its loudest sample reaches `max_amplitude`.
    ///
    /// Each sample becomes `sample * max_amplitude / peak`, truncated toward zero,
    /// so the peak lands on `max_amplitude` exactly.
    pub fn normalize(&mut self, max_amplitude: i32) -> Result<()> {
        if !(0..=Clip::MAX_AMPLITUDE as i32).contains(&max_amplitude) {
            return Err(ClipError::invalid(
                "max_amplitude",
                format!("a number from 0 to {}", Clip::MAX_AMPLITUDE),
                max_amplitude,
            ));
        }
        let peak = self.peak_amplitude() as i64;
        if peak == 0 {
            return Err(ClipError::domain("the audio is silent, so there is nothing to normalize"));
        }
        let target = max_amplitude as i64;
        for s in self.samples.iter_mut() {
            *s = clamp_wide(*s as i64 * target / peak);
        }
        Ok(())
    }

    /// Ramps the volume multiplier from 1.0 up to `final_multiplier` over
    /// `[start_ms, end_ms)`. `end_ms` of `None` means the end of the clip.
    pub fn crescendo(&mut self, start_ms: f64, end_ms: Option<f64>, final_multiplier: f64) -> Result<()> {
        let final_multiplier = multiplier("final_multiplier", final_multiplier)?;
        self.ramp(start_ms, end_ms, 1.0, final_multiplier)
    }

    /// Ramps the volume multiplier from `initial_multiplier` down to 1.0.
    pub fn decrescendo(&mut self, start_ms: f64, end_ms: Option<f64>, initial_multiplier: f64) -> Result<()> {
        let initial_multiplier = multiplier("initial_multiplier", initial_multiplier)?;
        self.ramp(start_ms, end_ms, initial_multiplier, 1.0)
    }

    fn ramp(&mut self, start_ms: f64, end_ms: Option<f64>, from: f64, to: f64) -> Result<()> {
        let (start, end) = self.frame_window(start_ms, end_ms)?;
        let len = end - start;
        if len == 0 {
            return Ok(());
        }

        for (i, frame) in self.frames_mut().skip(start).take(len).enumerate() {
            // a one-frame range stays at the starting multiplier
            let progress = if len == 1 { 0.0 } else { i as f64 / (len - 1) as f64 };
            let m = from + progress * (to - from);
            frame.iter_mut().for_each(|s| *s = scale_sample(*s, m));
        }
        Ok(())
    }
}

fn multiplier(name: &'static str, value: f64) -> Result<f64> {
    let value = check::finite(name, value)?;
    if value < 0.0 {
        return Err(ClipError::invalid(name, "a non-negative multiplier", value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ClipFormat;

    fn mono(samples: Vec<i16>, rate: u32) -> Clip {
        Clip::from_samples(samples, ClipFormat::mono(rate)).unwrap()
    }

    #[test]
    fn test_gain_round_trip_within_one() {
        let original: Vec<i16> = (-200..200).map(|i| (i * 37) as i16).collect();
        let mut clip = mono(original.clone(), 8000);
        clip.apply_gain(6.0).unwrap();
        clip.apply_gain(-6.0).unwrap();
        for (a, b) in original.iter().zip(clip.samples()) {
            assert!((a - b).abs() <= 1, "{a} drifted to {b}");
        }
    }

    #[test]
    fn test_gain_clamps() {
        let mut clip = mono(vec![30000, -30000, 100], 8000);
        clip.apply_gain(20.0).unwrap();
        assert_eq!(clip.samples(), &[32767, -32768, 1000]);
    }

    #[test]
    fn test_gain_rejects_nan_without_mutating() {
        let mut clip = mono(vec![1, 2, 3], 8000);
        assert!(clip.apply_gain(f64::NAN).is_err());
        assert_eq!(clip.samples(), &[1, 2, 3]);
    }

    #[test]
    fn test_fade_in_ramps_leading_window_only() {
        // 1 frame per ms
        let mut clip = mono(vec![1000; 10], 1000);
        clip.fade_in(4);
        assert_eq!(clip.samples(), &[0, 250, 500, 750, 1000, 1000, 1000, 1000, 1000, 1000]);
    }

    #[test]
    fn test_fade_out_reaches_silence() {
        let mut clip = mono(vec![1000; 10], 1000);
        clip.fade_out(4);
        assert_eq!(&clip.samples()[..6], &[1000; 6]);
        assert_eq!(&clip.samples()[6..], &[750, 500, 250, 0]);
    }

    #[test]
    fn test_fade_window_longer_than_clip() {
        let mut clip = mono(vec![1000; 4], 1000);
        clip.fade(100, 0);
        assert_eq!(clip.samples(), &[0, 250, 500, 750]);
    }

    #[test]
    fn test_overlapping_fades_compound() {
        let mut clip = mono(vec![1000; 10], 1000);
        clip.fade(8, 8);
        // fade-out runs over samples the fade-in already scaled
        assert_eq!(clip.samples(), &[0, 125, 218, 281, 312, 312, 281, 218, 125, 0]);
    }

    #[test]
    fn test_normalize_hits_exact_peak() {
        let mut clip = mono(vec![1000, -500, 3, 0], 8000);
        clip.normalize(Clip::MAX_AMPLITUDE as i32).unwrap();
        assert_eq!(clip.peak_amplitude(), 32767);
        assert_eq!(clip.samples(), &[32767, -16383, 98, 0]);
    }

    #[test]
    fn test_normalize_negative_peak() {
        let mut clip = mono(vec![-32768, 16384], 8000);
        clip.normalize(32767).unwrap();
        assert_eq!(clip.samples(), &[-32767, 16383]);
    }

    #[test]
    fn test_normalize_silence_is_domain_error() {
        let mut clip = Clip::silent(10, 8000).unwrap();
        assert!(matches!(clip.normalize(32767), Err(ClipError::Domain(_))));
    }

    #[test]
    fn test_normalize_rejects_bad_target() {
        let mut clip = mono(vec![10], 8000);
        assert!(matches!(clip.normalize(-1), Err(ClipError::InvalidArgument { .. })));
        assert!(matches!(clip.normalize(40000), Err(ClipError::InvalidArgument { .. })));
        assert_eq!(clip.samples(), &[10]);
    }

    #[test]
    fn test_crescendo_unit_multiplier_is_noop() {
        let original: Vec<i16> = (0..1000).map(|i| ((i * 91) % 20000 - 10000) as i16).collect();
        let mut clip = mono(original.clone(), 1000);
        clip.crescendo(0.0, Some(1000.0), 1.0).unwrap();
        assert_eq!(clip.samples(), original.as_slice());
    }

    #[test]
    fn test_crescendo_ramps_to_final_multiplier() {
        let mut clip = mono(vec![1000; 10], 1000);
        clip.crescendo(2.0, Some(7.0), 2.0).unwrap();
        // frames 2..7, progress 0, .25, .5, .75, 1
        assert_eq!(clip.samples(), &[1000, 1000, 1000, 1250, 1500, 1750, 2000, 1000, 1000, 1000]);
    }

    #[test]
    fn test_decrescendo_mirrors_crescendo() {
        let mut clip = mono(vec![1000; 5], 1000);
        clip.decrescendo(0.0, None, 3.0).unwrap();
        assert_eq!(clip.samples(), &[3000, 2500, 2000, 1500, 1000]);
    }

    #[test]
    fn test_single_frame_ramp_keeps_start_multiplier() {
        let mut clip = mono(vec![1000; 5], 1000);
        clip.crescendo(1.0, Some(2.0), 3.0).unwrap();
        assert_eq!(clip.samples(), &[1000; 5]);

        clip.decrescendo(1.0, Some(2.0), 3.0).unwrap();
        assert_eq!(clip.samples(), &[1000, 3000, 1000, 1000, 1000]);
    }

    #[test]
    fn test_crescendo_validation() {
        let mut clip = mono(vec![1000; 10], 1000);
        assert!(clip.crescendo(-1.0, None, 1.5).is_err());
        assert!(clip.crescendo(5.0, Some(5.0), 1.5).is_err());
        assert!(clip.crescendo(0.0, Some(11.0), 1.5).is_err());
        assert!(clip.crescendo(0.0, None, -0.5).is_err());
        assert_eq!(clip.samples(), &[1000; 10]);
    }

    #[test]
    fn test_ramp_to_end_reaches_last_frame_at_odd_rate() {
        let mut clip = mono(vec![1000; 1001], 1001);
        clip.crescendo(0.0, None, 2.0).unwrap();
        assert_eq!(clip.samples()[0], 1000);
        assert_eq!(clip.samples()[1000], 2000);

        let mut clip = mono(vec![1000; 1001], 1001);
        let end = clip.length_ms();
        clip.decrescendo(0.0, Some(end), 2.0).unwrap();
        assert_eq!(clip.samples()[0], 2000);
        assert_eq!(clip.samples()[1000], 1000);
    }

    #[test]
    fn test_crescendo_clamps() {
        let mut clip = mono(vec![30000, 30000], 1000);
        clip.crescendo(0.0, None, 2.0).unwrap();
        assert_eq!(clip.samples(), &[30000, 32767]);
    }

    #[test]
    fn test_ramp_scales_every_channel_of_a_frame() {
        let mut clip = Clip::from_samples(vec![100, -100, 100, -100], ClipFormat::new(1000, 2)).unwrap();
        clip.crescendo(0.0, None, 2.0).unwrap();
        assert_eq!(clip.samples(), &[100, -100, 200, -200]);
    }
}
