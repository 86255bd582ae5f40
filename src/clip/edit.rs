// Reading and writing individual samples by time.
use super::{Clip, clamp_wide};
use crate::check;
use crate::error::{ClipError, Result};

impl Clip {
    /// Mean absolute sample value over `[start_ms, end_ms)`. `end_ms` of `None`
    /// means the end of the clip.
    pub fn average_amplitude(&self, start_ms: f64, end_ms: Option<f64>) -> Result<f64> {
        let (start, end) = self.frame_window(start_ms, end_ms)?;
        let channels = self.channels();
        let (start, end) = (start * channels, end * channels);
        if start >= end {
            return Ok(0.0);
        }
        let segment = &self.samples[start..end];
        let total: i64 = segment.iter().map(|&s| (s as i64).abs()).sum();
        Ok(total as f64 / segment.len() as f64)
    }

    /// Largest absolute sample value in the clip.
    pub fn peak_amplitude(&self) -> i32 {
        self.samples.iter().map(|&s| (s as i32).abs()).max().unwrap_or(0)
    }

    /// The sample at `time_ms` (first channel for multi-channel clips).
    pub fn amplitude_at(&self, time_ms: f64) -> Result<i16> {
        let frame = self.frame_at("time_ms", time_ms)?;
        Ok(self.samples[frame * self.channels()])
    }

    /// Overwrites the frame at `time_ms` with `value`, clamped to 16 bits.
    /// Every channel of the frame gets the same value.
    pub fn set_amplitude_at(&mut self, time_ms: f64, value: i32) -> Result<()> {
        let frame = self.frame_at("time_ms", time_ms)?;
        let value = clamp_wide(value as i64);
        let channels = self.channels();
        self.samples[frame * channels..(frame + 1) * channels].fill(value);
        Ok(())
    }

    pub(super) fn frame_at(&self, name: &'static str, time_ms: f64) -> Result<usize> {
        let time_ms = check::finite(name, time_ms)?;
        let bounds = format!("0ms..{:.0}ms", self.length_ms());
        if time_ms < 0.0 {
            return Err(ClipError::out_of_range(name, format!("{time_ms}ms"), bounds));
        }
        let frame = self.format.frame_index(time_ms);
        if frame >= self.frame_count() {
            return Err(ClipError::out_of_range(name, format!("{time_ms}ms"), bounds));
        }
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ClipFormat;

    fn mono(samples: Vec<i16>, rate: u32) -> Clip {
        Clip::from_samples(samples, ClipFormat::mono(rate)).unwrap()
    }

    #[test]
    fn test_average_amplitude_window() {
        let clip = mono(vec![10, -20, 30, -40, 50], 1000);
        assert_eq!(clip.average_amplitude(0.0, None).unwrap(), 30.0);
        assert_eq!(clip.average_amplitude(1.0, Some(3.0)).unwrap(), 25.0);
    }

    #[test]
    fn test_average_amplitude_empty_range_is_zero() {
        // 0.5ms and 0.9ms both land on frame 0
        let clip = mono(vec![10, 20], 1000);
        assert_eq!(clip.average_amplitude(0.5, Some(0.9)).unwrap(), 0.0);
    }

    #[test]
    fn test_average_amplitude_validation() {
        let clip = mono(vec![10; 10], 1000);
        assert!(matches!(clip.average_amplitude(-1.0, None), Err(ClipError::InvalidArgument { .. })));
        assert!(matches!(clip.average_amplitude(4.0, Some(4.0)), Err(ClipError::InvalidArgument { .. })));
        assert!(matches!(clip.average_amplitude(0.0, Some(20.0)), Err(ClipError::InvalidArgument { .. })));
        assert!(matches!(clip.average_amplitude(11.0, None), Err(ClipError::InvalidArgument { .. })));
    }

    #[test]
    fn test_average_amplitude_includes_last_frame_at_odd_rate() {
        let mut samples = vec![0; 1001];
        samples[1000] = 1001;
        let clip = mono(samples, 1001);
        assert_eq!(clip.average_amplitude(0.0, None).unwrap(), 1.0);
        assert_eq!(clip.average_amplitude(0.0, Some(clip.length_ms())).unwrap(), 1.0);
    }

    #[test]
    fn test_average_counts_every_channel() {
        let clip = Clip::from_samples(vec![10, -30, 10, -30], ClipFormat::new(1000, 2)).unwrap();
        assert_eq!(clip.average_amplitude(0.0, None).unwrap(), 20.0);
    }

    #[test]
    fn test_amplitude_at() {
        let clip = mono(vec![1, 2, 3, 4], 2000);
        assert_eq!(clip.amplitude_at(0.0).unwrap(), 1);
        assert_eq!(clip.amplitude_at(0.6).unwrap(), 2);
        assert_eq!(clip.amplitude_at(1.5).unwrap(), 4);
    }

    #[test]
    fn test_amplitude_at_out_of_range() {
        let clip = mono(vec![1, 2, 3, 4], 2000);
        assert!(matches!(clip.amplitude_at(-0.1), Err(ClipError::OutOfRange { .. })));
        assert!(matches!(clip.amplitude_at(2.0), Err(ClipError::OutOfRange { .. })));
    }

    #[test]
    fn test_set_amplitude_clamps() {
        let mut clip = mono(vec![0; 4], 1000);
        clip.set_amplitude_at(1.0, 50000).unwrap();
        clip.set_amplitude_at(2.0, -50000).unwrap();
        clip.set_amplitude_at(3.0, 123).unwrap();
        assert_eq!(clip.samples(), &[0, 32767, -32768, 123]);
    }

    #[test]
    fn test_set_amplitude_out_of_range_leaves_clip() {
        let mut clip = mono(vec![7; 4], 1000);
        assert!(clip.set_amplitude_at(4.0, 1).is_err());
        assert_eq!(clip.samples(), &[7; 4]);
    }

    #[test]
    fn test_set_amplitude_writes_whole_frame() {
        let mut clip = Clip::from_samples(vec![0; 6], ClipFormat::new(1000, 2)).unwrap();
        clip.set_amplitude_at(1.0, 9).unwrap();
        assert_eq!(clip.samples(), &[0, 0, 9, 9, 0, 0]);
        assert_eq!(clip.amplitude_at(1.0).unwrap(), 9);
    }

    #[test]
    fn test_peak_of_most_negative_sample() {
        let clip = mono(vec![-32768, 5], 1000);
        assert_eq!(clip.peak_amplitude(), 32768);
    }
}
