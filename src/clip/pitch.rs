// Spectral analysis: dominant-frequency estimation and the magnitude spectrum
// the viewer plots.
use rustfft::{FftPlanner, num_complex::Complex};

use super::{Clip, DEFAULT_PITCH_WINDOW_MS};
use crate::check;
use crate::error::{ClipError, Result};
use crate::shared::SpectrumBin;

impl Clip {
    /// Estimated pitch in Hz at `time_ms`, using a 50ms analysis window.
    pub fn pitch_at_time(&self, time_ms: f64) -> Result<f64> {
        self.pitch_at_time_with_window(time_ms, DEFAULT_PITCH_WINDOW_MS)
    }

    /// Estimated pitch in Hz of a `window_ms` wide window centred on `time_ms`.
    ///
    /// The answer is the centre of the strongest FFT bin, so it is only as precise
    /// as the bin width: `frame_rate / window_length_in_frames` Hz. A 50ms window
    /// at 44.1kHz gives about 20 Hz; widen the window for finer estimates.
    pub fn pitch_at_time_with_window(&self, time_ms: f64, window_ms: f64) -> Result<f64> {
        let time_ms = check::finite("time_ms", time_ms)?;
        let window_ms = check::finite("window_ms", window_ms)?;
        if window_ms <= 0.0 {
            return Err(ClipError::invalid("window_ms", "a positive window length", window_ms));
        }
        let duration = self.length_ms();
        if time_ms < 0.0 || time_ms > duration {
            return Err(ClipError::out_of_range(
                "time_ms",
                format!("{time_ms}ms"),
                format!("0ms..={duration:.0}ms"),
            ));
        }

        let start_ms = (time_ms - window_ms / 2.0).max(0.0);
        let end_ms = (time_ms + window_ms / 2.0).min(duration);
        let start = self.format.frame_index(start_ms);
        let end = self.end_frame(end_ms);
        let bins = positive_spectrum(&self.mono_frames(start, end), self.frame_rate());

        let strongest = bins
            .iter()
            .filter(|b| b.magnitude > 0.0)
            .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude));
        Ok(strongest.map_or(0.0, |b| b.frequency))
    }

    /// Magnitude spectrum of `[start_ms, end_ms)`, strictly positive frequencies only.
    pub fn spectrum(&self, start_ms: f64, end_ms: Option<f64>) -> Result<Vec<SpectrumBin>> {
        let (start, end) = self.frame_window(start_ms, end_ms)?;
        Ok(positive_spectrum(&self.mono_frames(start, end), self.frame_rate()))
    }

    // Frames `start..end`, averaged across channels.
    pub(crate) fn mono_frames(&self, start: usize, end: usize) -> Vec<f64> {
        let frames = self.frame_count();
        let end = end.min(frames);
        let start = start.min(end);
        let channels = self.channels();
        self.samples[start * channels..end * channels]
            .chunks_exact(channels)
            .map(|frame| frame.iter().map(|&s| s as f64).sum::<f64>() / channels as f64)
            .collect()
    }
}

/// DC-free FFT magnitudes for bins `1..n/2`, tagged with their frequency.
/// Fewer than two samples yields no bins.
pub(crate) fn positive_spectrum(segment: &[f64], frame_rate: u32) -> Vec<SpectrumBin> {
    let n = segment.len();
    if n < 2 {
        return Vec::new();
    }

    let mean = segment.iter().sum::<f64>() / n as f64;
    let mut buffer: Vec<Complex<f64>> = segment.iter().map(|&x| Complex::new(x - mean, 0.0)).collect();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let resolution = frame_rate as f64 / n as f64;
    buffer[1..n / 2]
        .iter()
        .enumerate()
        .map(|(i, c)| SpectrumBin {
            frequency: (i + 1) as f64 * resolution,
            magnitude: c.norm(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ClipFormat;

    fn sine(freq: f64, rate: u32, frames: usize) -> Vec<i16> {
        (0..frames)
            .map(|i| ((std::f64::consts::TAU * freq * i as f64 / rate as f64).sin() * 20000.0) as i16)
            .collect()
    }

    #[test]
    fn test_pitch_of_pure_tone() {
        let clip = Clip::from_samples(sine(440.0, 44100, 44100), ClipFormat::mono(44100)).unwrap();
        let pitch = clip.pitch_at_time(500.0).unwrap();
        assert!((pitch - 440.0).abs() <= 20.0, "got {pitch}");
    }

    #[test]
    fn test_pitch_window_clipped_at_edges() {
        let clip = Clip::from_samples(sine(1000.0, 8000, 8000), ClipFormat::mono(8000)).unwrap();
        let at_start = clip.pitch_at_time(0.0).unwrap();
        let at_end = clip.pitch_at_time(1000.0).unwrap();
        // 25ms of audio at each edge: 40 Hz bins
        assert!((at_start - 1000.0).abs() <= 40.0, "got {at_start}");
        assert!((at_end - 1000.0).abs() <= 40.0, "got {at_end}");
    }

    #[test]
    fn test_pitch_of_silence_is_zero() {
        let clip = Clip::silent(200, 8000).unwrap();
        assert_eq!(clip.pitch_at_time(100.0).unwrap(), 0.0);
    }

    #[test]
    fn test_pitch_of_tiny_window_is_zero() {
        let clip = Clip::from_samples(vec![100, -100, 100], ClipFormat::mono(1000)).unwrap();
        // window covers a single frame
        assert_eq!(clip.pitch_at_time_with_window(1.0, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_pitch_rejects_bad_times() {
        let clip = Clip::silent(100, 8000).unwrap();
        assert!(matches!(clip.pitch_at_time(-1.0), Err(ClipError::OutOfRange { .. })));
        assert!(matches!(clip.pitch_at_time(100.5), Err(ClipError::OutOfRange { .. })));
        assert!(matches!(
            clip.pitch_at_time_with_window(50.0, 0.0),
            Err(ClipError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_stereo_pitch_uses_downmix() {
        let left = sine(500.0, 8000, 8000);
        let interleaved: Vec<i16> = left.iter().flat_map(|&s| [s, s]).collect();
        let clip = Clip::from_samples(interleaved, ClipFormat::new(8000, 2)).unwrap();
        let pitch = clip.pitch_at_time_with_window(500.0, 100.0).unwrap();
        assert!((pitch - 500.0).abs() <= 10.0, "got {pitch}");
    }

    #[test]
    fn test_spectrum_excludes_dc() {
        let bins = positive_spectrum(&[5.0, 5.0, 5.0, 5.0], 4);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].frequency, 1.0);
        assert_eq!(bins[0].magnitude, 0.0);
    }
}
