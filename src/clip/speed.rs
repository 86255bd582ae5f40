// Transforms that reshape the sample sequence: reversal, speed changes and
// frame-rate / channel conversion.
use super::{Clip, clamp_sample};
use crate::check;
use crate::error::{ClipError, Result};
use crate::shared::ClipFormat;

impl Clip {
    /// Plays the clip backwards. Frames are reversed whole, so stereo channels
    /// stay on their own side.
    pub fn reverse(&mut self) {
        let channels = self.channels();
        let reversed: Vec<i16> = self
            .samples
            .chunks_exact(channels)
            .rev()
            .flatten()
            .copied()
            .collect();
        self.load_samples(reversed);
    }

    /// Speeds the clip up (`factor > 1`) or slows it down (`factor < 1`), the way
    /// a tape machine would: duration and pitch change together.
    pub fn change_speed(&mut self, factor: f64) -> Result<()> {
        let factor = check::finite("factor", factor)?;
        if factor < 0.0 {
            return Err(ClipError::invalid("factor", "a non-negative speed factor", factor));
        }
        if factor == 0.0 {
            return Err(ClipError::domain("cannot change speed by a factor of 0"));
        }
        let scaled = (self.frame_rate() as f64 * factor).trunc();
        if scaled > u32::MAX as f64 {
            return Err(ClipError::invalid(
                "factor",
                format!("a speed factor that keeps the frame rate within {} Hz", u32::MAX),
                factor,
            ));
        }
        let spoofed_rate = scaled as u32;
        if spoofed_rate == 0 {
            return Err(ClipError::domain(format!(
                "a speed factor of {factor} slows {} Hz audio down to nothing",
                self.frame_rate()
            )));
        }
        let resampled = resample_linear(&self.samples, self.channels(), spoofed_rate, self.frame_rate());
        self.load_samples(resampled);
        Ok(())
    }

    /// Resamples to `frame_rate` without changing pitch or duration.
    pub fn set_frame_rate(&mut self, frame_rate: u32) -> Result<()> {
        let frame_rate = check::positive_rate("frame_rate", frame_rate)?;
        let resampled = resample_linear(&self.samples, self.channels(), self.frame_rate(), frame_rate);
        let template = ClipFormat { frame_rate, ..self.format };
        self.load_from_samples(resampled, template)
    }

    /// Converts between mono and multi-channel audio. Mono is copied to every
    /// channel; going to mono averages the channels.
    pub fn set_channels(&mut self, channels: u16) -> Result<()> {
        let from = self.format.channels;
        if channels == 0 || (channels != from && channels != 1 && from != 1) {
            return Err(ClipError::invalid(
                "channels",
                format!("1, or any count when converting from mono (clip has {from})"),
                channels,
            ));
        }
        let remixed = remix(&self.samples, from as usize, channels as usize);
        let template = ClipFormat { channels, ..self.format };
        self.load_from_samples(remixed, template)
    }

    /// Samples of this clip converted to `target`'s rate and channel count.
    pub(super) fn converted_to(&self, target: ClipFormat) -> Vec<i16> {
        let remixed = remix(&self.samples, self.channels(), target.channels as usize);
        resample_linear(&remixed, target.channels as usize, self.frame_rate(), target.frame_rate)
    }
}

/// Linear-interpolation resampler over interleaved frames.
pub(crate) fn resample_linear(samples: &[i16], channels: usize, source_rate: u32, target_rate: u32) -> Vec<i16> {
    if source_rate == target_rate || samples.is_empty() {
        return samples.to_vec();
    }
    let frames: Vec<&[i16]> = samples.chunks_exact(channels).collect();
    let ratio = target_rate as f64 / source_rate as f64;
    let out_len = (frames.len() as f64 * ratio).ceil() as usize;
    let mut out = Vec::with_capacity(out_len * channels);

    for i in 0..out_len {
        let src_pos = i as f64 / ratio; // ex. 3.7
        let idx = src_pos.floor() as usize; // ex. 3
        let frac = src_pos - idx as f64; // ex. 0.7
        if idx >= frames.len() - 1 {
            out.extend_from_slice(frames[frames.len() - 1]);
        } else {
            let (a, b) = (frames[idx], frames[idx + 1]);
            out.extend(
                a.iter()
                    .zip(b)
                    .map(|(&a, &b)| clamp_sample((a as f64 * (1.0 - frac) + b as f64 * frac).round())),
            );
        }
    }
    out
}

/// Channel conversion. To mono averages; otherwise output channel `j` takes
/// input channel `j % from`, which duplicates mono into every channel.
pub(crate) fn remix(samples: &[i16], from: usize, to: usize) -> Vec<i16> {
    if from == to {
        return samples.to_vec();
    }
    let frames = samples.chunks_exact(from);
    if to == 1 {
        return frames
            .map(|f| (f.iter().map(|&s| s as i32).sum::<i32>() / from as i32) as i16)
            .collect();
    }
    frames.flat_map(|f| (0..to).map(move |j| f[j % from])).collect()
}
