//! Blocking playback on the default output device.
//!
//! The clip is converted to the device's own rate and channel count, handed to a
//! cpal output stream, and the caller waits until the callback reports that the
//! buffer has drained. Running without an audio device is not an error: playback
//! just doesn't happen.

use std::time::Duration;

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use crossbeam_channel::Sender;
use tracing::{debug, error, info, warn};

use crate::clip::{remix, resample_linear};
use crate::shared::ClipFormat;

// Slack on top of the clip's duration before giving up on the done signal.
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Something that can sound out a buffer of samples.
pub trait Player {
    fn play(&self, samples: &[i16], format: ClipFormat);
}

/// The system's default output device.
#[derive(Clone, Copy, Debug, Default)]
pub struct DevicePlayer;

impl Player for DevicePlayer {
    fn play(&self, samples: &[i16], format: ClipFormat) {
        if samples.is_empty() {
            return;
        }
        if let Err(e) = play_blocking(samples, format) {
            warn!("playback skipped: {e:#}");
        }
    }
}

fn play_blocking(samples: &[i16], format: ClipFormat) -> anyhow::Result<()> {
    let host = cpal::default_host();
    let Some(device) = host.default_output_device() else {
        info!("no default output device, skipping playback");
        return Ok(());
    };
    let supported = device.default_output_config().context("no default output config")?;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();
    debug!(?config, ?sample_format, "opening output stream");

    let device_channels = config.channels as usize;
    let device_rate = config.sample_rate;
    let remixed = remix(samples, format.channels as usize, device_channels);
    let pcm = resample_linear(&remixed, device_channels, format.frame_rate, device_rate);

    let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);
    let stream = match sample_format {
        cpal::SampleFormat::F32 => build_output_stream::<f32>(&device, &config, pcm, done_tx)?,
        cpal::SampleFormat::I16 => build_output_stream::<i16>(&device, &config, pcm, done_tx)?,
        cpal::SampleFormat::U16 => build_output_stream::<u16>(&device, &config, pcm, done_tx)?,
        other => anyhow::bail!("unsupported device sample format {other:?}"),
    };
    stream.play().context("failed to play output stream")?;

    let frames = samples.len() / format.channels as usize;
    let duration = Duration::from_secs_f64(format.duration_ms(frames) / 1000.0);
    if done_rx.recv_timeout(duration + DRAIN_GRACE).is_err() {
        warn!("playback did not finish within {:?}", duration + DRAIN_GRACE);
    }
    Ok(())
}

fn build_output_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    pcm: Vec<i16>,
    done_tx: Sender<()>,
) -> anyhow::Result<cpal::Stream>
where
    T: SizedSample + FromSample<i16>,
{
    let mut pos = 0;
    let mut finished = false;
    let err_fn = |err| error!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _info: &cpal::OutputCallbackInfo| {
            for out in data.iter_mut() {
                *out = match pcm.get(pos) {
                    Some(&s) => {
                        pos += 1;
                        T::from_sample(s)
                    }
                    None => T::EQUILIBRIUM,
                };
            }
            if pos >= pcm.len() && !finished {
                finished = true;
                let _ = done_tx.try_send(());
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
