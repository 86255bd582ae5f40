use std::path::Path;

use super::DecodedAudio;
use crate::clip::Clip;
use crate::error::{ClipError, Result};
use crate::shared::{ClipFormat, SAMPLE_WIDTH};

// Read a WAV file, converting whatever it holds down to 16-bit samples
pub fn read(path: &Path) -> Result<DecodedAudio> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<i16> = match spec.sample_format {
        hound::SampleFormat::Float => reader // float, scale to full range
            .samples::<f32>()
            .map(|s| s.map(|x| (x.clamp(-1.0, 1.0) * Clip::MAX_AMPLITUDE as f32) as i16))
            .collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int if spec.bits_per_sample <= 16 => {
            let shift = 16 - spec.bits_per_sample as u32; // 8-bit files scale up
            reader
                .samples::<i16>()
                .map(|s| s.map(|x| x << shift))
                .collect::<Result<Vec<_>, _>>()?
        }
        hound::SampleFormat::Int => {
            let shift = spec.bits_per_sample as u32 - 16; // drop the extra precision
            reader
                .samples::<i32>()
                .map(|s| s.map(|x| (x >> shift) as i16))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    if spec.channels == 0 || spec.sample_rate == 0 {
        return Err(ClipError::invalid(
            "path",
            "a WAV file with at least one channel and a positive sample rate",
            path.display(),
        ));
    }

    Ok(DecodedAudio {
        samples,
        format: ClipFormat::new(spec.sample_rate, spec.channels),
    })
}

pub fn write(samples: &[i16], format: ClipFormat, path: &Path) -> Result<()> {
    let spec = hound::WavSpec {
        channels: format.channels,
        sample_rate: format.frame_rate,
        bits_per_sample: SAMPLE_WIDTH * 8,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}
