//! File I/O for clips. WAV is read and written with hound; compressed formats
//! (mp3, flac, ogg, ...) are decode-only, through symphonia.

use std::path::Path;

use crate::error::{ClipError, Result};
use crate::shared::ClipFormat;

mod compressed;
mod wav;

#[derive(Clone, Debug)]
pub struct DecodedAudio {
    pub samples: Vec<i16>,
    pub format: ClipFormat,
}

pub fn decode(path: &Path) -> Result<DecodedAudio> {
    if !path.is_file() {
        return Err(ClipError::FileNotFound(path.to_path_buf()));
    }
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
    let decoded = if is_wav { wav::read(path)? } else { compressed::read(path)? };
    tracing::debug!(
        path = %path.display(),
        frame_rate = decoded.format.frame_rate,
        channels = decoded.format.channels,
        samples = decoded.samples.len(),
        "decoded audio file"
    );
    Ok(decoded)
}

pub fn encode(samples: &[i16], format: ClipFormat, path: &Path) -> Result<()> {
    match output_format(path).as_deref() {
        Some("wav") => wav::write(samples, format, path)?,
        other => {
            return Err(ClipError::invalid(
                "path",
                "a file name ending in .wav",
                format!("{} (format {:?})", path.display(), other.unwrap_or("")),
            ));
        }
    }
    tracing::debug!(path = %path.display(), samples = samples.len(), "saved audio file");
    Ok(())
}

// Everything after the first '.' of the file name: "song.wav" -> "wav".
fn output_format(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let (_, ext) = name.split_once('.')?;
    Some(ext.to_ascii_lowercase())
}
