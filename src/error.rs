use std::path::PathBuf;

use thiserror::Error;

/// Everything a clip operation can fail with.
///
/// Messages are written for someone who just called the method: they name the
/// parameter, what it should have been, and what was actually passed.
#[derive(Debug, Error)]
pub enum ClipError {
    #[error("the parameter '{name}' should be {expected}, but instead was {got}")]
    InvalidArgument {
        name: &'static str,
        expected: String,
        got: String,
    },

    #[error("the parameter '{name}' is out of range: got {got}, but it must be within {bounds}")]
    OutOfRange {
        name: &'static str,
        got: String,
        bounds: String,
    },

    #[error("{0}")]
    Domain(String),

    #[error("file {} not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("could not decode audio: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("bad settings file: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = ClipError> = std::result::Result<T, E>;

impl ClipError {
    pub fn invalid(name: &'static str, expected: impl Into<String>, got: impl ToString) -> Self {
        Self::InvalidArgument {
            name,
            expected: expected.into(),
            got: got.to_string(),
        }
    }

    pub fn out_of_range(name: &'static str, got: impl ToString, bounds: impl Into<String>) -> Self {
        Self::OutOfRange {
            name,
            got: got.to_string(),
            bounds: bounds.into(),
        }
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }
}
