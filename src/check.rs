// Boundary validators. Each returns the typed error for one argument so the
// public methods can check everything up front, before touching any samples.
use crate::error::{ClipError, Result};

pub fn finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ClipError::invalid(name, "a finite number", value))
    }
}

pub fn non_negative(name: &'static str, value: f64) -> Result<f64> {
    let value = finite(name, value)?;
    if value < 0.0 {
        return Err(ClipError::invalid(name, "a non-negative number", value));
    }
    Ok(value)
}

pub fn positive_rate(name: &'static str, value: u32) -> Result<u32> {
    if value == 0 {
        return Err(ClipError::invalid(name, "a positive number of frames per second", value));
    }
    Ok(value)
}

/// Validates a `[start_ms, end_ms)` window against a clip of `duration_ms`.
pub fn time_range(start_ms: f64, end_ms: f64, duration_ms: f64) -> Result<(f64, f64)> {
    let start_ms = non_negative("start_ms", start_ms)?;
    let end_ms = non_negative("end_ms", end_ms)?;
    let bounds = format!("0ms..={duration_ms:.2}ms");
    if start_ms > duration_ms {
        return Err(ClipError::invalid("start_ms", format!("a time within {bounds}"), format!("{start_ms}ms")));
    }
    if end_ms > duration_ms {
        return Err(ClipError::invalid("end_ms", format!("a time within {bounds}"), format!("{end_ms}ms")));
    }
    if start_ms >= end_ms {
        return Err(ClipError::invalid(
            "start_ms",
            format!("less than end_ms ({end_ms}ms)"),
            format!("{start_ms}ms"),
        ));
    }
    Ok((start_ms, end_ms))
}
