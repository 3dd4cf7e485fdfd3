//! Evenly spaced sampling.
//!
//! Both the lightcurve pixel rows and the error-propagation axes are built from
//! inclusive, evenly spaced samples between two endpoints. The endpoints may be
//! given in either order; the samples run from `start` towards `end`.

use crate::error::AppError;

/// Generate `steps` evenly spaced points from `start` to `end` (inclusive).
pub fn linspace(start: f64, end: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(start.is_finite() && end.is_finite()) {
        return Err(AppError::invalid(format!(
            "Invalid sample range: start={start}, end={end} (must be finite)."
        )));
    }
    if steps < 2 {
        return Err(AppError::invalid(format!("Sample steps must be >= 2 (got {steps}).")));
    }

    let step = (end - start) / (steps as f64 - 1.0);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps - 1 {
        out.push(start + step * i as f64);
    }
    // Pin the last sample so the range is exactly inclusive.
    out.push(end);
    Ok(out)
}
