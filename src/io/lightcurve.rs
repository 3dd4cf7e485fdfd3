//! Read/write lightcurve JSON files.
//!
//! A lightcurve file records everything needed to regenerate the curve:
//! tool name, generation time, resolution, frame steps, the full parameter
//! bundle, optional noise sigma, and the axis/flux arrays.
//!
//! The schema is defined by `domain::LightcurveFile`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::Utc;

use crate::domain::{Lightcurve, LightcurveFile, ModelParams, Resolution};
use crate::error::AppError;

/// Assemble the file representation of a finished run.
pub fn lightcurve_file(
    params: ModelParams,
    resolution: Resolution,
    frame_steps: usize,
    noise_sigma: Option<f64>,
    lightcurve: Lightcurve,
) -> LightcurveFile {
    LightcurveFile {
        tool: "cde".to_string(),
        generated_at: Utc::now(),
        resolution,
        frame_steps,
        params,
        noise_sigma,
        lightcurve,
    }
}

/// Write a lightcurve JSON file.
pub fn write_lightcurve_json(path: &Path, file: &LightcurveFile) -> Result<(), AppError> {
    let out = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create lightcurve JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(BufWriter::new(out), file)
        .map_err(|e| AppError::io(format!("Failed to write lightcurve JSON: {e}")))?;
    Ok(())
}

/// Read a lightcurve JSON file.
pub fn read_lightcurve_json(path: &Path) -> Result<LightcurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open lightcurve JSON '{}': {e}", path.display())))?;
    let parsed: LightcurveFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::io(format!("Invalid lightcurve JSON: {e}")))?;
    if parsed.lightcurve.axis.len() != parsed.lightcurve.flux.len() {
        return Err(AppError::io(format!(
            "Lightcurve JSON has {} axis values but {} flux values.",
            parsed.lightcurve.axis.len(),
            parsed.lightcurve.flux.len()
        )));
    }
    Ok(parsed)
}
