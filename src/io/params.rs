//! Read model parameter files.
//!
//! A parameter file is a JSON object holding any subset of the fields of
//! `OrbitalParams` or `GridParams`; missing fields take their defaults.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Read a parameter bundle from a JSON file.
pub fn read_params_json<P: DeserializeOwned>(path: &Path) -> Result<P, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open parameter file '{}': {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::io(format!("Invalid parameter file '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use crate::domain::{GridParams, OrbitalParams};

    #[test]
    fn partial_orbital_params_fall_back_to_defaults() {
        let p: OrbitalParams =
            serde_json::from_str(r#"{ "planetary_radius": 0.6, "semi_major_axis": 200 }"#).unwrap();
        assert_eq!(p.planetary_radius, 0.6);
        assert_eq!(p.semi_major_axis, 200.0);
        assert_eq!(p.period, OrbitalParams::default().period);
    }

    #[test]
    fn empty_object_is_the_default_grid() {
        let p: GridParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p, GridParams::default());
    }
}
