//! Export lightcurves to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or plotting scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{Lightcurve, Variant};
use crate::error::AppError;

/// Column name for the lightcurve axis of a given variant.
pub fn axis_label(variant: Variant) -> &'static str {
    match variant {
        Variant::Orbital => "time",
        Variant::Grid => "position",
    }
}

/// Write `axis,flux` rows to a CSV file.
pub fn write_lightcurve_csv(path: &Path, curve: &Lightcurve, variant: Variant) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_csv(BufWriter::new(file), curve, variant)
        .map_err(|e| AppError::io(format!("Failed to write export CSV '{}': {e}", path.display())))
}

fn write_csv<W: Write>(mut out: W, curve: &Lightcurve, variant: Variant) -> std::io::Result<()> {
    writeln!(out, "{},flux", axis_label(variant))?;
    for (x, f) in curve.axis.iter().zip(&curve.flux) {
        writeln!(out, "{x:.10},{f:.10}")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_header_and_one_row_per_frame() {
        let curve = Lightcurve {
            axis: vec![0.0, 60.0],
            flux: vec![1.0, 0.25],
        };
        let mut buf = Vec::new();
        write_csv(&mut buf, &curve, Variant::Grid).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "position,flux");
        assert_eq!(lines[2], "60.0000000000,0.2500000000");
        assert_eq!(lines.len(), 3);
    }
}
