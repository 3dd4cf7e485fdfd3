//! Text reports for lightcurve and propagation runs.

use crate::domain::{Lightcurve, Propagation, PropagateConfig, Resolution, Variant};
use crate::io::axis_label;

/// Summary block for a generated lightcurve.
pub fn format_lightcurve_summary(
    curve: &Lightcurve,
    variant: Variant,
    resolution: Resolution,
    frame_steps: usize,
    noise_sigma: Option<f64>,
) -> String {
    let mut out = String::new();

    out.push_str("=== cde - CDE lightcurve ===\n");
    out.push_str(&format!(
        "Model: {} | resolution: {}",
        match variant {
            Variant::Orbital => "orbital",
            Variant::Grid => "pixel grid",
        },
        resolution.display_name()
    ));
    if resolution != Resolution::Quick {
        out.push_str(&format!(" | frame steps: {frame_steps}"));
    }
    out.push('\n');

    if let (Some(first), Some(last)) = (curve.axis.first(), curve.axis.last()) {
        out.push_str(&format!(
            "Frames: n={} | {}=[{first:.4}, {last:.4}]\n",
            curve.len(),
            axis_label(variant)
        ));
    }
    if let (Some(min), Some(max)) = (curve.min_flux(), curve.max_flux()) {
        out.push_str(&format!("Flux: min={min:.6} | max={max:.6}"));
        if min > 0.0 {
            out.push_str(&format!(" | contrast={:.4}", max / min));
        }
        out.push('\n');
    }
    if let Some(sigma) = noise_sigma {
        out.push_str(&format!("Noise: gaussian sigma={sigma}\n"));
    }
    out
}

/// Up to `rows` evenly spaced rows of the curve.
pub fn format_lightcurve_table(curve: &Lightcurve, variant: Variant, rows: usize) -> String {
    let mut out = String::new();
    if rows == 0 || curve.is_empty() {
        return out;
    }

    out.push_str(&format!("{:>14}  {:>12}\n", axis_label(variant), "flux"));
    let n = curve.len();
    let stride = n.div_ceil(rows).max(1);
    for i in (0..n).step_by(stride) {
        out.push_str(&format!("{:>14.6}  {:>12.8}\n", curve.axis[i], curve.flux[i]));
    }
    out
}

/// Envelope report for a grid-search propagation.
pub fn format_propagation(result: &Propagation, config: &PropagateConfig) -> String {
    let mut out = String::new();

    out.push_str("=== cde - grid search error propagation ===\n");
    out.push_str(&format!(
        "Function: {:?} | dimensions: {} | steps: {} | vertices: {}\n",
        config.function,
        config.values.len(),
        config.steps,
        config
            .steps
            .checked_pow(config.values.len() as u32)
            .map_or_else(|| "overflow".to_string(), |v| v.to_string()),
    ));
    for (i, (value, (low, high))) in config.values.iter().zip(&config.bounds).enumerate() {
        out.push_str(&format!("  x{i} = {value} ({low:+}, {high:+})\n"));
    }
    out.push_str(&format!(
        "Result: {:.6e} (-{:.6e}, +{:.6e})\n",
        result.nominal,
        result.min_deviation.abs(),
        result.max_deviation
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TargetFunction;

    #[test]
    fn table_is_thinned_to_the_requested_rows() {
        let curve = Lightcurve {
            axis: (0..100).map(|i| i as f64).collect(),
            flux: vec![1.0; 100],
        };
        let table = format_lightcurve_table(&curve, Variant::Grid, 10);
        // Header plus ten rows.
        assert_eq!(table.lines().count(), 11);
        assert!(table.lines().next().unwrap().contains("position"));
        assert!(format_lightcurve_table(&curve, Variant::Grid, 0).is_empty());
    }

    #[test]
    fn summary_reports_contrast() {
        let curve = Lightcurve {
            axis: vec![-0.1, 0.0, 0.1],
            flux: vec![1.0, 0.75, 1.0],
        };
        let s = format_lightcurve_summary(&curve, Variant::Orbital, Resolution::Slice, 30, None);
        assert!(s.contains("min=0.750000 | max=1.000000 | contrast=1.3333"), "{s}");
        assert!(s.contains("frame steps: 30"));
        assert!(s.contains("time=[-0.1000, 0.1000]"));
    }

    #[test]
    fn propagation_report_lists_inputs() {
        let config = PropagateConfig {
            function: TargetFunction::ActivityAge,
            values: vec![-6.0165],
            bounds: vec![(-0.08, 0.08)],
            steps: 100,
            serial: false,
        };
        let result = Propagation {
            min_deviation: -1.0e8,
            max_deviation: 2.0e8,
            nominal: 1.0e9,
        };
        let s = format_propagation(&result, &config);
        assert!(s.contains("x0 = -6.0165 (-0.08, +0.08)"));
        assert!(s.contains("vertices: 100"));
    }
}
