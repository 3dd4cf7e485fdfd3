//! Lightcurve generation at three resolutions.
//!
//! Each frame sums the composite pixel intensity over a pixel layout:
//!
//! - quick: the stellar centre only
//! - slice: `frame_steps` pixels across the stellar diameter on the centre line
//! - full:  a `frame_steps x frame_steps` grid over the disc's bounding square
//!
//! Frames are independent, so they are evaluated in parallel and collected in
//! input order. The finished curve is divided by its own maximum.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::domain::{Lightcurve, Resolution};
use crate::error::{AppError, ErrorKind};
use crate::math::linspace;

use super::geometry::Geometry;
use super::intensity::pixel_intensity;
use super::variant::OccultationModel;

/// Pixel coordinates contributing to one frame.
#[derive(Debug, Clone)]
enum PixelLayout {
    Centre,
    Row(Vec<f64>),
    Grid { xs: Vec<f64>, ys: Vec<f64> },
}

impl PixelLayout {
    fn new(g: &Geometry, resolution: Resolution, frame_steps: usize) -> Result<Self, AppError> {
        let span = |centre: f64| linspace(centre - g.stellar_radius, centre + g.stellar_radius, frame_steps);
        Ok(match resolution {
            Resolution::Quick => PixelLayout::Centre,
            Resolution::Slice => PixelLayout::Row(span(g.star_x)?),
            Resolution::Full => PixelLayout::Grid {
                xs: span(g.star_x)?,
                ys: span(g.star_y)?,
            },
        })
    }

    fn frame_flux(&self, g: &Geometry, planet_x: f64) -> f64 {
        match self {
            PixelLayout::Centre => pixel_intensity(g, planet_x, g.star_x, g.star_y),
            PixelLayout::Row(xs) => DVector::from_iterator(
                xs.len(),
                xs.iter().map(|&x| pixel_intensity(g, planet_x, x, g.star_y)),
            )
            .sum(),
            PixelLayout::Grid { xs, ys } => {
                DMatrix::from_fn(xs.len(), ys.len(), |i, j| pixel_intensity(g, planet_x, xs[i], ys[j]))
                    .sum()
            }
        }
    }
}

/// Raw (un-normalized) summed intensity of a single frame.
pub fn frame_flux<M: OccultationModel + ?Sized>(
    model: &M,
    planet_x: f64,
    resolution: Resolution,
    frame_steps: usize,
) -> Result<f64, AppError> {
    let g = model.geometry();
    let layout = PixelLayout::new(g, resolution, frame_steps)?;
    Ok(layout.frame_flux(g, planet_x))
}

/// Compute a normalized lightcurve over `axis` (times or pixel positions,
/// depending on the model variant).
///
/// `frame_steps` is ignored for `Resolution::Quick`.
pub fn lightcurve<M: OccultationModel + ?Sized>(
    model: &M,
    axis: &[f64],
    resolution: Resolution,
    frame_steps: usize,
) -> Result<Lightcurve, AppError> {
    let g = model.geometry();
    let layout = PixelLayout::new(g, resolution, frame_steps)?;
    let positions = model.planet_positions(axis);

    tracing::debug!(
        frames = positions.len(),
        resolution = resolution.display_name(),
        frame_steps,
        "computing lightcurve"
    );

    let raw: Vec<f64> = positions
        .par_iter()
        .map(|&planet_x| layout.frame_flux(g, planet_x))
        .collect();
    let mut raw = DVector::from_vec(raw);

    if resolution == Resolution::Quick && model.corrects_quick_lightcurve() {
        uniform_limb_darkening_correction(&mut raw, g.planetary_radius);
    }

    let flux = normalize(raw)?;
    Ok(Lightcurve {
        axis: axis.to_vec(),
        flux: flux.iter().copied().collect(),
    })
}

/// Single pixel at the stellar centre. Cannot resolve the planetary radius.
pub fn quick_lightcurve<M: OccultationModel + ?Sized>(model: &M, axis: &[f64]) -> Result<Lightcurve, AppError> {
    lightcurve(model, axis, Resolution::Quick, 1)
}

/// Horizontal slice through the stellar centre. The recommended trade-off.
pub fn slice_lightcurve<M: OccultationModel + ?Sized>(
    model: &M,
    axis: &[f64],
    frame_steps: usize,
) -> Result<Lightcurve, AppError> {
    lightcurve(model, axis, Resolution::Slice, frame_steps)
}

/// Full area over the stellar disc. Highest fidelity, quadratic cost in `frame_steps`.
pub fn full_lightcurve<M: OccultationModel + ?Sized>(
    model: &M,
    axis: &[f64],
    frame_steps: usize,
) -> Result<Lightcurve, AppError> {
    lightcurve(model, axis, Resolution::Full, frame_steps)
}

/// Offset a single-pixel curve as if the whole disc were uniformly bright:
/// `raw + (max - min) / r^2 - (max - min)`.
fn uniform_limb_darkening_correction(raw: &mut DVector<f64>, planetary_radius: f64) {
    if raw.is_empty() {
        return;
    }
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let delta = max - min;
    raw.add_scalar_mut(delta / (planetary_radius * planetary_radius) - delta);
}

/// Divide by the maximum, refusing curves that cannot be normalized.
fn normalize(raw: DVector<f64>) -> Result<DVector<f64>, AppError> {
    if raw.is_empty() {
        return Err(AppError::new(ErrorKind::DegenerateLightcurve, "Degenerate lightcurve: no frames."));
    }
    if let Some(bad) = raw.iter().position(|v| !v.is_finite()) {
        return Err(AppError::new(
            ErrorKind::DegenerateLightcurve,
            format!("Degenerate lightcurve: frame {bad} is not finite ({}).", raw[bad]),
        ));
    }
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= 0.0 {
        return Err(AppError::new(
            ErrorKind::DegenerateLightcurve,
            format!("Degenerate lightcurve: maximum intensity is {max}."),
        ));
    }
    Ok(raw / max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GridParams, OrbitalParams};
    use crate::models::variant::{OrbitalModel, PixelGridModel};

    fn transit_times() -> Vec<f64> {
        linspace(-0.1, 0.1, 41).unwrap()
    }

    fn assert_normalized(curve: &Lightcurve) {
        let max = curve.max_flux().unwrap();
        assert!((max - 1.0).abs() < 1e-12, "max={max}");
        assert!(curve.flux.iter().all(|v| v.is_finite() && *v >= 0.0 && *v <= 1.0 + 1e-12));
    }

    #[test]
    fn orbital_curves_peak_at_one_in_every_mode() {
        let model = OrbitalModel::new(OrbitalParams::default()).unwrap();
        let t = transit_times();
        for resolution in [Resolution::Quick, Resolution::Slice, Resolution::Full] {
            let steps = model.default_frame_steps(resolution).min(20);
            let curve = lightcurve(&model, &t, resolution, steps.max(2)).unwrap();
            assert_eq!(curve.len(), t.len());
            assert_eq!(curve.axis, t);
            assert_normalized(&curve);
        }
    }

    #[test]
    fn grid_curves_peak_at_one_in_every_mode() {
        let model = PixelGridModel::new(GridParams::default()).unwrap();
        let xs = model.sweep(40).unwrap();
        for resolution in [Resolution::Quick, Resolution::Slice, Resolution::Full] {
            let curve = lightcurve(&model, &xs, resolution, 16).unwrap();
            assert_normalized(&curve);
        }
    }

    #[test]
    fn slice_curve_peaks_while_the_tail_crosses() {
        let model = OrbitalModel::new(OrbitalParams::default()).unwrap();
        let t = linspace(-0.1, 0.1, 21).unwrap();
        let curve = slice_lightcurve(&model, &t, 30).unwrap();
        let f = &curve.flux;

        // Planet well before the disc, or far enough past it that the tail has cleared it.
        let baseline = f[0];
        for i in (0..10).chain(15..21) {
            assert!((f[i] - baseline).abs() < 1e-12, "frame {i}: {} != {baseline}", f[i]);
        }
        // The squared tail term dwarfs the bare star.
        assert!(baseline < 0.05, "baseline={baseline}");

        let peak = f.iter().copied().enumerate().max_by(|a, b| a.1.total_cmp(&b.1)).unwrap();
        assert_eq!(peak.0, 13);
        assert_eq!(peak.1, 1.0);
        for i in 12..15 {
            assert!(f[i] > 10.0 * baseline, "frame {i}: {}", f[i]);
        }
    }

    #[test]
    fn quick_correction_offsets_by_scaled_range() {
        let mut raw = DVector::from_vec(vec![2.0, 5.0, 3.0]);
        // range 3, offset 3 / 0.5^2 - 3 = 9
        uniform_limb_darkening_correction(&mut raw, 0.5);
        assert_eq!(raw.as_slice(), &[11.0, 14.0, 12.0]);
    }

    #[test]
    fn orbital_quick_curve_applies_the_correction_before_normalizing() {
        let model = OrbitalModel::new(OrbitalParams::default()).unwrap();
        assert!(model.corrects_quick_lightcurve());
        let t = transit_times();

        let raw: Vec<f64> = model
            .planet_positions(&t)
            .iter()
            .map(|&x| frame_flux(&model, x, Resolution::Quick, 1).unwrap())
            .collect();
        let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
        assert!(max > min);
        let offset = (max - min) / (0.1 * 0.1) - (max - min);
        let corrected: Vec<f64> = raw.iter().map(|r| r + offset).collect();
        let peak = corrected.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let curve = quick_lightcurve(&model, &t).unwrap();
        for (got, c) in curve.flux.iter().zip(&corrected) {
            let want = c / peak;
            assert!((got - want).abs() < 1e-12, "got={got} want={want}");
        }
    }

    #[test]
    fn grid_quick_curve_is_not_corrected() {
        let model = PixelGridModel::new(GridParams::default()).unwrap();
        assert!(!model.corrects_quick_lightcurve());
        let xs = model.sweep(40).unwrap();

        let raw: Vec<f64> = xs
            .iter()
            .map(|&x| frame_flux(&model, x, Resolution::Quick, 1).unwrap())
            .collect();
        let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let curve = quick_lightcurve(&model, &xs).unwrap();
        for (got, r) in curve.flux.iter().zip(&raw) {
            assert!((got - r / max).abs() < 1e-12, "got={got} want={}", r / max);
        }
    }

    #[test]
    fn slice_sum_converges_when_steps_double() {
        let model = OrbitalModel::new(OrbitalParams::default()).unwrap();
        // Planet well clear of the disc; only the limb-darkened star contributes.
        let area = |steps: usize| {
            let h = 2.0 / (steps as f64 - 1.0);
            frame_flux(&model, 50.0, Resolution::Slice, steps).unwrap() * h
        };
        let estimates: Vec<f64> = [8, 16, 32, 64, 128].iter().map(|&n| area(n)).collect();
        let deltas: Vec<f64> = estimates.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
        for pair in deltas.windows(2) {
            assert!(pair[1] < pair[0], "non-monotone convergence: {deltas:?}");
        }
    }

    #[test]
    fn full_sum_approaches_disc_integral() {
        let model = OrbitalModel::new(OrbitalParams::default()).unwrap();
        // ∫∫ I dA over the unit disc for I0=160, a=0.3, b=0.1 is 2π·I0·(1/2 - a/6 - b/12) ≈ 444.01.
        let (a, b) = (0.3, 0.1);
        let exact = 2.0 * std::f64::consts::PI * 160.0 * (0.5 - a / 6.0 - b / 12.0);
        let steps = 64;
        let h = 2.0 / (steps as f64 - 1.0);
        let estimate = frame_flux(&model, 50.0, Resolution::Full, steps).unwrap() * h * h;
        assert!((estimate - exact).abs() / exact < 0.02, "estimate={estimate} exact={exact}");
    }

    #[test]
    fn quick_curve_is_degenerate_without_a_core() {
        // Zero radius and a far transit line: every frame sees the bare star,
        // so the offset correction divides 0 by 0.
        let model = OrbitalModel::new(OrbitalParams {
            planetary_radius: 0.0,
            impact_parameter: 10.0,
            ..OrbitalParams::default()
        })
        .unwrap();
        let err = quick_lightcurve(&model, &transit_times()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateLightcurve);
    }

    #[test]
    fn dark_star_is_degenerate_in_every_mode() {
        let model = PixelGridModel::new(GridParams {
            initial_intensity: 0.0,
            ..GridParams::default()
        })
        .unwrap();
        let xs = model.sweep(20).unwrap();
        for resolution in [Resolution::Quick, Resolution::Slice, Resolution::Full] {
            let err = lightcurve(&model, &xs, resolution, 8).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DegenerateLightcurve);
        }
    }

    #[test]
    fn empty_axis_is_degenerate() {
        let model = OrbitalModel::new(OrbitalParams::default()).unwrap();
        let err = slice_lightcurve(&model, &[], 30).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateLightcurve);
    }

    #[test]
    fn single_step_slice_is_rejected() {
        let model = OrbitalModel::new(OrbitalParams::default()).unwrap();
        let err = slice_lightcurve(&model, &transit_times(), 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
