//! Shared run logic behind the CLI subcommands.
//!
//! Lightcurve runs: parameters -> model -> axis -> lightcurve -> optional noise.
//! Propagation runs: target function -> grid search -> envelope.
//!
//! Printing and exports stay in `app`; everything here returns plain values.

use crate::domain::{
    Lightcurve, LightcurveConfig, ModelParams, OrbitalParams, Propagation, PropagateConfig,
    Resolution, SweepConfig, TargetFunction,
};
use crate::error::{AppError, ErrorKind};
use crate::math::linspace;
use crate::models::{OccultationModel, OrbitalModel, PixelGridModel, lightcurve, slice_lightcurve};
use crate::propagate::{GridSearch, chromospheric_activity_age, stellar_radius};

/// All computed outputs of a single `cde lightcurve` run.
#[derive(Debug, Clone)]
pub struct LightcurveRun {
    pub params: ModelParams,
    pub resolution: Resolution,
    /// Frame steps actually used (the model default when none was requested).
    pub frame_steps: usize,
    pub noise_sigma: Option<f64>,
    pub curve: Lightcurve,
}

/// Build the configured model, sweep it, and apply optional noise.
pub fn run_lightcurve(config: &LightcurveConfig) -> Result<LightcurveRun, AppError> {
    let (params, frame_steps, curve) = match &config.sweep {
        SweepConfig::Orbital {
            params,
            t_start,
            t_end,
            samples,
        } => {
            let model = OrbitalModel::new(params.clone())?;
            let times = linspace(*t_start, *t_end, *samples)?;
            sweep_model(&model, &times, config)?
        }
        SweepConfig::Grid { params, step_number } => {
            let model = PixelGridModel::new(params.clone())?;
            let positions = model.sweep(*step_number)?;
            sweep_model(&model, &positions, config)?
        }
    };

    let curve = match config.noise {
        Some(noise) => crate::data::add_photometric_noise(&curve, noise)?,
        None => curve,
    };

    Ok(LightcurveRun {
        params,
        resolution: config.resolution,
        frame_steps,
        noise_sigma: config.noise.map(|n| n.sigma),
        curve,
    })
}

fn sweep_model<M: OccultationModel>(
    model: &M,
    axis: &[f64],
    config: &LightcurveConfig,
) -> Result<(ModelParams, usize, Lightcurve), AppError> {
    let frame_steps = config
        .frame_steps
        .unwrap_or_else(|| model.default_frame_steps(config.resolution));
    let curve = lightcurve(model, axis, config.resolution, frame_steps)?;
    Ok((model.model_params(), frame_steps, curve))
}

/// Propagate the configured errors through the selected target function.
pub fn run_propagation(config: &PropagateConfig) -> Result<Propagation, AppError> {
    let arity = config.function.arity();
    if config.values.len() != arity {
        return Err(AppError::invalid(format!(
            "Function '{:?}' takes {arity} input(s), got {} value(s).",
            config.function,
            config.values.len()
        )));
    }

    match config.function {
        TargetFunction::StellarRadius => search(config, stellar_radius),
        TargetFunction::ActivityAge => search(config, |v: &[f64]| chromospheric_activity_age(v[0])),
        TargetFunction::TransitContrast => search(config, transit_contrast),
    }
}

fn search<F>(config: &PropagateConfig, function: F) -> Result<Propagation, AppError>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    let search = GridSearch::new(config.values.clone(), config.bounds.clone(), function)?;
    if config.serial {
        search.propagate_serial(config.steps)
    } else {
        search.propagate(config.steps)
    }
}

/// Observation window and slice resolution used for transit contrasts.
const CONTRAST_WINDOW: (f64, f64) = (-0.1, 0.1);
const CONTRAST_SAMPLES: usize = 60;
const CONTRAST_FRAME_STEPS: usize = 30;

/// `max(flux) / min(flux)` of a slice lightcurve of the default orbital model
/// with `[planetary_radius, dust_tail_ratio]` substituted.
///
/// The tail term is squared intensity, so while the tail crosses the slice the
/// summed flux rises far above the bare-star baseline: the curve peaks during
/// transit rather than dipping. The ratio of that peak to the faintest frame
/// grows with the planetary radius.
///
/// Returns NaN when the model cannot be built or the curve is degenerate, so
/// the vertex is skipped by the grid search.
pub fn transit_contrast(inputs: &[f64]) -> f64 {
    let [planetary_radius, dust_tail_ratio] = inputs else {
        return f64::NAN;
    };
    let contrast = || -> Result<f64, AppError> {
        let model = OrbitalModel::new(OrbitalParams {
            planetary_radius: *planetary_radius,
            dust_tail_ratio: *dust_tail_ratio,
            ..OrbitalParams::default()
        })?;
        let times = linspace(CONTRAST_WINDOW.0, CONTRAST_WINDOW.1, CONTRAST_SAMPLES)?;
        let curve = slice_lightcurve(&model, &times, CONTRAST_FRAME_STEPS)?;
        match (curve.max_flux(), curve.min_flux()) {
            (Some(max), Some(min)) if min > 0.0 => Ok(max / min),
            _ => Err(AppError::new(
                ErrorKind::DegenerateLightcurve,
                "Transit contrast needs a strictly positive faintest frame.",
            )),
        }
    };
    match contrast() {
        Ok(ratio) => ratio,
        Err(err) => {
            tracing::debug!(planetary_radius, dust_tail_ratio, %err, "transit contrast undefined");
            f64::NAN
        }
    }
}
