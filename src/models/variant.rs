//! The two occultation model front ends.
//!
//! Both variants share the geometry and intensity code; they differ only in
//! how parameters map to a `Geometry` and how input axis values map to planet
//! positions:
//!
//! - `OrbitalModel`: lengths in stellar radii, star at the origin, planet
//!   position `(t - epoch_shift) * 2π a / P`.
//! - `PixelGridModel`: lengths in pixels on a grid sized from the stellar and
//!   planetary radii; the axis values are the planet positions themselves.
//!
//! Parameters are never re-derived implicitly. A model is built from a
//! parameter bundle by `new`, and `with_updated` is the only way to change
//! parameters; it always returns a freshly derived, consistent model.

use crate::domain::{GridParams, ModelParams, OrbitalParams, Resolution};
use crate::error::AppError;
use crate::math::linspace;

use super::geometry::Geometry;

/// Capability set shared by both model variants.
pub trait OccultationModel: Sync {
    fn geometry(&self) -> &Geometry;

    /// Map input axis values to horizontal planet positions.
    fn planet_positions(&self, axis: &[f64]) -> Vec<f64>;

    /// Frame step count used when the caller does not choose one.
    fn default_frame_steps(&self, resolution: Resolution) -> usize;

    /// Whether quick lightcurves get the uniform limb-darkening offset
    /// correction before normalization.
    fn corrects_quick_lightcurve(&self) -> bool {
        false
    }

    /// Parameters as recorded in exports.
    fn model_params(&self) -> ModelParams;
}

/// Time-driven model.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalModel {
    params: OrbitalParams,
    geometry: Geometry,
    orbital_speed: f64,
}

impl OrbitalModel {
    pub fn new(params: OrbitalParams) -> Result<Self, AppError> {
        validate_orbital(&params)?;
        let (geometry, orbital_speed) = Self::derive(&params);
        Ok(Self {
            params,
            geometry,
            orbital_speed,
        })
    }

    /// Derive geometry and orbital speed from parameters.
    pub fn derive(params: &OrbitalParams) -> (Geometry, f64) {
        let star_x = 0.0;
        let star_y = 0.0;
        let geometry = Geometry {
            stellar_radius: 1.0,
            star_x,
            star_y,
            planetary_radius: params.planetary_radius,
            tail_length: params.planetary_radius * params.dust_tail_ratio,
            decay_constant: params.decay_constant,
            planet_y: star_y + params.impact_parameter,
            initial_intensity: params.initial_intensity,
            limb_darkening_a: params.limb_darkening_a,
            limb_darkening_b: params.limb_darkening_b,
        };
        let orbital_speed = 2.0 * std::f64::consts::PI * params.semi_major_axis / params.period;
        (geometry, orbital_speed)
    }

    /// Return a new model with edited parameters and freshly derived geometry.
    pub fn with_updated(&self, update: impl FnOnce(&mut OrbitalParams)) -> Result<Self, AppError> {
        let mut params = self.params.clone();
        update(&mut params);
        Self::new(params)
    }

    pub fn params(&self) -> &OrbitalParams {
        &self.params
    }

    /// Horizontal speed in stellar radii per day.
    pub fn orbital_speed(&self) -> f64 {
        self.orbital_speed
    }
}

impl OccultationModel for OrbitalModel {
    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn planet_positions(&self, axis: &[f64]) -> Vec<f64> {
        axis.iter()
            .map(|t| (t - self.params.epoch_shift) * self.orbital_speed)
            .collect()
    }

    fn default_frame_steps(&self, resolution: Resolution) -> usize {
        match resolution {
            Resolution::Quick => 1,
            Resolution::Slice => 30,
            Resolution::Full => 50,
        }
    }

    fn corrects_quick_lightcurve(&self) -> bool {
        true
    }

    fn model_params(&self) -> ModelParams {
        ModelParams::Orbital(self.params.clone())
    }
}

/// Fixed-resolution pixel-grid model.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGridModel {
    params: GridParams,
    geometry: Geometry,
    resolution_width: f64,
    resolution_height: f64,
}

impl PixelGridModel {
    /// Default number of planet positions in a sweep.
    pub const DEFAULT_STEP_NUMBER: usize = 300;

    pub fn new(params: GridParams) -> Result<Self, AppError> {
        validate_grid(&params)?;
        let (geometry, resolution_width, resolution_height) = Self::derive(&params);
        Ok(Self {
            params,
            geometry,
            resolution_width,
            resolution_height,
        })
    }

    /// Derive geometry and grid extent `(width, height)` from parameters.
    pub fn derive(params: &GridParams) -> (Geometry, f64, f64) {
        let stellar_radius = params.stellar_radius;
        let impact_parameter = params.impact_parameter_ratio * stellar_radius;
        let planetary_radius = params.planetary_radius_ratio * stellar_radius;

        let resolution_width = (planetary_radius * 3.0).max(stellar_radius * 3.0);
        let resolution_height = stellar_radius * 3.0;
        let star_x = resolution_width / 2.0;
        let star_y = resolution_height / 2.0;

        let geometry = Geometry {
            stellar_radius,
            star_x,
            star_y,
            planetary_radius,
            tail_length: planetary_radius * params.dust_tail_ratio,
            decay_constant: params.decay_constant,
            planet_y: star_y + impact_parameter,
            initial_intensity: params.initial_intensity,
            limb_darkening_a: params.limb_darkening_a,
            limb_darkening_b: params.limb_darkening_b,
        };
        (geometry, resolution_width, resolution_height)
    }

    /// Return a new model with edited parameters and freshly derived geometry.
    pub fn with_updated(&self, update: impl FnOnce(&mut GridParams)) -> Result<Self, AppError> {
        let mut params = self.params.clone();
        update(&mut params);
        Self::new(params)
    }

    pub fn params(&self) -> &GridParams {
        &self.params
    }

    pub fn resolution_width(&self) -> f64 {
        self.resolution_width
    }

    pub fn resolution_height(&self) -> f64 {
        self.resolution_height
    }

    /// `step_number` evenly spaced planet positions across the grid width.
    pub fn sweep(&self, step_number: usize) -> Result<Vec<f64>, AppError> {
        linspace(0.0, self.resolution_width, step_number)
    }
}

impl OccultationModel for PixelGridModel {
    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn planet_positions(&self, axis: &[f64]) -> Vec<f64> {
        axis.to_vec()
    }

    fn default_frame_steps(&self, resolution: Resolution) -> usize {
        match resolution {
            Resolution::Quick => 1,
            Resolution::Slice | Resolution::Full => 50,
        }
    }

    fn model_params(&self) -> ModelParams {
        ModelParams::Grid(self.params.clone())
    }
}

fn validate_orbital(p: &OrbitalParams) -> Result<(), AppError> {
    let fields = [
        ("planetary_radius", p.planetary_radius),
        ("dust_tail_ratio", p.dust_tail_ratio),
        ("decay_constant", p.decay_constant),
        ("impact_parameter", p.impact_parameter),
        ("initial_intensity", p.initial_intensity),
        ("limb_darkening_a", p.limb_darkening_a),
        ("limb_darkening_b", p.limb_darkening_b),
        ("epoch_shift", p.epoch_shift),
        ("semi_major_axis", p.semi_major_axis),
        ("period", p.period),
    ];
    require_finite(&fields)?;
    if p.period <= 0.0 {
        return Err(AppError::invalid(format!("Orbital period must be > 0 (got {}).", p.period)));
    }
    warn_on_decay_sign(p.decay_constant);
    Ok(())
}

fn validate_grid(p: &GridParams) -> Result<(), AppError> {
    let fields = [
        ("planetary_radius_ratio", p.planetary_radius_ratio),
        ("dust_tail_ratio", p.dust_tail_ratio),
        ("decay_constant", p.decay_constant),
        ("stellar_radius", p.stellar_radius),
        ("impact_parameter_ratio", p.impact_parameter_ratio),
        ("initial_intensity", p.initial_intensity),
        ("limb_darkening_a", p.limb_darkening_a),
        ("limb_darkening_b", p.limb_darkening_b),
    ];
    require_finite(&fields)?;
    if p.stellar_radius <= 0.0 {
        return Err(AppError::invalid(format!(
            "Stellar radius must be > 0 pixels (got {}).",
            p.stellar_radius
        )));
    }
    warn_on_decay_sign(p.decay_constant);
    Ok(())
}

fn require_finite(fields: &[(&str, f64)]) -> Result<(), AppError> {
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(AppError::invalid(format!("Parameter {name} must be finite (got {value}).")));
        }
    }
    Ok(())
}

fn warn_on_decay_sign(decay_constant: f64) {
    if decay_constant >= 0.0 {
        tracing::warn!(decay_constant, "decay constant is non-negative; tail brightness will grow towards the core");
    }
}
