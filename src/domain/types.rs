//! Shared domain types.
//!
//! Parameter bundles are plain, serializable structs so they can be:
//!
//! - loaded from a JSON parameter file (partial files fall back to defaults)
//! - overridden field by field from the command line
//! - echoed back into exported lightcurve files

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How many pixels contribute to each lightcurve frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// A single pixel at the stellar centre. Fast, but blind to the planetary radius.
    Quick,
    /// A horizontal row of pixels through the stellar centre.
    Slice,
    /// A square grid of pixels covering the stellar disc.
    Full,
}

impl Resolution {
    pub fn display_name(self) -> &'static str {
        match self {
            Resolution::Quick => "quick (single pixel)",
            Resolution::Slice => "slice",
            Resolution::Full => "full area",
        }
    }
}

/// Which front end produced the planet positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Positions derived from observation times via the orbital speed.
    Orbital,
    /// Positions swept linearly across a fixed pixel grid.
    Grid,
}

/// Parameters for the time-driven model (lengths in stellar radii).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitalParams {
    pub planetary_radius: f64,
    pub dust_tail_ratio: f64,
    /// Exponential decay scale of the tail brightness (negative by convention).
    pub decay_constant: f64,
    pub impact_parameter: f64,
    pub initial_intensity: f64,
    pub limb_darkening_a: f64,
    pub limb_darkening_b: f64,
    pub epoch_shift: f64,
    /// Semi-major axis in stellar radii.
    pub semi_major_axis: f64,
    /// Orbital period in days.
    pub period: f64,
}

impl Default for OrbitalParams {
    fn default() -> Self {
        Self {
            planetary_radius: 0.1,
            dust_tail_ratio: 45.0,
            decay_constant: -45.0,
            impact_parameter: 0.0,
            initial_intensity: 160.0,
            limb_darkening_a: 0.3,
            limb_darkening_b: 0.1,
            epoch_shift: 0.0,
            semi_major_axis: 15.0,
            period: 0.85,
        }
    }
}

/// Parameters for the fixed-resolution pixel-grid model.
///
/// Radii and the impact parameter are given as ratios to `stellar_radius`,
/// which is itself the model resolution in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    pub planetary_radius_ratio: f64,
    pub dust_tail_ratio: f64,
    pub decay_constant: f64,
    pub stellar_radius: f64,
    pub impact_parameter_ratio: f64,
    pub initial_intensity: f64,
    pub limb_darkening_a: f64,
    pub limb_darkening_b: f64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            planetary_radius_ratio: 0.1,
            dust_tail_ratio: 45.0,
            decay_constant: -45.0,
            stellar_radius: 40.0,
            impact_parameter_ratio: 0.0,
            initial_intensity: 160.0,
            limb_darkening_a: 0.3,
            limb_darkening_b: 0.1,
        }
    }
}

/// A normalized lightcurve and the axis it was sampled on.
///
/// For the orbital model `axis` holds observation times; for the pixel-grid
/// model it holds horizontal planet positions in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lightcurve {
    pub axis: Vec<f64>,
    pub flux: Vec<f64>,
}

impl Lightcurve {
    pub fn len(&self) -> usize {
        self.flux.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flux.is_empty()
    }

    /// Smallest flux value, or `None` for an empty curve.
    pub fn min_flux(&self) -> Option<f64> {
        self.flux.iter().copied().reduce(f64::min)
    }

    /// Largest flux value, or `None` for an empty curve.
    pub fn max_flux(&self) -> Option<f64> {
        self.flux.iter().copied().reduce(f64::max)
    }
}

/// Output envelope of a grid-search error propagation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Propagation {
    /// Most negative deviation from the nominal output (always < 0).
    pub min_deviation: f64,
    /// Most positive deviation from the nominal output (always > 0).
    pub max_deviation: f64,
    /// Function value at the nominal inputs.
    pub nominal: f64,
}

/// Model parameters as recorded in an exported lightcurve file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum ModelParams {
    Orbital(OrbitalParams),
    Grid(GridParams),
}

impl ModelParams {
    pub fn variant(&self) -> Variant {
        match self {
            ModelParams::Orbital(_) => Variant::Orbital,
            ModelParams::Grid(_) => Variant::Grid,
        }
    }
}

/// A saved lightcurve (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightcurveFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub resolution: Resolution,
    pub frame_steps: usize,
    pub params: ModelParams,
    /// Standard deviation of the synthetic noise added after normalization, if any.
    pub noise_sigma: Option<f64>,
    pub lightcurve: Lightcurve,
}

/// Seeded Gaussian noise settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseConfig {
    pub sigma: f64,
    pub seed: u64,
}

/// How the planet positions are produced for a lightcurve run.
#[derive(Debug, Clone)]
pub enum SweepConfig {
    /// Evenly spaced observation times for the orbital model.
    Orbital {
        params: OrbitalParams,
        t_start: f64,
        t_end: f64,
        samples: usize,
    },
    /// Evenly spaced horizontal positions across the pixel grid.
    Grid { params: GridParams, step_number: usize },
}

/// A full lightcurve run as understood by the pipeline.
///
/// This is derived from CLI flags, an optional parameter file, and defaults.
#[derive(Debug, Clone)]
pub struct LightcurveConfig {
    pub sweep: SweepConfig,
    pub resolution: Resolution,
    /// `None` selects the model's default for the chosen resolution.
    pub frame_steps: Option<usize>,
    pub noise: Option<NoiseConfig>,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
    /// Number of table rows printed to stdout (0 prints the summary only).
    pub print_rows: usize,
}

/// Functions the CLI can propagate errors through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TargetFunction {
    /// Stellar radius (m) from `[luminosity (W), effective temperature (K)]`.
    StellarRadius,
    /// Chromospheric activity age from `[log R'HK]`.
    ActivityAge,
    /// Peak-to-trough flux ratio of the default orbital model's transit from
    /// `[planetary_radius, dust_tail_ratio]`.
    TransitContrast,
}

impl TargetFunction {
    /// Number of inputs the function expects.
    pub fn arity(self) -> usize {
        match self {
            TargetFunction::StellarRadius => 2,
            TargetFunction::ActivityAge => 1,
            TargetFunction::TransitContrast => 2,
        }
    }
}

/// A grid-search propagation run as understood by the pipeline.
#[derive(Debug, Clone)]
pub struct PropagateConfig {
    pub function: TargetFunction,
    pub values: Vec<f64>,
    /// `(low, high)` offsets relative to each nominal value.
    pub bounds: Vec<(f64, f64)>,
    pub steps: usize,
    /// Walk the grid on the calling thread instead of the rayon pool.
    pub serial: bool,
}
