//! Command-line parsing for the CDE lightcurve tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! model and search code. Parameter flags are all optional overrides on top of
//! the defaults (or a `--params` JSON file).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Resolution, TargetFunction};
use crate::models::PixelGridModel;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cde", version, about = "Synthetic lightcurves for disintegrating exoplanets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a normalized lightcurve.
    Lightcurve(LightcurveArgs),
    /// Propagate asymmetric input errors through a function by grid search.
    Propagate(PropagateArgs),
    /// Print the summary and table of a lightcurve saved with `--export-json`.
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct LightcurveArgs {
    #[command(subcommand)]
    pub model: ModelCommand,
}

/// Which model front end to use.
#[derive(Debug, Subcommand)]
pub enum ModelCommand {
    /// Time-driven model: positions from observation times and the orbit.
    Orbital(OrbitalArgs),
    /// Fixed-resolution pixel grid: positions swept across the grid.
    Grid(GridArgs),
}

/// Options shared by both model front ends.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Pixels evaluated per frame.
    #[arg(short = 'm', long, value_enum, default_value_t = Resolution::Slice)]
    pub mode: Resolution,

    /// Pixel steps per axis for slice/full modes (defaults depend on the model).
    #[arg(long)]
    pub frame_steps: Option<usize>,

    /// Add Gaussian noise with this standard deviation to the normalized curve.
    #[arg(long)]
    pub noise: Option<f64>,

    /// Random seed for `--noise`.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Rows of the lightcurve table printed to stdout (0 for summary only).
    #[arg(long, default_value_t = 20)]
    pub rows: usize,

    /// Export the lightcurve to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the lightcurve and its parameters to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct OrbitalArgs {
    /// JSON file with model parameters (flags below override it).
    #[arg(long, value_name = "JSON")]
    pub params: Option<PathBuf>,

    /// Planetary radius (stellar radii).
    #[arg(long)]
    pub planetary_radius: Option<f64>,

    /// Tail length as a multiple of the planetary radius.
    #[arg(long)]
    pub dust_tail_ratio: Option<f64>,

    /// Tail brightness decay constant (negative by convention).
    #[arg(long, allow_negative_numbers = true)]
    pub decay_constant: Option<f64>,

    /// Vertical offset of the transit path (stellar radii).
    #[arg(long, allow_negative_numbers = true)]
    pub impact_parameter: Option<f64>,

    /// Peak stellar surface brightness.
    #[arg(long)]
    pub initial_intensity: Option<f64>,

    /// Linear limb-darkening coefficient.
    #[arg(long = "ldc-a", allow_negative_numbers = true)]
    pub limb_darkening_a: Option<f64>,

    /// Quadratic limb-darkening coefficient.
    #[arg(long = "ldc-b", allow_negative_numbers = true)]
    pub limb_darkening_b: Option<f64>,

    /// Time of mid-transit (days).
    #[arg(long, allow_negative_numbers = true)]
    pub epoch_shift: Option<f64>,

    /// Semi-major axis (stellar radii).
    #[arg(long)]
    pub semi_major_axis: Option<f64>,

    /// Orbital period (days).
    #[arg(long)]
    pub period: Option<f64>,

    /// First observation time (days).
    #[arg(long, default_value_t = -0.1, allow_negative_numbers = true)]
    pub t_start: f64,

    /// Last observation time (days).
    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
    pub t_end: f64,

    /// Number of observation times.
    #[arg(long, default_value_t = 100)]
    pub samples: usize,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct GridArgs {
    /// JSON file with model parameters (flags below override it).
    #[arg(long, value_name = "JSON")]
    pub params: Option<PathBuf>,

    /// Planetary radius as a ratio of the stellar radius.
    #[arg(long)]
    pub planetary_radius_ratio: Option<f64>,

    /// Tail length as a multiple of the planetary radius.
    #[arg(long)]
    pub dust_tail_ratio: Option<f64>,

    /// Tail brightness decay constant in pixels (negative by convention).
    #[arg(long, allow_negative_numbers = true)]
    pub decay_constant: Option<f64>,

    /// Stellar radius in pixels (the model resolution).
    #[arg(long)]
    pub stellar_radius: Option<f64>,

    /// Vertical offset of the transit path as a ratio of the stellar radius.
    #[arg(long, allow_negative_numbers = true)]
    pub impact_parameter_ratio: Option<f64>,

    /// Peak stellar surface brightness.
    #[arg(long)]
    pub initial_intensity: Option<f64>,

    /// Linear limb-darkening coefficient.
    #[arg(long = "ldc-a", allow_negative_numbers = true)]
    pub limb_darkening_a: Option<f64>,

    /// Quadratic limb-darkening coefficient.
    #[arg(long = "ldc-b", allow_negative_numbers = true)]
    pub limb_darkening_b: Option<f64>,

    /// Number of planet positions swept across the grid.
    #[arg(long, default_value_t = PixelGridModel::DEFAULT_STEP_NUMBER)]
    pub step_number: usize,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct PropagateArgs {
    /// Function to propagate errors through.
    #[arg(short = 'f', long, value_enum)]
    pub function: TargetFunction,

    /// Nominal input value (repeat once per input, in order).
    #[arg(long = "value", required = true, allow_negative_numbers = true)]
    pub values: Vec<f64>,

    /// Error offsets `LOW,HIGH` relative to the matching value (repeat once per input).
    #[arg(
        long = "error",
        value_name = "LOW,HIGH",
        required = true,
        allow_hyphen_values = true,
        value_parser = parse_bound
    )]
    pub errors: Vec<(f64, f64)>,

    /// Samples per input dimension.
    #[arg(short = 's', long, default_value_t = 100)]
    pub steps: usize,

    /// Evaluate the grid on a single thread.
    #[arg(long)]
    pub serial: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Lightcurve JSON file.
    #[arg(value_name = "JSON")]
    pub file: PathBuf,

    /// Rows of the lightcurve table (0 for summary only).
    #[arg(long, default_value_t = 20)]
    pub rows: usize,
}

/// Parse `LOW,HIGH` into an offset pair.
pub fn parse_bound(raw: &str) -> Result<(f64, f64), String> {
    let (low, high) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LOW,HIGH but got '{raw}'"))?;
    let low: f64 = low
        .trim()
        .parse()
        .map_err(|e| format!("invalid LOW '{}': {e}", low.trim()))?;
    let high: f64 = high
        .trim()
        .parse()
        .map_err(|e| format!("invalid HIGH '{}': {e}", high.trim()))?;
    Ok((low, high))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bound_accepts_signed_pairs() {
        assert_eq!(parse_bound("-0.08,0.08"), Ok((-0.08, 0.08)));
        assert_eq!(parse_bound(" -1 , 2.5 "), Ok((-1.0, 2.5)));
        assert!(parse_bound("1").is_err());
        assert!(parse_bound("a,1").is_err());
    }

    #[test]
    fn propagate_command_parses_repeated_inputs() {
        let cli = Cli::try_parse_from([
            "cde", "propagate", "-f", "stellar-radius", "--value", "1.45e29", "--value", "4780",
            "--error", "-5e27,5e27", "--error", "-85,85", "--steps", "20",
        ])
        .unwrap();
        let Command::Propagate(args) = cli.command else {
            panic!("expected propagate");
        };
        assert_eq!(args.function, TargetFunction::StellarRadius);
        assert_eq!(args.values, vec![1.45e29, 4780.0]);
        assert_eq!(args.errors, vec![(-5e27, 5e27), (-85.0, 85.0)]);
        assert_eq!(args.steps, 20);
        assert!(!args.serial);
    }

    #[test]
    fn lightcurve_command_accepts_negative_overrides() {
        let cli = Cli::try_parse_from([
            "cde", "lightcurve", "orbital", "--decay-constant", "-30", "--t-start", "-0.05",
            "--mode", "full", "--frame-steps", "24",
        ])
        .unwrap();
        let Command::Lightcurve(LightcurveArgs { model: ModelCommand::Orbital(args) }) = cli.command else {
            panic!("expected orbital lightcurve");
        };
        assert_eq!(args.decay_constant, Some(-30.0));
        assert_eq!(args.t_start, -0.05);
        assert_eq!(args.output.mode, Resolution::Full);
        assert_eq!(args.output.frame_steps, Some(24));
    }

    #[test]
    fn show_command_takes_a_file() {
        let cli = Cli::try_parse_from(["cde", "show", "run.json", "--rows", "5"]).unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.file, PathBuf::from("run.json"));
        assert_eq!(args.rows, 5);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
