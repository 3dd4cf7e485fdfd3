//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging and the worker pool
//! - parses CLI arguments and layers them over parameter files and defaults
//! - runs the lightcurve or propagation pipeline
//! - prints reports and writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, GridArgs, ModelCommand, OrbitalArgs, OutputArgs, PropagateArgs, ShowArgs};
use crate::domain::{
    GridParams, LightcurveConfig, NoiseConfig, OrbitalParams, PropagateConfig, SweepConfig,
};
use crate::error::AppError;

pub mod pipeline;

/// Log filter variable (same syntax as `RUST_LOG`).
pub const LOG_ENV: &str = "CDE_LOG";

/// Worker thread count for the rayon pool.
pub const THREADS_ENV: &str = "CDE_THREADS";

/// Entry point for the `cde` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();
    init_logging();
    configure_threads()?;

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Lightcurve(args) => {
            let config = match args.model {
                ModelCommand::Orbital(args) => orbital_config_from_args(&args)?,
                ModelCommand::Grid(args) => grid_config_from_args(&args)?,
            };
            handle_lightcurve(&config)
        }
        Command::Propagate(args) => handle_propagate(&propagate_config_from_args(&args)),
        Command::Show(args) => handle_show(&args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn configure_threads() -> Result<(), AppError> {
    let Ok(raw) = std::env::var(THREADS_ENV) else {
        return Ok(());
    };
    let threads = raw
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| AppError::invalid(format!("{THREADS_ENV} must be a positive integer (got '{raw}').")))?;
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|e| AppError::invalid(format!("Failed to size the worker pool: {e}")))?;
    tracing::debug!(threads, "worker pool configured");
    Ok(())
}

fn handle_lightcurve(config: &LightcurveConfig) -> Result<(), AppError> {
    let run = pipeline::run_lightcurve(config)?;
    let variant = run.params.variant();

    println!(
        "{}",
        crate::report::format_lightcurve_summary(
            &run.curve,
            variant,
            run.resolution,
            run.frame_steps,
            run.noise_sigma,
        )
    );
    if config.print_rows > 0 {
        println!(
            "{}",
            crate::report::format_lightcurve_table(&run.curve, variant, config.print_rows)
        );
    }

    if let Some(path) = &config.export_csv {
        crate::io::write_lightcurve_csv(path, &run.curve, variant)?;
        tracing::info!(path = %path.display(), "wrote lightcurve CSV");
    }
    if let Some(path) = &config.export_json {
        let file = crate::io::lightcurve_file(
            run.params,
            run.resolution,
            run.frame_steps,
            run.noise_sigma,
            run.curve,
        );
        crate::io::write_lightcurve_json(path, &file)?;
        tracing::info!(path = %path.display(), "wrote lightcurve JSON");
    }
    Ok(())
}

fn handle_propagate(config: &PropagateConfig) -> Result<(), AppError> {
    let result = pipeline::run_propagation(config)?;
    println!("{}", crate::report::format_propagation(&result, config));
    Ok(())
}

fn handle_show(args: &ShowArgs) -> Result<(), AppError> {
    print!("{}", format_saved_lightcurve(args)?);
    Ok(())
}

/// Report for a saved lightcurve file, in the same layout as a fresh run.
pub fn format_saved_lightcurve(args: &ShowArgs) -> Result<String, AppError> {
    let file = crate::io::read_lightcurve_json(&args.file)?;
    let variant = file.params.variant();

    let mut out = crate::report::format_lightcurve_summary(
        &file.lightcurve,
        variant,
        file.resolution,
        file.frame_steps,
        file.noise_sigma,
    );
    out.push_str(&format!(
        "Generated: {} by {}\n",
        file.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        file.tool
    ));
    out.push_str(&crate::report::format_lightcurve_table(&file.lightcurve, variant, args.rows));
    Ok(out)
}

/// Defaults, then `--params`, then individual flags.
pub fn orbital_config_from_args(args: &OrbitalArgs) -> Result<LightcurveConfig, AppError> {
    let mut params = match &args.params {
        Some(path) => crate::io::read_params_json::<OrbitalParams>(path)?,
        None => OrbitalParams::default(),
    };
    override_with(&mut params.planetary_radius, args.planetary_radius);
    override_with(&mut params.dust_tail_ratio, args.dust_tail_ratio);
    override_with(&mut params.decay_constant, args.decay_constant);
    override_with(&mut params.impact_parameter, args.impact_parameter);
    override_with(&mut params.initial_intensity, args.initial_intensity);
    override_with(&mut params.limb_darkening_a, args.limb_darkening_a);
    override_with(&mut params.limb_darkening_b, args.limb_darkening_b);
    override_with(&mut params.epoch_shift, args.epoch_shift);
    override_with(&mut params.semi_major_axis, args.semi_major_axis);
    override_with(&mut params.period, args.period);

    let sweep = SweepConfig::Orbital {
        params,
        t_start: args.t_start,
        t_end: args.t_end,
        samples: args.samples,
    };
    Ok(lightcurve_config(sweep, &args.output))
}

/// Defaults, then `--params`, then individual flags.
pub fn grid_config_from_args(args: &GridArgs) -> Result<LightcurveConfig, AppError> {
    let mut params = match &args.params {
        Some(path) => crate::io::read_params_json::<GridParams>(path)?,
        None => GridParams::default(),
    };
    override_with(&mut params.planetary_radius_ratio, args.planetary_radius_ratio);
    override_with(&mut params.dust_tail_ratio, args.dust_tail_ratio);
    override_with(&mut params.decay_constant, args.decay_constant);
    override_with(&mut params.stellar_radius, args.stellar_radius);
    override_with(&mut params.impact_parameter_ratio, args.impact_parameter_ratio);
    override_with(&mut params.initial_intensity, args.initial_intensity);
    override_with(&mut params.limb_darkening_a, args.limb_darkening_a);
    override_with(&mut params.limb_darkening_b, args.limb_darkening_b);

    let sweep = SweepConfig::Grid {
        params,
        step_number: args.step_number,
    };
    Ok(lightcurve_config(sweep, &args.output))
}

pub fn propagate_config_from_args(args: &PropagateArgs) -> PropagateConfig {
    PropagateConfig {
        function: args.function,
        values: args.values.clone(),
        bounds: args.errors.clone(),
        steps: args.steps,
        serial: args.serial,
    }
}

fn lightcurve_config(sweep: SweepConfig, output: &OutputArgs) -> LightcurveConfig {
    LightcurveConfig {
        sweep,
        resolution: output.mode,
        frame_steps: output.frame_steps,
        noise: output.noise.map(|sigma| NoiseConfig {
            sigma,
            seed: output.seed,
        }),
        export_csv: output.export.clone(),
        export_json: output.export_json.clone(),
        print_rows: output.rows,
    }
}

fn override_with(field: &mut f64, value: Option<f64>) {
    if let Some(value) = value {
        *field = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, LightcurveArgs};
    use crate::domain::Resolution;

    fn parse_orbital(argv: &[&str]) -> OrbitalArgs {
        let cli = Cli::try_parse_from(argv.iter().copied()).unwrap();
        match cli.command {
            Command::Lightcurve(LightcurveArgs {
                model: ModelCommand::Orbital(args),
            }) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse_orbital(&["cde", "lightcurve", "orbital", "--planetary-radius", "0.2", "--noise", "0.01"]);
        let config = orbital_config_from_args(&args).unwrap();
        let SweepConfig::Orbital { params, samples, .. } = &config.sweep else {
            panic!("expected orbital sweep");
        };
        assert_eq!(params.planetary_radius, 0.2);
        assert_eq!(params.dust_tail_ratio, OrbitalParams::default().dust_tail_ratio);
        assert_eq!(*samples, 100);
        assert_eq!(config.resolution, Resolution::Slice);
        assert_eq!(config.noise, Some(NoiseConfig { sigma: 0.01, seed: 42 }));
    }

    #[test]
    fn flags_override_params_file() {
        let dir = std::env::temp_dir().join(format!("cde-app-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("grid.json");
        std::fs::write(&path, r#"{"stellar_radius": 25.0, "decay_constant": -10.0}"#).unwrap();

        let cli = Cli::try_parse_from([
            "cde",
            "lightcurve",
            "grid",
            "--params",
            path.to_str().unwrap(),
            "--decay-constant",
            "-20",
        ])
        .unwrap();
        let Command::Lightcurve(LightcurveArgs {
            model: ModelCommand::Grid(args),
        }) = cli.command
        else {
            panic!("expected grid lightcurve");
        };
        let config = grid_config_from_args(&args).unwrap();
        let SweepConfig::Grid { params, step_number } = &config.sweep else {
            panic!("expected grid sweep");
        };
        assert_eq!(params.stellar_radius, 25.0);
        assert_eq!(params.decay_constant, -20.0);
        assert_eq!(params.initial_intensity, GridParams::default().initial_intensity);
        assert_eq!(*step_number, 300);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn exported_json_can_be_shown_again() {
        let path = std::env::temp_dir().join(format!("cde-show-{}.json", std::process::id()));
        let args = parse_orbital(&["cde", "lightcurve", "orbital", "--samples", "12", "--mode", "quick"]);
        let config = LightcurveConfig {
            export_json: Some(path.clone()),
            ..orbital_config_from_args(&args).unwrap()
        };
        handle_lightcurve(&config).unwrap();

        let report = format_saved_lightcurve(&ShowArgs {
            file: path.clone(),
            rows: 3,
        })
        .unwrap();
        std::fs::remove_file(&path).ok();

        assert!(report.contains("Model: orbital"), "{report}");
        assert!(report.contains("Frames: n=12"), "{report}");
        assert!(report.contains("by cde"), "{report}");
        // Only the table header and its three rows are indented.
        assert_eq!(report.lines().filter(|l| l.starts_with("  ")).count(), 4, "{report}");
    }

    #[test]
    fn missing_params_file_is_an_io_error() {
        let args = parse_orbital(&["cde", "lightcurve", "orbital", "--params", "/nonexistent/cde.json"]);
        let err = orbital_config_from_args(&args).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }
}
