//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - model parameter bundles for both occultation variants (`OrbitalParams`, `GridParams`)
//! - lightcurve resolution modes (`Resolution`)
//! - computed outputs (`Lightcurve`, `Propagation`, `LightcurveFile`)
//! - run configurations assembled by the CLI (`LightcurveConfig`, `PropagateConfig`)

pub mod types;

pub use types::*;
