//! `cde-lightcurves` library crate.
//!
//! Synthetic transit lightcurves for catastrophically disintegrating
//! exoplanets (a planetary core trailed by a dust tail), plus a grid-search
//! propagator for asymmetric errors.
//!
//! The binary (`cde`) is a thin wrapper around this library so that the
//! models and the search are testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod propagate;
pub mod report;
