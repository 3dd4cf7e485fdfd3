//! Input/output helpers.
//!
//! - model parameter files (`params`)
//! - lightcurve JSON read/write (`lightcurve`)
//! - CSV export (`export`)

pub mod export;
pub mod lightcurve;
pub mod params;

pub use export::*;
pub use lightcurve::*;
pub use params::*;
