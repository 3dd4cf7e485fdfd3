//! Occultation intensity model for a star transited by a planetary core
//! trailing a dust tail.
//!
//! The geometry and intensity laws are small, pure functions of a derived
//! `Geometry`; the two model variants differ only in their parameter front end
//! and in how input axis values become planet positions.

pub mod geometry;
pub mod intensity;
pub mod lightcurve;
pub mod variant;

pub use geometry::*;
pub use intensity::*;
pub use lightcurve::*;
pub use variant::*;
