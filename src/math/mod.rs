//! Numeric helpers shared by the occultation model and the grid search.

pub mod space;

pub use space::*;
