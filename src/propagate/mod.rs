//! Grid-search error propagation.
//!
//! Responsibilities:
//!
//! - span each input's asymmetric error interval with evenly spaced samples
//! - enumerate every vertex of the resulting hypercube (parallel or serial)
//! - reduce the deviations from the nominal output to an asymmetric envelope

pub mod functions;
pub mod grid;
pub mod search;

pub use functions::*;
pub use grid::*;
pub use search::*;
