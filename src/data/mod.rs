//! Synthetic observation helpers.

pub mod noise;

pub use noise::*;
