//! Formatted terminal output.
//!
//! Formatting lives in one place so the model and search code stay free of
//! presentation concerns.

pub mod format;

pub use format::*;
