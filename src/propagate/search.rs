//! Grid-search error propagation for scalar functions.
//!
//! Given nominal inputs `v_k`, asymmetric offsets `(low_k, high_k)` and a
//! function `f`, every vertex of the grid spanned by
//! `[v_k + low_k, v_k + high_k]` is evaluated and its deviation
//! `f(vertex) - f(v)` classified:
//!
//! - strictly positive deviations bound the upper error
//! - strictly negative deviations bound the lower error
//! - zero (and NaN) deviations are ignored
//!
//! A single input is just a one-dimensional grid. Cost is `steps^dimensions`
//! evaluations; callers choose `steps`.

use rayon::prelude::*;

use crate::domain::Propagation;
use crate::error::{AppError, ErrorKind};

use super::grid::CartesianGrid;

/// A function with its nominal inputs and per-input error offsets.
#[derive(Clone)]
pub struct GridSearch<F> {
    values: Vec<f64>,
    bounds: Vec<(f64, f64)>,
    function: F,
}

impl<F> std::fmt::Debug for GridSearch<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridSearch")
            .field("values", &self.values)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl<F> GridSearch<F>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    /// `bounds[k]` is `(low, high)` relative to `values[k]`; by convention
    /// `low <= 0 <= high`, though either order samples the same interval.
    pub fn new(values: Vec<f64>, bounds: Vec<(f64, f64)>, function: F) -> Result<Self, AppError> {
        if bounds.len() != values.len() {
            return Err(AppError::new(
                ErrorKind::Dimensionality,
                format!(
                    "Expected one (low, high) error bound per value: {} values, {} bounds.",
                    values.len(),
                    bounds.len()
                ),
            ));
        }
        if values.is_empty() {
            return Err(AppError::invalid("Grid search needs at least one input value."));
        }
        if values.iter().any(|v| !v.is_finite())
            || bounds.iter().any(|(lo, hi)| !(lo.is_finite() && hi.is_finite()))
        {
            return Err(AppError::invalid("Grid search values and error bounds must be finite."));
        }
        Ok(Self {
            values,
            bounds,
            function,
        })
    }

    /// Nominal input values (never modified by a search).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Evaluate the whole grid on the rayon pool.
    pub fn propagate(&self, steps: usize) -> Result<Propagation, AppError> {
        let grid = self.grid(steps)?;
        let nominal = self.nominal()?;
        let dims = grid.dimensions();

        let envelope = (0..grid.len())
            .into_par_iter()
            .map_init(
                || vec![0.0; dims],
                |vertex, index| {
                    grid.fill_vertex(index, vertex);
                    (self.function)(&vertex[..]) - nominal
                },
            )
            .fold(Envelope::default, Envelope::push)
            .reduce(Envelope::default, Envelope::merge);

        envelope.finish(nominal)
    }

    /// Evaluate the whole grid on the calling thread, vertex by vertex.
    pub fn propagate_serial(&self, steps: usize) -> Result<Propagation, AppError> {
        let grid = self.grid(steps)?;
        let nominal = self.nominal()?;

        let envelope = grid
            .iter()
            .map(|vertex| (self.function)(&vertex) - nominal)
            .fold(Envelope::default(), Envelope::push);

        envelope.finish(nominal)
    }

    fn nominal(&self) -> Result<f64, AppError> {
        let nominal = (self.function)(&self.values);
        if !nominal.is_finite() {
            return Err(AppError::invalid(format!(
                "Function is not finite at the nominal inputs {:?} (got {nominal}).",
                self.values
            )));
        }
        Ok(nominal)
    }

    fn grid(&self, steps: usize) -> Result<CartesianGrid, AppError> {
        let grid = CartesianGrid::new(&self.values, &self.bounds, steps)?;
        tracing::debug!(
            dimensions = grid.dimensions(),
            steps,
            vertices = grid.len(),
            "grid search"
        );
        Ok(grid)
    }
}

/// Grid search over a function of a single scalar input.
pub fn scalar_search<G>(
    value: f64,
    bounds: (f64, f64),
    function: G,
) -> Result<GridSearch<impl Fn(&[f64]) -> f64 + Sync>, AppError>
where
    G: Fn(f64) -> f64 + Sync,
{
    GridSearch::new(vec![value], vec![bounds], move |inputs: &[f64]| function(inputs[0]))
}

/// Running min/max of classified deviations.
///
/// `push` and `merge` are associative and commutative, so any split of the
/// grid across workers reduces to the same result.
#[derive(Debug, Clone, Copy, Default)]
struct Envelope {
    below: Option<f64>,
    above: Option<f64>,
}

impl Envelope {
    fn push(self, deviation: f64) -> Self {
        if deviation > 0.0 {
            Self {
                above: Some(self.above.map_or(deviation, |m| m.max(deviation))),
                ..self
            }
        } else if deviation < 0.0 {
            Self {
                below: Some(self.below.map_or(deviation, |m| m.min(deviation))),
                ..self
            }
        } else {
            self
        }
    }

    fn merge(self, other: Self) -> Self {
        let below = match (self.below, other.below) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let above = match (self.above, other.above) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        Self { below, above }
    }

    fn finish(self, nominal: f64) -> Result<Propagation, AppError> {
        let min_deviation = self.below.ok_or_else(|| {
            AppError::new(
                ErrorKind::NoDeviations,
                format!("No negative deviations found around nominal output {nominal}."),
            )
        })?;
        let max_deviation = self.above.ok_or_else(|| {
            AppError::new(
                ErrorKind::NoDeviations,
                format!("No positive deviations found around nominal output {nominal}."),
            )
        })?;
        Ok(Propagation {
            min_deviation,
            max_deviation,
            nominal,
        })
    }
}
