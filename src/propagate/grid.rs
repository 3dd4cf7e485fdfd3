//! Cartesian-product sampling grids.
//!
//! Dimension 0 is the outermost (slowest varying) axis and the last dimension
//! the innermost, so vertex `i` from `CartesianGrid::iter` is the same vertex
//! `CartesianGrid::fill_vertex(i, ..)` decodes. The iterator walks an odometer
//! of per-dimension indices; no recursion, and the grid itself is never
//! mutated, so it can be iterated any number of times.

use crate::error::{AppError, ErrorKind};
use crate::math::linspace;

#[derive(Debug, Clone)]
pub struct CartesianGrid {
    axes: Vec<Vec<f64>>,
    len: usize,
}

impl CartesianGrid {
    /// Sample `[value + low, value + high]` into `steps` points for every input.
    pub fn new(values: &[f64], bounds: &[(f64, f64)], steps: usize) -> Result<Self, AppError> {
        if values.len() != bounds.len() {
            return Err(AppError::new(
                ErrorKind::Dimensionality,
                format!(
                    "Expected one error bound per value: {} values, {} bounds.",
                    values.len(),
                    bounds.len()
                ),
            ));
        }
        if values.is_empty() {
            return Err(AppError::invalid("Grid needs at least one dimension."));
        }
        let dims = u32::try_from(values.len())
            .map_err(|_| AppError::invalid(format!("Too many grid dimensions: {}.", values.len())))?;
        let len = steps.checked_pow(dims).ok_or_else(|| {
            AppError::invalid(format!("Grid of {steps}^{dims} vertices does not fit in memory indices."))
        })?;

        let axes = values
            .iter()
            .zip(bounds)
            .map(|(&value, &(low, high))| linspace(value + low, value + high, steps))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { axes, len })
    }

    /// Total number of vertices (`steps^dimensions`).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn dimensions(&self) -> usize {
        self.axes.len()
    }

    /// Write vertex `index` into `out`.
    ///
    /// # Panics
    /// Panics if `out.len() != self.dimensions()` or `index >= self.len()`.
    pub(crate) fn fill_vertex(&self, index: usize, out: &mut [f64]) {
        assert_eq!(out.len(), self.axes.len(), "vertex buffer has wrong dimension");
        assert!(index < self.len, "vertex index {index} out of range");

        let mut rem = index;
        for (slot, axis) in out.iter_mut().zip(&self.axes).rev() {
            let n = axis.len();
            *slot = axis[rem % n];
            rem /= n;
        }
    }

    /// Lazily enumerate all vertices in index order.
    pub fn iter(&self) -> Vertices<'_> {
        Vertices {
            grid: self,
            indices: vec![0; self.axes.len()],
            remaining: self.len,
        }
    }
}

impl<'a> IntoIterator for &'a CartesianGrid {
    type Item = Vec<f64>;
    type IntoIter = Vertices<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Odometer over grid vertices.
#[derive(Debug, Clone)]
pub struct Vertices<'a> {
    grid: &'a CartesianGrid,
    indices: Vec<usize>,
    remaining: usize,
}

impl Iterator for Vertices<'_> {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let axes = &self.grid.axes;
        let vertex: Vec<f64> = self.indices.iter().zip(axes).map(|(&i, axis)| axis[i]).collect();

        for d in (0..self.indices.len()).rev() {
            self.indices[d] += 1;
            if self.indices[d] < axes[d].len() {
                break;
            }
            self.indices[d] = 0;
        }
        self.remaining -= 1;
        Some(vertex)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Vertices<'_> {}
