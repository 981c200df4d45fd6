//! Gridded time series input.

use ndarray::{Array3, ArrayView3};

use crate::error::BandpassError;

/// A 3-D field indexed by `(time, row, column)`.
///
/// Time steps are assumed uniformly spaced (one per day for the seed index).
/// Missing input values are `NaN`; a `NaN` inside a filter window makes the
/// filtered value at that step missing.
///
/// # Example
///
/// ```ignore
/// use tcseed_bandpass::TimeGrid;
///
/// let grid = TimeGrid::from_shape_vec((3, 1, 2), vec![0.0; 6])?;
/// assert_eq!(grid.n_times(), 3);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TimeGrid {
    data: Array3<f64>,
}

impl TimeGrid {
    /// Wraps an existing `(t, i, j)` array.
    pub fn new(data: Array3<f64>) -> Self {
        Self { data }
    }

    /// Builds a grid from row-major flat data (`data[(t * ny + i) * nx + j]`).
    ///
    /// # Errors
    ///
    /// Returns [`BandpassError::InvalidShape`] if `data.len()` is not
    /// `nt * ny * nx`.
    pub fn from_shape_vec(
        shape: (usize, usize, usize),
        data: Vec<f64>,
    ) -> Result<Self, BandpassError> {
        let len = data.len();
        let expected = shape.0 * shape.1 * shape.2;
        Array3::from_shape_vec(shape, data)
            .map(Self::new)
            .map_err(|_| BandpassError::InvalidShape {
                shape,
                expected,
                len,
            })
    }

    /// A grid holding the same value everywhere.
    pub fn constant(shape: (usize, usize, usize), value: f64) -> Self {
        Self::new(Array3::from_elem(shape, value))
    }

    /// Builds a grid by evaluating `f(t, i, j)` at every index.
    pub fn from_fn<F>(shape: (usize, usize, usize), mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> f64,
    {
        Self::new(Array3::from_shape_fn(shape, |(t, i, j)| f(t, i, j)))
    }

    /// Shape as `(n_times, n_rows, n_cols)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Number of time steps.
    pub fn n_times(&self) -> usize {
        self.data.dim().0
    }

    /// Number of spatial rows (latitudes).
    pub fn n_rows(&self) -> usize {
        self.data.dim().1
    }

    /// Number of spatial columns (longitudes).
    pub fn n_cols(&self) -> usize {
        self.data.dim().2
    }

    /// Read-only view of the underlying array.
    pub fn view(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }

    /// Consumes the grid, returning the underlying array.
    pub fn into_inner(self) -> Array3<f64> {
        self.data
    }
}

impl From<Array3<f64>> for TimeGrid {
    fn from(data: Array3<f64>) -> Self {
        Self::new(data)
    }
}
