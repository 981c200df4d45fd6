//! Centered sliding-window convolution along the time axis.

use std::ops::Range;

use ndarray::{Array3, ArrayView3, ArrayViewMut2, Axis, s};
use rayon::prelude::*;
use tcseed_lanczos::FilterWeights;
use tracing::debug;

use crate::config::BandpassConfig;
use crate::error::BandpassError;
use crate::grid::TimeGrid;

/// Output of a time filter: same shape as its source grid.
///
/// Time steps outside [`valid_range`](Self::valid_range) had no full window
/// and hold `NaN`. Inside the range a value is still missing when the source
/// had a `NaN` anywhere in that window.
#[derive(Clone, Debug, PartialEq)]
pub struct FilteredGrid {
    data: Array3<f64>,
    valid_start: usize,
    valid_end: usize,
}

impl FilteredGrid {
    fn new(data: Array3<f64>, valid: Range<usize>) -> Self {
        let (valid_start, valid_end) = if valid.start < valid.end {
            (valid.start, valid.end)
        } else {
            (0, 0)
        };
        Self {
            data,
            valid_start,
            valid_end,
        }
    }

    /// Shape as `(n_times, n_rows, n_cols)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Time steps for which a full window was available.
    pub fn valid_range(&self) -> Range<usize> {
        self.valid_start..self.valid_end
    }

    /// Number of time steps with a full window.
    pub fn n_valid_times(&self) -> usize {
        self.valid_end - self.valid_start
    }

    /// Value at `(t, i, j)`, or `None` if missing.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn get(&self, t: usize, i: usize, j: usize) -> Option<f64> {
        let v = self.data[[t, i, j]];
        (!v.is_nan()).then_some(v)
    }

    /// Returns `true` if the value at `(t, i, j)` is missing.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn is_missing(&self, t: usize, i: usize, j: usize) -> bool {
        self.data[[t, i, j]].is_nan()
    }

    /// Read-only view of the underlying array (`NaN` = missing).
    pub fn view(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }

    /// Consumes the grid, returning the underlying array.
    pub fn into_inner(self) -> Array3<f64> {
        self.data
    }
}

/// Applies `weights` as a centered moving weighted sum along time.
///
/// Runs with the default [`BandpassConfig`]; see [`apply_filter_with`].
pub fn apply_filter(grid: &TimeGrid, weights: &FilterWeights) -> FilteredGrid {
    apply_filter_with(grid, weights, &BandpassConfig::default())
}

/// Applies `weights` as a centered moving weighted sum along time.
///
/// For a window of `L = weights.len()` the output at step `t` is
/// `Σ_k weights[k] · grid[t - L/2 + k]`, defined for every `t` with
/// `L/2` earlier and `L - 1 - L/2` later steps available. Every other step
/// is `NaN`. When the grid has fewer than `L` steps the whole output is
/// `NaN`.
///
/// Each output time slice is accumulated independently, so with
/// `config.parallel()` slices are computed on the rayon pool.
pub fn apply_filter_with(
    grid: &TimeGrid,
    weights: &FilterWeights,
    config: &BandpassConfig,
) -> FilteredGrid {
    let (nt, ny, nx) = grid.shape();
    let len = weights.len();
    let before = len / 2;
    let after = len - 1 - before;

    let mut out = Array3::from_elem((nt, ny, nx), f64::NAN);
    if nt < len {
        debug!(
            n_times = nt,
            window = len,
            "time extent shorter than filter window; output is all missing"
        );
        return FilteredGrid::new(out, 0..0);
    }

    let valid = before..nt - after;
    let src = grid.view();
    let w = weights.as_slice();

    let accumulate = |t: usize, mut slice: ArrayViewMut2<'_, f64>| {
        slice.fill(0.0);
        for (k, &wk) in w.iter().enumerate() {
            slice.scaled_add(wk, &src.index_axis(Axis(0), t - before + k));
        }
    };

    let mut target = out.slice_mut(s![valid.clone(), .., ..]);
    if config.parallel() {
        target
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(offset, slice)| accumulate(valid.start + offset, slice));
    } else {
        target
            .axis_iter_mut(Axis(0))
            .enumerate()
            .for_each(|(offset, slice)| accumulate(valid.start + offset, slice));
    }

    debug!(
        window = len,
        first_valid = valid.start,
        end_valid = valid.end,
        "applied time filter"
    );
    FilteredGrid::new(out, valid)
}

/// Difference of two low-pass outputs: `high_cut - low_cut`.
///
/// A value is missing wherever either operand is missing. The buffer of
/// `high_cut` is reused for the result.
///
/// # Errors
///
/// Returns [`BandpassError::ShapeMismatch`] if the two grids differ in shape.
pub fn bandpass(
    high_cut: FilteredGrid,
    low_cut: &FilteredGrid,
) -> Result<FilteredGrid, BandpassError> {
    if high_cut.shape() != low_cut.shape() {
        return Err(BandpassError::ShapeMismatch {
            context: "bandpass".into(),
            expected: high_cut.shape(),
            got: low_cut.shape(),
        });
    }

    let start = high_cut.valid_start.max(low_cut.valid_start);
    let end = high_cut.valid_end.min(low_cut.valid_end);

    let mut data = high_cut.data;
    data -= &low_cut.data;
    Ok(FilteredGrid::new(data, start..end))
}
