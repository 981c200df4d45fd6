//! Temporal variance reduction.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis, Zip};
use tcseed_stats::{count_valid, nan_mean, nan_min_max, nan_variance};

use crate::filter::FilteredGrid;

/// Per-cell temporal variance indexed by `(row, column)`.
///
/// Missing cells are `NaN`: a cell is missing when it had fewer than two
/// non-missing samples in time.
#[derive(Clone, Debug, PartialEq)]
pub struct VarianceMap {
    data: Array2<f64>,
    ddof: usize,
}

/// Summary statistics over the non-missing cells of a [`VarianceMap`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VarianceSummary {
    /// Number of non-missing cells.
    pub n_valid: usize,
    /// Number of missing cells.
    pub n_missing: usize,
    /// Smallest variance.
    pub min: f64,
    /// Largest variance.
    pub max: f64,
    /// Mean variance across cells.
    pub mean: f64,
}

impl VarianceMap {
    /// Shape as `(n_rows, n_cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Delta degrees of freedom the variance was computed with.
    pub fn ddof(&self) -> usize {
        self.ddof
    }

    /// Variance at `(i, j)`, or `None` if missing.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let v = self.data[[i, j]];
        (!v.is_nan()).then_some(v)
    }

    /// `true` where the cell is missing.
    pub fn missing_mask(&self) -> Array2<bool> {
        self.data.mapv(f64::is_nan)
    }

    /// Number of non-missing cells.
    pub fn n_valid(&self) -> usize {
        count_valid(self.data.iter().copied())
    }

    /// Min, max and mean over non-missing cells; `None` if every cell is missing.
    pub fn summary(&self) -> Option<VarianceSummary> {
        let values = self.data.iter().copied();
        let (min, max) = nan_min_max(values.clone())?;
        let mean = nan_mean(values.clone())?;
        let n_valid = count_valid(values);
        Some(VarianceSummary {
            n_valid,
            n_missing: self.data.len() - n_valid,
            min,
            max,
            mean,
        })
    }

    /// Read-only view of the underlying array (`NaN` = missing).
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Consumes the map, returning the underlying array.
    pub fn into_inner(self) -> Array2<f64> {
        self.data
    }
}

/// Variance over time of every spatial cell, skipping missing samples.
///
/// The denominator is `n - ddof` where `n` counts the non-missing samples of
/// that cell. Cells with fewer than two samples, or with `n <= ddof`, are
/// missing.
pub fn temporal_variance(field: &FilteredGrid, ddof: usize, parallel: bool) -> VarianceMap {
    let (_, ny, nx) = field.shape();
    let mut data = Array2::from_elem((ny, nx), f64::NAN);
    let view = field.view();

    let reduce = move |cell: &mut f64, series: ArrayView1<'_, f64>| {
        *cell = nan_variance(series.iter().copied(), ddof).unwrap_or(f64::NAN);
    };

    let zip = Zip::from(&mut data).and(view.lanes(Axis(0)));
    if parallel {
        zip.par_for_each(reduce);
    } else {
        zip.for_each(reduce);
    }

    VarianceMap { data, ddof }
}
