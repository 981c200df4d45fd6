//! Band-pass variance pipeline.

use tcseed_lanczos::FilterWeights;
use tracing::{info, warn};

use crate::config::BandpassConfig;
use crate::error::BandpassError;
use crate::filter::{FilteredGrid, apply_filter_with, bandpass};
use crate::grid::TimeGrid;
use crate::variance::{VarianceMap, temporal_variance};

/// Band-passed field: `lowpass(grid, high) - lowpass(grid, low)`.
///
/// `high` holds the weights with the higher cutoff frequency (shorter cutoff
/// period, e.g. 3 days) and `low` the lower one (e.g. 10 days). At most two
/// filtered grids are alive at any time.
///
/// # Errors
///
/// Returns [`BandpassError::InvalidConfig`] if `config` fails validation, or
/// [`BandpassError::ShapeMismatch`] if the filtered grids disagree in shape.
pub fn compute_bandpass(
    grid: &TimeGrid,
    high: &FilterWeights,
    low: &FilterWeights,
    config: &BandpassConfig,
) -> Result<FilteredGrid, BandpassError> {
    config.validate()?;

    let (nt, ny, nx) = grid.shape();
    let longest = high.len().max(low.len());
    if nt < longest {
        warn!(
            n_times = nt,
            longest_window = longest,
            "not enough time steps for a full filter window"
        );
    }

    let high_cut = apply_filter_with(grid, high, config);
    let low_cut = apply_filter_with(grid, low, config);
    if high_cut.shape() != grid.shape() || low_cut.shape() != grid.shape() {
        return Err(BandpassError::ShapeMismatch {
            context: "low-pass filtering".into(),
            expected: grid.shape(),
            got: if high_cut.shape() != grid.shape() {
                high_cut.shape()
            } else {
                low_cut.shape()
            },
        });
    }

    let band = bandpass(high_cut, &low_cut)?;
    info!(
        n_times = nt,
        n_rows = ny,
        n_cols = nx,
        high_window = high.len(),
        low_window = low.len(),
        n_valid_times = band.n_valid_times(),
        "band-pass filter applied"
    );
    Ok(band)
}

/// Temporal variance of the band-passed field at every spatial cell.
///
/// The variance uses `config.ddof()` (0 by default, the population
/// definition) and skips missing samples; cells with fewer than two samples
/// are missing. A grid shorter than the longer filter yields an all-missing
/// map, not an error.
///
/// # Errors
///
/// See [`compute_bandpass`].
pub fn compute_variance(
    grid: &TimeGrid,
    high: &FilterWeights,
    low: &FilterWeights,
    config: &BandpassConfig,
) -> Result<VarianceMap, BandpassError> {
    let band = compute_bandpass(grid, high, low, config)?;
    let map = temporal_variance(&band, config.ddof(), config.parallel());
    info!(
        n_valid = map.n_valid(),
        n_cells = map.shape().0 * map.shape().1,
        "temporal variance computed"
    );
    Ok(map)
}
