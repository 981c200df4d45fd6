//! Time-bin mean resampling.

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use ndarray::{Array3, Axis, Zip};
use tcseed_bandpass::TimeGrid;
use tracing::debug;

use crate::error::IoError;
use crate::field::GriddedField;

/// Average a field into consecutive bins of length `cadence`.
///
/// Bins are anchored at midnight of the first timestamp's day and run
/// without gaps up to the bin holding the last timestamp; each output time
/// step is labelled by its bin start. Missing samples are skipped, and a bin
/// with no non-missing sample at a cell is `NaN` there, including bins that
/// contain no time step at all.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if `cadence` is not positive or a bin
/// start falls outside the representable time range.
pub fn resample_mean(field: &GriddedField, cadence: TimeDelta) -> Result<GriddedField, IoError> {
    if cadence <= TimeDelta::zero() {
        return Err(IoError::Validation {
            count: 1,
            details: format!("resample cadence must be positive, got {cadence}"),
        });
    }

    let times = field.times();
    let (Some(&first), Some(&last)) = (times.first(), times.last()) else {
        return Ok(field.clone());
    };
    let origin = first.date().and_time(NaiveTime::MIN);
    let bin_of = |t: NaiveDateTime| -> usize {
        let offset = (t - origin).num_milliseconds();
        (offset / cadence.num_milliseconds().max(1)) as usize
    };

    let n_bins = bin_of(last) + 1;
    // The last bin start bounds every other, so one checked step covers all.
    i32::try_from(n_bins - 1)
        .ok()
        .and_then(|b| cadence.checked_mul(b))
        .and_then(|offset| origin.checked_add_signed(offset))
        .ok_or_else(|| IoError::Validation {
            count: 1,
            details: format!("{n_bins} bins at cadence {cadence} overflow the time axis"),
        })?;
    let bin_times: Vec<NaiveDateTime> = (0..n_bins)
        .map(|b| origin + cadence * b as i32)
        .collect();

    let (_, ny, nx) = field.data().shape();
    let mut sums = Array3::<f64>::zeros((n_bins, ny, nx));
    let mut counts = Array3::<u32>::zeros((n_bins, ny, nx));

    for (t, slice) in field.data().view().axis_iter(Axis(0)).enumerate() {
        let b = bin_of(times[t]);
        Zip::from(sums.index_axis_mut(Axis(0), b))
            .and(counts.index_axis_mut(Axis(0), b))
            .and(slice)
            .for_each(|sum, count, &v| {
                if !v.is_nan() {
                    *sum += v;
                    *count += 1;
                }
            });
    }

    let mut means = sums;
    Zip::from(&mut means).and(&counts).for_each(|m, &c| {
        *m = if c == 0 { f64::NAN } else { *m / f64::from(c) };
    });

    let empty_bins = counts
        .axis_iter(Axis(0))
        .filter(|c| c.iter().all(|&n| n == 0))
        .count();
    debug!(
        n_in = times.len(),
        n_out = n_bins,
        empty_bins,
        cadence_minutes = cadence.num_minutes(),
        "field resampled"
    );

    GriddedField::new(
        field.name(),
        bin_times,
        field.grid().clone(),
        TimeGrid::new(means),
    )
}
