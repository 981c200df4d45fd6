//! NaN-aware statistical reductions.
//!
//! `NaN` is the missing-value marker throughout the workspace, so every
//! reduction here skips it instead of propagating it.

/// Number of non-NaN values.
pub fn count_valid<I>(values: I) -> usize
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().filter(|v| !v.is_nan()).count()
}

/// Arithmetic mean of the non-NaN values. Returns `None` if there are none.
pub fn nan_mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (n, sum) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0usize, 0.0_f64), |(n, s), v| (n + 1, s + v));
    (n > 0).then(|| sum / n as f64)
}

/// Variance of the non-NaN values with denominator `n - ddof`.
///
/// `ddof = 0` is the population variance, `ddof = 1` the unbiased sample
/// variance. Two passes: mean first, then squared deviations.
///
/// Returns `None` when fewer than 2 values are present or when `n <= ddof`.
pub fn nan_variance<I>(values: I, ddof: usize) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
    I::IntoIter: Clone,
{
    let iter = values.into_iter();
    let mean = nan_mean(iter.clone())?;
    let n = count_valid(iter.clone());
    if n < 2 || n <= ddof {
        return None;
    }
    let ss: f64 = iter
        .filter(|v| !v.is_nan())
        .map(|v| (v - mean) * (v - mean))
        .sum();
    Some(ss / (n - ddof) as f64)
}

/// Minimum and maximum of the non-NaN values. Returns `None` if there are none.
pub fn nan_min_max<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
