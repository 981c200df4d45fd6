//! Lanczos low-pass filter weights.

use std::f64::consts::PI;

use tracing::debug;

use crate::error::LanczosError;

/// Symmetric convolution weights for a low-pass filter.
///
/// Built by [`low_pass_weights`] (which also records the requested window and
/// cutoff) or from raw values with [`FilterWeights::new`]. The effective
/// window used for convolution is [`FilterWeights::len`], which is generally
/// not the `window` that was requested.
///
/// # Example
///
/// ```ignore
/// use tcseed_lanczos::low_pass_weights;
///
/// let w = low_pass_weights(50, 1.0 / 3.0)?;
/// assert_eq!(w.len(), 49);
/// assert_eq!(w.window(), Some(50));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FilterWeights {
    values: Vec<f64>,
    window: Option<usize>,
    cutoff: Option<f64>,
}

impl FilterWeights {
    /// Wraps raw weight values.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`LanczosError::InvalidWeights`] | `values` is empty |
    /// | [`LanczosError::InvalidWeights`] | any value is NaN or infinite |
    pub fn new(values: Vec<f64>) -> Result<Self, LanczosError> {
        if values.is_empty() {
            return Err(LanczosError::InvalidWeights {
                reason: "no weights given".into(),
            });
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(LanczosError::InvalidWeights {
                reason: format!("weight {pos} is not finite"),
            });
        }
        Ok(Self {
            values,
            window: None,
            cutoff: None,
        })
    }

    /// Returns the weights as a slice, in time order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Number of weights, i.e. the effective convolution window.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no weights.
    ///
    /// Note: a valid `FilterWeights` is never empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of the center weight (`len / 2`).
    pub fn center(&self) -> usize {
        self.values.len() / 2
    }

    /// Value of the center weight. Equals `2 * cutoff` for generated weights.
    pub fn center_weight(&self) -> f64 {
        self.values[self.center()]
    }

    /// Sum of all weights: the filter's gain at zero frequency.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Window length the weights were generated from, if known.
    pub fn window(&self) -> Option<usize> {
        self.window
    }

    /// Cutoff frequency (inverse time steps) the weights were generated from, if known.
    pub fn cutoff(&self) -> Option<f64> {
        self.cutoff
    }

    /// Checks `w[i] == w[len - 1 - i]` within an absolute tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let n = self.values.len();
        (0..n / 2).all(|i| (self.values[i] - self.values[n - 1 - i]).abs() <= tol)
    }
}

impl AsRef<[f64]> for FilterWeights {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

/// Converts a cutoff period in time steps (e.g. 3 days) into a cutoff frequency.
///
/// # Errors
///
/// Returns [`LanczosError::InvalidPeriod`] unless `period` is finite and
/// greater than 2 (the Nyquist period).
pub fn cutoff_from_period(period: f64) -> Result<f64, LanczosError> {
    if !period.is_finite() || period <= 2.0 {
        return Err(LanczosError::InvalidPeriod(period));
    }
    Ok(1.0 / period)
}

/// Computes Lanczos low-pass filter weights.
///
/// With `order = (window - 1) / 2 + 1` and `n = order`, the full kernel has
/// `2n + 1` entries centred on `n`:
///
/// - `w[n] = 2 * cutoff`
/// - `w[n ± k] = sin(2π·cutoff·k) / (πk) · sin(πk/n) · n / (πk)` for `0 < k < n`
///
/// The two end entries are structurally zero and are dropped, so the result
/// has `2 * order - 1` weights. No normalization is applied.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`LanczosError::InvalidWindow`] | `window == 0` |
/// | [`LanczosError::InvalidCutoff`] | `cutoff` not finite or outside `(0, 0.5)` |
pub fn low_pass_weights(window: usize, cutoff: f64) -> Result<FilterWeights, LanczosError> {
    if window == 0 {
        return Err(LanczosError::InvalidWindow(window));
    }
    if !cutoff.is_finite() || cutoff <= 0.0 || cutoff >= 0.5 {
        return Err(LanczosError::InvalidCutoff(cutoff));
    }

    let order = (window - 1) / 2 + 1;
    let nwts = 2 * order + 1;
    let n = nwts / 2;
    let nf = n as f64;

    let mut w = vec![0.0_f64; nwts];
    w[n] = 2.0 * cutoff;
    for k in 1..n {
        let kf = k as f64;
        let sigma = (PI * kf / nf).sin() * nf / (PI * kf);
        let rect = (2.0 * PI * cutoff * kf).sin() / (PI * kf);
        w[n - k] = rect * sigma;
        w[n + k] = rect * sigma;
    }

    let values = w[1..nwts - 1].to_vec();
    debug!(window, cutoff, len = values.len(), "generated Lanczos weights");

    Ok(FilterWeights {
        values,
        window: Some(window),
        cutoff: Some(cutoff),
    })
}
