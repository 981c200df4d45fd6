//! Engine configuration.

use crate::error::BandpassError;

/// Options for the band-pass variance engine.
///
/// # Example
///
/// ```ignore
/// use tcseed_bandpass::BandpassConfig;
///
/// let config = BandpassConfig::default().with_ddof(1).with_parallel(false);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BandpassConfig {
    /// Delta degrees of freedom for the temporal variance (default 0).
    ddof: usize,
    /// Spread spatial work over the rayon thread pool (default true).
    parallel: bool,
}

impl Default for BandpassConfig {
    /// | Parameter | Default |
    /// |-----------|---------|
    /// | `ddof` | 0 (population variance) |
    /// | `parallel` | true |
    fn default() -> Self {
        Self {
            ddof: 0,
            parallel: true,
        }
    }
}

impl BandpassConfig {
    /// Sets the variance denominator to `n - ddof`.
    pub fn with_ddof(mut self, ddof: usize) -> Self {
        self.ddof = ddof;
        self
    }

    /// Enables or disables parallel evaluation. Results do not depend on it.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Delta degrees of freedom.
    pub fn ddof(&self) -> usize {
        self.ddof
    }

    /// Whether spatial work runs in parallel.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BandpassError::InvalidConfig`] if `ddof` is neither 0
    /// (population) nor 1 (sample).
    pub fn validate(&self) -> Result<(), BandpassError> {
        if self.ddof > 1 {
            return Err(BandpassError::InvalidConfig {
                reason: format!("ddof must be 0 or 1, got {}", self.ddof),
            });
        }
        Ok(())
    }
}
