//! Error types for the tcseed-lanczos crate.

/// Error type for all fallible operations in the tcseed-lanczos crate.
///
/// Every variant is a parameter error raised before any weight is computed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LanczosError {
    /// Returned when the window length is zero.
    #[error("window must be at least 1, got {0}")]
    InvalidWindow(usize),

    /// Returned when the cutoff frequency is not strictly inside (0, 0.5).
    #[error("cutoff must be finite and in (0, 0.5), got {0}")]
    InvalidCutoff(f64),

    /// Returned when a cutoff period cannot be converted to a valid cutoff.
    #[error("cutoff period must be finite and greater than 2 time steps, got {0}")]
    InvalidPeriod(f64),

    /// Returned when raw weights are empty or contain non-finite values.
    #[error("invalid weights: {reason}")]
    InvalidWeights {
        /// Description of the problem.
        reason: String,
    },
}
