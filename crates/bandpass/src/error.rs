//! Error types for the tcseed-bandpass crate.

/// Error type for all fallible operations in the tcseed-bandpass crate.
///
/// Too little data is never an error here: it shows up as `NaN` cells in the
/// output instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BandpassError {
    /// Returned when two grids that must share a shape do not.
    ///
    /// Both filters run over the same source grid, so this indicates a
    /// defect in the caller rather than bad input data.
    #[error("shape mismatch in {context}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Operation that detected the mismatch.
        context: String,
        /// Shape of the reference grid as `(t, i, j)`.
        expected: (usize, usize, usize),
        /// Shape of the offending grid as `(t, i, j)`.
        got: (usize, usize, usize),
    },

    /// Returned when a grid's flat data does not match its declared shape.
    #[error("grid data has {len} values, shape {shape:?} needs {expected}")]
    InvalidShape {
        /// Declared `(t, i, j)` shape.
        shape: (usize, usize, usize),
        /// Number of values the shape requires.
        expected: usize,
        /// Number of values supplied.
        len: usize,
    },

    /// Returned when a [`BandpassConfig`](crate::BandpassConfig) is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}
