//! # tcseed-lanczos
//!
//! Lanczos-windowed low-pass filter weights (Duchon, 1979) for smoothing
//! uniformly sampled series in time.
//!
//! ## Weight Construction
//!
//! ```mermaid
//! graph LR
//!     A["window, cutoff"] -->|"low_pass_weights()"| B["FilterWeights"]
//!     C["cutoff period"] -->|"cutoff_from_period()"| A
//!     B --> D[".as_slice()"]
//!     B --> E[".len() (effective window)"]
//!     B --> F[".sum() (raw gain)"]
//! ```
//!
//! The weights are **not** normalized: the center weight is exactly
//! `2 * cutoff` and the total gain is whatever the windowed sinc yields.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tcseed_lanczos::{cutoff_from_period, low_pass_weights};
//!
//! let high = low_pass_weights(50, cutoff_from_period(3.0)?)?;
//! let low = low_pass_weights(50, cutoff_from_period(10.0)?)?;
//! assert_eq!(high.len(), 49);
//! ```

mod error;
mod weights;

pub use error::LanczosError;
pub use weights::{FilterWeights, cutoff_from_period, low_pass_weights};
