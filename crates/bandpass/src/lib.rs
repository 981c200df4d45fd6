//! # tcseed-bandpass
//!
//! Band-pass filtering of gridded time series as the difference of two
//! Lanczos low-pass filters, reduced to a per-cell temporal variance (the
//! "TC seed index" when the field is 850 hPa relative vorticity).
//!
//! ## Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["TimeGrid (t, i, j)"] -->|"apply_filter(high)"| B["FilteredGrid"]
//!     A -->|"apply_filter(low)"| C["FilteredGrid"]
//!     B -->|"bandpass(high, &low)?"| D["FilteredGrid"]
//!     C --> D
//!     D -->|"temporal_variance()"| E["VarianceMap (i, j)"]
//! ```
//!
//! Missing values are `NaN` at every stage. Time steps without a full filter
//! window are missing, and a variance needs at least two samples.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tcseed_bandpass::{BandpassConfig, TimeGrid, compute_variance};
//! use tcseed_lanczos::low_pass_weights;
//!
//! let grid = TimeGrid::from_shape_vec((nt, ny, nx), data)?;
//! let high = low_pass_weights(50, 1.0 / 3.0)?;
//! let low = low_pass_weights(50, 1.0 / 10.0)?;
//! let map = compute_variance(&grid, &high, &low, &BandpassConfig::default())?;
//! ```

mod config;
mod engine;
mod error;
mod filter;
mod grid;
mod variance;

pub use config::BandpassConfig;
pub use engine::{compute_bandpass, compute_variance};
pub use error::BandpassError;
pub use filter::{FilteredGrid, apply_filter, apply_filter_with, bandpass};
pub use grid::TimeGrid;
pub use variance::{VarianceMap, VarianceSummary, temporal_variance};
