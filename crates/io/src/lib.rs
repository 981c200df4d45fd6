//! # tcseed-io
//!
//! Read gridded fields from NetCDF files and export band-pass results to
//! NetCDF or Parquet. Bridges external file formats into the
//! [`tcseed_bandpass::TimeGrid`] / [`tcseed_bandpass::VarianceMap`] data
//! model.
//!
//! ```text
//! NetCDF ──read_netcdf──▶ GriddedField ──resample_mean──▶ GriddedField
//!                                                             │ TimeGrid
//!                                                             ▼
//!                                       tcseed-bandpass engine
//!                                                             │
//!        write_variance_netcdf / write_variance_parquet ◀─────┘
//! ```

mod error;
mod field;
mod netcdf_read;
mod netcdf_write;
mod parquet_write;
mod reader;
mod resample;
mod writer;

pub use error::IoError;
pub use field::{GridMetadata, GriddedField};
pub use reader::{ReaderConfig, read_netcdf};
pub use resample::resample_mean;
pub use writer::{
    Compression, WriterConfig, write_field_netcdf, write_variance_netcdf, write_variance_parquet,
};
