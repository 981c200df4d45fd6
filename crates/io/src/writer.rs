//! High-level writer configuration and orchestration.

use std::path::Path;

use chrono::NaiveDateTime;
use parquet::file::properties::WriterProperties;
use tcseed_bandpass::{FilteredGrid, VarianceMap};
use tracing::info;

use crate::error::IoError;
use crate::field::GridMetadata;
use crate::{netcdf_write, parquet_write};

/// Compression algorithm for Parquet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    /// Converts to the corresponding `parquet::basic::Compression` variant.
    fn to_parquet(self) -> Result<parquet::basic::Compression, IoError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => {
                let level =
                    parquet::basic::ZstdLevel::try_new(3).map_err(|e| IoError::Parquet {
                        reason: e.to_string(),
                    })?;
                parquet::basic::Compression::ZSTD(level)
            }
        })
    }
}

/// Configuration for exporting variance maps and band-passed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct WriterConfig {
    /// Name of the variance variable or column.
    variance_var: String,
    /// Name of the band-passed field variable.
    field_var: String,
    /// Value written in place of missing cells in NetCDF output.
    fill_value: f64,
    /// Parquet compression algorithm.
    compression: Compression,
    /// Maximum number of rows per Parquet row group.
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            variance_var: "tc_seed_index".into(),
            field_var: "vo_bandpass".into(),
            fill_value: 1.0e20,
            compression: Compression::default(),
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Sets the variance variable name.
    pub fn with_variance_var(mut self, name: impl Into<String>) -> Self {
        self.variance_var = name.into();
        self
    }

    /// Sets the band-passed field variable name.
    pub fn with_field_var(mut self, name: impl Into<String>) -> Self {
        self.field_var = name.into();
        self
    }

    /// Sets the NetCDF fill value.
    pub fn with_fill_value(mut self, fill: f64) -> Self {
        self.fill_value = fill;
        self
    }

    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Variance variable name.
    pub fn variance_var(&self) -> &str {
        &self.variance_var
    }

    /// Band-passed field variable name.
    pub fn field_var(&self) -> &str {
        &self.field_var
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if a variable name is empty, the fill
    /// value is not finite, or `row_group_size` is zero.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut problems = Vec::new();
        if self.variance_var.is_empty() || self.field_var.is_empty() {
            problems.push("output variable names must not be empty".to_string());
        }
        if !self.fill_value.is_finite() {
            problems.push(format!("fill_value must be finite, got {}", self.fill_value));
        }
        if self.row_group_size == 0 {
            problems.push("row_group_size must be greater than 0".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            })
        }
    }
}

/// Write a variance map to NetCDF as a `(latitude, longitude)` variable.
///
/// Missing cells are stored as the configured fill value, declared through
/// `_FillValue`, so CF readers see them as missing.
///
/// # Errors
///
/// Returns [`IoError::Validation`] for an invalid configuration,
/// [`IoError::DimensionMismatch`] if `map` does not fit `grid`, and
/// [`IoError::Netcdf`] on write failures.
pub fn write_variance_netcdf(
    path: &Path,
    map: &VarianceMap,
    grid: &GridMetadata,
    config: &WriterConfig,
) -> Result<(), IoError> {
    config.validate()?;
    let (ny, nx) = map.shape();
    grid.check_shape(ny, nx)?;

    let mut file = netcdf_write::create_with_grid(path, grid)?;
    netcdf_write::add_data_variable(
        &mut file,
        &config.variance_var,
        &["latitude", "longitude"],
        map.view().iter().copied(),
        config.fill_value,
        &[
            (
                "long_name",
                "temporal variance of band-pass filtered field".to_string(),
            ),
            ("ddof", map.ddof().to_string()),
        ],
    )?;

    info!(
        path = %path.display(),
        variable = %config.variance_var,
        n_valid = map.n_valid(),
        "variance map written"
    );
    Ok(())
}

/// Write a band-passed field to NetCDF as a `(time, latitude, longitude)`
/// variable.
///
/// Time is encoded as hours since `times[0]`. Time steps outside the valid
/// filter range are written as fill values.
///
/// # Errors
///
/// Returns [`IoError::DimensionMismatch`] if `times` or `grid` disagree with
/// the field shape, plus the errors of [`write_variance_netcdf`].
pub fn write_field_netcdf(
    path: &Path,
    field: &FilteredGrid,
    grid: &GridMetadata,
    times: &[NaiveDateTime],
    config: &WriterConfig,
) -> Result<(), IoError> {
    config.validate()?;
    let (nt, ny, nx) = field.shape();
    if times.len() != nt {
        return Err(IoError::DimensionMismatch {
            name: "time".into(),
            expected: nt,
            got: times.len(),
        });
    }
    grid.check_shape(ny, nx)?;

    let mut file = netcdf_write::create_with_grid(path, grid)?;
    netcdf_write::add_time_axis(&mut file, times)?;
    let valid = field.valid_range();
    netcdf_write::add_data_variable(
        &mut file,
        &config.field_var,
        &["time", "latitude", "longitude"],
        field.view().iter().copied(),
        config.fill_value,
        &[
            ("long_name", "band-pass filtered field".to_string()),
            ("valid_time_start", valid.start.to_string()),
            ("valid_time_end", valid.end.to_string()),
        ],
    )?;

    info!(
        path = %path.display(),
        variable = %config.field_var,
        n_times = nt,
        n_valid_times = field.n_valid_times(),
        "band-passed field written"
    );
    Ok(())
}

/// Write a variance map to Parquet as a long table with one row per cell.
///
/// Columns are `row`, `col`, `lat`, `lon` and the variance column, which is
/// null for missing cells.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the configuration is invalid,
/// [`IoError::DimensionMismatch`] if `map` does not fit `grid`, or
/// [`IoError::Parquet`] if schema construction, batch conversion, or file
/// I/O fails.
pub fn write_variance_parquet(
    path: &Path,
    map: &VarianceMap,
    grid: &GridMetadata,
    config: &WriterConfig,
) -> Result<(), IoError> {
    config.validate()?;
    let (ny, nx) = map.shape();
    grid.check_shape(ny, nx)?;

    let schema = parquet_write::build_schema(&config.variance_var);

    let compression = config.compression.to_parquet()?;
    let props = WriterProperties::builder()
        .set_compression(compression)
        .set_max_row_group_size(config.row_group_size)
        .build();

    let batch = parquet_write::variance_to_record_batch(map, grid, &schema)?;
    parquet_write::write_batches(path, &[batch], &schema, props)?;

    info!(
        path = %path.display(),
        rows = ny * nx,
        "variance table written"
    );
    Ok(())
}
