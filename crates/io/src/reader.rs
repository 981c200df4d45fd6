//! High-level NetCDF reader configuration and orchestration.

use std::path::Path;

use chrono::NaiveDateTime;
use tcseed_bandpass::TimeGrid;
use tracing::{debug, info};

use crate::error::IoError;
use crate::field::{GridMetadata, GriddedField};
use crate::netcdf_read;

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Configuration for reading a gridded field from a NetCDF file.
///
/// Use the builder methods (`with_*`) to customise variable names,
/// coordinate aliases and the time window. The [`Default`] implementation
/// supplies ERA5-style names for relative vorticity.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderConfig {
    /// NetCDF variable name of the field.
    variable: String,
    /// NetCDF variable name for the time axis.
    time_var: String,
    /// Aliases to try when looking up latitude coordinates.
    lat_aliases: Vec<String>,
    /// Aliases to try when looking up longitude coordinates.
    lon_aliases: Vec<String>,
    /// Inclusive lower bound of the time window.
    start: Option<NaiveDateTime>,
    /// Inclusive upper bound of the time window.
    end: Option<NaiveDateTime>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            variable: "vo".into(),
            time_var: "time".into(),
            lat_aliases: vec!["latitude".into(), "lat".into(), "y".into()],
            lon_aliases: vec!["longitude".into(), "lon".into(), "x".into()],
            start: None,
            end: None,
        }
    }
}

impl ReaderConfig {
    /// Set the field variable name.
    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        self.variable = name.into();
        self
    }

    /// Set the time variable name.
    pub fn with_time_var(mut self, name: impl Into<String>) -> Self {
        self.time_var = name.into();
        self
    }

    /// Replace the latitude aliases.
    pub fn with_lat_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lat_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the longitude aliases.
    pub fn with_lon_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lon_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Keep only time steps at or after `start`.
    pub fn with_start(mut self, start: Option<NaiveDateTime>) -> Self {
        self.start = start;
        self
    }

    /// Keep only time steps at or before `end`.
    pub fn with_end(mut self, end: Option<NaiveDateTime>) -> Self {
        self.end = end;
        self
    }

    /// Field variable name.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Time variable name.
    pub fn time_var(&self) -> &str {
        &self.time_var
    }

    /// Lower bound of the time window.
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.start
    }

    /// Upper bound of the time window.
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.end
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] listing every problem found: empty
    /// variable names, empty alias lists, or `start` after `end`.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut problems = Vec::new();
        if self.variable.is_empty() {
            problems.push("variable name must not be empty".to_string());
        }
        if self.time_var.is_empty() {
            problems.push("time variable name must not be empty".to_string());
        }
        if self.lat_aliases.is_empty() {
            problems.push("at least one latitude alias is required".to_string());
        }
        if self.lon_aliases.is_empty() {
            problems.push("at least one longitude alias is required".to_string());
        }
        if let (Some(start), Some(end)) = (self.start, self.end)
            && start > end
        {
            problems.push(format!("start {start} is after end {end}"));
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

    /// Index range of `times` inside the configured window.
    ///
    /// `times` must be sorted ascending.
    fn select(&self, times: &[NaiveDateTime]) -> std::ops::Range<usize> {
        let first = match self.start {
            Some(start) => times.partition_point(|t| *t < start),
            None => 0,
        };
        let last = match self.end {
            Some(end) => times.partition_point(|t| *t <= end),
            None => times.len(),
        };
        first..last.max(first)
    }
}

// ---------------------------------------------------------------------------
// read_netcdf
// ---------------------------------------------------------------------------

/// Read one gridded variable from a NetCDF file.
///
/// The variable must be laid out as `(time, lat, lon)`, or as
/// `(time, level, lat, lon)` with a single level. Packed values are unpacked
/// with `scale_factor`/`add_offset`, and `_FillValue`/`missing_value` entries
/// become `NaN`. Only the time steps inside the configured window are read
/// from disk.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist,
/// [`IoError::MissingVariable`] for absent variables,
/// [`IoError::InvalidTime`] for undecodable time axes,
/// [`IoError::EmptySelection`] when the window holds no time steps, and
/// [`IoError::DimensionMismatch`] when coordinates disagree with the data.
pub fn read_netcdf(path: &Path, config: &ReaderConfig) -> Result<GriddedField, IoError> {
    config.validate()?;

    let file = netcdf_read::open_file(path)?;

    // -- Coordinates --------------------------------------------------------

    let lat_alias_refs: Vec<&str> = config.lat_aliases.iter().map(String::as_str).collect();
    let lon_alias_refs: Vec<&str> = config.lon_aliases.iter().map(String::as_str).collect();

    let lats = netcdf_read::read_1d_f64(&file, &lat_alias_refs, path)?;
    let lons = netcdf_read::read_1d_f64(&file, &lon_alias_refs, path)?;

    // -- Time ---------------------------------------------------------------

    let offsets = netcdf_read::read_1d_f64(&file, &[&config.time_var], path)?;
    let (unit, base) = netcdf_read::read_time_units(&file, &config.time_var, path)?;
    let all_times = netcdf_read::offsets_to_datetimes(base, unit, &offsets)?;

    let range = config.select(&all_times);
    if range.is_empty() {
        return Err(IoError::EmptySelection {
            start: config.start.map_or_else(|| "-inf".into(), |t| t.to_string()),
            end: config.end.map_or_else(|| "+inf".into(), |t| t.to_string()),
        });
    }
    debug!(
        n_available = all_times.len(),
        first = range.start,
        last = range.end - 1,
        "time window selected"
    );
    let times = all_times[range.clone()].to_vec();

    // -- Field --------------------------------------------------------------

    let (data, shape) =
        netcdf_read::read_field_f64(&file, &config.variable, &config.time_var, range, path)?;
    let [nt, ny, nx] = shape;
    let grid = TimeGrid::from_shape_vec((nt, ny, nx), data).map_err(|e| IoError::Validation {
        count: 1,
        details: e.to_string(),
    })?;

    let field = GriddedField::new(
        config.variable.clone(),
        times,
        GridMetadata::new(lats, lons),
        grid,
    )?;

    info!(
        path = %path.display(),
        variable = %config.variable,
        n_times = nt,
        n_rows = ny,
        n_cols = nx,
        "field loaded"
    );

    Ok(field)
}
