//! Low-level NetCDF output helpers.

use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::IoError;
use crate::field::GridMetadata;

/// Create a NetCDF file holding the `latitude` and `longitude` coordinate
/// variables of `grid`.
pub(crate) fn create_with_grid(path: &Path, grid: &GridMetadata) -> Result<netcdf::FileMut, IoError> {
    let mut file = netcdf::create(path)?;

    file.add_dimension("latitude", grid.n_rows())?;
    file.add_dimension("longitude", grid.n_cols())?;

    {
        let mut var = file.add_variable::<f64>("latitude", &["latitude"])?;
        var.put_attribute("units", "degrees_north")?;
        var.put_attribute("standard_name", "latitude")?;
        var.put_values(grid.lats(), ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("longitude", &["longitude"])?;
        var.put_attribute("units", "degrees_east")?;
        var.put_attribute("standard_name", "longitude")?;
        var.put_values(grid.lons(), ..)?;
    }

    Ok(file)
}

/// Add a `time` axis encoded as hours since the first timestamp.
pub(crate) fn add_time_axis(
    file: &mut netcdf::FileMut,
    times: &[NaiveDateTime],
) -> Result<(), IoError> {
    file.add_dimension("time", times.len())?;

    let origin = times.first().copied().unwrap_or_default();
    let offsets: Vec<f64> = times
        .iter()
        .map(|t| (*t - origin).num_milliseconds() as f64 / 3_600_000.0)
        .collect();

    let mut var = file.add_variable::<f64>("time", &["time"])?;
    var.put_attribute(
        "units",
        format!("hours since {}", origin.format("%Y-%m-%d %H:%M:%S")),
    )?;
    var.put_attribute("calendar", "standard")?;
    var.put_attribute("standard_name", "time")?;
    var.put_values(&offsets, ..)?;
    Ok(())
}

/// Add a data variable, replacing `NaN` with `fill_value` and declaring it
/// as `_FillValue`.
pub(crate) fn add_data_variable(
    file: &mut netcdf::FileMut,
    name: &str,
    dims: &[&str],
    values: impl Iterator<Item = f64>,
    fill_value: f64,
    attributes: &[(&str, String)],
) -> Result<(), IoError> {
    let data: Vec<f64> = values
        .map(|v| if v.is_nan() { fill_value } else { v })
        .collect();

    let mut var = file.add_variable::<f64>(name, dims)?;
    var.put_attribute("_FillValue", fill_value)?;
    for (key, value) in attributes {
        var.put_attribute(key, value.as_str())?;
    }
    var.put_values(&data, ..)?;
    Ok(())
}
