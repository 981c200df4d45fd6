//! Low-level NetCDF extraction helpers.

use std::ops::Range;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use netcdf::AttributeValue;

use crate::error::IoError;

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Read a 1-D `f64` variable, trying each alias in order.
///
/// Returns the data from the first alias that matches. If none match,
/// returns [`IoError::MissingVariable`] with the first alias as the name.
pub(crate) fn read_1d_f64(
    file: &netcdf::File,
    aliases: &[&str],
    path: &Path,
) -> Result<Vec<f64>, IoError> {
    for &alias in aliases {
        if let Some(var) = file.variable(alias) {
            return Ok(var.get_values::<f64, _>(..)?);
        }
    }

    let name = aliases.first().copied().unwrap_or("unknown");
    Err(IoError::MissingVariable {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// Read a numeric attribute as `f64`, accepting any integer or float type.
fn attribute_f64(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Ushort(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Uint(v) => Some(f64::from(v)),
        AttributeValue::Schar(v) => Some(f64::from(v)),
        AttributeValue::Uchar(v) => Some(f64::from(v)),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|&x| f64::from(x)),
        AttributeValue::Shorts(v) => v.first().map(|&x| f64::from(x)),
        AttributeValue::Ints(v) => v.first().map(|&x| f64::from(x)),
        _ => None,
    }
}

/// CF packing and missing-value attributes of a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Packing {
    scale_factor: f64,
    add_offset: f64,
    fill_value: Option<f64>,
    missing_value: Option<f64>,
}

impl Default for Packing {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            add_offset: 0.0,
            fill_value: None,
            missing_value: None,
        }
    }
}

impl Packing {
    fn read(var: &netcdf::Variable<'_>) -> Self {
        Self {
            scale_factor: attribute_f64(var, "scale_factor").unwrap_or(1.0),
            add_offset: attribute_f64(var, "add_offset").unwrap_or(0.0),
            fill_value: attribute_f64(var, "_FillValue"),
            missing_value: attribute_f64(var, "missing_value"),
        }
    }

    /// Map raw stored values to physical values, turning fill and missing
    /// markers (compared before unpacking) into `NaN`.
    pub(crate) fn unpack(&self, raw: &mut [f64]) {
        for v in raw.iter_mut() {
            if self.fill_value == Some(*v) || self.missing_value == Some(*v) {
                *v = f64::NAN;
            } else {
                *v = *v * self.scale_factor + self.add_offset;
            }
        }
    }
}

/// Read the time steps `times` of a `(time, lat, lon)` variable.
///
/// A 4-D `(time, level, lat, lon)` variable is accepted when the level axis
/// has length 1. Values are unpacked and fill values become `NaN`. Returns
/// the flat data together with `[nt, ny, nx]`.
pub(crate) fn read_field_f64(
    file: &netcdf::File,
    var_name: &str,
    time_var: &str,
    times: Range<usize>,
    path: &Path,
) -> Result<(Vec<f64>, [usize; 3]), IoError> {
    let var = file
        .variable(var_name)
        .ok_or_else(|| IoError::MissingVariable {
            name: var_name.to_string(),
            path: path.to_path_buf(),
        })?;

    let dims = var.dimensions();
    let first = dims.first().map(|d| d.name());
    if first.as_deref() != Some(time_var) {
        return Err(IoError::Validation {
            count: 1,
            details: format!(
                "first dimension of '{var_name}' must be '{time_var}', got {:?}",
                first.unwrap_or_default()
            ),
        });
    }

    let nt = times.end - times.start;
    let (mut data, ny, nx) = match dims.len() {
        3 => {
            let (ny, nx) = (dims[1].len(), dims[2].len());
            (var.get_values::<f64, _>((times, .., ..))?, ny, nx)
        }
        4 if dims[1].len() == 1 => {
            let (ny, nx) = (dims[2].len(), dims[3].len());
            (var.get_values::<f64, _>((times, 0..1, .., ..))?, ny, nx)
        }
        n => {
            return Err(IoError::DimensionMismatch {
                name: format!("{var_name} dimensions"),
                expected: 3,
                got: n,
            });
        }
    };

    Packing::read(&var).unpack(&mut data);
    Ok((data, [nt, ny, nx]))
}

/// Unit of a CF time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "seconds" | "second" | "secs" | "sec" | "s" => Some(Self::Seconds),
            "minutes" | "minute" | "mins" | "min" => Some(Self::Minutes),
            "hours" | "hour" | "hrs" | "hr" | "h" => Some(Self::Hours),
            "days" | "day" | "d" => Some(Self::Days),
            _ => None,
        }
    }

    fn millis(self) -> f64 {
        match self {
            Self::Seconds => 1_000.0,
            Self::Minutes => 60_000.0,
            Self::Hours => 3_600_000.0,
            Self::Days => 86_400_000.0,
        }
    }
}

/// Parse a reference timestamp such as `1900-01-01 00:00:00.0`,
/// `2000-01-01T06:00:00` or `2000-01-01`.
fn parse_reference(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    let s = s.trim().trim_end_matches('Z');
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Parse CF units like `"hours since 1900-01-01 00:00:00.0"`.
pub(crate) fn parse_time_units(units: &str) -> Result<(TimeUnit, NaiveDateTime), IoError> {
    let (unit, reference) = units
        .split_once(" since ")
        .ok_or_else(|| IoError::InvalidTime {
            reason: format!("unexpected time units format: '{units}'"),
        })?;

    let unit = TimeUnit::parse(unit.trim()).ok_or_else(|| IoError::InvalidTime {
        reason: format!("unknown time unit '{}'", unit.trim()),
    })?;
    let base = parse_reference(reference).ok_or_else(|| IoError::InvalidTime {
        reason: format!("failed to parse reference time '{}'", reference.trim()),
    })?;
    Ok((unit, base))
}

/// Read the `units` and optional `calendar` attributes of the time variable.
///
/// Only Gregorian-compatible calendars are accepted.
pub(crate) fn read_time_units(
    file: &netcdf::File,
    time_var: &str,
    path: &Path,
) -> Result<(TimeUnit, NaiveDateTime), IoError> {
    let var = file
        .variable(time_var)
        .ok_or_else(|| IoError::MissingVariable {
            name: time_var.to_string(),
            path: path.to_path_buf(),
        })?;

    let units_str: String = var
        .attribute_value("units")
        .ok_or_else(|| IoError::InvalidTime {
            reason: format!("time variable '{time_var}' has no 'units' attribute"),
        })?
        .map_err(|e| IoError::InvalidTime {
            reason: format!("failed to read 'units' attribute: {e}"),
        })?
        .try_into()
        .map_err(|e: netcdf::Error| IoError::InvalidTime {
            reason: format!("'units' attribute is not a string: {e}"),
        })?;

    let calendar = var
        .attribute_value("calendar")
        .and_then(|res| res.ok())
        .and_then(|av| match av {
            AttributeValue::Str(s) => Some(s.to_lowercase()),
            _ => None,
        })
        .unwrap_or_else(|| "standard".to_string());
    if !matches!(
        calendar.as_str(),
        "standard" | "gregorian" | "proleptic_gregorian"
    ) {
        return Err(IoError::InvalidTime {
            reason: format!("unsupported calendar '{calendar}'"),
        });
    }

    parse_time_units(&units_str)
}

/// Convert numeric offsets from `base` into timestamps, rounded to the
/// nearest millisecond.
pub(crate) fn offsets_to_datetimes(
    base: NaiveDateTime,
    unit: TimeUnit,
    offsets: &[f64],
) -> Result<Vec<NaiveDateTime>, IoError> {
    offsets
        .iter()
        .map(|&offset| {
            if !offset.is_finite() {
                return Err(IoError::InvalidTime {
                    reason: format!("non-finite time offset {offset}"),
                });
            }
            let millis = (offset * unit.millis()).round();
            // `as i64` saturates, so out-of-range values must be caught first.
            (millis.abs() < i64::MAX as f64)
                .then(|| TimeDelta::try_milliseconds(millis as i64))
                .flatten()
                .and_then(|delta| base.checked_add_signed(delta))
                .ok_or_else(|| IoError::InvalidTime {
                    reason: format!("date overflow adding {offset} to {base}"),
                })
        })
        .collect()
}
