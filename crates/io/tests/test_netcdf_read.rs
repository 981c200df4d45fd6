//! Integration tests for reading gridded fields from NetCDF.
//!
//! Fixtures are written programmatically so each test controls packing,
//! fill values, layout and the time axis.

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::tempdir;
use tcseed_io::{IoError, ReaderConfig, read_netcdf, resample_mean};

// ---------------------------------------------------------------------------
// Helper: programmatic NetCDF fixture builder
// ---------------------------------------------------------------------------

/// Configuration for building a minimal NetCDF test fixture.
struct FixtureBuilder {
    nt: usize,
    ny: usize,
    nx: usize,
    /// Flat field data in `[t, lat, lon]` order.
    values: Vec<f64>,
    time_units: String,
    /// Step between consecutive time values, in `time_units`.
    time_step: f64,
    calendar: Option<String>,
    fill_value: Option<f64>,
    missing_value: Option<f64>,
    scale_offset: Option<(f64, f64)>,
    /// Write the field as `(time, level, lat, lon)` with one level.
    with_level: bool,
    lat_name: &'static str,
}

impl FixtureBuilder {
    /// Six-hourly data with `value = t * 100 + i * 10 + j`.
    fn new(nt: usize, ny: usize, nx: usize) -> Self {
        let values = (0..nt)
            .flat_map(|t| {
                (0..ny).flat_map(move |i| (0..nx).map(move |j| (t * 100 + i * 10 + j) as f64))
            })
            .collect();
        Self {
            nt,
            ny,
            nx,
            values,
            time_units: "hours since 2016-06-01 00:00:00.0".into(),
            time_step: 6.0,
            calendar: Some("gregorian".into()),
            fill_value: None,
            missing_value: None,
            scale_offset: None,
            with_level: false,
            lat_name: "latitude",
        }
    }

    fn with_value(mut self, t: usize, i: usize, j: usize, v: f64) -> Self {
        self.values[(t * self.ny + i) * self.nx + j] = v;
        self
    }

    fn with_fill_value(mut self, fv: f64) -> Self {
        self.fill_value = Some(fv);
        self
    }

    fn with_missing_value(mut self, mv: f64) -> Self {
        self.missing_value = Some(mv);
        self
    }

    fn with_scale_offset(mut self, scale: f64, offset: f64) -> Self {
        self.scale_offset = Some((scale, offset));
        self
    }

    fn with_calendar(mut self, calendar: &str) -> Self {
        self.calendar = Some(calendar.into());
        self
    }

    fn with_level(mut self) -> Self {
        self.with_level = true;
        self
    }

    fn with_lat_name(mut self, name: &'static str) -> Self {
        self.lat_name = name;
        self
    }

    /// Write the fixture to a NetCDF file and return the path.
    fn write(&self, dir: &Path) -> PathBuf {
        let path = dir.join("fixture.nc");
        let mut file = netcdf::create(&path).expect("failed to create NetCDF file");

        file.add_dimension("time", self.nt).expect("add dim time");
        file.add_dimension(self.lat_name, self.ny).expect("add dim lat");
        file.add_dimension("longitude", self.nx).expect("add dim lon");
        if self.with_level {
            file.add_dimension("level", 1).expect("add dim level");
        }

        {
            let lats: Vec<f64> = (0..self.ny).map(|i| 20.0 - 2.5 * i as f64).collect();
            let mut var = file
                .add_variable::<f64>(self.lat_name, &[self.lat_name])
                .expect("add var lat");
            var.put_values(&lats, ..).expect("put lat values");
        }
        {
            let lons: Vec<f64> = (0..self.nx).map(|j| 120.0 + 2.5 * j as f64).collect();
            let mut var = file
                .add_variable::<f64>("longitude", &["longitude"])
                .expect("add var lon");
            var.put_values(&lons, ..).expect("put lon values");
        }
        {
            let times: Vec<f64> = (0..self.nt).map(|t| t as f64 * self.time_step).collect();
            let mut var = file
                .add_variable::<f64>("time", &["time"])
                .expect("add var time");
            var.put_values(&times, ..).expect("put time values");
            var.put_attribute("units", self.time_units.as_str())
                .expect("add time units");
            if let Some(calendar) = &self.calendar {
                var.put_attribute("calendar", calendar.as_str())
                    .expect("add time calendar");
            }
        }
        {
            let dims: Vec<&str> = if self.with_level {
                vec!["time", "level", self.lat_name, "longitude"]
            } else {
                vec!["time", self.lat_name, "longitude"]
            };
            let mut var = file.add_variable::<f64>("vo", &dims).expect("add var vo");
            if let Some(fv) = self.fill_value {
                var.put_attribute("_FillValue", fv).expect("add _FillValue");
            }
            if let Some(mv) = self.missing_value {
                var.put_attribute("missing_value", mv)
                    .expect("add missing_value");
            }
            if let Some((scale, offset)) = self.scale_offset {
                var.put_attribute("scale_factor", scale)
                    .expect("add scale_factor");
                var.put_attribute("add_offset", offset)
                    .expect("add add_offset");
            }
            var.put_values(&self.values, ..).expect("put vo values");
        }

        path
    }
}

fn at(d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2016, 6, d)
        .and_then(|date| date.and_hms_opt(h, 0, 0))
        .expect("valid date")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn reads_full_field() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(8, 2, 3).write(dir.path());

    let field = read_netcdf(&path, &ReaderConfig::default()).unwrap();
    assert_eq!(field.name(), "vo");
    assert_eq!(field.data().shape(), (8, 2, 3));
    assert_eq!(field.grid().lats(), &[20.0, 17.5]);
    assert_eq!(field.grid().lons(), &[120.0, 122.5, 125.0]);
    assert_eq!(field.times()[0], at(1, 0));
    assert_eq!(field.times()[5], at(2, 6));
    assert_eq!(field.data().view()[[3, 1, 2]], 312.0);
}

#[test]
fn time_window_is_inclusive() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(12, 1, 1).write(dir.path());

    let config = ReaderConfig::default()
        .with_start(Some(at(1, 12)))
        .with_end(Some(at(2, 12)));
    let field = read_netcdf(&path, &config).unwrap();

    assert_eq!(field.n_times(), 5);
    assert_eq!(field.times().first(), Some(&at(1, 12)));
    assert_eq!(field.times().last(), Some(&at(2, 12)));
    assert_eq!(field.data().view()[[0, 0, 0]], 200.0);
}

#[test]
fn window_without_data_is_empty_selection() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(4, 1, 1).write(dir.path());

    let config = ReaderConfig::default().with_start(Some(at(20, 0)));
    let err = read_netcdf(&path, &config).unwrap_err();
    assert!(
        matches!(err, IoError::EmptySelection { .. }),
        "expected EmptySelection, got {err:?}"
    );
}

#[test]
fn fill_values_become_nan() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(4, 2, 2)
        .with_fill_value(-9999.0)
        .with_value(1, 0, 1, -9999.0)
        .write(dir.path());

    let field = read_netcdf(&path, &ReaderConfig::default()).unwrap();
    assert!(field.data().view()[[1, 0, 1]].is_nan());
    assert_eq!(field.data().view()[[1, 0, 0]], 100.0);
}

#[test]
fn missing_values_become_nan() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(4, 2, 2)
        .with_missing_value(-32767.0)
        .with_value(2, 1, 0, -32767.0)
        .write(dir.path());

    let field = read_netcdf(&path, &ReaderConfig::default()).unwrap();
    assert!(field.data().view()[[2, 1, 0]].is_nan());
    assert_eq!(field.data().view()[[2, 1, 1]], 211.0);
    assert_eq!(field.data().view().iter().filter(|v| v.is_nan()).count(), 1);
}

#[test]
fn packed_values_are_unpacked() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(2, 1, 2)
        .with_scale_offset(1.0e-6, 5.0e-5)
        .write(dir.path());

    let field = read_netcdf(&path, &ReaderConfig::default()).unwrap();
    // raw value at (1, 0, 1) is 101
    assert_relative_eq!(
        field.data().view()[[1, 0, 1]],
        101.0e-6 + 5.0e-5,
        max_relative = 1e-12
    );
}

#[test]
fn single_level_axis_is_squeezed() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(3, 2, 2).with_level().write(dir.path());

    let field = read_netcdf(&path, &ReaderConfig::default()).unwrap();
    assert_eq!(field.data().shape(), (3, 2, 2));
    assert_eq!(field.data().view()[[2, 1, 0]], 210.0);
}

#[test]
fn latitude_alias_is_resolved() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(2, 2, 1).with_lat_name("lat").write(dir.path());

    let field = read_netcdf(&path, &ReaderConfig::default()).unwrap();
    assert_eq!(field.grid().n_rows(), 2);
}

#[test]
fn missing_variable_reported() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(2, 1, 1).write(dir.path());

    let config = ReaderConfig::default().with_variable("u");
    let err = read_netcdf(&path, &config).unwrap_err();
    match err {
        IoError::MissingVariable { name, .. } => assert_eq!(name, "u"),
        other => panic!("expected MissingVariable, got {other:?}"),
    }
}

#[test]
fn non_gregorian_calendar_rejected() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(2, 1, 1)
        .with_calendar("noleap")
        .write(dir.path());

    let err = read_netcdf(&path, &ReaderConfig::default()).unwrap_err();
    assert!(matches!(err, IoError::InvalidTime { .. }), "got {err:?}");
}

#[test]
fn read_then_daily_mean() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(8, 1, 1).write(dir.path());

    let field = read_netcdf(&path, &ReaderConfig::default()).unwrap();
    let daily = resample_mean(&field, chrono::TimeDelta::days(1)).unwrap();

    assert_eq!(daily.times(), &[at(1, 0), at(2, 0)]);
    assert_relative_eq!(daily.data().view()[[0, 0, 0]], 150.0, epsilon = 1e-9);
    assert_relative_eq!(daily.data().view()[[1, 0, 0]], 550.0, epsilon = 1e-9);
}
