//! Integration test: NetCDF reader config and file-not-found handling.

use std::path::Path;

use chrono::NaiveDate;
use tcseed_io::{IoError, ReaderConfig, read_netcdf};

#[test]
fn read_netcdf_file_not_found() {
    let path = Path::new("/tmp/tcseed_test_nonexistent_file.nc");
    let config = ReaderConfig::default();

    let result = read_netcdf(path, &config);
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(
        matches!(err, IoError::FileNotFound { .. }),
        "expected FileNotFound, got {err:?}",
    );
}

#[test]
fn read_netcdf_invalid_config_rejects_early() {
    let path = Path::new("/tmp/tcseed_test_nonexistent_file.nc");
    let day = |d| {
        NaiveDate::from_ymd_opt(2016, 6, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    };
    let config = ReaderConfig::default()
        .with_start(day(10))
        .with_end(day(1));

    let result = read_netcdf(path, &config);
    assert!(result.is_err());

    // Should fail on config validation before even trying to open the file.
    let err = result.unwrap_err();
    assert!(
        matches!(err, IoError::Validation { .. }),
        "expected Validation error, got {err:?}",
    );
}
