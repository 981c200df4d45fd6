//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use tcseed_bandpass::BandpassConfig;
use tcseed_io::{Compression, ReaderConfig, WriterConfig};
use tcseed_lanczos::{FilterWeights, cutoff_from_period, low_pass_weights};

use crate::config::*;

/// Output file format of the variance map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Netcdf,
    Parquet,
}

/// Which end of the time window a date string bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Parses an output format name.
pub fn parse_format(s: &str) -> Result<OutputFormat> {
    match s.to_lowercase().as_str() {
        "netcdf" | "nc" => Ok(OutputFormat::Netcdf),
        "parquet" => Ok(OutputFormat::Parquet),
        other => bail!("unknown output format: {other:?}"),
    }
}

/// Parses a time-window bound.
///
/// Accepts `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` or a bare date. A bare
/// date covers the whole day: midnight for a start bound, `23:59:59` for an
/// end bound.
pub fn parse_datetime(s: &str, bound: Bound) -> Result<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(t);
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date or datetime: {s:?}"))?;
    let time = match bound {
        Bound::Start => NaiveTime::MIN,
        Bound::End => NaiveTime::from_hms_opt(23, 59, 59).context("invalid end-of-day time")?,
    };
    Ok(date.and_time(time))
}

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
pub fn build_reader_config(io: &IoToml) -> Result<ReaderConfig> {
    let start = io
        .start
        .as_deref()
        .map(|s| parse_datetime(s, Bound::Start))
        .transpose()
        .context("invalid [io].start")?;
    let end = io
        .end
        .as_deref()
        .map(|s| parse_datetime(s, Bound::End))
        .transpose()
        .context("invalid [io].end")?;

    let cfg = ReaderConfig::default()
        .with_variable(&io.variable)
        .with_time_var(&io.time_var)
        .with_start(start)
        .with_end(end);
    cfg.validate()?;
    Ok(cfg)
}

/// Resampling cadence, or `None` when `resample_hours` is 0.
pub fn build_cadence(io: &IoToml) -> Option<TimeDelta> {
    (io.resample_hours > 0).then(|| TimeDelta::hours(i64::from(io.resample_hours)))
}

/// Builds a [`WriterConfig`] from the TOML I/O configuration.
pub fn build_writer_config(io: &IoToml) -> Result<WriterConfig> {
    let compression = parse_compression(&io.compression)?;
    let cfg = WriterConfig::default()
        .with_field_var(format!("{}_bandpass", io.variable))
        .with_compression(compression)
        .with_row_group_size(io.row_group_size);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`BandpassConfig`] from the TOML variance configuration.
pub fn build_bandpass_config(variance: &VarianceToml) -> Result<BandpassConfig> {
    let cfg = BandpassConfig::default()
        .with_ddof(variance.ddof)
        .with_parallel(variance.parallel);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds the `(high, low)` Lanczos weight pair from the TOML filter
/// configuration.
///
/// `high` uses the shorter cutoff period (higher cutoff frequency).
pub fn build_filter_weights(filter: &FilterToml) -> Result<(FilterWeights, FilterWeights)> {
    if filter.high_cutoff_period >= filter.low_cutoff_period {
        bail!(
            "high_cutoff_period ({}) must be shorter than low_cutoff_period ({})",
            filter.high_cutoff_period,
            filter.low_cutoff_period
        );
    }
    let high_cutoff =
        cutoff_from_period(filter.high_cutoff_period).context("invalid high_cutoff_period")?;
    let low_cutoff =
        cutoff_from_period(filter.low_cutoff_period).context("invalid low_cutoff_period")?;

    let high = low_pass_weights(filter.window, high_cutoff).context("high-cut weights")?;
    let low = low_pass_weights(filter.window, low_cutoff).context("low-cut weights")?;
    Ok((high, low))
}
