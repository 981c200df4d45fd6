//! Compute command: read, filter, reduce and export the TC seed index.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use tcseed_bandpass::{VarianceMap, compute_bandpass, compute_variance, temporal_variance};
use tcseed_io::{
    GriddedField, read_netcdf, resample_mean, write_field_netcdf, write_variance_netcdf,
    write_variance_parquet,
};
use tcseed_lanczos::FilterWeights;

use crate::cli::ComputeArgs;
use crate::config::TcseedConfig;
use crate::convert::{self, OutputFormat};

/// Run summary written next to the output as `<output>.summary.json`.
#[derive(Debug, Serialize)]
struct RunSummary {
    input: PathBuf,
    output: PathBuf,
    variable: String,
    first_time: Option<String>,
    last_time: Option<String>,
    n_times: usize,
    n_rows: usize,
    n_cols: usize,
    window: usize,
    high_cutoff: f64,
    low_cutoff: f64,
    high_weights: usize,
    low_weights: usize,
    ddof: usize,
    n_valid: usize,
    n_missing: usize,
    min: Option<f64>,
    max: Option<f64>,
    mean: Option<f64>,
}

/// Run the band-pass variance pipeline.
pub fn run(args: ComputeArgs) -> Result<()> {
    let _cmd = info_span!("compute").entered();

    // 1. Load project TOML and apply CLI overrides
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let mut config: TcseedConfig =
        toml::from_str(&toml_str).context("failed to parse TOML config")?;
    apply_overrides(&mut config, &args);

    let input =
        config.io.input.clone().ok_or_else(|| {
            anyhow::anyhow!("no input path: set [io].input in config or use --input")
        })?;
    let output = config.io.output.clone().ok_or_else(|| {
        anyhow::anyhow!("no output path: set [io].output in config or use --output")
    })?;

    // 2. Build configs from TOML
    let reader_cfg = convert::build_reader_config(&config.io)?;
    let writer_cfg = convert::build_writer_config(&config.io)?;
    let bandpass_cfg = convert::build_bandpass_config(&config.variance)?;
    let format = convert::parse_format(&config.io.format)?;
    let (high, low) = convert::build_filter_weights(&config.filter)?;

    // 3. Read and resample the source field
    info!(path = %input.display(), "reading source field");
    let field = read_netcdf(&input, &reader_cfg)
        .with_context(|| format!("failed to read NetCDF: {}", input.display()))?;
    let field = match convert::build_cadence(&config.io) {
        Some(cadence) => resample_mean(&field, cadence)
            .with_context(|| format!("failed to resample to {cadence}"))?,
        None => field,
    };

    // 4. Band-pass filter and temporal variance
    let map = match &config.io.bandpass_output {
        Some(band_path) => {
            let band = compute_bandpass(field.data(), &high, &low, &bandpass_cfg)
                .context("band-pass filtering failed")?;
            write_field_netcdf(band_path, &band, field.grid(), field.times(), &writer_cfg)
                .with_context(|| {
                    format!("failed to write band-passed field: {}", band_path.display())
                })?;
            temporal_variance(&band, bandpass_cfg.ddof(), bandpass_cfg.parallel())
        }
        None => compute_variance(field.data(), &high, &low, &bandpass_cfg)
            .context("variance computation failed")?,
    };

    // 5. Export
    let written = match format {
        OutputFormat::Netcdf => write_variance_netcdf(&output, &map, field.grid(), &writer_cfg),
        OutputFormat::Parquet => write_variance_parquet(&output, &map, field.grid(), &writer_cfg),
    };
    written.with_context(|| format!("failed to write variance map: {}", output.display()))?;

    // 6. Summary JSON
    let summary = summarize(&input, &output, &field, &map, (&high, &low), config.filter.window);
    let summary_path = summary_path(&output);
    let json = serde_json::to_string_pretty(&summary).context("failed to serialize summary")?;
    std::fs::write(&summary_path, json)
        .with_context(|| format!("failed to write summary: {}", summary_path.display()))?;
    info!(path = %summary_path.display(), n_valid = summary.n_valid, "summary written");

    Ok(())
}

/// Apply CLI overrides on top of the TOML configuration.
fn apply_overrides(config: &mut TcseedConfig, args: &ComputeArgs) {
    if let Some(input) = &args.input {
        config.io.input = Some(input.clone());
    }
    if let Some(output) = &args.output {
        config.io.output = Some(output.clone());
    }
    if let Some(start) = &args.start {
        config.io.start = Some(start.clone());
    }
    if let Some(end) = &args.end {
        config.io.end = Some(end.clone());
    }
}

/// `foo.nc` -> `foo.summary.json`.
fn summary_path(output: &Path) -> PathBuf {
    output.with_extension("summary.json")
}

fn summarize(
    input: &Path,
    output: &Path,
    field: &GriddedField,
    map: &VarianceMap,
    (high, low): (&FilterWeights, &FilterWeights),
    window: usize,
) -> RunSummary {
    let (n_rows, n_cols) = map.shape();
    let stats = map.summary();
    RunSummary {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        variable: field.name().to_string(),
        first_time: field.times().first().map(ToString::to_string),
        last_time: field.times().last().map(ToString::to_string),
        n_times: field.n_times(),
        n_rows,
        n_cols,
        window,
        high_cutoff: high.cutoff().unwrap_or(f64::NAN),
        low_cutoff: low.cutoff().unwrap_or(f64::NAN),
        high_weights: high.len(),
        low_weights: low.len(),
        ddof: map.ddof(),
        n_valid: map.n_valid(),
        n_missing: n_rows * n_cols - map.n_valid(),
        min: stats.map(|s| s.min),
        max: stats.map(|s| s.max),
        mean: stats.map(|s| s.mean),
    }
}
