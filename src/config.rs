use std::path::PathBuf;

use serde::Deserialize;

/// Top-level tcseed configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TcseedConfig {
    /// I/O settings.
    #[serde(default)]
    pub io: IoToml,

    /// Lanczos filter settings.
    #[serde(default)]
    pub filter: FilterToml,

    /// Variance settings.
    #[serde(default)]
    pub variance: VarianceToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub bandpass_output: Option<PathBuf>,
    #[serde(default = "default_variable")]
    pub variable: String,
    #[serde(default = "default_time_var")]
    pub time_var: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default = "default_resample_hours")]
    pub resample_hours: u32,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            bandpass_output: None,
            variable: default_variable(),
            time_var: default_time_var(),
            start: None,
            end: None,
            resample_hours: default_resample_hours(),
            format: default_format(),
            compression: default_compression(),
            row_group_size: default_row_group_size(),
        }
    }
}

fn default_variable() -> String {
    "vo".to_string()
}
fn default_time_var() -> String {
    "time".to_string()
}
fn default_resample_hours() -> u32 {
    24
}
fn default_format() -> String {
    "netcdf".to_string()
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterToml {
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_high_cutoff_period")]
    pub high_cutoff_period: f64,
    #[serde(default = "default_low_cutoff_period")]
    pub low_cutoff_period: f64,
}

impl Default for FilterToml {
    fn default() -> Self {
        Self {
            window: default_window(),
            high_cutoff_period: default_high_cutoff_period(),
            low_cutoff_period: default_low_cutoff_period(),
        }
    }
}

fn default_window() -> usize {
    50
}
fn default_high_cutoff_period() -> f64 {
    3.0
}
fn default_low_cutoff_period() -> f64 {
    10.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VarianceToml {
    #[serde(default)]
    pub ddof: usize,
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for VarianceToml {
    fn default() -> Self {
        Self {
            ddof: 0,
            parallel: true,
        }
    }
}

fn default_true() -> bool {
    true
}
