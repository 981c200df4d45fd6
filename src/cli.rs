use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tropical cyclone seed index from band-pass filtered vorticity.
#[derive(Parser)]
#[command(
    name = "tcseed",
    version,
    about = "Band-pass variance (TC seed index) of gridded vorticity"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Compute the band-pass variance map of a NetCDF field.
    Compute(ComputeArgs),
    /// Print Lanczos low-pass weights.
    Weights(WeightsArgs),
}

/// Arguments for the `compute` subcommand.
#[derive(clap::Args)]
pub struct ComputeArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "tcseed.toml")]
    pub config: PathBuf,

    /// Override input NetCDF path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override output path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override start of the time window (`YYYY-MM-DD[THH:MM:SS]`).
    #[arg(long)]
    pub start: Option<String>,

    /// Override end of the time window (`YYYY-MM-DD[THH:MM:SS]`).
    #[arg(long)]
    pub end: Option<String>,
}

/// Arguments for the `weights` subcommand.
#[derive(clap::Args)]
pub struct WeightsArgs {
    /// Filter window length in time steps.
    #[arg(short, long, default_value_t = 50)]
    pub window: usize,

    /// Cutoff frequency in cycles per time step, in (0, 0.5).
    #[arg(short, long, conflicts_with = "period")]
    pub cutoff: Option<f64>,

    /// Cutoff period in time steps, as an alternative to `--cutoff`.
    #[arg(short, long)]
    pub period: Option<f64>,

    /// Print weights as JSON.
    #[arg(long)]
    pub json: bool,
}
