//! Weights command: print Lanczos low-pass weights.

use std::io::Write;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::info;

use tcseed_lanczos::{FilterWeights, cutoff_from_period, low_pass_weights};

use crate::cli::WeightsArgs;

/// JSON form of a generated weight vector.
#[derive(Debug, Serialize)]
struct WeightsReport<'a> {
    window: usize,
    cutoff: f64,
    len: usize,
    center: usize,
    sum: f64,
    weights: &'a [f64],
}

/// Generate weights and print them to stdout.
pub fn run(args: WeightsArgs) -> Result<()> {
    let cutoff = resolve_cutoff(&args)?;
    let weights = low_pass_weights(args.window, cutoff)
        .with_context(|| format!("window {} with cutoff {cutoff}", args.window))?;
    info!(len = weights.len(), sum = weights.sum(), "weights generated");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        let json = serde_json::to_string_pretty(&report(args.window, cutoff, &weights))
            .context("failed to serialize weights")?;
        writeln!(out, "{json}")?;
    } else {
        for (k, w) in weights.as_slice().iter().enumerate() {
            let lag = k as i64 - weights.center() as i64;
            writeln!(out, "{lag:>4} {w:+.12e}")?;
        }
    }
    Ok(())
}

fn resolve_cutoff(args: &WeightsArgs) -> Result<f64> {
    match (args.cutoff, args.period) {
        (Some(cutoff), None) => Ok(cutoff),
        (None, Some(period)) => Ok(cutoff_from_period(period)?),
        (None, None) => bail!("one of --cutoff or --period is required"),
        (Some(_), Some(_)) => bail!("--cutoff and --period are mutually exclusive"),
    }
}

fn report(window: usize, cutoff: f64, weights: &FilterWeights) -> WeightsReport<'_> {
    WeightsReport {
        window,
        cutoff,
        len: weights.len(),
        center: weights.center(),
        sum: weights.sum(),
        weights: weights.as_slice(),
    }
}
