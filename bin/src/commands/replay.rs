//! Replay command implementation.
//!
//! Aggregates a recorded tick file into one-minute bars and writes them out.

use crate::display::write_bars_to;
use anyhow::{Context, Result, bail};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;
use std::path::Path;
use tickbar_lib::prelude::*;
use tickbar_lib::retain_instruments;
use tokio::io::BufReader;
use tracing::warn;

/// How a replay aggregates and writes its bars.
pub(crate) struct ReplayOptions {
    pub(crate) format: OutputFormat,
    pub(crate) input_format: InputFormat,
    pub(crate) config: AggregatorConfig,
    pub(crate) include_partial: bool,
    pub(crate) symbols: BTreeSet<String>,
}

/// Counters reported when a replay finishes.
#[derive(Debug, Default, PartialEq, Eq)]
struct ReplayStats {
    ticks: u64,
    malformed: u64,
    rejected: u64,
}

/// Replay a tick file through the aggregator.
pub(crate) async fn replay(
    input: &Path,
    output: Option<&Path>,
    options: &ReplayOptions,
    quiet: bool,
) -> Result<()> {
    if options.config.window_minutes == 0 {
        bail!("--window must be greater than zero");
    }

    let file = tokio::fs::File::open(input)
        .await
        .with_context(|| format!("Failed to open {}", input.display()))?;

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {pos} ticks {msg}",
        )?);
        pb.set_message(input.display().to_string());
        pb
    };

    let ticks = retain_instruments(
        tick_stream(BufReader::new(file), options.input_format),
        options.symbols.clone(),
    );
    let (bars, stats) = aggregate(ticks, options, &progress).await?;

    progress.finish_with_message(format!(
        "{} bars from {} ticks ({} malformed, {} rejected)",
        bars.len(),
        stats.ticks,
        stats.malformed,
        stats.rejected
    ));

    write_bars_to(&bars, output, options.format)?;

    if let Some(path) = output.filter(|_| !quiet) {
        println!("Output written to: {}", path.display());
    }

    Ok(())
}

async fn aggregate<S>(
    ticks: S,
    options: &ReplayOptions,
    progress: &ProgressBar,
) -> Result<(Vec<ClosedBar>, ReplayStats)>
where
    S: futures::Stream<Item = Result<Tick, TickbarError>>,
{
    let mut ticks = std::pin::pin!(ticks);
    let mut aggregator = BarAggregator::with_config(options.config);
    let mut bars = Vec::new();
    let mut stats = ReplayStats::default();

    while let Some(result) = ticks.next().await {
        match result {
            Ok(tick) => {
                stats.ticks += 1;
                progress.inc(1);
                match aggregator.ingest(&tick) {
                    TickOutcome::Rolled(closed) => bars.push(closed),
                    TickOutcome::Rejected => stats.rejected += 1,
                    _ => {}
                }
            }
            Err(TickbarError::Parse(message)) => {
                warn!("skipping {message}");
                stats.malformed += 1;
            }
            Err(e) => return Err(e).context("Failed to read ticks"),
        }
    }

    if options.include_partial {
        bars.extend(aggregator.finish());
    }

    Ok((bars, stats))
}
