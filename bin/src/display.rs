//! Display utilities and output formatting for the tickbar CLI.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tickbar_lib::prelude::*;

/// Write closed bars in the specified format.
pub(crate) fn write_bars<W: Write + Send>(
    bars: &[ClosedBar],
    writer: W,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Csv => CsvFormatter::new().with_instrument(true).write_bars(bars, writer)?,
        OutputFormat::Json => JsonFormatter::new().with_pretty(true).write_bars(bars, writer)?,
        OutputFormat::Ndjson => JsonFormatter::ndjson().write_bars(bars, writer)?,
    }
    Ok(())
}

/// Write closed bars to `output`, or stdout when no path is given.
pub(crate) fn write_bars_to(
    bars: &[ClosedBar],
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_bars(bars, BufWriter::new(file), format)
        }
        None => write_bars(bars, BufWriter::new(std::io::stdout()), format),
    }
}

/// One-line summary of a closed bar for log output.
pub(crate) fn bar_summary(closed: &ClosedBar) -> String {
    let bar = &closed.bar;
    let start = bar
        .start_time()
        .map_or_else(|| bar.start.to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
    format!(
        "{} {} O={} H={} L={} C={} V={}",
        closed.instrument, start, bar.open, bar.high, bar.low, bar.close, bar.volume
    )
}
