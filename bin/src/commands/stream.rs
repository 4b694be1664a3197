//! Stream command implementation.
//!
//! Aggregates live ticks from stdin and forwards closed bars of tracked
//! symbols to the signal endpoint.

use crate::display::bar_summary;
use anyhow::{Context, Result};
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tickbar_lib::prelude::*;
use tickbar_lib::{ClientConfig, SignalClient};
use tokio::io::BufReader;
use tracing::{info, warn};

/// Build the dispatcher described by the signal section, if enabled.
fn build_dispatcher(config: &Config, no_signal: bool) -> Result<Option<SignalDispatcher>> {
    if no_signal || !config.signal.enabled {
        info!("signal emission disabled");
        return Ok(None);
    }

    let client_config = ClientConfig {
        timeout: Duration::from_secs(config.signal.timeout_secs),
        max_retries: config.signal.max_retries,
        ..ClientConfig::default()
    };
    let client = SignalClient::new(&config.signal.url, client_config)
        .context("Failed to create signal client")?;
    info!(
        url = %config.signal.url,
        dry_run = config.signal.dry_run,
        observation_len = config.observation_len(),
        "signal emission enabled"
    );
    Ok(Some(SignalDispatcher::new(
        client,
        config.observation_len(),
        config.signal.dry_run,
    )))
}

/// Counters reported when the input closes.
#[derive(Debug, Default, PartialEq, Eq)]
struct StreamStats {
    closed: u64,
    malformed: u64,
    open_at_close: u64,
}

/// Aggregate ticks from stdin until it closes.
pub(crate) async fn stream(
    config_path: Option<&Path>,
    input_format: InputFormat,
    no_signal: bool,
) -> Result<()> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    let dispatcher = build_dispatcher(&config, no_signal)?;

    info!(
        window_minutes = config.window_minutes,
        policy = %config.backdated_policy,
        symbols = config.symbols.len(),
        %input_format,
        "reading ticks from stdin"
    );

    let ticks = tick_stream(BufReader::new(tokio::io::stdin()), input_format);
    run(ticks, &config, dispatcher.as_ref()).await?;
    Ok(())
}

async fn run<S>(
    ticks: S,
    config: &Config,
    dispatcher: Option<&SignalDispatcher>,
) -> Result<StreamStats>
where
    S: futures::Stream<Item = Result<Tick, TickbarError>>,
{
    let mut ticks = std::pin::pin!(ticks);
    let mut aggregator = BarAggregator::with_config(config.aggregator_config());
    let mut stats = StreamStats::default();

    while let Some(result) = ticks.next().await {
        let tick = match result {
            Ok(tick) => tick,
            Err(TickbarError::Parse(message)) => {
                warn!("skipping {message}");
                stats.malformed += 1;
                continue;
            }
            Err(e) => return Err(e).context("Failed to read ticks from stdin"),
        };

        let Some(closed) = aggregator.ingest(&tick).into_closed() else {
            continue;
        };
        stats.closed += 1;
        info!("{}", bar_summary(&closed));

        let Some(dispatcher) = dispatcher else {
            continue;
        };
        if !config.symbols.contains(&closed.instrument) {
            continue;
        }
        let Some(history) = aggregator.history(&closed.instrument) else {
            continue;
        };
        if let Err(e) = dispatcher.dispatch(&closed, history).await {
            warn!(symbol = %closed.instrument, error = %e, "signal delivery failed");
        }
    }

    for partial in aggregator.finish() {
        info!("input closed with open bar {}", bar_summary(&partial));
        stats.open_at_close += 1;
    }
    info!(
        closed = stats.closed,
        malformed = stats.malformed,
        open = stats.open_at_close,
        "stream finished"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatcher_disabled() {
        let config = Config::default();
        assert!(build_dispatcher(&config, true).unwrap().is_none());

        let mut config = Config::default();
        config.signal.enabled = false;
        assert!(build_dispatcher(&config, false).unwrap().is_none());
    }

    #[test]
    fn test_dispatcher_uses_observation_len() {
        let mut config = Config::default();
        config.window_minutes = 4;
        let dispatcher = build_dispatcher(&config, false).unwrap().unwrap();
        assert_eq!(dispatcher.observation_len(), 5);
        assert!(dispatcher.dry_run());
    }

    #[tokio::test]
    async fn test_run_without_signals() {
        let input = "NIFTY,100,0\nNIFTY,oops,1\nNIFTY,105,30000\nNIFTY,102,61000\n";
        let ticks = tick_stream(BufReader::new(input.as_bytes()), InputFormat::Csv);
        let stats = run(ticks, &Config::default(), None).await.unwrap();

        assert_eq!(
            stats,
            StreamStats {
                closed: 1,
                malformed: 1,
                open_at_close: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_run_counts_every_instrument() {
        let input = "NIFTY,100,0\nBANKNIFTY,50,0\nNIFTY,101,60000\nBANKNIFTY,51,120000\n";
        let ticks = tick_stream(BufReader::new(input.as_bytes()), InputFormat::Csv);
        let stats = run(ticks, &Config::default(), None).await.unwrap();

        assert_eq!(stats.closed, 2);
        assert_eq!(stats.malformed, 0);
        assert_eq!(stats.open_at_close, 2);
    }
}
