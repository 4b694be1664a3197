//! Config command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tickbar_lib::prelude::*;

/// Print the effective configuration after file and environment overrides.
pub(crate) fn show_config(path: Option<&Path>) -> Result<()> {
    let config = Config::load(path).context("Failed to load configuration")?;

    println!("Window:           {} minutes", config.window_minutes);
    println!("History capacity: {} bars", config.history_capacity());
    println!("Observation len:  {} closes", config.observation_len());
    println!("Backdated ticks:  {}", config.backdated_policy);

    println!("\nSignal:");
    println!("  Enabled:     {}", config.signal.enabled);
    println!("  URL:         {}", config.signal.url);
    println!("  Dry run:     {}", config.signal.dry_run);
    println!("  Timeout:     {}s", config.signal.timeout_secs);
    println!("  Max retries: {}", config.signal.max_retries);

    println!("\nTracked symbols ({}):", config.symbols.len());
    println!("{:<16} {:>8} {:>10}", "SYMBOL", "EXCHANGE", "TOKEN");
    println!("{}", "-".repeat(36));
    for (name, entry) in config.symbols.iter() {
        println!("{:<16} {:>8} {:>10}", name, entry.exchange_type, entry.token);
    }

    Ok(())
}
