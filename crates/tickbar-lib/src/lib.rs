//! Streaming tick-to-minute-bar aggregation with downstream signal emission.
//!
//! This is a facade crate that re-exports functionality from the tickbar
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```
//! use tickbar_lib::prelude::*;
//!
//! let mut aggregator = BarAggregator::new(20);
//! assert!(aggregator.add_tick("NIFTY", 100.0, Some(0)).is_none());
//! assert!(aggregator.add_tick("NIFTY", 105.0, Some(30_000)).is_none());
//!
//! let closed = aggregator.add_tick("NIFTY", 102.0, Some(61_000)).unwrap();
//! assert_eq!(closed.bar.close, 105.0);
//! assert_eq!(aggregator.closes_for("NIFTY"), vec![105.0]);
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tickbar/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use tickbar_types::*;

// Re-export aggregation
pub use tickbar_aggregate::{
    AggregatorConfig, BackdatedPolicy, Bar, BarAggregator, BarHistory, ClosedBar,
    PolicyParseError, TickOutcome, history_capacity,
};

// Re-export tick feeds
#[cfg(feature = "feed")]
pub use tickbar_feed::{InputFormat, ParseError, parse_line, parse_ticks, retain_instruments, tick_stream};

// Re-export formatters
#[cfg(feature = "format")]
pub use tickbar_format::{CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat};

// Re-export configuration
#[cfg(feature = "config")]
pub use tickbar_config::{Config, ConfigError, SignalConfig, SymbolEntry, SymbolRegistry};

// Re-export signal emission
#[cfg(feature = "signal")]
pub use tickbar_signal::{
    ClientConfig, SignalClient, SignalDispatcher, SignalError, SignalRequest, SignalResponse,
};

/// Prelude module for convenient imports.
///
/// ```
/// use tickbar_lib::prelude::*;
/// ```
pub mod prelude {
    pub use tickbar_types::{Clock, ManualClock, Result, SystemClock, Tick, TickbarError};

    pub use tickbar_aggregate::{
        AggregatorConfig, BackdatedPolicy, Bar, BarAggregator, ClosedBar, TickOutcome,
    };

    #[cfg(feature = "feed")]
    pub use tickbar_feed::{InputFormat, tick_stream};

    #[cfg(feature = "format")]
    pub use tickbar_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};

    #[cfg(feature = "config")]
    pub use tickbar_config::Config;

    #[cfg(feature = "signal")]
    pub use tickbar_signal::{SignalClient, SignalDispatcher};
}
