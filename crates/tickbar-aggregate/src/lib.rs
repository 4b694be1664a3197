//! Streaming tick-to-minute-bar aggregation.
//!
//! This crate provides:
//!
//! - [`Bar`] / [`ClosedBar`] - One-minute OHLCV bars
//! - [`BarAggregator`] - Per-instrument streaming aggregator
//! - [`BarHistory`] - Bounded FIFO of sealed bars
//! - [`BackdatedPolicy`] - Handling of out-of-order ticks

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tickbar/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod bar;
mod history;
mod policy;

pub use aggregator::{AggregatorConfig, BarAggregator, TickOutcome};
pub use bar::{Bar, ClosedBar};
pub use history::{BarHistory, HISTORY_PADDING, MIN_HISTORY, history_capacity};
pub use policy::{BackdatedPolicy, PolicyParseError};
