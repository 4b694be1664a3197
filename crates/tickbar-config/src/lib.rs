//! Configuration provider for the tickbar aggregator.
//!
//! - [`Config`] - Effective settings loaded from TOML plus `TICKBAR_*` overrides
//! - [`SignalConfig`] - Downstream signal endpoint settings
//! - [`SymbolRegistry`] - Tracked instrument identifiers and their feed routing

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tickbar/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod registry;

pub use config::{Config, ConfigError, Result, SignalConfig};
pub use registry::{SymbolEntry, SymbolRegistry};
