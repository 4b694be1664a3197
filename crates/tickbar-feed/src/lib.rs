//! Tick source adapters for the tickbar aggregator.
//!
//! This crate turns raw tick lines into [`Tick`](tickbar_types::Tick)s:
//!
//! - [`parse_line`] / [`parse_ticks`] - CSV and NDJSON line parsing
//! - [`tick_stream`] - Async tick stream over any buffered reader
//! - [`retain_instruments`] - Whitelist filter for tracked symbols

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tickbar/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod parse;
mod stream;

pub use parse::{InputFormat, ParseError, parse_line, parse_ticks};
pub use stream::{retain_instruments, tick_stream};
