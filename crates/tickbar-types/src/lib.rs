//! Core types for the tickbar minute-bar aggregator.
//!
//! This crate provides the fundamental data structures used throughout tickbar:
//!
//! - [`Tick`] - A single price observation for an instrument
//! - [`floor_to_minute`] - UTC minute alignment for bar starts
//! - [`Clock`] - Injectable time source ([`SystemClock`], [`ManualClock`])
//! - [`TickbarError`] - Shared error type

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tickbar/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod clock;
mod error;
mod tick;
mod timeframe;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, TickbarError};
pub use tick::Tick;
pub use timeframe::{
    BAR_MILLIS, MIN_MINUTE_START, floor_to_minute, is_minute_aligned, minute_start_time, next_minute,
};
