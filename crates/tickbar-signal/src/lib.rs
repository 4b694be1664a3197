//! Signal emission for closed minute bars.
//!
//! This crate provides:
//!
//! - [`SignalRequest`] / [`SignalResponse`] - Endpoint wire bodies
//! - [`SignalClient`] - HTTP client with retry and backoff
//! - [`SignalDispatcher`] - Closed bar to request, gated on history warm-up

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tickbar/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod dispatcher;
mod payload;

pub use client::{ClientConfig, SignalClient, SignalError};
pub use dispatcher::{MIN_OBSERVATION_LEN, SignalDispatcher};
pub use payload::{SignalRequest, SignalResponse};
