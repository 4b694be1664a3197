//! Tick data representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timeframe::floor_to_minute;

/// A single observed price for an instrument.
///
/// The timestamp is optional: ticks without one are stamped by the
/// aggregator's clock when they are ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Instrument identifier (e.g. `NIFTY`).
    pub instrument: String,
    /// Last traded or quoted price.
    pub price: f64,
    /// Epoch milliseconds (UTC), if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<i64>,
}

impl Tick {
    /// Creates a new tick without a timestamp.
    #[must_use]
    pub fn new(instrument: impl Into<String>, price: f64) -> Self {
        Self {
            instrument: instrument.into(),
            price,
            timestamp_ms: None,
        }
    }

    /// Creates a new tick observed at the given epoch milliseconds.
    #[must_use]
    pub fn at(instrument: impl Into<String>, price: f64, timestamp_ms: i64) -> Self {
        Self {
            instrument: instrument.into(),
            price,
            timestamp_ms: Some(timestamp_ms),
        }
    }

    /// Returns a copy of this tick stamped with `timestamp_ms` if it has none.
    #[must_use]
    pub fn or_stamped(mut self, timestamp_ms: i64) -> Self {
        self.timestamp_ms.get_or_insert(timestamp_ms);
        self
    }

    /// Returns the start of the minute this tick falls into.
    #[must_use]
    pub fn bar_start(&self) -> Option<i64> {
        self.timestamp_ms.map(floor_to_minute)
    }

    /// Returns the tick timestamp as a UTC datetime.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp_ms.and_then(DateTime::from_timestamp_millis)
    }
}
