//! One-minute OHLCV bar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tickbar_types::minute_start_time;

/// OHLCV bar (candlestick) covering one UTC minute.
///
/// `volume` is a tick-count proxy: it grows by one per ingested tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time, minute-aligned epoch milliseconds.
    pub start: i64,
    /// First tick's price.
    pub open: f64,
    /// Highest price during the minute.
    pub high: f64,
    /// Lowest price during the minute.
    pub low: f64,
    /// Last tick's price.
    pub close: f64,
    /// Number of ticks folded into the bar.
    pub volume: f64,
}

impl Bar {
    /// Creates a new bar.
    #[must_use]
    pub const fn new(start: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            start,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Opens a bar from its first tick.
    #[must_use]
    pub const fn opened_at(start: i64, price: f64) -> Self {
        Self::new(start, price, price, price, price, 1.0)
    }

    /// Folds another tick's price into the bar.
    ///
    /// Extremes move only on a strict comparison, so a NaN already in
    /// `high` or `low` stays there.
    pub const fn update(&mut self, price: f64) {
        self.widen(price);
        self.close = price;
    }

    /// Folds a late tick into the bar without moving `close`.
    pub const fn absorb_late(&mut self, price: f64) {
        self.widen(price);
    }

    const fn widen(&mut self, price: f64) {
        if price > self.high {
            self.high = price;
        }
        if price < self.low {
            self.low = price;
        }
        self.volume += 1.0;
    }

    /// Returns the bar start as a UTC datetime.
    #[must_use]
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        minute_start_time(self.start)
    }
}

/// A sealed bar tagged with its instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedBar {
    /// Instrument the bar belongs to.
    pub instrument: String,
    /// The sealed bar.
    #[serde(flatten)]
    pub bar: Bar,
}

impl ClosedBar {
    /// Creates a new closed bar.
    #[must_use]
    pub fn new(instrument: impl Into<String>, bar: Bar) -> Self {
        Self {
            instrument: instrument.into(),
            bar,
        }
    }
}
