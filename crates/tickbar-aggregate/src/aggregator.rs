//! Streaming tick-to-minute-bar aggregation.

use std::collections::HashMap;

use tickbar_types::{Clock, SystemClock, Tick, floor_to_minute};
use tracing::{debug, trace, warn};

use crate::history::history_capacity;
use crate::{BackdatedPolicy, Bar, BarHistory, ClosedBar};

/// Aggregator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Lookback length the downstream consumer needs, in minutes.
    pub window_minutes: usize,
    /// Handling of ticks older than the open bar.
    pub backdated_policy: BackdatedPolicy,
}

impl AggregatorConfig {
    /// Lookback used when none is configured.
    pub const DEFAULT_WINDOW_MINUTES: usize = 20;

    /// Creates a config for the given lookback with the default policy.
    #[must_use]
    pub const fn new(window_minutes: usize) -> Self {
        Self {
            window_minutes,
            backdated_policy: BackdatedPolicy::Accept,
        }
    }

    /// Sets the backdated tick policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: BackdatedPolicy) -> Self {
        self.backdated_policy = policy;
        self
    }

    /// Returns the per-instrument history capacity, `max(window + 5, 21)`.
    #[must_use]
    pub const fn history_capacity(&self) -> usize {
        history_capacity(self.window_minutes)
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW_MINUTES)
    }
}

/// What a single tick did to its instrument's state.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// First tick for the instrument; a bar was opened.
    Opened,
    /// The tick fell in the open bar's minute.
    Updated,
    /// The open bar was sealed and a new one opened from the tick.
    Rolled(ClosedBar),
    /// A backdated tick was folded into the open bar.
    Coalesced,
    /// A backdated tick was dropped.
    Rejected,
}

impl TickOutcome {
    /// Returns the sealed bar, if the tick caused a rollover.
    #[must_use]
    pub fn into_closed(self) -> Option<ClosedBar> {
        match self {
            Self::Rolled(closed) => Some(closed),
            _ => None,
        }
    }

    /// Returns true if the tick sealed a bar.
    #[must_use]
    pub const fn is_rollover(&self) -> bool {
        matches!(self, Self::Rolled(_))
    }
}

#[derive(Debug, Clone)]
struct InstrumentState {
    open: Bar,
    history: BarHistory,
}

impl InstrumentState {
    fn new(start: i64, price: f64, capacity: usize) -> Self {
        Self {
            open: Bar::opened_at(start, price),
            history: BarHistory::with_capacity(capacity),
        }
    }
}

/// Per-instrument streaming bar aggregator.
///
/// Each instrument has at most one open bar plus a bounded history of sealed
/// bars. State is created on an instrument's first tick and destroyed by
/// [`reset_instrument`](Self::reset_instrument). The aggregator performs no
/// validation: non-finite prices and out-of-order timestamps flow into the
/// bars as given (see [`BackdatedPolicy`] for the latter).
///
/// There is no internal synchronization; concurrent producers must funnel
/// ticks through a single owner.
#[derive(Debug)]
pub struct BarAggregator<C = SystemClock> {
    config: AggregatorConfig,
    clock: C,
    states: HashMap<String, InstrumentState>,
}

impl BarAggregator<SystemClock> {
    /// Creates an aggregator for the given lookback using the system clock.
    #[must_use]
    pub fn new(window_minutes: usize) -> Self {
        Self::with_config(AggregatorConfig::new(window_minutes))
    }

    /// Creates an aggregator from a config using the system clock.
    #[must_use]
    pub fn with_config(config: AggregatorConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for BarAggregator<SystemClock> {
    fn default() -> Self {
        Self::with_config(AggregatorConfig::default())
    }
}

impl<C: Clock> BarAggregator<C> {
    /// Creates an aggregator that stamps untimed ticks with `clock`.
    #[must_use]
    pub fn with_clock(config: AggregatorConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            states: HashMap::new(),
        }
    }

    /// Adds a tick, returning the sealed bar when the tick starts a new minute.
    ///
    /// When `timestamp_ms` is `None` the tick is stamped with the clock's
    /// current time.
    pub fn add_tick(
        &mut self,
        instrument: &str,
        price: f64,
        timestamp_ms: Option<i64>,
    ) -> Option<ClosedBar> {
        self.apply(instrument, price, timestamp_ms).into_closed()
    }

    /// Processes a tick, reporting what it did to the instrument's state.
    pub fn ingest(&mut self, tick: &Tick) -> TickOutcome {
        self.apply(&tick.instrument, tick.price, tick.timestamp_ms)
    }

    fn apply(&mut self, instrument: &str, price: f64, timestamp_ms: Option<i64>) -> TickOutcome {
        let timestamp_ms = timestamp_ms.unwrap_or_else(|| self.clock.now_millis());
        let start = floor_to_minute(timestamp_ms);

        let Some(state) = self.states.get_mut(instrument) else {
            trace!(instrument, start, price, "opening first bar");
            self.states.insert(
                instrument.to_owned(),
                InstrumentState::new(start, price, self.config.history_capacity()),
            );
            return TickOutcome::Opened;
        };

        if start == state.open.start {
            state.open.update(price);
            return TickOutcome::Updated;
        }

        if start < state.open.start {
            let policy = self.config.backdated_policy;
            warn!(
                instrument,
                tick_start = start,
                open_start = state.open.start,
                %policy,
                "backdated tick"
            );
            match policy {
                BackdatedPolicy::Reject => return TickOutcome::Rejected,
                BackdatedPolicy::Coalesce => {
                    state.open.absorb_late(price);
                    return TickOutcome::Coalesced;
                }
                BackdatedPolicy::Accept => {}
            }
        }

        let sealed = std::mem::replace(&mut state.open, Bar::opened_at(start, price));
        if state.history.push(sealed).is_some() {
            trace!(instrument, "history full, evicted oldest bar");
        }
        debug!(
            instrument,
            start = sealed.start,
            close = sealed.close,
            volume = sealed.volume,
            "bar closed"
        );

        TickOutcome::Rolled(ClosedBar::new(instrument, sealed))
    }
}

impl<C> BarAggregator<C> {
    /// Returns the aggregator settings.
    #[must_use]
    pub const fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Returns the configured lookback in minutes.
    #[must_use]
    pub const fn window_minutes(&self) -> usize {
        self.config.window_minutes
    }

    /// Returns the per-instrument history capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.config.history_capacity()
    }

    /// Returns the backdated tick policy.
    #[must_use]
    pub const fn policy(&self) -> BackdatedPolicy {
        self.config.backdated_policy
    }

    /// Returns closes of the instrument's sealed bars, oldest first.
    ///
    /// Unknown instruments yield an empty vector.
    #[must_use]
    pub fn closes_for(&self, instrument: &str) -> Vec<f64> {
        self.states
            .get(instrument)
            .map_or_else(Vec::new, |state| state.history.closes())
    }

    /// Returns the newest `n` closes for the instrument, oldest first.
    #[must_use]
    pub fn last_closes(&self, instrument: &str, n: usize) -> Vec<f64> {
        self.states
            .get(instrument)
            .map_or_else(Vec::new, |state| state.history.last_closes(n))
    }

    /// Returns the number of sealed bars retained for the instrument.
    #[must_use]
    pub fn history_count(&self, instrument: &str) -> usize {
        self.states
            .get(instrument)
            .map_or(0, |state| state.history.len())
    }

    /// Returns the instrument's sealed-bar history, if the instrument is known.
    #[must_use]
    pub fn history(&self, instrument: &str) -> Option<&BarHistory> {
        self.states.get(instrument).map(|state| &state.history)
    }

    /// Returns the instrument's currently accumulating bar.
    #[must_use]
    pub fn open_bar(&self, instrument: &str) -> Option<&Bar> {
        self.states.get(instrument).map(|state| &state.open)
    }

    /// Returns true if the instrument has state.
    #[must_use]
    pub fn contains(&self, instrument: &str) -> bool {
        self.states.contains_key(instrument)
    }

    /// Iterates over the instruments with state, in no particular order.
    pub fn instruments(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// Returns the number of instruments with state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if no instrument has state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Drops all state for the instrument. Resetting an unknown instrument is a no-op.
    pub fn reset_instrument(&mut self, instrument: &str) {
        if self.states.remove(instrument).is_some() {
            debug!(instrument, "instrument reset");
        }
    }

    /// Finishes aggregation, returning every partial open bar sorted by instrument.
    #[must_use]
    pub fn finish(self) -> Vec<ClosedBar> {
        let mut open: Vec<ClosedBar> = self
            .states
            .into_iter()
            .map(|(instrument, state)| ClosedBar::new(instrument, state.open))
            .collect();
        open.sort_by(|a, b| a.instrument.cmp(&b.instrument));
        open
    }
}
