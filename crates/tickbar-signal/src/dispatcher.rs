//! Turns closed bars into signal requests.

use tickbar_aggregate::{BarHistory, ClosedBar};
use tracing::{debug, info};

use crate::{SignalClient, SignalError, SignalRequest, SignalResponse};

/// Smallest closes window the downstream model accepts.
pub const MIN_OBSERVATION_LEN: usize = 2;

/// Forwards closed bars to the signal endpoint once enough history exists.
#[derive(Debug, Clone)]
pub struct SignalDispatcher {
    client: SignalClient,
    observation_len: usize,
    dry_run: bool,
}

impl SignalDispatcher {
    /// Creates a dispatcher sending the newest `observation_len` closes.
    ///
    /// Lengths below [`MIN_OBSERVATION_LEN`] are raised to it.
    #[must_use]
    pub fn new(client: SignalClient, observation_len: usize, dry_run: bool) -> Self {
        Self {
            client,
            observation_len: observation_len.max(MIN_OBSERVATION_LEN),
            dry_run,
        }
    }

    /// Returns the number of closes sent per request.
    #[must_use]
    pub const fn observation_len(&self) -> usize {
        self.observation_len
    }

    /// Returns true if requests ask the endpoint not to trade.
    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &SignalClient {
        &self.client
    }

    /// Builds the request for `closed`, given its instrument's history.
    ///
    /// Returns `None` while the history is still warming up.
    #[must_use]
    pub fn build_request(&self, closed: &ClosedBar, history: &BarHistory) -> Option<SignalRequest> {
        if history.len() < self.observation_len {
            debug!(
                instrument = %closed.instrument,
                have = history.len(),
                need = self.observation_len,
                "warming up, no signal"
            );
            return None;
        }
        Some(SignalRequest {
            symbol: closed.instrument.clone(),
            closes: history.last_closes(self.observation_len),
            price: Some(closed.bar.close),
            dry_run: self.dry_run,
        })
    }

    /// Builds and posts the request for `closed`.
    ///
    /// Returns `Ok(None)` when nothing was sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint could not be reached or rejected the request.
    pub async fn dispatch(
        &self,
        closed: &ClosedBar,
        history: &BarHistory,
    ) -> Result<Option<SignalResponse>, SignalError> {
        let Some(request) = self.build_request(closed, history) else {
            return Ok(None);
        };
        let response = self.client.send(&request).await?;
        info!(
            symbol = %request.symbol,
            price = closed.bar.close,
            result = response.result.as_deref().unwrap_or("-"),
            decision_id = response.decision_id.as_deref().unwrap_or("-"),
            "signal sent"
        );
        Ok(Some(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickbar_aggregate::{AggregatorConfig, BarAggregator};
    use tickbar_types::ManualClock;

    fn dispatcher(observation_len: usize) -> SignalDispatcher {
        let client = SignalClient::with_defaults("http://127.0.0.1:4000/api/signal").unwrap();
        SignalDispatcher::new(client, observation_len, true)
    }

    /// Feeds one tick per minute with price = minute index; returns the last
    /// closed bar.
    fn run_minutes(agg: &mut BarAggregator<ManualClock>, minutes: i64) -> Option<ClosedBar> {
        let mut last = None;
        for minute in 0..minutes {
            if let Some(closed) = agg.add_tick("NIFTY", minute as f64, Some(minute * 60_000)) {
                last = Some(closed);
            }
        }
        last
    }

    #[test]
    fn test_observation_len_minimum() {
        assert_eq!(dispatcher(0).observation_len(), MIN_OBSERVATION_LEN);
        assert_eq!(dispatcher(1).observation_len(), MIN_OBSERVATION_LEN);
        assert_eq!(dispatcher(21).observation_len(), 21);
    }

    #[test]
    fn test_warm_up_returns_none() {
        let mut agg = BarAggregator::with_clock(AggregatorConfig::new(4), ManualClock::new(0));
        // 5 ticks seal 4 bars; 5 closes are needed.
        let closed = run_minutes(&mut agg, 5).unwrap();
        let history = agg.history("NIFTY").unwrap();
        assert_eq!(history.len(), 4);
        assert!(dispatcher(5).build_request(&closed, history).is_none());
    }

    #[test]
    fn test_request_carries_newest_closes() {
        let mut agg = BarAggregator::with_clock(AggregatorConfig::new(4), ManualClock::new(0));
        let closed = run_minutes(&mut agg, 10).unwrap();
        let history = agg.history("NIFTY").unwrap();

        let request = dispatcher(5).build_request(&closed, history).unwrap();
        assert_eq!(request.symbol, "NIFTY");
        assert_eq!(request.closes, vec![4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(request.price, Some(8.0));
        assert!(request.dry_run);
    }

    #[tokio::test]
    async fn test_dispatch_skips_during_warm_up() {
        let mut agg = BarAggregator::with_clock(AggregatorConfig::new(20), ManualClock::new(0));
        let closed = run_minutes(&mut agg, 3).unwrap();
        let history = agg.history("NIFTY").unwrap();

        // Nothing is sent, so the unreachable endpoint is never contacted.
        let sent = dispatcher(21).dispatch(&closed, history).await.unwrap();
        assert!(sent.is_none());
    }
}
