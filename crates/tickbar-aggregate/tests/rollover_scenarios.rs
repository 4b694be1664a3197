//! End-to-end aggregation scenarios.

use approx::assert_relative_eq;
use tickbar_aggregate::{AggregatorConfig, BackdatedPolicy, Bar, BarAggregator, ClosedBar};
use tickbar_types::{MIN_MINUTE_START, ManualClock};

const MINUTE: i64 = 60_000;

fn aggregator(window_minutes: usize) -> BarAggregator<ManualClock> {
    BarAggregator::with_clock(AggregatorConfig::new(window_minutes), ManualClock::new(0))
}

#[test]
fn nifty_three_tick_rollover() {
    let mut agg = aggregator(20);

    assert_eq!(agg.add_tick("NIFTY", 100.0, Some(0)), None);
    assert_eq!(agg.add_tick("NIFTY", 105.0, Some(30_000)), None);
    assert_eq!(
        agg.open_bar("NIFTY").copied(),
        Some(Bar::new(0, 100.0, 105.0, 100.0, 105.0, 2.0))
    );

    let emitted = agg.add_tick("NIFTY", 102.0, Some(61_000));
    assert_eq!(
        emitted,
        Some(ClosedBar::new(
            "NIFTY",
            Bar::new(0, 100.0, 105.0, 100.0, 105.0, 2.0)
        ))
    );
    assert_eq!(
        agg.open_bar("NIFTY").copied(),
        Some(Bar::new(MINUTE, 102.0, 102.0, 102.0, 102.0, 1.0))
    );
}

#[test]
fn ticks_within_one_minute_never_emit() {
    let prices = [101.0, 99.5, 104.25, 100.0, 98.75, 103.0, 102.5];
    let mut agg = aggregator(20);

    for (i, price) in prices.iter().enumerate() {
        let ts = 7 * MINUTE + (i as i64) * 8_000;
        assert!(agg.add_tick("X", *price, Some(ts)).is_none());
    }

    let bar = agg.open_bar("X").unwrap();
    assert_eq!(bar.start, 7 * MINUTE);
    assert_relative_eq!(bar.open, 101.0);
    assert_relative_eq!(bar.close, 102.5);
    assert_relative_eq!(bar.high, 104.25);
    assert_relative_eq!(bar.low, 98.75);
    assert_relative_eq!(bar.volume, prices.len() as f64);
    assert!(bar.low <= bar.open && bar.open <= bar.high);
    assert!(bar.low <= bar.close && bar.close <= bar.high);
}

#[test]
fn history_evicts_oldest_at_capacity() {
    let mut agg = aggregator(16);
    assert_eq!(agg.capacity(), 21);

    // Tick #1 opens the first bar; ticks #2..=#26 each close the previous one.
    let mut emitted = Vec::new();
    for n in 1..=26_i64 {
        if let Some(closed) = agg.add_tick("X", n as f64, Some((n - 1) * MINUTE)) {
            emitted.push(closed.bar.close);
        }
        assert!(agg.history_count("X") <= 21);
    }

    assert_eq!(emitted.len(), 25);
    assert_eq!(agg.history_count("X"), 21);

    let expected: Vec<f64> = (5..=25).map(|n| n as f64).collect();
    assert_eq!(agg.closes_for("X"), expected);
    assert_eq!(agg.closes_for("X"), emitted[4..].to_vec());
}

#[test]
fn closes_are_chronological() {
    let mut agg = aggregator(20);
    let mut emitted = Vec::new();

    for minute in 0..10_i64 {
        for second in [0, 15, 45] {
            let price = 100.0 + minute as f64 + second as f64 / 100.0;
            if let Some(closed) = agg.add_tick("X", price, Some(minute * MINUTE + second * 1_000)) {
                emitted.push(closed.bar);
            }
        }
    }

    let history: Vec<Bar> = agg.history("X").unwrap().iter().copied().collect();
    assert_eq!(history, emitted);
    assert!(history.windows(2).all(|w| w[0].start < w[1].start));
    assert!(history.iter().all(|bar| bar.start % MINUTE == 0));
}

#[test]
fn reset_then_first_tick_again() {
    let mut agg = aggregator(20);
    for minute in 0..4_i64 {
        agg.add_tick("X", 1.0, Some(minute * MINUTE));
    }
    assert_eq!(agg.history_count("X"), 3);

    agg.reset_instrument("X");
    assert_eq!(agg.history_count("X"), 0);

    assert!(agg.add_tick("X", 9.0, Some(2 * MINUTE)).is_none());
    assert_eq!(
        agg.open_bar("X").copied(),
        Some(Bar::new(2 * MINUTE, 9.0, 9.0, 9.0, 9.0, 1.0))
    );
}

#[test]
fn backdated_tick_accepted_breaks_monotonicity() {
    let mut agg = BarAggregator::with_clock(
        AggregatorConfig::new(20).with_policy(BackdatedPolicy::Accept),
        ManualClock::new(0),
    );

    agg.add_tick("X", 1.0, Some(5 * MINUTE));
    agg.add_tick("X", 2.0, Some(3 * MINUTE));
    agg.add_tick("X", 3.0, Some(4 * MINUTE));

    let starts: Vec<i64> = agg.history("X").unwrap().iter().map(|bar| bar.start).collect();
    assert_eq!(starts, vec![5 * MINUTE, 3 * MINUTE]);
}

#[test]
fn non_finite_prices_propagate() {
    let mut agg = aggregator(20);
    agg.add_tick("X", 1.0, Some(0));
    agg.add_tick("X", f64::NAN, Some(1_000));

    let bar = agg.open_bar("X").unwrap();
    assert!(bar.close.is_nan());
    assert_relative_eq!(bar.volume, 2.0);
}

#[test]
fn nan_first_tick_poisons_extremes() {
    let mut agg = aggregator(20);
    agg.add_tick("X", f64::NAN, Some(0));
    agg.add_tick("X", 5.0, Some(1_000));

    let closed = agg.add_tick("X", 6.0, Some(MINUTE)).unwrap();
    assert!(closed.bar.open.is_nan());
    assert!(closed.bar.high.is_nan());
    assert!(closed.bar.low.is_nan());
    assert_relative_eq!(closed.bar.close, 5.0);
    assert_relative_eq!(closed.bar.volume, 2.0);
}

#[test]
fn extreme_timestamps_do_not_panic() {
    let mut agg = aggregator(20);
    assert!(agg.add_tick("X", 1.0, Some(i64::MIN)).is_none());
    assert!(agg.add_tick("X", 2.0, Some(i64::MIN + 1)).is_none());

    let bar = agg.open_bar("X").unwrap();
    assert_eq!(bar.start, MIN_MINUTE_START);
    assert_relative_eq!(bar.volume, 2.0);

    let closed = agg.add_tick("X", 3.0, Some(i64::MAX)).unwrap();
    assert_eq!(closed.bar.start, MIN_MINUTE_START);
}
