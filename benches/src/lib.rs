//! Benchmark utilities for tickbar.

use tickbar_lib::Tick;

/// Shape of a synthetic tick feed.
#[derive(Debug, Clone, Copy)]
pub struct FeedShape {
    /// Number of distinct instruments.
    pub instruments: usize,
    /// Number of minutes covered.
    pub minutes: usize,
    /// Ticks per instrument per minute.
    pub ticks_per_minute: usize,
}

impl FeedShape {
    /// Total number of ticks the feed yields.
    pub const fn total_ticks(&self) -> usize {
        self.instruments * self.minutes * self.ticks_per_minute
    }
}

/// Generates a deterministic, time-ordered tick feed.
///
/// Instruments are interleaved within each minute and prices follow a
/// small sawtooth around 100.
pub fn synthetic_ticks(shape: FeedShape) -> Vec<Tick> {
    let names: Vec<String> = (0..shape.instruments).map(|i| format!("SYM{i:03}")).collect();
    let step = 60_000 / shape.ticks_per_minute.max(1) as i64;
    let mut ticks = Vec::with_capacity(shape.total_ticks());

    for minute in 0..shape.minutes {
        let minute_start = minute as i64 * 60_000;
        for slot in 0..shape.ticks_per_minute {
            let ts = minute_start + slot as i64 * step;
            for (i, name) in names.iter().enumerate() {
                let price = 100.0 + ((minute + slot + i) % 17) as f64 * 0.05;
                ticks.push(Tick::at(name.as_str(), price, ts));
            }
        }
    }

    ticks
}

/// Renders ticks as `instrument,price,timestamp_ms` lines.
pub fn ticks_to_csv(ticks: &[Tick]) -> String {
    let mut out = String::from("instrument,price,timestamp_ms\n");
    for tick in ticks {
        let ts = tick.timestamp_ms.unwrap_or_default();
        out.push_str(&format!("{},{},{}\n", tick.instrument, tick.price, ts));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_ticks_shape() {
        let shape = FeedShape {
            instruments: 3,
            minutes: 4,
            ticks_per_minute: 5,
        };
        let ticks = synthetic_ticks(shape);
        assert_eq!(ticks.len(), 60);
        assert!(ticks.windows(2).all(|w| w[0].timestamp_ms <= w[1].timestamp_ms));
    }

    #[test]
    fn test_ticks_to_csv() {
        let csv = ticks_to_csv(&[Tick::at("A", 1.5, 0)]);
        assert_eq!(csv, "instrument,price,timestamp_ms\nA,1.5,0\n");
    }
}
