//! Aggregation throughput benchmarks.
//!
//! Run with: `cargo bench --package tickbar-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tickbar_bench::{FeedShape, synthetic_ticks, ticks_to_csv};
use tickbar_lib::{
    AggregatorConfig, BarAggregator, CsvFormatter, Formatter, InputFormat, parse_ticks,
};

fn feed_shapes() -> Vec<(&'static str, FeedShape)> {
    vec![
        (
            "1-instrument",
            FeedShape {
                instruments: 1,
                minutes: 390,
                ticks_per_minute: 60,
            },
        ),
        (
            "50-instruments",
            FeedShape {
                instruments: 50,
                minutes: 60,
                ticks_per_minute: 20,
            },
        ),
    ]
}

fn add_tick_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_tick");

    for (name, shape) in feed_shapes() {
        let ticks = synthetic_ticks(shape);
        group.throughput(Throughput::Elements(ticks.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(name), &ticks, |b, ticks| {
            b.iter(|| {
                let mut aggregator = BarAggregator::with_config(AggregatorConfig::default());
                let mut closed = 0usize;
                for tick in ticks {
                    if aggregator
                        .add_tick(&tick.instrument, tick.price, tick.timestamp_ms)
                        .is_some()
                    {
                        closed += 1;
                    }
                }
                black_box(closed)
            });
        });
    }

    group.finish();
}

fn parse_benchmark(c: &mut Criterion) {
    let shape = FeedShape {
        instruments: 10,
        minutes: 60,
        ticks_per_minute: 30,
    };
    let input = ticks_to_csv(&synthetic_ticks(shape));

    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Elements(shape.total_ticks() as u64));
    group.bench_function("csv", |b| {
        b.iter(|| parse_ticks(black_box(&input), InputFormat::Csv).filter(Result::is_ok).count());
    });
    group.finish();
}

fn format_benchmark(c: &mut Criterion) {
    let shape = FeedShape {
        instruments: 20,
        minutes: 120,
        ticks_per_minute: 4,
    };
    let mut aggregator = BarAggregator::with_config(AggregatorConfig::default());
    let bars: Vec<_> = synthetic_ticks(shape)
        .iter()
        .filter_map(|tick| aggregator.add_tick(&tick.instrument, tick.price, tick.timestamp_ms))
        .collect();

    let mut group = c.benchmark_group("format");
    group.throughput(Throughput::Elements(bars.len() as u64));
    group.bench_function("csv", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(bars.len() * 64);
            CsvFormatter::new()
                .write_bars(black_box(&bars), &mut out)
                .unwrap();
            out.len()
        });
    });
    group.finish();
}

criterion_group!(benches, add_tick_benchmark, parse_benchmark, format_benchmark);
criterion_main!(benches);
