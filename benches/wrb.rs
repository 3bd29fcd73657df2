//! Benchmarks for the WRB / hidden gap pipeline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wrbscan::prelude::*;

/// Deterministic bars with a wide bar every so often
fn generate_bars(n: usize) -> Vec<Candle> {
  let mut bars = Vec::with_capacity(n);
  let mut price = 100.0;

  for i in 0..n {
    let change = ((i * 7 + 13) % 100) as f64 / 50.0 - 1.0; // Deterministic "random"
    let burst = if i % 23 == 0 { 8.0 } else { 1.0 };
    let volatility = 2.0 + ((i * 3) % 10) as f64 / 5.0;

    let o = price;
    let c = price + change * burst;
    let h = o.max(c) + volatility * 0.5;
    let l = o.min(c) - volatility * 0.5;

    bars.push(Candle::new(i as i64, o, h, l, c, 1000.0));
    price = c;
  }

  bars
}

fn bench_analyze(c: &mut Criterion) {
  let bars = generate_bars(1000);
  let config = WrbConfig::default();

  c.bench_function("analyze_1000_bars", |b| {
    b.iter(|| {
      let _ = black_box(analyze(black_box(&bars), black_box(&config)));
    })
  });
}

fn bench_stages(c: &mut Criterion) {
  let bars = generate_bars(1000);
  let config = WrbConfig::default();
  let flags = classify_ranges(&bars, &config);

  c.bench_function("classify_ranges_1000_bars", |b| {
    b.iter(|| {
      let _ = black_box(classify_ranges(black_box(&bars), &config));
    })
  });

  c.bench_function("locate_and_fill_1000_bars", |b| {
    b.iter(|| {
      let mut gaps = locate_gaps(black_box(&bars), &flags, &config);
      black_box(track_fills(&bars, &mut gaps));
    })
  });
}

fn bench_scaling(c: &mut Criterion) {
  let config = WrbConfig::default();
  let mut group = c.benchmark_group("scaling");

  for size in [100, 500, 1000, 5000, 10000].iter() {
    let bars = generate_bars(*size);

    group.bench_with_input(BenchmarkId::new("analyze", size), size, |b, _| {
      b.iter(|| {
        let _ = black_box(analyze(black_box(&bars), &config));
      })
    });
  }

  group.finish();
}

fn bench_parallel_scan(c: &mut Criterion) {
  let bars1 = generate_bars(1000);
  let bars2 = generate_bars(1000);
  let bars3 = generate_bars(1000);
  let bars4 = generate_bars(1000);

  let engine = EngineBuilder::new().build().unwrap();

  let instruments: Vec<(&str, &[Candle])> =
    vec![("SYM1", &bars1), ("SYM2", &bars2), ("SYM3", &bars3), ("SYM4", &bars4)];

  c.bench_function("parallel_scan_4_instruments", |b| {
    b.iter(|| {
      let _ = black_box(scan_parallel(black_box(&engine), black_box(instruments.clone())));
    })
  });
}

criterion_group!(benches, bench_analyze, bench_stages, bench_scaling, bench_parallel_scan);

criterion_main!(benches);
