//! Benchmarks for mandi_models.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mandi_core::types::{PriceHistory, PriceRecord, YearMonth};
use mandi_models::models::ModelKind;
use mandi_models::training::train;

/// Synthetic monthly series with trend and a yearly cycle.
fn generate_history(months: usize) -> PriceHistory {
    let start = YearMonth::new(2000, 1).unwrap();
    let records = (0..months)
        .map(|i| {
            let season = ((i % 12) as f64 * std::f64::consts::PI / 6.0).sin();
            PriceRecord::new(start.add_months(i as i64), 1000.0 + 2.5 * i as f64 + 40.0 * season)
        })
        .collect();
    PriceHistory::new(records).unwrap()
}

fn benchmark_seasonal_trend(c: &mut Criterion) {
    let mut group = c.benchmark_group("train_seasonal_trend");
    let kind = ModelKind::SeasonalTrend {
        harmonics: 2,
        ridge: 1e-6,
    };

    for months in [24, 120, 240] {
        let history = generate_history(months);
        group.bench_with_input(BenchmarkId::from_parameter(months), &history, |b, h| {
            b.iter(|| train(black_box(h), &kind, None))
        });
    }

    group.finish();
}

fn benchmark_decision_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("train_decision_tree");
    let kind = ModelKind::decision_tree();

    for months in [24, 120, 240] {
        let history = generate_history(months);
        group.bench_with_input(BenchmarkId::from_parameter(months), &history, |b, h| {
            b.iter(|| train(black_box(h), &kind, Some(42)))
        });
    }

    group.finish();
}

fn benchmark_predict(c: &mut Criterion) {
    let history = generate_history(240);
    let model = train(&history, &ModelKind::default(), None).unwrap();
    let target = history.latest().period.add_months(12);

    c.bench_function("predict_seasonal_trend", |b| {
        b.iter(|| model.predict(black_box(target)))
    });
}

criterion_group!(
    benches,
    benchmark_seasonal_trend,
    benchmark_decision_tree,
    benchmark_predict
);
criterion_main!(benches);
