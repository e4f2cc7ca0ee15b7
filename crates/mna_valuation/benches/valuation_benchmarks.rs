//! Criterion benchmarks for projection and valuation.
//!
//! Benchmarks cover:
//! - Three-statement projection across horizons
//! - DCF including its 5×5 sensitivity grid
//! - LBO including the IRR solve and exit scenarios
//! - The full engine fan-out over all four methods

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mna_core::types::{Classification, GrowthStage, Industry};
use mna_model::assumptions::defaults::for_stage;
use mna_model::historical::{normalize, HistoricalPeriod, RawFinancials};
use mna_model::projection::{ProjectionConfig, Projector};
use mna_model::FinancialModel;
use mna_valuation::cca::{CcaParams, Peer};
use mna_valuation::dcf::{DcfParams, DcfValuer};
use mna_valuation::lbo::{LboParams, LboValuer};
use mna_valuation::merger::MergerParams;
use mna_valuation::{ValuationEngine, ValuationRequest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const STAGE: GrowthStage = GrowthStage::ModerateGrowth;

fn tags() -> Classification {
    Classification::new(STAGE, Industry::Industrials)
}

fn historical(name: &str, scale: Decimal) -> HistoricalPeriod {
    let revenue = dec!(1000) * scale;
    let raw = RawFinancials::new(name)
        .with("revenue", revenue)
        .with("operating_income", revenue * dec!(0.15))
        .with("net_income", revenue * dec!(0.10))
        .with("cash", revenue * dec!(0.3))
        .with("receivables", revenue * dec!(0.1))
        .with("net_ppe", revenue * dec!(0.4))
        .with("goodwill", revenue * dec!(0.1))
        .with("payables", revenue * dec!(0.1))
        .with("long_term_debt", revenue * dec!(0.1))
        .with("retained_earnings", revenue * dec!(0.4))
        .with("total_equity", revenue * dec!(0.7))
        .with("shares_outstanding", dec!(100) * scale)
        .with("market_price", dec!(20))
        .with("market_cap", dec!(2000) * scale);
    normalize(&raw).unwrap()
}

fn build_model(name: &str, scale: Decimal, horizon: usize) -> FinancialModel {
    let assumptions = for_stage(STAGE, horizon).unwrap();
    Projector::new(ProjectionConfig::default().with_horizon(horizon))
        .project(&historical(name, scale), &assumptions)
        .unwrap()
}

fn peers() -> Vec<Peer> {
    (1..=8)
        .map(|i| {
            let cap = Decimal::from(500 * i);
            Peer {
                name: format!("Peer{i}"),
                market_cap: cap,
                revenue: cap / dec!(2),
                ebitda: cap / dec!(11),
                net_income: cap / dec!(18),
                net_debt: Some(cap / dec!(10)),
            }
        })
        .collect()
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");
    let historical = historical("Acme", Decimal::ONE);

    for horizon in [5usize, 10, 30] {
        let assumptions = for_stage(STAGE, horizon).unwrap();
        let projector = Projector::new(ProjectionConfig::default().with_horizon(horizon));
        group.bench_with_input(BenchmarkId::new("project", horizon), &horizon, |b, _| {
            b.iter(|| projector.project(black_box(&historical), black_box(&assumptions)))
        });
    }

    group.finish();
}

fn bench_valuers(c: &mut Criterion) {
    let mut group = c.benchmark_group("valuers");
    let model = build_model("Acme", Decimal::ONE, 5);

    let dcf = DcfValuer::new(DcfParams::new(tags()));
    group.bench_function("dcf", |b| b.iter(|| dcf.value(black_box(&model))));

    let lbo = LboValuer::new(LboParams::new(tags()));
    group.bench_function("lbo", |b| b.iter(|| lbo.value(black_box(&model))));

    group.finish();
}

fn bench_engine(c: &mut Criterion) {
    let model = build_model("Acme", Decimal::ONE, 5);
    let target = build_model("Target", dec!(0.3), 5);
    let request = ValuationRequest::new()
        .with_dcf(DcfParams::new(tags()))
        .with_lbo(LboParams::new(tags()))
        .with_cca(CcaParams::new(tags(), peers()))
        .with_merger(&target, MergerParams::default());
    let engine = ValuationEngine::new();

    c.bench_function("engine_all_methods", |b| {
        b.iter(|| engine.run(black_box(&model), black_box(&request)))
    });
}

criterion_group!(benches, bench_projection, bench_valuers, bench_engine);
criterion_main!(benches);
