//! Synthetic daily history for a single KPI

use std::f64::consts::PI;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::core::random::RandomSource;
use crate::core::types::{KpiKind, TimeRange, MS_PER_DAY};
use crate::generators::GeneratorContext;

const UNKNOWN_KPI_BASE: f64 = 1_000_000.0;
const MARGIN_BASE: f64 = 15.0;
const MARGIN_RANGE: (f64, f64) = (-5.0, 50.0);
/// Negative non-margin values are scaled by this toward zero
const NEGATIVE_DAMPING: f64 = 0.1;
const RANDOM_WALK: f64 = 0.02;
const ANNUAL_CYCLE: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiHistoricalData {
    pub date: String,
    pub value: f64,
}

fn base_value(kind: Option<KpiKind>, base_revenue: f64) -> f64 {
    match kind {
        Some(KpiKind::MonthlyRevenue) => base_revenue,
        Some(KpiKind::OperatingExpenses) => base_revenue * 0.75,
        Some(KpiKind::NetProfitMargin) => MARGIN_BASE,
        Some(KpiKind::CashFlow) => base_revenue * 0.2,
        None => UNKNOWN_KPI_BASE,
    }
}

/// UTC label for a point, coarser for longer ranges
pub fn date_label(timestamp_ms: i64, range: TimeRange) -> String {
    let Some(date) = DateTime::from_timestamp_millis(timestamp_ms) else {
        return String::new();
    };
    let pattern = match range {
        TimeRange::Year => "%b %y",
        TimeRange::Quarter => "%b %-d",
        TimeRange::Week | TimeRange::Month => "%-m/%-d",
    };
    date.format(pattern).to_string()
}

/// `range.days() + 1` points ending today, oldest first
///
/// `kind` is `None` for titles that are not one of the four KPIs; those get a
/// flat million-dollar baseline.
pub fn generate(
    kind: Option<KpiKind>,
    range: TimeRange,
    ctx: &GeneratorContext<'_>,
    rng: &mut dyn RandomSource,
) -> Vec<KpiHistoricalData> {
    let c = ctx.config;
    let days = range.days();
    let base = base_value(kind, c.base_revenue);

    (0..=days)
        .rev()
        .map(|i| {
            let timestamp = ctx.now - i64::from(i) * MS_PER_DAY;
            let day = timestamp as f64 / MS_PER_DAY as f64;

            let progress = f64::from(days - i) / f64::from(days);
            let trend = progress * (c.growth_rate / 100.0);
            let volatility = rng.centered() * (c.market_volatility / 100.0);
            let seasonal = (day * PI / 30.0).sin() * (c.seasonality / 100.0);
            let cycle = (day * PI / 365.0).sin() * ANNUAL_CYCLE;
            let walk = rng.centered() * RANDOM_WALK;

            let value = base * (1.0 + trend + volatility + seasonal + cycle + walk);
            let value = match kind {
                Some(KpiKind::NetProfitMargin) => value.clamp(MARGIN_RANGE.0, MARGIN_RANGE.1),
                _ => value.max(value * NEGATIVE_DAMPING),
            };

            KpiHistoricalData { date: date_label(timestamp, range), value }
        })
        .collect()
}
