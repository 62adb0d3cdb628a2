//! Headline KPI generator
//!
//! Revenue and expenses are the baseline scaled by a log-dampened sum of
//! factors, so extreme lever settings bend the numbers without blowing them
//! up. Percentage changes are the raw (undampened) factor sums.

use serde::{Deserialize, Serialize};

use crate::core::random::RandomSource;
use crate::core::types::{KpiKind, Trend};
use crate::generators::format::{millions, percent, signed_percent, thousands};
use crate::generators::GeneratorContext;

const EXPENSE_RATIO: f64 = 0.75;
/// Period of the seasonal wave in milliseconds of wall-clock time
const SEASONAL_PERIOD_MS: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiData {
    pub title: String,
    pub value: String,
    pub change: String,
    pub trend: Trend,
    /// Unformatted value used for threshold comparisons
    pub raw_value: f64,
    /// Unformatted change in percent
    pub change_pct: f64,
}

impl KpiData {
    fn new(kind: KpiKind, value: String, raw_value: f64, change_pct: f64) -> Self {
        Self {
            title: kind.title().to_string(),
            value,
            change: signed_percent(change_pct),
            trend: Trend::from_change(change_pct),
            raw_value,
            change_pct,
        }
    }

    pub fn kind(&self) -> Option<KpiKind> {
        KpiKind::from_title(&self.title)
    }

    /// Record with explicit values, for replaying or testing alert rules
    pub fn with_raw(kind: KpiKind, raw_value: f64, change_pct: f64) -> Self {
        let value = match kind {
            KpiKind::MonthlyRevenue | KpiKind::OperatingExpenses => millions(raw_value),
            KpiKind::NetProfitMargin => percent(raw_value),
            KpiKind::CashFlow => thousands(raw_value),
        };
        Self::new(kind, value, raw_value, change_pct)
    }
}

/// `base * (1 + sign(sum) * ln(1 + |10 * sum|) / 10)`
pub fn dampen(base: f64, factors: &[f64]) -> f64 {
    let combined: f64 = factors.iter().sum();
    let dampened = combined.signum() * (1.0 + (combined * 10.0).abs()).ln() / 10.0;
    let dampened = if combined == 0.0 { 0.0 } else { dampened };
    base * (1.0 + dampened)
}

/// Unformatted KPI figures from one generation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiSnapshot {
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub profit_margin: f64,
    pub cash_flow: f64,
    pub revenue_change: f64,
    pub expense_change: f64,
    pub profit_change: f64,
    pub cash_flow_change: f64,
}

impl KpiSnapshot {
    pub fn compute(ctx: &GeneratorContext<'_>, rng: &mut dyn RandomSource) -> Self {
        let c = ctx.config;
        let m = ctx.metrics;

        let revenue_factors = [
            c.growth_rate / 100.0,
            rng.centered() * (c.market_volatility / 100.0),
            (ctx.now as f64 / SEASONAL_PERIOD_MS).sin() * (c.seasonality / 100.0),
            -(c.competition_impact / 100.0) * rng.unit(),
            -(c.inflation_rate - 3.0) / 100.0 * 0.5,
            -(c.customer_churn_rate / 100.0) * 0.8,
            ctx.event_impact(),
            (m.customer_satisfaction - 75.0) / 100.0 * 0.3,
            (m.brand_strength - 70.0) / 100.0 * 0.2,
        ];
        let revenue = dampen(c.base_revenue, &revenue_factors);

        let expense_factors = [
            (m.operational_efficiency - 85.0) / 100.0 * 0.1,
            (c.inflation_rate - 3.0) / 100.0 * 0.8,
            c.supply_chain_disruption / 100.0 * 0.3,
            -(c.technology_adoption - 75.0) / 100.0 * 0.05,
            -(m.employee_productivity - 80.0) / 100.0 * 0.1,
        ];
        let expenses = dampen(c.base_revenue * EXPENSE_RATIO, &expense_factors);

        let profit = revenue - expenses;
        let profit_margin = if revenue != 0.0 { profit / revenue * 100.0 } else { 0.0 };

        // Working capital swing and the investment drag growth requires
        let working_capital = rng.centered() * 0.2;
        let investment = -(c.growth_rate / 100.0) * 0.1;
        let cash_flow = profit * (1.0 + working_capital + investment);

        let revenue_change = revenue_factors.iter().sum::<f64>() * 100.0;
        let expense_change = expense_factors.iter().sum::<f64>() * 100.0;
        let profit_change = revenue_change - expense_change;
        let cash_flow_change = profit_change + (working_capital + investment) * 100.0;

        Self {
            revenue,
            expenses,
            profit,
            profit_margin,
            cash_flow,
            revenue_change,
            expense_change,
            profit_change,
            cash_flow_change,
        }
    }

    pub fn records(&self) -> Vec<KpiData> {
        vec![
            KpiData::new(KpiKind::MonthlyRevenue, millions(self.revenue), self.revenue, self.revenue_change),
            KpiData::new(KpiKind::OperatingExpenses, millions(self.expenses), self.expenses, self.expense_change),
            KpiData::new(
                KpiKind::NetProfitMargin,
                percent(self.profit_margin),
                self.profit_margin,
                self.profit_change,
            ),
            KpiData::new(KpiKind::CashFlow, thousands(self.cash_flow), self.cash_flow, self.cash_flow_change),
        ]
    }
}

/// Four KPI records: revenue, expenses, profit margin, cash flow
pub fn generate(ctx: &GeneratorContext<'_>, rng: &mut dyn RandomSource) -> Vec<KpiData> {
    KpiSnapshot::compute(ctx, rng).records()
}
