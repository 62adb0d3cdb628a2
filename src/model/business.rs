//! Business metrics - derived non-financial health indicators
//!
//! Recomputed in full from the simulation config on every config change and
//! at the start of every KPI fetch. Fields are updated in a fixed order and
//! later formulas read siblings already updated in the same pass. Market
//! share reads the innovation index *before* it is refreshed, so the model
//! is a function of (config, previous metrics).
//!
//! No randomness: the same inputs always produce the same metrics.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;

// Baselines the formulas measure deltas from
const SATISFACTION_BASELINE: f64 = 75.0;
const PRODUCTIVITY_BASELINE: f64 = 80.0;
const MARKET_SHARE_BASELINE: f64 = 12.5;
const EFFICIENCY_BASELINE: f64 = 85.0;
const INNOVATION_BASELINE: f64 = 68.0;

const GROWTH_NEUTRAL: f64 = 5.0;
const SENTIMENT_NEUTRAL: f64 = 50.0;
const INFLATION_NEUTRAL: f64 = 3.0;
const TECH_BASELINE: f64 = 75.0;

pub const PERCENT_RANGE: (f64, f64) = (0.0, 100.0);
pub const MARKET_SHARE_RANGE: (f64, f64) = (5.0, 25.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessMetrics {
    pub customer_satisfaction: f64,
    pub employee_productivity: f64,
    /// Percent of the addressable market, within [5, 25]
    pub market_share: f64,
    pub brand_strength: f64,
    pub operational_efficiency: f64,
    pub innovation_index: f64,
    /// Composite score over efficiency, satisfaction, share and macro terms
    pub financial_health: f64,
}

impl Default for BusinessMetrics {
    fn default() -> Self {
        Self {
            customer_satisfaction: 78.0,
            employee_productivity: 82.0,
            market_share: 12.5,
            brand_strength: 71.0,
            operational_efficiency: 85.0,
            innovation_index: 68.0,
            financial_health: 75.0,
        }
    }
}

/// Clamp into `[lo, hi]`; NaN collapses to the lower bound
fn bounded(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if value.is_nan() {
        lo
    } else {
        value.clamp(lo, hi)
    }
}

impl BusinessMetrics {
    /// Recompute every field from `config` and the previous metrics
    pub fn recompute(&self, config: &SimulationConfig) -> Self {
        let c = config;
        let growth_delta = c.growth_rate - GROWTH_NEUTRAL;
        let inflation_delta = c.inflation_rate - INFLATION_NEUTRAL;
        let tech_delta = c.technology_adoption - TECH_BASELINE;

        let customer_satisfaction = bounded(
            SATISFACTION_BASELINE + growth_delta * 2.0 - c.customer_churn_rate * 3.0
                + (c.economic_sentiment - SENTIMENT_NEUTRAL) * 0.3
                - c.supply_chain_disruption * 2.0,
            PERCENT_RANGE,
        );

        let employee_productivity = bounded(
            PRODUCTIVITY_BASELINE + growth_delta * 1.5 + (c.technology_adoption - 50.0) * 0.4
                - c.inflation_rate * 2.0
                - c.competition_impact * 1.5,
            PERCENT_RANGE,
        );

        // Innovation from the previous pass
        let competitive_advantage = (customer_satisfaction + self.innovation_index) / 2.0 - 70.0;
        let market_share = bounded(
            MARKET_SHARE_BASELINE + competitive_advantage * 0.1 - c.competition_impact * 0.3,
            MARKET_SHARE_RANGE,
        );

        let brand_strength = bounded(
            customer_satisfaction * 0.4 + market_share * 2.0
                + if c.growth_rate > 0.0 { 20.0 } else { 10.0 }
                - c.competition_impact * 1.2,
            PERCENT_RANGE,
        );

        let operational_efficiency = bounded(
            EFFICIENCY_BASELINE + tech_delta * 0.3 - c.supply_chain_disruption * 2.0 - inflation_delta * 3.0
                + (employee_productivity - PRODUCTIVITY_BASELINE) * 0.2,
            PERCENT_RANGE,
        );

        let innovation_index = bounded(
            INNOVATION_BASELINE + tech_delta * 0.5 + growth_delta * 2.0 - c.competition_impact * 1.5
                + (employee_productivity - PRODUCTIVITY_BASELINE) * 0.3,
            PERCENT_RANGE,
        );

        let financial_health = bounded(
            operational_efficiency * 0.3 + customer_satisfaction * 0.2 + market_share * 2.0
                + if c.growth_rate > 0.0 { 25.0 } else { 15.0 }
                - inflation_delta * 5.0,
            PERCENT_RANGE,
        );

        Self {
            customer_satisfaction,
            employee_productivity,
            market_share,
            brand_strength,
            operational_efficiency,
            innovation_index,
            financial_health,
        }
    }

    /// Every field inside its documented clamp interval
    pub fn in_bounds(&self) -> bool {
        let pct = |v: f64| (PERCENT_RANGE.0..=PERCENT_RANGE.1).contains(&v);
        pct(self.customer_satisfaction)
            && pct(self.employee_productivity)
            && (MARKET_SHARE_RANGE.0..=MARKET_SHARE_RANGE.1).contains(&self.market_share)
            && pct(self.brand_strength)
            && pct(self.operational_efficiency)
            && pct(self.innovation_index)
            && pct(self.financial_health)
    }
}
