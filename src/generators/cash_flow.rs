//! Six-month cash-flow projection

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::core::random::RandomSource;
use crate::generators::GeneratorContext;

pub const MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

/// Net values below this (in thousands) are floored
pub const NET_FLOOR_THOUSANDS: f64 = -50.0;

const INVESTMENT_INFLOW_CHANCE: f64 = 0.2;
const INVESTMENT_INFLOW_RATIO: f64 = 0.1;
const OPERATIONAL_OUTFLOW_RATIO: f64 = 0.75;
const GROWTH_INVESTMENT_THRESHOLD: f64 = 8.0;
const GROWTH_INVESTMENT_RATIO: f64 = 0.05;
const DEBT_SERVICE_RATIO: f64 = 0.03;

/// One month of cash movement, all amounts in thousands of dollars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowData {
    pub month: String,
    /// Net cash flow, floored at -50
    pub value: f64,
    pub inflows: f64,
    pub outflows: f64,
}

pub fn generate(ctx: &GeneratorContext<'_>, rng: &mut dyn RandomSource) -> Vec<CashFlowData> {
    let c = ctx.config;
    let monthly_base = c.base_revenue / 12.0;
    let event_impact = ctx.event_impact();

    MONTHS
        .iter()
        .enumerate()
        .map(|(index, month)| {
            let step = (index + 1) as f64;
            let seasonal = 1.0 + (step * PI / 6.0).sin() * (c.seasonality / 100.0);
            let volatility = rng.centered() * (c.market_volatility / 100.0);
            let growth_ramp = step * (c.growth_rate / 100.0) / 12.0;

            let base_inflows = monthly_base * seasonal * (1.0 + growth_ramp + event_impact);
            let operational_inflows = base_inflows * (1.0 + volatility);
            let investment_inflows = if rng.chance(INVESTMENT_INFLOW_CHANCE) {
                monthly_base * INVESTMENT_INFLOW_RATIO
            } else {
                0.0
            };
            let inflows = operational_inflows + investment_inflows;

            let operational_outflows =
                monthly_base * OPERATIONAL_OUTFLOW_RATIO * (1.0 + (c.inflation_rate - 3.0) / 100.0);
            let investment_outflows = if c.growth_rate > GROWTH_INVESTMENT_THRESHOLD {
                monthly_base * GROWTH_INVESTMENT_RATIO
            } else {
                0.0
            };
            let debt_service = monthly_base * DEBT_SERVICE_RATIO;
            let outflows = operational_outflows + investment_outflows + debt_service;

            CashFlowData {
                month: (*month).to_string(),
                value: ((inflows - outflows) / 1_000.0).max(NET_FLOOR_THOUSANDS),
                inflows: inflows / 1_000.0,
                outflows: outflows / 1_000.0,
            }
        })
        .collect()
}
