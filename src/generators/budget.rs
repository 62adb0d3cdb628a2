//! Departmental budget tracker

use serde::{Deserialize, Serialize};

use crate::core::random::RandomSource;
use crate::generators::format::round1;
use crate::generators::GeneratorContext;
use crate::model::business::BusinessMetrics;

const GROWTH_NEUTRAL: f64 = 5.0;
const EFFICIENCY_BASELINE: f64 = 0.8;
const SHOCK_CHANCE: f64 = 0.1;
const SHOCK_SPAN: f64 = 0.3;
const EFFICIENCY_NOISE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetCategory {
    Marketing,
    Operations,
    #[serde(rename = "R&D")]
    ResearchAndDevelopment,
    Sales,
    Admin,
}

impl BudgetCategory {
    pub const ALL: [BudgetCategory; 5] = [
        BudgetCategory::Marketing,
        BudgetCategory::Operations,
        BudgetCategory::ResearchAndDevelopment,
        BudgetCategory::Sales,
        BudgetCategory::Admin,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BudgetCategory::Marketing => "Marketing",
            BudgetCategory::Operations => "Operations",
            BudgetCategory::ResearchAndDevelopment => "R&D",
            BudgetCategory::Sales => "Sales",
            BudgetCategory::Admin => "Admin",
        }
    }

    /// Baseline (spent, budget) in dollars
    pub fn baseline(self) -> (f64, f64) {
        match self {
            BudgetCategory::Marketing => (180_000.0, 200_000.0),
            BudgetCategory::Operations => (450_000.0, 420_000.0),
            BudgetCategory::ResearchAndDevelopment => (320_000.0, 350_000.0),
            BudgetCategory::Sales => (280_000.0, 300_000.0),
            BudgetCategory::Admin => (120_000.0, 125_000.0),
        }
    }

    /// How strongly the budget expands with growth above 5%
    pub fn growth_sensitivity(self) -> f64 {
        match self {
            BudgetCategory::Marketing => 0.3,
            BudgetCategory::Operations => 0.2,
            BudgetCategory::ResearchAndDevelopment => 0.4,
            BudgetCategory::Sales => 0.25,
            BudgetCategory::Admin => 0.1,
        }
    }

    /// Efficiency in [0, 1] from the business metric that drives this category
    pub fn efficiency_factor(self, metrics: &BusinessMetrics) -> f64 {
        let pct = match self {
            BudgetCategory::Marketing => metrics.brand_strength,
            BudgetCategory::Operations => metrics.operational_efficiency,
            BudgetCategory::ResearchAndDevelopment => metrics.innovation_index,
            BudgetCategory::Sales => metrics.customer_satisfaction,
            BudgetCategory::Admin => metrics.employee_productivity,
        };
        pct / 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetData {
    pub category: BudgetCategory,
    pub spent: f64,
    pub budget: f64,
    /// (spent - budget) / budget in percent, one decimal
    pub variance: f64,
    /// Percent, one decimal, within [0, 100]
    pub efficiency: f64,
}

impl BudgetData {
    pub fn over_budget(&self) -> bool {
        self.variance > 0.0
    }
}

pub fn generate(ctx: &GeneratorContext<'_>, rng: &mut dyn RandomSource) -> Vec<BudgetData> {
    let c = ctx.config;
    let event_adjustment = ctx.event_impact() * 0.1;
    let inflation_adjustment = (c.inflation_rate - 3.0) / 100.0;

    BudgetCategory::ALL
        .iter()
        .map(|&category| {
            let (base_spent, base_budget) = category.baseline();
            let efficiency_factor = category.efficiency_factor(ctx.metrics);

            let growth_adjustment = if c.growth_rate > GROWTH_NEUTRAL {
                category.growth_sensitivity() * (c.growth_rate - GROWTH_NEUTRAL) / 100.0
            } else {
                0.0
            };
            let efficiency_adjustment = (efficiency_factor - EFFICIENCY_BASELINE) * 0.1;

            // Occasional unexpected spend
            let shock = if rng.chance(SHOCK_CHANCE) {
                rng.centered() * SHOCK_SPAN
            } else {
                0.0
            };

            let budget = base_budget * (1.0 + growth_adjustment + inflation_adjustment);
            let spent = base_spent * (1.0 + efficiency_adjustment + event_adjustment + shock);
            let variance = (spent - budget) / budget * 100.0;
            let efficiency =
                (efficiency_factor * 100.0 + rng.centered() * EFFICIENCY_NOISE).clamp(0.0, 100.0);

            BudgetData {
                category,
                spent,
                budget,
                variance: round1(variance),
                efficiency: round1(efficiency),
            }
        })
        .collect()
}
