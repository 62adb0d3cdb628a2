//! Risk assessment
//!
//! Five category scores from linear formulas over the levers, business
//! metrics and active market events. Level cutpoints are fixed at
//! 75 (High) and 45 (Medium).
//!
//! Trends compare against caller-supplied previous scores. Without a
//! previous score for a category its trend is `Stable`.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::generators::GeneratorContext;
use crate::model::market::MarketEventKind;

pub const HIGH_RISK_CUTOFF: f64 = 75.0;
pub const MEDIUM_RISK_CUTOFF: f64 = 45.0;
/// Score movement needed before a trend is reported
pub const TREND_BAND: f64 = 5.0;

/// Raw (unrounded) scores from an earlier assessment
pub type PreviousScores = AHashMap<RiskCategory, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "Market Risk")]
    Market,
    #[serde(rename = "Operational Risk")]
    Operational,
    #[serde(rename = "Liquidity Risk")]
    Liquidity,
    #[serde(rename = "Compliance Risk")]
    Compliance,
    #[serde(rename = "Technology Risk")]
    Technology,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 5] = [
        RiskCategory::Market,
        RiskCategory::Operational,
        RiskCategory::Liquidity,
        RiskCategory::Compliance,
        RiskCategory::Technology,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RiskCategory::Market => "Market Risk",
            RiskCategory::Operational => "Operational Risk",
            RiskCategory::Liquidity => "Liquidity Risk",
            RiskCategory::Compliance => "Compliance Risk",
            RiskCategory::Technology => "Technology Risk",
        }
    }

    /// Score interval the formula is clamped into
    pub fn bounds(self) -> (f64, f64) {
        match self {
            RiskCategory::Market => (0.0, 95.0),
            RiskCategory::Operational => (0.0, 95.0),
            RiskCategory::Liquidity => (5.0, 95.0),
            RiskCategory::Compliance => (0.0, 90.0),
            RiskCategory::Technology => (10.0, 95.0),
        }
    }

    pub fn mitigation_actions(self) -> [&'static str; 3] {
        match self {
            RiskCategory::Market => [
                "Diversify revenue streams",
                "Hedge currency exposure",
                "Build market intelligence capabilities",
            ],
            RiskCategory::Operational => [
                "Strengthen supplier relationships",
                "Improve operational efficiency",
                "Develop competitive differentiation",
            ],
            RiskCategory::Liquidity => [
                "Establish credit facilities",
                "Improve cash conversion cycle",
                "Reduce customer churn",
            ],
            RiskCategory::Compliance => [
                "Enhance compliance monitoring",
                "Invest in regulatory technology",
                "Build government relations",
            ],
            RiskCategory::Technology => [
                "Accelerate digital transformation",
                "Invest in cybersecurity",
                "Develop tech talent",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_RISK_CUTOFF {
            RiskLevel::High
        } else if score >= MEDIUM_RISK_CUTOFF {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTrend {
    Increasing,
    Stable,
    Decreasing,
}

impl RiskTrend {
    pub fn between(score: f64, previous: Option<f64>) -> Self {
        match previous {
            Some(prev) if score > prev + TREND_BAND => RiskTrend::Increasing,
            Some(prev) if score < prev - TREND_BAND => RiskTrend::Decreasing,
            _ => RiskTrend::Stable,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskTrend::Increasing => "increasing",
            RiskTrend::Stable => "stable",
            RiskTrend::Decreasing => "decreasing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskData {
    pub category: RiskCategory,
    pub level: RiskLevel,
    /// Rounded score
    pub score: u32,
    pub description: String,
    pub mitigation_actions: Vec<String>,
    pub trend: RiskTrend,
    /// Unrounded score, for feeding back as a previous score
    #[serde(skip)]
    pub raw_score: f64,
}

/// Unrounded score per category, in `RiskCategory::ALL` order
pub fn scores(ctx: &GeneratorContext<'_>) -> [(RiskCategory, f64); 5] {
    let c = ctx.config;
    let m = ctx.metrics;
    let active = ctx.events.active().len() as f64;
    let regulatory = ctx.events.count_of(MarketEventKind::RegulatoryChange) as f64;
    let tech_shifts = ctx.events.count_of(MarketEventKind::TechnologyShift) as f64;

    let market = 30.0 + c.market_volatility * 2.0
        + if c.economic_sentiment < 50.0 { 20.0 } else { 0.0 }
        + active * 10.0;
    let operational = 20.0 + c.competition_impact * 2.5 + c.supply_chain_disruption * 2.0
        + if m.operational_efficiency < 70.0 { 25.0 } else { 0.0 };
    let liquidity = 60.0 - c.growth_rate * 3.0 + c.customer_churn_rate * 2.0
        + if m.financial_health < 60.0 { 20.0 } else { 0.0 };
    let compliance = 15.0 + (c.inflation_rate - 3.0) * 5.0 + regulatory * 20.0;
    let technology = 50.0 - c.technology_adoption * 0.4 + tech_shifts * 15.0;

    let clamp = |category: RiskCategory, score: f64| {
        let (lo, hi) = category.bounds();
        if score.is_nan() {
            lo
        } else {
            score.clamp(lo, hi)
        }
    };

    [
        (RiskCategory::Market, clamp(RiskCategory::Market, market)),
        (RiskCategory::Operational, clamp(RiskCategory::Operational, operational)),
        (RiskCategory::Liquidity, clamp(RiskCategory::Liquidity, liquidity)),
        (RiskCategory::Compliance, clamp(RiskCategory::Compliance, compliance)),
        (RiskCategory::Technology, clamp(RiskCategory::Technology, technology)),
    ]
}

fn describe(category: RiskCategory, ctx: &GeneratorContext<'_>) -> String {
    let c = ctx.config;
    match category {
        RiskCategory::Market => format!(
            "Market volatility ({}%) and economic sentiment ({:.0}%) create uncertainty",
            c.market_volatility, c.economic_sentiment
        ),
        RiskCategory::Operational => format!(
            "Competition ({}%) and supply chain disruption ({}%) affect operations",
            c.competition_impact, c.supply_chain_disruption
        ),
        RiskCategory::Liquidity => format!(
            "Growth rate ({}%) and customer churn ({:.1}%) impact cash flow",
            c.growth_rate, c.customer_churn_rate
        ),
        RiskCategory::Compliance => format!(
            "Regulatory environment and inflation ({:.1}%) create compliance challenges",
            c.inflation_rate
        ),
        RiskCategory::Technology => format!(
            "Technology adoption ({:.0}%) and digital transformation risks",
            c.technology_adoption
        ),
    }
}

pub fn generate(ctx: &GeneratorContext<'_>, previous: Option<&PreviousScores>) -> Vec<RiskData> {
    scores(ctx)
        .into_iter()
        .map(|(category, score)| {
            let prev = previous.and_then(|p| p.get(&category).copied());
            RiskData {
                category,
                level: RiskLevel::from_score(score),
                score: score.round() as u32,
                description: describe(category, ctx),
                mitigation_actions: category.mitigation_actions().iter().map(|s| s.to_string()).collect(),
                trend: RiskTrend::between(score, prev),
                raw_score: score,
            }
        })
        .collect()
}

/// Previous-score map built from an earlier assessment
pub fn previous_scores(risks: &[RiskData]) -> PreviousScores {
    risks.iter().map(|r| (r.category, r.raw_score)).collect()
}
