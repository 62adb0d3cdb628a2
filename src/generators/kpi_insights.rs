//! Per-KPI insights shown in the detail view

use serde::{Deserialize, Serialize};

use crate::alerts::thresholds::MARKET_EVENT_ALERT_SEVERITY;
use crate::core::types::{KpiKind, Priority};
use crate::generators::GeneratorContext;
use crate::model::market::MarketEventKind;

pub const MAX_KPI_INSIGHTS: usize = 4;
const MIN_KPI_INSIGHTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiInsightKind {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiInsight {
    #[serde(rename = "type")]
    pub kind: KpiInsightKind,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    pub confidence: u8,
    pub impact: Priority,
}

impl KpiInsight {
    fn new(
        kind: KpiInsightKind,
        title: &str,
        description: impl Into<String>,
        recommendation: &str,
        confidence: u8,
        impact: Priority,
    ) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description: description.into(),
            recommendation: Some(recommendation.to_string()),
            confidence,
            impact,
        }
    }
}

fn revenue_insights(ctx: &GeneratorContext<'_>, out: &mut Vec<KpiInsight>) {
    let c = ctx.config;
    let m = ctx.metrics;

    if c.growth_rate > 8.0 && m.customer_satisfaction > 80.0 {
        out.push(KpiInsight::new(
            KpiInsightKind::Positive,
            "Sustainable Growth Pattern",
            format!(
                "Revenue growth of {}% is supported by high customer satisfaction ({:.0}%)",
                c.growth_rate, m.customer_satisfaction
            ),
            "Maintain current strategy while preparing for scale challenges",
            90,
            Priority::High,
        ));
    }
    if c.customer_churn_rate > 8.0 {
        out.push(KpiInsight::new(
            KpiInsightKind::Negative,
            "Revenue Sustainability Risk",
            format!(
                "High customer churn ({:.1}%) threatens revenue stability despite current growth",
                c.customer_churn_rate
            ),
            "Prioritize customer retention initiatives immediately",
            85,
            Priority::High,
        ));
    }
    if m.market_share > 15.0 {
        out.push(KpiInsight::new(
            KpiInsightKind::Positive,
            "Market Leadership Position",
            format!(
                "Market share of {:.1}% indicates strong competitive position",
                m.market_share
            ),
            "Leverage market position for premium pricing",
            82,
            Priority::Medium,
        ));
    }
}

fn expense_insights(ctx: &GeneratorContext<'_>, out: &mut Vec<KpiInsight>) {
    let c = ctx.config;
    let m = ctx.metrics;

    if m.operational_efficiency > 90.0 {
        out.push(KpiInsight::new(
            KpiInsightKind::Positive,
            "Operational Excellence",
            format!(
                "Operational efficiency at {:.0}% indicates world-class operations",
                m.operational_efficiency
            ),
            "Share best practices across all business units",
            88,
            Priority::Medium,
        ));
    }
    if c.inflation_rate > 5.0 && m.operational_efficiency < 80.0 {
        out.push(KpiInsight::new(
            KpiInsightKind::Negative,
            "Cost Pressure Vulnerability",
            format!(
                "High inflation ({:.1}%) with low efficiency ({:.0}%) creates margin risk",
                c.inflation_rate, m.operational_efficiency
            ),
            "Implement aggressive cost optimization program",
            92,
            Priority::High,
        ));
    }
}

fn margin_insights(ctx: &GeneratorContext<'_>, out: &mut Vec<KpiInsight>) {
    let m = ctx.metrics;

    if m.financial_health * 0.3 > 20.0 && m.brand_strength > 75.0 {
        out.push(KpiInsight::new(
            KpiInsightKind::Positive,
            "Premium Market Position",
            format!(
                "Strong margins supported by brand strength ({:.0}%) enable premium pricing",
                m.brand_strength
            ),
            "Invest in brand building and product differentiation",
            86,
            Priority::High,
        ));
    }

    let competitor_pressure = ctx
        .events
        .above(MARKET_EVENT_ALERT_SEVERITY)
        .any(|e| e.kind == MarketEventKind::CompetitorAction);
    if competitor_pressure {
        out.push(KpiInsight::new(
            KpiInsightKind::Negative,
            "Competitive Margin Pressure",
            "Aggressive competitor actions are putting pressure on profit margins",
            "Develop competitive response strategy immediately",
            89,
            Priority::High,
        ));
    }
}

fn cash_flow_insights(ctx: &GeneratorContext<'_>, out: &mut Vec<KpiInsight>) {
    let c = ctx.config;
    let m = ctx.metrics;

    if m.financial_health > 80.0 {
        out.push(KpiInsight::new(
            KpiInsightKind::Positive,
            "Strong Financial Foundation",
            format!(
                "Excellent financial health ({:.0}%) provides strategic flexibility",
                m.financial_health
            ),
            "Consider strategic acquisitions or major investments",
            84,
            Priority::Medium,
        ));
    }
    if c.growth_rate > 15.0 && m.financial_health < 70.0 {
        out.push(KpiInsight::new(
            KpiInsightKind::Negative,
            "Growth-Cash Flow Imbalance",
            format!("Rapid growth ({}%) may be straining cash resources", c.growth_rate),
            "Secure additional financing or moderate growth pace",
            87,
            Priority::High,
        ));
    }
}

/// Insights for the KPI named `kind`, padded to at least two and capped at four
///
/// Unknown titles (`None`) get only the generic padding insights.
pub fn generate(kind: Option<KpiKind>, ctx: &GeneratorContext<'_>) -> Vec<KpiInsight> {
    let mut insights = Vec::new();
    match kind {
        Some(KpiKind::MonthlyRevenue) => revenue_insights(ctx, &mut insights),
        Some(KpiKind::OperatingExpenses) => expense_insights(ctx, &mut insights),
        Some(KpiKind::NetProfitMargin) => margin_insights(ctx, &mut insights),
        Some(KpiKind::CashFlow) => cash_flow_insights(ctx, &mut insights),
        None => {}
    }

    if insights.len() < MIN_KPI_INSIGHTS {
        let active = ctx.events.active().len();
        if active > 0 {
            insights.push(KpiInsight::new(
                KpiInsightKind::Neutral,
                "Market Event Impact Analysis",
                format!("{} active market event(s) may be influencing this metric", active),
                "Monitor closely for event-driven changes",
                75,
                Priority::Medium,
            ));
        }
        insights.push(KpiInsight::new(
            KpiInsightKind::Neutral,
            "Advanced AI Monitoring",
            "Continuous analysis of complex interdependencies provides deeper insights",
            "Regular review recommended for optimal decision making",
            95,
            Priority::Low,
        ));
    }

    insights.truncate(MAX_KPI_INSIGHTS);
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::model::business::BusinessMetrics;
    use crate::model::market::{MarketEvent, MarketEvents};

    fn run(
        kind: Option<KpiKind>,
        config: &SimulationConfig,
        metrics: &BusinessMetrics,
        events: &MarketEvents,
    ) -> Vec<KpiInsight> {
        generate(kind, &GeneratorContext { config, metrics, events, now: 0 })
    }

    fn titles(insights: &[KpiInsight]) -> Vec<&str> {
        insights.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_padding_when_nothing_fires() {
        let config = SimulationConfig::default();
        let metrics = BusinessMetrics::default();
        let insights = run(Some(KpiKind::OperatingExpenses), &config, &metrics, &MarketEvents::new());
        assert_eq!(titles(&insights), ["Advanced AI Monitoring"]);
        assert_eq!(insights[0].impact, Priority::Low);
    }

    #[test]
    fn test_padding_mentions_active_events() {
        let config = SimulationConfig::default();
        let metrics = BusinessMetrics::default();
        let mut events = MarketEvents::new();
        events.push(MarketEvent::new(MarketEventKind::SupplyDisruption, 0.1, 10, 0));
        let insights = run(None, &config, &metrics, &events);
        assert_eq!(titles(&insights), ["Market Event Impact Analysis", "Advanced AI Monitoring"]);
        assert!(insights[0].description.starts_with("1 active"));
    }

    #[test]
    fn test_revenue_rules_in_order() {
        let config = SimulationConfig {
            growth_rate: 10.0,
            customer_churn_rate: 9.0,
            ..SimulationConfig::default()
        };
        let metrics = BusinessMetrics {
            customer_satisfaction: 85.0,
            market_share: 16.0,
            ..BusinessMetrics::default()
        };
        let insights = run(Some(KpiKind::MonthlyRevenue), &config, &metrics, &MarketEvents::new());
        assert_eq!(
            titles(&insights),
            ["Sustainable Growth Pattern", "Revenue Sustainability Risk", "Market Leadership Position"]
        );
    }

    #[test]
    fn test_competitor_pressure_needs_significant_event() {
        let config = SimulationConfig::default();
        let metrics = BusinessMetrics::default();
        let mut events = MarketEvents::new();
        events.push(MarketEvent::new(MarketEventKind::CompetitorAction, 0.25, 10, 0));
        let insights = run(Some(KpiKind::NetProfitMargin), &config, &metrics, &events);
        assert_eq!(insights[0].title, "Competitive Margin Pressure");
        assert_eq!(insights[0].kind, KpiInsightKind::Negative);
        // one rule fired, so padding still applies
        assert_eq!(insights.len(), 3);
    }

    #[test]
    fn test_cash_flow_rules() {
        let config = SimulationConfig { growth_rate: 20.0, ..SimulationConfig::default() };
        let healthy = BusinessMetrics { financial_health: 85.0, ..BusinessMetrics::default() };
        let insights = run(Some(KpiKind::CashFlow), &config, &healthy, &MarketEvents::new());
        assert_eq!(titles(&insights), ["Strong Financial Foundation", "Advanced AI Monitoring"]);

        let strained = BusinessMetrics { financial_health: 60.0, ..BusinessMetrics::default() };
        let insights = run(Some(KpiKind::CashFlow), &config, &strained, &MarketEvents::new());
        assert_eq!(titles(&insights), ["Growth-Cash Flow Imbalance", "Advanced AI Monitoring"]);
        assert_eq!(insights[0].description, "Rapid growth (20%) may be straining cash resources");
    }
}
