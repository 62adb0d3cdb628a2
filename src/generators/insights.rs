//! Dashboard-level AI insights

use serde::{Deserialize, Serialize};

use crate::alerts::thresholds::MARKET_EVENT_ALERT_SEVERITY;
use crate::core::config::SimulationConfig;
use crate::core::types::Priority;
use crate::generators::GeneratorContext;

pub const MAX_INSIGHTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Opportunity,
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightData {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub action: String,
    pub priority: Priority,
    /// Percent
    pub confidence: u8,
}

impl InsightData {
    fn new(
        kind: InsightKind,
        title: &str,
        description: String,
        action: &str,
        priority: Priority,
        confidence: u8,
    ) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description,
            action: action.to_string(),
            priority,
            confidence,
        }
    }
}

/// Up to four insights, in rule order
///
/// Growth and churn rules read `ctx.config`, which carries any per-call
/// override. Inflation and technology rules read the `committed` config.
pub fn generate(ctx: &GeneratorContext<'_>, committed: &SimulationConfig) -> Vec<InsightData> {
    let c = ctx.config;
    let m = ctx.metrics;
    let mut insights = Vec::new();

    if c.growth_rate > 8.0 && m.customer_satisfaction > 80.0 && m.operational_efficiency > 85.0 {
        insights.push(InsightData::new(
            InsightKind::Opportunity,
            "Optimal Growth Conditions",
            format!(
                "Strong {}% growth with high customer satisfaction ({:.0}%) and operational efficiency ({:.0}%)",
                c.growth_rate, m.customer_satisfaction, m.operational_efficiency
            ),
            "Scale operations aggressively",
            Priority::High,
            92,
        ));
    }

    if c.customer_churn_rate > 8.0 && m.customer_satisfaction < 70.0 {
        insights.push(InsightData::new(
            InsightKind::Warning,
            "Customer Retention Crisis",
            format!(
                "High churn rate ({:.1}%) combined with low satisfaction ({:.0}%) threatens revenue stability",
                c.customer_churn_rate, m.customer_satisfaction
            ),
            "Implement customer success program",
            Priority::High,
            88,
        ));
    }

    if committed.inflation_rate > 5.0 && m.operational_efficiency < 80.0 {
        insights.push(InsightData::new(
            InsightKind::Warning,
            "Inflation & Efficiency Risk",
            format!(
                "High inflation ({:.1}%) with low operational efficiency ({:.0}%) creates margin pressure",
                committed.inflation_rate, m.operational_efficiency
            ),
            "Focus on operational optimization",
            Priority::Medium,
            85,
        ));
    }

    let disruptions = ctx.events.above(MARKET_EVENT_ALERT_SEVERITY).count();
    if disruptions > 0 {
        insights.push(InsightData::new(
            InsightKind::Warning,
            "Active Market Disruptions",
            format!(
                "{} significant market event(s) currently impacting business operations",
                disruptions
            ),
            "Activate contingency plans",
            Priority::High,
            95,
        ));
    }

    if committed.technology_adoption > 85.0 && m.innovation_index > 75.0 {
        insights.push(InsightData::new(
            InsightKind::Opportunity,
            "Technology Leadership Position",
            format!(
                "High technology adoption ({:.0}%) and innovation index ({:.0}%) create competitive advantage",
                committed.technology_adoption, m.innovation_index
            ),
            "Leverage tech advantage for market expansion",
            Priority::Medium,
            78,
        ));
    }

    insights.truncate(MAX_INSIGHTS);
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::model::business::BusinessMetrics;
    use crate::model::market::{MarketEvent, MarketEventKind, MarketEvents};

    fn run(config: &SimulationConfig, metrics: &BusinessMetrics, events: &MarketEvents) -> Vec<InsightData> {
        generate(&GeneratorContext { config, metrics, events, now: 0 }, config)
    }

    #[test]
    fn test_quiet_defaults_produce_nothing() {
        let config = SimulationConfig::default();
        let metrics = BusinessMetrics::default();
        assert!(run(&config, &metrics, &MarketEvents::new()).is_empty());
    }

    #[test]
    fn test_optimal_growth_conditions() {
        let config = SimulationConfig { growth_rate: 10.0, ..SimulationConfig::default() };
        let metrics = BusinessMetrics {
            customer_satisfaction: 85.0,
            operational_efficiency: 90.0,
            ..BusinessMetrics::default()
        };
        let insights = run(&config, &metrics, &MarketEvents::new());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Optimal Growth Conditions");
        assert_eq!(insights[0].confidence, 92);
        assert_eq!(insights[0].kind, InsightKind::Opportunity);
    }

    #[test]
    fn test_only_significant_events_count() {
        let config = SimulationConfig::default();
        let metrics = BusinessMetrics::default();
        let mut events = MarketEvents::new();
        events.push(MarketEvent::new(MarketEventKind::CompetitorAction, 0.15, 10, 0));
        assert!(run(&config, &metrics, &events).is_empty());

        events.push(MarketEvent::new(MarketEventKind::CompetitorAction, 0.35, 10, 0));
        let insights = run(&config, &metrics, &events);
        assert_eq!(insights[0].title, "Active Market Disruptions");
        assert!(insights[0].description.starts_with("1 significant"));
    }

    #[test]
    fn test_four_rules_fire_in_order() {
        let config = SimulationConfig {
            customer_churn_rate: 9.0,
            inflation_rate: 6.0,
            technology_adoption: 90.0,
            ..SimulationConfig::default()
        };
        let metrics = BusinessMetrics {
            customer_satisfaction: 60.0,
            operational_efficiency: 70.0,
            innovation_index: 80.0,
            ..BusinessMetrics::default()
        };
        let mut events = MarketEvents::new();
        events.push(MarketEvent::new(MarketEventKind::EconomicDownturn, 0.4, 10, 0));
        let insights = run(&config, &metrics, &events);

        let titles: Vec<_> = insights.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "Customer Retention Crisis",
                "Inflation & Efficiency Risk",
                "Active Market Disruptions",
                "Technology Leadership Position",
            ]
        );
        assert!(insights.len() <= MAX_INSIGHTS);
    }

    #[test]
    fn test_inflation_and_technology_ignore_overrides() {
        let committed = SimulationConfig::default();
        let overridden = SimulationConfig { inflation_rate: 9.0, technology_adoption: 95.0, ..committed };
        let metrics = BusinessMetrics {
            operational_efficiency: 70.0,
            innovation_index: 80.0,
            ..BusinessMetrics::default()
        };
        let events = MarketEvents::new();
        let ctx = GeneratorContext { config: &overridden, metrics: &metrics, events: &events, now: 0 };
        assert!(generate(&ctx, &committed).is_empty());

        let ctx = GeneratorContext { config: &committed, metrics: &metrics, events: &events, now: 0 };
        assert_eq!(generate(&ctx, &overridden).len(), 2);
    }
}
