//! Threshold rules turning generator output into alert drafts
//!
//! Each rule reports at most one severity per metric: a critical breach
//! replaces the warning for the same measurement. Rules never touch the
//! alert list; the engine feeds their drafts to the [`AlertManager`].
//!
//! [`AlertManager`]: crate::alerts::manager::AlertManager

use crate::alerts::alert::{AlertDraft, AlertSource};
use crate::alerts::thresholds::*;
use crate::core::config::SimulationConfig;
use crate::core::types::{KpiKind, Priority};
use crate::generators::{BudgetData, KpiData, RiskData};
use crate::model::business::BusinessMetrics;
use crate::model::market::MarketEvent;

fn profit_margin_alert(margin: f64, metrics: &BusinessMetrics) -> Option<AlertDraft> {
    if margin < PROFIT_MARGIN_CRITICAL {
        Some(
            AlertDraft::critical(
                AlertSource::Kpi,
                "Critical Profit Margin Alert",
                format!(
                    "Profit margin at {:.1}% is critically low. Customer satisfaction: {:.0}%, Operational efficiency: {:.0}%",
                    margin, metrics.customer_satisfaction, metrics.operational_efficiency
                ),
            )
            .threshold(PROFIT_MARGIN_CRITICAL)
            .current_value(margin),
        )
    } else if margin < PROFIT_MARGIN_WARNING {
        Some(
            AlertDraft::warning(
                AlertSource::Kpi,
                "Low Profit Margin Warning",
                format!("Profit margin at {:.1}% is below the {}% target", margin, PROFIT_MARGIN_WARNING),
            )
            .threshold(PROFIT_MARGIN_WARNING)
            .current_value(margin),
        )
    } else {
        None
    }
}

fn revenue_alert(change: f64, metrics: &BusinessMetrics) -> Option<AlertDraft> {
    if change < REVENUE_DECLINE_CRITICAL && metrics.customer_satisfaction < REVENUE_CRISIS_SATISFACTION {
        Some(
            AlertDraft::critical(
                AlertSource::Kpi,
                "Revenue & Customer Crisis",
                format!(
                    "Revenue declined {:.1}% while customer satisfaction dropped to {:.0}%",
                    change.abs(),
                    metrics.customer_satisfaction
                ),
            )
            .threshold(REVENUE_DECLINE_CRITICAL)
            .current_value(change),
        )
    } else if change < REVENUE_DECLINE_WARNING {
        Some(
            AlertDraft::warning(
                AlertSource::Kpi,
                "Revenue Decline Warning",
                format!("Revenue declined {:.1}% against the previous period", change.abs()),
            )
            .threshold(REVENUE_DECLINE_WARNING)
            .current_value(change),
        )
    } else {
        None
    }
}

fn cash_flow_alert(cash_flow: f64) -> Option<AlertDraft> {
    if cash_flow < CASH_FLOW_CRITICAL {
        Some(
            AlertDraft::critical(
                AlertSource::CashFlow,
                "Critical Cash Flow",
                format!("Cash flow of ${:.0}K is critically low", cash_flow / 1_000.0),
            )
            .threshold(CASH_FLOW_CRITICAL)
            .current_value(cash_flow),
        )
    } else if cash_flow < CASH_FLOW_WARNING {
        Some(
            AlertDraft::warning(
                AlertSource::CashFlow,
                "Low Cash Flow Warning",
                format!("Cash flow of ${:.0}K is approaching the critical level", cash_flow / 1_000.0),
            )
            .threshold(CASH_FLOW_WARNING)
            .current_value(cash_flow),
        )
    } else {
        None
    }
}

/// Rules on the lever settings and derived metrics behind a KPI pass
fn business_alerts(config: &SimulationConfig, metrics: &BusinessMetrics) -> Vec<AlertDraft> {
    let mut drafts = Vec::new();

    let churn = config.customer_churn_rate;
    if churn > CHURN_RATE_CRITICAL {
        drafts.push(
            AlertDraft::critical(
                AlertSource::Kpi,
                "Critical Customer Churn Rate",
                format!(
                    "Customer churn at {:.1}% is critically high. Customer satisfaction: {:.0}%",
                    churn, metrics.customer_satisfaction
                ),
            )
            .threshold(CHURN_RATE_CRITICAL)
            .current_value(churn),
        );
    } else if churn > CHURN_RATE_WARNING {
        drafts.push(
            AlertDraft::warning(
                AlertSource::Kpi,
                "Elevated Customer Churn",
                format!(
                    "Customer churn at {:.1}% is above target. Customer satisfaction: {:.0}%",
                    churn, metrics.customer_satisfaction
                ),
            )
            .threshold(CHURN_RATE_WARNING)
            .current_value(churn),
        );
    }

    let supply = config.supply_chain_disruption;
    if supply > SUPPLY_CHAIN_CRITICAL {
        drafts.push(
            AlertDraft::critical(
                AlertSource::System,
                "Critical Supply Chain Disruption",
                format!(
                    "Supply chain disruption at {:.1}% is severely affecting operational efficiency ({:.0}%)",
                    supply, metrics.operational_efficiency
                ),
            )
            .threshold(SUPPLY_CHAIN_CRITICAL)
            .current_value(supply),
        );
    } else if supply > SUPPLY_CHAIN_WARNING {
        drafts.push(
            AlertDraft::warning(
                AlertSource::System,
                "Supply Chain Disruption",
                format!(
                    "Supply chain disruption at {:.1}% affecting operational efficiency ({:.0}%)",
                    supply, metrics.operational_efficiency
                ),
            )
            .threshold(SUPPLY_CHAIN_WARNING)
            .current_value(supply),
        );
    }

    let inflation = config.inflation_rate;
    if inflation > INFLATION_CRITICAL {
        drafts.push(
            AlertDraft::critical(
                AlertSource::Market,
                "Critical Inflation Level",
                format!("Inflation at {:.1}% is eroding margins across all categories", inflation),
            )
            .threshold(INFLATION_CRITICAL)
            .current_value(inflation),
        );
    } else if inflation > INFLATION_WARNING {
        drafts.push(
            AlertDraft::warning(
                AlertSource::Market,
                "High Inflation Warning",
                format!("Inflation at {:.1}% is putting pressure on costs", inflation),
            )
            .threshold(INFLATION_WARNING)
            .current_value(inflation),
        );
    }

    let volatility = config.market_volatility;
    if volatility >= MARKET_VOLATILITY_CRITICAL {
        drafts.push(
            AlertDraft::critical(
                AlertSource::Market,
                "Extreme Market Volatility",
                format!("Market volatility at {:.0}% makes forecasts unreliable", volatility),
            )
            .threshold(MARKET_VOLATILITY_CRITICAL)
            .current_value(volatility),
        );
    } else if volatility >= MARKET_VOLATILITY_WARNING {
        drafts.push(
            AlertDraft::warning(
                AlertSource::Market,
                "High Market Volatility",
                format!("Market volatility at {:.0}% is widening forecast ranges", volatility),
            )
            .threshold(MARKET_VOLATILITY_WARNING)
            .current_value(volatility),
        );
    }

    if config.economic_sentiment < ECONOMIC_SENTIMENT_LOW && metrics.financial_health < FINANCIAL_HEALTH_LOW {
        drafts.push(
            AlertDraft::warning(
                AlertSource::System,
                "Economic Headwinds",
                format!(
                    "Low economic sentiment ({:.0}%) combined with declining financial health ({:.0}%)",
                    config.economic_sentiment, metrics.financial_health
                ),
            )
            .current_value(config.economic_sentiment),
        );
    }

    drafts
}

/// One evaluation pass over a KPI set
///
/// `config` and `metrics` are the committed settings and business metrics,
/// even when the KPIs themselves came from a per-call override.
pub fn kpi_alerts(kpis: &[KpiData], config: &SimulationConfig, metrics: &BusinessMetrics) -> Vec<AlertDraft> {
    let mut drafts: Vec<AlertDraft> = kpis
        .iter()
        .filter_map(|kpi| match kpi.kind()? {
            KpiKind::NetProfitMargin => profit_margin_alert(kpi.raw_value, metrics),
            KpiKind::MonthlyRevenue => revenue_alert(kpi.change_pct, metrics),
            KpiKind::CashFlow => cash_flow_alert(kpi.raw_value),
            KpiKind::OperatingExpenses => None,
        })
        .collect();
    drafts.extend(business_alerts(config, metrics));
    drafts
}

pub fn budget_alerts(budgets: &[BudgetData]) -> Vec<AlertDraft> {
    let mut drafts = Vec::new();
    for budget in budgets {
        let category = budget.category.name();
        let variance = budget.variance.abs();
        let direction = if budget.over_budget() { "over" } else { "under" };

        if variance > BUDGET_VARIANCE_CRITICAL {
            drafts.push(
                AlertDraft::critical(
                    AlertSource::Budget,
                    format!("Critical Budget Variance - {}", category),
                    format!(
                        "{} is {} budget by {:.1}%. Efficiency: {:.0}%",
                        category, direction, variance, budget.efficiency
                    ),
                )
                .threshold(BUDGET_VARIANCE_CRITICAL)
                .current_value(variance),
            );
        } else if variance > BUDGET_VARIANCE_WARNING {
            drafts.push(
                AlertDraft::warning(
                    AlertSource::Budget,
                    format!("Budget Variance Warning - {}", category),
                    format!(
                        "{} is {} budget by {:.1}%. Efficiency: {:.0}%",
                        category, direction, variance, budget.efficiency
                    ),
                )
                .threshold(BUDGET_VARIANCE_WARNING)
                .current_value(variance),
            );
        }

        if budget.efficiency < BUDGET_EFFICIENCY_WARNING {
            drafts.push(
                AlertDraft::warning(
                    AlertSource::Budget,
                    format!("Low Efficiency - {}", category),
                    format!("{} efficiency at {:.0}% is below optimal levels", category, budget.efficiency),
                )
                .current_value(budget.efficiency),
            );
        }
    }
    drafts
}

pub fn risk_alerts(risks: &[RiskData]) -> Vec<AlertDraft> {
    risks
        .iter()
        .filter(|risk| risk.score >= RISK_SCORE_CRITICAL)
        .map(|risk| {
            let label = risk.category.label();
            AlertDraft::critical(
                AlertSource::Risk,
                format!("Critical Risk Level - {}", label),
                format!(
                    "{} score is {}/100 and {}. Immediate mitigation required.",
                    label,
                    risk.score,
                    risk.trend.as_str()
                ),
            )
            .threshold(f64::from(RISK_SCORE_CRITICAL))
            .current_value(f64::from(risk.score))
        })
        .collect()
}

/// Alert for a freshly created market event, if it is significant
pub fn market_event_alert(event: &MarketEvent) -> Option<AlertDraft> {
    if event.severity <= MARKET_EVENT_ALERT_SEVERITY {
        return None;
    }
    let title = format!("Market Event: {}", event.kind.headline());
    let draft = if event.severity > MARKET_EVENT_CRITICAL_SEVERITY {
        AlertDraft::critical(AlertSource::Market, title, event.description.clone())
    } else {
        AlertDraft::warning(AlertSource::Market, title, event.description.clone())
            .priority(Priority::Medium)
    };
    Some(draft.current_value(event.severity * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::alert::AlertKind;
    use crate::generators::{BudgetCategory, RiskCategory, RiskLevel, RiskTrend};
    use crate::model::market::MarketEventKind;

    fn titles(drafts: &[AlertDraft]) -> Vec<&str> {
        drafts.iter().map(|d| d.title.as_str()).collect()
    }

    fn margin(raw: f64) -> Vec<AlertDraft> {
        let kpis = [KpiData::with_raw(KpiKind::NetProfitMargin, raw, 0.0)];
        kpi_alerts(&kpis, &SimulationConfig::default(), &BusinessMetrics::default())
    }

    #[test]
    fn test_defaults_raise_nothing() {
        let kpis = [
            KpiData::with_raw(KpiKind::MonthlyRevenue, 2_400_000.0, 1.0),
            KpiData::with_raw(KpiKind::OperatingExpenses, 1_800_000.0, 1.0),
            KpiData::with_raw(KpiKind::NetProfitMargin, 20.0, 1.0),
            KpiData::with_raw(KpiKind::CashFlow, 500_000.0, 1.0),
        ];
        assert!(kpi_alerts(&kpis, &SimulationConfig::default(), &BusinessMetrics::default()).is_empty());
    }

    #[test]
    fn test_profit_margin_boundary() {
        let below = margin(4.9);
        assert_eq!(titles(&below), ["Critical Profit Margin Alert"]);
        assert_eq!(below[0].kind, AlertKind::Critical);
        assert_eq!(below[0].threshold, Some(5.0));
        assert_eq!(below[0].current_value, Some(4.9));

        let at = margin(5.0);
        assert_eq!(titles(&at), ["Low Profit Margin Warning"]);
        assert_eq!(at[0].kind, AlertKind::Warning);

        assert!(margin(10.0).is_empty());
    }

    #[test]
    fn test_revenue_decline_levels() {
        let metrics = BusinessMetrics { customer_satisfaction: 65.0, ..BusinessMetrics::default() };
        let config = SimulationConfig::default();
        let severe = kpi_alerts(&[KpiData::with_raw(KpiKind::MonthlyRevenue, 1.0, -16.0)], &config, &metrics);
        assert_eq!(titles(&severe), ["Revenue & Customer Crisis"]);
        assert_eq!(severe[0].kind, AlertKind::Critical);
        assert_eq!(
            severe[0].message,
            "Revenue declined 16.0% while customer satisfaction dropped to 65%"
        );
        let mild = kpi_alerts(&[KpiData::with_raw(KpiKind::MonthlyRevenue, 1.0, -6.0)], &config, &metrics);
        assert_eq!(titles(&mild), ["Revenue Decline Warning"]);
    }

    #[test]
    fn test_revenue_crisis_needs_unhappy_customers() {
        let config = SimulationConfig::default();
        for satisfaction in [70.0, 85.0] {
            let metrics = BusinessMetrics { customer_satisfaction: satisfaction, ..BusinessMetrics::default() };
            let drafts = kpi_alerts(&[KpiData::with_raw(KpiKind::MonthlyRevenue, 1.0, -20.0)], &config, &metrics);
            assert!(drafts.iter().all(|d| d.kind != AlertKind::Critical));
            assert_eq!(titles(&drafts), ["Revenue Decline Warning"]);
        }
    }

    #[test]
    fn test_cash_flow_source() {
        let drafts = kpi_alerts(
            &[KpiData::with_raw(KpiKind::CashFlow, 20_000.0, 0.0)],
            &SimulationConfig::default(),
            &BusinessMetrics::default(),
        );
        assert_eq!(drafts[0].source, AlertSource::CashFlow);
        assert_eq!(drafts[0].kind, AlertKind::Critical);
    }

    #[test]
    fn test_critical_suppresses_warning_for_config_levers() {
        let config = SimulationConfig {
            customer_churn_rate: 13.0,
            supply_chain_disruption: 20.0,
            inflation_rate: 9.0,
            market_volatility: 30.0,
            ..SimulationConfig::default()
        };
        let drafts = kpi_alerts(&[], &config, &BusinessMetrics::default());
        assert_eq!(
            titles(&drafts),
            [
                "Critical Customer Churn Rate",
                "Supply Chain Disruption",
                "Critical Inflation Level",
                "Extreme Market Volatility",
            ]
        );
    }

    #[test]
    fn test_economic_headwinds_needs_both_conditions() {
        let config = SimulationConfig { economic_sentiment: 30.0, ..SimulationConfig::default() };
        let healthy = BusinessMetrics::default();
        assert!(kpi_alerts(&[], &config, &healthy).is_empty());

        let weak = BusinessMetrics { financial_health: 50.0, ..BusinessMetrics::default() };
        let drafts = kpi_alerts(&[], &config, &weak);
        assert_eq!(titles(&drafts), ["Economic Headwinds"]);
        assert_eq!(drafts[0].threshold, None);
        assert_eq!(drafts[0].current_value, Some(30.0));
    }

    #[test]
    fn test_budget_variance_and_efficiency() {
        let budgets = [
            BudgetData { category: BudgetCategory::Marketing, spent: 0.0, budget: 1.0, variance: -30.0, efficiency: 70.0 },
            BudgetData { category: BudgetCategory::Sales, spent: 0.0, budget: 1.0, variance: 16.0, efficiency: 55.0 },
            BudgetData { category: BudgetCategory::Admin, spent: 0.0, budget: 1.0, variance: 15.0, efficiency: 60.0 },
        ];
        let drafts = budget_alerts(&budgets);
        assert_eq!(
            titles(&drafts),
            ["Critical Budget Variance - Marketing", "Budget Variance Warning - Sales", "Low Efficiency - Sales"]
        );
        assert_eq!(drafts[0].message, "Marketing is under budget by 30.0%. Efficiency: 70%");
        assert_eq!(drafts[0].current_value, Some(30.0));
    }

    #[test]
    fn test_risk_alert_at_critical_only() {
        let risk = |score: u32| RiskData {
            category: RiskCategory::Market,
            level: RiskLevel::High,
            score,
            description: String::new(),
            mitigation_actions: Vec::new(),
            trend: RiskTrend::Increasing,
            raw_score: f64::from(score),
        };
        assert!(risk_alerts(&[risk(79)]).is_empty());
        let drafts = risk_alerts(&[risk(80)]);
        assert_eq!(titles(&drafts), ["Critical Risk Level - Market Risk"]);
        assert_eq!(
            drafts[0].message,
            "Market Risk score is 80/100 and increasing. Immediate mitigation required."
        );
    }

    #[test]
    fn test_market_event_alert_severity_bands() {
        let event = |severity| MarketEvent::new(MarketEventKind::SupplyDisruption, severity, 10, 0);
        assert!(market_event_alert(&event(0.2)).is_none());

        let warning = market_event_alert(&event(0.25)).unwrap();
        assert_eq!(warning.kind, AlertKind::Warning);
        assert_eq!(warning.title, "Market Event: SUPPLY DISRUPTION");
        assert_eq!(warning.current_value, Some(25.0));

        let critical = market_event_alert(&event(0.35)).unwrap();
        assert_eq!(critical.kind, AlertKind::Critical);
        assert_eq!(critical.priority, Priority::High);
    }
}
