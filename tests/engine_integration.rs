//! Integration tests for the simulation engine
//!
//! These tests drive the synchronous engine surface end to end:
//! - Lever changes flowing into KPI trends
//! - Market event lifetime (inject -> decay -> prune)
//! - Threshold boundaries and duplicate suppression across passes
//! - Clearing and rebuilding the alert list

use std::sync::Arc;

use proptest::prelude::*;

use ai_cfo::alerts::AlertKind;
use ai_cfo::core::types::{KpiKind, Trend, MS_PER_DAY};
use ai_cfo::core::{ManualClock, SeededRng, SequenceRng};
use ai_cfo::generators::KpiData;
use ai_cfo::model::{MarketEvent, MarketEventKind};
use ai_cfo::{ConfigPatch, SimulationConfig, SimulationEngine};

const START: i64 = 1_760_875_200_000;

fn seeded_engine(seed: u64) -> (SimulationEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START));
    let engine = SimulationEngine::with_sources(
        SimulationConfig::default(),
        Box::new(SeededRng::from_seed(seed)),
        clock.clone(),
    );
    (engine, clock)
}

/// Every draw is 0.5, so no market event is ever generated
fn quiet_engine() -> (SimulationEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START));
    let engine = SimulationEngine::with_sources(
        SimulationConfig::default(),
        Box::new(SequenceRng::constant(0.5)),
        clock.clone(),
    );
    (engine, clock)
}

// ============================================================================
// Lever Scenarios
// ============================================================================

/// High growth with low churn should push revenue up in most samples
#[test]
fn test_growth_scenario_trends_revenue_up() {
    let patch = ConfigPatch::new().growth_rate(20.0).customer_churn_rate(2.0);

    let mut up = 0;
    for seed in 0..100 {
        let (mut engine, _) = seeded_engine(seed);
        engine.update_config(&patch);
        let kpis = engine.fetch_kpi_data(None);
        let revenue = kpis
            .iter()
            .find(|k| k.kind() == Some(KpiKind::MonthlyRevenue))
            .unwrap();
        if revenue.trend == Trend::Up {
            up += 1;
        }
    }

    assert!(up > 50, "revenue trended up in only {} of 100 samples", up);
}

#[test]
fn test_config_read_is_idempotent() {
    let (mut engine, _) = seeded_engine(7);
    engine.update_config(&ConfigPatch::new().market_volatility(18.0));
    assert_eq!(engine.config(), engine.config());
    assert_eq!(engine.config().market_volatility, 18.0);
}

/// Resetting to defaults undoes every lever change
#[test]
fn test_reset_restores_default_levers() {
    let (mut engine, _) = quiet_engine();
    engine.update_config(
        &ConfigPatch::new()
            .growth_rate(25.0)
            .customer_churn_rate(11.0)
            .market_volatility(33.0)
            .economic_sentiment(20.0),
    );
    assert_ne!(engine.config(), SimulationConfig::default());

    engine.update_config(&ConfigPatch::from_config(&SimulationConfig::default()));

    assert_eq!(engine.config(), SimulationConfig::default());
}

#[test]
fn test_seeded_engines_agree() {
    let (mut a, _) = seeded_engine(42);
    let (mut b, _) = seeded_engine(42);
    assert_eq!(a.fetch_kpi_data(None), b.fetch_kpi_data(None));
    assert_eq!(a.fetch_budget_data(None), b.fetch_budget_data(None));
}

// ============================================================================
// Market Events
// ============================================================================

/// An event whose lifetime has passed contributes nothing and is pruned on
/// the next KPI pass, while history keeps it
#[test]
fn test_expired_event_is_pruned() {
    let (mut engine, _) = quiet_engine();
    let started = START - 8 * MS_PER_DAY;
    engine.inject_event(MarketEvent::new(MarketEventKind::EconomicDownturn, 0.25, 7, started));

    assert_eq!(engine.active_market_events().len(), 1);
    assert_eq!(engine.market_event_impact(), 0.0);

    engine.fetch_kpi_data(None);
    assert!(engine.active_market_events().is_empty());
    assert_eq!(engine.event_history().len(), 1);
}

#[test]
fn test_event_impact_decays_linearly() {
    let (mut engine, clock) = quiet_engine();
    engine.inject_event(MarketEvent::new(MarketEventKind::ProductLaunch, 0.4, 10, START));
    assert!((engine.market_event_impact() - 0.2).abs() < 1e-9);

    clock.advance_days(5.0);
    assert!((engine.market_event_impact() - 0.1).abs() < 1e-9);
}

#[test]
fn test_mild_event_raises_no_alert() {
    let (mut engine, _) = quiet_engine();
    let id = engine.inject_event(MarketEvent::new(MarketEventKind::RegulatoryChange, 0.15, 10, START));
    assert!(id.is_none());
    assert_eq!(engine.alert_count(), 0);

    let id = engine.inject_event(MarketEvent::new(MarketEventKind::RegulatoryChange, 0.25, 10, START));
    assert!(id.is_some());
    assert_eq!(engine.alerts()[0].kind, AlertKind::Warning);
}

// ============================================================================
// Alert Thresholds
// ============================================================================

#[test]
fn test_profit_margin_boundary() {
    let (mut engine, _) = quiet_engine();

    engine.evaluate_kpi_alerts(&[KpiData::with_raw(KpiKind::NetProfitMargin, 5.0, 0.0)]);
    let titles: Vec<_> = engine.alerts().into_iter().map(|a| a.title).collect();
    assert!(titles.contains(&"Low Profit Margin Warning".to_string()));
    assert!(!titles.contains(&"Critical Profit Margin Alert".to_string()));

    engine.clear_all_alerts();
    engine.evaluate_kpi_alerts(&[KpiData::with_raw(KpiKind::NetProfitMargin, 4.9, 0.0)]);
    let titles: Vec<_> = engine.alerts().into_iter().map(|a| a.title).collect();
    assert!(titles.contains(&"Critical Profit Margin Alert".to_string()));
    assert!(!titles.contains(&"Low Profit Margin Warning".to_string()));
}

#[test]
fn test_duplicate_alerts_suppressed_across_passes() {
    let (mut engine, _) = quiet_engine();
    engine.update_config(&ConfigPatch::new().customer_churn_rate(14.0));
    let kpis = [KpiData::with_raw(KpiKind::CashFlow, 10_000.0, 0.0)];

    let first = engine.evaluate_kpi_alerts(&kpis);
    assert!(first >= 2);
    assert_eq!(engine.evaluate_kpi_alerts(&kpis), 0);
    assert_eq!(engine.alert_count(), first);
}

#[test]
fn test_clear_and_refresh_end_to_end() {
    let (mut engine, _) = quiet_engine();
    engine.update_config(&ConfigPatch::new().customer_churn_rate(14.0).market_volatility(40.0));
    engine.refresh_alerts();

    let before = engine.alert_count();
    assert!(before > 0);
    assert!(engine.critical_alert_count() > 0);

    let id = engine.alerts()[0].id.clone();
    assert!(engine.clear_alert(id.as_str()));
    assert_eq!(engine.alert_count(), before - 1);
    assert!(!engine.clear_alert("alert-missing"));

    engine.refresh_alerts();
    assert_eq!(engine.alert_count(), before);
    assert!(engine.alerts().iter().all(|a| a.id != id));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_metrics_and_risk_stay_bounded(
        growth in -20.0f64..40.0,
        churn in 0.0f64..20.0,
        volatility in 0.0f64..50.0,
        sentiment in 0.0f64..100.0,
    ) {
        let (mut engine, _) = quiet_engine();
        engine.update_config(
            &ConfigPatch::new()
                .growth_rate(growth)
                .customer_churn_rate(churn)
                .market_volatility(volatility)
                .economic_sentiment(sentiment),
        );
        prop_assert!(engine.business_metrics().in_bounds());

        for risk in engine.fetch_risk_data(None, None) {
            let (lo, hi) = risk.category.bounds();
            prop_assert!(risk.raw_score >= lo && risk.raw_score <= hi);
        }
    }
}
