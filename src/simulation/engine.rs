//! Simulation engine - owns every piece of mutable dashboard state
//!
//! One engine holds the committed config, the derived business metrics, the
//! market events, the alert list and the random/clock seams. Fetches are
//! synchronous and deterministic given the random source and the clock;
//! latency and staleness live one layer up in the dashboard service.
//!
//! Side-effect order per fetch:
//! - KPI: recompute metrics -> market event pass -> generate -> KPI alert pass
//! - Budget: generate -> budget alert pass
//! - Risk: generate -> risk alert pass
//! - everything else: generate only

use std::sync::Arc;

use crate::alerts::alert::{Alert, AlertId};
use crate::alerts::manager::AlertManager;
use crate::alerts::rules;
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::{ConfigPatch, SimulationConfig};
use crate::core::random::{RandomSource, SeededRng};
use crate::core::settings::EngineSettings;
use crate::core::types::{KpiKind, TimeRange, Timestamp};
use crate::generators::{
    budget, cash_flow, historical, insights, kpi, kpi_insights, risk, BudgetData, CashFlowData,
    GeneratorContext, InsightData, KpiData, KpiHistoricalData, KpiInsight, PreviousScores,
    RiskData,
};
use crate::model::business::BusinessMetrics;
use crate::model::market::{MarketEvent, MarketEvents};

pub struct SimulationEngine {
    config: SimulationConfig,
    metrics: BusinessMetrics,
    events: MarketEvents,
    alerts: AlertManager,
    rng: Box<dyn RandomSource>,
    clock: Arc<dyn Clock>,
}

impl SimulationEngine {
    /// Engine on the system clock, seeded from `settings.seed` or entropy
    pub fn new(settings: &EngineSettings) -> Self {
        Self::with_sources(
            settings.simulation,
            Box::new(SeededRng::from_optional_seed(settings.seed)),
            Arc::new(SystemClock),
        )
    }

    pub fn with_sources(config: SimulationConfig, rng: Box<dyn RandomSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            metrics: BusinessMetrics::default(),
            events: MarketEvents::new(),
            alerts: AlertManager::new(),
            rng,
            clock,
        }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now_ms()
    }

    // ------------------------------------------------------------------
    // Configuration and state
    // ------------------------------------------------------------------

    pub fn config(&self) -> SimulationConfig {
        self.config
    }

    /// Merge `patch`, recompute metrics, then run one market event pass
    pub fn update_config(&mut self, patch: &ConfigPatch) {
        self.config.merge(patch);
        tracing::debug!(?patch, "simulation config updated");
        self.recompute_metrics();
        let now = self.now();
        self.market_event_pass(now);
    }

    pub fn business_metrics(&self) -> BusinessMetrics {
        self.metrics
    }

    pub fn active_market_events(&self) -> Vec<MarketEvent> {
        self.events.active().to_vec()
    }

    pub fn event_history(&self) -> &[MarketEvent] {
        self.events.history()
    }

    /// Directional impact of the active events right now
    pub fn market_event_impact(&self) -> f64 {
        self.events.impact(self.now())
    }

    /// Start `event` as if a generation pass had produced it
    pub fn inject_event(&mut self, event: MarketEvent) -> Option<AlertId> {
        let now = self.now();
        let alert = rules::market_event_alert(&event);
        self.events.push(event);
        alert.and_then(|draft| self.alerts.add(draft, now))
    }

    fn recompute_metrics(&mut self) {
        self.metrics = self.metrics.recompute(&self.config);
    }

    fn market_event_pass(&mut self, now: Timestamp) {
        if let Some(event) = self.events.generate(&self.config, self.rng.as_mut(), now) {
            if let Some(draft) = rules::market_event_alert(&event) {
                self.alerts.add(draft, now);
            }
        }
    }

    fn effective_config(&self, overrides: Option<&ConfigPatch>) -> SimulationConfig {
        match overrides {
            Some(patch) => self.config.merged(patch),
            None => self.config,
        }
    }

    // ------------------------------------------------------------------
    // Generators
    // ------------------------------------------------------------------

    pub fn fetch_kpi_data(&mut self, overrides: Option<&ConfigPatch>) -> Vec<KpiData> {
        self.recompute_metrics();
        let now = self.now();
        self.market_event_pass(now);

        let config = self.effective_config(overrides);
        let ctx = GeneratorContext { config: &config, metrics: &self.metrics, events: &self.events, now };
        let kpis = kpi::generate(&ctx, self.rng.as_mut());

        // lever rules only ever see committed settings
        let raised = self.alerts.extend(rules::kpi_alerts(&kpis, &self.config, &self.metrics), now);
        tracing::debug!(raised, "KPI data generated");
        kpis
    }

    pub fn fetch_cash_flow_data(&mut self, overrides: Option<&ConfigPatch>) -> Vec<CashFlowData> {
        let now = self.now();
        let config = self.effective_config(overrides);
        let ctx = GeneratorContext { config: &config, metrics: &self.metrics, events: &self.events, now };
        cash_flow::generate(&ctx, self.rng.as_mut())
    }

    pub fn fetch_budget_data(&mut self, overrides: Option<&ConfigPatch>) -> Vec<BudgetData> {
        let now = self.now();
        let config = self.effective_config(overrides);
        let ctx = GeneratorContext { config: &config, metrics: &self.metrics, events: &self.events, now };
        let budgets = budget::generate(&ctx, self.rng.as_mut());

        let raised = self.alerts.extend(rules::budget_alerts(&budgets), now);
        tracing::debug!(raised, "budget data generated");
        budgets
    }

    /// Risk assessment; trends compare against `previous` when given
    pub fn fetch_risk_data(
        &mut self,
        overrides: Option<&ConfigPatch>,
        previous: Option<&PreviousScores>,
    ) -> Vec<RiskData> {
        let now = self.now();
        let config = self.effective_config(overrides);
        let ctx = GeneratorContext { config: &config, metrics: &self.metrics, events: &self.events, now };
        let risks = risk::generate(&ctx, previous);

        let raised = self.alerts.extend(rules::risk_alerts(&risks), now);
        tracing::debug!(raised, "risk data generated");
        risks
    }

    pub fn fetch_insights_data(&self, overrides: Option<&ConfigPatch>) -> Vec<InsightData> {
        let config = self.effective_config(overrides);
        let ctx = GeneratorContext { config: &config, metrics: &self.metrics, events: &self.events, now: self.now() };
        insights::generate(&ctx, &self.config)
    }

    /// Daily history for the KPI titled `title`; unknown titles get a flat baseline
    pub fn fetch_kpi_historical_data(&mut self, title: &str, range: TimeRange) -> Vec<KpiHistoricalData> {
        let now = self.now();
        let ctx = GeneratorContext { config: &self.config, metrics: &self.metrics, events: &self.events, now };
        historical::generate(KpiKind::from_title(title), range, &ctx, self.rng.as_mut())
    }

    pub fn fetch_kpi_insights(&self, title: &str) -> Vec<KpiInsight> {
        let ctx = GeneratorContext {
            config: &self.config,
            metrics: &self.metrics,
            events: &self.events,
            now: self.now(),
        };
        kpi_insights::generate(KpiKind::from_title(title), &ctx)
    }

    // ------------------------------------------------------------------
    // Alerts
    // ------------------------------------------------------------------

    /// Run the KPI alert rules over externally supplied records
    pub fn evaluate_kpi_alerts(&mut self, kpis: &[KpiData]) -> usize {
        let now = self.now();
        self.alerts.extend(rules::kpi_alerts(kpis, &self.config, &self.metrics), now)
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.alerts().to_vec()
    }

    pub fn alert_manager(&self) -> &AlertManager {
        &self.alerts
    }

    pub fn clear_alert(&mut self, id: &str) -> bool {
        self.alerts.clear(id)
    }

    pub fn clear_all_alerts(&mut self) {
        self.alerts.clear_all();
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.count()
    }

    pub fn critical_alert_count(&self) -> usize {
        self.alerts.critical_count()
    }

    /// First half of a refresh: clear alerts, run an event pass, recompute metrics
    pub fn begin_refresh(&mut self) {
        self.alerts.clear_all();
        let now = self.now();
        self.market_event_pass(now);
        self.recompute_metrics();
    }

    /// Rebuild the alert list from fresh KPI, budget and risk passes
    pub fn refresh_alerts(&mut self) {
        self.begin_refresh();
        self.fetch_kpi_data(None);
        self.fetch_budget_data(None);
        self.fetch_risk_data(None, None);
        tracing::info!(alerts = self.alert_count(), critical = self.critical_alert_count(), "alerts refreshed");
    }

    pub fn random(&mut self) -> &mut dyn RandomSource {
        self.rng.as_mut()
    }
}
