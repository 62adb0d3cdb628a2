//! Async dashboard service
//!
//! Wraps a [`SimulationEngine`] behind the fetch surface the dashboard panels
//! use. Each fetch:
//! 1. takes a fresh epoch for its stream
//! 2. waits out the simulated latency (`base + U(0, jitter)`)
//! 3. may reject with `FetchFailed` when a failure rate is configured
//! 4. locks the engine and drops the request as `Superseded` if a newer
//!    request for the same stream was issued meanwhile
//! 5. computes synchronously under the lock
//!
//! A superseded request never touches engine state, so stale responses have
//! no alert side effects either.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time;

use crate::alerts::alert::Alert;
use crate::core::config::{ConfigPatch, SimulationConfig};
use crate::core::error::{CfoError, Result};
use crate::core::settings::{EngineSettings, LatencyProfile, PollingIntervals};
use crate::core::types::{DataStream, TimeRange};
use crate::generators::{
    BudgetData, CashFlowData, InsightData, KpiData, KpiHistoricalData, KpiInsight, PreviousScores,
    RiskData,
};
use crate::model::business::BusinessMetrics;
use crate::model::market::MarketEvent;
use crate::service::epoch::StreamEpochs;
use crate::service::poller::{PanelUpdate, Poller};
use crate::simulation::SimulationEngine;

#[derive(Clone)]
pub struct Dashboard {
    engine: Arc<Mutex<SimulationEngine>>,
    epochs: Arc<StreamEpochs>,
    latency: Arc<LatencyProfile>,
    polling: Arc<PollingIntervals>,
}

impl Dashboard {
    pub fn new(settings: &EngineSettings) -> Result<Self> {
        Self::with_engine(SimulationEngine::new(settings), settings)
    }

    /// Serve an existing engine with the latency and polling from `settings`
    ///
    /// Fails on settings `Dashboard::new` would reject, such as a zero
    /// polling interval.
    pub fn with_engine(engine: SimulationEngine, settings: &EngineSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            engine: Arc::new(Mutex::new(engine)),
            epochs: Arc::new(StreamEpochs::new()),
            latency: Arc::new(settings.latency.clone()),
            polling: Arc::new(settings.polling.clone()),
        })
    }

    /// Direct access for the synchronous parts of the surface
    pub async fn engine(&self) -> MutexGuard<'_, SimulationEngine> {
        self.engine.lock().await
    }

    async fn request<T>(
        &self,
        stream: DataStream,
        compute: impl FnOnce(&mut SimulationEngine) -> T,
    ) -> Result<T> {
        let epoch = self.epochs.issue(stream);

        let (delay, rejected) = {
            let mut engine = self.engine.lock().await;
            let rng = engine.random();
            let jitter = if self.latency.jitter_ms > 0 {
                Duration::from_secs_f64(rng.unit() * self.latency.jitter_ms as f64 / 1_000.0)
            } else {
                Duration::ZERO
            };
            let rejected = self.latency.failure_rate > 0.0 && rng.chance(self.latency.failure_rate);
            (self.latency.base_delay(stream) + jitter, rejected)
        };

        if !delay.is_zero() {
            time::sleep(delay).await;
        }
        if rejected {
            tracing::warn!(%stream, epoch, "simulated fetch failure");
            return Err(CfoError::FetchFailed { stream });
        }

        let mut engine = self.engine.lock().await;
        if !self.epochs.is_current(stream, epoch) {
            tracing::debug!(%stream, epoch, latest = self.epochs.latest(stream), "discarding stale response");
            return Err(CfoError::Superseded { stream, epoch });
        }
        Ok(compute(&mut *engine))
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    pub async fn config(&self) -> SimulationConfig {
        self.engine.lock().await.config()
    }

    pub async fn update_config(&self, patch: &ConfigPatch) {
        self.engine.lock().await.update_config(patch);
    }

    pub async fn business_metrics(&self) -> BusinessMetrics {
        self.engine.lock().await.business_metrics()
    }

    pub async fn active_market_events(&self) -> Vec<MarketEvent> {
        self.engine.lock().await.active_market_events()
    }

    // ------------------------------------------------------------------
    // Panels
    // ------------------------------------------------------------------

    pub async fn fetch_kpi_data(&self, overrides: Option<ConfigPatch>) -> Result<Vec<KpiData>> {
        self.request(DataStream::Kpi, |e| e.fetch_kpi_data(overrides.as_ref())).await
    }

    pub async fn fetch_cash_flow_data(&self, overrides: Option<ConfigPatch>) -> Result<Vec<CashFlowData>> {
        self.request(DataStream::CashFlow, |e| e.fetch_cash_flow_data(overrides.as_ref())).await
    }

    pub async fn fetch_budget_data(&self, overrides: Option<ConfigPatch>) -> Result<Vec<BudgetData>> {
        self.request(DataStream::Budget, |e| e.fetch_budget_data(overrides.as_ref())).await
    }

    pub async fn fetch_risk_data(
        &self,
        overrides: Option<ConfigPatch>,
        previous: Option<PreviousScores>,
    ) -> Result<Vec<RiskData>> {
        self.request(DataStream::Risk, |e| e.fetch_risk_data(overrides.as_ref(), previous.as_ref()))
            .await
    }

    pub async fn fetch_insights_data(&self, overrides: Option<ConfigPatch>) -> Result<Vec<InsightData>> {
        self.request(DataStream::Insights, |e| e.fetch_insights_data(overrides.as_ref())).await
    }

    pub async fn fetch_kpi_historical_data(&self, title: &str, range: TimeRange) -> Result<Vec<KpiHistoricalData>> {
        self.request(DataStream::Historical, |e| e.fetch_kpi_historical_data(title, range)).await
    }

    pub async fn fetch_kpi_insights(&self, title: &str) -> Result<Vec<KpiInsight>> {
        self.request(DataStream::KpiInsights, |e| e.fetch_kpi_insights(title)).await
    }

    /// Fetch whichever panel `stream` feeds; `None` for drill-down streams
    pub async fn fetch_panel(&self, stream: DataStream) -> Option<Result<PanelUpdate>> {
        let update = match stream {
            DataStream::Kpi => self.fetch_kpi_data(None).await.map(PanelUpdate::Kpi),
            DataStream::CashFlow => self.fetch_cash_flow_data(None).await.map(PanelUpdate::CashFlow),
            DataStream::Budget => self.fetch_budget_data(None).await.map(PanelUpdate::Budget),
            DataStream::Risk => self.fetch_risk_data(None, None).await.map(PanelUpdate::Risk),
            DataStream::Insights => self.fetch_insights_data(None).await.map(PanelUpdate::Insights),
            DataStream::Historical | DataStream::KpiInsights => return None,
        };
        Some(update)
    }

    // ------------------------------------------------------------------
    // Alerts
    // ------------------------------------------------------------------

    pub async fn alerts(&self) -> Vec<Alert> {
        self.engine.lock().await.alerts()
    }

    pub async fn clear_alert(&self, id: &str) -> bool {
        self.engine.lock().await.clear_alert(id)
    }

    pub async fn clear_all_alerts(&self) {
        self.engine.lock().await.clear_all_alerts();
    }

    pub async fn alert_count(&self) -> usize {
        self.engine.lock().await.alert_count()
    }

    pub async fn critical_alert_count(&self) -> usize {
        self.engine.lock().await.critical_alert_count()
    }

    /// Clear and rebuild alerts from concurrent KPI, budget and risk passes
    ///
    /// A failing pass is logged and skipped; alerts from the passes that
    /// succeeded are kept. Returns the streams that failed.
    pub async fn refresh_alerts(&self) -> Vec<DataStream> {
        self.engine.lock().await.begin_refresh();

        let (kpi, budget, risk) = tokio::join!(
            self.fetch_kpi_data(None),
            self.fetch_budget_data(None),
            self.fetch_risk_data(None, None),
        );

        let mut failed = Vec::new();
        for (stream, outcome) in [
            (DataStream::Kpi, kpi.map(|_| ())),
            (DataStream::Budget, budget.map(|_| ())),
            (DataStream::Risk, risk.map(|_| ())),
        ] {
            if let Err(e) = outcome {
                tracing::error!(%stream, "error refreshing alerts: {e}");
                failed.push(stream);
            }
        }

        tracing::info!(alerts = self.alert_count().await, failed = failed.len(), "alerts refreshed");
        failed
    }

    // ------------------------------------------------------------------
    // Polling
    // ------------------------------------------------------------------

    /// Refresh `stream` on its polling interval until the poller is cancelled
    ///
    /// The first update is fetched immediately. Superseded responses are
    /// skipped; failures arrive as [`PanelUpdate::Failed`].
    pub fn poll(&self, stream: DataStream) -> Option<Poller> {
        let period = self.polling.interval(stream)?;
        Some(self.poll_every(stream, period))
    }

    pub(crate) fn poll_every(&self, stream: DataStream, period: Duration) -> Poller {
        let (tx, rx) = Poller::channel();
        let dashboard = self.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            loop {
                ticker.tick().await;
                let update = match dashboard.fetch_panel(stream).await {
                    Some(Ok(update)) => update,
                    Some(Err(CfoError::Superseded { .. })) => continue,
                    Some(Err(e)) => PanelUpdate::Failed { stream, message: e.to_string() },
                    None => break,
                };
                if tx.send(update).await.is_err() {
                    break;
                }
            }
        });

        tracing::debug!(%stream, period_secs = period.as_secs_f64(), "polling started");
        Poller::new(stream, handle, rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::random::SequenceRng;

    fn dashboard(latency: LatencyProfile) -> Dashboard {
        let engine = SimulationEngine::with_sources(
            SimulationConfig::default(),
            Box::new(SequenceRng::constant(0.5)),
            Arc::new(ManualClock::new(1_760_875_200_000)),
        );
        let settings = EngineSettings { latency, ..EngineSettings::default() };
        Dashboard::with_engine(engine, &settings).unwrap()
    }

    #[tokio::test]
    async fn test_instant_fetch_returns_data() {
        let dashboard = dashboard(LatencyProfile::instant());
        assert_eq!(dashboard.fetch_kpi_data(None).await.unwrap().len(), 4);
        assert_eq!(dashboard.fetch_cash_flow_data(None).await.unwrap().len(), 6);
        assert_eq!(dashboard.fetch_budget_data(None).await.unwrap().len(), 5);
        assert_eq!(dashboard.fetch_risk_data(None, None).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_failure_rate_one_always_rejects() {
        let latency = LatencyProfile { failure_rate: 1.0, ..LatencyProfile::instant() };
        let dashboard = dashboard(latency);
        let err = dashboard.fetch_cash_flow_data(None).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to load cash flow data");
    }

    #[test]
    fn test_zero_polling_interval_rejected() {
        let engine = SimulationEngine::with_sources(
            SimulationConfig::default(),
            Box::new(SequenceRng::constant(0.5)),
            Arc::new(ManualClock::new(1_760_875_200_000)),
        );
        let mut settings = EngineSettings::default();
        settings.polling.kpi_secs = 0;
        let err = Dashboard::with_engine(engine, &settings).err().unwrap();
        assert!(matches!(err, CfoError::InvalidSettings(_)));
    }

    #[tokio::test]
    async fn test_drill_down_streams_are_not_polled() {
        let dashboard = dashboard(LatencyProfile::instant());
        assert!(dashboard.poll(DataStream::Historical).is_none());
        assert!(dashboard.fetch_panel(DataStream::KpiInsights).await.is_none());
    }
}
