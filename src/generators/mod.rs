//! Metric generators
//!
//! Each generator is a function of a read-only [`GeneratorContext`] plus a
//! random source. None of them touch engine state: metric recomputation,
//! market-event passes and alert evaluation are sequenced by the engine.

pub mod budget;
pub mod cash_flow;
pub mod format;
pub mod historical;
pub mod insights;
pub mod kpi;
pub mod kpi_insights;
pub mod risk;

pub use budget::{BudgetCategory, BudgetData};
pub use cash_flow::CashFlowData;
pub use historical::KpiHistoricalData;
pub use insights::{InsightData, InsightKind};
pub use kpi::{KpiData, KpiSnapshot};
pub use kpi_insights::{KpiInsight, KpiInsightKind};
pub use risk::{PreviousScores, RiskCategory, RiskData, RiskLevel, RiskTrend};

use crate::core::config::SimulationConfig;
use crate::core::types::Timestamp;
use crate::model::business::BusinessMetrics;
use crate::model::market::MarketEvents;

/// Everything a generator may read
#[derive(Debug, Clone, Copy)]
pub struct GeneratorContext<'a> {
    /// Effective config: committed config with any per-call override applied
    pub config: &'a SimulationConfig,
    pub metrics: &'a BusinessMetrics,
    pub events: &'a MarketEvents,
    pub now: Timestamp,
}

impl<'a> GeneratorContext<'a> {
    /// Directional impact of the active market events at `now`
    pub fn event_impact(&self) -> f64 {
        self.events.impact(self.now)
    }
}
