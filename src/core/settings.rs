//! Engine settings loaded from TOML
//!
//! Everything that shapes *how* data is served rather than *what* is
//! computed: RNG seed, initial levers, simulated latency and panel polling.
//!
//! ```toml
//! seed = 42
//!
//! [simulation]
//! growthRate = 12.0
//!
//! [latency]
//! jitter_ms = 0
//! failure_rate = 0.05
//!
//! [polling]
//! kpi_secs = 15
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::error::{CfoError, Result};
use crate::core::types::DataStream;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Fixed RNG seed; entropy-seeded when absent
    pub seed: Option<u64>,
    /// Initial simulation levers
    pub simulation: SimulationConfig,
    pub latency: LatencyProfile,
    pub polling: PollingIntervals,
}

impl EngineSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let settings = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded engine settings");
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Settings for tests: fixed seed, no latency, no failures
    pub fn deterministic(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            latency: LatencyProfile::instant(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.latency.validate()?;
        self.polling.validate()
    }
}

/// Simulated network latency per stream
///
/// Each fetch sleeps `base + U(0, jitter)` milliseconds before computing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyProfile {
    pub kpi_ms: u64,
    pub cash_flow_ms: u64,
    pub budget_ms: u64,
    pub risk_ms: u64,
    pub insights_ms: u64,
    pub historical_ms: u64,
    pub kpi_insights_ms: u64,
    /// Upper bound of the random jitter added to every base delay
    pub jitter_ms: u64,
    /// Probability that a simulated fetch rejects
    pub failure_rate: f64,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            kpi_ms: 800,
            cash_flow_ms: 600,
            budget_ms: 700,
            risk_ms: 750,
            insights_ms: 900,
            historical_ms: 600,
            kpi_insights_ms: 400,
            jitter_ms: 200,
            failure_rate: 0.0,
        }
    }
}

impl LatencyProfile {
    /// Zero delay, zero jitter, never fails
    pub fn instant() -> Self {
        Self {
            kpi_ms: 0,
            cash_flow_ms: 0,
            budget_ms: 0,
            risk_ms: 0,
            insights_ms: 0,
            historical_ms: 0,
            kpi_insights_ms: 0,
            jitter_ms: 0,
            failure_rate: 0.0,
        }
    }

    pub fn base_delay(&self, stream: DataStream) -> Duration {
        let ms = match stream {
            DataStream::Kpi => self.kpi_ms,
            DataStream::CashFlow => self.cash_flow_ms,
            DataStream::Budget => self.budget_ms,
            DataStream::Risk => self.risk_ms,
            DataStream::Insights => self.insights_ms,
            DataStream::Historical => self.historical_ms,
            DataStream::KpiInsights => self.kpi_insights_ms,
        };
        Duration::from_millis(ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(CfoError::InvalidSettings(format!(
                "failure_rate ({}) must be within [0, 1]",
                self.failure_rate
            )));
        }
        Ok(())
    }
}

/// Background refresh interval per dashboard panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingIntervals {
    pub kpi_secs: u64,
    pub budget_secs: u64,
    pub cash_flow_secs: u64,
    pub risk_secs: u64,
    pub insights_secs: u64,
}

impl Default for PollingIntervals {
    fn default() -> Self {
        Self {
            kpi_secs: 30,
            budget_secs: 40,
            cash_flow_secs: 45,
            risk_secs: 50,
            insights_secs: 60,
        }
    }
}

impl PollingIntervals {
    /// Interval for a polled panel; drill-down streams are never polled
    pub fn interval(&self, stream: DataStream) -> Option<Duration> {
        let secs = match stream {
            DataStream::Kpi => self.kpi_secs,
            DataStream::Budget => self.budget_secs,
            DataStream::CashFlow => self.cash_flow_secs,
            DataStream::Risk => self.risk_secs,
            DataStream::Insights => self.insights_secs,
            DataStream::Historical | DataStream::KpiInsights => return None,
        };
        Some(Duration::from_secs(secs))
    }

    pub fn validate(&self) -> Result<()> {
        let all = [
            self.kpi_secs,
            self.budget_secs,
            self.cash_flow_secs,
            self.risk_secs,
            self.insights_secs,
        ];
        if all.iter().any(|s| *s == 0) {
            return Err(CfoError::InvalidSettings("polling intervals must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard_timings() {
        let settings = EngineSettings::default();
        assert_eq!(settings.latency.base_delay(DataStream::Kpi), Duration::from_millis(800));
        assert_eq!(settings.polling.interval(DataStream::Risk), Some(Duration::from_secs(50)));
        assert_eq!(settings.polling.interval(DataStream::Historical), None);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = EngineSettings::from_toml(
            r#"
            seed = 9

            [simulation]
            growthRate = 12.5

            [latency]
            jitter_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.simulation.growth_rate, 12.5);
        assert_eq!(settings.simulation.base_revenue, 2_400_000.0);
        assert_eq!(settings.latency.jitter_ms, 0);
        assert_eq!(settings.latency.kpi_ms, 800);
        assert_eq!(settings.polling.kpi_secs, 30);
    }

    #[test]
    fn test_rejects_failure_rate_out_of_range() {
        let err = EngineSettings::from_toml("[latency]\nfailure_rate = 1.5\n").unwrap_err();
        assert!(matches!(err, CfoError::InvalidSettings(_)));
    }

    #[test]
    fn test_rejects_zero_polling_interval() {
        let err = EngineSettings::from_toml("[polling]\nrisk_secs = 0\n").unwrap_err();
        assert!(matches!(err, CfoError::InvalidSettings(_)));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(matches!(
            EngineSettings::from_toml("seed = [").unwrap_err(),
            CfoError::TomlError(_)
        ));
    }
}
