//! Simulation levers
//!
//! `SimulationConfig` is the single mutable input of the engine. The
//! dashboard sliders write it through `ConfigPatch` merges; every derived
//! number (business metrics, KPIs, risks, alerts) is recomputed from it.
//!
//! No range validation happens here. The documented slider ranges are a
//! contract with callers, and only the *derived* metrics are clamped.

use serde::{Deserialize, Serialize};

use crate::core::error::{CfoError, Result};

/// Configuration for the financial simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    // === REVENUE DRIVERS ===
    /// Monthly revenue baseline in dollars (slider: 1M - 5M)
    pub base_revenue: f64,

    /// Annual growth rate in percent (slider: -10 - 30)
    ///
    /// Feeds revenue, satisfaction, productivity and innovation. Above 8%
    /// the cash-flow model adds a growth investment outflow.
    pub growth_rate: f64,

    /// Market volatility in percent (slider: 0 - 50)
    ///
    /// Scales the random revenue swing. Above 20 market events hit harder.
    pub market_volatility: f64,

    /// Amplitude of seasonal swings in percent (slider: 0 - 50)
    pub seasonality: f64,

    /// Competitive pressure in percent (slider: 0 - 30)
    pub competition_impact: f64,

    // === MACRO ENVIRONMENT ===
    /// Inflation in percent; 3% is treated as neutral
    pub inflation_rate: f64,

    /// Monthly customer churn in percent
    pub customer_churn_rate: f64,

    /// Supply chain disruption in percent of operations
    pub supply_chain_disruption: f64,

    /// Economic sentiment index (0 - 100); 50 is neutral
    pub economic_sentiment: f64,

    /// Technology adoption (0 - 100); 75 is the efficiency baseline
    pub technology_adoption: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            base_revenue: 2_400_000.0,
            growth_rate: 5.0,
            market_volatility: 10.0,
            seasonality: 15.0,
            competition_impact: 8.0,
            inflation_rate: 3.2,
            customer_churn_rate: 5.5,
            supply_chain_disruption: 2.0,
            economic_sentiment: 65.0,
            technology_adoption: 75.0,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow merge: fields present in `patch` replace the current ones
    pub fn merge(&mut self, patch: &ConfigPatch) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if let Some(v) = patch.$field { self.$field = v; })*
            };
        }
        take!(
            base_revenue,
            growth_rate,
            market_volatility,
            seasonality,
            competition_impact,
            inflation_rate,
            customer_churn_rate,
            supply_chain_disruption,
            economic_sentiment,
            technology_adoption
        );
    }

    /// Copy of `self` with `patch` applied, leaving `self` untouched
    pub fn merged(&self, patch: &ConfigPatch) -> Self {
        let mut next = *self;
        next.merge(patch);
        next
    }

    /// Named levers in display order
    pub fn fields(&self) -> [(&'static str, f64); 10] {
        [
            ("baseRevenue", self.base_revenue),
            ("growthRate", self.growth_rate),
            ("marketVolatility", self.market_volatility),
            ("seasonality", self.seasonality),
            ("competitionImpact", self.competition_impact),
            ("inflationRate", self.inflation_rate),
            ("customerChurnRate", self.customer_churn_rate),
            ("supplyChainDisruption", self.supply_chain_disruption),
            ("economicSentiment", self.economic_sentiment),
            ("technologyAdoption", self.technology_adoption),
        ]
    }
}

/// Partial update of `SimulationConfig`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_volatility: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasonality: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competition_impact: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inflation_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_churn_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supply_chain_disruption: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub economic_sentiment: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technology_adoption: Option<f64>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that replaces every field with the values of `config`
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            base_revenue: Some(config.base_revenue),
            growth_rate: Some(config.growth_rate),
            market_volatility: Some(config.market_volatility),
            seasonality: Some(config.seasonality),
            competition_impact: Some(config.competition_impact),
            inflation_rate: Some(config.inflation_rate),
            customer_churn_rate: Some(config.customer_churn_rate),
            supply_chain_disruption: Some(config.supply_chain_disruption),
            economic_sentiment: Some(config.economic_sentiment),
            technology_adoption: Some(config.technology_adoption),
        }
    }

    /// Set a lever by name, accepting camelCase or snake_case
    pub fn set(&mut self, name: &str, value: f64) -> Result<()> {
        let key: String = name.chars().filter(|c| *c != '_').collect::<String>().to_ascii_lowercase();
        let slot = match key.as_str() {
            "baserevenue" => &mut self.base_revenue,
            "growthrate" => &mut self.growth_rate,
            "marketvolatility" => &mut self.market_volatility,
            "seasonality" => &mut self.seasonality,
            "competitionimpact" => &mut self.competition_impact,
            "inflationrate" => &mut self.inflation_rate,
            "customerchurnrate" => &mut self.customer_churn_rate,
            "supplychaindisruption" => &mut self.supply_chain_disruption,
            "economicsentiment" => &mut self.economic_sentiment,
            "technologyadoption" => &mut self.technology_adoption,
            _ => return Err(CfoError::UnknownConfigField(name.to_string())),
        };
        *slot = Some(value);
        Ok(())
    }

    /// Builder form of [`ConfigPatch::set`]
    pub fn with(mut self, name: &str, value: f64) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    pub fn growth_rate(mut self, value: f64) -> Self {
        self.growth_rate = Some(value);
        self
    }

    pub fn customer_churn_rate(mut self, value: f64) -> Self {
        self.customer_churn_rate = Some(value);
        self
    }

    pub fn market_volatility(mut self, value: f64) -> Self {
        self.market_volatility = Some(value);
        self
    }

    pub fn economic_sentiment(mut self, value: f64) -> Self {
        self.economic_sentiment = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_only_touches_provided_fields() {
        let mut config = SimulationConfig::default();
        config.merge(&ConfigPatch::new().growth_rate(20.0).customer_churn_rate(2.0));

        assert_eq!(config.growth_rate, 20.0);
        assert_eq!(config.customer_churn_rate, 2.0);
        assert_eq!(config.base_revenue, 2_400_000.0);
        assert_eq!(config.inflation_rate, 3.2);
    }

    #[test]
    fn test_merged_leaves_original() {
        let config = SimulationConfig::default();
        let next = config.merged(&ConfigPatch::new().market_volatility(40.0));
        assert_eq!(config.market_volatility, 10.0);
        assert_eq!(next.market_volatility, 40.0);
    }

    #[test]
    fn test_set_by_name_accepts_both_cases() {
        let patch = ConfigPatch::new()
            .with("inflationRate", 9.0)
            .and_then(|p| p.with("supply_chain_disruption", 30.0))
            .unwrap();
        assert_eq!(patch.inflation_rate, Some(9.0));
        assert_eq!(patch.supply_chain_disruption, Some(30.0));
    }

    #[test]
    fn test_set_unknown_field_errors() {
        let mut patch = ConfigPatch::new();
        assert!(matches!(patch.set("ebitda", 1.0), Err(CfoError::UnknownConfigField(_))));
        assert!(patch.is_empty());
    }

    #[test]
    fn test_out_of_range_values_are_accepted() {
        let mut config = SimulationConfig::default();
        config.merge(&ConfigPatch::new().growth_rate(500.0));
        assert_eq!(config.growth_rate, 500.0);
    }

    #[test]
    fn test_from_config_round_trips_through_merge() {
        let mut source = SimulationConfig::default();
        source.seasonality = 42.0;
        let mut target = SimulationConfig::default();
        target.merge(&ConfigPatch::from_config(&source));
        assert_eq!(target, source);
    }

    #[test]
    fn test_patch_json_uses_camel_case() {
        let patch = ConfigPatch::new().growth_rate(7.0);
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"growthRate":7.0}"#);
    }
}
