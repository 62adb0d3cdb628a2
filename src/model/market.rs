//! Market events - transient synthetic shocks
//!
//! Each generation pass prunes expired events and, with a fixed probability,
//! creates one new event whose severity is amplified by stressed market
//! conditions. Active events feed a time-decayed directional impact into the
//! revenue, cash-flow and budget formulas.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::random::RandomSource;
use crate::core::types::{Timestamp, MS_PER_DAY};

/// Chance of a new event per generation pass
pub const EVENT_PROBABILITY: f64 = 0.10;

const SEVERITY_MIN: f64 = 0.1;
const SEVERITY_MAX: f64 = 0.4;
const DURATION_MIN_DAYS: u32 = 7;
/// Number of possible durations; durations fall in [7, 37)
const DURATION_SPAN_DAYS: u32 = 30;

// Severity amplifiers, applied multiplicatively
const HIGH_VOLATILITY: f64 = 20.0;
const HIGH_VOLATILITY_MULTIPLIER: f64 = 1.5;
const LOW_SENTIMENT: f64 = 40.0;
const LOW_SENTIMENT_MULTIPLIER: f64 = 1.3;
const HIGH_COMPETITION: f64 = 15.0;
const HIGH_COMPETITION_MULTIPLIER: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketEventKind {
    EconomicDownturn,
    ProductLaunch,
    SupplyDisruption,
    CompetitorAction,
    RegulatoryChange,
    TechnologyShift,
}

impl MarketEventKind {
    pub const ALL: [MarketEventKind; 6] = [
        MarketEventKind::EconomicDownturn,
        MarketEventKind::ProductLaunch,
        MarketEventKind::SupplyDisruption,
        MarketEventKind::CompetitorAction,
        MarketEventKind::RegulatoryChange,
        MarketEventKind::TechnologyShift,
    ];

    /// Sign and weight of the event's contribution to financial formulas
    pub fn directional_weight(self) -> f64 {
        match self {
            MarketEventKind::EconomicDownturn => -1.0,
            MarketEventKind::ProductLaunch => 0.5,
            _ => -0.7,
        }
    }

    /// Upper-case words used in alert titles, e.g. `ECONOMIC DOWNTURN`
    pub fn headline(self) -> &'static str {
        match self {
            MarketEventKind::EconomicDownturn => "ECONOMIC DOWNTURN",
            MarketEventKind::ProductLaunch => "PRODUCT LAUNCH",
            MarketEventKind::SupplyDisruption => "SUPPLY DISRUPTION",
            MarketEventKind::CompetitorAction => "COMPETITOR ACTION",
            MarketEventKind::RegulatoryChange => "REGULATORY CHANGE",
            MarketEventKind::TechnologyShift => "TECHNOLOGY SHIFT",
        }
    }

    pub fn describe(self, severity: f64) -> String {
        let pct = severity * 100.0;
        match self {
            MarketEventKind::EconomicDownturn => {
                format!("Economic indicators show {:.0}% downturn pressure", pct)
            }
            MarketEventKind::ProductLaunch => {
                format!("Major competitor launches disruptive product with {:.0}% market impact", pct)
            }
            MarketEventKind::SupplyDisruption => {
                format!("Supply chain disruption affecting {:.0}% of operations", pct)
            }
            MarketEventKind::CompetitorAction => {
                format!("Aggressive competitor pricing strategy impacts {:.0}% of market", pct)
            }
            MarketEventKind::RegulatoryChange => {
                format!("New regulations create {:.0}% compliance cost increase", pct)
            }
            MarketEventKind::TechnologyShift => {
                format!("Technology disruption affects {:.0}% of business model", pct)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketEvent {
    #[serde(rename = "type")]
    pub kind: MarketEventKind,
    pub severity: f64,
    /// Lifetime in days
    pub duration: u32,
    pub start_time: Timestamp,
    pub description: String,
}

impl MarketEvent {
    pub fn new(kind: MarketEventKind, severity: f64, duration: u32, start_time: Timestamp) -> Self {
        Self {
            kind,
            severity,
            duration,
            start_time,
            description: kind.describe(severity),
        }
    }

    pub fn duration_ms(&self) -> i64 {
        i64::from(self.duration) * MS_PER_DAY
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now - self.start_time >= self.duration_ms()
    }

    /// Linear decay from 1 at start to 0 at expiry
    pub fn time_decay(&self, now: Timestamp) -> f64 {
        let duration = self.duration_ms();
        if duration <= 0 {
            return 0.0;
        }
        (1.0 - (now - self.start_time) as f64 / duration as f64).clamp(0.0, 1.0)
    }

    pub fn impact(&self, now: Timestamp) -> f64 {
        self.severity * self.time_decay(now) * self.kind.directional_weight()
    }
}

/// Active events plus the unbounded history of every event ever created
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketEvents {
    active: Vec<MarketEvent>,
    history: Vec<MarketEvent>,
}

impl MarketEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &[MarketEvent] {
        &self.active
    }

    pub fn history(&self) -> &[MarketEvent] {
        &self.history
    }

    pub fn count_of(&self, kind: MarketEventKind) -> usize {
        self.active.iter().filter(|e| e.kind == kind).count()
    }

    /// Active events with severity strictly above `severity`
    pub fn above(&self, severity: f64) -> impl Iterator<Item = &MarketEvent> {
        self.active.iter().filter(move |e| e.severity > severity)
    }

    /// Drop expired events from the active set; history keeps them
    pub fn prune(&mut self, now: Timestamp) -> usize {
        let before = self.active.len();
        self.active.retain(|e| !e.is_expired(now));
        let removed = before - self.active.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = self.active.len(), "pruned expired market events");
        }
        removed
    }

    /// Record an event as both active and historical
    pub fn push(&mut self, event: MarketEvent) {
        self.history.push(event.clone());
        self.active.push(event);
    }

    /// One generation pass: prune, then maybe create an event
    ///
    /// Returns the new event, if any, so the caller can raise an alert.
    pub fn generate(
        &mut self,
        config: &SimulationConfig,
        rng: &mut dyn RandomSource,
        now: Timestamp,
    ) -> Option<MarketEvent> {
        self.prune(now);

        if !rng.chance(EVENT_PROBABILITY) {
            return None;
        }

        let kind = MarketEventKind::ALL[rng.index(MarketEventKind::ALL.len())];
        let severity = rng.between(SEVERITY_MIN, SEVERITY_MAX) * severity_multiplier(config);
        let duration = DURATION_MIN_DAYS + rng.index(DURATION_SPAN_DAYS as usize) as u32;

        let event = MarketEvent::new(kind, severity, duration, now);
        tracing::info!(kind = ?kind, severity, duration, "market event started");
        self.push(event.clone());
        Some(event)
    }

    /// Sum of time-decayed directional impacts over active events
    pub fn impact(&self, now: Timestamp) -> f64 {
        self.active.iter().map(|e| e.impact(now)).sum()
    }
}

/// Combined severity amplifier for the current market conditions
pub fn severity_multiplier(config: &SimulationConfig) -> f64 {
    let mut multiplier = 1.0;
    if config.market_volatility > HIGH_VOLATILITY {
        multiplier *= HIGH_VOLATILITY_MULTIPLIER;
    }
    if config.economic_sentiment < LOW_SENTIMENT {
        multiplier *= LOW_SENTIMENT_MULTIPLIER;
    }
    if config.competition_impact > HIGH_COMPETITION {
        multiplier *= HIGH_COMPETITION_MULTIPLIER;
    }
    multiplier
}
