//! Alert thresholds
//!
//! The single table every alert rule reads. A critical breach of a metric
//! suppresses the warning for the same metric.

/// Net profit margin (%) below which the margin is critical.
pub const PROFIT_MARGIN_CRITICAL: f64 = 5.0;
/// Net profit margin (%) below which the margin is a warning.
pub const PROFIT_MARGIN_WARNING: f64 = 10.0;

/// Absolute budget variance (%) above which a category is critical.
pub const BUDGET_VARIANCE_CRITICAL: f64 = 25.0;
/// Absolute budget variance (%) above which a category is a warning.
pub const BUDGET_VARIANCE_WARNING: f64 = 15.0;
/// Budget efficiency (%) below which a category is flagged.
pub const BUDGET_EFFICIENCY_WARNING: f64 = 60.0;

/// Risk score at or above which a category is critical.
pub const RISK_SCORE_CRITICAL: u32 = 80;

/// Monthly cash flow (dollars) below which cash is critical.
pub const CASH_FLOW_CRITICAL: f64 = 25_000.0;
/// Monthly cash flow (dollars) below which cash is a warning.
pub const CASH_FLOW_WARNING: f64 = 50_000.0;

/// Revenue change (%) below which the decline is critical.
pub const REVENUE_DECLINE_CRITICAL: f64 = -15.0;
/// Customer satisfaction below which a critical revenue decline is a crisis.
pub const REVENUE_CRISIS_SATISFACTION: f64 = 70.0;
/// Revenue change (%) below which the decline is a warning.
pub const REVENUE_DECLINE_WARNING: f64 = -5.0;

/// Market volatility at or above which conditions are critical.
pub const MARKET_VOLATILITY_CRITICAL: f64 = 30.0;
/// Market volatility at or above which conditions are a warning.
pub const MARKET_VOLATILITY_WARNING: f64 = 20.0;

/// Customer churn (%) above which churn is critical.
pub const CHURN_RATE_CRITICAL: f64 = 12.0;
/// Customer churn (%) above which churn is a warning.
pub const CHURN_RATE_WARNING: f64 = 8.0;

/// Inflation (%) above which inflation is critical.
pub const INFLATION_CRITICAL: f64 = 8.0;
/// Inflation (%) above which inflation is a warning.
pub const INFLATION_WARNING: f64 = 5.0;

/// Supply chain disruption (%) above which disruption is critical.
pub const SUPPLY_CHAIN_CRITICAL: f64 = 25.0;
/// Supply chain disruption (%) above which disruption is a warning.
pub const SUPPLY_CHAIN_WARNING: f64 = 15.0;

/// Economic sentiment below which, combined with weak financial health,
/// the economy is flagged as a headwind.
pub const ECONOMIC_SENTIMENT_LOW: f64 = 40.0;
pub const FINANCIAL_HEALTH_LOW: f64 = 60.0;

/// Market events above this severity raise an alert...
pub const MARKET_EVENT_ALERT_SEVERITY: f64 = 0.2;
/// ...and above this one the alert is critical.
pub const MARKET_EVENT_CRITICAL_SEVERITY: f64 = 0.3;
