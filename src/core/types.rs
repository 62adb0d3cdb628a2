//! Core type definitions used throughout the codebase

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::CfoError;

/// Wall-clock instant in milliseconds since the Unix epoch
pub type Timestamp = i64;

/// Milliseconds in one simulated day
pub const MS_PER_DAY: i64 = 86_400_000;

/// Priority shared by alerts and insights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank, higher is more urgent
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// Direction of a KPI change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// Zero change reads as down, matching the dashboard arrows
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }
}

/// The four headline KPIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KpiKind {
    MonthlyRevenue,
    OperatingExpenses,
    NetProfitMargin,
    CashFlow,
}

impl KpiKind {
    pub const ALL: [KpiKind; 4] = [
        KpiKind::MonthlyRevenue,
        KpiKind::OperatingExpenses,
        KpiKind::NetProfitMargin,
        KpiKind::CashFlow,
    ];

    /// Display title, also the lookup key used by drill-down requests
    pub fn title(self) -> &'static str {
        match self {
            KpiKind::MonthlyRevenue => "Monthly Revenue",
            KpiKind::OperatingExpenses => "Operating Expenses",
            KpiKind::NetProfitMargin => "Net Profit Margin",
            KpiKind::CashFlow => "Cash Flow",
        }
    }

    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.title().eq_ignore_ascii_case(title.trim()))
    }
}

impl fmt::Display for KpiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for KpiKind {
    type Err = CfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_title(s).ok_or_else(|| CfoError::UnknownKpi(s.to_string()))
    }
}

/// Horizon of a historical KPI series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
}

impl TimeRange {
    pub fn days(self) -> u32 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
            TimeRange::Year => 365,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Quarter => "90d",
            TimeRange::Year => "1y",
        }
    }
}

impl FromStr for TimeRange {
    type Err = CfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7d" => Ok(TimeRange::Week),
            "30d" => Ok(TimeRange::Month),
            "90d" => Ok(TimeRange::Quarter),
            "1y" => Ok(TimeRange::Year),
            other => Err(CfoError::UnknownTimeRange(other.to_string())),
        }
    }
}

/// Logical data stream served by the dashboard
///
/// Each stream carries its own request epoch, latency and polling interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataStream {
    Kpi,
    CashFlow,
    Budget,
    Risk,
    Insights,
    Historical,
    KpiInsights,
}

impl DataStream {
    pub const ALL: [DataStream; 7] = [
        DataStream::Kpi,
        DataStream::CashFlow,
        DataStream::Budget,
        DataStream::Risk,
        DataStream::Insights,
        DataStream::Historical,
        DataStream::KpiInsights,
    ];

    /// Dense index for per-stream tables
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            DataStream::Kpi => "KPI",
            DataStream::CashFlow => "cash flow",
            DataStream::Budget => "budget",
            DataStream::Risk => "risk",
            DataStream::Insights => "insights",
            DataStream::Historical => "historical",
            DataStream::KpiInsights => "KPI insights",
        }
    }
}

impl fmt::Display for DataStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kpi_title_lookup_ignores_case() {
        assert_eq!(KpiKind::from_title("net profit margin"), Some(KpiKind::NetProfitMargin));
        assert_eq!(KpiKind::from_title(" Cash Flow "), Some(KpiKind::CashFlow));
        assert_eq!(KpiKind::from_title("EBITDA"), None);
    }

    #[test]
    fn test_time_range_parse() {
        assert_eq!("90d".parse::<TimeRange>().unwrap(), TimeRange::Quarter);
        assert_eq!("1y".parse::<TimeRange>().unwrap().days(), 365);
        assert!("2w".parse::<TimeRange>().is_err());
    }

    #[test]
    fn test_trend_zero_is_down() {
        assert_eq!(Trend::from_change(0.0), Trend::Down);
        assert_eq!(Trend::from_change(0.1), Trend::Up);
    }

    #[test]
    fn test_stream_indices_are_dense() {
        for (i, stream) in DataStream::ALL.iter().enumerate() {
            assert_eq!(stream.index(), i);
        }
    }

    #[test]
    fn test_priority_rank_ordering() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
    }
}
