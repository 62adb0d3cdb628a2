//! Summary statistics over a KPI history

use serde::{Deserialize, Serialize};

use crate::generators::KpiHistoricalData;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    /// Last point against the one before it, in percent
    pub change: f64,
    /// Points strictly above the average
    pub days_above_average: usize,
    /// Share of day-over-day increases, in percent
    pub growth_consistency: f64,
}

impl SeriesStats {
    /// `None` for series shorter than two points
    pub fn from_series(series: &[KpiHistoricalData]) -> Option<Self> {
        if series.len() < 2 {
            return None;
        }
        let values: Vec<f64> = series.iter().map(|p| p.value).collect();

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = values.iter().sum::<f64>() / values.len() as f64;

        let latest = values[values.len() - 1];
        let previous = values[values.len() - 2];
        let change = if previous != 0.0 { (latest - previous) / previous * 100.0 } else { 0.0 };

        let days_above_average = values.iter().filter(|v| **v > avg).count();
        let rises = values.windows(2).filter(|w| w[1] > w[0]).count();
        let growth_consistency = rises as f64 / (values.len() - 1) as f64 * 100.0;

        Some(Self { min, max, avg, change, days_above_average, growth_consistency })
    }

    pub fn is_positive(&self) -> bool {
        self.change >= 0.0
    }
}
