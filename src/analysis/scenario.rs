//! What-if projection on top of the current KPIs

use serde::{Deserialize, Serialize};

use crate::core::types::KpiKind;
use crate::generators::KpiData;

/// Used when the KPI set has no revenue record
pub const DEFAULT_REVENUE: f64 = 2_400_000.0;
/// Used when the KPI set has no expense record
pub const DEFAULT_EXPENSES: f64 = 1_800_000.0;

/// Percentage adjustments applied to the current figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInputs {
    pub revenue_change: f64,
    pub expense_change: f64,
    pub market_growth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedResults {
    pub new_revenue: f64,
    pub new_expenses: f64,
    pub new_profit: f64,
    /// Against the current profit, in percent; zero when current profit is zero
    pub profit_change: f64,
}

fn raw_or(kpis: &[KpiData], kind: KpiKind, default: f64) -> f64 {
    kpis.iter()
        .find(|k| k.kind() == Some(kind))
        .map(|k| k.raw_value)
        .unwrap_or(default)
}

pub fn project(kpis: &[KpiData], inputs: &ScenarioInputs) -> ProjectedResults {
    let revenue = raw_or(kpis, KpiKind::MonthlyRevenue, DEFAULT_REVENUE);
    let expenses = raw_or(kpis, KpiKind::OperatingExpenses, DEFAULT_EXPENSES);
    let current_profit = revenue - expenses;

    let new_revenue = revenue * (1.0 + inputs.revenue_change / 100.0) * (1.0 + inputs.market_growth / 100.0);
    let new_expenses = expenses * (1.0 + inputs.expense_change / 100.0);
    let new_profit = new_revenue - new_expenses;
    let profit_change = if current_profit != 0.0 {
        (new_profit - current_profit) / current_profit * 100.0
    } else {
        0.0
    };

    ProjectedResults { new_revenue, new_expenses, new_profit, profit_change }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_inputs_change_nothing() {
        let results = project(&[], &ScenarioInputs::default());
        assert_eq!(results.new_revenue, DEFAULT_REVENUE);
        assert_eq!(results.new_expenses, DEFAULT_EXPENSES);
        assert_eq!(results.new_profit, 600_000.0);
        assert_eq!(results.profit_change, 0.0);
    }

    #[test]
    fn test_compound_revenue_growth() {
        let inputs = ScenarioInputs { revenue_change: 10.0, expense_change: 5.0, market_growth: 10.0 };
        let results = project(&[], &inputs);
        assert!((results.new_revenue - 2_904_000.0).abs() < 1e-6);
        assert!((results.new_expenses - 1_890_000.0).abs() < 1e-6);
        assert!((results.profit_change - 69.0).abs() < 1e-9);
    }

    #[test]
    fn test_uses_kpi_raw_values() {
        let kpis = [
            KpiData::with_raw(KpiKind::MonthlyRevenue, 1_000_000.0, 0.0),
            KpiData::with_raw(KpiKind::OperatingExpenses, 1_000_000.0, 0.0),
        ];
        let results = project(&kpis, &ScenarioInputs { revenue_change: 10.0, ..ScenarioInputs::default() });
        assert!((results.new_profit - 100_000.0).abs() < 1e-6);
        assert_eq!(results.profit_change, 0.0);
    }
}
