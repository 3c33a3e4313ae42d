use super::{EstimateTable, ScenarioConfig};
use serde::{Deserialize, Serialize};

/// Totals across all countries for one coverage fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub coverage_fraction: f64,
    pub countries: usize,
    pub total_annual_waste_kg: f64,
    pub total_avoided_waste_kg: f64,
    pub total_avoided_items: f64,
    pub total_avoided_co2_kg: f64,
}

impl ScenarioSummary {
    fn empty(coverage_fraction: f64) -> Self {
        Self {
            coverage_fraction,
            countries: 0,
            total_annual_waste_kg: 0.0,
            total_avoided_waste_kg: 0.0,
            total_avoided_items: 0.0,
            total_avoided_co2_kg: 0.0,
        }
    }
}

/// One summary per configured scenario, in ascending coverage order. A
/// scenario with no joined countries still gets a zero summary.
pub fn summarize(table: &EstimateTable, config: &ScenarioConfig) -> Vec<ScenarioSummary> {
    config
        .coverage_fractions()
        .iter()
        .map(|&fraction| {
            table
                .scenario_rows(fraction)
                .fold(ScenarioSummary::empty(fraction), |mut acc, row| {
                    acc.countries += 1;
                    acc.total_annual_waste_kg += row.annual_waste_kg;
                    acc.total_avoided_waste_kg += row.avoided_waste_kg;
                    acc.total_avoided_items += row.avoided_items;
                    acc.total_avoided_co2_kg += row.avoided_co2_kg;
                    acc
                })
        })
        .collect()
}
