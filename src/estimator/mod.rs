//! Scenario estimation: the numeric core.
//!
//! A pure function of a waste table, a population table and a validated
//! [`ScenarioConfig`]. No I/O, no rounding. For each country present in both
//! tables and each coverage fraction:
//!
//! ```text
//! annual_waste_kg  = waste_kg_per_capita * population
//! avoided_waste_kg = annual_waste_kg * coverage_fraction
//! avoided_items    = avoided_waste_kg / avg_item_weight_kg
//! avoided_co2_kg   = avoided_items * co2_per_item_kg
//! ```
//!
//! Rows are ordered by coverage fraction ascending, then avoided CO2
//! descending, then country key ascending. Identical inputs give identical
//! output, order included.

mod summary;

pub use summary::{summarize, ScenarioSummary};

use crate::country::CountryKey;
use crate::diagnostics::{Dataset, Exclusion, ExclusionReason};
use crate::error::WardrobeError;
use crate::observability::PipelinePhase;
use crate::population::PopulationTable;
use crate::waste::WasteTable;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Scenarios evaluated when none are configured.
pub const DEFAULT_COVERAGE_FRACTIONS: &[f64] = &[0.10, 0.25];

/// Average garment weight (kg).
pub const DEFAULT_AVG_ITEM_WEIGHT_KG: f64 = 0.6;

/// CO2e avoided per second-hand item instead of a new one (kg).
pub const DEFAULT_CO2_PER_ITEM_KG: f64 = 1.25;

/// Validated scenario set and impact factors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioConfig {
    coverage_fractions: Vec<f64>,
    avg_item_weight_kg: f64,
    co2_per_item_kg: f64,
}

impl ScenarioConfig {
    /// Validate and build. Duplicate fractions collapse into one scenario;
    /// fractions are kept in ascending order.
    pub fn new(
        coverage_fractions: &[f64],
        avg_item_weight_kg: f64,
        co2_per_item_kg: f64,
        allow_zero_coverage: bool,
    ) -> Result<Self, WardrobeError> {
        let problems = scenario_problems(
            coverage_fractions,
            avg_item_weight_kg,
            co2_per_item_kg,
            allow_zero_coverage,
        );
        if !problems.is_empty() {
            return Err(WardrobeError::invalid_scenarios(problems));
        }

        let mut fractions = coverage_fractions.to_vec();
        fractions.sort_by(f64::total_cmp);
        fractions.dedup();

        Ok(Self {
            coverage_fractions: fractions,
            avg_item_weight_kg,
            co2_per_item_kg,
        })
    }

    pub fn coverage_fractions(&self) -> &[f64] {
        &self.coverage_fractions
    }

    pub fn avg_item_weight_kg(&self) -> f64 {
        self.avg_item_weight_kg
    }

    pub fn co2_per_item_kg(&self) -> f64 {
        self.co2_per_item_kg
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            coverage_fractions: DEFAULT_COVERAGE_FRACTIONS.to_vec(),
            avg_item_weight_kg: DEFAULT_AVG_ITEM_WEIGHT_KG,
            co2_per_item_kg: DEFAULT_CO2_PER_ITEM_KG,
        }
    }
}

/// Every problem with a scenario configuration, one message each.
pub fn scenario_problems(
    coverage_fractions: &[f64],
    avg_item_weight_kg: f64,
    co2_per_item_kg: f64,
    allow_zero_coverage: bool,
) -> Vec<String> {
    let mut problems = Vec::new();

    if coverage_fractions.is_empty() {
        problems.push("at least one coverage fraction is required".to_string());
    }
    for &fraction in coverage_fractions {
        let lower_ok = if allow_zero_coverage {
            fraction >= 0.0
        } else {
            fraction > 0.0
        };
        if !(fraction.is_finite() && lower_ok && fraction <= 1.0) {
            let range = if allow_zero_coverage { "[0, 1]" } else { "(0, 1]" };
            problems.push(format!(
                "coverage fraction {fraction} is outside {range}"
            ));
        }
    }
    if !(avg_item_weight_kg.is_finite() && avg_item_weight_kg > 0.0) {
        problems.push(format!(
            "avg_item_weight_kg must be positive (got {avg_item_weight_kg})"
        ));
    }
    if !(co2_per_item_kg.is_finite() && co2_per_item_kg > 0.0) {
        problems.push(format!(
            "co2_per_item_kg must be positive (got {co2_per_item_kg})"
        ));
    }
    problems
}

/// One row per (country, scenario).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryEstimate {
    pub country_key: CountryKey,
    pub country_display_name: String,
    pub waste_kg_per_capita: f64,
    pub population: u64,
    pub coverage_fraction: f64,
    pub annual_waste_kg: f64,
    pub avoided_waste_kg: f64,
    pub avoided_items: f64,
    pub avoided_co2_kg: f64,
}

/// A country present in only one of the two tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingJoin {
    pub country_key: CountryKey,
    pub display_name: String,
    pub missing_from: Dataset,
}

impl MissingJoin {
    pub fn to_exclusion(&self) -> Exclusion {
        Exclusion::new(
            self.display_name.clone(),
            Some(self.country_key.clone()),
            PipelinePhase::Estimation,
            ExclusionReason::MissingJoinData {
                missing_from: self.missing_from,
            },
        )
    }
}

/// Estimator output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EstimateTable {
    pub rows: Vec<CountryEstimate>,
    pub missing: Vec<MissingJoin>,
}

impl EstimateTable {
    /// Distinct countries with at least one row.
    pub fn country_count(&self) -> usize {
        let mut keys: Vec<&CountryKey> = self.rows.iter().map(|r| &r.country_key).collect();
        keys.sort();
        keys.dedup();
        keys.len()
    }

    /// Rows of one scenario, in output order.
    pub fn scenario_rows(&self, coverage_fraction: f64) -> impl Iterator<Item = &CountryEstimate> {
        self.rows
            .iter()
            .filter(move |r| r.coverage_fraction == coverage_fraction)
    }
}

/// Derive the four quantities for one country and coverage fraction.
pub fn estimate_row(
    waste_kg_per_capita: f64,
    population: u64,
    coverage_fraction: f64,
    config: &ScenarioConfig,
) -> (f64, f64, f64, f64) {
    let annual_waste_kg = waste_kg_per_capita * population as f64;
    let avoided_waste_kg = annual_waste_kg * coverage_fraction;
    let avoided_items = avoided_waste_kg / config.avg_item_weight_kg;
    let avoided_co2_kg = avoided_items * config.co2_per_item_kg;
    (annual_waste_kg, avoided_waste_kg, avoided_items, avoided_co2_kg)
}

/// Join both tables on country key and evaluate every scenario.
pub fn estimate(
    waste: &WasteTable,
    population: &PopulationTable,
    config: &ScenarioConfig,
) -> EstimateTable {
    let mut table = EstimateTable::default();

    for record in waste.iter() {
        let Some(people) = population.get(&record.country_key) else {
            table.missing.push(MissingJoin {
                country_key: record.country_key.clone(),
                display_name: record.display_name.clone(),
                missing_from: Dataset::Population,
            });
            continue;
        };

        for &coverage_fraction in config.coverage_fractions() {
            let (annual_waste_kg, avoided_waste_kg, avoided_items, avoided_co2_kg) = estimate_row(
                record.waste_kg_per_capita,
                people.population,
                coverage_fraction,
                config,
            );
            table.rows.push(CountryEstimate {
                country_key: record.country_key.clone(),
                country_display_name: record.display_name.clone(),
                waste_kg_per_capita: record.waste_kg_per_capita,
                population: people.population,
                coverage_fraction,
                annual_waste_kg,
                avoided_waste_kg,
                avoided_items,
                avoided_co2_kg,
            });
        }
    }

    table.missing.extend(
        population
            .keys()
            .filter(|key| !waste.contains(key))
            .map(|key| MissingJoin {
                country_key: key.clone(),
                display_name: key.to_string(),
                missing_from: Dataset::Waste,
            }),
    );

    table.rows.sort_by(compare_rows);
    table
}

fn compare_rows(a: &CountryEstimate, b: &CountryEstimate) -> Ordering {
    a.coverage_fraction
        .total_cmp(&b.coverage_fraction)
        .then_with(|| b.avoided_co2_kg.total_cmp(&a.avoided_co2_kg))
        .then_with(|| a.country_key.cmp(&b.country_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::{PopulationOrigin, PopulationRecord};
    use crate::waste::WasteRecord;
    use pretty_assertions::assert_eq;

    fn key(code: &str) -> CountryKey {
        CountryKey::parse(code).unwrap()
    }

    fn waste(code: &str, kg: f64) -> WasteRecord {
        WasteRecord {
            country_key: key(code),
            display_name: code.to_string(),
            waste_kg_per_capita: kg,
            source: "test".into(),
        }
    }

    fn people(code: &str, population: u64) -> PopulationRecord {
        PopulationRecord {
            country_key: key(code),
            population,
            as_of_year: 2023,
            origin: PopulationOrigin::Override,
        }
    }

    #[test]
    fn test_reference_scenario_exact() {
        let config = ScenarioConfig::new(&[0.25], 0.6, 1.25, false).unwrap();
        let table = estimate(
            &[waste("USA", 40.22)].into_iter().collect(),
            &[people("USA", 327_000_000)].into_iter().collect(),
            &config,
        );

        let row = &table.rows[0];
        assert_eq!(row.annual_waste_kg, 13_151_940_000.0);
        assert_eq!(row.avoided_waste_kg, 3_287_985_000.0);
        assert_eq!(row.avoided_items, 5_479_975_000.0);
        assert_eq!(row.avoided_co2_kg, 6_849_968_750.0);
    }

    #[test]
    fn test_full_coverage_avoids_everything() {
        let config = ScenarioConfig::new(&[1.0], 0.6, 1.25, false).unwrap();
        let table = estimate(
            &[waste("FIN", 13.37)].into_iter().collect(),
            &[people("FIN", 5_500_000)].into_iter().collect(),
            &config,
        );
        assert_eq!(table.rows[0].avoided_waste_kg, table.rows[0].annual_waste_kg);
    }

    #[test]
    fn test_zero_population_is_all_zero() {
        let table = estimate(
            &[waste("MLT", 10.0)].into_iter().collect(),
            &[people("MLT", 0)].into_iter().collect(),
            &ScenarioConfig::default(),
        );
        assert_eq!(table.rows.len(), 2);
        for row in &table.rows {
            assert_eq!(row.annual_waste_kg, 0.0);
            assert_eq!(row.avoided_co2_kg, 0.0);
        }
    }

    #[test]
    fn test_join_excludes_one_sided_countries() {
        let table = estimate(
            &[waste("DEU", 19.5), waste("NOR", 20.0)].into_iter().collect(),
            &[people("DEU", 83_000_000), people("ITA", 60_000_000)]
                .into_iter()
                .collect(),
            &ScenarioConfig::default(),
        );
        assert_eq!(table.country_count(), 1);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(
            table.missing,
            vec![
                MissingJoin {
                    country_key: key("NOR"),
                    display_name: "NOR".into(),
                    missing_from: Dataset::Population,
                },
                MissingJoin {
                    country_key: key("ITA"),
                    display_name: "ITA".into(),
                    missing_from: Dataset::Waste,
                },
            ]
        );
    }

    #[test]
    fn test_ordering_by_scenario_then_co2_then_key() {
        let table = estimate(
            &[waste("AUT", 10.0), waste("BEL", 10.0), waste("DEU", 19.5)]
                .into_iter()
                .collect(),
            &[
                people("AUT", 9_000_000),
                people("BEL", 9_000_000),
                people("DEU", 83_000_000),
            ]
            .into_iter()
            .collect(),
            &ScenarioConfig::new(&[0.25, 0.10], 0.6, 1.25, false).unwrap(),
        );

        let order: Vec<(f64, &str)> = table
            .rows
            .iter()
            .map(|r| (r.coverage_fraction, r.country_key.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (0.10, "DEU"),
                (0.10, "AUT"),
                (0.10, "BEL"),
                (0.25, "DEU"),
                (0.25, "AUT"),
                (0.25, "BEL"),
            ]
        );
        assert_eq!(table.scenario_rows(0.25).count(), 3);
    }

    #[test]
    fn test_scenario_validation() {
        assert!(ScenarioConfig::new(&[], 0.6, 1.25, false).is_err());
        assert!(ScenarioConfig::new(&[0.0], 0.6, 1.25, false).is_err());
        assert!(ScenarioConfig::new(&[0.0], 0.6, 1.25, true).is_ok());
        assert!(ScenarioConfig::new(&[1.01], 0.6, 1.25, true).is_err());
        assert!(ScenarioConfig::new(&[f64::NAN], 0.6, 1.25, false).is_err());
        assert!(ScenarioConfig::new(&[0.5], 0.0, 1.25, false).is_err());
        assert!(ScenarioConfig::new(&[0.5], 0.6, -1.25, false).is_err());

        let problems = scenario_problems(&[2.0, -0.1], 0.0, 0.0, false);
        assert_eq!(problems.len(), 4);
    }

    #[test]
    fn test_duplicate_fractions_collapse() {
        let config = ScenarioConfig::new(&[0.25, 0.1, 0.25], 0.6, 1.25, false).unwrap();
        assert_eq!(config.coverage_fractions(), &[0.1, 0.25]);
    }
}
