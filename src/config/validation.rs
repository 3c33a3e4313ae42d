//! Configuration validation with error accumulation.
//!
//! Every check runs and every problem is reported in one error, so a user
//! fixing `.wardrobe.toml` sees all issues in a single run. Validation
//! happens before any data is loaded.

use super::core::{CountriesConfig, PopulationConfig, WardrobeConfig, WasteConfig};
use crate::country::CountryKey;
use crate::error::WardrobeError;
use crate::estimator::scenario_problems;

const FIRST_INDICATOR_YEAR: i32 = 1960;
const LAST_INDICATOR_YEAR: i32 = 2100;
/// One day.
pub const MAX_TIMEOUT_SECONDS: u64 = 86_400;
const MAX_RETRY_DELAY_MS: u64 = 600_000;

/// Validate the whole config. Scenario problems make the error an
/// `InvalidScenarioConfiguration`; anything else is a `Config` error.
pub fn validate_config(config: &WardrobeConfig) -> Result<(), WardrobeError> {
    let scenario = scenario_problems(
        &config.scenarios.coverage_fractions,
        config.scenarios.avg_item_weight_kg,
        config.scenarios.co2_per_item_kg,
        config.scenarios.allow_zero_coverage,
    );

    let other: Vec<String> = [
        validate_waste(&config.waste),
        validate_population(&config.population),
        validate_countries(&config.countries),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !scenario.is_empty() {
        let mut problems = scenario;
        problems.extend(other);
        return Err(WardrobeError::invalid_scenarios(problems));
    }
    if !other.is_empty() {
        return Err(WardrobeError::config(other.join("; "), None));
    }
    Ok(())
}

fn validate_waste(waste: &WasteConfig) -> Vec<String> {
    let mut problems = Vec::new();
    for supplement in &waste.supplements {
        if supplement.country.trim().is_empty() {
            problems.push("waste.supplements: country label is empty".to_string());
        }
        if !(supplement.waste_kg_per_capita.is_finite() && supplement.waste_kg_per_capita > 0.0) {
            problems.push(format!(
                "waste.supplements.{}: waste_kg_per_capita must be positive (got {})",
                supplement.country, supplement.waste_kg_per_capita
            ));
        }
    }
    problems
}

fn validate_population(population: &PopulationConfig) -> Vec<String> {
    let mut problems = Vec::new();
    if !(FIRST_INDICATOR_YEAR..=LAST_INDICATOR_YEAR).contains(&population.year) {
        problems.push(format!(
            "population.year out of range: {} (must be {FIRST_INDICATOR_YEAR}-{LAST_INDICATOR_YEAR})",
            population.year
        ));
    }
    if !(1..=MAX_TIMEOUT_SECONDS).contains(&population.timeout_seconds) {
        problems.push(format!(
            "population.timeout_seconds out of range: {} (must be 1-{MAX_TIMEOUT_SECONDS})",
            population.timeout_seconds
        ));
    }
    if population.retry.max_delay_ms > MAX_RETRY_DELAY_MS {
        problems.push(format!(
            "population.retry.max_delay_ms too large: {} (at most {MAX_RETRY_DELAY_MS})",
            population.retry.max_delay_ms
        ));
    }
    if population.overrides.keys().any(|label| label.trim().is_empty()) {
        problems.push("population.overrides: country label is empty".to_string());
    }
    problems
}

fn validate_countries(countries: &CountriesConfig) -> Vec<String> {
    countries
        .overrides
        .iter()
        .filter(|(_, code)| CountryKey::parse(code).is_none())
        .map(|(label, code)| {
            format!("countries.overrides.{label}: '{code}' is not an ISO-3166 alpha-3 code")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WasteSupplement;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&WardrobeConfig::default()).is_ok());
    }

    #[test]
    fn test_scenario_problems_accumulate() {
        let mut config = WardrobeConfig::default();
        config.scenarios.coverage_fractions = vec![0.0, 1.2];
        config.scenarios.co2_per_item_kg = -1.0;
        config.population.year = 1800;

        match validate_config(&config) {
            Err(WardrobeError::InvalidScenarioConfiguration { problems }) => {
                assert_eq!(problems.len(), 4, "{problems:?}");
                assert!(problems.iter().any(|p| p.contains("population.year")));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_non_scenario_problems_are_config_errors() {
        let mut config = WardrobeConfig::default();
        config
            .countries
            .overrides
            .insert("Kosovo".into(), "KOS1".into());
        config.waste.supplements = vec![WasteSupplement {
            country: "United States".into(),
            waste_kg_per_capita: 0.0,
        }];

        match validate_config(&config) {
            Err(WardrobeError::Config { message, .. }) => {
                assert!(message.contains("KOS1"));
                assert!(message.contains("waste_kg_per_capita"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_population_timeout_is_bounded() {
        let mut config = WardrobeConfig::default();
        config.population.timeout_seconds = u64::MAX;
        config.population.retry.max_delay_ms = u64::MAX;

        match validate_config(&config) {
            Err(WardrobeError::Config { message, .. }) => {
                assert!(message.contains("timeout_seconds out of range"), "{message}");
                assert!(message.contains("max_delay_ms too large"), "{message}");
            }
            other => panic!("unexpected: {other:?}"),
        }

        config.population.timeout_seconds = MAX_TIMEOUT_SECONDS;
        config.population.retry.max_delay_ms = 1_000;
        assert!(validate_config(&config).is_ok());

        config.population.timeout_seconds = 0;
        assert!(validate_config(&config).is_err());
    }
}
