use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::retry::RetryConfig;
use crate::estimator::{
    DEFAULT_AVG_ITEM_WEIGHT_KG, DEFAULT_CO2_PER_ITEM_KG, DEFAULT_COVERAGE_FRACTIONS,
};
use crate::io::output::OutputFormat;
use crate::population::{PopulationSourceKind, DEFAULT_POPULATION_YEAR};
use crate::waste::US_WASTE_KG_PER_CAPITA;

/// Root configuration structure (`.wardrobe.toml`)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WardrobeConfig {
    #[serde(default)]
    pub scenarios: ScenariosConfig,

    #[serde(default)]
    pub waste: WasteConfig,

    #[serde(default)]
    pub population: PopulationConfig,

    #[serde(default)]
    pub countries: CountriesConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Scenario set and impact factors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenariosConfig {
    /// Share of clothing purchases redirected to resale, each in (0, 1]
    #[serde(default = "default_coverage_fractions")]
    pub coverage_fractions: Vec<f64>,

    /// Average garment weight in kg
    #[serde(default = "default_avg_item_weight_kg")]
    pub avg_item_weight_kg: f64,

    /// kg CO2e avoided per second-hand item
    #[serde(default = "default_co2_per_item_kg")]
    pub co2_per_item_kg: f64,

    /// Accept 0.0 as a coverage fraction
    #[serde(default)]
    pub allow_zero_coverage: bool,
}

impl Default for ScenariosConfig {
    fn default() -> Self {
        Self {
            coverage_fractions: default_coverage_fractions(),
            avg_item_weight_kg: default_avg_item_weight_kg(),
            co2_per_item_kg: default_co2_per_item_kg(),
            allow_zero_coverage: false,
        }
    }
}

/// Per-capita waste sources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WasteConfig {
    /// CSV files merged in order; later files override earlier ones
    #[serde(default)]
    pub sources: Vec<PathBuf>,

    /// Aggregate labels to drop in addition to the built-in list
    #[serde(default)]
    pub aggregate_labels: Vec<String>,

    /// Single-country rows appended after all files
    #[serde(default = "default_supplements")]
    pub supplements: Vec<WasteSupplement>,
}

impl Default for WasteConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            aggregate_labels: Vec::new(),
            supplements: default_supplements(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WasteSupplement {
    pub country: String,
    pub waste_kg_per_capita: f64,
}

/// Population lookup settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopulationConfig {
    #[serde(default)]
    pub source: PopulationSourceKind,

    #[serde(default = "default_population_year")]
    pub year: i32,

    /// Concurrent lookups (0 = number of CPUs, capped at 8)
    #[serde(default)]
    pub jobs: usize,

    /// Overall deadline for all lookups
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// CSV with `country,population` rows
    #[serde(default)]
    pub override_file: Option<PathBuf>,

    /// Country label -> persons. Always wins over the live source.
    #[serde(default)]
    pub overrides: BTreeMap<String, u64>,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            source: PopulationSourceKind::default(),
            year: default_population_year(),
            jobs: 0,
            timeout_seconds: default_timeout_seconds(),
            override_file: None,
            overrides: BTreeMap::new(),
            retry: RetryConfig::default(),
        }
    }
}

impl PopulationConfig {
    pub fn worker_count(&self) -> usize {
        if self.jobs == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .min(8)
        } else {
            self.jobs
        }
    }
}

/// Country identity tables
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CountriesConfig {
    /// CSV with `official_name_en` and `ISO3166-1-Alpha-3` columns
    #[serde(default)]
    pub iso_table: Option<PathBuf>,

    /// Label -> alpha-3 code, consulted before any other table
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Rows shown per scenario in terminal/markdown output
    #[serde(default)]
    pub top: Option<usize>,
}

fn default_coverage_fractions() -> Vec<f64> {
    DEFAULT_COVERAGE_FRACTIONS.to_vec()
}

fn default_avg_item_weight_kg() -> f64 {
    DEFAULT_AVG_ITEM_WEIGHT_KG
}

fn default_co2_per_item_kg() -> f64 {
    DEFAULT_CO2_PER_ITEM_KG
}

fn default_supplements() -> Vec<WasteSupplement> {
    vec![WasteSupplement {
        country: "United States".to_string(),
        waste_kg_per_capita: US_WASTE_KG_PER_CAPITA,
    }]
}

fn default_population_year() -> i32 {
    DEFAULT_POPULATION_YEAR
}

fn default_timeout_seconds() -> u64 {
    60
}
