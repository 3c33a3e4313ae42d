//! End-to-end orchestration.
//!
//! Data flows one way: identity normalization, waste loading, population
//! resolution, estimation. Each stage fully consumes its input before the next
//! one starts; the estimator never sees a partially resolved population table.

use crate::config::{
    CountriesConfig, PopulationConfig, ScenariosConfig, WardrobeConfig, WasteConfig,
};
use crate::country::{CountryKey, CountryNormalizer};
use crate::diagnostics::{Dataset, Diagnostics};
use crate::error::WardrobeError;
use crate::estimator::{estimate, summarize, CountryEstimate, ScenarioConfig, ScenarioSummary};
use crate::io::tables::{read_iso_table, read_population_overrides, read_waste_csv};
use crate::observability::{phase_span, PipelinePhase};
use crate::population::{
    resolve_populations, FanoutSettings, PopulationOverrides, PopulationSource,
    PopulationSourceKind, StaticSource, WorldBankSource,
};
use crate::progress::ProgressConfig;
use crate::waste::{load_waste, AggregateFilter, WasteSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Per-request deadline for a single live lookup.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Everything a run needs besides the data itself.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub scenarios: ScenariosConfig,
    /// Aggregate labels dropped in addition to the built-in list
    pub aggregate_labels: Vec<String>,
    /// `(label, persons)` pairs; later entries win for the same country
    pub population_overrides: Vec<(String, u64)>,
    pub fanout: FanoutSettings,
}

impl PipelineConfig {
    /// Build from a loaded config. Reads the population override file if one
    /// is configured; inline overrides win over file entries.
    pub fn from_config(
        config: &WardrobeConfig,
        progress: ProgressConfig,
    ) -> Result<Self, WardrobeError> {
        let population_overrides = collect_population_overrides(&config.population)?;
        Ok(Self {
            scenarios: config.scenarios.clone(),
            aggregate_labels: config.waste.aggregate_labels.clone(),
            population_overrides,
            fanout: FanoutSettings {
                year: config.population.year,
                jobs: config.population.worker_count(),
                timeout: Duration::from_secs(config.population.timeout_seconds),
                retry: config.population.retry.clone(),
                progress,
            },
        })
    }
}

fn collect_population_overrides(
    population: &PopulationConfig,
) -> Result<Vec<(String, u64)>, WardrobeError> {
    let mut overrides = match &population.override_file {
        Some(path) => read_population_overrides(path)?,
        None => Vec::new(),
    };
    overrides.extend(
        population
            .overrides
            .iter()
            .map(|(label, persons)| (label.clone(), *persons)),
    );
    Ok(overrides)
}

/// Run parameters recorded alongside the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub waste_sources: Vec<String>,
    pub population_source: String,
    pub population_year: i32,
    pub coverage_fractions: Vec<f64>,
    pub avg_item_weight_kg: f64,
    pub co2_per_item_kg: f64,
    /// Countries present in the output
    pub countries: usize,
    pub excluded: usize,
    pub duration_ms: u64,
}

/// Final output of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub metadata: ReportMetadata,
    pub estimates: Vec<CountryEstimate>,
    pub summaries: Vec<ScenarioSummary>,
    pub diagnostics: Diagnostics,
}

/// Run the whole pipeline.
///
/// The scenario configuration is validated before anything is loaded. With
/// `source = None` only overrides supply populations. Per-country failures are
/// recorded in the report's diagnostics; the only run-level failures are an
/// invalid scenario configuration and a population source that could not be
/// reached for any country.
pub fn run_pipeline(
    config: &PipelineConfig,
    normalizer: &CountryNormalizer,
    sources: Vec<WasteSource>,
    source: Option<Arc<dyn PopulationSource>>,
) -> Result<PipelineReport, WardrobeError> {
    let started = Instant::now();
    let scenarios = ScenarioConfig::new(
        &config.scenarios.coverage_fractions,
        config.scenarios.avg_item_weight_kg,
        config.scenarios.co2_per_item_kg,
        config.scenarios.allow_zero_coverage,
    )?;
    let mut diagnostics = Diagnostics::new();
    let source_name = source
        .as_ref()
        .map(|s| s.name().to_string())
        .unwrap_or_else(|| "overrides only".to_string());

    let waste = {
        let _span = phase_span(PipelinePhase::WasteLoading);
        let aggregates = AggregateFilter::builtin()
            .with_extra(config.aggregate_labels.iter().map(String::as_str));
        load_waste(&sources, normalizer, &aggregates)
    };
    diagnostics.extend(waste.exclusions);

    let population = {
        let _span = phase_span(PipelinePhase::PopulationResolution);
        let overrides = PopulationOverrides::from_labels(
            config
                .population_overrides
                .iter()
                .map(|(label, persons)| (label.as_str(), *persons)),
            normalizer,
        );
        resolve_populations(
            waste.table.keys().cloned(),
            &overrides,
            source,
            &config.fanout,
        )
    };
    if let Some(countries) = population.source_outage() {
        let message = population
            .failures
            .first()
            .map(|f| f.error.to_string())
            .unwrap_or_default();
        return Err(WardrobeError::SourceUnavailable {
            source_name,
            countries,
            message,
        });
    }
    diagnostics.extend(population.exclusions.iter().cloned());
    diagnostics.extend(population.failure_exclusions());

    let (table, summaries) = {
        let _span = phase_span(PipelinePhase::Estimation);
        let table = estimate(&waste.table, &population.table, &scenarios);

        // Failed lookups were already recorded with their cause
        let failed: HashSet<&CountryKey> = population.failures.iter().map(|f| &f.key).collect();
        diagnostics.extend(
            table
                .missing
                .iter()
                .filter(|m| {
                    !(m.missing_from == Dataset::Population && failed.contains(&m.country_key))
                })
                .map(|m| m.to_exclusion()),
        );

        let summaries = summarize(&table, &scenarios);
        tracing::info!(
            rows = table.rows.len(),
            countries = table.country_count(),
            scenarios = scenarios.coverage_fractions().len(),
            "estimates computed"
        );
        (table, summaries)
    };

    let metadata = ReportMetadata {
        generated_at: Utc::now(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        waste_sources: sources.iter().map(|s| s.name.clone()).collect(),
        population_source: source_name,
        population_year: config.fanout.year,
        coverage_fractions: scenarios.coverage_fractions().to_vec(),
        avg_item_weight_kg: scenarios.avg_item_weight_kg(),
        co2_per_item_kg: scenarios.co2_per_item_kg(),
        countries: table.country_count(),
        excluded: diagnostics.len(),
        duration_ms: started.elapsed().as_millis() as u64,
    };

    Ok(PipelineReport {
        metadata,
        estimates: table.rows,
        summaries,
        diagnostics,
    })
}

/// Built-in tables, then the optional ISO table, then config overrides.
pub fn build_normalizer(countries: &CountriesConfig) -> Result<CountryNormalizer, WardrobeError> {
    let mut normalizer = CountryNormalizer::builtin();

    if let Some(path) = &countries.iso_table {
        let entries = read_iso_table(path)?;
        tracing::debug!(path = %path.display(), entries = entries.len(), "loaded ISO table");
        for (name, key) in entries {
            normalizer.insert_official_name(&name, key);
        }
    }

    for (label, code) in &countries.overrides {
        match CountryKey::parse(code) {
            Some(key) => normalizer.insert_override(label, key),
            None => tracing::warn!(%label, %code, "ignoring country override with invalid code"),
        }
    }
    Ok(normalizer)
}

/// Read waste files in order (config sources, then `extra`) and append the
/// configured supplements as the last source.
pub fn load_waste_sources(
    waste: &WasteConfig,
    extra: &[PathBuf],
) -> Result<Vec<WasteSource>, WardrobeError> {
    let mut sources = waste
        .sources
        .iter()
        .chain(extra)
        .map(|path| read_waste_csv(path))
        .collect::<Result<Vec<_>, _>>()?;
    if !waste.supplements.is_empty() {
        sources.push(WasteSource::from_supplements(&waste.supplements));
    }
    Ok(sources)
}

/// Instantiate the configured live population source.
pub fn population_source(
    kind: PopulationSourceKind,
) -> Result<Option<Arc<dyn PopulationSource>>, WardrobeError> {
    Ok(match kind {
        PopulationSourceKind::WorldBank => {
            let source = WorldBankSource::new(REQUEST_TIMEOUT).map_err(|e| {
                WardrobeError::SourceUnavailable {
                    source_name: "World Bank".to_string(),
                    countries: Vec::new(),
                    message: e.to_string(),
                }
            })?;
            Some(Arc::new(source) as Arc<dyn PopulationSource>)
        }
        PopulationSourceKind::Reference => {
            Some(Arc::new(StaticSource::reference()) as Arc<dyn PopulationSource>)
        }
        PopulationSourceKind::None => None,
    })
}
