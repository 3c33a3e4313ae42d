//! Population figures per canonical country.
//!
//! Figures come from two places. Overrides are supplied by the caller for
//! what-if adjustment, and always win. The live [`PopulationSource`] is
//! queried for every requested country no override covers.
//!
//! A failed lookup only affects its own country: it is reported in
//! [`PopulationLoad::failures`] and the country drops out of the join. The
//! run fails only when nothing resolved and every failure was an outage
//! (see [`PopulationLoad::source_outage`]).

mod fanout;
mod reference;
mod world_bank;

pub use fanout::{fetch_all, FanoutSettings};
pub use reference::{StaticSource, REFERENCE_POPULATIONS};
pub use world_bank::{parse_indicator_response, WorldBankSource, WORLD_BANK_API};

use crate::country::{CountryKey, CountryNormalizer};
use crate::diagnostics::{Exclusion, ExclusionReason};
use crate::observability::PipelinePhase;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_POPULATION_YEAR: i32 = 2023;

/// Which live source to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PopulationSourceKind {
    /// World Bank SP.POP.TOTL indicator
    #[default]
    WorldBank,
    /// Built-in approximate figures, no network
    Reference,
    /// Overrides only
    None,
}

/// Per-country lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PopulationError {
    #[error("no population figure for {key} in {year}")]
    NotFound { key: String, year: i32 },

    #[error("source unavailable: {message}")]
    Unavailable { message: String },

    #[error("malformed response: {message}")]
    Malformed { message: String },

    #[error("lookup did not finish before the deadline")]
    TimedOut,

    #[error("no population source configured and no override given")]
    NoSource,
}

impl PopulationError {
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Failures that say nothing about the country, only about reaching the source.
    pub fn is_outage(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::TimedOut)
    }
}

/// A live population lookup keyed by (country, year).
pub trait PopulationSource: Send + Sync {
    fn name(&self) -> &str;

    fn fetch(&self, key: &CountryKey, year: i32) -> Result<u64, PopulationError>;
}

/// Where a figure came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum PopulationOrigin {
    Override,
    Source(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationRecord {
    pub country_key: CountryKey,
    pub population: u64,
    pub as_of_year: i32,
    pub origin: PopulationOrigin,
}

/// One record per country.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulationTable {
    records: BTreeMap<CountryKey, PopulationRecord>,
}

impl PopulationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: PopulationRecord) -> Option<PopulationRecord> {
        self.records.insert(record.country_key.clone(), record)
    }

    pub fn get(&self, key: &CountryKey) -> Option<&PopulationRecord> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &CountryKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PopulationRecord> {
        self.records.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &CountryKey> {
        self.records.keys()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<PopulationRecord> for PopulationTable {
    fn from_iter<I: IntoIterator<Item = PopulationRecord>>(iter: I) -> Self {
        let mut table = Self::new();
        for record in iter {
            table.insert(record);
        }
        table
    }
}

/// Caller-supplied figures, already normalized to canonical keys.
#[derive(Debug, Clone, Default)]
pub struct PopulationOverrides {
    figures: BTreeMap<CountryKey, u64>,
    /// Override labels that could not be resolved
    pub unresolved: Vec<Exclusion>,
}

impl PopulationOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `(label, persons)` pairs. Later pairs win for the same country.
    pub fn from_labels<'a>(
        entries: impl IntoIterator<Item = (&'a str, u64)>,
        normalizer: &CountryNormalizer,
    ) -> Self {
        let mut overrides = Self::new();
        for (label, persons) in entries {
            match normalizer.resolve(label) {
                Ok(resolved) => {
                    overrides.figures.insert(resolved.key, persons);
                }
                Err(unresolved) => overrides.unresolved.push(Exclusion::new(
                    unresolved.label,
                    None,
                    PipelinePhase::PopulationResolution,
                    ExclusionReason::UnresolvedCountryIdentity,
                )),
            }
        }
        overrides
    }

    pub fn insert(&mut self, key: CountryKey, persons: u64) {
        self.figures.insert(key, persons);
    }

    pub fn get(&self, key: &CountryKey) -> Option<u64> {
        self.figures.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFailure {
    pub key: CountryKey,
    pub error: PopulationError,
}

/// Result of population resolution.
#[derive(Debug, Clone, Default)]
pub struct PopulationLoad {
    pub table: PopulationTable,
    pub failures: Vec<LookupFailure>,
    pub exclusions: Vec<Exclusion>,
}

impl PopulationLoad {
    /// Countries to name in a run-level failure: set only when nothing
    /// resolved and every lookup failed because the source was unreachable.
    pub fn source_outage(&self) -> Option<Vec<String>> {
        let total_outage = self.table.is_empty()
            && !self.failures.is_empty()
            && self.failures.iter().all(|f| f.error.is_outage());
        total_outage.then(|| self.failures.iter().map(|f| f.key.to_string()).collect())
    }

    /// Failures as exclusion records.
    pub fn failure_exclusions(&self) -> impl Iterator<Item = Exclusion> + '_ {
        self.failures.iter().map(|f| {
            Exclusion::new(
                f.key.as_str(),
                Some(f.key.clone()),
                PipelinePhase::PopulationResolution,
                ExclusionReason::PopulationUnavailable {
                    error: f.error.to_string(),
                },
            )
        })
    }
}

/// Resolve populations for `requested` countries.
///
/// Every override enters the table, requested or not. Requested countries
/// without an override are looked up through `source`; with no source they
/// fail with [`PopulationError::NoSource`]. Blocks until every lookup has
/// finished or the fan-out deadline passed.
pub fn resolve_populations(
    requested: impl IntoIterator<Item = CountryKey>,
    overrides: &PopulationOverrides,
    source: Option<Arc<dyn PopulationSource>>,
    settings: &FanoutSettings,
) -> PopulationLoad {
    let mut load = PopulationLoad {
        exclusions: overrides.unresolved.clone(),
        ..Default::default()
    };

    for (key, persons) in &overrides.figures {
        load.table.insert(PopulationRecord {
            country_key: key.clone(),
            population: *persons,
            as_of_year: settings.year,
            origin: PopulationOrigin::Override,
        });
    }

    let pending: Vec<CountryKey> = requested
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(|key| !load.table.contains(key))
        .collect();

    let results: Vec<(CountryKey, Result<(u64, String), PopulationError>)> = match source {
        Some(source) => {
            let name = source.name().to_string();
            fetch_all(source, &pending, settings)
                .into_iter()
                .map(|(key, result)| (key, result.map(|persons| (persons, name.clone()))))
                .collect()
        }
        None => pending
            .into_iter()
            .map(|key| (key, Err(PopulationError::NoSource)))
            .collect(),
    };

    for (key, result) in results {
        match result {
            Ok((persons, name)) => {
                load.table.insert(PopulationRecord {
                    country_key: key,
                    population: persons,
                    as_of_year: settings.year,
                    origin: PopulationOrigin::Source(name),
                });
            }
            Err(error) => load.failures.push(LookupFailure { key, error }),
        }
    }

    tracing::info!(
        resolved = load.table.len(),
        overrides = overrides.len(),
        failed = load.failures.len(),
        "populations resolved"
    );
    load
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(code: &str) -> CountryKey {
        CountryKey::parse(code).unwrap()
    }

    struct CountingSource {
        calls: AtomicUsize,
        inner: StaticSource,
    }

    impl PopulationSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        fn fetch(&self, key: &CountryKey, year: i32) -> Result<u64, PopulationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch(key, year)
        }
    }

    #[test]
    fn test_override_wins_and_skips_lookup() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            inner: StaticSource::new("static").with(key("DEU"), 83_000_000),
        });
        let mut overrides = PopulationOverrides::new();
        overrides.insert(key("DEU"), 84_500_000);

        let load = resolve_populations(
            [key("DEU")],
            &overrides,
            Some(source.clone() as Arc<dyn PopulationSource>),
            &FanoutSettings::default(),
        );
        let record = load.table.get(&key("DEU")).unwrap();
        assert_eq!(record.population, 84_500_000);
        assert_eq!(record.origin, PopulationOrigin::Override);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_lookup_is_reported_not_fatal() {
        let source: Arc<dyn PopulationSource> =
            Arc::new(StaticSource::new("static").with(key("FRA"), 68_000_000));
        let load = resolve_populations(
            [key("FRA"), key("NOR")],
            &PopulationOverrides::new(),
            Some(source),
            &FanoutSettings::default(),
        );
        assert_eq!(load.table.len(), 1);
        assert_eq!(load.failures.len(), 1);
        assert_eq!(load.failures[0].key, key("NOR"));
        assert!(matches!(load.failures[0].error, PopulationError::NotFound { .. }));
        assert!(load.source_outage().is_none());

        let exclusions: Vec<_> = load.failure_exclusions().collect();
        assert_eq!(exclusions[0].reason.category(), "population_unavailable");
    }

    #[test]
    fn test_no_source_uses_overrides_only() {
        let overrides = PopulationOverrides::from_labels(
            [("Germany", 83_000_000), ("Narnia", 5)],
            &CountryNormalizer::builtin(),
        );
        let load = resolve_populations(
            [key("DEU"), key("ITA")],
            &overrides,
            None,
            &FanoutSettings::default(),
        );
        assert!(load.table.contains(&key("DEU")));
        assert_eq!(load.failures[0].error, PopulationError::NoSource);
        assert_eq!(load.exclusions.len(), 1);
        assert_eq!(load.exclusions[0].label, "Narnia");
    }

    #[test]
    fn test_total_outage_detected() {
        struct Down;
        impl PopulationSource for Down {
            fn name(&self) -> &str {
                "down"
            }
            fn fetch(&self, _: &CountryKey, _: i32) -> Result<u64, PopulationError> {
                Err(PopulationError::Unavailable {
                    message: "connection refused".into(),
                })
            }
        }

        let settings = FanoutSettings {
            retry: crate::config::RetryConfig::disabled(),
            ..FanoutSettings::default()
        };
        let load = resolve_populations(
            [key("AUT"), key("BEL")],
            &PopulationOverrides::new(),
            Some(Arc::new(Down) as Arc<dyn PopulationSource>),
            &settings,
        );
        assert_eq!(
            load.source_outage(),
            Some(vec!["AUT".to_string(), "BEL".to_string()])
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(PopulationError::Unavailable { message: "x".into() }.is_retryable());
        assert!(!PopulationError::TimedOut.is_retryable());
        assert!(PopulationError::TimedOut.is_outage());
        assert!(!PopulationError::NoSource.is_outage());
    }
}
