//! Per-capita textile waste tables.
//!
//! Sources are merged in order into one table keyed by [`CountryKey`]. For
//! each row:
//!
//! 1. aggregate labels (EU27, OECD, ...) are dropped before normalization,
//!    since they would double-count their member countries
//! 2. missing, non-finite or non-positive figures are rejected
//! 3. the label is resolved to a canonical key; unresolved labels are excluded
//! 4. the record replaces any earlier record for the same key
//!
//! Step 4 makes the merge last-write-wins per country: a later source (or a
//! later row in the same source) overrides only the countries it names.
//! Rejected rows never override anything.

use crate::config::WasteSupplement;
use crate::country::{fold_label, CountryKey, CountryNormalizer};
use crate::diagnostics::{Exclusion, ExclusionReason};
use crate::observability::PipelinePhase;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// US textile waste per person in kg, appended when no other figure is given.
pub const US_WASTE_KG_PER_CAPITA: f64 = 40.22;

/// Regional and organisational aggregates found in European waste tables.
pub const DEFAULT_AGGREGATE_LABELS: &[&str] = &[
    "EU27",
    "EU27_2020",
    "EU28",
    "EU",
    "European Union",
    "Europe",
    "OECD",
    "EFTA",
];

/// One row as it came out of a source table.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWasteRow {
    pub label: String,
    pub waste_kg_per_capita: Option<f64>,
}

/// A named, ordered set of raw rows.
#[derive(Debug, Clone, PartialEq)]
pub struct WasteSource {
    pub name: String,
    pub rows: Vec<RawWasteRow>,
}

impl WasteSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, label: impl Into<String>, waste_kg_per_capita: Option<f64>) -> Self {
        self.rows.push(RawWasteRow {
            label: label.into(),
            waste_kg_per_capita,
        });
        self
    }

    /// Manually appended single-country figures.
    pub fn from_supplements(supplements: &[WasteSupplement]) -> Self {
        supplements
            .iter()
            .fold(Self::new("supplements"), |source, s| {
                source.with_row(s.country.clone(), Some(s.waste_kg_per_capita))
            })
    }
}

/// Canonical per-capita waste figure for one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteRecord {
    pub country_key: CountryKey,
    pub display_name: String,
    pub waste_kg_per_capita: f64,
    /// Name of the source the figure came from
    pub source: String,
}

/// Deduplicated waste table, one record per country.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WasteTable {
    records: BTreeMap<CountryKey, WasteRecord>,
}

impl WasteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the one it replaced.
    pub fn insert(&mut self, record: WasteRecord) -> Option<WasteRecord> {
        self.records.insert(record.country_key.clone(), record)
    }

    pub fn get(&self, key: &CountryKey) -> Option<&WasteRecord> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &CountryKey) -> bool {
        self.records.contains_key(key)
    }

    /// Records in country key order.
    pub fn iter(&self) -> impl Iterator<Item = &WasteRecord> {
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

impl FromIterator<WasteRecord> for WasteTable {
    fn from_iter<I: IntoIterator<Item = WasteRecord>>(iter: I) -> Self {
        let mut table = Self::new();
        for record in iter {
            table.insert(record);
        }
        table
    }
}

/// Recognises aggregate rows by folded label.
#[derive(Debug, Clone)]
pub struct AggregateFilter {
    labels: HashSet<String>,
}

impl AggregateFilter {
    pub fn builtin() -> Self {
        Self::from_labels(DEFAULT_AGGREGATE_LABELS.iter().copied())
    }

    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            labels: labels.into_iter().map(fold_label).collect(),
        }
    }

    pub fn with_extra<'a>(mut self, labels: impl IntoIterator<Item = &'a str>) -> Self {
        self.labels.extend(labels.into_iter().map(fold_label));
        self
    }

    pub fn is_aggregate(&self, label: &str) -> bool {
        self.labels.contains(&fold_label(label))
    }
}

impl Default for AggregateFilter {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Result of merging all waste sources.
#[derive(Debug, Clone, Default)]
pub struct WasteLoad {
    pub table: WasteTable,
    pub exclusions: Vec<Exclusion>,
    /// Records replaced by a later row for the same country
    pub overridden: usize,
}

/// Merge `sources` in order into a single deduplicated table.
pub fn load_waste(
    sources: &[WasteSource],
    normalizer: &CountryNormalizer,
    aggregates: &AggregateFilter,
) -> WasteLoad {
    let mut load = WasteLoad::default();
    let exclude = |label: &str, key: Option<CountryKey>, reason| {
        Exclusion::new(label.trim(), key, PipelinePhase::WasteLoading, reason)
    };

    for source in sources {
        tracing::debug!(source = %source.name, rows = source.rows.len(), "merging waste source");

        for row in &source.rows {
            if aggregates.is_aggregate(&row.label) {
                load.exclusions
                    .push(exclude(&row.label, None, ExclusionReason::AggregateRow));
                continue;
            }

            let figure = match row.waste_kg_per_capita {
                Some(v) if v.is_finite() && v > 0.0 => v,
                value => {
                    let key = normalizer.resolve(&row.label).ok().map(|r| r.key);
                    load.exclusions.push(exclude(
                        &row.label,
                        key,
                        ExclusionReason::InvalidWasteFigure { value },
                    ));
                    continue;
                }
            };

            let resolved = match normalizer.resolve(&row.label) {
                Ok(resolved) => resolved,
                Err(_) => {
                    load.exclusions.push(exclude(
                        &row.label,
                        None,
                        ExclusionReason::UnresolvedCountryIdentity,
                    ));
                    continue;
                }
            };

            let record = WasteRecord {
                country_key: resolved.key,
                display_name: resolved.display_name,
                waste_kg_per_capita: figure,
                source: source.name.clone(),
            };
            if let Some(previous) = load.table.insert(record) {
                load.overridden += 1;
                tracing::debug!(
                    key = %previous.country_key,
                    previous_source = %previous.source,
                    source = %source.name,
                    "waste figure overridden"
                );
            }
        }
    }

    tracing::info!(
        countries = load.table.len(),
        excluded = load.exclusions.len(),
        overridden = load.overridden,
        "waste sources merged"
    );
    load
}
