//! Exclusion ledger for per-country failures.
//!
//! A country that drops out of the pipeline never vanishes silently. Each
//! stage records an [`Exclusion`] naming the label, the key when one was
//! resolved, the phase and the reason. The ledger travels with the final
//! report so the shorter table can always be explained.

use crate::country::CountryKey;
use crate::observability::PipelinePhase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Dataset a joined country was missing from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Waste,
    Population,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waste => write!(f, "waste"),
            Self::Population => write!(f, "population"),
        }
    }
}

/// Why a country was excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Multi-country aggregate row (EU27, OECD, ...).
    AggregateRow,
    /// Waste figure missing, non-finite or not positive.
    InvalidWasteFigure { value: Option<f64> },
    /// No canonical key could be resolved for the label.
    UnresolvedCountryIdentity,
    /// Population lookup failed and no override covered the country.
    PopulationUnavailable { error: String },
    /// Canonical key present in one dataset but not the other.
    MissingJoinData { missing_from: Dataset },
}

impl ExclusionReason {
    /// Short stable label used for counting.
    pub fn category(&self) -> &'static str {
        match self {
            Self::AggregateRow => "aggregate_row",
            Self::InvalidWasteFigure { .. } => "invalid_waste_figure",
            Self::UnresolvedCountryIdentity => "unresolved_country_identity",
            Self::PopulationUnavailable { .. } => "population_unavailable",
            Self::MissingJoinData { .. } => "missing_join_data",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AggregateRow => write!(f, "aggregate row"),
            Self::InvalidWasteFigure { value: Some(v) } => write!(f, "invalid waste figure {v}"),
            Self::InvalidWasteFigure { value: None } => write!(f, "missing waste figure"),
            Self::UnresolvedCountryIdentity => write!(f, "unresolved country identity"),
            Self::PopulationUnavailable { error } => write!(f, "population unavailable: {error}"),
            Self::MissingJoinData { missing_from } => {
                write!(f, "no {missing_from} data for this country")
            }
        }
    }
}

/// One excluded country or row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exclusion {
    pub label: String,
    pub key: Option<CountryKey>,
    pub phase: PipelinePhase,
    pub reason: ExclusionReason,
}

impl Exclusion {
    pub fn new(
        label: impl Into<String>,
        key: Option<CountryKey>,
        phase: PipelinePhase,
        reason: ExclusionReason,
    ) -> Self {
        Self {
            label: label.into(),
            key,
            phase,
            reason,
        }
    }
}

/// All exclusions of a run, in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub exclusions: Vec<Exclusion>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, exclusion: Exclusion) {
        tracing::warn!(
            label = %exclusion.label,
            key = exclusion.key.as_ref().map(CountryKey::as_str).unwrap_or("-"),
            phase = %exclusion.phase,
            "excluded: {}",
            exclusion.reason
        );
        self.exclusions.push(exclusion);
    }

    pub fn extend(&mut self, exclusions: impl IntoIterator<Item = Exclusion>) {
        for exclusion in exclusions {
            self.record(exclusion);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exclusions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.exclusions.len()
    }

    /// Number of exclusions per reason category.
    pub fn counts_by_reason(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for exclusion in &self.exclusions {
            *counts.entry(exclusion.reason.category()).or_insert(0) += 1;
        }
        counts
    }

    /// Labels excluded for a given reason category.
    pub fn labels_for(&self, category: &str) -> Vec<&str> {
        self.exclusions
            .iter()
            .filter(|e| e.reason.category() == category)
            .map(|e| e.label.as_str())
            .collect()
    }
}
