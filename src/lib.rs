//! Waste-to-Wardrobe index.
//!
//! Estimates textile waste, garment count and CO2e avoided per country when
//! a share of clothing purchases moves to resale. The pipeline normalizes
//! country labels, merges per-capita waste tables, resolves populations and
//! evaluates every coverage scenario for every country with complete data.

// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod country;
pub mod diagnostics;
pub mod error;
pub mod estimator;
pub mod formatting;
pub mod io;
pub mod observability;
pub mod pipeline;
pub mod population;
pub mod progress;
pub mod waste;

// Re-export commonly used types
pub use crate::country::{
    CountryKey, CountryNormalizer, ResolutionTier, ResolvedCountry, OFFICIAL_NAMES,
};

pub use crate::diagnostics::{Dataset, Diagnostics, Exclusion, ExclusionReason};

pub use crate::error::{ErrorCode, WardrobeError};

pub use crate::estimator::{
    estimate, summarize, CountryEstimate, EstimateTable, MissingJoin, ScenarioConfig,
    ScenarioSummary,
};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::pipeline::{run_pipeline, PipelineConfig, PipelineReport, ReportMetadata};

pub use crate::population::{
    resolve_populations, PopulationError, PopulationOverrides, PopulationRecord,
    PopulationSource, PopulationTable, StaticSource, WorldBankSource,
};

pub use crate::waste::{load_waste, AggregateFilter, WasteRecord, WasteSource, WasteTable};
