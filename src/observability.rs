//! Logging setup and pipeline phase tracking.
//!
//! The binary installs a `tracing-subscriber` formatter writing to stderr.
//! Library code emits `tracing` events inside one span per [`PipelinePhase`],
//! so a warning about an unresolved country can be traced back to the stage
//! that produced it.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Stages of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    /// Reading and merging per-capita waste sources
    WasteLoading,
    /// Resolving populations from overrides and the live source
    PopulationResolution,
    /// Joining tables and computing scenario estimates
    Estimation,
    /// Formatting and writing the results table
    Presentation,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WasteLoading => write!(f, "waste_loading"),
            Self::PopulationResolution => write!(f, "population_resolution"),
            Self::Estimation => write!(f, "estimation"),
            Self::Presentation => write!(f, "presentation"),
        }
    }
}

/// Open an `info` span for a phase. Hold the returned guard for the phase's
/// duration.
pub fn phase_span(phase: PipelinePhase) -> tracing::span::EnteredSpan {
    tracing::info_span!("phase", name = %phase).entered()
}

/// Map `-v` occurrences onto a default filter directive.
pub fn verbosity_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the verbosity flag.
/// Calling this twice is harmless; the second call is ignored.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
