//! Run-level error type for wardrobe-index.
//!
//! Only failures that stop a pipeline run live here. Per-country problems
//! (an unresolvable label, a missing population figure, a country present in
//! only one dataset) are not errors: they are recorded as exclusions in
//! [`crate::diagnostics::Diagnostics`] and the run continues.
//!
//! # Error Codes
//!
//! - E001-E009: I/O errors
//! - E010-E019: Input parse errors
//! - E020-E029: Configuration errors
//! - E030-E039: Data source errors

use std::path::PathBuf;
use thiserror::Error;

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// I/O error - generic
    pub const IO_GENERIC: ErrorCode = ErrorCode("E001");
    /// Parse error - malformed input table
    pub const PARSE_TABLE: ErrorCode = ErrorCode("E010");
    /// Config error - invalid scenario configuration
    pub const CONFIG_SCENARIO: ErrorCode = ErrorCode("E020");
    /// Config error - unreadable or malformed config file
    pub const CONFIG_FILE: ErrorCode = ErrorCode("E021");
    /// Source error - remote source unreachable
    pub const SOURCE_UNAVAILABLE: ErrorCode = ErrorCode("E030");

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum WardrobeError {
    /// Scenario set or impact factors are unusable. Raised before any data
    /// is loaded or computed.
    #[error("Invalid scenario configuration: {}", .problems.join("; "))]
    InvalidScenarioConfiguration { problems: Vec<String> },

    /// A data source could not be reached and nothing could stand in for it.
    #[error("{source_name} unavailable for {}: {message}", .countries.join(", "))]
    SourceUnavailable {
        source_name: String,
        countries: Vec<String>,
        message: String,
    },

    /// Config file could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// File system errors while reading inputs or writing outputs
    #[error("File system error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Malformed tabular input
    #[error("Parse error in {}{}: {message}", .path.display(), .line.map(|l| format!(":{l}")).unwrap_or_default())]
    Parse {
        message: String,
        path: PathBuf,
        line: Option<u64>,
    },
}

impl WardrobeError {
    pub fn invalid_scenarios(problems: Vec<String>) -> Self {
        Self::InvalidScenarioConfiguration { problems }
    }

    pub fn config(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path,
        }
    }

    pub fn io(message: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    pub fn parse(message: impl Into<String>, path: impl Into<PathBuf>, line: Option<u64>) -> Self {
        Self::Parse {
            message: message.into(),
            path: path.into(),
            line,
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidScenarioConfiguration { .. } => ErrorCode::CONFIG_SCENARIO,
            Self::SourceUnavailable { .. } => ErrorCode::SOURCE_UNAVAILABLE,
            Self::Config { .. } => ErrorCode::CONFIG_FILE,
            Self::Io { .. } => ErrorCode::IO_GENERIC,
            Self::Parse { .. } => ErrorCode::PARSE_TABLE,
        }
    }

    /// Whether the user can fix this by editing configuration or inputs.
    #[must_use]
    pub fn is_user_fixable(&self) -> bool {
        match self {
            Self::InvalidScenarioConfiguration { .. } | Self::Config { .. } | Self::Parse { .. } => {
                true
            }
            Self::SourceUnavailable { .. } | Self::Io { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, WardrobeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_scenarios_lists_every_problem() {
        let err = WardrobeError::invalid_scenarios(vec![
            "coverage fraction 1.5 is outside (0, 1]".into(),
            "avg_item_weight_kg must be positive (got 0)".into(),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("1.5"));
        assert!(msg.contains("avg_item_weight_kg"));
        assert_eq!(err.code(), ErrorCode::CONFIG_SCENARIO);
        assert!(err.is_user_fixable());
    }

    #[test]
    fn test_source_unavailable_names_countries() {
        let err = WardrobeError::SourceUnavailable {
            source_name: "World Bank".into(),
            countries: vec!["DEU".into(), "FRA".into()],
            message: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "World Bank unavailable for DEU, FRA: connection refused"
        );
        assert!(!err.is_user_fixable());
        assert_eq!(err.code().as_str(), "E030");
    }

    #[test]
    fn test_parse_error_includes_line() {
        let err = WardrobeError::parse("missing country column", "waste.csv", Some(3));
        assert_eq!(
            err.to_string(),
            "Parse error in waste.csv:3: missing country column"
        );
    }
}
