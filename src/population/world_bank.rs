//! World Bank total population indicator (SP.POP.TOTL).
//!
//! The API answers with a two-element JSON array: paging metadata, then the
//! data rows (or `null`). Unknown countries come back as a single element
//! carrying a `message` list instead.

use super::{PopulationError, PopulationSource};
use crate::country::CountryKey;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

pub const WORLD_BANK_API: &str = "https://api.worldbank.org/v2";

const INDICATOR: &str = "SP.POP.TOTL";

pub struct WorldBankSource {
    client: Client,
    base_url: String,
}

impl WorldBankSource {
    /// Build a client whose individual requests give up after `request_timeout`.
    pub fn new(request_timeout: Duration) -> Result<Self, PopulationError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("wardrobe-index/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PopulationError::Unavailable {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: WORLD_BANK_API.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn indicator_url(&self, key: &CountryKey, year: i32) -> String {
        format!(
            "{}/country/{}/indicator/{INDICATOR}?format=json&date={year}",
            self.base_url, key
        )
    }
}

impl PopulationSource for WorldBankSource {
    fn name(&self) -> &str {
        "World Bank"
    }

    fn fetch(&self, key: &CountryKey, year: i32) -> Result<u64, PopulationError> {
        let url = self.indicator_url(key, year);
        tracing::debug!(%key, year, %url, "fetching population");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| PopulationError::Unavailable {
                message: e.to_string(),
            })?;

        check_status(response.status(), key, year)?;

        let body: Value = response.json().map_err(|e| PopulationError::Malformed {
            message: e.to_string(),
        })?;
        parse_indicator_response(&body, key, year)
    }
}

/// Map a non-success HTTP status onto a lookup failure. Throttling and
/// server errors are transient; 404 means the country or year has no data.
pub fn check_status(
    status: StatusCode,
    key: &CountryKey,
    year: i32,
) -> Result<(), PopulationError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::NOT_FOUND => Err(PopulationError::NotFound {
            key: key.to_string(),
            year,
        }),
        s if s.is_server_error() || s == StatusCode::TOO_MANY_REQUESTS => {
            Err(PopulationError::Unavailable {
                message: format!("HTTP {s}"),
            })
        }
        s => Err(PopulationError::Malformed {
            message: format!("HTTP {s}"),
        }),
    }
}

/// Extract the population for `year` from an indicator response body.
pub fn parse_indicator_response(
    body: &Value,
    key: &CountryKey,
    year: i32,
) -> Result<u64, PopulationError> {
    let not_found = || PopulationError::NotFound {
        key: key.to_string(),
        year,
    };
    let malformed = |message: &str| PopulationError::Malformed {
        message: message.to_string(),
    };

    let pages = body
        .as_array()
        .ok_or_else(|| malformed("expected a JSON array"))?;

    if pages.first().and_then(|meta| meta.get("message")).is_some() {
        return Err(not_found());
    }

    let rows = match pages.get(1) {
        Some(Value::Array(rows)) => rows,
        Some(Value::Null) | None => return Err(not_found()),
        Some(_) => return Err(malformed("data page is not an array")),
    };

    let wanted = year.to_string();
    rows.iter()
        .filter(|row| row.get("date").and_then(Value::as_str) == Some(wanted.as_str()))
        .find_map(|row| row.get("value").and_then(Value::as_f64))
        .filter(|persons| persons.is_finite() && *persons >= 0.0)
        .map(|persons| persons.round() as u64)
        .ok_or_else(not_found)
}
