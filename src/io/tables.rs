//! CSV adapters for the tabular inputs.
//!
//! Each reader maps its file onto the in-memory shape the core expects and
//! leaves judgement to the core: an unparseable waste figure becomes `None`
//! and is rejected by the loader, not here. Only structural problems (file
//! missing, required column absent, broken CSV) are errors.

use crate::country::CountryKey;
use crate::error::WardrobeError;
use crate::waste::WasteSource;
use csv::StringRecord;
use std::fs::File;
use std::path::Path;

/// Accepted headers for the country label column.
pub const COUNTRY_COLUMNS: &[&str] = &["Country", "country", "country_name"];

/// Accepted headers for the per-capita waste column.
pub const WASTE_COLUMNS: &[&str] = &[
    "waste_kg_per_capita",
    "Textile Waste (kg/person)",
    "Total value",
];

const OFFICIAL_NAME_COLUMN: &str = "official_name_en";
const ALPHA3_COLUMN: &str = "ISO3166-1-Alpha-3";
const POPULATION_COLUMN: &str = "population";

fn open_reader(path: &Path) -> Result<csv::Reader<File>, WardrobeError> {
    let file = File::open(path)
        .map_err(|e| WardrobeError::io(format!("cannot open {}", path.display()), path, e))?;
    Ok(csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file))
}

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == *alias))
}

fn require_column(
    headers: &StringRecord,
    aliases: &[&str],
    path: &Path,
) -> Result<usize, WardrobeError> {
    find_column(headers, aliases).ok_or_else(|| {
        WardrobeError::parse(
            format!("missing column (expected one of: {})", aliases.join(", ")),
            path,
            Some(1),
        )
    })
}

fn read_headers(reader: &mut csv::Reader<File>, path: &Path) -> Result<StringRecord, WardrobeError> {
    reader
        .headers()
        .map(Clone::clone)
        .map_err(|e| WardrobeError::parse(format!("cannot read header: {e}"), path, Some(1)))
}

fn record_error(e: csv::Error, path: &Path) -> WardrobeError {
    let line = e.position().map(|p| p.line());
    WardrobeError::parse(e.to_string(), path, line)
}

/// Parse a waste figure. Blanks and Eurostat-style flags (":") read as
/// missing. Commas are thousands separators only in `1,234,567.8` form; a
/// lone comma elsewhere is a decimal comma (`19,5`). Anything else is
/// rejected rather than guessed.
pub fn parse_figure(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == ":" {
        return None;
    }
    if !trimmed.contains(',') {
        return trimmed.parse().ok();
    }

    if is_thousands_grouped(trimmed) {
        return trimmed.replace(',', "").parse().ok();
    }
    if trimmed.matches(',').count() == 1 && !trimmed.contains('.') {
        return trimmed.replace(',', ".").parse().ok();
    }
    None
}

/// `^-?\d{1,3}(,\d{3})+(\.\d+)?$`
fn is_thousands_grouped(figure: &str) -> bool {
    let unsigned = figure.strip_prefix('-').unwrap_or(figure);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    let mut groups = int_part.split(',');
    let leading_ok = groups
        .next()
        .is_some_and(|g| all_digits(g) && g.len() <= 3);
    let mut rest = groups.peekable();
    leading_ok
        && rest.peek().is_some()
        && rest.all(|g| all_digits(g) && g.len() == 3)
        && frac_part.map_or(true, all_digits)
}

/// Read a per-capita waste table. The source is named after the file stem.
pub fn read_waste_csv(path: &Path) -> Result<WasteSource, WardrobeError> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;
    let country = require_column(&headers, COUNTRY_COLUMNS, path)?;
    let figure = require_column(&headers, WASTE_COLUMNS, path)?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mut source = WasteSource::new(name);

    for record in reader.records() {
        let record = record.map_err(|e| record_error(e, path))?;
        let Some(label) = record.get(country).filter(|l| !l.is_empty()) else {
            continue;
        };
        source = source.with_row(label, record.get(figure).and_then(parse_figure));
    }

    tracing::debug!(path = %path.display(), rows = source.rows.len(), "read waste table");
    Ok(source)
}

/// Read an ISO country-codes table: `(official English name, alpha-3)` pairs.
/// Rows without a valid alpha-3 code are skipped.
pub fn read_iso_table(path: &Path) -> Result<Vec<(String, CountryKey)>, WardrobeError> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;
    let name = require_column(&headers, &[OFFICIAL_NAME_COLUMN], path)?;
    let code = require_column(&headers, &[ALPHA3_COLUMN], path)?;

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| record_error(e, path))?;
        let official = record.get(name).unwrap_or_default();
        match record.get(code).and_then(CountryKey::parse) {
            Some(key) if !official.is_empty() => entries.push((official.to_string(), key)),
            _ => tracing::trace!(official, "skipping ISO row without alpha-3 code"),
        }
    }
    Ok(entries)
}

/// Read a `country,population` override file.
pub fn read_population_overrides(path: &Path) -> Result<Vec<(String, u64)>, WardrobeError> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;
    let country = require_column(&headers, COUNTRY_COLUMNS, path)?;
    let persons = require_column(&headers, &[POPULATION_COLUMN], path)?;

    let mut overrides = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| record_error(e, path))?;
        let line = record.position().map(|p| p.line());
        let label = record.get(country).unwrap_or_default();
        let raw = record.get(persons).unwrap_or_default();

        let value = parse_figure(raw)
            .filter(|v| *v >= 0.0 && v.fract() == 0.0)
            .ok_or_else(|| {
                WardrobeError::parse(
                    format!("population for {label:?} is not a whole number: {raw:?}"),
                    path,
                    line,
                )
            })?;
        overrides.push((label.to_string(), value as u64));
    }
    Ok(overrides)
}
