//! Country identity normalization.
//!
//! Every dataset labels countries its own way ("Türkiye", "Turkey", "TUR",
//! "United States", "United States of America"). Before two datasets can be
//! joined, each label is reduced to a [`CountryKey`] (ISO-3166 alpha-3).
//!
//! Resolution is a single lookup with fixed precedence:
//!
//! 1. the manual override table (short forms, endonyms, config overrides)
//! 2. the official-name table, then a bare alpha-3 code known to either table
//! 3. otherwise the label is unresolved
//!
//! Labels are folded before lookup (case, whitespace, common Latin
//! diacritics), so "TURKIYE", "Türkiye" and " türkiye " all hit the same entry.

mod tables;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

pub use tables::{MANUAL_OVERRIDES, OFFICIAL_NAMES};

static BUILTIN: Lazy<CountryNormalizer> = Lazy::new(|| {
    let mut normalizer = CountryNormalizer::empty();
    for (name, code) in OFFICIAL_NAMES {
        if let Some(key) = CountryKey::parse(code) {
            normalizer.insert_official_name(name, key);
        }
    }
    for (label, code) in MANUAL_OVERRIDES {
        if let Some(key) = CountryKey::parse(code) {
            normalizer.insert_override(label, key);
        }
    }
    normalizer
});

/// Canonical country identity: an uppercase ISO-3166 alpha-3 code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryKey(String);

impl CountryKey {
    /// Parse a three-letter code, case-insensitively.
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(Self(code.to_ascii_uppercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which table produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
    ManualOverride,
    OfficialName,
    IsoCode,
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManualOverride => write!(f, "manual override"),
            Self::OfficialName => write!(f, "official name"),
            Self::IsoCode => write!(f, "ISO code"),
        }
    }
}

/// A label mapped onto its canonical key. The original label is preserved
/// for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCountry {
    pub key: CountryKey,
    pub display_name: String,
    pub tier: ResolutionTier,
}

/// A label no table could map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no canonical country key for '{label}'")]
pub struct UnresolvedCountry {
    pub label: String,
}

/// Two-tier label -> [`CountryKey`] resolver.
#[derive(Debug, Clone, Default)]
pub struct CountryNormalizer {
    overrides: HashMap<String, CountryKey>,
    official: HashMap<String, CountryKey>,
    known_codes: HashSet<CountryKey>,
}

impl CountryNormalizer {
    /// A normalizer with no entries; everything is unresolved.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A normalizer loaded with the built-in official-name and override tables.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Add or replace an entry in the manual override tier.
    pub fn insert_override(&mut self, label: &str, key: CountryKey) {
        self.known_codes.insert(key.clone());
        self.overrides.insert(fold_label(label), key);
    }

    /// Add or replace an entry in the official-name tier.
    pub fn insert_official_name(&mut self, name: &str, key: CountryKey) {
        self.known_codes.insert(key.clone());
        self.official.insert(fold_label(name), key);
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    pub fn official_name_count(&self) -> usize {
        self.official.len()
    }

    /// Map a free-form label onto its canonical key.
    pub fn resolve(&self, label: &str) -> Result<ResolvedCountry, UnresolvedCountry> {
        let folded = fold_label(label);
        let display_name = label.trim().to_string();

        let hit = self
            .overrides
            .get(&folded)
            .map(|key| (key.clone(), ResolutionTier::ManualOverride))
            .or_else(|| {
                self.official
                    .get(&folded)
                    .map(|key| (key.clone(), ResolutionTier::OfficialName))
            })
            .or_else(|| {
                CountryKey::parse(label)
                    .filter(|key| self.known_codes.contains(key))
                    .map(|key| (key, ResolutionTier::IsoCode))
            });

        match hit {
            Some((key, tier)) if !folded.is_empty() => Ok(ResolvedCountry {
                key,
                display_name,
                tier,
            }),
            _ => Err(UnresolvedCountry {
                label: display_name,
            }),
        }
    }
}

/// Fold a label for table lookup: lowercase, strip common Latin diacritics,
/// drop dots, treat underscores as spaces, collapse whitespace and drop a
/// leading "the ".
pub fn fold_label(label: &str) -> String {
    let mut folded = String::with_capacity(label.len());
    for c in label.chars().flat_map(char::to_lowercase) {
        push_folded(&mut folded, c);
    }
    let collapsed = folded.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.strip_prefix("the ") {
        Some(rest) => rest.to_string(),
        None => collapsed,
    }
}

fn push_folded(out: &mut String, c: char) {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => out.push('a'),
        'ç' | 'ć' | 'č' => out.push('c'),
        'ď' | 'đ' => out.push('d'),
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => out.push('e'),
        'ğ' | 'ģ' => out.push('g'),
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => out.push('i'),
        'ķ' => out.push('k'),
        'ĺ' | 'ļ' | 'ľ' | 'ł' => out.push('l'),
        'ñ' | 'ń' | 'ņ' | 'ň' => out.push('n'),
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => out.push('o'),
        'ŕ' | 'ř' => out.push('r'),
        'ś' | 'ş' | 'š' | 'ș' => out.push('s'),
        'ţ' | 'ť' | 'ț' => out.push('t'),
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => out.push('u'),
        'ý' | 'ÿ' => out.push('y'),
        'ź' | 'ż' | 'ž' => out.push('z'),
        'ß' => out.push_str("ss"),
        'æ' => out.push_str("ae"),
        'œ' => out.push_str("oe"),
        'þ' => out.push_str("th"),
        'ð' => out.push('d'),
        '.' => {}
        '_' => out.push(' '),
        _ => out.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: &str) -> CountryKey {
        CountryKey::parse(code).unwrap()
    }

    #[test]
    fn test_country_key_parse() {
        assert_eq!(CountryKey::parse("usa"), Some(key("USA")));
        assert_eq!(CountryKey::parse(" DEU "), Some(key("DEU")));
        assert_eq!(CountryKey::parse("US"), None);
        assert_eq!(CountryKey::parse("U5A"), None);
    }

    #[test]
    fn test_fold_label() {
        assert_eq!(fold_label("  Türkiye "), "turkiye");
        assert_eq!(fold_label("TURKIYE"), "turkiye");
        assert_eq!(fold_label("Österreich"), "osterreich");
        assert_eq!(fold_label("The  Netherlands"), "netherlands");
        assert_eq!(fold_label("U.S."), "us");
        assert_eq!(fold_label("EU27_2020"), "eu27 2020");
    }

    #[test]
    fn test_endonym_and_exonym_share_key() {
        let normalizer = CountryNormalizer::builtin();
        let native = normalizer.resolve("Türkiye").unwrap();
        let english = normalizer.resolve("Turkey").unwrap();
        assert_eq!(native.key, english.key);
        assert_eq!(native.key.as_str(), "TUR");
        assert_eq!(native.display_name, "Türkiye");

        let de = normalizer.resolve("Deutschland").unwrap();
        assert_eq!(de.key, normalizer.resolve("Germany").unwrap().key);
    }

    #[test]
    fn test_official_name_lookup() {
        let normalizer = CountryNormalizer::builtin();
        let resolved = normalizer
            .resolve("United Kingdom of Great Britain and Northern Ireland")
            .unwrap();
        assert_eq!(resolved.key.as_str(), "GBR");
        assert_eq!(resolved.tier, ResolutionTier::OfficialName);
    }

    #[test]
    fn test_iso_code_resolves_when_known() {
        let normalizer = CountryNormalizer::builtin();
        let resolved = normalizer.resolve("fra").unwrap();
        assert_eq!(resolved.key.as_str(), "FRA");
        assert_eq!(resolved.tier, ResolutionTier::IsoCode);

        assert!(normalizer.resolve("ZZZ").is_err());
    }

    #[test]
    fn test_override_beats_official_name() {
        let mut normalizer = CountryNormalizer::empty();
        normalizer.insert_official_name("Georgia", key("GEO"));
        normalizer.insert_override("Georgia", key("XGA"));

        let resolved = normalizer.resolve("georgia").unwrap();
        assert_eq!(resolved.key.as_str(), "XGA");
        assert_eq!(resolved.tier, ResolutionTier::ManualOverride);
    }

    #[test]
    fn test_unresolved_label() {
        let normalizer = CountryNormalizer::builtin();
        let err = normalizer.resolve("Atlantis").unwrap_err();
        assert_eq!(err.label, "Atlantis");
        assert!(normalizer.resolve("   ").is_err());
    }
}
