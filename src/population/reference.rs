use super::{PopulationError, PopulationSource};
use crate::country::CountryKey;
use std::collections::HashMap;

/// Approximate populations used by the interactive dashboard as slider
/// defaults, in persons. Year-agnostic.
pub const REFERENCE_POPULATIONS: &[(&str, u64)] = &[
    ("AUT", 9_000_000),
    ("BEL", 11_500_000),
    ("BGR", 7_000_000),
    ("HRV", 4_000_000),
    ("CYP", 1_200_000),
    ("CZE", 10_700_000),
    ("DNK", 5_800_000),
    ("EST", 1_300_000),
    ("FIN", 5_500_000),
    ("FRA", 67_000_000),
    ("DEU", 83_000_000),
    ("GRC", 10_700_000),
    ("HUN", 9_700_000),
    ("ISL", 360_000),
    ("IRL", 5_000_000),
    ("ITA", 60_000_000),
    ("LVA", 1_900_000),
    ("LTU", 2_800_000),
    ("LUX", 600_000),
    ("MLT", 500_000),
    ("NLD", 17_000_000),
    ("NOR", 5_400_000),
    ("POL", 38_000_000),
    ("PRT", 10_200_000),
    ("ROU", 19_000_000),
    ("SVK", 5_500_000),
    ("SVN", 2_100_000),
    ("ESP", 47_000_000),
    ("SWE", 10_000_000),
    ("TUR", 85_000_000),
    ("GBR", 67_000_000),
    ("USA", 327_000_000),
];

/// In-memory population source.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    name: String,
    figures: HashMap<CountryKey, u64>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            figures: HashMap::new(),
        }
    }

    /// The built-in reference figures.
    pub fn reference() -> Self {
        REFERENCE_POPULATIONS
            .iter()
            .filter_map(|(code, persons)| CountryKey::parse(code).map(|key| (key, *persons)))
            .fold(Self::new("reference"), |source, (key, persons)| {
                source.with(key, persons)
            })
    }

    pub fn with(mut self, key: CountryKey, persons: u64) -> Self {
        self.figures.insert(key, persons);
        self
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
}

impl PopulationSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, key: &CountryKey, year: i32) -> Result<u64, PopulationError> {
        self.figures
            .get(key)
            .copied()
            .ok_or_else(|| PopulationError::NotFound {
                key: key.to_string(),
                year,
            })
    }
}
