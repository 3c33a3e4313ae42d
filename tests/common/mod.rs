//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wardrobe_index::{CountryKey, PopulationSource, StaticSource};

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

pub fn key(code: &str) -> CountryKey {
    CountryKey::parse(code).unwrap()
}

/// In-memory source with the given `(code, persons)` figures.
pub fn static_source(figures: &[(&str, u64)]) -> Arc<dyn PopulationSource> {
    let source = figures
        .iter()
        .fold(StaticSource::new("fixture"), |s, (code, persons)| {
            s.with(key(code), *persons)
        });
    Arc::new(source)
}
