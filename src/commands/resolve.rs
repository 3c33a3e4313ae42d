use crate::config::{load_config, load_config_from};
use crate::country::CountryNormalizer;
use crate::pipeline::build_normalizer;
use anyhow::Result;
use std::path::Path;

/// One line per label: `label -> KEY (tier)` or `label -> unresolved`.
pub fn describe_resolutions(normalizer: &CountryNormalizer, labels: &[String]) -> Vec<String> {
    labels
        .iter()
        .map(|label| match normalizer.resolve(label) {
            Ok(resolved) => format!("{label} -> {} ({})", resolved.key, resolved.tier),
            Err(_) => format!("{label} -> unresolved"),
        })
        .collect()
}

pub fn resolve_labels(labels: &[String], config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };
    let normalizer = build_normalizer(&config.countries)?;
    for line in describe_resolutions(&normalizer, labels) {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_resolutions() {
        let lines = describe_resolutions(
            &CountryNormalizer::builtin(),
            &["Türkiye".to_string(), "NOR".to_string(), "EU27".to_string()],
        );
        assert_eq!(lines[0], "Türkiye -> TUR (manual override)");
        assert_eq!(lines[1], "NOR -> NOR (ISO code)");
        assert_eq!(lines[2], "EU27 -> unresolved");
    }
}
