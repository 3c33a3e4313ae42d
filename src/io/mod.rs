//! Input adapters and report writers.

pub mod output;
pub mod presentation;
pub mod tables;
pub mod writers;

pub use output::{create_writer, OutputFormat, OutputWriter, PresentationOptions};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::country::CountryNormalizer;
    use crate::pipeline::{run_pipeline, PipelineConfig, PipelineReport};
    use crate::population::{PopulationSource, StaticSource};
    use crate::waste::WasteSource;
    use std::sync::Arc;

    /// Small report over reference populations with one excluded aggregate.
    pub fn sample_report() -> PipelineReport {
        let waste = WasteSource::new("eea")
            .with_row("EU27", Some(16.0))
            .with_row("Germany", Some(19.5))
            .with_row("Sweden", Some(14.0))
            .with_row("United States", Some(40.22));
        run_pipeline(
            &PipelineConfig::default(),
            &CountryNormalizer::builtin(),
            vec![waste],
            Some(Arc::new(StaticSource::reference()) as Arc<dyn PopulationSource>),
        )
        .unwrap()
    }
}
