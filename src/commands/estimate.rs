use crate::cli::EstimateArgs;
use crate::config::{load_config, load_config_from, validate_config, WardrobeConfig};
use crate::formatting::FormattingConfig;
use crate::io::{self, create_writer, PresentationOptions};
use crate::observability::{init_logging, phase_span, PipelinePhase};
use crate::pipeline::{
    build_normalizer, load_waste_sources, population_source, run_pipeline, PipelineConfig,
    PipelineReport,
};
use crate::progress::ProgressConfig;
use anyhow::{Context, Result};

/// Layer command-line flags over the loaded config, field by field.
pub fn apply_overrides(config: &mut WardrobeConfig, args: &EstimateArgs) {
    if let Some(coverage) = &args.coverage {
        config.scenarios.coverage_fractions = coverage.clone();
    }
    if args.allow_zero_coverage {
        config.scenarios.allow_zero_coverage = true;
    }
    if let Some(weight) = args.item_weight {
        config.scenarios.avg_item_weight_kg = weight;
    }
    if let Some(co2) = args.co2_per_item {
        config.scenarios.co2_per_item_kg = co2;
    }
    if args.no_supplements {
        config.waste.supplements.clear();
    }
    if let Some(source) = args.population_source {
        config.population.source = source;
    }
    if let Some(path) = &args.population_file {
        config.population.override_file = Some(path.clone());
    }
    if let Some(year) = args.year {
        config.population.year = year;
    }
    if let Some(jobs) = args.jobs {
        config.population.jobs = jobs;
    }
    if let Some(timeout) = args.timeout {
        config.population.timeout_seconds = timeout;
    }
    if let Some(path) = &args.iso_table {
        config.countries.iso_table = Some(path.clone());
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if args.top.is_some() {
        config.output.top = args.top;
    }
}

pub fn run_estimate(args: EstimateArgs) -> Result<()> {
    init_logging(args.verbosity);

    let mut config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };
    apply_overrides(&mut config, &args);
    validate_config(&config)?;

    let formatting = if args.plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    };
    formatting.apply();

    let progress = ProgressConfig::from_env(args.quiet);
    let pipeline_config = PipelineConfig::from_config(&config, progress)?;
    let normalizer = build_normalizer(&config.countries)?;
    let sources = load_waste_sources(&config.waste, &args.waste)?;
    if sources.iter().all(|s| s.rows.is_empty()) {
        tracing::warn!("no waste data given; pass CSV files or configure [waste] sources");
    }

    let report = run_pipeline(
        &pipeline_config,
        &normalizer,
        sources,
        population_source(config.population.source)?,
    )?;

    let options = PresentationOptions {
        top: config.output.top,
        formatting,
    };
    write_report(&report, &config, &args, options)
}

fn write_report(
    report: &PipelineReport,
    config: &WardrobeConfig,
    args: &EstimateArgs,
    options: PresentationOptions,
) -> Result<()> {
    let _span = phase_span(PipelinePhase::Presentation);
    let format = config.output.format;

    match &args.output {
        Some(path) => {
            let mut buffer = Vec::new();
            create_writer(format, &mut buffer, options).write_report(report)?;
            let content = String::from_utf8(buffer).context("report is not valid UTF-8")?;
            io::write_file(path, &content)?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => {
            let stdout = std::io::stdout();
            create_writer(format, stdout.lock(), options).write_report(report)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::OutputFormat;
    use crate::population::PopulationSourceKind;
    use std::path::PathBuf;

    #[test]
    fn test_flags_override_config_fields() {
        let mut config = WardrobeConfig::default();
        config.population.year = 2019;
        config.scenarios.avg_item_weight_kg = 0.5;

        let args = EstimateArgs {
            coverage: Some(vec![0.5]),
            co2_per_item: Some(2.0),
            population_source: Some(PopulationSourceKind::Reference),
            population_file: Some(PathBuf::from("pop.csv")),
            format: Some(OutputFormat::Csv),
            no_supplements: true,
            top: Some(3),
            ..EstimateArgs::default()
        };
        apply_overrides(&mut config, &args);

        assert_eq!(config.scenarios.coverage_fractions, vec![0.5]);
        assert_eq!(config.scenarios.co2_per_item_kg, 2.0);
        // untouched flags keep config values
        assert_eq!(config.scenarios.avg_item_weight_kg, 0.5);
        assert_eq!(config.population.year, 2019);
        assert_eq!(config.population.source, PopulationSourceKind::Reference);
        assert_eq!(config.population.override_file, Some(PathBuf::from("pop.csv")));
        assert!(config.waste.supplements.is_empty());
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.output.top, Some(3));
    }
}
