use crate::io::OutputFormat;
use crate::population::PopulationSourceKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wardrobe-index")]
#[command(
    about = "Estimate textile waste and CO2 avoided when clothing purchases shift to resale",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the estimation pipeline and print ranked results
    Estimate(EstimateArgs),

    /// Write a default .wardrobe.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show how country labels resolve to ISO-3166 alpha-3 keys
    Resolve {
        /// Country labels to resolve
        #[arg(required = true)]
        labels: Vec<String>,

        /// Config file (defaults to .wardrobe.toml discovery)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Flags for `estimate`. Every option overrides the matching config value.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct EstimateArgs {
    /// Per-capita waste CSV files, merged after the configured sources
    pub waste: Vec<PathBuf>,

    /// Config file (defaults to .wardrobe.toml discovery)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Coverage fractions to evaluate, e.g. 0.1,0.25
    #[arg(long, value_delimiter = ',')]
    pub coverage: Option<Vec<f64>>,

    /// Accept 0 as a coverage fraction
    #[arg(long)]
    pub allow_zero_coverage: bool,

    /// Average garment weight (kg)
    #[arg(long = "item-weight")]
    pub item_weight: Option<f64>,

    /// CO2e avoided per second-hand item (kg)
    #[arg(long = "co2-per-item")]
    pub co2_per_item: Option<f64>,

    /// Skip the built-in single-country waste supplements
    #[arg(long)]
    pub no_supplements: bool,

    /// Live population source
    #[arg(long = "population-source", value_enum, env = "WARDROBE_POPULATION_SOURCE")]
    pub population_source: Option<PopulationSourceKind>,

    /// CSV with country,population rows that override the live source
    #[arg(long = "population-file")]
    pub population_file: Option<PathBuf>,

    /// Population reference year
    #[arg(long)]
    pub year: Option<i32>,

    /// Concurrent population lookups (0 = number of CPUs)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Overall deadline for population lookups (seconds)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// ISO country-codes CSV (official_name_en, ISO3166-1-Alpha-3)
    #[arg(long = "iso-table")]
    pub iso_table: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rows shown per scenario
    #[arg(long)]
    pub top: Option<usize>,

    /// Plain output: ASCII tables, no colors
    #[arg(long)]
    pub plain: bool,

    /// Hide progress bars
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_estimate_flags() {
        let cli = Cli::try_parse_from([
            "wardrobe-index",
            "estimate",
            "eea.csv",
            "--coverage",
            "0.1,0.5",
            "--population-source",
            "reference",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();

        let Commands::Estimate(args) = cli.command else {
            panic!("expected estimate");
        };
        assert_eq!(args.waste, vec![PathBuf::from("eea.csv")]);
        assert_eq!(args.coverage, Some(vec![0.1, 0.5]));
        assert_eq!(args.population_source, Some(PopulationSourceKind::Reference));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.verbosity, 2);
    }

    #[test]
    fn test_resolve_requires_labels() {
        assert!(Cli::try_parse_from(["wardrobe-index", "resolve"]).is_err());
    }
}
