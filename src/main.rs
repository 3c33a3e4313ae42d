use anyhow::Result;
use clap::Parser;
use wardrobe_index::cli::{Cli, Commands};
use wardrobe_index::WardrobeError;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Estimate(args) => wardrobe_index::commands::run_estimate(args),
        Commands::Init { force } => wardrobe_index::commands::init_config(force),
        Commands::Resolve { labels, config } => {
            wardrobe_index::commands::resolve_labels(&labels, config.as_deref())
        }
    };

    // Tag library errors with their stable code
    result.map_err(|e| {
        let code = e.downcast_ref::<WardrobeError>().map(WardrobeError::code);
        match code {
            Some(code) => e.context(format!("{code}")),
            None => e,
        }
    })
}
