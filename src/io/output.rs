use crate::formatting::FormattingConfig;
use crate::io::writers::{CsvWriter, JsonWriter, MarkdownWriter, TerminalWriter};
use crate::pipeline::PipelineReport;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Ranked tables for a terminal
    #[default]
    Terminal,
    /// Full report, full precision
    Json,
    /// Flat estimate rows, full precision
    Csv,
    Markdown,
}

/// Presentation options shared by the human-readable writers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentationOptions {
    /// Rows shown per scenario; `None` shows all
    pub top: Option<usize>,
    pub formatting: FormattingConfig,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &PipelineReport) -> anyhow::Result<()>;
}

/// Writer for `format` over `out`.
pub fn create_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    out: W,
    options: PresentationOptions,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Terminal => Box::new(TerminalWriter::new(out, options)),
        OutputFormat::Json => Box::new(JsonWriter::new(out)),
        OutputFormat::Csv => Box::new(CsvWriter::new(out)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(out, options)),
    }
}
