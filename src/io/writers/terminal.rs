use crate::io::output::{OutputWriter, PresentationOptions};
use crate::io::presentation::{scenario_views, DisplayRow};
use crate::pipeline::PipelineReport;
use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
use comfy_table::{CellAlignment, Table};
use std::io::Write;

/// Ranked tables per scenario followed by the exclusion summary.
pub struct TerminalWriter<W: Write> {
    writer: W,
    options: PresentationOptions,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, options: PresentationOptions) -> Self {
        Self { writer, options }
    }

    fn table(&self, rows: &[DisplayRow]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(if self.options.formatting.unicode {
                UTF8_FULL
            } else {
                ASCII_FULL
            })
            .force_no_tty()
            .set_header(DisplayRow::HEADERS.to_vec());
        for row in rows {
            table.add_row(row.cells());
        }
        for index in [0usize, 3, 4, 5, 6, 7, 8, 9] {
            if let Some(column) = table.column_mut(index) {
                column.set_cell_alignment(CellAlignment::Right);
            }
        }
        table
    }

    fn write_header(&mut self, report: &PipelineReport) -> anyhow::Result<()> {
        let fmt = self.options.formatting;
        let meta = &report.metadata;
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", fmt.header("WASTE-TO-WARDROBE INDEX"))?;
        writeln!(
            self.writer,
            "{}",
            fmt.dim(&format!(
                "population: {} ({}), item weight {} kg, {} kg CO2e per item",
                meta.population_source,
                meta.population_year,
                meta.avg_item_weight_kg,
                meta.co2_per_item_kg
            ))
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_scenarios(&mut self, report: &PipelineReport) -> anyhow::Result<()> {
        let fmt = self.options.formatting;
        for view in scenario_views(report, self.options.top) {
            writeln!(self.writer, "{}", fmt.header(&view.title()))?;
            if view.rows.is_empty() {
                writeln!(self.writer, "  no countries with complete data")?;
            } else {
                writeln!(self.writer, "{}", self.table(&view.rows))?;
            }
            if view.hidden > 0 {
                writeln!(
                    self.writer,
                    "{}",
                    fmt.dim(&format!("  ... {} more", view.hidden))
                )?;
            }
            writeln!(self.writer, "{}", fmt.highlight(&view.totals_line()))?;
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_exclusions(&mut self, report: &PipelineReport) -> anyhow::Result<()> {
        let fmt = self.options.formatting;
        let diagnostics = &report.diagnostics;
        if diagnostics.is_empty() {
            return Ok(());
        }

        writeln!(
            self.writer,
            "{}",
            fmt.warning(&format!("Excluded ({}):", diagnostics.len()))
        )?;
        for exclusion in &diagnostics.exclusions {
            let key = exclusion
                .key
                .as_ref()
                .map(|k| format!(" [{k}]"))
                .unwrap_or_default();
            writeln!(
                self.writer,
                "  - {}{key}: {}",
                exclusion.label, exclusion.reason
            )?;
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &PipelineReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_scenarios(report)?;
        self.write_exclusions(report)?;
        tracing::debug!(scenarios = report.summaries.len(), "terminal report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatting::FormattingConfig;
    use crate::io::test_support::sample_report;

    fn render(top: Option<usize>) -> String {
        let mut buffer = Vec::new();
        let options = PresentationOptions {
            top,
            formatting: FormattingConfig::plain(),
        };
        TerminalWriter::new(&mut buffer, options)
            .write_report(&sample_report())
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_terminal_report_sections() {
        let text = render(None);
        assert!(text.contains("Scenario: 10% of purchases second-hand"));
        assert!(text.contains("Scenario: 25% of purchases second-hand"));
        assert!(text.contains("6,849.97"));
        assert!(text.contains("Excluded (1):"));
        assert!(text.contains("- EU27: aggregate row"));
    }

    #[test]
    fn test_top_limits_rows_per_scenario() {
        let text = render(Some(1));
        assert!(text.contains("... 2 more"));
        assert!(!text.contains("Sweden"));
    }
}
