use crate::io::output::{OutputWriter, PresentationOptions};
use crate::io::presentation::{format_2dp, format_percent, kg_to_kt, scenario_views, DisplayRow};
use crate::pipeline::PipelineReport;
use std::io::Write;

/// Escape a value for use inside a table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
    options: PresentationOptions,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W, options: PresentationOptions) -> Self {
        Self { writer, options }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &PipelineReport) -> anyhow::Result<()> {
        let writers: Vec<fn(&mut Self, &PipelineReport) -> anyhow::Result<()>> = vec![
            |w, r| w.write_header(r),
            |w, r| w.write_summary(r),
            |w, r| w.write_scenarios(r),
            |w, r| w.write_exclusions(r),
        ];

        writers.iter().try_for_each(|writer| writer(self, report))
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &PipelineReport) -> anyhow::Result<()> {
        let meta = &report.metadata;
        writeln!(self.writer, "# Waste-to-Wardrobe Index")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer, "Version: {}", meta.tool_version)?;
        writeln!(
            self.writer,
            "Population: {} ({})",
            meta.population_source, meta.population_year
        )?;
        writeln!(
            self.writer,
            "Impact factors: {} kg per item, {} kg CO2e avoided per item",
            meta.avg_item_weight_kg, meta.co2_per_item_kg
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &PipelineReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Coverage | Countries | Avoided waste (kg) | Avoided items | CO2 avoided (kt) |"
        )?;
        writeln!(
            self.writer,
            "|---------:|----------:|-------------------:|--------------:|-----------------:|"
        )?;
        for summary in &report.summaries {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} |",
                format_percent(summary.coverage_fraction),
                summary.countries,
                format_2dp(summary.total_avoided_waste_kg),
                format_2dp(summary.total_avoided_items),
                format_2dp(kg_to_kt(summary.total_avoided_co2_kg)),
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_scenarios(&mut self, report: &PipelineReport) -> anyhow::Result<()> {
        for view in scenario_views(report, self.options.top) {
            writeln!(self.writer, "## {}", view.title())?;
            writeln!(self.writer)?;
            if view.rows.is_empty() {
                writeln!(self.writer, "_No countries with complete data._")?;
                writeln!(self.writer)?;
                continue;
            }

            writeln!(self.writer, "| {} |", DisplayRow::HEADERS.join(" | "))?;
            writeln!(
                self.writer,
                "|{}",
                DisplayRow::HEADERS.map(|_| "---|").concat()
            )?;
            for row in &view.rows {
                let cells: Vec<String> = row.cells().iter().map(|c| cell(c)).collect();
                writeln!(self.writer, "| {} |", cells.join(" | "))?;
            }
            if view.hidden > 0 {
                writeln!(self.writer)?;
                writeln!(self.writer, "_{} more countries not shown._", view.hidden)?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_exclusions(&mut self, report: &PipelineReport) -> anyhow::Result<()> {
        let diagnostics = &report.diagnostics;
        if diagnostics.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Excluded ({})", diagnostics.len())?;
        writeln!(self.writer)?;
        for (reason, count) in diagnostics.counts_by_reason() {
            writeln!(self.writer, "- **{reason}**: {count}")?;
        }
        writeln!(self.writer)?;
        writeln!(self.writer, "| Label | Key | Phase | Reason |")?;
        writeln!(self.writer, "|-------|-----|-------|--------|")?;
        for exclusion in &diagnostics.exclusions {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} |",
                cell(&exclusion.label),
                exclusion.key.as_ref().map(|k| k.as_str()).unwrap_or("-"),
                exclusion.phase,
                cell(&exclusion.reason.to_string())
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::test_support::sample_report;

    #[test]
    fn test_markdown_report() {
        let mut buffer = Vec::new();
        MarkdownWriter::new(&mut buffer, PresentationOptions::default())
            .write_report(&sample_report())
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with("# Waste-to-Wardrobe Index"));
        assert!(text.contains("| 25% | 3 |"));
        assert!(text.contains("| 1 | United States | USA | 40.22 | 4.02 | 327,000,000 |"));
        assert!(text.contains("- **aggregate_row**: 1"));
        assert!(text.contains("| EU27 | - | waste_loading | aggregate row |"));
    }

    #[test]
    fn test_pipes_in_labels_are_escaped() {
        let mut report = sample_report();
        report.estimates[0].country_display_name = "Congo | Kinshasa".into();
        report.diagnostics.exclusions[0].label = "EU | EFTA".into();

        let mut buffer = Vec::new();
        MarkdownWriter::new(&mut buffer, PresentationOptions::default())
            .write_report(&report)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("| Congo \\| Kinshasa |"));
        assert!(text.contains("| EU \\| EFTA | - |"));
        assert!(!text.contains("Congo | Kinshasa"));
    }
}
