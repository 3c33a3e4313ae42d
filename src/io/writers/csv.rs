use crate::io::output::OutputWriter;
use crate::pipeline::PipelineReport;
use std::io::Write;

/// Estimate rows with their field names as the header, unrounded.
pub struct CsvWriter<W: Write> {
    writer: W,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for CsvWriter<W> {
    fn write_report(&mut self, report: &PipelineReport) -> anyhow::Result<()> {
        let mut csv = csv::Writer::from_writer(&mut self.writer);
        for row in &report.estimates {
            csv.serialize(row)?;
        }
        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::test_support::sample_report;

    #[test]
    fn test_csv_header_and_rows() {
        let report = sample_report();
        let mut buffer = Vec::new();
        CsvWriter::new(&mut buffer).write_report(&report).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "country_key,country_display_name,waste_kg_per_capita,population,\
                 coverage_fraction,annual_waste_kg,avoided_waste_kg,avoided_items,avoided_co2_kg"
            )
        );
        assert_eq!(lines.count(), report.estimates.len());
        assert!(text.contains("USA,United States,40.22,327000000,0.25,"));
    }
}
