use crate::io::output::OutputWriter;
use crate::pipeline::PipelineReport;
use serde_json;
use std::io::Write;

/// The whole report, unrounded.
pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &PipelineReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::test_support::sample_report;

    #[test]
    fn test_json_keeps_full_precision() {
        let report = sample_report();
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer).write_report(&report).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        let usa = value["estimates"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["country_key"] == "USA" && r["coverage_fraction"] == 0.25)
            .unwrap();
        assert_eq!(usa["avoided_co2_kg"], 6_849_968_750.0);
        assert_eq!(value["diagnostics"]["exclusions"][0]["label"], "EU27");

        let back: PipelineReport = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(back.estimates, report.estimates);
    }
}
