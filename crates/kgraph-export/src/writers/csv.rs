//! CSV export

use super::{fmt_float, stats_for, well_formed, TripleWriter, WriteStats};
use crate::error::ExportError;
use crate::format::ExportFormat;
use crate::options::{export_confidence, ExportOptions};
use kgraph_domain::Triple;
use std::io::Write;

/// Column header row
pub const HEADER: [&str; 6] = ["subject", "predicate", "object", "inferred", "chunk", "confidence"];

/// Writes one row per triple under [`HEADER`]; carries no timestamp
pub struct CsvWriter;

impl TripleWriter for CsvWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn write(
        &self,
        triples: &[Triple],
        out: &mut dyn Write,
        _options: &ExportOptions,
    ) -> Result<WriteStats, ExportError> {
        let (kept, skipped) = well_formed(triples, self.format());

        let mut writer = ::csv::Writer::from_writer(out);
        writer.write_record(HEADER)?;
        for triple in &kept {
            let inferred = if triple.inferred { "true" } else { "false" };
            let chunk = triple.chunk.unwrap_or(0).to_string();
            let confidence = fmt_float(export_confidence(triple));
            writer.write_record([
                triple.subject.as_str(),
                triple.predicate.as_str(),
                triple.object.as_str(),
                inferred,
                chunk.as_str(),
                confidence.as_str(),
            ])?;
        }
        writer.flush()?;

        Ok(stats_for(&kept, skipped))
    }
}
