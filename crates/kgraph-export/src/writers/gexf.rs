//! GEXF 1.2 export for Gephi

use super::{entities_in_order, fmt_float, stats_for, well_formed, xml_escape, TripleWriter, WriteStats};
use crate::error::ExportError;
use crate::format::ExportFormat;
use crate::options::{ExportOptions, DEFAULT_INFERRED_CONFIDENCE};
use kgraph_domain::{Triple, DEFAULT_ORIGINAL_CONFIDENCE};
use std::io::Write;

/// Writes a directed GEXF graph
///
/// Edge weight reflects provenance: `1.0` for original triples, `0.5` for
/// inferred ones. The generation date appears only in `meta/@lastmodifieddate`.
pub struct GexfWriter;

impl TripleWriter for GexfWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Gexf
    }

    fn write(
        &self,
        triples: &[Triple],
        out: &mut dyn Write,
        options: &ExportOptions,
    ) -> Result<WriteStats, ExportError> {
        let (kept, skipped) = well_formed(triples, self.format());

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(out, r#"<gexf xmlns="http://gexf.net/1.2" version="1.2">"#)?;
        if options.include_metadata {
            writeln!(
                out,
                r#"  <meta lastmodifieddate="{}">"#,
                options.timestamp_date()
            )?;
        } else {
            writeln!(out, "  <meta>")?;
        }
        writeln!(out, "    <creator>kgraph</creator>")?;
        writeln!(out, "  </meta>")?;
        writeln!(out, r#"  <graph mode="static" defaultedgetype="directed">"#)?;

        writeln!(out, "    <nodes>")?;
        for entity in entities_in_order(&kept) {
            let escaped = xml_escape(entity);
            writeln!(out, r#"      <node id="{}" label="{}"/>"#, escaped, escaped)?;
        }
        writeln!(out, "    </nodes>")?;

        writeln!(out, "    <edges>")?;
        for (idx, triple) in kept.iter().enumerate() {
            let weight = if triple.inferred {
                DEFAULT_INFERRED_CONFIDENCE
            } else {
                DEFAULT_ORIGINAL_CONFIDENCE
            };
            writeln!(
                out,
                r#"      <edge id="{}" source="{}" target="{}" label="{}" weight="{}"/>"#,
                idx,
                xml_escape(&triple.subject),
                xml_escape(&triple.object),
                xml_escape(&triple.predicate),
                fmt_float(weight)
            )?;
        }
        writeln!(out, "    </edges>")?;

        writeln!(out, "  </graph>")?;
        writeln!(out, "</gexf>")?;

        Ok(stats_for(&kept, skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn render(triples: &[Triple], options: &ExportOptions) -> String {
        let mut out = Vec::new();
        GexfWriter.write(triples, &mut out, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_weights_by_provenance() {
        let text = render(
            &[
                Triple::new("A", "relates", "B").with_confidence(0.2),
                Triple::new("B", "relates", "C").inferred(),
            ],
            &ExportOptions::default(),
        );
        assert!(text.contains(r#"<edge id="0" source="A" target="B" label="relates" weight="1.0"/>"#));
        assert!(text.contains(r#"<edge id="1" source="B" target="C" label="relates" weight="0.5"/>"#));
        assert_eq!(text.matches("<node ").count(), 3);
    }

    #[test]
    fn test_lastmodifieddate_is_the_only_date() {
        let ts = Utc.with_ymd_and_hms(2024, 7, 9, 10, 0, 0).unwrap();
        let text = render(&[Triple::new("A", "p", "B")], &ExportOptions::at(ts));
        assert!(text.contains(r#"<meta lastmodifieddate="2024-07-09">"#));
        assert_eq!(text.matches("2024").count(), 1);
    }
}
