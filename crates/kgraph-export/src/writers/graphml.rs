//! GraphML export

use super::{entities_in_order, fmt_float, stats_for, well_formed, xml_escape, TripleWriter, WriteStats};
use crate::error::ExportError;
use crate::format::ExportFormat;
use crate::options::{export_confidence, ExportOptions};
use kgraph_domain::Triple;
use std::io::Write;

/// Writes a directed GraphML graph; entities become nodes, triples edges
///
/// The generation time appears only in one `<!-- generated: ... -->` comment.
pub struct GraphmlWriter;

impl TripleWriter for GraphmlWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Graphml
    }

    fn write(
        &self,
        triples: &[Triple],
        out: &mut dyn Write,
        options: &ExportOptions,
    ) -> Result<WriteStats, ExportError> {
        let (kept, skipped) = well_formed(triples, self.format());

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        if options.include_metadata {
            writeln!(out, "<!-- generated: {} -->", options.timestamp_rfc3339())?;
        }
        writeln!(
            out,
            r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">"#
        )?;
        writeln!(out, r#"  <key id="d0" for="node" attr.name="type" attr.type="string"/>"#)?;
        writeln!(out, r#"  <key id="d1" for="edge" attr.name="relationship" attr.type="string"/>"#)?;
        writeln!(out, r#"  <key id="d2" for="edge" attr.name="inferred" attr.type="boolean"/>"#)?;
        writeln!(out, r#"  <key id="d3" for="edge" attr.name="chunk" attr.type="long"/>"#)?;
        writeln!(out, r#"  <key id="d4" for="edge" attr.name="confidence" attr.type="double"/>"#)?;
        writeln!(out, r#"  <graph edgedefault="directed">"#)?;

        for entity in entities_in_order(&kept) {
            writeln!(
                out,
                r#"    <node id="{}"><data key="d0">entity</data></node>"#,
                xml_escape(entity)
            )?;
        }

        for (idx, triple) in kept.iter().enumerate() {
            writeln!(
                out,
                r#"    <edge id="e{}" source="{}" target="{}">"#,
                idx,
                xml_escape(&triple.subject),
                xml_escape(&triple.object)
            )?;
            writeln!(out, r#"      <data key="d1">{}</data>"#, xml_escape(&triple.predicate))?;
            writeln!(out, r#"      <data key="d2">{}</data>"#, triple.inferred)?;
            writeln!(out, r#"      <data key="d3">{}</data>"#, triple.chunk.unwrap_or(0))?;
            writeln!(
                out,
                r#"      <data key="d4">{}</data>"#,
                fmt_float(export_confidence(triple))
            )?;
            writeln!(out, "    </edge>")?;
        }

        writeln!(out, "  </graph>")?;
        writeln!(out, "</graphml>")?;

        Ok(stats_for(&kept, skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn render(triples: &[Triple], options: &ExportOptions) -> String {
        let mut out = Vec::new();
        GraphmlWriter.write(triples, &mut out, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_nodes_and_edges() {
        let text = render(
            &[
                Triple::new("A", "relates", "B"),
                Triple::new("B", "relates", "C").inferred(),
            ],
            &ExportOptions::default(),
        );
        assert_eq!(text.matches("<node ").count(), 3);
        assert_eq!(text.matches("<edge ").count(), 2);
        assert!(text.contains(r#"<edge id="e1" source="B" target="C">"#));
        assert!(text.contains(r#"<data key="d4">0.5</data>"#));
        assert!(text.contains(r#"<graph edgedefault="directed">"#));
    }

    #[test]
    fn test_escaping() {
        let text = render(&[Triple::new("R&D", "<owns>", "\"Lab\"")], &ExportOptions::default());
        assert!(text.contains(r#"<node id="R&amp;D">"#));
        assert!(text.contains("&lt;owns&gt;"));
        assert!(text.contains("&quot;Lab&quot;"));
    }

    #[test]
    fn test_single_generated_comment() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let text = render(&[Triple::new("A", "p", "B")], &ExportOptions::at(ts));
        assert_eq!(text.matches("generated:").count(), 1);
        assert!(text.contains("<!-- generated: 2024-01-02T03:04:05Z -->"));
    }
}
