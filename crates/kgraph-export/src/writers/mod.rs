//! Format writers
//!
//! Each writer implements [`TripleWriter`]. Shared helpers for validation,
//! entity ordering and XML escaping live here.

pub mod csv;
pub mod gexf;
pub mod graphml;
pub mod json;
pub mod turtle;

use crate::error::ExportError;
use crate::format::ExportFormat;
use crate::options::ExportOptions;
use kgraph_domain::Triple;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Write;
use tracing::warn;

/// Counts reported by a writer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteStats {
    /// Triples written
    pub written: usize,
    /// Malformed triples skipped
    pub skipped: usize,
    /// Distinct entities among the written triples
    pub entities: usize,
    /// Distinct predicates among the written triples
    pub relationships: usize,
}

/// Serializes triples in one format
pub trait TripleWriter {
    /// The format this writer produces
    fn format(&self) -> ExportFormat;

    /// Write `triples` to `out`, skipping malformed ones
    fn write(
        &self,
        triples: &[Triple],
        out: &mut dyn Write,
        options: &ExportOptions,
    ) -> Result<WriteStats, ExportError>;
}

/// The writer for `format`
pub fn writer_for(format: ExportFormat) -> Box<dyn TripleWriter> {
    match format {
        ExportFormat::Json => Box::new(json::JsonWriter),
        ExportFormat::Csv => Box::new(self::csv::CsvWriter),
        ExportFormat::Graphml => Box::new(graphml::GraphmlWriter),
        ExportFormat::Gexf => Box::new(gexf::GexfWriter),
        ExportFormat::Turtle => Box::new(turtle::TurtleWriter),
    }
}

/// Well-formed triples in input order, plus the number skipped
pub(crate) fn well_formed<'a>(triples: &'a [Triple], format: ExportFormat) -> (Vec<&'a Triple>, usize) {
    let mut kept = Vec::with_capacity(triples.len());
    let mut skipped = 0;
    for (idx, triple) in triples.iter().enumerate() {
        match triple.validate() {
            Ok(()) => kept.push(triple),
            Err(reason) => {
                skipped += 1;
                warn!(%format, index = idx, "Skipping malformed triple: {}", reason);
            }
        }
    }
    (kept, skipped)
}

/// Distinct subject/object names in order of first appearance
pub(crate) fn entities_in_order<'a>(triples: &[&'a Triple]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for triple in triples {
        for name in [triple.subject.as_str(), triple.object.as_str()] {
            if seen.insert(name) {
                ordered.push(name);
            }
        }
    }
    ordered
}

/// Stats for a set of written triples
pub(crate) fn stats_for(written: &[&Triple], skipped: usize) -> WriteStats {
    let relationships: HashSet<&str> = written.iter().map(|t| t.predicate.as_str()).collect();
    WriteStats {
        written: written.len(),
        skipped,
        entities: entities_in_order(written).len(),
        relationships: relationships.len(),
    }
}

/// Escape text for XML attribute values and character data
pub(crate) fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            // Control characters are not representable in XML 1.0
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => escaped.push(c),
        }
    }
    escaped
}

/// Decimal rendering that always keeps a fractional part (`1.0`, not `1`)
pub(crate) fn fmt_float(value: f64) -> String {
    format!("{:?}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape(r#"A & "B" <C>"#), "A &amp; &quot;B&quot; &lt;C&gt;");
        assert_eq!(xml_escape("a\u{1}b"), "ab");
    }

    #[test]
    fn test_entities_in_first_appearance_order() {
        let triples = vec![Triple::new("B", "p", "A"), Triple::new("A", "p", "C")];
        let refs: Vec<&Triple> = triples.iter().collect();
        assert_eq!(entities_in_order(&refs), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_well_formed_counts_skips() {
        let triples = vec![
            Triple::new("A", "p", "B"),
            Triple::new("", "p", "B"),
            Triple::new("A", "p", "B").with_confidence(2.0),
        ];
        let (kept, skipped) = well_formed(&triples, ExportFormat::Json);
        assert_eq!(kept.len(), 1);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_fmt_float() {
        assert_eq!(fmt_float(1.0), "1.0");
        assert_eq!(fmt_float(0.25), "0.25");
    }
}
