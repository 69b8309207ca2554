//! JSON export: triples plus statistics and metadata

use super::{stats_for, well_formed, TripleWriter, WriteStats};
use crate::error::ExportError;
use crate::format::ExportFormat;
use crate::options::{export_confidence, ExportOptions};
use kgraph_domain::Triple;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Version of the JSON export layout
pub const FORMAT_VERSION: &str = "1.0";

/// Generator name recorded in metadata
pub const GENERATOR: &str = "kgraph";

/// Writes `{triples, statistics, metadata}`
pub struct JsonWriter;

#[derive(Serialize)]
struct JsonTriple<'a> {
    subject: &'a str,
    predicate: &'a str,
    object: &'a str,
    inferred: bool,
    chunk: usize,
    confidence: f64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    confidence_imputed: bool,
}

#[derive(Serialize)]
struct Statistics {
    total_triples: usize,
    unique_entities: usize,
    unique_relationships: usize,
    inferred_triples: usize,
    skipped_triples: usize,
}

#[derive(Serialize)]
struct Metadata {
    export_timestamp: String,
    format_version: &'static str,
    generator: &'static str,
}

#[derive(Serialize)]
struct Document<'a> {
    triples: Vec<JsonTriple<'a>>,
    statistics: Statistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

impl TripleWriter for JsonWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn write(
        &self,
        triples: &[Triple],
        out: &mut dyn Write,
        options: &ExportOptions,
    ) -> Result<WriteStats, ExportError> {
        let (kept, skipped) = well_formed(triples, self.format());
        let stats = stats_for(&kept, skipped);

        let document = Document {
            triples: kept
                .iter()
                .map(|t| JsonTriple {
                    subject: &t.subject,
                    predicate: &t.predicate,
                    object: &t.object,
                    inferred: t.inferred,
                    chunk: t.chunk.unwrap_or(0),
                    confidence: export_confidence(t),
                    confidence_imputed: t.confidence.is_none(),
                })
                .collect(),
            statistics: Statistics {
                total_triples: stats.written,
                unique_entities: stats.entities,
                unique_relationships: stats.relationships,
                inferred_triples: kept.iter().filter(|t| t.inferred).count(),
                skipped_triples: skipped,
            },
            metadata: options.include_metadata.then(|| Metadata {
                export_timestamp: options.timestamp_rfc3339(),
                format_version: FORMAT_VERSION,
                generator: GENERATOR,
            }),
        };

        serde_json::to_writer_pretty(&mut *out, &document)?;
        writeln!(out)?;
        Ok(stats)
    }
}

/// A triple as written by [`JsonWriter`]
///
/// `confidence_imputed` marks a written default, which reads back as no
/// confidence so thresholds treat the triple as before export.
#[derive(Deserialize)]
struct ExportedTriple {
    #[serde(flatten)]
    triple: Triple,
    #[serde(default)]
    confidence_imputed: bool,
}

impl From<ExportedTriple> for Triple {
    fn from(exported: ExportedTriple) -> Self {
        let mut triple = exported.triple;
        if exported.confidence_imputed {
            triple.confidence = None;
        }
        triple
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TripleSource {
    Bare(Vec<Triple>),
    Export { triples: Vec<ExportedTriple> },
}

/// Load triples from a bare JSON array or from a JSON export document
///
/// # Examples
///
/// ```
/// use kgraph_export::read_triples_json;
///
/// let bare = r#"[{"subject": "A", "predicate": "p", "object": "B"}]"#;
/// assert_eq!(read_triples_json(bare.as_bytes()).unwrap().len(), 1);
///
/// let export = r#"{"triples": [{"subject": "A", "predicate": "p", "object": "B", "inferred": true}]}"#;
/// assert!(read_triples_json(export.as_bytes()).unwrap()[0].inferred);
/// ```
pub fn read_triples_json<R: Read>(reader: R) -> Result<Vec<Triple>, ExportError> {
    let source: TripleSource = serde_json::from_reader(reader)?;
    Ok(match source {
        TripleSource::Bare(triples) => triples,
        TripleSource::Export { triples } => triples.into_iter().map(Triple::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    fn write(triples: &[Triple], options: &ExportOptions) -> Value {
        let mut out = Vec::new();
        JsonWriter.write(triples, &mut out, options).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn test_defaults_written() {
        let triples = vec![
            Triple::new("A", "relates", "B"),
            Triple::new("B", "relates", "C").inferred(),
        ];
        let doc = write(&triples, &ExportOptions::default());
        assert_eq!(doc["triples"][0]["confidence"], 1.0);
        assert_eq!(doc["triples"][0]["chunk"], 0);
        assert_eq!(doc["triples"][1]["confidence"], 0.5);
        assert_eq!(doc["triples"][1]["confidence_imputed"], true);
        assert_eq!(doc["statistics"]["unique_entities"], 3);
        assert_eq!(doc["statistics"]["inferred_triples"], 1);
    }

    #[test]
    fn test_metadata_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let doc = write(&[Triple::new("A", "p", "B")], &ExportOptions::at(ts));
        assert_eq!(doc["metadata"]["export_timestamp"], "2024-05-01T12:00:00Z");
        assert_eq!(doc["metadata"]["format_version"], FORMAT_VERSION);

        let options = ExportOptions {
            include_metadata: false,
            ..ExportOptions::default()
        };
        assert!(write(&[Triple::new("A", "p", "B")], &options).get("metadata").is_none());
    }

    #[test]
    fn test_skipped_counted() {
        let triples = vec![Triple::new("A", "p", "B"), Triple::new("A", " ", "B")];
        let doc = write(&triples, &ExportOptions::default());
        assert_eq!(doc["statistics"]["skipped_triples"], 1);
        assert_eq!(doc["triples"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_reads_own_output() {
        let triples = vec![Triple::new("A", "p", "B").with_chunk(2)];
        let mut out = Vec::new();
        JsonWriter
            .write(&triples, &mut out, &ExportOptions::default())
            .unwrap();
        let loaded = read_triples_json(out.as_slice()).unwrap();
        assert_eq!(loaded[0].chunk, Some(2));
        assert_eq!(loaded[0].confidence, None);
    }

    #[test]
    fn test_written_defaults_read_back_as_missing() {
        let triples = vec![
            Triple::new("A", "p", "B").inferred(),
            Triple::new("B", "p", "C").inferred().with_confidence(0.5),
            Triple::new("C", "p", "D").with_confidence(0.9),
        ];
        let mut out = Vec::new();
        JsonWriter
            .write(&triples, &mut out, &ExportOptions::default())
            .unwrap();
        let doc: Value = serde_json::from_slice(&out).unwrap();
        assert!(doc["triples"][1].get("confidence_imputed").is_none());

        let loaded = read_triples_json(out.as_slice()).unwrap();
        assert_eq!(loaded[0].confidence, None);
        assert_eq!(loaded[0].effective_confidence(), None);
        assert_eq!(loaded[1].confidence, Some(0.5));
        assert_eq!(loaded[2].confidence, Some(0.9));
    }

    #[test]
    fn test_read_rejects_other_shapes() {
        assert!(read_triples_json(r#"{"edges": []}"#.as_bytes()).is_err());
    }
}
