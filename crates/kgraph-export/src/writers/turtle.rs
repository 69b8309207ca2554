//! RDF Turtle export

use super::{stats_for, well_formed, TripleWriter, WriteStats};
use crate::error::ExportError;
use crate::format::ExportFormat;
use crate::options::ExportOptions;
use kgraph_domain::Triple;
use std::fmt::Write as _;
use std::io::Write;
use tracing::warn;

/// Namespace for entities and predicates
pub const KG_NAMESPACE: &str = "http://example.org/knowledge-graph/";

/// Writes `kg:subject kg:predicate kg:object .` statements
///
/// The generation time appears only in one `# generated: ...` comment.
pub struct TurtleWriter;

/// Turn a name into a `kg:` local name
///
/// Spaces and hyphens become `_`, parentheses are dropped, and every other
/// character outside `[A-Za-z0-9_]` is percent-encoded byte by byte.
///
/// # Examples
///
/// ```
/// use kgraph_export::writers::turtle::local_name;
///
/// assert_eq!(local_name("steam engine (1712)"), "steam_engine_1712");
/// assert_eq!(local_name("R&D"), "R%26D");
/// ```
pub fn local_name(text: &str) -> String {
    let mut local = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' ' | '-' => local.push('_'),
            '(' | ')' => {}
            c if c.is_ascii_alphanumeric() || c == '_' => local.push(c),
            c => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    let _ = write!(local, "%{:02X}", byte);
                }
            }
        }
    }
    local
}

impl TripleWriter for TurtleWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Turtle
    }

    fn write(
        &self,
        triples: &[Triple],
        out: &mut dyn Write,
        options: &ExportOptions,
    ) -> Result<WriteStats, ExportError> {
        let (candidates, mut skipped) = well_formed(triples, self.format());

        writeln!(out, "@prefix kg: <{}> .", KG_NAMESPACE)?;
        writeln!(out, "@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .")?;
        writeln!(out, "@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .")?;
        if options.include_metadata {
            writeln!(out, "# generated: {}", options.timestamp_rfc3339())?;
        }
        writeln!(out)?;

        let mut written = Vec::with_capacity(candidates.len());
        for triple in candidates {
            let subject = local_name(&triple.subject);
            let predicate = local_name(&triple.predicate);
            let object = local_name(&triple.object);
            if subject.is_empty() || predicate.is_empty() || object.is_empty() {
                // Names made only of parentheses have no local form
                skipped += 1;
                warn!(%triple, "Skipping triple with no Turtle local name");
                continue;
            }
            writeln!(out, "kg:{} kg:{} kg:{} .", subject, predicate, object)?;
            written.push(triple);
        }

        Ok(stats_for(&written, skipped))
    }
}
