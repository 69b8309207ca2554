//! File-level export entry points

use crate::error::ExportError;
use crate::format::ExportFormat;
use crate::options::ExportOptions;
use crate::writers::writer_for;
use kgraph_domain::Triple;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result of writing one format to one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    /// Format written
    pub format: ExportFormat,
    /// Destination file
    pub path: PathBuf,
    /// Triples written
    pub written: usize,
    /// Malformed triples skipped
    pub skipped: usize,
    /// Distinct entities written
    pub entities: usize,
    /// Distinct predicates written
    pub relationships: usize,
}

/// Outcome for one requested format name
#[derive(Debug)]
pub struct ExportOutcome {
    /// The name as requested
    pub requested: String,
    /// Report on success, the reason on failure
    pub result: Result<ExportReport, ExportError>,
}

impl ExportOutcome {
    /// Whether this format was written
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// `base` with the format's extension appended (`out/report` → `out/report.json`)
pub fn output_path(base: &Path, format: ExportFormat) -> PathBuf {
    let mut path = base.as_os_str().to_owned();
    path.push(".");
    path.push(format.extension());
    PathBuf::from(path)
}

/// Write `triples` in `format` to a new file at `path`
///
/// # Errors
///
/// `ExportError::Destination` if the file cannot be created or flushed, or
/// the writer's own error.
pub fn export_to_path(
    format: ExportFormat,
    triples: &[Triple],
    path: &Path,
    options: &ExportOptions,
) -> Result<ExportReport, ExportError> {
    let stats = write_file(path, |out| writer_for(format).write(triples, out, options))?;

    info!(
        %format,
        path = %path.display(),
        written = stats.written,
        skipped = stats.skipped,
        "Exported triples"
    );

    Ok(ExportReport {
        format,
        path: path.to_path_buf(),
        written: stats.written,
        skipped: stats.skipped,
        entities: stats.entities,
        relationships: stats.relationships,
    })
}

/// Create `path` and fill it with `write`, removing the file if anything fails
fn write_file<T, F>(path: &Path, write: F) -> Result<T, ExportError>
where
    F: FnOnce(&mut dyn Write) -> Result<T, ExportError>,
{
    let destination = |source| ExportError::Destination {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(destination)?;
    let mut out = BufWriter::new(file);
    let result = write(&mut out).and_then(|value| {
        out.flush().map_err(destination)?;
        Ok(value)
    });
    if result.is_err() {
        drop(out);
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "Failed to remove partial export");
        }
    }
    result
}

/// Export to every requested format, one outcome per name in request order
///
/// Each file is `base` plus the format's extension. An unsupported name or a
/// failed write affects only its own entry. All formats share one timestamp.
///
/// # Examples
///
/// ```
/// use kgraph_domain::Triple;
/// use kgraph_export::{export_multiple_formats, ExportOptions};
///
/// let dir = tempfile::tempdir().unwrap();
/// let base = dir.path().join("graph");
/// let triples = vec![Triple::new("A", "p", "B")];
///
/// let outcomes = export_multiple_formats(&triples, &base, &["json", "xlsx"], &ExportOptions::default());
/// assert!(outcomes[0].is_success());
/// assert!(!outcomes[1].is_success());
/// ```
pub fn export_multiple_formats<S: AsRef<str>>(
    triples: &[Triple],
    base: &Path,
    formats: &[S],
    options: &ExportOptions,
) -> Vec<ExportOutcome> {
    let options = options.resolved();

    formats
        .iter()
        .map(|requested| {
            let requested = requested.as_ref();
            let result = requested.parse::<ExportFormat>().and_then(|format| {
                export_to_path(format, triples, &output_path(base, format), &options)
            });
            if let Err(e) = &result {
                warn!(format = requested, error = %e, "Export failed");
            }
            ExportOutcome {
                requested: requested.to_string(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_appends_extension() {
        let base = Path::new("out/my.notes");
        assert_eq!(
            output_path(base, ExportFormat::Turtle),
            PathBuf::from("out/my.notes.ttl")
        );
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("graph.json");
        let err = export_to_path(
            ExportFormat::Json,
            &[Triple::new("A", "p", "B")],
            &path,
            &ExportOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::Destination { .. }));
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let result: Result<(), ExportError> = write_file(&path, |out| {
            out.write_all(b"{\"triples\": [")?;
            Err(ExportError::UnsupportedFormat("halfway".to_string()))
        });
        assert!(matches!(result, Err(ExportError::UnsupportedFormat(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_successful_write_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.csv");
        let report = export_to_path(
            ExportFormat::Csv,
            &[Triple::new("A", "p", "B")],
            &path,
            &ExportOptions::default(),
        )
        .unwrap();
        assert_eq!(report.written, 1);
        assert!(fs::read_to_string(&path).unwrap().starts_with("subject,"));
    }
}
