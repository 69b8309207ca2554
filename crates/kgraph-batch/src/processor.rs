//! Concurrent extraction over many files

use crate::config::BatchConfig;
use crate::error::BatchError;
use crate::result::{BatchResult, BatchSummary, ExportSummary, FileStatus};
use kgraph_domain::{GraphStats, Triple, TripleExtractor};
use kgraph_export::{export_multiple_formats, ExportOptions};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// File name of the persisted batch summary
pub const SUMMARY_FILE: &str = "batch_summary.json";

/// List files directly in `input_dir` whose names match any pattern
///
/// Matching is case-sensitive. A file matching several patterns appears
/// once, at its first pattern. Within a pattern files are ordered by name.
///
/// # Errors
///
/// `BatchError::Pattern` for an invalid glob, `BatchError::Io` if the
/// directory cannot be read.
pub fn discover<S: AsRef<str>>(input_dir: &Path, patterns: &[S]) -> Result<Vec<PathBuf>, BatchError> {
    let compiled = patterns
        .iter()
        .map(|p| {
            glob::Pattern::new(p.as_ref()).map_err(|source| BatchError::Pattern {
                pattern: p.as_ref().to_string(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let io_error = |source| BatchError::Io {
        path: input_dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(input_dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if !path.is_file() {
            continue;
        }
        // Non-UTF-8 names cannot match a textual pattern
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();

    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for pattern in &compiled {
        for name in &names {
            if pattern.matches(name) && seen.insert(name.clone()) {
                files.push(input_dir.join(name));
            }
        }
    }
    Ok(files)
}

/// Output base for each file: `<stem>`, or `<stem>_<extension>` when stems collide
///
/// The summary file's stem is reserved so no export can be overwritten by it.
fn output_bases(files: &[PathBuf], output_dir: &Path) -> Vec<PathBuf> {
    let stem = |path: &Path| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string())
    };

    let mut stem_counts: HashMap<String, usize> = HashMap::new();
    for file in files {
        *stem_counts.entry(stem(file)).or_default() += 1;
    }

    let mut used: HashSet<String> = Path::new(SUMMARY_FILE)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .into_iter()
        .collect();
    files
        .iter()
        .enumerate()
        .map(|(idx, file)| {
            let stem = stem(file);
            let mut name = if stem_counts[&stem] > 1 {
                match file.extension() {
                    Some(ext) => format!("{}_{}", stem, ext.to_string_lossy()),
                    None => stem,
                }
            } else {
                stem
            };
            // Same file name from different directories, or the summary stem
            if !used.insert(name.clone()) {
                name = format!("{}_{}", name, idx);
                used.insert(name.clone());
            }
            output_dir.join(name)
        })
        .collect()
}

/// Read, extract and export one file
fn extract_and_export<E: TripleExtractor>(
    extractor: &E,
    path: &Path,
    base: &Path,
    formats: &[String],
    options: &ExportOptions,
) -> Result<(Vec<Triple>, Vec<ExportSummary>), String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    if text.trim().is_empty() {
        return Err("Empty file".to_string());
    }

    let triples = extractor.extract(&text).map_err(|e| e.to_string())?;
    if triples.is_empty() {
        return Err("No triples extracted".to_string());
    }

    let exports = export_multiple_formats(&triples, base, formats, options)
        .into_iter()
        .map(ExportSummary::from)
        .collect();
    Ok((triples, exports))
}

/// Process one file into its result; never fails
fn process_file<E: TripleExtractor>(
    extractor: &E,
    path: PathBuf,
    base: &Path,
    formats: &[String],
    options: &ExportOptions,
) -> BatchResult {
    let started = Instant::now();
    match extract_and_export(extractor, &path, base, formats, options) {
        Ok((triples, exports)) => {
            let written = exports.iter().any(ExportSummary::is_success);
            let error = if written {
                None
            } else {
                let reasons: Vec<String> = exports
                    .iter()
                    .map(|e| format!("{}: {}", e.format, e.error.as_deref().unwrap_or("failed")))
                    .collect();
                Some(format!("No export written ({})", reasons.join("; ")))
            };
            BatchResult {
                file_path: path,
                status: if written {
                    FileStatus::Success
                } else {
                    FileStatus::Failure
                },
                triples: triples.len(),
                duration_seconds: started.elapsed().as_secs_f64(),
                error,
                statistics: Some(GraphStats::from_triples(&triples)),
                exports,
            }
        }
        Err(reason) => BatchResult::failure(path, reason, started.elapsed()),
    }
}

struct Job {
    index: usize,
    path: PathBuf,
    base: PathBuf,
}

/// Runs an extractor over many files with a bounded worker pool
///
/// Workers pull files from a shared queue and send results to a single
/// collector. Extraction and export run on the blocking pool. No per-file
/// failure stops the batch.
///
/// # Examples
///
/// ```no_run
/// use kgraph_batch::{BatchConfig, BatchProcessor};
/// use kgraph_extractor::{Extractor, ExtractorConfig};
/// use kgraph_llm::MockProvider;
/// use std::path::Path;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let extractor = Extractor::new(MockProvider::default(), ExtractorConfig::default());
/// let processor = BatchProcessor::new(extractor, BatchConfig::default());
///
/// let summary = processor
///     .process_directory(Path::new("docs"), Path::new("out"), CancellationToken::new())
///     .await?;
/// println!("{}", summary.summary());
/// # Ok(())
/// # }
/// ```
pub struct BatchProcessor<E> {
    extractor: Arc<E>,
    config: BatchConfig,
    export_options: ExportOptions,
}

impl<E> BatchProcessor<E>
where
    E: TripleExtractor + Send + Sync + 'static,
{
    /// Create a processor owning `extractor`
    pub fn new(extractor: E, config: BatchConfig) -> Self {
        Self::from_arc(Arc::new(extractor), config)
    }

    /// Create a processor sharing `extractor`
    pub fn from_arc(extractor: Arc<E>, config: BatchConfig) -> Self {
        Self {
            extractor,
            config,
            export_options: ExportOptions::default(),
        }
    }

    /// Options passed to every export
    pub fn with_export_options(mut self, options: ExportOptions) -> Self {
        self.export_options = options;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Process every matching file in `input_dir`
    ///
    /// # Errors
    ///
    /// Only batch-level problems: invalid configuration, an unreadable input
    /// directory, or an output directory that cannot be created.
    pub async fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        cancel: CancellationToken,
    ) -> Result<BatchSummary, BatchError> {
        self.config.validate().map_err(BatchError::Config)?;
        let files = discover(input_dir, &self.config.file_patterns)?;
        if files.is_empty() {
            tracing::warn!(
                input_dir = %input_dir.display(),
                patterns = ?self.config.file_patterns,
                "No files matched"
            );
        }
        self.process_files(files, output_dir, cancel).await
    }

    /// Process an explicit list of files, in the given order
    ///
    /// # Errors
    ///
    /// Invalid configuration or an output directory that cannot be created.
    pub async fn process_files(
        &self,
        files: Vec<PathBuf>,
        output_dir: &Path,
        cancel: CancellationToken,
    ) -> Result<BatchSummary, BatchError> {
        self.config.validate().map_err(BatchError::Config)?;
        fs::create_dir_all(output_dir).map_err(|source| BatchError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let started = Instant::now();
        let total = files.len();
        let workers = self.config.worker_count().min(total.max(1));
        tracing::info!(files = total, workers, "Batch started");

        let bases = output_bases(&files, output_dir);
        let jobs: VecDeque<Job> = files
            .iter()
            .cloned()
            .zip(bases)
            .enumerate()
            .map(|(index, (path, base))| Job { index, path, base })
            .collect();

        let queue = Arc::new(Mutex::new(jobs));
        let formats = Arc::new(self.config.export_formats.clone());
        let options = Arc::new(self.export_options.resolved());
        let (tx, mut rx) = mpsc::channel::<(usize, BatchResult)>(workers.max(1) * 2);

        for worker_id in 0..workers {
            let queue = Arc::clone(&queue);
            let extractor = Arc::clone(&self.extractor);
            let formats = Arc::clone(&formats);
            let options = Arc::clone(&options);
            let cancel = cancel.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                loop {
                    if cancel.is_cancelled() {
                        tracing::debug!(worker_id, "Cancellation observed, worker stopping");
                        break;
                    }
                    let Some(job) = queue.lock().await.pop_front() else {
                        break;
                    };

                    tracing::debug!(worker_id, file = %job.path.display(), "Processing file");
                    let path = job.path.clone();
                    let started = Instant::now();
                    let extractor = Arc::clone(&extractor);
                    let formats = Arc::clone(&formats);
                    let options = Arc::clone(&options);
                    let handle = tokio::task::spawn_blocking(move || {
                        process_file(extractor.as_ref(), job.path, &job.base, &formats, &options)
                    });

                    let result = match handle.await {
                        Ok(result) => result,
                        Err(e) => BatchResult::failure(
                            path,
                            format!("Worker failed: {}", e),
                            started.elapsed(),
                        ),
                    };
                    if tx.send((job.index, result)).await.is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        let mut slots: Vec<Option<BatchResult>> = vec![None; total];
        while let Some((index, result)) = rx.recv().await {
            match &result.error {
                Some(error) if !result.is_success() => tracing::warn!(
                    file = %result.file_path.display(),
                    error = %error,
                    "File failed"
                ),
                _ => tracing::info!(
                    file = %result.file_path.display(),
                    triples = result.triples,
                    seconds = result.duration_seconds,
                    "File processed"
                ),
            }
            slots[index] = Some(result);
        }

        let results: Vec<BatchResult> = slots
            .into_iter()
            .zip(files)
            .map(|(slot, path)| slot.unwrap_or_else(|| BatchResult::cancelled(path)))
            .collect();
        let summary = BatchSummary::from_results(results, started.elapsed());

        tracing::info!(
            total = summary.total_files,
            successful = summary.successful,
            failed = summary.failed,
            cancelled = summary.cancelled,
            "Batch finished"
        );

        if self.config.write_summary {
            write_summary(&summary, &output_dir.join(SUMMARY_FILE))?;
        }

        Ok(summary)
    }
}

/// Persist `summary` as pretty JSON
pub fn write_summary(summary: &BatchSummary, path: &Path) -> Result<(), BatchError> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json).map_err(|source| BatchError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "text").unwrap();
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_discover_orders_by_pattern_then_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.txt", "notes.md", "image.png", "upper.TXT"] {
            touch(dir.path(), name);
        }
        fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let files = discover(dir.path(), &["*.md", "*.txt"]).unwrap();
        assert_eq!(names(&files), vec!["notes.md", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_discover_deduplicates_overlapping_patterns() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.txt");
        touch(dir.path(), "b.txt");

        let files = discover(dir.path(), &["a*", "*.txt"]).unwrap();
        assert_eq!(names(&files), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_discover_invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover(dir.path(), &["[unclosed"]).unwrap_err();
        assert!(matches!(err, BatchError::Pattern { .. }));
    }

    #[test]
    fn test_discover_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover(&dir.path().join("absent"), &["*.txt"]).unwrap_err();
        assert!(matches!(err, BatchError::Io { .. }));
    }

    #[test]
    fn test_output_bases_disambiguate_shared_stems() {
        let out = Path::new("out");
        let files = vec![
            PathBuf::from("in/report.txt"),
            PathBuf::from("in/report.md"),
            PathBuf::from("in/other.txt"),
        ];
        let bases = output_bases(&files, out);
        assert_eq!(bases[0], out.join("report_txt"));
        assert_eq!(bases[1], out.join("report_md"));
        assert_eq!(bases[2], out.join("other"));
    }

    #[test]
    fn test_output_bases_never_take_the_summary_stem() {
        let out = Path::new("out");
        let files = vec![PathBuf::from("in/batch_summary.txt"), PathBuf::from("in/a.txt")];
        let bases = output_bases(&files, out);
        assert_eq!(bases[0], out.join("batch_summary_0"));
        assert_eq!(bases[1], out.join("a"));
    }

    #[test]
    fn test_output_bases_same_name_different_dirs() {
        let out = Path::new("out");
        let files = vec![PathBuf::from("a/x.txt"), PathBuf::from("b/x.txt")];
        let bases = output_bases(&files, out);
        assert_ne!(bases[0], bases[1]);
    }
}
