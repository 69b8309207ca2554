//! Integration tests for kgraph-batch
//!
//! Runs the worker pool over real temporary directories with an in-process
//! extractor.

use kgraph_batch::{
    write_report, BatchConfig, BatchProcessor, BatchSummary, FileStatus, PerformanceAnalyzer,
    CANCELLED_MESSAGE, SUMMARY_FILE,
};
use kgraph_domain::{Triple, TripleExtractor};
use kgraph_extractor::{Extractor, ExtractorConfig};
use kgraph_llm::MockProvider;
use proptest::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Extracts one triple per line of the form `subject predicate object`
///
/// A document containing `FAIL` errors and one containing `PANIC` panics.
struct LineExtractor;

impl TripleExtractor for LineExtractor {
    type Error = String;

    fn extract(&self, text: &str) -> Result<Vec<Triple>, Self::Error> {
        if text.contains("PANIC") {
            panic!("extractor blew up");
        }
        if text.contains("FAIL") {
            return Err("LLM communication error".to_string());
        }
        Ok(text
            .lines()
            .filter_map(|line| {
                let words: Vec<&str> = line.split_whitespace().collect();
                match words.as_slice() {
                    [s, p, o] => Some(Triple::new(*s, *p, *o)),
                    _ => None,
                }
            })
            .collect())
    }
}

/// Sleeps per document and records how many documents are in flight
///
/// A document containing `STOP` cancels `cancel` once its work is done.
struct SlowExtractor {
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    cancel: CancellationToken,
}

impl SlowExtractor {
    fn new(delay_ms: u64, cancel: CancellationToken) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            cancel,
        }
    }
}

impl TripleExtractor for SlowExtractor {
    type Error = String;

    fn extract(&self, text: &str) -> Result<Vec<Triple>, Self::Error> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        if text.contains("STOP") {
            self.cancel.cancel();
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(vec![Triple::new("A", "p", "B")])
    }
}

fn processor(max_workers: usize) -> BatchProcessor<LineExtractor> {
    BatchProcessor::new(
        LineExtractor,
        BatchConfig {
            max_workers,
            ..BatchConfig::default()
        },
    )
}

fn write(dir: &Path, name: &str, contents: &[u8]) {
    fs::write(dir.join(name), contents).unwrap();
}

#[tokio::test]
async fn test_one_unreadable_file_does_not_stop_the_batch() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "a.txt", b"Watt improved engine\n");
    // Invalid UTF-8 cannot be read as text
    write(input.path(), "b.txt", &[0xff, 0xfe, 0xfd]);
    write(input.path(), "c.txt", b"engine powered mill\n");

    let summary = processor(2)
        .process_directory(input.path(), output.path(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.successful, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.cancelled, 0);

    let failed = &summary.results[1];
    assert!(failed.file_path.ends_with("b.txt"));
    assert_eq!(failed.status, FileStatus::Failure);
    assert!(!failed.error.as_deref().unwrap().is_empty());

    assert!(output.path().join("a.json").exists());
    assert!(output.path().join("a.csv").exists());
    assert!(output.path().join("c.json").exists());
    assert!(!output.path().join("b.json").exists());
}

#[tokio::test]
async fn test_failure_messages() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "1_empty.txt", b"   \n\t");
    write(input.path(), "2_nothing.txt", b"no triples on this line here\n");
    write(input.path(), "3_error.txt", b"FAIL\n");

    let summary = processor(1)
        .process_directory(input.path(), output.path(), CancellationToken::new())
        .await
        .unwrap();

    let errors: Vec<&str> = summary
        .results
        .iter()
        .map(|r| r.error.as_deref().unwrap())
        .collect();
    assert_eq!(
        errors,
        vec!["Empty file", "No triples extracted", "LLM communication error"]
    );
    assert!(!summary.all_succeeded());
}

#[tokio::test]
async fn test_panicking_file_recorded_as_failure() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "a.txt", b"A p B\n");
    write(input.path(), "b.txt", b"PANIC\n");

    let summary = processor(2)
        .process_directory(input.path(), output.path(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.successful, 1);
    assert_eq!(summary.results[1].status, FileStatus::Failure);
    assert!(summary.results[1].error.as_deref().unwrap().contains("Worker failed"));
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    for name in ["a.txt", "b.txt", "c.md"] {
        write(input.path(), name, b"A p B\n");
    }

    let cancel = CancellationToken::new();
    cancel.cancel();
    let summary = processor(2)
        .process_directory(input.path(), output.path(), cancel)
        .await
        .unwrap();

    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.cancelled, 3);
    assert_eq!(summary.successful, 0);
    assert!(summary
        .results
        .iter()
        .all(|r| r.error.as_deref() == Some(CANCELLED_MESSAGE)));
}

#[tokio::test]
async fn test_shared_stems_get_extension_suffix() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "notes.txt", b"A p B\n");
    write(input.path(), "notes.md", b"C q D\n");

    let summary = processor(2)
        .process_directory(input.path(), output.path(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.successful, 2);
    assert!(output.path().join("notes_txt.json").exists());
    assert!(output.path().join("notes_md.json").exists());
}

#[tokio::test]
async fn test_summary_file_and_results_order() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    for name in ["d.txt", "b.txt", "a.md", "c.txt"] {
        write(input.path(), name, b"A p B\n");
    }

    let summary = processor(4)
        .process_directory(input.path(), output.path(), CancellationToken::new())
        .await
        .unwrap();

    let order: Vec<String> = summary.results.iter().map(|r| r.display_name()).collect();
    assert_eq!(order, vec!["b.txt", "c.txt", "d.txt", "a.md"]);

    let persisted: BatchSummary =
        serde_json::from_str(&fs::read_to_string(output.path().join(SUMMARY_FILE)).unwrap())
            .unwrap();
    assert_eq!(persisted.total_files, 4);
    assert_eq!(persisted.results[0].exports.len(), 2);
}

#[tokio::test]
async fn test_unsupported_export_only_fails_when_nothing_written() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "a.txt", b"A p B\n");

    let mixed = BatchProcessor::new(
        LineExtractor,
        BatchConfig {
            export_formats: vec!["json".into(), "pdf".into()],
            ..BatchConfig::default()
        },
    );
    let summary = mixed
        .process_directory(input.path(), output.path(), CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.successful, 1);
    assert!(summary.results[0].exports[1].error.is_some());

    let none = BatchProcessor::new(
        LineExtractor,
        BatchConfig {
            export_formats: vec!["pdf".into()],
            ..BatchConfig::default()
        },
    );
    let summary = none
        .process_directory(input.path(), output.path(), CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.results[0].triples, 1);
}

#[tokio::test]
async fn test_empty_directory_gives_empty_summary() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "image.png", b"binary");

    let summary = processor(2)
        .process_directory(input.path(), output.path(), CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.total_files, 0);
    assert!(!PerformanceAnalyzer::analyze(&summary).has_data());
}

#[tokio::test]
async fn test_process_files_with_llm_extractor_and_report() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "watt.txt", b"James Watt improved the steam engine.");

    let mut llm = MockProvider::default();
    llm.add_response(
        "James Watt",
        r#"[{"subject": "James Watt", "predicate": "improved", "object": "steam engine"}]"#,
    );
    let extractor = Extractor::new(llm, ExtractorConfig::default());
    let processor = BatchProcessor::new(extractor, BatchConfig::default());

    let summary = processor
        .process_files(
            vec![input.path().join("watt.txt")],
            output.path(),
            CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(summary.successful, 1);
    assert_eq!(summary.results[0].triples, 1);

    let report_path = output.path().join("performance_report.md");
    let report = write_report(&report_path, &summary, chrono::Utc::now()).unwrap();
    assert!(report.has_data());
    let text = fs::read_to_string(report_path).unwrap();
    assert!(text.contains("- watt.txt: 1 triples"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// Property: K failing files among N give exactly N - K successes
    #[test]
    fn prop_failures_are_isolated(outcomes in prop::collection::vec(any::<bool>(), 1..8), workers in 1usize..4) {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for (idx, ok) in outcomes.iter().enumerate() {
            let body: &[u8] = if *ok { b"A p B\n" } else { b"FAIL\n" };
            write(input.path(), &format!("doc{:02}.txt", idx), body);
        }

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let summary = runtime
            .block_on(processor(workers).process_directory(
                input.path(),
                output.path(),
                CancellationToken::new(),
            ))
            .unwrap();

        let expected = outcomes.iter().filter(|ok| **ok).count();
        prop_assert_eq!(summary.total_files, outcomes.len());
        prop_assert_eq!(summary.successful, expected);
        prop_assert_eq!(summary.failed, outcomes.len() - expected);
        for (result, ok) in summary.results.iter().zip(&outcomes) {
            prop_assert_eq!(result.is_success(), *ok);
        }
    }
}

#[tokio::test]
async fn test_document_named_like_summary_keeps_its_export() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "batch_summary.txt", b"Watt improved engine\n");

    let processor = BatchProcessor::new(
        LineExtractor,
        BatchConfig {
            export_formats: vec!["json".to_string()],
            ..BatchConfig::default()
        },
    );
    let summary = processor
        .process_directory(input.path(), output.path(), CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.successful, 1);

    let persisted: BatchSummary =
        serde_json::from_str(&fs::read_to_string(output.path().join(SUMMARY_FILE)).unwrap())
            .unwrap();
    assert_eq!(persisted.total_files, 1);

    let exported = fs::read_to_string(output.path().join("batch_summary_0.json")).unwrap();
    assert!(exported.contains("Watt"));
    assert!(serde_json::from_str::<BatchSummary>(&exported).is_err());
}

#[tokio::test]
async fn test_worker_pool_respects_max_workers() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    for i in 0..6 {
        write(input.path(), &format!("doc{}.txt", i), b"A p B\n");
    }

    let extractor = SlowExtractor::new(80, CancellationToken::new());
    let peak = Arc::clone(&extractor.peak);
    let processor = BatchProcessor::new(
        extractor,
        BatchConfig {
            max_workers: 2,
            ..BatchConfig::default()
        },
    );
    let summary = processor
        .process_directory(input.path(), output.path(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.successful, 6);
    assert_eq!(peak.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_cancel_mid_run_finishes_in_flight_files() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "a.txt", b"STOP\n");
    for name in ["b.txt", "c.txt", "d.txt", "e.txt", "f.txt"] {
        write(input.path(), name, b"A p B\n");
    }

    let cancel = CancellationToken::new();
    let processor = BatchProcessor::new(
        SlowExtractor::new(60, cancel.clone()),
        BatchConfig {
            max_workers: 2,
            ..BatchConfig::default()
        },
    );
    let summary = processor
        .process_directory(input.path(), output.path(), cancel)
        .await
        .unwrap();

    assert_eq!(summary.total_files, 6);
    assert_eq!(summary.successful + summary.cancelled, 6);
    assert_eq!(summary.failed, summary.cancelled);
    // The file that triggered cancellation was already in flight
    assert!(summary.results[0].is_success());
    assert!(output.path().join("a.json").exists());
    assert!(summary.results[2..].iter().all(|r| r.is_cancelled()));
    assert!(summary.results[2..]
        .iter()
        .all(|r| r.error.as_deref() == Some(CANCELLED_MESSAGE)));
}
