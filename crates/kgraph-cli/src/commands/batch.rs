//! Batch command implementation.

use crate::cli::BatchArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chrono::Utc;
use kgraph_batch::{write_report, BatchConfig, BatchProcessor, BatchSummary, REPORT_FILE};
use kgraph_domain::TripleExtractor;
use kgraph_extractor::Extractor;
use kgraph_llm::ChatProvider;
use serde_json::json;
use std::path::Path;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Execute the batch command.
pub fn execute_batch(
    args: BatchArgs,
    mut config: Config,
    runtime: &Runtime,
    formatter: &Formatter,
) -> Result<usize> {
    args.processing.apply(&mut config);
    config.validate()?;

    let batch_config = BatchConfig {
        max_workers: args.max_workers,
        file_patterns: args.file_patterns.clone(),
        export_formats: args.export_formats.clone(),
        write_summary: true,
    };
    batch_config.validate().map_err(CliError::Config)?;

    let provider = ChatProvider::with_api_key(config.llm.clone(), config.llm_api_key.clone())?;
    let processor = BatchProcessor::new(
        Extractor::new(provider, config.extractor_config()),
        batch_config,
    );

    let summary = runtime.block_on(run_until_interrupted(
        &processor,
        &args.input_dir,
        &args.output_dir,
    ))?;
    let report = write_report(&args.output_dir.join(REPORT_FILE), &summary, Utc::now())?;

    if formatter.is_json() {
        let value = if args.analyze_performance {
            json!({ "summary": summary, "performance": report })
        } else {
            json!({ "summary": summary })
        };
        println!("{}", formatter.json(&value)?);
    } else {
        println!("{}", formatter.batch_summary(&summary)?);
        if args.analyze_performance {
            println!("{}", formatter.performance(&report)?);
        }
        println!(
            "{}",
            formatter.info(&format!(
                "Report written to {}",
                args.output_dir.join(REPORT_FILE).display()
            ))
        );
    }

    Ok(summary.failed)
}

/// Process `input_dir`, cancelling queued files on Ctrl-C.
async fn run_until_interrupted<E>(
    processor: &BatchProcessor<E>,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<BatchSummary>
where
    E: TripleExtractor + Send + Sync + 'static,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing files in progress");
            token.cancel();
        }
    });

    let summary = processor
        .process_directory(input_dir, output_dir, cancel)
        .await;
    interrupt.abort();
    Ok(summary?)
}
