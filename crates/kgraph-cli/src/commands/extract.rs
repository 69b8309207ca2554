//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::{outcome_json, Formatter};
use kgraph_domain::{GraphStats, Triple, TripleExtractor};
use kgraph_export::{export_multiple_formats, read_triples_json, ExportOptions, ExportOutcome};
use kgraph_extractor::Extractor;
use kgraph_filter::FilterSpec;
use kgraph_llm::ChatProvider;
use kgraph_neo4j::{ImportReport, Neo4jAdapter, Neo4jConfig};
use serde_json::json;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tokio::runtime::Runtime;
use tracing::{info, warn};

/// Execute the extract command.
pub fn execute_extract(
    args: ExtractArgs,
    mut config: Config,
    runtime: &Runtime,
    formatter: &Formatter,
) -> Result<usize> {
    args.processing.apply(&mut config);
    args.neo4j.apply(&mut config);
    config.validate()?;

    // Reject bad filter flags before spending LLM calls
    let spec = args.filter.to_spec();
    spec.validate()?;

    let triples = match (&args.triples, &args.input) {
        (Some(path), _) => load_triples(path)?,
        (None, Some(path)) => {
            let text = read_document(path)?;
            let provider =
                ChatProvider::with_api_key(config.llm.clone(), config.llm_api_key.clone())?;
            extract_text(&Extractor::new(provider, config.extractor_config()), &text)?
        }
        (None, None) => {
            return Err(CliError::InvalidInput(
                "Either --input or --triples is required".to_string(),
            ))
        }
    };

    let (filtered, outcomes) =
        filter_and_export(&triples, &spec, &args.export_base, &args.export_formats)?;
    let statistics = GraphStats::from_triples(&filtered);

    let import = if args.neo4j_export || config.neo4j.enabled {
        let clear = args.neo4j_clear || config.neo4j.clear_existing;
        Some(runtime.block_on(import_graph(config.neo4j.clone(), &filtered, clear))?)
    } else {
        None
    };

    let failures = outcomes.iter().filter(|o| !o.is_success()).count();

    if formatter.is_json() {
        let exports: Vec<_> = outcomes.iter().map(outcome_json).collect();
        println!(
            "{}",
            formatter.json(&json!({
                "statistics": statistics,
                "exports": exports,
                "neo4j": import,
            }))?
        );
    } else {
        if !spec.is_empty() {
            println!(
                "{}",
                formatter.info(&format!("Filtered {} → {} triples", triples.len(), filtered.len()))
            );
        }
        println!("{}", formatter.graph_stats(&statistics)?);
        println!("{}", formatter.export_outcomes(&outcomes)?);
        if let Some(report) = &import {
            println!("{}", formatter.import_report(report)?);
        }
    }

    Ok(failures)
}

/// Read a document, rejecting empty ones.
fn read_document(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).map_err(|e| {
        CliError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
    })?;
    if text.trim().is_empty() {
        return Err(CliError::InvalidInput(format!(
            "Input file {} is empty",
            path.display()
        )));
    }
    Ok(text)
}

/// Load triples written by the JSON exporter.
pub fn load_triples(path: &Path) -> Result<Vec<Triple>> {
    let file = File::open(path).map_err(|e| {
        CliError::InvalidInput(format!("Failed to open {}: {}", path.display(), e))
    })?;
    let triples = read_triples_json(BufReader::new(file))?;
    info!(path = %path.display(), triples = triples.len(), "Loaded triples");
    Ok(triples)
}

/// Run `extractor` over `text`, failing when nothing comes back.
pub fn extract_text<E>(extractor: &E, text: &str) -> Result<Vec<Triple>>
where
    E: TripleExtractor,
    CliError: From<E::Error>,
{
    let triples = extractor.extract(text)?;
    if triples.is_empty() {
        return Err(CliError::InvalidInput("No triples extracted".to_string()));
    }
    Ok(triples)
}

/// Apply `spec` and write every requested format next to `base`.
///
/// The parent directory of `base` is created if missing. Formats fail
/// independently; see each [`ExportOutcome`].
pub fn filter_and_export(
    triples: &[Triple],
    spec: &FilterSpec,
    base: &Path,
    formats: &[String],
) -> Result<(Vec<Triple>, Vec<ExportOutcome>)> {
    let filtered = if spec.is_empty() {
        triples.to_vec()
    } else {
        spec.apply(triples)?
    };
    if filtered.is_empty() {
        warn!(before = triples.len(), "Filters removed every triple");
    }

    if let Some(parent) = base.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let outcomes = export_multiple_formats(&filtered, base, formats, &ExportOptions::default());
    Ok((filtered, outcomes))
}

async fn import_graph(
    config: Neo4jConfig,
    triples: &[Triple],
    clear_first: bool,
) -> Result<ImportReport> {
    let mut adapter = Neo4jAdapter::connect(config).await?;
    let report = adapter.import_triples(triples, clear_first).await;
    adapter.close();
    Ok(report?)
}
