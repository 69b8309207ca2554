//! Core Extractor implementation

use crate::chunking::chunk_words;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::prompt::{build_extraction_prompt, SYSTEM_PROMPT};
use crate::refine::{infer_transitive, standardize};
use kgraph_domain::traits::{LlmProvider, TripleExtractor};
use kgraph_domain::Triple;
use std::time::Instant;
use tracing::{debug, info};

/// The Extractor converts unstructured text into triples
///
/// Calls are synchronous; async callers run `extract` on the blocking pool.
pub struct Extractor<L: LlmProvider> {
    llm_provider: L,
    config: ExtractorConfig,
}

impl<L> Extractor<L>
where
    L: LlmProvider,
    L::Error: std::fmt::Display,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        Self {
            llm_provider,
            config,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The wrapped provider
    pub fn provider(&self) -> &L {
        &self.llm_provider
    }

    fn extract_chunk(&self, index: usize, chunk: &str) -> Result<Vec<Triple>, ExtractorError> {
        let prompt = build_extraction_prompt(chunk);
        debug!(chunk = index, prompt_len = prompt.len(), "Calling LLM");

        let response = self
            .llm_provider
            .generate(Some(SYSTEM_PROMPT), &prompt)
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!(chunk = index, response_len = response.len(), "LLM responded");
        parse_llm_response(&response, index)
    }
}

impl<L> TripleExtractor for Extractor<L>
where
    L: LlmProvider,
    L::Error: std::fmt::Display,
{
    type Error = ExtractorError;

    fn extract(&self, text: &str) -> Result<Vec<Triple>, Self::Error> {
        self.config.validate().map_err(ExtractorError::Config)?;
        let start = Instant::now();

        let chunking = &self.config.chunking;
        let chunks = chunk_words(text, chunking.chunk_size, chunking.overlap);
        info!(
            chunks = chunks.len(),
            model = self.llm_provider.model_name(),
            "Starting extraction"
        );

        let mut triples = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            triples.extend(self.extract_chunk(index, chunk)?);
        }

        if self.config.standardization.enabled {
            triples = standardize(triples);
        }

        let inference = &self.config.inference;
        if inference.enabled && inference.apply_transitive {
            triples = infer_transitive(triples);
        }

        info!(
            triples = triples.len(),
            inferred = triples.iter().filter(|t| t.inferred).count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Extraction complete"
        );
        Ok(triples)
    }
}
