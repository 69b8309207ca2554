//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::Triple;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (kgraph-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion for `prompt`, optionally steered by a system prompt
    fn generate(&self, system: Option<&str>, prompt: &str) -> Result<String, Self::Error>;

    /// Name of the model answering requests
    fn model_name(&self) -> &str;
}

/// Trait for turning document text into triples
///
/// Implemented by the application layer (kgraph-extractor). The batch processor
/// depends only on this trait, so tests can substitute deterministic extractors.
pub trait TripleExtractor {
    /// Error type for extraction operations
    type Error: std::fmt::Display;

    /// Extract an ordered sequence of triples from document text
    fn extract(&self, text: &str) -> Result<Vec<Triple>, Self::Error>;
}

#[cfg(test)]
mod tests {
    // Downstream crates import both traits from the crate root
    use crate::{LlmProvider, Triple, TripleExtractor};

    struct Echo;

    impl LlmProvider for Echo {
        type Error = String;

        fn generate(&self, system: Option<&str>, prompt: &str) -> Result<String, String> {
            Ok(format!("{}|{}", system.unwrap_or("-"), prompt))
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    struct OnePerLine;

    impl TripleExtractor for OnePerLine {
        type Error = String;

        fn extract(&self, text: &str) -> Result<Vec<Triple>, String> {
            Ok(text
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(|l| Triple::new(l.trim(), "mentions", "text"))
                .collect())
        }
    }

    fn count<E: TripleExtractor>(extractor: &E, text: &str) -> usize {
        extractor.extract(text).map(|t| t.len()).unwrap_or(0)
    }

    #[test]
    fn test_root_reexported_traits() {
        assert_eq!(Echo.generate(Some("sys"), "hi").unwrap(), "sys|hi");
        assert_eq!(Echo.model_name(), "echo");
        assert_eq!(count(&OnePerLine, "watt\n\nboulton\n"), 2);
    }
}
