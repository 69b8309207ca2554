//! Prompts for triple extraction

/// System prompt sent with every extraction call
pub const SYSTEM_PROMPT: &str = "You are an expert at extracting structured knowledge \
from text. You identify entities and the relationships between them and answer only \
with JSON.";

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract subject-predicate-object triples from the text below.

Rules:
- Use short, specific entity names (at most a few words)
- Use concise predicates of one to three words
- Resolve pronouns to the entity they refer to
- Only state relationships the text supports"#;

const OUTPUT_FORMAT: &str = r#"Output format (JSON array only, no additional text):
[
  {"subject": "entity", "predicate": "relationship", "object": "entity"}
]"#;

/// Build the user prompt for one chunk
pub fn build_extraction_prompt(chunk: &str) -> String {
    let mut prompt = String::with_capacity(chunk.len() + 512);
    prompt.push_str(EXTRACTION_INSTRUCTIONS);
    prompt.push_str("\n\nText to analyze:\n---\n");
    prompt.push_str(chunk);
    prompt.push_str("\n---\n\n");
    prompt.push_str(OUTPUT_FORMAT);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_chunk_and_format() {
        let prompt = build_extraction_prompt("Watt improved the engine.");
        assert!(prompt.contains("Watt improved the engine."));
        assert!(prompt.contains("JSON array only"));
    }
}
