//! Built-in configuration profiles.

use crate::config::{Config, EdgeSmooth, VisualizationConfig};
use kgraph_extractor::{ChunkingConfig, InferenceConfig, StandardizationConfig};
use kgraph_llm::config::{ANTHROPIC_MESSAGES_URL, OLLAMA_CHAT_URL, OPENAI_CHAT_URL};
use kgraph_llm::{LlmConfig, Provider};
use kgraph_neo4j::Neo4jConfig;

/// Model used by the `ollama` profile
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3.2";

/// A named configuration preset.
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    /// Canonical name
    pub name: &'static str,
    /// Other accepted names
    pub aliases: &'static [&'static str],
    /// One-line summary
    pub description: &'static str,
    build: fn() -> Config,
}

impl Profile {
    /// The complete configuration this profile yields.
    pub fn config(&self) -> Config {
        (self.build)()
    }
}

/// Every built-in profile, in display order.
pub const PROFILES: &[Profile] = &[
    Profile {
        name: "openai",
        aliases: &[],
        description: "OpenAI GPT-4o with balanced chunking",
        build: openai,
    },
    Profile {
        name: "claude",
        aliases: &["anthropic"],
        description: "Anthropic Claude with larger chunks",
        build: claude,
    },
    Profile {
        name: "ollama",
        aliases: &[],
        description: "Local Ollama model, no API key needed",
        build: ollama,
    },
    Profile {
        name: "fast",
        aliases: &["fast_processing", "fast-processing"],
        description: "Small chunks and a fast model, rule-based refinement only",
        build: fast,
    },
    Profile {
        name: "high-quality",
        aliases: &["high_quality"],
        description: "Large chunks with wide overlap and low temperature",
        build: high_quality,
    },
    Profile {
        name: "minimal",
        aliases: &[],
        description: "Extraction only: no standardization or inference",
        build: minimal,
    },
    Profile {
        name: "research",
        aliases: &[],
        description: "Deterministic extraction with Neo4j export enabled",
        build: research,
    },
];

/// Look up a profile by name or alias, ignoring case.
pub fn find(name: &str) -> Option<&'static Profile> {
    let name = name.trim().to_lowercase();
    PROFILES
        .iter()
        .find(|p| p.name == name || p.aliases.contains(&name.as_str()))
}

/// Canonical profile names.
pub fn names() -> Vec<&'static str> {
    PROFILES.iter().map(|p| p.name).collect()
}

fn llm(provider: Provider, model: &str, base_url: &str, max_tokens: u32, temperature: f64) -> LlmConfig {
    LlmConfig {
        provider,
        model: model.to_string(),
        base_url: base_url.to_string(),
        max_tokens,
        temperature,
        ..LlmConfig::default()
    }
}

fn chunking(chunk_size: usize, overlap: usize) -> ChunkingConfig {
    ChunkingConfig {
        chunk_size,
        overlap,
    }
}

fn refinement(use_llm: bool) -> (StandardizationConfig, InferenceConfig) {
    (
        StandardizationConfig {
            enabled: true,
            use_llm_for_entities: use_llm,
        },
        InferenceConfig {
            enabled: true,
            use_llm_for_inference: use_llm,
            apply_transitive: true,
        },
    )
}

fn neo4j(enabled: bool, graph_name: &str) -> Neo4jConfig {
    Neo4jConfig {
        enabled,
        graph_name: graph_name.to_string(),
        ..Neo4jConfig::default()
    }
}

fn assemble(
    llm: LlmConfig,
    chunking: ChunkingConfig,
    (standardization, inference): (StandardizationConfig, InferenceConfig),
    edge_smooth: EdgeSmooth,
    neo4j: Neo4jConfig,
) -> Config {
    Config {
        llm,
        chunking,
        standardization,
        inference,
        visualization: VisualizationConfig { edge_smooth },
        neo4j,
        llm_api_key: None,
    }
}

/// The `openai` profile, also the built-in default.
pub fn openai() -> Config {
    assemble(
        llm(Provider::Openai, "gpt-4o", OPENAI_CHAT_URL, 4096, 0.2),
        chunking(200, 30),
        refinement(true),
        EdgeSmooth::Continuous,
        neo4j(false, "OpenAI_KnowledgeGraph"),
    )
}

/// The `claude` profile.
pub fn claude() -> Config {
    assemble(
        llm(
            Provider::Anthropic,
            "claude-3-sonnet-20240229",
            ANTHROPIC_MESSAGES_URL,
            4096,
            0.3,
        ),
        chunking(250, 40),
        refinement(true),
        EdgeSmooth::Dynamic,
        Neo4jConfig::default(),
    )
}

/// The `ollama` profile.
pub fn ollama() -> Config {
    let graph_name = format!("Ollama_{}_KG", OLLAMA_DEFAULT_MODEL.replace('.', "_"));
    assemble(
        llm(Provider::Ollama, OLLAMA_DEFAULT_MODEL, OLLAMA_CHAT_URL, 8192, 0.4),
        chunking(150, 25),
        refinement(true),
        EdgeSmooth::Off,
        neo4j(false, &graph_name),
    )
}

/// The `fast` profile.
pub fn fast() -> Config {
    assemble(
        llm(Provider::Openai, "gpt-3.5-turbo", OPENAI_CHAT_URL, 2048, 0.1),
        chunking(100, 15),
        refinement(false),
        EdgeSmooth::Off,
        Neo4jConfig::default(),
    )
}

/// The `high-quality` profile.
pub fn high_quality() -> Config {
    assemble(
        llm(Provider::Openai, "gpt-4o", OPENAI_CHAT_URL, 8192, 0.1),
        chunking(300, 50),
        refinement(true),
        EdgeSmooth::Continuous,
        Neo4jConfig::default(),
    )
}

/// The `minimal` profile.
pub fn minimal() -> Config {
    let mut config = assemble(
        llm(Provider::Openai, "gpt-3.5-turbo", OPENAI_CHAT_URL, 1024, 0.2),
        chunking(80, 10),
        refinement(false),
        EdgeSmooth::Off,
        Neo4jConfig::default(),
    );
    config.standardization.enabled = false;
    config.inference.enabled = false;
    config.inference.apply_transitive = false;
    config
}

/// The `research` profile.
pub fn research() -> Config {
    assemble(
        llm(Provider::Openai, "gpt-4o", OPENAI_CHAT_URL, 8192, 0.0),
        chunking(250, 40),
        refinement(true),
        EdgeSmooth::Continuous,
        neo4j(true, "Research_KnowledgeGraph"),
    )
}
