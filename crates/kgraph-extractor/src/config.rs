//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// How document text is split before it is sent to the LLM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Words per chunk
    pub chunk_size: usize,

    /// Words shared by consecutive chunks
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 200,
            overlap: 30,
        }
    }
}

/// Entity name standardization settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardizationConfig {
    /// Collapse entity spellings that differ only in case or spacing
    pub enabled: bool,

    /// Ask the LLM to resolve entity aliases as well
    ///
    /// Carried for configuration compatibility; the rule-based pass runs either way.
    pub use_llm_for_entities: bool,
}

impl Default for StandardizationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            use_llm_for_entities: true,
        }
    }
}

/// Relationship inference settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Run inference at all
    pub enabled: bool,

    /// Ask the LLM for additional relationships
    ///
    /// Carried for configuration compatibility; the rule-based pass runs either way.
    pub use_llm_for_inference: bool,

    /// Add `A -p-> C` for every `A -p-> B`, `B -p-> C`
    pub apply_transitive: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            use_llm_for_inference: true,
            apply_transitive: true,
        }
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Chunking settings
    pub chunking: ChunkingConfig,

    /// Standardization settings
    pub standardization: StandardizationConfig,

    /// Inference settings
    pub inference: InferenceConfig,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunking.chunk_size == 0 {
            return Err("chunking.chunk_size must be greater than 0".to_string());
        }
        if self.chunking.overlap >= self.chunking.chunk_size {
            return Err(format!(
                "chunking.overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.overlap, self.chunking.chunk_size
            ));
        }
        Ok(())
    }

    /// Minimal preset: small chunks, no standardization or inference
    pub fn minimal() -> Self {
        Self {
            chunking: ChunkingConfig {
                chunk_size: 80,
                overlap: 10,
            },
            standardization: StandardizationConfig {
                enabled: false,
                use_llm_for_entities: false,
            },
            inference: InferenceConfig {
                enabled: false,
                use_llm_for_inference: false,
                apply_transitive: false,
            },
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
