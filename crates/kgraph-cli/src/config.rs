//! Configuration loading and layering.
//!
//! A run's configuration is built in layers, later layers winning:
//! built-in defaults, then the selected profile, then the configuration
//! file, then command-line flags. The file may set any subset of keys;
//! unknown sections or keys are rejected.

use crate::error::{CliError, Result};
use crate::profiles;
use kgraph_extractor::{ChunkingConfig, ExtractorConfig, InferenceConfig, StandardizationConfig};
use kgraph_llm::{LlmConfig, Provider};
use kgraph_neo4j::Neo4jConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working and user configuration directories
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Edge smoothing carried for graph renderers
///
/// Written as `"continuous"`, `"dynamic"` or `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EdgeSmoothRepr", into = "EdgeSmoothRepr")]
pub enum EdgeSmooth {
    /// Continuous curves
    Continuous,
    /// Dynamic curves
    Dynamic,
    /// Straight edges
    Off,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum EdgeSmoothRepr {
    Flag(bool),
    Mode(String),
}

impl TryFrom<EdgeSmoothRepr> for EdgeSmooth {
    type Error = String;

    fn try_from(repr: EdgeSmoothRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            EdgeSmoothRepr::Flag(false) => Ok(EdgeSmooth::Off),
            EdgeSmoothRepr::Flag(true) => Ok(EdgeSmooth::Continuous),
            EdgeSmoothRepr::Mode(mode) => match mode.as_str() {
                "continuous" => Ok(EdgeSmooth::Continuous),
                "dynamic" => Ok(EdgeSmooth::Dynamic),
                other => Err(format!(
                    "edge_smooth must be \"continuous\", \"dynamic\" or false, got \"{}\"",
                    other
                )),
            },
        }
    }
}

impl From<EdgeSmooth> for EdgeSmoothRepr {
    fn from(smooth: EdgeSmooth) -> Self {
        match smooth {
            EdgeSmooth::Continuous => EdgeSmoothRepr::Mode("continuous".to_string()),
            EdgeSmooth::Dynamic => EdgeSmoothRepr::Mode("dynamic".to_string()),
            EdgeSmooth::Off => EdgeSmoothRepr::Flag(false),
        }
    }
}

/// Settings for downstream graph renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizationConfig {
    /// Edge smoothing mode
    pub edge_smooth: EdgeSmooth,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            edge_smooth: EdgeSmooth::Continuous,
        }
    }
}

/// A complete, validated run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// LLM connection
    pub llm: LlmConfig,
    /// Word chunking
    pub chunking: ChunkingConfig,
    /// Entity standardization
    pub standardization: StandardizationConfig,
    /// Relationship inference
    pub inference: InferenceConfig,
    /// Renderer settings
    pub visualization: VisualizationConfig,
    /// Graph database
    pub neo4j: Neo4jConfig,

    /// API key from the configuration file; the environment is used otherwise
    #[serde(skip)]
    pub llm_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        profiles::openai()
    }
}

impl Config {
    /// Extraction settings
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            chunking: self.chunking,
            standardization: self.standardization,
            inference: self.inference,
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.llm.validate().map_err(CliError::Config)?;
        self.extractor_config().validate().map_err(CliError::Config)?;
        self.neo4j.validate().map_err(CliError::Config)?;
        Ok(())
    }

    /// Serialize as a configuration file.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Build a configuration from a profile and an optional file.
    ///
    /// `profile` defaults to the built-in defaults. The result is validated.
    pub fn resolve(profile: Option<&str>, file: Option<&Path>) -> Result<Self> {
        let mut config = match profile {
            Some(name) => profiles::find(name)
                .map(|p| p.config())
                .ok_or_else(|| {
                    CliError::Config(format!(
                        "Unknown profile '{}'. Available: {}",
                        name,
                        profiles::names().join(", ")
                    ))
                })?,
            None => Self::default(),
        };

        if let Some(path) = file {
            tracing::debug!(path = %path.display(), "Loading configuration file");
            ConfigFile::load(path)?.apply(&mut config);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Locate the configuration file.
///
/// An explicit path must exist. Otherwise `config.toml` in `cwd` is used if
/// present, then `config.toml` in `user_dir`.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    cwd: &Path,
    user_dir: Option<&Path>,
) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(CliError::Config(format!(
                "Configuration file {} does not exist",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    let local = cwd.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(Some(local));
    }

    Ok(user_dir
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file()))
}

/// `<platform config dir>/kgraph`
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kgraph"))
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// A configuration file: every key optional, unknown keys rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    llm: Option<LlmSection>,
    chunking: Option<ChunkingSection>,
    standardization: Option<StandardizationSection>,
    inference: Option<InferenceSection>,
    visualization: Option<VisualizationSection>,
    neo4j: Option<Neo4jSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LlmSection {
    provider: Option<Provider>,
    model: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
    timeout_secs: Option<u64>,
    max_retries: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChunkingSection {
    chunk_size: Option<usize>,
    overlap: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StandardizationSection {
    enabled: Option<bool>,
    use_llm_for_entities: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct InferenceSection {
    enabled: Option<bool>,
    use_llm_for_inference: Option<bool>,
    apply_transitive: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct VisualizationSection {
    edge_smooth: Option<EdgeSmooth>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Neo4jSection {
    enabled: Option<bool>,
    uri: Option<String>,
    username: Option<String>,
    password: Option<String>,
    database: Option<String>,
    graph_name: Option<String>,
    clear_existing: Option<bool>,
    max_retry_attempts: Option<u32>,
    retry_delay_ms: Option<u64>,
    query_timeout_secs: Option<u64>,
    batch_size: Option<usize>,
}

impl ConfigFile {
    /// Parse a configuration file's contents.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents).map_err(|e| match e {
            CliError::Toml(e) => CliError::Config(format!("{}: {}", path.display(), e)),
            other => other,
        })
    }

    /// Overlay the keys this file sets onto `config`.
    pub fn apply(self, config: &mut Config) {
        if let Some(llm) = self.llm {
            set(&mut config.llm.provider, llm.provider);
            set(&mut config.llm.model, llm.model);
            set(&mut config.llm.base_url, llm.base_url);
            set(&mut config.llm.max_tokens, llm.max_tokens);
            set(&mut config.llm.temperature, llm.temperature);
            set(&mut config.llm.timeout_secs, llm.timeout_secs);
            set(&mut config.llm.max_retries, llm.max_retries);
            if llm.api_key.is_some() {
                config.llm_api_key = llm.api_key;
            }
        }
        if let Some(chunking) = self.chunking {
            set(&mut config.chunking.chunk_size, chunking.chunk_size);
            set(&mut config.chunking.overlap, chunking.overlap);
        }
        if let Some(standardization) = self.standardization {
            set(&mut config.standardization.enabled, standardization.enabled);
            set(
                &mut config.standardization.use_llm_for_entities,
                standardization.use_llm_for_entities,
            );
        }
        if let Some(inference) = self.inference {
            set(&mut config.inference.enabled, inference.enabled);
            set(
                &mut config.inference.use_llm_for_inference,
                inference.use_llm_for_inference,
            );
            set(&mut config.inference.apply_transitive, inference.apply_transitive);
        }
        if let Some(visualization) = self.visualization {
            set(&mut config.visualization.edge_smooth, visualization.edge_smooth);
        }
        if let Some(neo4j) = self.neo4j {
            let target = &mut config.neo4j;
            set(&mut target.enabled, neo4j.enabled);
            set(&mut target.uri, neo4j.uri);
            set(&mut target.username, neo4j.username);
            set(&mut target.password, neo4j.password);
            set(&mut target.database, neo4j.database);
            set(&mut target.graph_name, neo4j.graph_name);
            set(&mut target.clear_existing, neo4j.clear_existing);
            set(&mut target.max_retry_attempts, neo4j.max_retry_attempts);
            set(&mut target.retry_delay_ms, neo4j.retry_delay_ms);
            set(&mut target.query_timeout_secs, neo4j.query_timeout_secs);
            set(&mut target.batch_size, neo4j.batch_size);
        }
    }
}
