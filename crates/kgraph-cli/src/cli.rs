//! CLI command definitions and argument parsing.

use crate::config::Config;
use clap::{Args, Parser, Subcommand};
use kgraph_filter::{FilterSpec, SubgraphSpec};
use std::path::PathBuf;

/// kgraph - Build knowledge graphs from text with an LLM.
#[derive(Debug, Parser)]
#[command(name = "kgraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Profile to start from
    #[arg(short, long, global = true, env = "KGRAPH_PROFILE")]
    pub profile: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print results and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract a knowledge graph from one document
    Extract(ExtractArgs),

    /// Extract knowledge graphs from every matching file in a directory
    Batch(BatchArgs),

    /// Inspect and export configuration profiles
    Profile(ProfileArgs),

    /// Query a graph stored in Neo4j
    Graph(GraphArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Input text file
    #[arg(short, long, required_unless_present = "triples", conflicts_with = "triples")]
    pub input: Option<PathBuf>,

    /// Previously exported JSON triples to filter and export again
    #[arg(long)]
    pub triples: Option<PathBuf>,

    /// Export formats (json, csv, graphml, gexf, turtle)
    #[arg(long, value_delimiter = ',', default_value = "json")]
    pub export_formats: Vec<String>,

    /// Output path without extension
    #[arg(long, default_value = "knowledge_graph")]
    pub export_base: PathBuf,

    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub processing: ProcessingArgs,

    #[command(flatten)]
    pub neo4j: Neo4jArgs,

    /// Import the result into Neo4j
    #[arg(long)]
    pub neo4j_export: bool,

    /// Clear the database before importing
    #[arg(long)]
    pub neo4j_clear: bool,
}

/// Graph filter flags.
#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Keep only triples mentioning these entities
    #[arg(long, value_delimiter = ',')]
    pub filter_entities: Vec<String>,

    /// Drop triples mentioning these entities
    #[arg(long, value_delimiter = ',')]
    pub exclude_entities: Vec<String>,

    /// Keep only these relationships
    #[arg(long, value_delimiter = ',')]
    pub filter_relationships: Vec<String>,

    /// Drop these relationships
    #[arg(long, value_delimiter = ',')]
    pub exclude_relationships: Vec<String>,

    /// Keep only triples read from the text
    #[arg(long)]
    pub only_original: bool,

    /// Keep only inferred triples
    #[arg(long)]
    pub only_inferred: bool,

    /// Minimum confidence (0.0-1.0)
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Keep only the neighborhood of this entity
    #[arg(long)]
    pub subgraph_entity: Option<String>,

    /// Hops around --subgraph-entity
    #[arg(long, default_value = "2")]
    pub subgraph_hops: usize,
}

impl FilterArgs {
    /// The filter pipeline these flags describe.
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec {
            include_entities: self.filter_entities.clone(),
            exclude_entities: self.exclude_entities.clone(),
            include_relationships: self.filter_relationships.clone(),
            exclude_relationships: self.exclude_relationships.clone(),
            only_original: self.only_original,
            only_inferred: self.only_inferred,
            min_confidence: self.min_confidence,
            subgraph: self.subgraph_entity.as_ref().map(|center| SubgraphSpec {
                center: center.clone(),
                max_hops: self.subgraph_hops,
            }),
        }
    }
}

/// Processing overrides applied over profile and file.
#[derive(Debug, Default, Args)]
pub struct ProcessingArgs {
    /// Words per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Words shared by consecutive chunks
    #[arg(long)]
    pub overlap: Option<usize>,

    /// LLM model
    #[arg(long)]
    pub model: Option<String>,

    /// LLM sampling temperature
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Skip entity standardization
    #[arg(long)]
    pub no_standardize: bool,

    /// Skip relationship inference
    #[arg(long)]
    pub no_inference: bool,
}

impl ProcessingArgs {
    /// Overlay the flags that were given.
    pub fn apply(&self, config: &mut Config) {
        if let Some(chunk_size) = self.chunk_size {
            config.chunking.chunk_size = chunk_size;
        }
        if let Some(overlap) = self.overlap {
            config.chunking.overlap = overlap;
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if self.no_standardize {
            config.standardization.enabled = false;
        }
        if self.no_inference {
            config.inference.enabled = false;
        }
    }
}

/// Neo4j connection overrides.
#[derive(Debug, Default, Args)]
pub struct Neo4jArgs {
    /// Bolt URI
    #[arg(long)]
    pub neo4j_uri: Option<String>,

    /// User name
    #[arg(long)]
    pub neo4j_user: Option<String>,

    /// Password
    #[arg(long, env = "NEO4J_PASSWORD", hide_env_values = true)]
    pub neo4j_password: Option<String>,

    /// Database name
    #[arg(long)]
    pub neo4j_database: Option<String>,
}

impl Neo4jArgs {
    /// Overlay the flags that were given.
    pub fn apply(&self, config: &mut Config) {
        if let Some(uri) = &self.neo4j_uri {
            config.neo4j.uri = uri.clone();
        }
        if let Some(user) = &self.neo4j_user {
            config.neo4j.username = user.clone();
        }
        if let Some(password) = &self.neo4j_password {
            config.neo4j.password = password.clone();
        }
        if let Some(database) = &self.neo4j_database {
            config.neo4j.database = database.clone();
        }
    }
}

/// Arguments for the batch command.
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Directory of documents
    #[arg(long)]
    pub input_dir: PathBuf,

    /// Directory for exports and reports
    #[arg(long)]
    pub output_dir: PathBuf,

    /// File name patterns
    #[arg(long, value_delimiter = ',', default_value = "*.txt,*.md")]
    pub file_patterns: Vec<String>,

    /// Concurrent workers
    #[arg(long, default_value = "2")]
    pub max_workers: usize,

    /// Export formats per document
    #[arg(long, value_delimiter = ',', default_value = "json,csv")]
    pub export_formats: Vec<String>,

    /// Print the performance analysis as well
    #[arg(long)]
    pub analyze_performance: bool,

    #[command(flatten)]
    pub processing: ProcessingArgs,
}

/// Arguments for profile commands.
#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List built-in profiles
    List,

    /// Show the configuration a profile yields
    Show {
        /// Profile name
        name: String,
    },

    /// Write one `<name>.toml` per built-in profile
    Create {
        /// Target directory
        dir: PathBuf,
    },
}

/// Arguments for graph commands.
#[derive(Debug, Args)]
pub struct GraphArgs {
    #[command(flatten)]
    pub neo4j: Neo4jArgs,

    #[command(subcommand)]
    pub action: GraphAction,
}

/// Graph read actions.
#[derive(Debug, Subcommand)]
pub enum GraphAction {
    /// Entity and relationship counts
    Stats,

    /// Shortest path between two entities
    Path {
        /// Start entity
        from: String,
        /// End entity
        to: String,
        /// Maximum hops
        #[arg(long, default_value = "5")]
        max_length: u32,
    },

    /// Entities and relationships around an entity
    Neighborhood {
        /// Center entity
        entity: String,
        /// Maximum hops
        #[arg(long, default_value = "2")]
        depth: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_requires_input_or_triples() {
        assert!(Cli::try_parse_from(["kgraph", "extract"]).is_err());
        assert!(Cli::try_parse_from(["kgraph", "extract", "--triples", "t.json"]).is_ok());
        assert!(Cli::try_parse_from([
            "kgraph", "extract", "--input", "a.txt", "--triples", "t.json"
        ])
        .is_err());
    }

    #[test]
    fn test_extract_filter_flags() {
        let cli = Cli::parse_from([
            "kgraph",
            "extract",
            "--input",
            "doc.txt",
            "--filter-entities",
            "James Watt,steam engine",
            "--min-confidence",
            "0.7",
            "--subgraph-entity",
            "James Watt",
            "--export-formats",
            "json,turtle",
        ]);
        let Command::Extract(args) = cli.command else {
            panic!("Expected Extract command");
        };
        let spec = args.filter.to_spec();
        assert_eq!(spec.include_entities, vec!["James Watt", "steam engine"]);
        assert_eq!(spec.min_confidence, Some(0.7));
        assert_eq!(spec.subgraph.unwrap().max_hops, 2);
        assert_eq!(args.export_formats, vec!["json", "turtle"]);
    }

    #[test]
    fn test_batch_defaults() {
        let cli = Cli::parse_from(["kgraph", "batch", "--input-dir", "in", "--output-dir", "out"]);
        let Command::Batch(args) = cli.command else {
            panic!("Expected Batch command");
        };
        assert_eq!(args.file_patterns, vec!["*.txt", "*.md"]);
        assert_eq!(args.max_workers, 2);
        assert_eq!(args.export_formats, vec!["json", "csv"]);
    }

    #[test]
    fn test_verbosity_count() {
        let cli = Cli::parse_from(["kgraph", "-vv", "profile", "list"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_processing_overrides() {
        let mut config = Config::default();
        let args = ProcessingArgs {
            chunk_size: Some(64),
            no_inference: true,
            ..ProcessingArgs::default()
        };
        args.apply(&mut config);
        assert_eq!(config.chunking.chunk_size, 64);
        assert!(!config.inference.enabled);
        assert!(config.standardization.enabled);
    }
}
