//! kgraph - knowledge graph extraction from the command line.

use anyhow::Context;
use clap::Parser;
use kgraph_cli::cli::OutputFormat;
use kgraph_cli::config::{resolve_config_path, user_config_dir};
use kgraph_cli::{commands, Cli, Command, Config, Formatter};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) => {
            eprintln!("{} item(s) failed", failures);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`/`--quiet`.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<usize> {
    let color_enabled = !cli.no_color && cli.format == OutputFormat::Table;
    let formatter = Formatter::new(cli.format, color_enabled);
    let config_path = cli.config.as_deref();
    let profile = cli.profile.as_deref();

    let failures = match cli.command {
        Command::Profile(args) => commands::execute_profile(args, &formatter)?,
        Command::Extract(args) => {
            let config = load_config(config_path, profile)?;
            commands::execute_extract(args, config, &runtime()?, &formatter)?
        }
        Command::Batch(args) => {
            let config = load_config(config_path, profile)?;
            commands::execute_batch(args, config, &runtime()?, &formatter)?
        }
        Command::Graph(args) => {
            let config = load_config(config_path, profile)?;
            commands::execute_graph(args, config, &runtime()?, &formatter)?
        }
    };
    Ok(failures)
}

/// Profile, then configuration file; flags are applied by each command.
fn load_config(explicit: Option<&Path>, profile: Option<&str>) -> anyhow::Result<Config> {
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let user_dir = user_config_dir();
    let path = resolve_config_path(explicit, &cwd, user_dir.as_deref())?;
    Config::resolve(profile, path.as_deref()).context("Failed to load configuration")
}

/// The LLM client blocks, so commands stay synchronous and enter the
/// runtime only for batch workers and Neo4j.
fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("Failed to start async runtime")
}
