//! Profile, file and flag layering as seen from the binary's entry points.

use clap::Parser;
use kgraph_cli::config::{resolve_config_path, CONFIG_FILE_NAME};
use kgraph_cli::{Cli, CliError, Command, Config};
use std::fs;

#[test]
fn test_flags_override_file_override_profile() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("kgraph.toml");
    fs::write(
        &file,
        "[chunking]\nchunk_size = 120\n\n[llm]\ntemperature = 0.5\n",
    )
    .unwrap();

    let mut config = Config::resolve(Some("claude"), Some(&file)).unwrap();
    // From the profile
    assert_eq!(config.chunking.overlap, 40);
    assert_eq!(config.llm.model, "claude-3-sonnet-20240229");
    // From the file
    assert_eq!(config.chunking.chunk_size, 120);
    assert_eq!(config.llm.temperature, 0.5);

    let cli = Cli::parse_from([
        "kgraph",
        "extract",
        "--input",
        "doc.txt",
        "--chunk-size",
        "90",
        "--no-inference",
    ]);
    let Command::Extract(args) = cli.command else {
        panic!("Expected Extract command");
    };
    args.processing.apply(&mut config);

    assert_eq!(config.chunking.chunk_size, 90);
    assert_eq!(config.llm.temperature, 0.5);
    assert!(!config.inference.enabled);
    assert!(config.validate().is_ok());
}

#[test]
fn test_unknown_key_in_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("bad.toml");
    fs::write(&file, "[neo4j]\nhost = \"db\"\n").unwrap();

    let err = Config::resolve(None, Some(&file)).unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn test_invalid_layered_value_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("overlap.toml");
    fs::write(&file, "[chunking]\nchunk_size = 10\noverlap = 10\n").unwrap();

    assert!(Config::resolve(Some("openai"), Some(&file)).is_err());
}

#[test]
fn test_unknown_profile_lists_available() {
    let err = Config::resolve(Some("turbo"), None).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("turbo"));
    assert!(message.contains("high-quality"));
}

#[test]
fn test_config_path_lookup_order() {
    let cwd = tempfile::tempdir().unwrap();
    let user = tempfile::tempdir().unwrap();

    assert_eq!(resolve_config_path(None, cwd.path(), Some(user.path())).unwrap(), None);

    let user_file = user.path().join(CONFIG_FILE_NAME);
    fs::write(&user_file, "").unwrap();
    assert_eq!(
        resolve_config_path(None, cwd.path(), Some(user.path())).unwrap(),
        Some(user_file)
    );

    let local_file = cwd.path().join(CONFIG_FILE_NAME);
    fs::write(&local_file, "").unwrap();
    assert_eq!(
        resolve_config_path(None, cwd.path(), Some(user.path())).unwrap(),
        Some(local_file.clone())
    );

    let missing = cwd.path().join("missing.toml");
    assert!(resolve_config_path(Some(&missing), cwd.path(), None).is_err());
    assert_eq!(
        resolve_config_path(Some(&local_file), cwd.path(), None).unwrap(),
        Some(local_file)
    );
}
