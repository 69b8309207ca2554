//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::profiles::{self, PROFILES};
use std::fs;
use std::path::{Path, PathBuf};

/// Execute the profile command.
pub fn execute_profile(args: ProfileArgs, formatter: &Formatter) -> Result<usize> {
    match args.action {
        ProfileAction::List => {
            println!("{}", formatter.profiles(PROFILES)?);
        }
        ProfileAction::Show { name } => show_profile(&name, formatter)?,
        ProfileAction::Create { dir } => {
            let written = write_profiles(&dir)?;
            if formatter.is_json() {
                println!("{}", formatter.json(&written)?);
            } else {
                println!(
                    "{}",
                    formatter.success(&format!(
                        "Wrote {} profile(s) to {}",
                        written.len(),
                        dir.display()
                    ))
                );
            }
        }
    }
    Ok(0)
}

fn show_profile(name: &str, formatter: &Formatter) -> Result<()> {
    let profile = profiles::find(name).ok_or_else(|| {
        CliError::InvalidInput(format!(
            "Unknown profile '{}'. Available: {}",
            name,
            profiles::names().join(", ")
        ))
    })?;
    let config = profile.config();

    if formatter.is_json() {
        println!("{}", formatter.json(&config)?);
    } else {
        println!("{}", formatter.info(&format!("{}: {}", profile.name, profile.description)));
        println!("{}", config.to_toml()?);
    }
    Ok(())
}

/// Write `<name>.toml` for every built-in profile into `dir`.
pub fn write_profiles(dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    PROFILES
        .iter()
        .map(|profile| -> Result<PathBuf> {
            let path = dir.join(format!("{}.toml", profile.name));
            fs::write(&path, profile.config().to_toml()?)?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_written_profiles_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_profiles(dir.path()).unwrap();
        assert_eq!(written.len(), PROFILES.len());

        let research = dir.path().join("research.toml");
        let config = Config::resolve(Some("minimal"), Some(&research)).unwrap();
        assert_eq!(config, profiles::research());
    }
}
