//! @dose
//! purpose: The configure command: runs the wizard on the terminal and saves the resulting
//!     configuration as TOML at the path the user chose.
//!
//! invariants:
//!     - An existing file is never overwritten; that case is reported and exits successfully
//!
//! gotchas:
//!     - Prompts go to stdout even with --quiet; the wizard cannot run silently

use crate::catalog::RegionCatalog;
use crate::config::user_config_dir;
use crate::wizard::{Wizard, WizardOutcome};
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

pub fn run_configure() -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_configure_with(stdin.lock(), stdout.lock())
}

/// Same as run_configure, with the terminal replaced by `input` / `output`.
pub fn run_configure_with<R: BufRead, W: Write>(input: R, output: W) -> Result<()> {
    let catalog = RegionCatalog::builtin().context("Built-in region catalog is inconsistent")?;
    let mut wizard = Wizard::new(input, output, catalog);

    match wizard
        .run(user_config_dir().as_deref())
        .context("Configuration wizard failed")?
    {
        WizardOutcome::AlreadyExists(path) => {
            log::info!("Configuration not written: {} exists", path.display());
        }
        WizardOutcome::Created {
            path,
            configuration,
        } => {
            configuration
                .save(&path)
                .with_context(|| format!("Failed to save configuration to {}", path.display()))?;
            let mut output = wizard.into_output();
            writeln!(output, "Configuration saved to {}", path.display())?;
            log::info!("Saved configuration to {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_configure_saves_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let script = format!("{}\nmain.toml\n3\nprod\n", temp_dir.path().display());
        let mut output = Vec::new();

        run_configure_with(script.as_bytes(), &mut output).unwrap();

        let saved = Configuration::load_file(&temp_dir.path().join("main.toml")).unwrap();
        assert_eq!(saved.default_region, "us-west-2");
        assert_eq!(saved.default_profile, "prod");
        assert!(String::from_utf8(output)
            .unwrap()
            .contains("Configuration saved to"));
    }

    #[test]
    fn test_configure_leaves_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("main.toml");
        fs::write(&path, "original").unwrap();
        let script = format!("{}\nmain.toml\n", temp_dir.path().display());

        run_configure_with(script.as_bytes(), Vec::new()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_configure_fails_when_input_ends() {
        let temp_dir = TempDir::new().unwrap();
        let script = format!("{}\nmain.toml\n99\n", temp_dir.path().display());

        let err = run_configure_with(script.as_bytes(), Vec::new()).unwrap_err();
        assert!(format!("{:#}", err).contains("Input ended"));
        assert!(!temp_dir.path().join("main.toml").exists());
    }
}
