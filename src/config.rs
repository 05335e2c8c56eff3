//! @dose
//! purpose: Configuration file handling. The configure wizard writes a Configuration as
//!     TOML; later invocations read it back from --config or from the lookup hierarchy and
//!     merge it with command-line flags into the effective Settings.
//!
//! when-editing:
//!     - !Configuration field names are the on-disk schema; renaming one breaks old files
//!     - Command-line flags always win over file values
//!
//! invariants:
//!     - Configuration::resolve returns defaults when no hierarchy file exists
//!     - An explicitly requested file (--config) must exist and parse
//!     - --sandbox skips the hierarchy but still honours --config
//!
//! gotchas:
//!     - A malformed hierarchy file only produces a warning, mirroring a missing file

use crate::catalog::SPECIFICATION_URLS;
use crate::types::{SharedOptions, Verbosity};
use crate::validate::{validate_duration, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory name used under ~/.config and /etc
pub const APP_DIR: &str = "cfkit";
/// File name looked up inside each configuration directory
pub const CONFIG_FILE_NAME: &str = "main.toml";
/// MFA session length written by the wizard, in seconds
pub const DEFAULT_MFA_DURATION: u32 = 3600;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid default_duration_for_mfa in {path}: {source}")]
    InvalidDuration {
        path: PathBuf,
        source: ValidationError,
    },
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// On-disk configuration, as produced by `cfkit configure`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub default_profile: String,
    pub default_region: String,
    pub default_decision_for_mfa: bool,
    pub default_duration_for_mfa: u32,
    pub default_verbosity: Verbosity,
    /// Region code -> resource specification URL. Must stay the last field (TOML table).
    pub specification_url: BTreeMap<String, String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            default_profile: "default".to_string(),
            default_region: "us-east-1".to_string(),
            default_decision_for_mfa: false,
            default_duration_for_mfa: DEFAULT_MFA_DURATION,
            default_verbosity: Verbosity::Info,
            specification_url: SPECIFICATION_URLS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Candidate configuration files, most specific first
pub fn hierarchy_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = user_config_dir() {
        paths.push(dir.join(CONFIG_FILE_NAME));
    }
    paths.push(Path::new("/etc").join(APP_DIR).join(CONFIG_FILE_NAME));
    paths
}

/// ~/.config/cfkit
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join(APP_DIR))
}

impl Configuration {
    /// Load a configuration file. Missing or malformed files, and MFA durations the
    /// command line would reject, are errors.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        validate_duration(i64::from(config.default_duration_for_mfa)).map_err(|source| {
            ConfigError::InvalidDuration {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(config)
    }

    /// Load the first existing file among `candidates`, or defaults.
    pub fn load_first(candidates: &[PathBuf]) -> Self {
        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_file(path) {
                Ok(config) => {
                    log::debug!("Using configuration {}", path.display());
                    return config;
                }
                Err(e) => log::warn!("Ignoring configuration: {}", e),
            }
        }
        log::debug!("No configuration file found, using defaults");
        Self::default()
    }

    /// Pick the configuration that applies to this invocation.
    pub fn resolve(shared: &SharedOptions) -> Result<Self, ConfigError> {
        if let Some(path) = &shared.config {
            return Self::load_file(path);
        }
        if shared.sandbox {
            log::debug!("Sandbox mode, skipping configuration hierarchy");
            return Ok(Self::default());
        }
        Ok(Self::load_first(&hierarchy_paths()))
    }

    /// Serialize to TOML at `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values downstream operations actually use: flags layered over the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub profile: String,
    pub region: String,
    pub mfa: bool,
    pub mfa_duration: u32,
    pub verbosity: Verbosity,
    pub specification_url: BTreeMap<String, String>,
}

impl Settings {
    pub fn effective(shared: &SharedOptions, config: &Configuration) -> Self {
        Self {
            profile: shared
                .profile
                .clone()
                .unwrap_or_else(|| config.default_profile.clone()),
            region: shared
                .region
                .clone()
                .unwrap_or_else(|| config.default_region.clone()),
            mfa: shared.mfa || config.default_decision_for_mfa,
            mfa_duration: shared.duration.unwrap_or(config.default_duration_for_mfa),
            verbosity: shared.verbosity.unwrap_or(config.default_verbosity),
            specification_url: config.specification_url.clone(),
        }
    }

    /// Resource specification endpoint for the effective region
    pub fn specification_url(&self) -> Option<&str> {
        self.specification_url.get(&self.region).map(String::as_str)
    }
}
