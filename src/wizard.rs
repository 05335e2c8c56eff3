//! @dose
//! purpose: Interactive first-run configuration. Asks where the configuration file should
//!     live, refuses to touch an existing file, then asks for a region (by catalog index)
//!     and a profile name until both are valid, and returns the resulting Configuration.
//!
//! when-editing:
//!     - !Input and output are injected (BufRead / Write) so tests can script a session
//!     - Every question goes through ask(), which owns the prompt/validate/retry cycle
//!
//! invariants:
//!     - Nothing is written to disk here; the caller persists WizardOutcome::Created
//!     - An existing target path always yields WizardOutcome::AlreadyExists
//!     - Without an attempt limit a question is repeated until answered validly or input ends
//!
//! gotchas:
//!     - Region indices are 0-based, matching the listing
//!     - End of input is an error, not an empty answer; otherwise a closed stdin would spin

use crate::catalog::RegionCatalog;
use crate::config::{Configuration, APP_DIR, DEFAULT_MFA_DURATION};
use crate::types::Verbosity;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Input ended before the configuration was complete")]
    InputClosed,
    #[error("Giving up on {field} after {attempts} invalid answers")]
    AttemptsExhausted { field: &'static str, attempts: usize },
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Why a single answer was rejected
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid region: `{0}` is not a number")]
    NotANumber(String),
    #[error("Invalid region: {index} is outside 0..{len}")]
    OutOfRange { index: usize, len: usize },
    #[error("Invalid profile: name must not be empty")]
    EmptyProfile,
}

#[derive(Debug, PartialEq, Eq)]
pub enum WizardOutcome {
    /// A file is already present at the target; nothing was asked or built
    AlreadyExists(PathBuf),
    Created {
        path: PathBuf,
        configuration: Configuration,
    },
}

/// Accept a region index only if it names a catalog entry.
pub fn parse_region_choice(catalog: &RegionCatalog, raw: &str) -> Result<String, InputError> {
    let index: usize = raw
        .trim()
        .parse()
        .map_err(|_| InputError::NotANumber(raw.trim().to_string()))?;
    catalog
        .get(index)
        .map(|entry| entry.code.clone())
        .ok_or(InputError::OutOfRange {
            index,
            len: catalog.len(),
        })
}

pub fn parse_profile(raw: &str) -> Result<String, InputError> {
    let profile = raw.trim();
    if profile.is_empty() {
        return Err(InputError::EmptyProfile);
    }
    Ok(profile.to_string())
}

/// Where the configuration file goes: `<directory>/<file name>`
pub fn target_path(directory: &str, file_name: &str) -> PathBuf {
    Path::new(directory.trim()).join(file_name.trim())
}

/// Record written for a fresh configuration
pub fn build_configuration(
    catalog: &RegionCatalog,
    region: String,
    profile: String,
) -> Configuration {
    Configuration {
        default_profile: profile,
        default_region: region,
        default_decision_for_mfa: false,
        default_duration_for_mfa: DEFAULT_MFA_DURATION,
        default_verbosity: Verbosity::Info,
        specification_url: catalog.specification_urls(),
    }
}

pub struct Wizard<R, W> {
    input: R,
    output: W,
    catalog: RegionCatalog,
    attempt_limit: Option<usize>,
}

impl<R: BufRead, W: Write> Wizard<R, W> {
    pub fn new(input: R, output: W, catalog: RegionCatalog) -> Self {
        Self {
            input,
            output,
            catalog,
            attempt_limit: None,
        }
    }

    /// Stop after `limit` invalid answers to one question
    pub fn with_attempt_limit(mut self, limit: usize) -> Self {
        self.attempt_limit = Some(limit);
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the whole session. `suggested_dir` is only displayed as a hint.
    pub fn run(&mut self, suggested_dir: Option<&Path>) -> Result<WizardOutcome, WizardError> {
        writeln!(self.output, "Configuration file could be in")?;
        if let Some(dir) = suggested_dir {
            writeln!(self.output, "  {}", dir.display())?;
        }
        writeln!(self.output, "  /etc/{}", APP_DIR)?;

        let directory = self.read_answer("Your path")?;
        let file_name = self.read_answer("Filename")?;
        let path = target_path(&directory, &file_name);
        writeln!(self.output, "File will be created in {}", path.display())?;

        if path.exists() {
            log::warn!("{} already exists, leaving it untouched", path.display());
            writeln!(self.output, "File already exists in this path")?;
            return Ok(WizardOutcome::AlreadyExists(path));
        }

        self.show_regions()?;
        let region = self.select_region()?;
        let profile = self.select_profile()?;

        let configuration = build_configuration(&self.catalog, region, profile);
        Ok(WizardOutcome::Created {
            path,
            configuration,
        })
    }

    fn show_regions(&mut self) -> io::Result<()> {
        writeln!(self.output, "Regions:")?;
        for (index, entry) in self.catalog.iter().enumerate() {
            writeln!(self.output, "Number {} region {}", index, entry.code)?;
        }
        Ok(())
    }

    pub fn select_region(&mut self) -> Result<String, WizardError> {
        let region = self.ask(
            "Choose region",
            "region",
            "Try again, invalid region",
            parse_region_choice,
        )?;
        writeln!(self.output, "Your region is: {}", region)?;
        Ok(region)
    }

    pub fn select_profile(&mut self) -> Result<String, WizardError> {
        let profile = self.ask(
            "Input name of profile",
            "profile",
            "Try again, invalid profile",
            |_, raw| parse_profile(raw),
        )?;
        writeln!(self.output, "Your profile is: {}", profile)?;
        Ok(profile)
    }

    /// Prompt, validate, then accept or retry.
    fn ask<T, F>(
        &mut self,
        prompt: &str,
        field: &'static str,
        retry_message: &str,
        validate: F,
    ) -> Result<T, WizardError>
    where
        F: Fn(&RegionCatalog, &str) -> Result<T, InputError>,
    {
        let mut attempts = 0;
        loop {
            let answer = self.read_answer(prompt)?;
            match validate(&self.catalog, &answer) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempts += 1;
                    log::error!("{}", e);
                    if self.attempt_limit.is_some_and(|limit| attempts >= limit) {
                        return Err(WizardError::AttemptsExhausted { field, attempts });
                    }
                    writeln!(self.output, "{}", retry_message)?;
                }
            }
        }
    }

    fn read_answer(&mut self, prompt: &str) -> Result<String, WizardError> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(WizardError::InputClosed);
        }
        Ok(line.trim().to_string())
    }
}
