//! @dose
//! purpose: The command descriptor: the validated, read-only result of interpreting one
//!     invocation. Mode-specific data lives in the Mode variant for that mode; flags that
//!     every mode accepts live in SharedOptions.
//!
//! when-editing:
//!     - !Adding a mode means a new Mode variant, a new Commands variant in cli/args.rs and
//!       a new arm in dispatch(); the compiler points at every site
//!     - Mode::name() must return the exact token users type
//!
//! invariants:
//!     - A descriptor carries exactly one mode
//!     - Descriptors are only built by cli::parse_from / cli::parse_tokens after validation
//!
//! gotchas:
//!     - Verbosity::from_str is case-sensitive ("debug" is rejected)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// IAM acknowledgement required by templates that create IAM resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Iam,
    NamedIam,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Iam => "CAPABILITY_IAM",
            Capability::NamedIam => "CAPABILITY_NAMED_IAM",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CAPABILITY_IAM" => Ok(Capability::Iam),
            "CAPABILITY_NAMED_IAM" => Ok(Capability::NamedIam),
            other => Err(other.to_string()),
        }
    }
}

/// Logger verbosity accepted by --verbosity and configuration files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verbosity {
    Trace,
    Debug,
    #[default]
    Info,
    Error,
}

impl Verbosity {
    pub const ALL: [Verbosity; 4] = [
        Verbosity::Trace,
        Verbosity::Debug,
        Verbosity::Info,
        Verbosity::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Trace => "TRACE",
            Verbosity::Debug => "DEBUG",
            Verbosity::Info => "INFO",
            Verbosity::Error => "ERROR",
        }
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        match self {
            Verbosity::Trace => log::LevelFilter::Trace,
            Verbosity::Debug => log::LevelFilter::Debug,
            Verbosity::Info => log::LevelFilter::Info,
            Verbosity::Error => log::LevelFilter::Error,
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verbosity::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Raw set-stack-policy switches, as given on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StackPolicyFlags {
    pub block: bool,
    pub unblock: bool,
    pub disable_termination: bool,
    pub enable_termination: bool,
}

/// Which policy document to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicySource {
    Template,
    BlockAll,
    UnblockAll,
}

/// Downstream operation selected by set-stack-policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyOperation {
    TerminationProtection { enabled: bool },
    ApplyPolicy(PolicySource),
}

impl StackPolicyFlags {
    /// Termination switches take precedence; otherwise a policy is applied.
    pub fn operation(&self) -> PolicyOperation {
        if self.enable_termination || self.disable_termination {
            return PolicyOperation::TerminationProtection {
                enabled: self.enable_termination,
            };
        }
        let source = if self.block {
            PolicySource::BlockAll
        } else if self.unblock {
            PolicySource::UnblockAll
        } else {
            PolicySource::Template
        };
        PolicyOperation::ApplyPolicy(source)
    }
}

/// The single operation requested by an invocation, with its own arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Validate {
        template: Option<PathBuf>,
    },
    ValidateOffline {
        template: Option<PathBuf>,
    },
    Convert {
        template: Option<PathBuf>,
        output: Option<PathBuf>,
        pretty_print: bool,
    },
    Configure,
    CreateStack {
        stack: String,
        template: PathBuf,
        capabilities: Vec<Capability>,
        parameters: BTreeMap<String, String>,
        parameters_file: Option<PathBuf>,
    },
    DeleteStack {
        stack: Option<String>,
    },
    UpdateStack {
        stack: Option<String>,
        template: Option<PathBuf>,
        capabilities: Vec<Capability>,
    },
    Mfa,
    SetupRemoteSink,
    DestroyRemoteSink,
    CreateParameters {
        template: Option<PathBuf>,
        output: Option<PathBuf>,
        parameters: BTreeMap<String, String>,
        pretty_print: bool,
    },
    SetStackPolicy {
        stack: Option<String>,
        template: Option<PathBuf>,
        flags: StackPolicyFlags,
    },
}

impl Mode {
    /// The mode token as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Validate { .. } => "validate",
            Mode::ValidateOffline { .. } => "validate_offline",
            Mode::Convert { .. } => "convert",
            Mode::Configure => "configure",
            Mode::CreateStack { .. } => "create-stack",
            Mode::DeleteStack { .. } => "delete-stack",
            Mode::UpdateStack { .. } => "update-stack",
            Mode::Mfa => "mfa",
            Mode::SetupRemoteSink => "setup-remote-sink",
            Mode::DestroyRemoteSink => "destroy-remote-sink",
            Mode::CreateParameters { .. } => "create-parameters",
            Mode::SetStackPolicy { .. } => "set-stack-policy",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Flags accepted by every mode. `None` means "not given on the command line".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedOptions {
    pub quiet: bool,
    pub yes: bool,
    pub verbosity: Option<Verbosity>,
    pub mfa: bool,
    pub duration: Option<u32>,
    pub profile: Option<String>,
    pub region: Option<String>,
    pub sandbox: bool,
    pub config: Option<PathBuf>,
    pub progress: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub mode: Mode,
    pub shared: SharedOptions,
}
