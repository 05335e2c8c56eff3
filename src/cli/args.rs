//! @dose
//! purpose: This module defines the command-line grammar for cfkit using the clap derive
//!     macros: every mode, its positional arguments in order, its mode-scoped flags, and
//!     the flags shared by all modes.
//!
//! when-editing:
//!     - !Each mode with arguments gets its own Args struct and a variant in Commands
//!     - !Shared flags live on Cli with global = true so they are accepted after the mode
//!     - Range and enumeration checks clap cannot express belong in validate.rs
//!
//! invariants:
//!     - Exactly one subcommand is parsed per invocation
//!     - Optional positionals are Option<_>; required ones are plain values
//!
//! do-not:
//!     - Never parse --verbosity into an enum here; it must reach the validator as text
//!
//! gotchas:
//!     - validate_offline keeps its underscore; every other mode name is kebab-case
//!     - --duration is None when absent, so an explicit 0 can be told apart from "unset"

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const CAPABILITY_VALUES: [&str; 2] = ["CAPABILITY_IAM", "CAPABILITY_NAMED_IAM"];

#[derive(Parser, Debug)]
#[command(name = "cfkit")]
#[command(
    version,
    about = "Swiss army knife for AWS CloudFormation templates - validation, conversion, stacks"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// No console output, just return code
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Always say yes
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Logger verbosity: TRACE | DEBUG | INFO | ERROR
    #[arg(short, long, global = true, value_name = "LEVEL")]
    pub verbosity: Option<String>,

    /// Enable AWS MFA
    #[arg(long, global = true)]
    pub mfa: bool,

    /// Duration for AWS MFA token (seconds value from range [1, 129600])
    #[arg(
        short,
        long,
        global = true,
        value_name = "SECONDS",
        allow_negative_numbers = true
    )]
    pub duration: Option<i64>,

    /// An AWS profile name
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// An AWS region to use
    #[arg(short, long, global = true)]
    pub region: Option<String>,

    /// Do not use configuration files hierarchy
    #[arg(long, global = true)]
    pub sandbox: bool,

    /// A path to the configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show progress of stack creation (requires a remote sink)
    #[arg(long, global = true)]
    pub progress: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Online template validation
    Validate(TemplateArgs),

    /// Offline template validation
    #[command(name = "validate_offline")]
    ValidateOffline(TemplateArgs),

    /// Conversion between JSON and YAML of template files
    Convert(ConvertArgs),

    /// Create your own configuration file
    Configure,

    /// Create a stack on AWS
    CreateStack(CreateStackArgs),

    /// Delete a stack on AWS
    DeleteStack(DeleteStackArgs),

    /// Update a stack on AWS
    UpdateStack(UpdateStackArgs),

    /// Create temporary secure credentials with MFA
    Mfa,

    /// Set up the SNS topic and SQS queue used for progress reports
    SetupRemoteSink,

    /// Destroy resources created with setup-remote-sink
    DestroyRemoteSink,

    /// Create a JSON parameters file suitable for a given template
    CreateParameters(CreateParametersArgs),

    /// Set stack policy or termination protection
    SetStackPolicy(SetStackPolicyArgs),
}

#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// A path to the template file
    pub template: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// A path to the template file
    pub template: Option<PathBuf>,

    /// A path where the converted file will be saved
    pub output: Option<PathBuf>,

    /// Pretty printing JSON
    #[arg(long)]
    pub pretty_print: bool,
}

/// Capability and parameter flags accepted by stack-changing modes
#[derive(Args, Debug, Default)]
pub struct CapabilityArgs {
    /// Capabilities: CAPABILITY_IAM | CAPABILITY_NAMED_IAM
    #[arg(long, value_delimiter = ',', value_parser = CAPABILITY_VALUES)]
    pub capabilities: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CreateStackArgs {
    /// An AWS stack name
    pub stack: String,

    /// A path to the template file
    pub template: PathBuf,

    #[command(flatten)]
    pub capabilities: CapabilityArgs,

    /// Template parameter (can be repeated)
    #[arg(long = "parameter", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub parameters: Vec<(String, String)>,

    /// File with template parameters
    #[arg(long, value_name = "FILE")]
    pub parameters_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DeleteStackArgs {
    /// An AWS stack name
    pub stack: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateStackArgs {
    /// An AWS stack name
    pub stack: Option<String>,

    /// A path to the template file
    pub template: Option<PathBuf>,

    #[command(flatten)]
    pub capabilities: CapabilityArgs,
}

#[derive(Args, Debug)]
pub struct CreateParametersArgs {
    /// A path to the template file
    pub template: Option<PathBuf>,

    /// A path to the file where parameters will be saved
    pub output: Option<PathBuf>,

    /// Template parameter (can be repeated)
    #[arg(long = "parameter", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub parameters: Vec<(String, String)>,

    /// Pretty printing JSON
    #[arg(long)]
    pub pretty_print: bool,
}

#[derive(Args, Debug)]
pub struct SetStackPolicyArgs {
    /// An AWS stack name
    pub stack: Option<String>,

    /// A path to the stack policy file
    pub template: Option<PathBuf>,

    /// Block all actions
    #[arg(long, conflicts_with = "unblock")]
    pub block: bool,

    /// Unblock all actions
    #[arg(long)]
    pub unblock: bool,

    /// Allow the stack to be deleted
    #[arg(long, conflicts_with = "enable_stack_termination")]
    pub disable_stack_termination: bool,

    /// Protect the stack from being deleted
    #[arg(long)]
    pub enable_stack_termination: bool,
}

/// Split a `KEY=VALUE` token. The value may itself contain `=`.
fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", raw))?;
    if key.is_empty() {
        return Err(format!("missing key in `{}`", raw));
    }
    Ok((key.to_string(), value.to_string()))
}
