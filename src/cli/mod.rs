//! @dose
//! purpose: Turns raw process arguments into a validated CommandDescriptor. clap does the
//!     grammar work (args.rs), validate.rs does the range and enumeration checks, and this
//!     module glues the two together into a pure function.
//!
//! invariants:
//!     - No descriptor is produced unless every validation rule passed
//!     - Repeated --parameter keys resolve deterministically: last value wins
//!
//! gotchas:
//!     - --help and --version come back as CliError::Grammar; check is_informational()
//!       before treating them as failures

mod args;

pub use args::*;

use crate::types::{CommandDescriptor, Mode, SharedOptions, StackPolicyFlags};
use crate::validate::{
    validate_capabilities, validate_duration, validate_verbosity, ValidationError,
};
use clap::error::ErrorKind;
use clap::Parser;
use std::collections::BTreeMap;
use std::ffi::OsString;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Grammar(#[from] clap::Error),
    #[error("{source}")]
    Validation {
        source: ValidationError,
        /// --quiet as parsed, so the caller can stay silent
        quiet: bool,
    },
}

impl CliError {
    /// True for --help / --version, which end the process successfully.
    pub fn is_informational(&self) -> bool {
        match self {
            CliError::Grammar(e) => matches!(
                e.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ),
            CliError::Validation { .. } => false,
        }
    }

    /// True when --quiet was given and the failure should not be printed.
    pub fn is_quiet(&self) -> bool {
        matches!(self, CliError::Validation { quiet: true, .. })
    }
}

/// Parse a full argument list, program name first.
pub fn parse_from<I, T>(args: I) -> Result<CommandDescriptor, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    let quiet = cli.quiet;
    let descriptor = CommandDescriptor::try_from(cli)
        .map_err(|source| CliError::Validation { source, quiet })?;
    log::trace!("Parsed invocation: {:?}", descriptor);
    Ok(descriptor)
}

/// Parse command-line tokens without the program name.
pub fn parse_tokens<I, T>(tokens: I) -> Result<CommandDescriptor, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = std::iter::once(OsString::from("cfkit"))
        .chain(tokens.into_iter().map(Into::<OsString>::into));
    parse_from(args)
}

fn collect_parameters(pairs: Vec<(String, String)>) -> BTreeMap<String, String> {
    pairs.into_iter().collect()
}

impl TryFrom<Cli> for CommandDescriptor {
    type Error = ValidationError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let duration = cli.duration.map(validate_duration).transpose()?;
        let verbosity = match cli.verbosity.as_deref() {
            Some(raw) => validate_verbosity(raw)?,
            None => None,
        };

        let shared = SharedOptions {
            quiet: cli.quiet,
            yes: cli.yes,
            verbosity,
            mfa: cli.mfa,
            duration,
            profile: cli.profile,
            region: cli.region,
            sandbox: cli.sandbox,
            config: cli.config,
            progress: cli.progress,
        };

        let mode = match cli.command {
            Commands::Validate(args) => Mode::Validate {
                template: args.template,
            },
            Commands::ValidateOffline(args) => Mode::ValidateOffline {
                template: args.template,
            },
            Commands::Convert(args) => Mode::Convert {
                template: args.template,
                output: args.output,
                pretty_print: args.pretty_print,
            },
            Commands::Configure => Mode::Configure,
            Commands::CreateStack(args) => Mode::CreateStack {
                stack: args.stack,
                template: args.template,
                capabilities: validate_capabilities(&args.capabilities.capabilities)?,
                parameters: collect_parameters(args.parameters),
                parameters_file: args.parameters_file,
            },
            Commands::DeleteStack(args) => Mode::DeleteStack { stack: args.stack },
            Commands::UpdateStack(args) => Mode::UpdateStack {
                stack: args.stack,
                template: args.template,
                capabilities: validate_capabilities(&args.capabilities.capabilities)?,
            },
            Commands::Mfa => Mode::Mfa,
            Commands::SetupRemoteSink => Mode::SetupRemoteSink,
            Commands::DestroyRemoteSink => Mode::DestroyRemoteSink,
            Commands::CreateParameters(args) => Mode::CreateParameters {
                template: args.template,
                output: args.output,
                parameters: collect_parameters(args.parameters),
                pretty_print: args.pretty_print,
            },
            Commands::SetStackPolicy(args) => Mode::SetStackPolicy {
                stack: args.stack,
                template: args.template,
                flags: StackPolicyFlags {
                    block: args.block,
                    unblock: args.unblock,
                    disable_termination: args.disable_stack_termination,
                    enable_termination: args.enable_stack_termination,
                },
            },
        };

        Ok(CommandDescriptor { mode, shared })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Capability, PolicyOperation, PolicySource, Verbosity};
    use std::path::PathBuf;

    /// Minimum valid invocation for every mode, paired with the expected mode token
    const MINIMAL_INVOCATIONS: &[(&[&str], &str)] = &[
        (&["validate"], "validate"),
        (&["validate_offline"], "validate_offline"),
        (&["convert"], "convert"),
        (&["configure"], "configure"),
        (&["create-stack", "s", "t.json"], "create-stack"),
        (&["delete-stack"], "delete-stack"),
        (&["update-stack"], "update-stack"),
        (&["mfa"], "mfa"),
        (&["setup-remote-sink"], "setup-remote-sink"),
        (&["destroy-remote-sink"], "destroy-remote-sink"),
        (&["create-parameters"], "create-parameters"),
        (&["set-stack-policy"], "set-stack-policy"),
    ];

    #[test]
    fn test_every_mode_parses_with_minimum_arguments() {
        for (tokens, expected) in MINIMAL_INVOCATIONS {
            let descriptor = parse_tokens(tokens.iter().copied())
                .unwrap_or_else(|e| panic!("{:?} failed: {}", tokens, e));
            assert_eq!(descriptor.mode.name(), *expected);
            assert_eq!(descriptor.shared, SharedOptions::default());
        }
    }

    #[test]
    fn test_no_cross_mode_leakage() {
        let descriptor = parse_tokens(["validate", "t.json"]).unwrap();
        assert_eq!(
            descriptor.mode,
            Mode::Validate {
                template: Some(PathBuf::from("t.json"))
            }
        );

        let descriptor = parse_tokens(["delete-stack", "s"]).unwrap();
        assert_eq!(
            descriptor.mode,
            Mode::DeleteStack {
                stack: Some("s".to_string())
            }
        );
    }

    #[test]
    fn test_create_stack_end_to_end() {
        let descriptor = parse_tokens([
            "create-stack",
            "mystack",
            "template.json",
            "--capabilities",
            "CAPABILITY_IAM",
        ])
        .unwrap();
        let Mode::CreateStack {
            stack,
            template,
            capabilities,
            parameters,
            parameters_file,
        } = descriptor.mode
        else {
            panic!("Expected CreateStack")
        };
        assert_eq!(stack, "mystack");
        assert_eq!(template, PathBuf::from("template.json"));
        assert_eq!(capabilities, vec![Capability::Iam]);
        assert!(parameters.is_empty());
        assert!(parameters_file.is_none());
    }

    #[test]
    fn test_repeated_parameters_last_value_wins() {
        let descriptor = parse_tokens([
            "create-parameters",
            "t.json",
            "out.json",
            "--parameter",
            "k1=v1",
            "--parameter",
            "k2=v2",
            "--parameter",
            "k1=override",
        ])
        .unwrap();
        let Mode::CreateParameters { parameters, .. } = descriptor.mode else {
            panic!("Expected CreateParameters")
        };
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters["k1"], "override");
        assert_eq!(parameters["k2"], "v2");
    }

    #[test]
    fn test_malformed_parameter_is_grammar_error() {
        let err = parse_tokens(["create-stack", "s", "t.json", "--parameter", "broken"])
            .unwrap_err();
        assert!(matches!(err, CliError::Grammar(_)));
        assert!(!err.is_informational());
    }

    #[test]
    fn test_shared_flags_are_validated() {
        let err = parse_tokens(["mfa", "-d", "0"]).unwrap_err();
        assert!(matches!(
            err,
            CliError::Validation {
                source: ValidationError::DurationTooShort(0),
                ..
            }
        ));

        let err = parse_tokens(["mfa", "-d", "129601"]).unwrap_err();
        assert!(matches!(
            err,
            CliError::Validation {
                source: ValidationError::DurationTooLong(129_601),
                ..
            }
        ));

        let err = parse_tokens(["mfa", "-v", "debug"]).unwrap_err();
        assert!(matches!(
            err,
            CliError::Validation {
                source: ValidationError::InvalidVerbosity(_),
                ..
            }
        ));

        let err = parse_tokens(["-q", "mfa", "-d", "0"]).unwrap_err();
        assert!(err.is_quiet());
        assert!(!parse_tokens(["mfa", "-d", "0"]).unwrap_err().is_quiet());

        let descriptor = parse_tokens(["mfa", "-v", "", "-d", "129600"]).unwrap();
        assert_eq!(descriptor.shared.verbosity, None);
        assert_eq!(descriptor.shared.duration, Some(129_600));

        let descriptor = parse_tokens(["-v", "TRACE", "mfa"]).unwrap();
        assert_eq!(descriptor.shared.verbosity, Some(Verbosity::Trace));
    }

    #[test]
    fn test_set_stack_policy_descriptor() {
        let descriptor =
            parse_tokens(["set-stack-policy", "s", "policy.json", "--enable-stack-termination"])
                .unwrap();
        let Mode::SetStackPolicy { flags, .. } = descriptor.mode else {
            panic!("Expected SetStackPolicy")
        };
        assert_eq!(
            flags.operation(),
            PolicyOperation::TerminationProtection { enabled: true }
        );

        let descriptor = parse_tokens(["set-stack-policy", "s", "policy.json"]).unwrap();
        let Mode::SetStackPolicy { flags, .. } = descriptor.mode else {
            panic!("Expected SetStackPolicy")
        };
        assert_eq!(
            flags.operation(),
            PolicyOperation::ApplyPolicy(PolicySource::Template)
        );
    }

    #[test]
    fn test_unknown_or_missing_mode() {
        assert!(matches!(parse_tokens(["deploy"]), Err(CliError::Grammar(_))));
        assert!(matches!(
            parse_tokens(Vec::<String>::new()),
            Err(CliError::Grammar(_))
        ));
    }

    #[test]
    fn test_help_is_informational() {
        let err = parse_tokens(["--help"]).unwrap_err();
        assert!(err.is_informational());
        let err = parse_tokens(["--version"]).unwrap_err();
        assert!(err.is_informational());
    }
}
