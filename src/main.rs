//! @dose
//! purpose: This is the CLI entry point for cfkit. It interprets the arguments into a
//!     CommandDescriptor, sets up logging, resolves configuration and hands the descriptor
//!     to the dispatcher.
//!
//! when-editing:
//!     - !All behaviour lives in the cfkit library crate; this file only wires it up
//!     - Error messages go to stderr and the process exits with code 1
//!
//! invariants:
//!     - Nothing is dispatched unless parsing and validation succeeded
//!     - One and only one mode is executed per invocation
//!
//! gotchas:
//!     - clap grammar errors exit through clap::Error::exit (help/version exit 0, usage
//!       errors exit 2)
//!     - --quiet silences both logging and the final error line

use anyhow::Context;
use cfkit::cli::{parse_from, CliError};
use cfkit::commands::LocalHandler;
use cfkit::config::{Configuration, Settings};
use cfkit::dispatch::dispatch;
use cfkit::types::{CommandDescriptor, SharedOptions};
use log::LevelFilter;

fn main() {
    let command = match parse_from(std::env::args_os()) {
        Ok(command) => command,
        Err(CliError::Grammar(e)) => e.exit(),
        Err(e) => {
            if !e.is_quiet() {
                eprintln!("Error: {}", e);
            }
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&command) {
        if !command.shared.quiet {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn run(command: &CommandDescriptor) -> anyhow::Result<()> {
    init_logging(&command.shared);

    let config =
        Configuration::resolve(&command.shared).context("Failed to load configuration")?;
    let settings = Settings::effective(&command.shared, &config);
    if !command.shared.quiet {
        log::set_max_level(settings.verbosity.level_filter());
    }

    let mut handler = LocalHandler::new(settings);
    dispatch(command, &mut handler)
}

/// Starts at the command-line verbosity; narrowed once the configuration is known.
fn init_logging(shared: &SharedOptions) {
    let level = if shared.quiet {
        LevelFilter::Off
    } else {
        shared.verbosity.unwrap_or_default().level_filter()
    };
    env_logger::Builder::new()
        .filter_level(LevelFilter::Trace)
        .format_target(false)
        .init();
    log::set_max_level(level);
}
