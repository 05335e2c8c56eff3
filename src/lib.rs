//! @dose
//! purpose: Library crate root for cfkit. Exposes the command interpretation pipeline
//!     (grammar, validation, descriptor, dispatch) and the configuration wizard so the
//!     binary and tests share one implementation.
//!
//! when-editing:
//!     - !All public modules must be declared here with pub mod
//!     - Keep the re-export list organized by module
//!
//! gotchas:
//!     - lib.rs is separate from main.rs - library consumers get lib, CLI gets main

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod types;
pub mod validate;
pub mod wizard;

// Re-export main types for convenience
pub use catalog::{CatalogError, RegionCatalog, RegionEntry};
pub use cli::{parse_from, parse_tokens, Cli, CliError, Commands};
pub use config::{ConfigError, Configuration, Settings};
pub use dispatch::{dispatch, ModeHandler};
pub use types::{
    Capability, CommandDescriptor, Mode, PolicyOperation, PolicySource, SharedOptions,
    StackPolicyFlags, Verbosity,
};
pub use validate::ValidationError;
pub use wizard::{Wizard, WizardError, WizardOutcome};
