//! @dose
//! purpose: The ModeHandler used by the binary. configure is handled locally; every mode
//!     that needs AWS or template tooling reports that no such backend is linked in.
//!
//! invariants:
//!     - Operations without a backend fail with BackendUnavailable (non-zero exit)
//!
//! gotchas:
//!     - Settings are resolved once in main and shared by every operation

use super::configure::run_configure;
use crate::config::Settings;
use crate::dispatch::ModeHandler;
use crate::types::{CommandDescriptor, Mode};
use anyhow::Result;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("`{operation}` needs a backend that is not available in this build")]
pub struct BackendUnavailable {
    pub operation: &'static str,
}

pub struct LocalHandler {
    settings: Settings,
}

impl LocalHandler {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn unavailable(&self, operation: &'static str, command: &CommandDescriptor) -> Result<()> {
        log::debug!(
            "{} requested for profile {} in {} (mfa: {}, duration: {}s)",
            operation,
            self.settings.profile,
            self.settings.region,
            self.settings.mfa,
            self.settings.mfa_duration
        );
        if let Mode::CreateStack { stack, .. } | Mode::UpdateStack { stack: Some(stack), .. } =
            &command.mode
        {
            log::debug!("Target stack: {}", stack);
        }
        Err(BackendUnavailable { operation }.into())
    }
}

impl ModeHandler for LocalHandler {
    fn validate_online(&mut self, command: &CommandDescriptor) -> Result<()> {
        self.unavailable("validate", command)
    }

    fn validate_offline(&mut self, command: &CommandDescriptor) -> Result<()> {
        self.unavailable("validate_offline", command)
    }

    fn convert(&mut self, command: &CommandDescriptor) -> Result<()> {
        self.unavailable("convert", command)
    }

    fn configure(&mut self, _command: &CommandDescriptor) -> Result<()> {
        run_configure()
    }

    fn create_stack(&mut self, command: &CommandDescriptor) -> Result<()> {
        self.unavailable("create-stack", command)
    }

    fn delete_stack(&mut self, command: &CommandDescriptor) -> Result<()> {
        self.unavailable("delete-stack", command)
    }

    fn update_stack(&mut self, command: &CommandDescriptor) -> Result<()> {
        self.unavailable("update-stack", command)
    }

    fn mfa(&mut self, command: &CommandDescriptor) -> Result<()> {
        self.unavailable("mfa", command)
    }

    fn setup_remote_sink(&mut self, command: &CommandDescriptor) -> Result<()> {
        self.unavailable("setup-remote-sink", command)
    }

    fn destroy_remote_sink(&mut self, command: &CommandDescriptor) -> Result<()> {
        self.unavailable("destroy-remote-sink", command)
    }

    fn create_parameters(&mut self, command: &CommandDescriptor) -> Result<()> {
        self.unavailable("create-parameters", command)
    }

    fn apply_stack_policy(&mut self, command: &CommandDescriptor) -> Result<()> {
        self.unavailable("set-stack-policy", command)
    }

    fn set_termination_protection(&mut self, command: &CommandDescriptor) -> Result<()> {
        self.unavailable("set-stack-policy (termination protection)", command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parse_tokens;
    use crate::config::Configuration;
    use crate::dispatch::dispatch;

    fn handler_for(command: &CommandDescriptor) -> LocalHandler {
        LocalHandler::new(Settings::effective(
            &command.shared,
            &Configuration::default(),
        ))
    }

    #[test]
    fn test_aws_modes_report_missing_backend() {
        let command = parse_tokens(["create-stack", "s", "t.json", "-p", "ops"]).unwrap();
        let mut handler = handler_for(&command);
        assert_eq!(handler.settings().profile, "ops");

        let err = dispatch(&command, &mut handler).unwrap_err();
        let unavailable = err.downcast_ref::<BackendUnavailable>().unwrap();
        assert_eq!(unavailable.operation, "create-stack");
    }

    #[test]
    fn test_termination_protection_is_named() {
        let command =
            parse_tokens(["set-stack-policy", "s", "--enable-stack-termination"]).unwrap();
        let mut handler = handler_for(&command);
        let err = dispatch(&command, &mut handler).unwrap_err();
        assert!(err.to_string().contains("termination protection"));
    }
}
