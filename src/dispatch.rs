//! @dose
//! purpose: Routes a validated CommandDescriptor to exactly one ModeHandler operation.
//!     The routing is a single exhaustive match over Mode; no mode does any work here.
//!
//! invariants:
//!     - dispatch() calls exactly one handler method per invocation
//!     - set-stack-policy goes to set_termination_protection when a termination switch is
//!       set, otherwise to apply_stack_policy
//!
//! do-not:
//!     - Never add mode-specific logic to dispatch(); put it behind ModeHandler

use crate::types::{CommandDescriptor, Mode, PolicyOperation};
use anyhow::Result;

/// Downstream operations, one per routable mode. Every method receives the full,
/// read-only descriptor.
pub trait ModeHandler {
    fn validate_online(&mut self, command: &CommandDescriptor) -> Result<()>;
    fn validate_offline(&mut self, command: &CommandDescriptor) -> Result<()>;
    fn convert(&mut self, command: &CommandDescriptor) -> Result<()>;
    fn configure(&mut self, command: &CommandDescriptor) -> Result<()>;
    fn create_stack(&mut self, command: &CommandDescriptor) -> Result<()>;
    fn delete_stack(&mut self, command: &CommandDescriptor) -> Result<()>;
    fn update_stack(&mut self, command: &CommandDescriptor) -> Result<()>;
    fn mfa(&mut self, command: &CommandDescriptor) -> Result<()>;
    fn setup_remote_sink(&mut self, command: &CommandDescriptor) -> Result<()>;
    fn destroy_remote_sink(&mut self, command: &CommandDescriptor) -> Result<()>;
    fn create_parameters(&mut self, command: &CommandDescriptor) -> Result<()>;
    fn apply_stack_policy(&mut self, command: &CommandDescriptor) -> Result<()>;
    fn set_termination_protection(&mut self, command: &CommandDescriptor) -> Result<()>;
}

pub fn dispatch<H: ModeHandler + ?Sized>(
    command: &CommandDescriptor,
    handler: &mut H,
) -> Result<()> {
    log::debug!("Dispatching {}", command.mode);

    match &command.mode {
        Mode::Validate { .. } => handler.validate_online(command),
        Mode::ValidateOffline { .. } => handler.validate_offline(command),
        Mode::Convert { .. } => handler.convert(command),
        Mode::Configure => handler.configure(command),
        Mode::CreateStack { .. } => handler.create_stack(command),
        Mode::DeleteStack { .. } => handler.delete_stack(command),
        Mode::UpdateStack { .. } => handler.update_stack(command),
        Mode::Mfa => handler.mfa(command),
        Mode::SetupRemoteSink => handler.setup_remote_sink(command),
        Mode::DestroyRemoteSink => handler.destroy_remote_sink(command),
        Mode::CreateParameters { .. } => handler.create_parameters(command),
        Mode::SetStackPolicy { flags, .. } => match flags.operation() {
            PolicyOperation::TerminationProtection { .. } => {
                handler.set_termination_protection(command)
            }
            PolicyOperation::ApplyPolicy(_) => handler.apply_stack_policy(command),
        },
    }
}
