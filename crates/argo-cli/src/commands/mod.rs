//! CLI command implementations.
//!
//! Each submodule implements one top-level command:
//! - [`completion`] - Shell completion scripts
//! - [`delete`] - Delete workflows
//! - [`get`] - Show one workflow
//! - [`list`] - List workflows
//! - [`action`] - Resubmit, resume, retry, suspend, stop and terminate
//! - [`version`] - Client and server build information

pub mod action;
pub mod completion;
pub mod delete;
pub mod get;
pub mod list;
pub mod version;

use argo_apiclient::WorkflowAction;

pub use action::WorkflowActionCommand;
pub use completion::CompletionCommand;
pub use delete::DeleteCommand;
pub use get::GetCommand;
pub use list::ListCommand;
pub use version::VersionCommand;

use crate::error::CliError;
use crate::registry::CliCommand;

/// Every built-in command in help-listing order.
#[must_use]
pub fn all() -> Vec<Box<dyn CliCommand>> {
    let mut commands: Vec<Box<dyn CliCommand>> = vec![
        Box::new(CompletionCommand),
        Box::new(DeleteCommand),
        Box::new(GetCommand),
        Box::new(ListCommand),
    ];
    commands.extend(
        WorkflowAction::ALL
            .into_iter()
            .map(|action| Box::new(WorkflowActionCommand::new(action)) as Box<dyn CliCommand>),
    );
    commands.push(Box::new(VersionCommand));
    commands
}

/// Parse a command's derived arguments from its matches.
pub(crate) fn parse_args<T: clap::FromArgMatches>(matches: &clap::ArgMatches) -> Result<T, CliError> {
    Ok(T::from_arg_matches(matches)?)
}
