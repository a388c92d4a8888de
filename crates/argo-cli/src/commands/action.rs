//! Workflow lifecycle commands.
//!
//! `resubmit`, `resume`, `retry`, `suspend`, `stop` and `terminate` share one
//! shape: take workflow names, apply the action to each, report the result.

use std::io::Write;

use argo_apiclient::WorkflowAction;
use clap::{ArgMatches, Args, Command};
use tracing::debug;

use super::parse_args;
use crate::registry::{CliCommand, CommandContext, CommandFuture};

/// Arguments shared by the lifecycle commands.
#[derive(Args, Debug, Clone)]
pub struct ActionArgs {
    /// Workflows to act on.
    #[arg(required = true, value_name = "WORKFLOW")]
    pub workflows: Vec<String>,
}

/// One lifecycle command.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowActionCommand {
    action: WorkflowAction,
}

impl WorkflowActionCommand {
    /// Command applying `action`.
    #[must_use]
    pub const fn new(action: WorkflowAction) -> Self {
        Self { action }
    }

    /// The action this command applies.
    #[must_use]
    pub const fn action(&self) -> WorkflowAction {
        self.action
    }

    const fn past_tense(self) -> &'static str {
        match self.action {
            WorkflowAction::Resubmit => "resubmitted",
            WorkflowAction::Resume => "resumed",
            WorkflowAction::Retry => "retried",
            WorkflowAction::Suspend => "suspended",
            WorkflowAction::Stop => "stopped",
            WorkflowAction::Terminate => "terminated",
        }
    }
}

impl CliCommand for WorkflowActionCommand {
    fn name(&self) -> &'static str {
        self.action.as_str()
    }

    fn about(&self) -> &'static str {
        match self.action {
            WorkflowAction::Resubmit => "resubmit one or more workflows",
            WorkflowAction::Resume => "resume zero or more workflows",
            WorkflowAction::Retry => "retry zero or more workflows",
            WorkflowAction::Suspend => "suspend zero or more workflows",
            WorkflowAction::Stop => "stop zero or more workflows allowing all exit handlers to run",
            WorkflowAction::Terminate => "terminate zero or more workflows immediately",
        }
    }

    fn args(&self, command: Command) -> Command {
        ActionArgs::augment_args(command)
    }

    fn run<'a>(
        &'a self,
        ctx: &'a CommandContext,
        matches: &'a ArgMatches,
        out: &'a mut (dyn Write + Send),
    ) -> CommandFuture<'a> {
        Box::pin(async move {
            let args: ActionArgs = parse_args(matches)?;
            let service = ctx.server_client()?.workflow_service_client();

            for name in &args.workflows {
                debug!(workflow = %name, action = self.action.as_str(), "Applying workflow action");
                let updated = service
                    .apply_action(ctx.namespace(), name, self.action)
                    .await?;

                if self.action == WorkflowAction::Resubmit {
                    writeln!(out, "workflow {name} resubmitted as {}", updated.metadata.name)?;
                } else {
                    writeln!(out, "workflow {name} {}", self.past_tense())?;
                }
            }
            Ok(())
        })
    }
}
