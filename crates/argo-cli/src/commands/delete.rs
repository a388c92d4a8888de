//! Delete command implementation.

use std::io::Write;

use clap::{ArgMatches, Args, Command};
use tracing::debug;

use super::parse_args;
use crate::registry::{CliCommand, CommandContext, CommandFuture};

/// Arguments for the delete command.
#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Workflows to delete.
    #[arg(required = true, value_name = "WORKFLOW")]
    pub workflows: Vec<String>,
}

/// Deletes workflows by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteCommand;

impl CliCommand for DeleteCommand {
    fn name(&self) -> &'static str {
        "delete"
    }

    fn about(&self) -> &'static str {
        "delete workflows"
    }

    fn args(&self, command: Command) -> Command {
        DeleteArgs::augment_args(command)
    }

    fn run<'a>(
        &'a self,
        ctx: &'a CommandContext,
        matches: &'a ArgMatches,
        out: &'a mut (dyn Write + Send),
    ) -> CommandFuture<'a> {
        Box::pin(async move {
            let args: DeleteArgs = parse_args(matches)?;
            let service = ctx.server_client()?.workflow_service_client();

            for name in &args.workflows {
                debug!(workflow = %name, namespace = %ctx.namespace(), "Deleting workflow");
                service.delete_workflow(ctx.namespace(), name).await?;
                writeln!(out, "Workflow '{name}' deleted")?;
            }
            Ok(())
        })
    }
}
