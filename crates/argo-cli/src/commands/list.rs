//! List command implementation.

use std::io::Write;

use clap::{ArgMatches, Args, Command};

use super::parse_args;
use crate::cli::Format;
use crate::output::{OutputFormat, WorkflowTable};
use crate::registry::{CliCommand, CommandContext, CommandFuture};

/// Arguments for the list command.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub output: Format,

    /// Only show workflows in this phase, e.g. Running.
    #[arg(long)]
    pub status: Option<String>,
}

/// Lists workflows in the configured namespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListCommand;

impl CliCommand for ListCommand {
    fn name(&self) -> &'static str {
        "list"
    }

    fn about(&self) -> &'static str {
        "list workflows"
    }

    fn args(&self, command: Command) -> Command {
        ListArgs::augment_args(command)
    }

    fn run<'a>(
        &'a self,
        ctx: &'a CommandContext,
        matches: &'a ArgMatches,
        out: &'a mut (dyn Write + Send),
    ) -> CommandFuture<'a> {
        Box::pin(async move {
            let args: ListArgs = parse_args(matches)?;
            let mut workflows = ctx
                .server_client()?
                .workflow_service_client()
                .list_workflows(ctx.namespace())
                .await?;

            if let Some(status) = &args.status {
                workflows.retain(|wf| wf.phase().eq_ignore_ascii_case(status));
            }

            OutputFormat::new(args.output).write(out, &WorkflowTable { workflows })
        })
    }
}
