//! Shell completion command.

use std::io::Write;

use clap::{ArgMatches, Args, Command};
use clap_complete::Shell;

use super::parse_args;
use crate::registry::{CliCommand, CommandContext, CommandFuture};
use crate::version::CLI_NAME;

/// Arguments for the completion command.
#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    /// Shell to generate the script for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Prints a completion script for the whole command tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionCommand;

impl CliCommand for CompletionCommand {
    fn name(&self) -> &'static str {
        "completion"
    }

    fn about(&self) -> &'static str {
        "output shell completion code for the specified shell (bash, zsh, fish, elvish or powershell)"
    }

    fn args(&self, command: Command) -> Command {
        CompletionArgs::augment_args(command)
    }

    fn run<'a>(
        &'a self,
        ctx: &'a CommandContext,
        matches: &'a ArgMatches,
        out: &'a mut (dyn Write + Send),
    ) -> CommandFuture<'a> {
        Box::pin(async move {
            let args: CompletionArgs = parse_args(matches)?;
            let mut root = ctx.root.clone();
            clap_complete::generate(args.shell, &mut root, CLI_NAME, out);
            Ok(())
        })
    }
}
