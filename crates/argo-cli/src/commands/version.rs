//! Version command implementation.

use std::io::Write;

use argo_apiclient::{ApiClient, InfoService};
use clap::{ArgMatches, Args, Command};

use super::parse_args;
use crate::cli::Format;
use crate::output::{OutputFormat, VersionReport};
use crate::registry::{CliCommand, CommandContext, CommandFuture};
use crate::version::client_version;

/// Arguments for the version command.
#[derive(Args, Debug, Clone)]
pub struct VersionArgs {
    /// Print just the version number.
    #[arg(long)]
    pub short: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub output: Format,
}

/// Prints client build information, and the server's when one is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionCommand;

impl CliCommand for VersionCommand {
    fn name(&self) -> &'static str {
        "version"
    }

    fn about(&self) -> &'static str {
        "print version information"
    }

    fn args(&self, command: Command) -> Command {
        VersionArgs::augment_args(command)
    }

    fn run<'a>(
        &'a self,
        ctx: &'a CommandContext,
        matches: &'a ArgMatches,
        out: &'a mut (dyn Write + Send),
    ) -> CommandFuture<'a> {
        Box::pin(async move {
            let args: VersionArgs = parse_args(matches)?;

            let server_version = if ctx.client.argo_server.is_some() {
                let info = ctx.server_client()?.info_service_client()?;
                Some(info.get_version().await?)
            } else {
                None
            };

            let report = VersionReport {
                client_version: client_version(),
                server_version,
                short: args.short,
            };
            OutputFormat::new(args.output).write(out, &report)
        })
    }
}
