//! Command registry.
//!
//! Every subcommand is a [`CliCommand`] trait object. The registry folds them,
//! in registration order, into one `clap::Command` tree under the root and
//! attaches the persistent flags. Dispatch walks the same objects to find the
//! run body for the matched subcommand.

use std::collections::HashSet;
use std::io::Write;

use argo_apiclient::{ArgoServerClient, ClientOptions};
use clap::{ArgMatches, Args, Command};
use futures::future::BoxFuture;

use crate::cli::{ClientArgs, GlobalArgs, LogSettings};
use crate::commands;
use crate::error::CliError;
use crate::version::CLI_NAME;

/// One-line description of the root command.
pub const ROOT_ABOUT: &str = "argo is the command line interface to Argo";

const ROOT_LONG_ABOUT: &str = "\
argo is the command line interface to Argo

You can use the CLI in the following modes:

# Kubernetes API Mode (default)

Requests are sent directly to the Kubernetes API. No Argo Server is needed.
Not available in this client; configure an Argo Server instead.

# Argo Server GRPC Mode

Requests are sent to the Argo Server over HTTP/2. Large workflows and the
workflow archive are supported. Network load-balancers that do not support
HTTP/2 are not supported.

To enable, set ARGO_SERVER:

    ARGO_SERVER=localhost:2746 ;# The format is \"host:port\" - do not prefix with \"http\" or \"https\"

If you have transport-layer security (TLS) enabled:

    ARGO_SECURE=true

If your server is running with self-signed certificates. Do not use in production:

    ARGO_INSECURE_SKIP_VERIFY=true

You will also need to set:

    ARGO_NAMESPACE=argo
    ARGO_TOKEN='Bearer ******' ;# Should always start with \"Bearer \" or \"Basic \".

# Argo Server HTTP1 Mode

As per GRPC mode, but uses HTTP/1.1. Can be used with load-balancers that do
not support HTTP/2. Use the same configuration as GRPC mode, but also set:

    ARGO_HTTP1=true

If your server is behind an ingress with a path:

    ARGO_BASE_HREF=/argo";

/// Future returned by [`CliCommand::run`].
pub type CommandFuture<'a> = BoxFuture<'a, Result<(), CliError>>;

/// Everything a command body may read. Built once after parsing.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Effective logging settings.
    pub log: LogSettings,
    /// Resolved API client options.
    pub client: ClientOptions,
    /// The full command tree, for help and completion output.
    pub root: Command,
}

impl CommandContext {
    /// Build a client for the configured Argo Server.
    ///
    /// # Errors
    ///
    /// Returns an error if no server is configured or the options are invalid.
    pub fn server_client(&self) -> Result<ArgoServerClient, CliError> {
        Ok(ArgoServerClient::new(&self.client)?)
    }

    /// Namespace commands operate in.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.client.namespace
    }
}

/// A node in the command tree.
pub trait CliCommand: Send + Sync {
    /// Name, unique among siblings.
    fn name(&self) -> &'static str;

    /// One-line description for help output.
    fn about(&self) -> &'static str;

    /// Add this command's own flags and positionals.
    fn args(&self, command: Command) -> Command {
        command
    }

    /// Nested commands. A command with children never has its own `run`
    /// called; without a matched child it prints its help.
    fn children(&self) -> &[Box<dyn CliCommand>] {
        &[]
    }

    /// Execute the command.
    fn run<'a>(
        &'a self,
        ctx: &'a CommandContext,
        matches: &'a ArgMatches,
        out: &'a mut (dyn Write + Send),
    ) -> CommandFuture<'a>;

    /// The clap node for this command and its children.
    fn command(&self) -> Command {
        let node = self.args(Command::new(self.name()).about(self.about()));
        self.children()
            .iter()
            .fold(node, |node, child| node.subcommand(child.command()))
    }
}

/// Ordered collection of top-level commands.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Box<dyn CliCommand>>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.commands.iter().map(|c| c.name()))
            .finish()
    }
}

impl CommandRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in command in help-listing order.
    #[must_use]
    pub fn standard() -> Self {
        commands::all()
            .into_iter()
            .fold(Self::new(), |registry, command| registry.register_boxed(command))
    }

    /// Append a command.
    #[must_use]
    pub fn register(self, command: impl CliCommand + 'static) -> Self {
        self.register_boxed(Box::new(command))
    }

    /// Append an already boxed command. Name clashes are reported by
    /// [`CommandRegistry::validate`].
    #[must_use]
    pub fn register_boxed(mut self, command: Box<dyn CliCommand>) -> Self {
        self.commands.push(command);
        self
    }

    /// Check that sibling names are unique at every level of the tree.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Command`] naming the first duplicate found.
    pub fn validate(&self) -> Result<(), CliError> {
        check_unique_names(&self.commands, CLI_NAME)
    }

    /// Top-level command names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|c| c.name())
    }

    /// Assemble the root command with all registered children.
    #[must_use]
    pub fn root_command(&self) -> Command {
        let root = Command::new(CLI_NAME)
            .about(ROOT_ABOUT)
            .long_about(ROOT_LONG_ABOUT);
        let root = ClientArgs::augment_args(GlobalArgs::augment_args(root));
        self.commands
            .iter()
            .fold(root, |root, command| root.subcommand(command.command()))
    }

    /// Run the body of the matched subcommand.
    ///
    /// With no subcommand matched, prints the help of the deepest matched node
    /// and performs no other action.
    ///
    /// # Errors
    ///
    /// Returns whatever the command body returns.
    pub async fn dispatch(
        &self,
        ctx: &CommandContext,
        matches: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let mut siblings: &[Box<dyn CliCommand>] = &self.commands;
        let mut matches = matches;
        let mut path: Vec<&str> = Vec::new();

        while let Some((name, sub_matches)) = matches.subcommand() {
            let command = siblings
                .iter()
                .find(|c| c.name() == name)
                .ok_or_else(|| CliError::Command(format!("unknown command: {name}")))?;
            path.push(name);

            if command.children().is_empty() {
                return command.run(ctx, sub_matches, out).await;
            }
            siblings = command.children();
            matches = sub_matches;
        }

        write_help(&ctx.root, &path, out)
    }
}

fn check_unique_names(siblings: &[Box<dyn CliCommand>], parent: &str) -> Result<(), CliError> {
    let mut seen = HashSet::new();
    for command in siblings {
        if !seen.insert(command.name()) {
            return Err(CliError::Command(format!(
                "duplicate command name under {parent}: {}",
                command.name()
            )));
        }
        check_unique_names(command.children(), command.name())?;
    }
    Ok(())
}

/// Build the standard root command.
#[must_use]
pub fn build_root_command() -> Command {
    CommandRegistry::standard().root_command()
}

/// Leaf of the matched subcommand chain. Global flag values are present here
/// wherever they appeared on the command line.
#[must_use]
pub fn leaf_matches(matches: &ArgMatches) -> &ArgMatches {
    let mut current = matches;
    while let Some((_, sub)) = current.subcommand() {
        current = sub;
    }
    current
}

fn write_help(root: &Command, path: &[&str], out: &mut (dyn Write + Send)) -> Result<(), CliError> {
    let mut root = root.clone();
    root.build();
    let mut node = &root;
    for name in path {
        node = node
            .find_subcommand(name)
            .ok_or_else(|| CliError::Command(format!("unknown command: {name}")))?;
    }
    write!(out, "{}", node.clone().render_help())?;
    Ok(())
}
