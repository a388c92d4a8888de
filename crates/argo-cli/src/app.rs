//! Startup pipeline.
//!
//! Every invocation runs the same fixed steps:
//!
//! ```text
//! parse ──► configure logging ──► pre-run ──► dispatch
//!                                   │
//!                                   └─ CLI version debug line + compatibility check
//! ```
//!
//! The pre-run step yields a [`CompatibilityOutcome`], which cannot abort the
//! pipeline. Dispatch always follows.

use std::ffi::OsString;
use std::io::Write;

use argo_apiclient::{ApiClientFactory, ClientOptions, HttpClientFactory};
use clap::{ArgMatches, FromArgMatches};
use tracing::debug;

use crate::cli::{ClientArgs, GlobalArgs};
use crate::compat::{CompatibilityChecker, CompatibilityOutcome};
use crate::env::{Environment, ProcessEnv};
use crate::error::CliError;
use crate::logging;
use crate::registry::{leaf_matches, CommandContext, CommandRegistry};
use crate::version;

/// Parsed command line plus the context derived from it.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Raw matches, used for dispatch.
    pub matches: ArgMatches,
    /// Resolved settings shared by every command.
    pub context: CommandContext,
}

/// The CLI application.
#[derive(Debug)]
pub struct App<E = ProcessEnv> {
    registry: CommandRegistry,
    env: E,
    install_subscriber: bool,
}

impl App<ProcessEnv> {
    /// Standard commands against the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_env(CommandRegistry::standard(), ProcessEnv)
    }
}

impl Default for App<ProcessEnv> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Environment> App<E> {
    /// Custom registry and environment.
    #[must_use]
    pub const fn with_env(registry: CommandRegistry, env: E) -> Self {
        Self {
            registry,
            env,
            install_subscriber: true,
        }
    }

    /// Whether to install the global tracing subscriber. Disable when the
    /// embedding program manages its own.
    #[must_use]
    pub const fn install_subscriber(mut self, install: bool) -> Self {
        self.install_subscriber = install;
        self
    }

    /// Parse arguments and resolve global settings.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Usage`] for invalid arguments or help requests,
    /// [`CliError::Client`] for malformed client flags, and
    /// [`CliError::Command`] if the registry has clashing command names.
    pub fn parse<I, T>(&self, args: I) -> Result<Invocation, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.registry.validate()?;
        let root = self.registry.root_command();
        let matches = root.clone().try_get_matches_from(args)?;

        let leaf = leaf_matches(&matches);
        let log = GlobalArgs::from_arg_matches(leaf)?.resolve();
        let client = ClientArgs::from_arg_matches(leaf)?.into_options(&self.env)?;

        Ok(Invocation {
            matches,
            context: CommandContext { log, client, root },
        })
    }

    /// Pre-run hook: log the CLI version and check server compatibility.
    pub async fn pre_run<F: ApiClientFactory>(
        &self,
        ctx: &CommandContext,
        factory: &F,
    ) -> CompatibilityOutcome {
        debug!(version = %version::git_tag(), "CLI version");
        CompatibilityChecker::new(factory, version::git_tag(), ctx.client.request_timeout)
            .run(&self.env)
            .await
    }

    /// Run the full pipeline with the HTTP client factory.
    ///
    /// # Errors
    ///
    /// Returns a usage error from parsing or whatever the command returns.
    pub async fn run<I, T>(&self, args: I, out: &mut (dyn Write + Send)) -> Result<(), CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.run_with_factory(args, |options| HttpClientFactory::new(options.clone()), out)
            .await
    }

    /// Run the full pipeline with a caller-supplied client factory.
    ///
    /// # Errors
    ///
    /// Returns a usage error from parsing or whatever the command returns.
    pub async fn run_with_factory<I, T, F, M>(
        &self,
        args: I,
        make_factory: M,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
        F: ApiClientFactory,
        M: FnOnce(&ClientOptions) -> F,
    {
        let invocation = self.parse(args)?;

        if self.install_subscriber && !logging::init(&invocation.context.log) {
            debug!("Tracing subscriber already installed");
        }

        let factory = make_factory(&invocation.context.client);
        let outcome = self.pre_run(&invocation.context, &factory).await;
        debug!(?outcome, "Pre-run complete");

        self.registry
            .dispatch(&invocation.context, &invocation.matches, out)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use argo_apiclient::ARGO_SERVER_ENV;
    use clap::Command;

    use super::*;
    use crate::cli::{LogLevel, VERBOSE_GLOG_LEVEL};
    use crate::compat::tests::{CapturedLogs, FakeFactory, FakeServer};
    use crate::registry::{CliCommand, CommandFuture};

    /// Command that counts its runs.
    struct Counter(Arc<AtomicUsize>);

    impl CliCommand for Counter {
        fn name(&self) -> &'static str {
            "submit"
        }

        fn about(&self) -> &'static str {
            "submit a workflow"
        }

        fn run<'a>(
            &'a self,
            _ctx: &'a CommandContext,
            _matches: &'a ArgMatches,
            out: &'a mut (dyn Write + Send),
        ) -> CommandFuture<'a> {
            Box::pin(async move {
                self.0.fetch_add(1, Ordering::SeqCst);
                writeln!(out, "submitted")?;
                Ok(())
            })
        }
    }

    fn app(env: HashMap<String, String>, runs: &Arc<AtomicUsize>) -> App<HashMap<String, String>> {
        let registry = CommandRegistry::new().register(Counter(Arc::clone(runs)));
        App::with_env(registry, env).install_subscriber(false)
    }

    fn server_env() -> HashMap<String, String> {
        [(ARGO_SERVER_ENV.to_string(), "localhost:2746".to_string())].into()
    }

    #[test]
    fn parse_resolves_verbose_override() {
        let app = App::with_env(CommandRegistry::standard(), HashMap::new());
        let invocation = app
            .parse(["argo", "list", "--loglevel", "error", "--gloglevel", "1", "-v"])
            .unwrap();
        assert_eq!(invocation.context.log.level, LogLevel::Debug);
        assert_eq!(invocation.context.log.glog_level, VERBOSE_GLOG_LEVEL);
    }

    #[test]
    fn parse_reads_token_from_environment() {
        let env: HashMap<String, String> =
            [("ARGO_TOKEN".to_string(), "Bearer t0k3n".to_string())].into();
        let app = App::with_env(CommandRegistry::standard(), env);
        let invocation = app.parse(["argo", "version"]).unwrap();
        assert_eq!(invocation.context.client.token.as_deref(), Some("Bearer t0k3n"));
    }

    #[test]
    fn parse_tolerates_empty_env_switches() {
        let env: HashMap<String, String> = [
            ("ARGO_SECURE".to_string(), String::new()),
            ("ARGO_HTTP1".to_string(), String::new()),
        ]
        .into();
        let app = App::with_env(CommandRegistry::standard(), env);
        let invocation = app.parse(["argo", "version"]).unwrap();
        assert!(!invocation.context.client.secure);
        assert!(!invocation.context.client.http1);
    }

    #[test]
    fn parse_rejects_clashing_registry() {
        let runs = Arc::new(AtomicUsize::new(0));
        let registry = CommandRegistry::new()
            .register(Counter(Arc::clone(&runs)))
            .register(Counter(Arc::clone(&runs)));
        let app = App::with_env(registry, HashMap::new());
        assert!(matches!(app.parse(["argo"]), Err(CliError::Command(_))));
    }

    #[test]
    fn parse_help_is_a_usage_error() {
        let app = App::with_env(CommandRegistry::standard(), HashMap::new());
        let err = app.parse(["argo", "--help"]).unwrap_err();
        match err {
            CliError::Usage(e) => assert_eq!(e.kind(), clap::error::ErrorKind::DisplayHelp),
            other => panic!("expected usage error, got {other:?}"),
        }
    }

    #[test]
    fn parse_context_root_has_all_commands() {
        let app = App::with_env(CommandRegistry::standard(), HashMap::new());
        let invocation = app.parse(["argo"]).unwrap();
        let root: &Command = &invocation.context.root;
        assert!(root.find_subcommand("terminate").is_some());
    }

    #[tokio::test]
    async fn unset_server_never_builds_a_client() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());

        let runs = Arc::new(AtomicUsize::new(0));
        let app = app(HashMap::new(), &runs);
        let factory = FakeFactory::new(FakeServer::Reports("v0.0.0"));

        let mut out = Vec::new();
        app.run_with_factory(["argo", "submit"], |_| &factory, &mut out)
            .await
            .unwrap();

        assert_eq!(factory.calls(), 0);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(logs.warnings().is_empty());
    }

    #[tokio::test]
    async fn failed_check_does_not_block_the_command() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());

        let runs = Arc::new(AtomicUsize::new(0));
        let app = app(server_env(), &runs);
        let factory = FakeFactory::new(FakeServer::Unreachable);

        let mut out = Vec::new();
        app.run_with_factory(["argo", "submit"], |_| &factory, &mut out)
            .await
            .unwrap();

        assert_eq!(factory.calls(), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(String::from_utf8(out).unwrap(), "submitted\n");
        assert_eq!(logs.warnings().len(), 1);
    }

    #[tokio::test]
    async fn mismatch_warns_and_command_still_runs() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());

        let runs = Arc::new(AtomicUsize::new(0));
        let app = app(server_env(), &runs);
        let factory = FakeFactory::new(FakeServer::Reports("v0.0.0-not-this-build"));

        let mut out = Vec::new();
        app.run_with_factory(["argo", "submit"], |_| &factory, &mut out)
            .await
            .unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        let warnings = logs.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains(version::git_tag()));
        assert!(warnings[0].contains("v0.0.0-not-this-build"));
    }

    #[tokio::test]
    async fn matching_version_is_silent() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());

        let runs = Arc::new(AtomicUsize::new(0));
        let app = app(server_env(), &runs);
        let ctx = app.parse(["argo", "submit"]).unwrap().context;

        let factory = FakeFactory::new(FakeServer::Reports(version::git_tag()));
        let outcome = app.pre_run(&ctx, &factory).await;

        assert!(matches!(outcome, CompatibilityOutcome::Match));
        assert!(logs.warnings().is_empty());
        assert!(logs.contents().contains("CLI version"));
    }

    #[tokio::test]
    async fn root_without_subcommand_still_runs_pre_run() {
        let runs = Arc::new(AtomicUsize::new(0));
        let app = app(server_env(), &runs);
        let factory = FakeFactory::new(FakeServer::Reports("v9.9.9"));

        let mut out = Vec::new();
        app.run_with_factory(["argo"], |_| &factory, &mut out)
            .await
            .unwrap();

        assert_eq!(factory.calls(), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(String::from_utf8(out).unwrap().contains("Usage"));
    }
}
