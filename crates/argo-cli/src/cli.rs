//! Persistent flags shared by every command.
//!
//! All flags here are declared `global`, so they are accepted before or after
//! any subcommand and are visible in every subcommand's matches.

use std::time::Duration;

use argo_apiclient::options::parse_header;
use argo_apiclient::{ClientOptions, DEFAULT_NAMESPACE};
use clap::{Args, ValueEnum};

use crate::env::Environment;
use crate::error::CliError;

/// Environment variable holding the Authorization header value.
pub const ARGO_TOKEN_ENV: &str = "ARGO_TOKEN";

/// Environment fallback for `--secure`.
pub const ARGO_SECURE_ENV: &str = "ARGO_SECURE";

/// Environment fallback for `--insecure-skip-verify`.
pub const ARGO_INSECURE_SKIP_VERIFY_ENV: &str = "ARGO_INSECURE_SKIP_VERIFY";

/// Environment fallback for `--argo-http1`.
pub const ARGO_HTTP1_ENV: &str = "ARGO_HTTP1";

/// Glog level forced by `--verbose`.
pub const VERBOSE_GLOG_LEVEL: i32 = 6;

/// Log level accepted by `--loglevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Debug and above.
    Debug,
    /// Info and above.
    #[default]
    Info,
    /// Warnings and errors.
    #[value(alias = "warning")]
    Warn,
    /// Errors only.
    Error,
}

impl LogLevel {
    /// Name usable as a tracing filter directive.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Logging flags.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Set the logging level. One of: debug|info|warn|error
    #[arg(long = "loglevel", global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set the glog logging level
    #[arg(long = "gloglevel", global = true, default_value_t = 0)]
    pub glog_level: i32,

    /// Enabled verbose logging, i.e. --loglevel debug
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Resolve into effective settings. `--verbose` wins over explicit levels.
    #[must_use]
    pub const fn resolve(&self) -> LogSettings {
        if self.verbose {
            LogSettings {
                level: LogLevel::Debug,
                glog_level: VERBOSE_GLOG_LEVEL,
            }
        } else {
            LogSettings {
                level: self.log_level,
                glog_level: self.glog_level,
            }
        }
    }
}

/// Effective logging configuration for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogSettings {
    /// Level for the CLI's own events.
    pub level: LogLevel,
    /// Verbosity of the HTTP transport libraries.
    pub glog_level: i32,
}

/// API client flags.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
#[command(next_help_heading = "API Client Options")]
pub struct ClientArgs {
    /// API server `host:port`, e.g. localhost:2746
    #[arg(long, global = true, env = "ARGO_SERVER", value_name = "HOST:PORT")]
    pub argo_server: Option<String>,

    /// Use TLS towards the Argo Server [env: ARGO_SECURE=true]
    #[arg(short, long, global = true)]
    pub secure: bool,

    /// Skip TLS certificate verification. Do not use in production [env: ARGO_INSECURE_SKIP_VERIFY=true]
    #[arg(short = 'k', long, global = true)]
    pub insecure_skip_verify: bool,

    /// Use HTTP/1.1 instead of HTTP/2 towards the Argo Server [env: ARGO_HTTP1=true]
    #[arg(long, global = true)]
    pub argo_http1: bool,

    /// Path prefix when the Argo Server runs behind an ingress, e.g. /argo
    #[arg(long, global = true, env = "ARGO_BASE_HREF", value_name = "PATH")]
    pub argo_base_href: Option<String>,

    /// Extra request header, repeatable
    #[arg(short = 'H', long = "header", global = true, value_name = "NAME: VALUE")]
    pub headers: Vec<String>,

    /// Namespace to operate in
    #[arg(short, long, global = true, env = "ARGO_NAMESPACE")]
    pub namespace: Option<String>,

    /// Seconds to wait for a single API request
    #[arg(
        long,
        global = true,
        value_name = "SECONDS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_timeout: u64,
}

impl ClientArgs {
    /// Resolve into client options. The token is read from `ARGO_TOKEN`.
    ///
    /// The boolean switches also turn on from their environment variables.
    /// Those are read leniently: anything but a truthy value, including an
    /// empty one, leaves the switch off.
    ///
    /// # Errors
    ///
    /// Returns an error if a `--header` value is malformed.
    pub fn into_options(self, env: &impl Environment) -> Result<ClientOptions, CliError> {
        let headers = self
            .headers
            .iter()
            .map(|raw| parse_header(raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ClientOptions {
            argo_server: self.argo_server,
            secure: self.secure || env_flag(env, ARGO_SECURE_ENV),
            insecure_skip_verify: self.insecure_skip_verify
                || env_flag(env, ARGO_INSECURE_SKIP_VERIFY_ENV),
            http1: self.argo_http1 || env_flag(env, ARGO_HTTP1_ENV),
            base_href: self.argo_base_href,
            token: env.var(ARGO_TOKEN_ENV),
            namespace: self
                .namespace
                .filter(|ns| !ns.is_empty())
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            headers,
            request_timeout: Duration::from_secs(self.request_timeout),
        })
    }
}

/// Whether an environment switch is on. Accepts the same truthy spellings as
/// clap's boolish parser.
fn env_flag(env: &impl Environment, key: &str) -> bool {
    env.var(key).is_some_and(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "y" | "yes" | "t" | "true" | "on" | "1"
        )
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use clap::{Command, FromArgMatches};
    use proptest::prelude::*;

    use super::*;

    fn parse_global(args: &[&str]) -> GlobalArgs {
        let cmd = GlobalArgs::augment_args(Command::new("argo"));
        let matches = cmd.try_get_matches_from(args).unwrap();
        GlobalArgs::from_arg_matches(&matches).unwrap()
    }

    fn parse_client(args: &[&str]) -> ClientArgs {
        let cmd = ClientArgs::augment_args(Command::new("argo"));
        let matches = cmd.try_get_matches_from(args).unwrap();
        ClientArgs::from_arg_matches(&matches).unwrap()
    }

    #[test]
    fn global_defaults() {
        let args = parse_global(&["argo"]);
        assert_eq!(args.log_level, LogLevel::Info);
        assert_eq!(args.glog_level, 0);
        assert!(!args.verbose);
        assert_eq!(args.resolve(), LogSettings::default());
    }

    #[test]
    fn explicit_levels_without_verbose() {
        let args = parse_global(&["argo", "--loglevel", "error", "--gloglevel", "3"]);
        let settings = args.resolve();
        assert_eq!(settings.level, LogLevel::Error);
        assert_eq!(settings.glog_level, 3);
    }

    #[test]
    fn warning_is_an_alias_for_warn() {
        let args = parse_global(&["argo", "--loglevel", "warning"]);
        assert_eq!(args.log_level, LogLevel::Warn);
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let cmd = GlobalArgs::augment_args(Command::new("argo"));
        assert!(cmd.try_get_matches_from(["argo", "--loglevel", "chatty"]).is_err());
    }

    #[test]
    fn short_verbose_flag() {
        let settings = parse_global(&["argo", "-v", "--loglevel", "error"]).resolve();
        assert_eq!(settings.level, LogLevel::Debug);
        assert_eq!(settings.glog_level, VERBOSE_GLOG_LEVEL);
    }

    proptest! {
        #[test]
        fn verbose_always_wins(
            level in prop::sample::select(vec!["debug", "info", "warn", "warning", "error"]),
            glog in -3i32..20,
            verbose in any::<bool>(),
            verbose_first in any::<bool>(),
        ) {
            let glog_arg = format!("--gloglevel={glog}");
            let mut argv = vec!["argo"];
            if verbose && verbose_first {
                argv.push("--verbose");
            }
            argv.extend(["--loglevel", level, glog_arg.as_str()]);
            if verbose && !verbose_first {
                argv.push("--verbose");
            }

            let settings = parse_global(&argv).resolve();
            if verbose {
                prop_assert_eq!(settings.level, LogLevel::Debug);
                prop_assert_eq!(settings.glog_level, VERBOSE_GLOG_LEVEL);
            } else {
                prop_assert_eq!(settings.level.as_str(), if level == "warning" { "warn" } else { level });
                prop_assert_eq!(settings.glog_level, glog);
            }
        }
    }

    #[test]
    fn client_args_into_options() {
        let args = parse_client(&[
            "argo",
            "--argo-server",
            "localhost:2746",
            "--secure",
            "--argo-http1",
            "--argo-base-href",
            "/argo",
            "-H",
            "X-Tenant: blue",
            "-n",
            "workflows",
            "--request-timeout",
            "5",
        ]);
        let env: HashMap<String, String> =
            [(ARGO_TOKEN_ENV.to_string(), "Bearer abc".to_string())].into();

        let options = args.into_options(&env).unwrap();
        assert_eq!(options.argo_server.as_deref(), Some("localhost:2746"));
        assert!(options.secure);
        assert!(options.http1);
        assert_eq!(options.base_href.as_deref(), Some("/argo"));
        assert_eq!(options.headers, vec![("X-Tenant".to_string(), "blue".to_string())]);
        assert_eq!(options.namespace, "workflows");
        assert_eq!(options.token.as_deref(), Some("Bearer abc"));
        assert_eq!(options.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn client_args_bad_header() {
        let args = parse_client(&["argo", "-H", "no-colon"]);
        let err = args.into_options(&HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("invalid header"));
    }

    #[test]
    fn env_switches_are_lenient() {
        let env: HashMap<String, String> = [
            (ARGO_SECURE_ENV.to_string(), String::new()),
            (ARGO_INSECURE_SKIP_VERIFY_ENV.to_string(), "maybe".to_string()),
            (ARGO_HTTP1_ENV.to_string(), " TRUE ".to_string()),
        ]
        .into();

        let options = parse_client(&["argo"]).into_options(&env).unwrap();
        assert!(!options.secure);
        assert!(!options.insecure_skip_verify);
        assert!(options.http1);
    }

    #[test]
    fn flag_wins_over_falsey_env() {
        let env: HashMap<String, String> = [(ARGO_SECURE_ENV.to_string(), "false".to_string())].into();
        let options = parse_client(&["argo", "-s"]).into_options(&env).unwrap();
        assert!(options.secure);
    }

    #[test]
    fn zero_request_timeout_is_rejected() {
        let cmd = ClientArgs::augment_args(Command::new("argo"));
        assert!(cmd.try_get_matches_from(["argo", "--request-timeout", "0"]).is_err());
    }
}
