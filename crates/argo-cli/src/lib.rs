//! # argo-cli
//!
//! Command-line interface to Argo Workflows.
//!
//! Provides:
//! - The root `argo` command and its registry of subcommands
//! - Persistent logging flags (`--loglevel`, `--gloglevel`, `-v`)
//! - A pre-run hook that warns when the CLI and Argo Server versions differ
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   parse   ┌─────────┐  pre-run  ┌────────────────────┐
//! │  argv    │──────────►│   App   │──────────►│ CompatibilityCheck │
//! └──────────┘           └────┬────┘           └─────────┬──────────┘
//!                             │ dispatch                 │ GET /api/v1/version
//!                             ▼                          ▼
//!                     ┌─────────────────┐      ┌─────────────────┐
//!                     │ CommandRegistry │─────►│   Argo Server   │
//!                     └─────────────────┘      └─────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app;
pub mod cli;
pub mod commands;
pub mod compat;
pub mod env;
pub mod error;
pub mod logging;
pub mod output;
pub mod registry;
pub mod version;

pub use app::{App, Invocation};
pub use cli::{ClientArgs, Format, GlobalArgs, LogLevel, LogSettings};
pub use compat::{CheckFailure, CompatibilityChecker, CompatibilityOutcome};
pub use env::{Environment, ProcessEnv};
pub use error::CliError;
pub use output::OutputFormat;
pub use registry::{build_root_command, CliCommand, CommandContext, CommandRegistry};
