//! Client/server version compatibility check.
//!
//! Runs once per invocation before the selected command. It never fails the
//! invocation: every outcome, including errors, ends up as at most one
//! warning on stderr.
//!
//! ```text
//! ARGO_SERVER unset ──────────────────────────────► Skipped
//!        │ set
//!        ▼
//! factory.new_client() ── error ──────────────────► CheckFailed (warn)
//!        │
//!        ▼
//! info.get_version() ──── error / timeout ────────► CheckFailed (warn)
//!        │
//!        ▼
//! server tag == client tag ── yes ────────────────► Match
//!                         └── no ─────────────────► Mismatch (warn)
//! ```

use std::time::Duration;

use argo_apiclient::{ApiClient, ApiClientFactory, ClientError, InfoService, ARGO_SERVER_ENV};
use thiserror::Error;
use tracing::{debug, warn};

use crate::env::Environment;

/// Why a check could not be completed.
#[derive(Debug, Error)]
pub enum CheckFailure {
    /// The API or info service client could not be built.
    #[error("failed to create service client: {0}")]
    CreateClient(#[source] ClientError),

    /// The version request failed.
    #[error("failed to connect to Argo Server: {0}")]
    Request(#[source] ClientError),

    /// The version request did not finish within the deadline.
    #[error("failed to connect to Argo Server: no response within {0:?}")]
    TimedOut(Duration),
}

/// Result of one compatibility check.
///
/// There is deliberately no variant that stops the pipeline.
#[derive(Debug)]
pub enum CompatibilityOutcome {
    /// No Argo Server configured.
    Skipped,
    /// The server could not be asked.
    CheckFailed(CheckFailure),
    /// Client and server report the same tag.
    Match,
    /// Client and server report different tags.
    Mismatch {
        /// Client git tag.
        client: String,
        /// Server git tag.
        server: String,
    },
}

impl CompatibilityOutcome {
    /// Warning to show for this outcome, if any.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Skipped | Self::Match => None,
            Self::CheckFailed(failure) => Some(failure.to_string()),
            Self::Mismatch { client, server } => Some(format!(
                "CLI version ({client}) does not match server version ({server}). This can lead to unexpected behavior."
            )),
        }
    }

    /// Log the warning for this outcome, if any.
    pub fn report(&self) {
        if let Some(message) = self.warning() {
            warn!("{message}");
        }
    }
}

/// Compares the local git tag with the server's.
#[derive(Debug)]
pub struct CompatibilityChecker<'a, F> {
    factory: &'a F,
    client_tag: &'a str,
    timeout: Duration,
}

impl<'a, F: ApiClientFactory> CompatibilityChecker<'a, F> {
    /// Create a checker. `timeout` bounds the version request.
    #[must_use]
    pub const fn new(factory: &'a F, client_tag: &'a str, timeout: Duration) -> Self {
        Self {
            factory,
            client_tag,
            timeout,
        }
    }

    /// Run the check without logging its outcome.
    pub async fn check(&self, env: &impl Environment) -> CompatibilityOutcome {
        if !env.is_set(ARGO_SERVER_ENV) {
            debug!("{ARGO_SERVER_ENV} not set, skipping version check");
            return CompatibilityOutcome::Skipped;
        }

        let info = match self
            .factory
            .new_client()
            .and_then(|client| client.info_service_client())
        {
            Ok(info) => info,
            Err(e) => return CompatibilityOutcome::CheckFailed(CheckFailure::CreateClient(e)),
        };

        let server = match tokio::time::timeout(self.timeout, info.get_version()).await {
            Ok(Ok(server)) => server,
            Ok(Err(e)) => return CompatibilityOutcome::CheckFailed(CheckFailure::Request(e)),
            Err(_) => return CompatibilityOutcome::CheckFailed(CheckFailure::TimedOut(self.timeout)),
        };

        debug!(client = %self.client_tag, server = %server.git_tag, "Compared versions");
        if server.git_tag == self.client_tag {
            CompatibilityOutcome::Match
        } else {
            CompatibilityOutcome::Mismatch {
                client: self.client_tag.to_string(),
                server: server.git_tag,
            }
        }
    }

    /// Run the check and log its warning, if any.
    pub async fn run(&self, env: &impl Environment) -> CompatibilityOutcome {
        let outcome = self.check(env).await;
        outcome.report();
        outcome
    }
}
