//! Client options and transport-mode resolution.
//!
//! The CLI resolves flags and environment variables into a [`ClientOptions`]
//! value once per invocation. Everything downstream reads from it; nothing
//! consults the environment again.

use std::fmt;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Environment variable naming the Argo Server (`host:port`).
pub const ARGO_SERVER_ENV: &str = "ARGO_SERVER";

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How requests reach the workflow controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Directly against the Kubernetes API. No Argo Server involved.
    KubernetesApi,
    /// Argo Server over HTTP/2.
    Grpc,
    /// Argo Server over HTTP/1.1, for load-balancers without HTTP/2.
    Http1,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KubernetesApi => write!(f, "kubernetes-api"),
            Self::Grpc => write!(f, "grpc"),
            Self::Http1 => write!(f, "http1"),
        }
    }
}

/// Resolved API client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Argo Server address as `host:port`, without a scheme.
    pub argo_server: Option<String>,
    /// Use TLS towards the server.
    pub secure: bool,
    /// Skip TLS certificate verification.
    pub insecure_skip_verify: bool,
    /// Force HTTP/1.1.
    pub http1: bool,
    /// Path prefix when the server sits behind an ingress.
    pub base_href: Option<String>,
    /// Authorization header value, e.g. `Bearer ...`.
    pub token: Option<String>,
    /// Namespace for namespaced requests.
    pub namespace: String,
    /// Extra request headers as `(name, value)` pairs.
    pub headers: Vec<(String, String)>,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

// Custom Debug to avoid exposing the token
impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("argo_server", &self.argo_server)
            .field("secure", &self.secure)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("http1", &self.http1)
            .field("base_href", &self.base_href)
            .field("has_token", &self.token.is_some())
            .field("namespace", &self.namespace)
            .field("headers", &self.headers.len())
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            argo_server: None,
            secure: false,
            insecure_skip_verify: false,
            http1: false,
            base_href: None,
            token: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            headers: Vec::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientOptions {
    /// Options pointing at the given server with everything else defaulted.
    #[must_use]
    pub fn for_server(server: impl Into<String>) -> Self {
        Self {
            argo_server: Some(server.into()),
            ..Self::default()
        }
    }

    /// Pick the transport mode implied by these options.
    #[must_use]
    pub fn transport_mode(&self) -> TransportMode {
        match (&self.argo_server, self.http1) {
            (None, _) => TransportMode::KubernetesApi,
            (Some(_), true) => TransportMode::Http1,
            (Some(_), false) => TransportMode::Grpc,
        }
    }

    /// Root URL of the server API, e.g. `https://localhost:2746/argo`.
    ///
    /// # Errors
    ///
    /// Returns an error if no server is configured or the address carries a
    /// scheme.
    pub fn base_url(&self) -> Result<String> {
        let server = self.argo_server.as_deref().ok_or_else(|| {
            ClientError::Unsupported(format!(
                "no Argo Server configured; set {ARGO_SERVER_ENV} to use the server API"
            ))
        })?;

        if server.contains("://") {
            return Err(ClientError::Config(format!(
                "invalid Argo Server address: {server}, the format is \"host:port\" without http or https"
            )));
        }
        if server.trim().is_empty() {
            return Err(ClientError::Config("Argo Server address is empty".into()));
        }

        let scheme = if self.secure { "https" } else { "http" };
        let prefix = normalize_base_href(self.base_href.as_deref());
        Ok(format!("{scheme}://{}{prefix}", server.trim_end_matches('/')))
    }
}

/// Parse a `Name: value` header argument.
///
/// # Errors
///
/// Returns an error if the argument has no colon or an empty name.
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| ClientError::Config(format!("invalid header {raw:?}, expected \"Name: value\"")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ClientError::Config(format!("invalid header {raw:?}, empty name")));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// `None`, `""` and `"/"` become `""`; anything else gets one leading slash
/// and no trailing slash.
fn normalize_base_href(base_href: Option<&str>) -> String {
    let trimmed = base_href.unwrap_or_default().trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
