//! Argo Server API client.
//!
//! The traits in this module are the seams the CLI depends on:
//!
//! - [`ApiClientFactory`] builds an [`ApiClient`] from resolved options
//! - [`ApiClient`] hands out per-service clients
//! - [`InfoService`] answers version queries
//!
//! [`HttpClientFactory`] and [`ArgoServerClient`] are the production
//! implementations. They talk to the server's HTTP API over HTTP/2 (gRPC mode)
//! or HTTP/1.1 (`ARGO_HTTP1`).
//!
//! # Example
//!
//! ```rust,no_run
//! use argo_apiclient::{ApiClient, ApiClientFactory, ClientOptions, HttpClientFactory, InfoService};
//!
//! # async fn example() -> Result<(), argo_apiclient::ClientError> {
//! let factory = HttpClientFactory::new(ClientOptions::for_server("localhost:2746"));
//! let client = factory.new_client()?;
//! let version = client.info_service_client()?.get_version().await?;
//! println!("server: {}", version.git_tag);
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::error::{ClientError, Result};
use crate::options::{ClientOptions, TransportMode};
use crate::types::{ApiErrorBody, VersionInfo, Workflow, WorkflowActionRequest, WorkflowList};

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("argo-cli/", env!("CARGO_PKG_VERSION"));

/// Builds API clients.
pub trait ApiClientFactory: Send + Sync {
    /// Client type produced by this factory.
    type Client: ApiClient;

    /// Build a client. Called at most once per check.
    ///
    /// # Errors
    ///
    /// Returns an error if the options cannot produce a working client.
    fn new_client(&self) -> Result<Self::Client>;
}

impl<T: ApiClientFactory + ?Sized> ApiClientFactory for &T {
    type Client = T::Client;

    fn new_client(&self) -> Result<Self::Client> {
        (**self).new_client()
    }
}

/// A connected API client.
pub trait ApiClient: Send + Sync {
    /// Info service client type.
    type Info: InfoService;

    /// Client for the info service.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport does not offer the info service.
    fn info_service_client(&self) -> Result<Self::Info>;
}

/// The server's info service.
pub trait InfoService: Send + Sync {
    /// Fetch the server's build information.
    ///
    /// # Errors
    ///
    /// Returns an error on network, auth, timeout or protocol failure.
    fn get_version(&self) -> impl Future<Output = Result<VersionInfo>> + Send;
}

/// Production factory building [`ArgoServerClient`]s.
#[derive(Debug, Clone)]
pub struct HttpClientFactory {
    options: ClientOptions,
}

impl HttpClientFactory {
    /// Create a factory for the given options.
    #[must_use]
    pub const fn new(options: ClientOptions) -> Self {
        Self { options }
    }
}

impl ApiClientFactory for HttpClientFactory {
    type Client = ArgoServerClient;

    fn new_client(&self) -> Result<ArgoServerClient> {
        ArgoServerClient::new(&self.options)
    }
}

/// HTTP client bound to one Argo Server.
#[derive(Clone)]
pub struct ArgoServerClient {
    http: Client,
    base_url: String,
    mode: TransportMode,
}

impl std::fmt::Debug for ArgoServerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgoServerClient")
            .field("base_url", &self.base_url)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl ArgoServerClient {
    /// Build a client from resolved options.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No Argo Server is configured (Kubernetes API mode)
    /// - The server address or a header is malformed
    /// - The TLS backend cannot be initialised
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let mode = options.transport_mode();
        if mode == TransportMode::KubernetesApi {
            return Err(ClientError::Unsupported(
                "Kubernetes API mode is not available in this client; set ARGO_SERVER".into(),
            ));
        }
        let base_url = options.base_url()?;

        let mut builder = Client::builder()
            .default_headers(default_headers(options)?)
            .timeout(options.request_timeout)
            .danger_accept_invalid_certs(options.insecure_skip_verify);

        builder = match mode {
            TransportMode::Http1 => builder.http1_only(),
            // Plain-text HTTP/2 needs prior knowledge; over TLS ALPN negotiates it.
            TransportMode::Grpc if !options.secure => builder.http2_prior_knowledge(),
            _ => builder,
        };

        let http = builder.build()?;
        debug!(url = %base_url, %mode, "Created API client");

        Ok(Self {
            http,
            base_url,
            mode,
        })
    }

    /// Root URL of the server API.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Transport mode in use.
    #[must_use]
    pub const fn mode(&self) -> TransportMode {
        self.mode
    }

    /// Client for the workflow service.
    #[must_use]
    pub fn workflow_service_client(&self) -> WorkflowServiceClient {
        WorkflowServiceClient {
            client: self.clone(),
        }
    }

    /// URL of an API resource. Each segment is percent-encoded on its own, so
    /// `/`, `?` and `#` inside a name cannot change the addressed resource.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(ClientError::Config(format!("invalid resource name {bad:?}")));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Config(format!("invalid server URL {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::Config(format!("server URL {} cannot have a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and deserialize a successful JSON response.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(ClientError::from)
    }

    /// Send a request, mapping non-success statuses to [`ClientError::Server`].
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        trace!(status = status.as_u16(), url = %response.url(), "Received response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .map(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or(body);

        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

impl ApiClient for ArgoServerClient {
    type Info = InfoServiceClient;

    fn info_service_client(&self) -> Result<InfoServiceClient> {
        Ok(InfoServiceClient {
            client: self.clone(),
        })
    }
}

/// Info service over the server's HTTP API.
#[derive(Debug, Clone)]
pub struct InfoServiceClient {
    client: ArgoServerClient,
}

impl InfoService for InfoServiceClient {
    async fn get_version(&self) -> Result<VersionInfo> {
        let url = self.client.endpoint(&["api", "v1", "version"])?;
        trace!(url = %url, "Fetching server version");
        self.client.send_json(self.client.http.get(url)).await
    }
}

/// Workflow lifecycle actions exposed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    /// Re-create a workflow from its spec.
    Resubmit,
    /// Resume a suspended workflow.
    Resume,
    /// Retry failed steps.
    Retry,
    /// Suspend a running workflow.
    Suspend,
    /// Stop, running exit handlers.
    Stop,
    /// Terminate immediately, skipping exit handlers.
    Terminate,
}

impl WorkflowAction {
    /// All actions, in CLI registration order.
    pub const ALL: [Self; 6] = [
        Self::Resubmit,
        Self::Resume,
        Self::Retry,
        Self::Suspend,
        Self::Stop,
        Self::Terminate,
    ];

    /// Path segment and command name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resubmit => "resubmit",
            Self::Resume => "resume",
            Self::Retry => "retry",
            Self::Suspend => "suspend",
            Self::Stop => "stop",
            Self::Terminate => "terminate",
        }
    }
}

/// Workflow service over the server's HTTP API.
#[derive(Debug, Clone)]
pub struct WorkflowServiceClient {
    client: ArgoServerClient,
}

impl WorkflowServiceClient {
    /// List workflows in a namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_workflows(&self, namespace: &str) -> Result<Vec<Workflow>> {
        let url = self.client.endpoint(&["api", "v1", "workflows", namespace])?;
        let list: WorkflowList = self.client.send_json(self.client.http.get(url)).await?;
        Ok(list.items.unwrap_or_default())
    }

    /// Get one workflow.
    ///
    /// # Errors
    ///
    /// Returns an error if the workflow is not found or the request fails.
    pub async fn get_workflow(&self, namespace: &str, name: &str) -> Result<Workflow> {
        let url = self.client.endpoint(&["api", "v1", "workflows", namespace, name])?;
        self.client.send_json(self.client.http.get(url)).await
    }

    /// Delete one workflow.
    ///
    /// # Errors
    ///
    /// Returns an error if the workflow is not found or the request fails.
    pub async fn delete_workflow(&self, namespace: &str, name: &str) -> Result<()> {
        let url = self.client.endpoint(&["api", "v1", "workflows", namespace, name])?;
        self.client.send(self.client.http.delete(url)).await?;
        Ok(())
    }

    /// Apply a lifecycle action and return the updated workflow.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the action or the request fails.
    pub async fn apply_action(
        &self,
        namespace: &str,
        name: &str,
        action: WorkflowAction,
    ) -> Result<Workflow> {
        let url = self.client.endpoint(&[
            "api",
            "v1",
            "workflows",
            namespace,
            name,
            action.as_str(),
        ])?;
        let body = WorkflowActionRequest {
            name: name.to_string(),
            namespace: namespace.to_string(),
        };
        self.client
            .send_json(self.client.http.put(url).json(&body))
            .await
    }
}

fn default_headers(options: &ClientOptions) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

    if let Some(token) = options.token.as_deref().filter(|t| !t.is_empty()) {
        let mut value = HeaderValue::from_str(token)
            .map_err(|_| ClientError::Config("ARGO_TOKEN is not a valid header value".into()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    for (name, value) in &options.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ClientError::Config(format!("invalid header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ClientError::Config(format!("invalid header value for {name}: {e}")))?;
        headers.append(name, value);
    }

    Ok(headers)
}
