//! # argo-apiclient
//!
//! Client for the Argo Server API.
//!
//! Provides:
//! - [`ClientOptions`] and [`TransportMode`] resolution
//! - The [`ApiClientFactory`], [`ApiClient`] and [`InfoService`] seams
//! - [`ArgoServerClient`], an HTTP implementation of those seams
//! - Wire types for version info and workflows
//!
//! # Transport modes
//!
//! ```text
//! ARGO_SERVER unset             -> KubernetesApi (not served by this crate)
//! ARGO_SERVER=host:port         -> Grpc  (HTTP/2)
//! ARGO_SERVER + ARGO_HTTP1=true -> Http1 (HTTP/1.1)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod options;
pub mod types;

pub use client::{
    ApiClient, ApiClientFactory, ArgoServerClient, HttpClientFactory, InfoService,
    InfoServiceClient, WorkflowAction, WorkflowServiceClient,
};
pub use error::ClientError;
pub use options::{ClientOptions, TransportMode, ARGO_SERVER_ENV, DEFAULT_NAMESPACE};
pub use types::{ObjectMeta, VersionInfo, Workflow, WorkflowStatus};
