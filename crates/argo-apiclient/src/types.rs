//! Wire types exchanged with the Argo Server.
//!
//! Field names follow the server's JSON (camelCase). Every field the CLI does
//! not strictly need is optional so that newer servers keep deserializing.

use serde::{Deserialize, Serialize};

/// Build information reported by a client or a server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VersionInfo {
    /// Semantic version.
    pub version: String,
    /// Build timestamp.
    pub build_date: String,
    /// Commit the binary was built from.
    pub git_commit: String,
    /// Tag the binary was built from. This is the compatibility identifier.
    pub git_tag: String,
    /// `clean` or `dirty`.
    pub git_tree_state: String,
    /// Toolchain version of the server build.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub go_version: String,
    /// Compiler used for the build.
    pub compiler: String,
    /// `os/arch`.
    pub platform: String,
}

/// Kubernetes object metadata, trimmed to what the CLI shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    /// Object name.
    pub name: String,
    /// Object namespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Creation time (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
}

/// Observed state of a workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowStatus {
    /// `Pending`, `Running`, `Succeeded`, `Failed` or `Error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// Start time (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// Finish time (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    /// Progress as `done/total`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    /// Human-readable status message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A workflow as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workflow {
    /// Object metadata.
    pub metadata: ObjectMeta,
    /// Observed status.
    pub status: WorkflowStatus,
}

impl Workflow {
    /// Phase, or an empty string for workflows that have not started.
    #[must_use]
    pub fn phase(&self) -> &str {
        self.status.phase.as_deref().unwrap_or_default()
    }
}

/// Response of the list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkflowList {
    /// Workflows. The server sends `null` for an empty list.
    pub items: Option<Vec<Workflow>>,
}

/// Body of the per-workflow action endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowActionRequest {
    /// Workflow name.
    pub name: String,
    /// Workflow namespace.
    pub namespace: String,
}

/// Error body produced by the server's HTTP gateway.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}
