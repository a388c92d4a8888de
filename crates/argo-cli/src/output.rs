//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use argo_apiclient::{VersionInfo, Workflow};
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;
use crate::version::CLI_NAME;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write + ?Sized,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    #[cfg(test)]
    pub(crate) fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// Workflows for `list`.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct WorkflowTable {
    /// Workflows in display order.
    pub workflows: Vec<Workflow>,
}

impl TableDisplay for WorkflowTable {
    fn write_table<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.workflows.is_empty() {
            writeln!(writer, "No workflows found")?;
            return Ok(());
        }

        writeln!(
            writer,
            "{:<40}  {:<10}  {:<20}  {:<20}",
            "NAME", "STATUS", "STARTED", "FINISHED"
        )?;

        for wf in &self.workflows {
            writeln!(
                writer,
                "{:<40}  {:<10}  {:<20}  {:<20}",
                truncate(&wf.metadata.name, 40),
                or_dash(Some(wf.phase())),
                or_dash(wf.status.started_at.as_deref()),
                or_dash(wf.status.finished_at.as_deref()),
            )?;
        }
        Ok(())
    }
}

/// One workflow for `get`.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct WorkflowDetail {
    /// The workflow.
    pub workflow: Workflow,
}

impl TableDisplay for WorkflowDetail {
    fn write_table<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), CliError> {
        let wf = &self.workflow;
        writeln!(writer, "{:<14}{}", "Name:", wf.metadata.name)?;
        if let Some(ns) = &wf.metadata.namespace {
            writeln!(writer, "{:<14}{ns}", "Namespace:")?;
        }
        writeln!(writer, "{:<14}{}", "Status:", or_dash(Some(wf.phase())))?;

        let optional = [
            ("Message:", wf.status.message.as_deref()),
            ("Created:", wf.metadata.creation_timestamp.as_deref()),
            ("Started:", wf.status.started_at.as_deref()),
            ("Finished:", wf.status.finished_at.as_deref()),
            ("Progress:", wf.status.progress.as_deref()),
        ];
        for (label, value) in optional {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                writeln!(writer, "{label:<14}{value}")?;
            }
        }
        Ok(())
    }
}

/// Client and, when configured, server build information.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionReport {
    /// This binary.
    pub client_version: VersionInfo,
    /// The Argo Server, if one was queried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_version: Option<VersionInfo>,
    /// Print only the version lines.
    #[serde(skip)]
    pub short: bool,
}

impl VersionReport {
    fn write_one<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        name: &str,
        info: &VersionInfo,
    ) -> Result<(), CliError> {
        writeln!(writer, "{name}: {}", info.version)?;
        if self.short {
            return Ok(());
        }
        writeln!(writer, "  BuildDate: {}", info.build_date)?;
        writeln!(writer, "  GitCommit: {}", info.git_commit)?;
        writeln!(writer, "  GitTreeState: {}", info.git_tree_state)?;
        if !info.git_tag.is_empty() {
            writeln!(writer, "  GitTag: {}", info.git_tag)?;
        }
        if !info.go_version.is_empty() {
            writeln!(writer, "  GoVersion: {}", info.go_version)?;
        }
        writeln!(writer, "  Compiler: {}", info.compiler)?;
        writeln!(writer, "  Platform: {}", info.platform)?;
        Ok(())
    }
}

impl TableDisplay for VersionReport {
    fn write_table<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), CliError> {
        self.write_one(writer, CLI_NAME, &self.client_version)?;
        if let Some(server) = &self.server_version {
            self.write_one(writer, &format!("{CLI_NAME}-server"), server)?;
        }
        Ok(())
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

/// Truncate a string to a maximum length.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use argo_apiclient::{ObjectMeta, WorkflowStatus};

    use super::*;

    fn workflow(name: &str, phase: Option<&str>) -> Workflow {
        Workflow {
            metadata: ObjectMeta {
                name: name.into(),
                namespace: Some("argo".into()),
                creation_timestamp: Some("2024-01-22T14:00:00Z".into()),
            },
            status: WorkflowStatus {
                phase: phase.map(Into::into),
                started_at: Some("2024-01-22T14:00:01Z".into()),
                ..WorkflowStatus::default()
            },
        }
    }

    #[test]
    fn empty_workflow_table() {
        let table = WorkflowTable { workflows: vec![] };
        let out = OutputFormat::default().to_string(&table).unwrap();
        assert_eq!(out, "No workflows found\n");
    }

    #[test]
    fn workflow_table_rows() {
        let table = WorkflowTable {
            workflows: vec![workflow("hello-abc", Some("Running")), workflow("pending-x", None)],
        };
        let out = OutputFormat::default().to_string(&table).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("NAME"));
        assert!(lines[1].contains("hello-abc") && lines[1].contains("Running"));
        assert!(lines[2].contains("pending-x") && lines[2].contains(" - "));
    }

    #[test]
    fn workflow_table_json_is_an_array() {
        let table = WorkflowTable {
            workflows: vec![workflow("hello-abc", Some("Succeeded"))],
        };
        let out = OutputFormat::new(Format::Json).to_string(&table).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["metadata"]["name"], "hello-abc");
        assert_eq!(value[0]["status"]["phase"], "Succeeded");
    }

    #[test]
    fn workflow_detail_skips_missing_fields() {
        let detail = WorkflowDetail {
            workflow: workflow("hello-abc", Some("Running")),
        };
        let out = OutputFormat::default().to_string(&detail).unwrap();
        assert!(out.contains("Name:         hello-abc"));
        assert!(out.contains("Namespace:    argo"));
        assert!(out.contains("Started:"));
        assert!(!out.contains("Finished:"));
        assert!(!out.contains("Message:"));
    }

    #[test]
    fn version_report_short_and_full() {
        let info = VersionInfo {
            version: "v3.4.0".into(),
            git_tag: "v3.4.0".into(),
            platform: "linux/amd64".into(),
            ..VersionInfo::default()
        };
        let mut report = VersionReport {
            client_version: info.clone(),
            server_version: Some(info),
            short: true,
        };

        let short = OutputFormat::default().to_string(&report).unwrap();
        assert_eq!(short, "argo: v3.4.0\nargo-server: v3.4.0\n");

        report.short = false;
        let full = OutputFormat::default().to_string(&report).unwrap();
        assert!(full.contains("  GitTag: v3.4.0"));
        assert!(full.contains("  Platform: linux/amd64"));
    }

    #[test]
    fn version_report_json_omits_missing_server() {
        let report = VersionReport {
            client_version: VersionInfo::default(),
            server_version: None,
            short: false,
        };
        let out = OutputFormat::new(Format::Json).to_string(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value.get("clientVersion").is_some());
        assert!(value.get("serverVersion").is_none());
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-workflow-name", 10), "a-very-...");
    }
}
