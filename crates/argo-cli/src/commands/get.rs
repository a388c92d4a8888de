//! Get command implementation.

use std::io::Write;

use clap::{ArgMatches, Args, Command};

use super::parse_args;
use crate::cli::Format;
use crate::output::{OutputFormat, WorkflowDetail};
use crate::registry::{CliCommand, CommandContext, CommandFuture};

/// Arguments for the get command.
#[derive(Args, Debug, Clone)]
pub struct GetArgs {
    /// Workflow to show.
    #[arg(value_name = "WORKFLOW")]
    pub workflow: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub output: Format,
}

/// Shows one workflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetCommand;

impl CliCommand for GetCommand {
    fn name(&self) -> &'static str {
        "get"
    }

    fn about(&self) -> &'static str {
        "display details about a workflow"
    }

    fn args(&self, command: Command) -> Command {
        GetArgs::augment_args(command)
    }

    fn run<'a>(
        &'a self,
        ctx: &'a CommandContext,
        matches: &'a ArgMatches,
        out: &'a mut (dyn Write + Send),
    ) -> CommandFuture<'a> {
        Box::pin(async move {
            let args: GetArgs = parse_args(matches)?;
            let workflow = ctx
                .server_client()?
                .workflow_service_client()
                .get_workflow(ctx.namespace(), &args.workflow)
                .await?;
            OutputFormat::new(args.output).write(out, &WorkflowDetail { workflow })
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::commands::test_support::{context_for, sub_matches};

    async fn mock_workflow(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/v1/workflows/argo/hello-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "metadata": {"name": "hello-abc", "namespace": "argo"},
                "status": {"phase": "Failed", "message": "child failed"}
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn prints_workflow_summary() {
        let server = MockServer::start().await;
        mock_workflow(&server).await;

        let ctx = context_for(&server);
        let matches = sub_matches(&ctx, &["argo", "get", "hello-abc"]);
        let mut out = Vec::new();
        GetCommand.run(&ctx, &matches, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("hello-abc"));
        assert!(text.contains("Failed"));
        assert!(text.contains("child failed"));
    }

    #[tokio::test]
    async fn prints_json() {
        let server = MockServer::start().await;
        mock_workflow(&server).await;

        let ctx = context_for(&server);
        let matches = sub_matches(&ctx, &["argo", "get", "hello-abc", "-o", "json"]);
        let mut out = Vec::new();
        GetCommand.run(&ctx, &matches, &mut out).await.unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["status"]["phase"], "Failed");
    }
}
