//! MCP server implementation using rmcp over stdio transport.
//!
//! Provides 12 tester-agent tools that an MCP client can invoke to scaffold
//! tests, run the build, read coverage, repair failing code, drive git, and
//! run the whole loop unattended.

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, ListToolsResult, PaginatedRequestParams,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{tool, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};
use serde::Deserialize;

use crate::fix::{ChatCompletionSuggester, FixSuggester};
use crate::project::Project;

use super::{tools_core, tools_git};

// ---------------------------------------------------------------------------
// Server struct
// ---------------------------------------------------------------------------

/// Tester-agent MCP server.
///
/// Cloned once per session; the project and the fix backend are shared.
#[derive(Clone)]
pub struct TesterAgentServer {
    project: Arc<Project>,
    suggester: Arc<dyn FixSuggester>,
}

impl std::fmt::Debug for TesterAgentServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TesterAgentServer")
            .field("project_root", &self.project.root)
            .field("config", &self.project.config)
            .finish()
    }
}

impl TesterAgentServer {
    /// Server for `project`, fixing bugs through `suggester`.
    pub fn new(project: Project, suggester: Arc<dyn FixSuggester>) -> Self {
        Self {
            project: Arc::new(project),
            suggester,
        }
    }

    /// Server using the chat-completions backend from the project's model config.
    pub fn from_project(project: Project) -> crate::error::Result<Self> {
        let suggester = ChatCompletionSuggester::from_config(&project.config.model)?;
        Ok(Self::new(project, Arc::new(suggester)))
    }

    pub fn project(&self) -> &Project {
        &self.project
    }
}

// ---------------------------------------------------------------------------
// Tool parameter structs (rmcp 0.14 uses Parameters<T> instead of #[tool(param)])
// ---------------------------------------------------------------------------

#[derive(Deserialize, schemars::JsonSchema)]
pub(crate) struct AddParams {
    #[schemars(description = "First addend")]
    pub a: i64,
    #[schemars(description = "Second addend")]
    pub b: i64,
}

#[derive(Deserialize, schemars::JsonSchema)]
pub(crate) struct GenerateTestsParams {
    #[schemars(description = "Java source file, absolute or relative to the project root")]
    pub java_file_path: String,
}

#[derive(Deserialize, schemars::JsonSchema)]
pub(crate) struct CoverageParams {
    #[schemars(
        description = "JaCoCo XML report, absolute or relative to the project root (e.g. 'target/site/jacoco/jacoco.xml')"
    )]
    pub xml_path: String,
}

#[derive(Deserialize, schemars::JsonSchema)]
pub(crate) struct CommitParams {
    #[schemars(description = "Commit message; a coverage footer is appended")]
    pub message: String,
}

#[derive(Deserialize, schemars::JsonSchema)]
pub(crate) struct PushParams {
    #[schemars(description = "Remote to push to (default from config, usually 'origin')")]
    pub remote: Option<String>,
}

#[derive(Deserialize, schemars::JsonSchema)]
pub(crate) struct PullRequestParams {
    #[schemars(description = "Pull request title")]
    pub title: String,
    #[schemars(description = "Pull request body (default empty)")]
    pub body: Option<String>,
    #[schemars(description = "Base branch (default from config, usually 'main')")]
    pub base: Option<String>,
}

#[derive(Deserialize, schemars::JsonSchema)]
pub(crate) struct FixBugParams {
    #[schemars(description = "Source file to repair, absolute or relative to the project root")]
    pub file_path: String,
    #[schemars(description = "Name of the failing test (e.g. 'CalculatorTest.testAdd')")]
    pub failing_test: String,
}

#[derive(Deserialize, schemars::JsonSchema)]
pub(crate) struct CycleParams {
    #[schemars(description = "Maximum iterations to run (default from config, usually 3)")]
    pub iterations: Option<usize>,
}

// ---------------------------------------------------------------------------
// Tool implementations
// ---------------------------------------------------------------------------

#[tool_router]
impl TesterAgentServer {
    // 1. add
    #[tool(name = "add", description = "Add two integers and return the sum.")]
    async fn add(&self, Parameters(p): Parameters<AddParams>) -> String {
        tools_core::handle_add(p.a, p.b)
    }

    // 2. generate_tests
    #[tool(
        name = "generate_tests",
        description = "Write a JUnit test class with one empty @Test stub per public method of a Java source file. The file is written next to the source as <Name>Test.java, replacing any existing one."
    )]
    async fn generate_tests(&self, Parameters(p): Parameters<GenerateTestsParams>) -> String {
        tools_core::handle_generate_tests(&self.project, &p.java_file_path)
    }

    // 3. run_tests
    #[tool(
        name = "run_tests",
        description = "Run the configured build command (default 'mvn test') in the project root and return its standard output, whether or not tests pass."
    )]
    async fn run_tests(&self) -> String {
        let project = Arc::clone(&self.project);
        tokio::task::spawn_blocking(move || tools_core::handle_run_tests(&project))
            .await
            .unwrap_or_else(|e| format!("Error running tests: {e}"))
    }

    // 4. coverage_analysis
    #[tool(
        name = "coverage_analysis",
        description = "List methods with missed instructions in a JaCoCo XML report, one per line, or 'All covered'."
    )]
    async fn coverage_analysis(&self, Parameters(p): Parameters<CoverageParams>) -> String {
        tools_core::handle_coverage_analysis(&self.project, &p.xml_path)
    }

    // 5. git_status
    #[tool(
        name = "git_status",
        description = "Short working tree status and whether merge conflicts exist. Returns 'Clean' when there is nothing to report."
    )]
    async fn git_status(&self) -> String {
        tools_git::handle_git_status(&self.project)
    }

    // 6. git_add_all
    #[tool(
        name = "git_add_all",
        description = "Stage every changed or untracked file except build output and IDE folders (target/, bin/, build/, .idea/, .vscode/ by default)."
    )]
    async fn git_add_all(&self) -> String {
        tools_git::handle_git_add_all(&self.project)
    }

    // 7. git_commit
    #[tool(
        name = "git_commit",
        description = "Commit staged changes. The current instruction coverage from the JaCoCo report is appended to the message."
    )]
    async fn git_commit(&self, Parameters(p): Parameters<CommitParams>) -> String {
        tools_git::handle_git_commit(&self.project, &p.message)
    }

    // 8. git_push
    #[tool(
        name = "git_push",
        description = "Push the current branch to a remote and set it as upstream."
    )]
    async fn git_push(&self, Parameters(p): Parameters<PushParams>) -> String {
        tools_git::handle_git_push(&self.project, p.remote.as_deref())
    }

    // 9. git_pull_request
    #[tool(
        name = "git_pull_request",
        description = "Open a pull request from the current branch with the GitHub CLI. Returns the pull request URL."
    )]
    async fn git_pull_request(&self, Parameters(p): Parameters<PullRequestParams>) -> String {
        tools_git::handle_git_pull_request(
            &self.project,
            &p.title,
            p.body.as_deref(),
            p.base.as_deref(),
        )
    }

    // 10. update_metrics
    #[tool(
        name = "update_metrics",
        description = "Count Java source files, record the count in metrics.txt, then commit and push it."
    )]
    async fn update_metrics(&self) -> String {
        tools_git::handle_update_metrics(&self.project)
    }

    // 11. fix_bug
    #[tool(
        name = "fix_bug",
        description = "Ask the configured language model for a corrected version of a source file so that a failing test passes, and replace the file with the answer."
    )]
    async fn fix_bug(&self, Parameters(p): Parameters<FixBugParams>) -> String {
        tools_core::handle_fix_bug(
            &self.project,
            &p.file_path,
            &p.failing_test,
            self.suggester.as_ref(),
        )
        .await
    }

    // 12. automated_cycle
    #[tool(
        name = "automated_cycle",
        description = "Repeat build, coverage analysis, bug fixing, test scaffolding and commit/push for a number of iterations, stopping early once every method is covered. Returns the step log."
    )]
    async fn automated_cycle(&self, Parameters(p): Parameters<CycleParams>) -> String {
        tools_core::handle_automated_cycle(&self.project, self.suggester.as_ref(), p.iterations)
            .await
    }
}

// ---------------------------------------------------------------------------
// ServerHandler
// ---------------------------------------------------------------------------

impl ServerHandler for TesterAgentServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Tester agent for Maven/JaCoCo Java projects. Use run_tests and \
                 coverage_analysis to inspect the project, generate_tests and fix_bug to \
                 change it, and the git_* tools to publish. automated_cycle runs the whole \
                 loop."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: rmcp::model::Implementation {
                name: "tester-agent".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let enabled = super::registry::enabled_tool_names(&self.project.config);
        let tools = Self::tool_router()
            .list_all()
            .into_iter()
            .filter(|t| enabled.contains(t.name.as_ref()))
            .collect();

        std::future::ready(Ok(ListToolsResult {
            meta: None,
            next_cursor: None,
            tools,
        }))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let enabled = super::registry::enabled_tool_names(&self.project.config);
        if !enabled.contains(request.name.as_ref()) {
            return Ok(CallToolResult::error(vec![rmcp::model::Content::text(
                super::registry::disabled_message(&self.project.config, &request.name),
            )]));
        }

        let tool_context =
            rmcp::handler::server::tool::ToolCallContext::new(self, request, context);
        Self::tool_router().call(tool_context).await
    }
}

// ---------------------------------------------------------------------------
// Public entry point: run the MCP server over stdio
// ---------------------------------------------------------------------------

/// Start the MCP server on stdin/stdout.
///
/// This blocks until the client disconnects.
pub async fn run_server(project: Project) -> Result<(), Box<dyn std::error::Error>> {
    let server = TesterAgentServer::from_project(project)?;
    tracing::info!("Serving MCP over stdio for {}", server.project.root.display());
    let transport = rmcp::transport::io::stdio();
    let running = server.serve(transport).await.inspect_err(|e| {
        tracing::error!("MCP server error: {}", e);
    })?;
    let _ = running.waiting().await;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
