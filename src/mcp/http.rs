//! HTTP transport for the MCP server using rmcp's StreamableHttpService.
//!
//! Lets remote MCP clients drive the agent over HTTP instead of stdio.
//!
//! Usage: `tester-agent serve --http 0.0.0.0:8080`

use crate::project::Project;

use super::server::TesterAgentServer;

/// Start the MCP server over HTTP on the given address.
///
/// The server exposes a single `/mcp` endpoint that handles the MCP
/// streamable HTTP protocol (POST for requests, SSE for server-initiated
/// messages). Each client gets its own session.
pub async fn run_http_server(project: Project, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    use rmcp::transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpService,
    };

    let server = TesterAgentServer::from_project(project)?;

    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("tester-agent MCP server listening on http://{}/mcp", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down HTTP server");
        })
        .await?;

    Ok(())
}
