//! MCP server exposing the `ask-gemini` tool over stdio.

mod server;

pub use server::GEMINI_BIN_ENV_VAR;
pub use server::GeminiServer;

use anyhow::Result;
use rmcp::ServiceExt;
use rmcp::transport::stdio;

/// Serve MCP over stdio until the client disconnects.
pub async fn run_main() -> Result<()> {
    let service = GeminiServer::new().serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
