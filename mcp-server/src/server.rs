use gemini_mcp_exec::AskGeminiParams;
use gemini_mcp_exec::DEFAULT_GEMINI_BIN;
use gemini_mcp_exec::ExecLimits;
use gemini_mcp_exec::ExecutionResult;
use gemini_mcp_exec::GeminiCommand;
use rmcp::ErrorData as McpError;
use rmcp::ServerHandler;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use rmcp::model::Content;
use rmcp::model::Implementation;
use rmcp::model::ProtocolVersion;
use rmcp::model::ServerCapabilities;
use rmcp::model::ServerInfo;
use rmcp::tool;
use rmcp::tool_handler;
use rmcp::tool_router;

/// Overrides which binary is invoked in place of `gemini`; the integration
/// tests point this at a stub script.
pub const GEMINI_BIN_ENV_VAR: &str = "GEMINI_MCP_GEMINI_BIN";

fn gemini_binary() -> String {
    std::env::var(GEMINI_BIN_ENV_VAR).unwrap_or_else(|_| DEFAULT_GEMINI_BIN.to_string())
}

#[derive(Clone)]
pub struct GeminiServer {
    tool_router: ToolRouter<GeminiServer>,
    gemini_bin: String,
}

impl Default for GeminiServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl GeminiServer {
    pub fn new() -> Self {
        Self::with_binary(gemini_binary())
    }

    pub fn with_binary(gemini_bin: String) -> Self {
        Self {
            tool_router: Self::tool_router(),
            gemini_bin,
        }
    }

    /// Execute a prompt with the Gemini CLI in headless mode and return its
    /// output. The CLI must be installed and authenticated on this machine.
    #[tool(name = "ask-gemini")]
    async fn ask_gemini(
        &self,
        Parameters(params): Parameters<AskGeminiParams>,
    ) -> Result<CallToolResult, McpError> {
        // Validation failures are caller contract violations and surface as
        // protocol-level errors; execution failures below stay tool-level.
        let request = params
            .validate()
            .map_err(|err| McpError::invalid_params(err.to_string(), None))?;
        let command = GeminiCommand::new(&self.gemini_bin, &request);
        tracing::debug!("running {}", command.shell_string());
        let outcome = gemini_mcp_exec::run(
            &command,
            request.working_directory.as_deref(),
            ExecLimits::default(),
        )
        .await;
        Ok(into_call_tool_result(outcome))
    }
}

fn into_call_tool_result(outcome: ExecutionResult) -> CallToolResult {
    match outcome {
        ExecutionResult::Success { text } => CallToolResult::success(vec![Content::text(text)]),
        ExecutionResult::Failure { message, hint } => {
            let text = match hint {
                Some(hint) => format!("{message}\n\n{hint}"),
                None => message,
            };
            CallToolResult {
                content: vec![Content::text(text)],
                structured_content: None,
                is_error: Some(true),
                meta: None,
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for GeminiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "This server provides a tool that forwards a prompt to the Gemini CLI \
                 and returns its output."
                    .to_string(),
            ),
        }
    }
}
