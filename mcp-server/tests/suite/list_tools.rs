use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

use super::connect;
use super::write_stub;

/// Verify the server advertises exactly one tool with the expected schema.
#[tokio::test(flavor = "current_thread")]
async fn list_tools_exposes_exactly_ask_gemini() -> Result<()> {
    let stub_dir = TempDir::new()?;
    let stub = write_stub(stub_dir.path(), "echo unused");
    let service = connect(&stub).await?;

    let tools = service.list_tools(Default::default()).await?.tools;
    assert_eq!(tools.len(), 1, "expected a single tool: {tools:?}");

    let tool = &tools[0];
    assert_eq!(tool.name.as_ref(), "ask-gemini");
    assert!(
        tool.description
            .as_deref()
            .is_some_and(|d| d.contains("Gemini CLI"))
    );

    let schema = serde_json::to_value(tool.input_schema.as_ref())?;
    assert_eq!(schema["required"], json!(["prompt"]));
    assert!(schema["properties"].get("prompt").is_some());
    assert!(schema["properties"].get("approvalMode").is_some());

    Ok(())
}
