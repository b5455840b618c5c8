use std::borrow::Cow;

use anyhow::Result;
use pretty_assertions::assert_eq;
use rmcp::model::CallToolRequestParam;
use rmcp::model::CallToolResult;
use rmcp::model::object;
use serde_json::json;
use tempfile::TempDir;

use super::connect;
use super::write_stub;

#[tokio::test(flavor = "current_thread")]
async fn ask_gemini_returns_stub_output() -> Result<()> {
    let stub_dir = TempDir::new()?;
    let stub = write_stub(stub_dir.path(), r#"echo "stub answer""#);
    let service = connect(&stub).await?;

    let CallToolResult {
        content, is_error, ..
    } = service
        .call_tool(CallToolRequestParam {
            name: Cow::Borrowed("ask-gemini"),
            arguments: Some(object(json!({ "prompt": "hello" }))),
            meta: None,
            task: None,
        })
        .await?;

    assert_eq!(is_error, Some(false));
    let text = content
        .first()
        .expect("expected non-empty content")
        .as_text()
        .expect("expected text content");
    assert_eq!(text.text, "stub answer");

    Ok(())
}

/// The prompt must reach the child verbatim as the argv token after `-p`,
/// shell metacharacters included.
#[tokio::test(flavor = "current_thread")]
async fn ask_gemini_passes_the_prompt_as_argv() -> Result<()> {
    let stub_dir = TempDir::new()?;
    let stub = write_stub(stub_dir.path(), r#"printf '%s' "$2""#);
    let service = connect(&stub).await?;

    let prompt = r#"quote " dollar $HOME backtick ` backslash \"#;
    let CallToolResult {
        content, is_error, ..
    } = service
        .call_tool(CallToolRequestParam {
            name: Cow::Borrowed("ask-gemini"),
            arguments: Some(object(json!({ "prompt": prompt }))),
            meta: None,
            task: None,
        })
        .await?;

    assert_eq!(is_error, Some(false));
    let text = content
        .first()
        .expect("expected non-empty content")
        .as_text()
        .expect("expected text content");
    assert_eq!(text.text, prompt);

    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn ask_gemini_failure_carries_the_install_hint() -> Result<()> {
    let stub_dir = TempDir::new()?;
    let stub = write_stub(
        stub_dir.path(),
        "echo 'sh: gemini: command not found' >&2\nexit 127",
    );
    let service = connect(&stub).await?;

    let CallToolResult {
        content, is_error, ..
    } = service
        .call_tool(CallToolRequestParam {
            name: Cow::Borrowed("ask-gemini"),
            arguments: Some(object(json!({ "prompt": "hello" }))),
            meta: None,
            task: None,
        })
        .await?;

    assert_eq!(is_error, Some(true));
    let text = content
        .first()
        .expect("expected non-empty content")
        .as_text()
        .expect("expected text content");
    assert!(text.text.contains("command not found"), "{}", text.text);
    assert!(
        text.text.contains("npm install -g @google/gemini-cli"),
        "{}",
        text.text
    );

    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_tool_names_are_rejected() -> Result<()> {
    let stub_dir = TempDir::new()?;
    let stub = write_stub(stub_dir.path(), "echo should-never-run");
    let service = connect(&stub).await?;

    let result = service
        .call_tool(CallToolRequestParam {
            name: Cow::Borrowed("ask-claude"),
            arguments: Some(object(json!({ "prompt": "hello" }))),
            meta: None,
            task: None,
        })
        .await;

    assert!(result.is_err(), "only ask-gemini is served");

    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn blank_prompt_is_rejected_as_a_protocol_error() -> Result<()> {
    let stub_dir = TempDir::new()?;
    let stub = write_stub(stub_dir.path(), "echo should-never-run");
    let service = connect(&stub).await?;

    let result = service
        .call_tool(CallToolRequestParam {
            name: Cow::Borrowed("ask-gemini"),
            arguments: Some(object(json!({ "prompt": "   " }))),
            meta: None,
            task: None,
        })
        .await;

    assert!(result.is_err(), "blank prompt must not reach the CLI");

    Ok(())
}
