// The suite drives the real server binary over stdio with the gemini CLI
// replaced by shell stubs, so it only runs on unix.
#![cfg(unix)]

use std::path::Path;
use std::path::PathBuf;
use std::process::Stdio;

use gemini_mcp_server::GEMINI_BIN_ENV_VAR;
use rmcp::RoleClient;
use rmcp::ServiceExt;
use rmcp::service::RunningService;
use rmcp::transport::ConfigureCommandExt;
use rmcp::transport::TokioChildProcess;
use tokio::process::Command;

mod ask_gemini;
mod list_tools;

/// Write an executable stub the server will invoke in place of `gemini`.
pub fn write_stub(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("gemini-stub");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write stub");
    let mut perms = std::fs::metadata(&path)
        .expect("stub metadata")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("make stub executable");
    path
}

/// Launch the server binary and connect an MCP client to it.
pub async fn connect(gemini_bin: &Path) -> anyhow::Result<RunningService<RoleClient, ()>> {
    let transport = TokioChildProcess::new(
        Command::new(env!("CARGO_BIN_EXE_gemini-mcp-server")).configure(|cmd| {
            cmd.env(GEMINI_BIN_ENV_VAR, gemini_bin);

            // Important: pipe stdio so rmcp can speak JSON-RPC over stdin/stdout
            cmd.stdin(Stdio::piped());
            cmd.stdout(Stdio::piped());

            // Optional but very helpful while debugging:
            cmd.stderr(Stdio::inherit());
        }),
    )?;

    Ok(().serve(transport).await?)
}
