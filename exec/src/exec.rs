//! Headless execution of a built gemini invocation.
//!
//! Every failure mode here (spawn error, non-zero exit, timeout, output
//! overflow) resolves to a structured [`ExecutionResult::Failure`]; nothing
//! in this module propagates an error to the caller or can take the server
//! down with it.

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::trace;

use crate::command::GeminiCommand;

/// Hard wall-clock limit for a single gemini invocation. Once elapsed the
/// child is killed; there is no partial-result salvage.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Cap on captured bytes per stream. Exceeding it fails the request rather
/// than silently truncating.
pub const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Substituted for an empty string when gemini exits cleanly without
/// producing output, so callers can tell "ran, produced nothing" from a
/// malformed empty response.
pub const NO_OUTPUT_PLACEHOLDER: &str = "(gemini returned no output)";

pub const INSTALL_HINT: &str = "Gemini CLI not found. Install it with \
    `npm install -g @google/gemini-cli` and make sure `gemini` is on your PATH.";

pub const AUTH_HINT: &str = "Gemini CLI is not authenticated. Run `gemini` \
    once to complete the login flow, or set GEMINI_API_KEY.";

const MISSING_BINARY_INDICATORS: &[&str] = &[
    "command not found",
    "no such file or directory",
    "enoent",
    "is not recognized",
];

const AUTH_INDICATORS: &[&str] = &[
    "please set an auth method",
    "not authenticated",
    "authentication failed",
    "api key",
];

/// Resource limits for one invocation. Production callers use the defaults;
/// tests tighten them to exercise the timeout and overflow paths quickly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecLimits {
    pub timeout: Duration,
    pub max_output_bytes: usize,
}

impl Default for ExecLimits {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_output_bytes: MAX_OUTPUT_BYTES,
        }
    }
}

/// Outcome of one gemini invocation, constructed once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    Success { text: String },
    Failure { message: String, hint: Option<String> },
}

/// Run `command` as a child process and classify the outcome.
///
/// stdin is never connected, so the CLI cannot fall back to interactive
/// prompts. The working directory is handed to the spawn unvalidated; a
/// nonexistent path surfaces as a spawn failure from the OS.
pub async fn run(
    command: &GeminiCommand,
    cwd: Option<&Path>,
    limits: ExecLimits,
) -> ExecutionResult {
    trace!(
        "spawning {} {:?} in {cwd:?}",
        command.program, command.args
    );

    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => return spawn_failure(&command.program, &err),
    };

    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let cap = limits.max_output_bytes;

    let waited = tokio::time::timeout(limits.timeout, async {
        let (stdout, stderr) = tokio::join!(
            read_capped(stdout_pipe, cap),
            read_capped(stderr_pipe, cap)
        );
        let status = child.wait().await;
        (status, stdout, stderr)
    })
    .await;

    let (status, stdout, stderr) = match waited {
        Ok(outcome) => outcome,
        Err(_) => {
            let _ = child.start_kill();
            let _ = child.wait().await;
            return ExecutionResult::Failure {
                message: format!(
                    "gemini timed out after {} seconds",
                    limits.timeout.as_secs()
                ),
                hint: None,
            };
        }
    };

    let status = match status {
        Ok(status) => status,
        Err(err) => {
            return ExecutionResult::Failure {
                message: format!("failed waiting for gemini: {err}"),
                hint: None,
            };
        }
    };
    let (stdout, stderr) = match (stdout, stderr) {
        (Ok(stdout), Ok(stderr)) => (stdout, stderr),
        (Err(err), _) | (_, Err(err)) => {
            return ExecutionResult::Failure {
                message: format!("failed reading gemini output: {err}"),
                hint: None,
            };
        }
    };

    if stdout.total > cap || stderr.total > cap {
        return ExecutionResult::Failure {
            message: format!("gemini produced more than {cap} bytes of output"),
            hint: None,
        };
    }

    if status.success() {
        let text = String::from_utf8_lossy(&stdout.bytes).trim().to_string();
        if text.is_empty() {
            return ExecutionResult::Success {
                text: NO_OUTPUT_PLACEHOLDER.to_string(),
            };
        }
        return ExecutionResult::Success { text };
    }

    let diagnostic = String::from_utf8_lossy(&stderr.bytes).trim().to_string();
    let message = if diagnostic.is_empty() {
        format!("gemini exited with {status}")
    } else {
        diagnostic
    };
    let hint = classify(&message);
    ExecutionResult::Failure { message, hint }
}

fn spawn_failure(program: &str, err: &io::Error) -> ExecutionResult {
    let message = format!("failed to launch `{program}`: {err}");
    let hint = if err.kind() == io::ErrorKind::NotFound {
        Some(INSTALL_HINT.to_string())
    } else {
        classify(&message)
    };
    ExecutionResult::Failure { message, hint }
}

/// Best-effort enrichment keyed off the gemini CLI's unversioned error
/// wording; absence of a hint is an acceptable outcome.
fn classify(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    if MISSING_BINARY_INDICATORS
        .iter()
        .any(|needle| lower.contains(needle))
    {
        return Some(INSTALL_HINT.to_string());
    }
    if AUTH_INDICATORS.iter().any(|needle| lower.contains(needle)) {
        return Some(AUTH_HINT.to_string());
    }
    None
}

#[derive(Default)]
struct Captured {
    bytes: Vec<u8>,
    total: usize,
}

/// Drain `reader` to EOF, retaining at most `cap` bytes. Draining past the
/// cap keeps the child from blocking on a full pipe while the caller can
/// still detect the overflow from `total`.
async fn read_capped<R>(reader: Option<R>, cap: usize) -> io::Result<Captured>
where
    R: AsyncRead + Unpin,
{
    let mut captured = Captured::default();
    let Some(mut reader) = reader else {
        return Ok(captured);
    };
    let mut chunk = [0u8; 8192];
    loop {
        let read = reader.read(&mut chunk).await?;
        if read == 0 {
            return Ok(captured);
        }
        captured.total += read;
        if captured.bytes.len() < cap {
            let keep = read.min(cap - captured.bytes.len());
            captured.bytes.extend_from_slice(&chunk[..keep]);
        }
    }
}
