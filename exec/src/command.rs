//! Renders a validated request into a gemini CLI invocation.
//!
//! The child is spawned from the argv directly, so no shell ever interprets
//! the prompt. The escape-based sanitizer still guards the rendered form of
//! the command, which is what gets logged: free-form user text (the prompt
//! and include directories) appears double-quote-wrapped with shell
//! metacharacters escaped, and nothing user-controlled reaches the rendered
//! string unsanitized.

use crate::params::GeminiRequest;
use crate::params::OutputFormat;

/// Binary invoked when no override is configured.
pub const DEFAULT_GEMINI_BIN: &str = "gemini";

/// One invocation of the gemini CLI: the program and argv handed to the
/// process spawn, plus a shell-style rendering for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiCommand {
    pub program: String,
    pub args: Vec<String>,
    pub(crate) shell: String,
}

/// Escape `text` for inclusion inside a double-quoted shell token.
///
/// Backslash must be escaped first; the later substitutions introduce
/// backslashes that would otherwise be escaped a second time. Reordering or
/// dropping any step reopens the quoted-string breakout this guards against.
pub fn escape_double_quoted(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
        .replace('`', "\\`")
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", escape_double_quoted(text))
}

impl GeminiCommand {
    /// Build the invocation for `request`.
    ///
    /// Flag order is fixed: prompt, model, approval mode, then the optional
    /// output-format/sandbox/include-directories/debug flags. The gemini
    /// CLI's parser is order-tolerant for most flags, but a deterministic
    /// rendering keeps invocations reproducible and diffable in logs.
    pub fn new(program: &str, request: &GeminiRequest) -> Self {
        let mut args: Vec<String> = Vec::new();
        let mut shell = String::from(program);

        args.push("-p".to_string());
        args.push(request.prompt.clone());
        shell.push_str(" -p ");
        shell.push_str(&quoted(&request.prompt));

        // A default model always applies, so the flag is always emitted.
        // Enum identifiers cannot contain shell metacharacters and are
        // rendered bare.
        args.push("-m".to_string());
        args.push(request.model.as_str().to_string());
        shell.push_str(" -m ");
        shell.push_str(request.model.as_str());

        args.push("--approval-mode".to_string());
        args.push(request.approval_mode.as_str().to_string());
        shell.push_str(" --approval-mode ");
        shell.push_str(request.approval_mode.as_str());

        if request.output_format != OutputFormat::Text {
            args.push("--output-format".to_string());
            args.push(request.output_format.as_str().to_string());
            shell.push_str(" --output-format ");
            shell.push_str(request.output_format.as_str());
        }

        if request.sandbox {
            args.push("-s".to_string());
            shell.push_str(" -s");
        }

        if !request.include_directories.is_empty() {
            // Comma-joined with no spaces; commas are untouched by the
            // sanitizer, so escaping the joined value is the same as joining
            // escaped paths.
            let joined = request
                .include_directories
                .iter()
                .map(|dir| dir.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(",");
            args.push("--include-directories".to_string());
            args.push(joined.clone());
            shell.push_str(" --include-directories ");
            shell.push_str(&quoted(&joined));
        }

        if request.debug {
            args.push("-d".to_string());
            shell.push_str(" -d");
        }

        Self {
            program: program.to_string(),
            args,
            shell,
        }
    }

    /// Shell-style rendering of the invocation; every user-controlled token
    /// has been through [`escape_double_quoted`].
    pub fn shell_string(&self) -> &str {
        &self.shell
    }
}
