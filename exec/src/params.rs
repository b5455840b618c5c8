//! Tool parameters for the `ask-gemini` call and their validation.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::Deserialize;

/// Upper bound on `includeDirectories`; the gemini CLI accepts at most this
/// many extra context roots per invocation.
pub const MAX_INCLUDE_DIRECTORIES: usize = 5;

/// Model identifiers the gemini CLI accepts. A closed set so that an
/// out-of-domain value is rejected while deserializing the request, before
/// any command is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub enum GeminiModel {
    #[default]
    #[serde(rename = "gemini-2.5-pro")]
    Pro,
    #[serde(rename = "gemini-2.5-flash")]
    Flash,
    #[serde(rename = "gemini-2.5-flash-lite")]
    FlashLite,
}

impl GeminiModel {
    pub fn as_str(self) -> &'static str {
        match self {
            GeminiModel::Pro => "gemini-2.5-pro",
            GeminiModel::Flash => "gemini-2.5-flash",
            GeminiModel::FlashLite => "gemini-2.5-flash-lite",
        }
    }
}

/// How the gemini CLI should treat side-effecting actions while running
/// headless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalMode {
    Default,
    AutoEdit,
    #[default]
    Yolo,
}

impl ApprovalMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalMode::Default => "default",
            ApprovalMode::AutoEdit => "auto_edit",
            ApprovalMode::Yolo => "yolo",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

/// Arguments of the `ask-gemini` tool as they arrive over the wire. The doc
/// comments double as property descriptions in the generated input schema.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AskGeminiParams {
    /// The instruction for the Gemini CLI to execute.
    pub prompt: String,
    /// Model to query. Defaults to gemini-2.5-pro.
    pub model: Option<GeminiModel>,
    /// How side-effecting actions are approved. Defaults to yolo.
    pub approval_mode: Option<ApprovalMode>,
    /// Output format requested from the CLI. Defaults to text.
    pub output_format: Option<OutputFormat>,
    /// Run the CLI inside its sandbox. Defaults to false.
    pub sandbox: Option<bool>,
    /// Working directory for the invocation. Defaults to the server's
    /// current directory.
    pub working_directory: Option<PathBuf>,
    /// Additional directories the CLI may read, at most 5.
    pub include_directories: Option<Vec<PathBuf>>,
    /// Enable the CLI's debug output. Defaults to false.
    pub debug: Option<bool>,
}

/// A validated request with defaults applied. Only produced by
/// [`AskGeminiParams::validate`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiRequest {
    pub prompt: String,
    pub model: GeminiModel,
    pub approval_mode: ApprovalMode,
    pub output_format: OutputFormat,
    pub sandbox: bool,
    pub working_directory: Option<PathBuf>,
    pub include_directories: Vec<PathBuf>,
    pub debug: bool,
}

/// Caller contract violations, rejected before any process is spawned.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("the `prompt` argument must be a non-empty string")]
    MissingPrompt,
    #[error(
        "`includeDirectories` has {0} entries; at most {MAX_INCLUDE_DIRECTORIES} are allowed"
    )]
    TooManyDirectories(usize),
}

impl AskGeminiParams {
    /// Check structural and cardinality constraints and resolve defaults.
    /// Pure; enum domains were already enforced during deserialization.
    pub fn validate(self) -> Result<GeminiRequest, ValidationError> {
        if self.prompt.trim().is_empty() {
            return Err(ValidationError::MissingPrompt);
        }
        let include_directories = self.include_directories.unwrap_or_default();
        if include_directories.len() > MAX_INCLUDE_DIRECTORIES {
            return Err(ValidationError::TooManyDirectories(
                include_directories.len(),
            ));
        }
        Ok(GeminiRequest {
            prompt: self.prompt,
            model: self.model.unwrap_or_default(),
            approval_mode: self.approval_mode.unwrap_or_default(),
            output_format: self.output_format.unwrap_or_default(),
            sandbox: self.sandbox.unwrap_or(false),
            working_directory: self.working_directory,
            include_directories,
            debug: self.debug.unwrap_or(false),
        })
    }
}
