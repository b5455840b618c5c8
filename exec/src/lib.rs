//! Core pipeline for invoking the Gemini CLI: parameter validation, command
//! construction, and headless child-process execution.

pub mod command;
pub mod exec;
pub mod params;

pub use command::DEFAULT_GEMINI_BIN;
pub use command::GeminiCommand;
pub use command::escape_double_quoted;
pub use exec::ExecLimits;
pub use exec::ExecutionResult;
pub use exec::run;
pub use params::ApprovalMode;
pub use params::AskGeminiParams;
pub use params::GeminiModel;
pub use params::GeminiRequest;
pub use params::OutputFormat;
pub use params::ValidationError;
