//! CLI error kinds
//!
//! Every failure the tool can report is one of these variants. The runner logs
//! the error and maps it to an exit code through `application::exit_policy`.

use std::path::PathBuf;

use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("must supply an API key option (-k/--apikey or {env})", env = crate::constants::ENV_API_KEY)]
    MissingApiKey,

    #[error("invalid action => {action} (valid actions for {resource}: {valid})")]
    UnknownAction {
        resource: &'static str,
        action: String,
        valid: String,
    },

    #[error("missing required {what}\n  usage: {usage}")]
    MissingArgument { what: &'static str, usage: String },

    #[error("invalid {what} => {value} (expected a non-negative integer)")]
    InvalidArgument { what: &'static str, value: String },

    #[error("reading JSON file {} => {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing JSON file {} => {source}", .path.display())]
    FileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON file {} must contain an object, found {found}", .path.display())]
    InvalidPayload { path: PathBuf, found: &'static str },

    #[error("parsing return data => {0}")]
    ResponseParse(String),

    #[error("{status} => {message}")]
    HttpStatus { status: u16, message: String },

    #[error("problem with https request => {0}")]
    Transport(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Build an `HttpStatus` error from a raw response body, preferring the
    /// server's `message` field when the body is a JSON object carrying one.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    "no data returned".to_string()
                } else {
                    body.trim().to_string()
                }
            });
        CliError::HttpStatus { status, message }
    }
}

/// Human-readable name of a JSON value's type, used in payload shape errors.
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
