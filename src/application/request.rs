//! Action requests
//!
//! Turns the raw `<action> [arg1] [arg2]` words of a resource command into a
//! validated request: IDs parsed, payload files read and parsed. Nothing here
//! touches the network; `ActionRequest::send` hands the request to a
//! `ResourceClient`.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::api_client::ApiResponse;
use crate::application::resource_client::ResourceClient;
use crate::error::{CliError, CliResult, json_kind};
use crate::resources::{Action, Resource};

/// A validated action, ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRequest {
    List { id: Option<u64> },
    Create { payload: Value },
    Update { id: u64, payload: Value },
    Delete { id: u64 },
    Apply { id: u64, assets: Value },
    Fetch { id: u64 },
    EntryPoints { id: u64 },
}

impl ActionRequest {
    /// Validate the command words for `resource`.
    ///
    /// Validation order: action keyword, required ID, file path, file
    /// contents.
    pub async fn from_args(
        resource: &'static Resource,
        action: &str,
        arg1: Option<&str>,
        arg2: Option<&str>,
    ) -> CliResult<Self> {
        let action = match action.parse::<Action>() {
            Ok(a) if resource.supports(a) => a,
            _ => {
                return Err(CliError::UnknownAction {
                    resource: resource.name,
                    action: action.to_string(),
                    valid: resource.valid_actions(),
                });
            }
        };

        let usage = |args: &str| format!("whscmd {} {} {}", resource.name, action, args);
        let id_arg = || format!("<{}>", resource.id_name.replace(' ', "_").to_lowercase());

        let request = match action {
            Action::List if resource.requires_scope_id() => ActionRequest::List {
                id: Some(parse_id(arg1, resource.id_name, &usage(&id_arg()))?),
            },
            Action::List => ActionRequest::List {
                id: parse_optional_id(arg1, resource.id_name)?,
            },
            Action::Create => {
                let file = require_file(arg1, &usage("<json_file>"))?;
                ActionRequest::Create {
                    payload: load_json_object(file).await?,
                }
            }
            Action::Update => {
                let usage = usage(&format!("{} <json_file>", id_arg()));
                let id = parse_id(arg1, resource.id_name, &usage)?;
                let file = require_file(arg2, &usage)?;
                ActionRequest::Update {
                    id,
                    payload: load_json_object(file).await?,
                }
            }
            Action::Delete => ActionRequest::Delete {
                id: parse_id(arg1, resource.id_name, &usage(&id_arg()))?,
            },
            Action::Apply => {
                let usage = usage(&format!("{} <json_file>", id_arg()));
                let id = parse_id(arg1, resource.id_name, &usage)?;
                let file = require_file(arg2, &usage)?;
                ActionRequest::Apply {
                    id,
                    assets: load_json_object(file).await?,
                }
            }
            Action::Fetch => ActionRequest::Fetch {
                id: parse_id(arg1, resource.id_name, &usage(&id_arg()))?,
            },
            Action::EntryPoints => ActionRequest::EntryPoints {
                id: parse_id(arg1, resource.id_name, &usage(&id_arg()))?,
            },
        };

        Ok(request)
    }

    /// Issue the request through `client`
    pub async fn send(&self, client: &ResourceClient<'_>) -> CliResult<ApiResponse> {
        match self {
            ActionRequest::List { id } => client.list(*id).await,
            ActionRequest::Create { payload } => client.create(payload).await,
            ActionRequest::Update { id, payload } => client.update(*id, payload).await,
            ActionRequest::Delete { id } => client.delete(*id).await,
            ActionRequest::Apply { id, assets } => client.apply(*id, assets).await,
            ActionRequest::Fetch { id } => client.fetch(*id).await,
            ActionRequest::EntryPoints { id } => client.entry_points(*id).await,
        }
    }
}

/// Parse a required non-negative integer ID
pub fn parse_id(raw: Option<&str>, what: &'static str, usage: &str) -> CliResult<u64> {
    match raw {
        None => Err(CliError::MissingArgument {
            what,
            usage: usage.to_string(),
        }),
        Some(raw) => raw.trim().parse::<u64>().map_err(|_| CliError::InvalidArgument {
            what,
            value: raw.to_string(),
        }),
    }
}

/// Parse an optional ID; absent means "the whole collection"
pub fn parse_optional_id(raw: Option<&str>, what: &'static str) -> CliResult<Option<u64>> {
    raw.map(|r| parse_id(Some(r), what, "")).transpose()
}

fn require_file<'a>(raw: Option<&'a str>, usage: &str) -> CliResult<&'a Path> {
    raw.filter(|r| !r.trim().is_empty())
        .map(Path::new)
        .ok_or_else(|| CliError::MissingArgument {
            what: "path to JSON file",
            usage: usage.to_string(),
        })
}

/// Read `path` fully and parse it as a JSON object
pub async fn load_json_object(path: &Path) -> CliResult<Value> {
    info!("JSON file => {}", path.display());

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::FileRead {
            path: PathBuf::from(path),
            source,
        })?;

    let value: Value = serde_json::from_str(&content).map_err(|source| CliError::FileParse {
        path: PathBuf::from(path),
        source,
    })?;

    if !value.is_object() {
        return Err(CliError::InvalidPayload {
            path: PathBuf::from(path),
            found: json_kind(&value),
        });
    }

    Ok(value)
}
