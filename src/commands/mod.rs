//! CLI Commands Module
//!
//! Resource commands share one argument shape, `<action> [arg1] [arg2]`.
//! Users, sites, applications and vulnerability classes render through the
//! generic `records` router; custom policies have their own renderer.

pub mod config;
pub mod records;
pub mod vuln_policy;

use clap::Args;

use crate::api_client::ApiResponse;
use crate::application::request::ActionRequest;
use crate::application::resource_client::ResourceClient;
use crate::context::CliContext;
use crate::error::CliResult;
use crate::output::ProgressIndicator;

/// Arguments shared by every resource command
#[derive(Args, Debug)]
pub struct ResourceArgs {
    /// Action to perform (see the list of actions below)
    pub action: String,

    /// First argument: an ID or a JSON file, depending on the action
    pub arg1: Option<String>,

    /// Second argument: a JSON file for update/apply
    pub arg2: Option<String>,
}

impl ResourceArgs {
    /// Validate the arguments for `resource` and read any payload file
    pub async fn to_request(
        &self,
        resource: &'static crate::resources::Resource,
    ) -> CliResult<ActionRequest> {
        ActionRequest::from_args(
            resource,
            &self.action,
            self.arg1.as_deref(),
            self.arg2.as_deref(),
        )
        .await
    }
}

/// Send the request and fail on a non-2xx status
async fn send(
    ctx: &CliContext,
    client: &ResourceClient<'_>,
    request: &ActionRequest,
) -> CliResult<ApiResponse> {
    let spinner = ctx
        .output
        .is_table()
        .then(|| ProgressIndicator::spinner("Contacting Sentinel..."));

    let result = request.send(client).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    result?.error_for_status()
}

/// JSON format: print the response body pretty-printed. An empty body
/// prints nothing.
fn print_json_body(ctx: &CliContext, response: &ApiResponse) -> CliResult<()> {
    if response.body.trim().is_empty() {
        return Ok(());
    }
    let value = response.json()?;
    ctx.output
        .json(&value)
        .map_err(|e| crate::error::CliError::ResponseParse(e.to_string()))
}
