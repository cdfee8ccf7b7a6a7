//! Vuln Policy Command - custom vulnerability scoring policies
//!
//! Policies carry a list of per-class risk scores and are applied to sets of
//! sites and applications, so they get their own renderer.

use serde_json::Value;

use crate::api_client::ApiResponse;
use crate::application::request::ActionRequest;
use crate::application::resource_client::ResourceClient;
use crate::commands::{ResourceArgs, print_json_body, send};
use crate::context::CliContext;
use crate::error::CliResult;
use crate::exit_codes;
use crate::output::{OutputFormat, cell_text};
use crate::resources::VULN_POLICY;

/// Run the vuln_policy command
pub async fn run(ctx: &CliContext, args: &ResourceArgs) -> CliResult<i32> {
    let request = args.to_request(&VULN_POLICY).await?;

    if ctx.output.is_table() {
        preview(ctx, &request);
    }

    let api = ctx.create_api_client()?;
    let client = ResourceClient::new(&api, &VULN_POLICY);
    let response = send(ctx, &client, &request).await?;

    match ctx.output.format() {
        OutputFormat::Json => print_json_body(ctx, &response)?,
        OutputFormat::Table => render(ctx, &request, &response)?,
    }

    Ok(exit_codes::SUCCESS)
}

fn preview(ctx: &CliContext, request: &ActionRequest) {
    match request {
        ActionRequest::Create { payload } => {
            ctx.output.print("Creating custom policy...");
            print_policies(ctx, std::slice::from_ref(payload), true);
        }
        ActionRequest::Update { id, payload } => {
            ctx.output
                .print(&format!("Updating custom policy {}...", id));
            print_policies(ctx, std::slice::from_ref(payload), true);
        }
        ActionRequest::Apply { id, assets } => {
            ctx.output
                .print(&format!("Applying custom policy {}...", id));
            print_assets(ctx, assets);
        }
        _ => {}
    }
}

fn render(ctx: &CliContext, request: &ActionRequest, response: &ApiResponse) -> CliResult<()> {
    match request {
        ActionRequest::List { .. } => {
            let policies = VULN_POLICY.collection.records(response.json()?);
            ctx.output.print(&VULN_POLICY.listing_heading(policies.len()));
            print_policies(ctx, &policies, false);
        }
        ActionRequest::Create { .. } => {
            let returned = returned_policy(response);
            match returned.as_ref().map(|p| cell_text(p.get("id"))) {
                Some(id) if !id.is_empty() => ctx
                    .output
                    .success(&format!("Created custom policy {}", id)),
                _ => ctx.output.success("Created custom policy"),
            }
            if let Some(policy) = returned {
                print_policies(ctx, std::slice::from_ref(&policy), false);
            }
        }
        ActionRequest::Update { id, .. } => {
            ctx.output
                .success(&format!("Updated custom policy {}", id));
            if let Some(policy) = returned_policy(response) {
                print_policies(ctx, std::slice::from_ref(&policy), false);
            }
        }
        ActionRequest::Delete { id } => {
            ctx.output
                .success(&format!("Deleted custom policy {}", id));
        }
        ActionRequest::Apply { id, .. } => {
            ctx.output
                .success(&format!("Applied custom policy {}", id));
        }
        ActionRequest::Fetch { id } => {
            let assets = response.json()?;
            ctx.output
                .print(&format!("Fetching custom policy {} apply list...", id));
            print_assets(ctx, &assets);
        }
        ActionRequest::EntryPoints { .. } => {
            unreachable!("from_args rejects entry_points for {}", VULN_POLICY.name)
        }
    }
    Ok(())
}

/// The policy echoed back by a write, if the body is one
fn returned_policy(response: &ApiResponse) -> Option<Value> {
    response.json().ok().filter(Value::is_object)
}

/// Print each policy as a block with its risk score table
fn print_policies(ctx: &CliContext, policies: &[Value], suppress_id: bool) {
    for policy in policies {
        ctx.output
            .print(&format!("Name: {}", cell_text(policy.get("name"))));
        if !suppress_id {
            ctx.output
                .print(&format!("ID: {}", cell_text(policy.get("id"))));
        }
        ctx.output.print(&format!(
            "Description: {}",
            cell_text(policy.get("description"))
        ));
        ctx.output.print("Risk Scores:");
        let scores = policy
            .get("risk_scores")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        ctx.output.records(scores, VULN_POLICY.columns);
        ctx.output.print(" ");
    }
}

fn print_assets(ctx: &CliContext, assets: &Value) {
    for line in assets_summary(assets) {
        ctx.output.print(&line);
    }
}

/// Lines describing where a policy is applied. Once either list has an
/// entry, every list present is printed, empty or not.
pub fn assets_summary(assets: &Value) -> Vec<String> {
    let sites = assets.get("sites").and_then(Value::as_array);
    let apps = assets.get("applications").and_then(Value::as_array);

    let applied = [sites, apps]
        .iter()
        .flatten()
        .any(|items| !items.is_empty());
    if !applied {
        return vec!["This policy has not been applied to any sites or applications.".to_string()];
    }

    let joined = |items: &Vec<Value>| {
        items
            .iter()
            .map(|v| cell_text(Some(v)))
            .collect::<Vec<_>>()
            .join(",")
    };

    let mut lines = Vec::new();
    if let Some(sites) = sites {
        lines.push(format!("Sites: {}", joined(sites)));
    }
    if let Some(apps) = apps {
        lines.push(format!("Apps: {}", joined(apps)));
    }
    lines
}
