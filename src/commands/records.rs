//! Records Command - users, sites, applications, vulnerability classes
//!
//! Routes the action keyword through the generic resource client and prints
//! the selected fields of each returned record as a table.

use serde_json::Value;

use crate::api_client::ApiResponse;
use crate::application::request::ActionRequest;
use crate::application::resource_client::ResourceClient;
use crate::commands::{ResourceArgs, print_json_body, send};
use crate::context::CliContext;
use crate::error::CliResult;
use crate::exit_codes;
use crate::output::OutputFormat;
use crate::resources::{ENTRY_POINT_COLLECTION, ENTRY_POINT_COLUMNS, Resource};

/// Run a resource command
pub async fn run(
    ctx: &CliContext,
    resource: &'static Resource,
    args: &ResourceArgs,
) -> CliResult<i32> {
    let request = args.to_request(resource).await?;

    if ctx.output.is_table() {
        preview(ctx, resource, &request);
    }

    let api = ctx.create_api_client()?;
    let client = ResourceClient::new(&api, resource);
    let response = send(ctx, &client, &request).await?;

    match ctx.output.format() {
        OutputFormat::Json => print_json_body(ctx, &response)?,
        OutputFormat::Table => render(ctx, resource, &request, &response)?,
    }

    Ok(exit_codes::SUCCESS)
}

/// Show what is about to be submitted
fn preview(ctx: &CliContext, resource: &Resource, request: &ActionRequest) {
    match request {
        ActionRequest::Create { payload } => {
            ctx.output.print(&format!("Creating {}...", resource.singular));
            ctx.output
                .records(std::slice::from_ref(payload), payload_columns(resource));
        }
        ActionRequest::Update { id, payload } => {
            ctx.output
                .print(&format!("Updating {} {}...", resource.singular, id));
            ctx.output
                .records(std::slice::from_ref(payload), payload_columns(resource));
        }
        _ => {}
    }
}

/// Columns to preview for a payload; the ID is assigned by the server.
fn payload_columns(resource: &Resource) -> &'static [crate::resources::Column] {
    match resource.columns.split_first() {
        Some((first, rest)) if first.field == "id" => rest,
        _ => resource.columns,
    }
}

/// Default formatter for table output
pub fn render(
    ctx: &CliContext,
    resource: &Resource,
    request: &ActionRequest,
    response: &ApiResponse,
) -> CliResult<()> {
    match request {
        ActionRequest::List { .. } => {
            let records = resource.collection.records(response.json()?);
            ctx.output.print(&resource.listing_heading(records.len()));
            ctx.output.records(&records, resource.columns);
        }
        ActionRequest::EntryPoints { id } => {
            let records = ENTRY_POINT_COLLECTION.records(response.json()?);
            ctx.output.print(&format!(
                "Listing entry points for {} {}...",
                resource.singular, id
            ));
            ctx.output.records(&records, ENTRY_POINT_COLUMNS);
        }
        ActionRequest::Create { .. } => {
            ctx.output.success(&format!(
                "Created {} (status {})",
                resource.singular, response.status
            ));
            print_returned_record(ctx, resource, response);
        }
        ActionRequest::Update { id, .. } => {
            ctx.output.success(&format!(
                "Updated {} {} (status {})",
                resource.singular, id, response.status
            ));
            print_returned_record(ctx, resource, response);
        }
        ActionRequest::Delete { id } => {
            ctx.output.success(&format!(
                "Deleted {} {} (status {})",
                resource.singular, id, response.status
            ));
        }
        ActionRequest::Apply { .. } | ActionRequest::Fetch { .. } => {
            unreachable!("from_args rejects apply/fetch for {}", resource.name)
        }
    }
    Ok(())
}

/// Write responses usually echo the record; print it when they do.
fn print_returned_record(ctx: &CliContext, resource: &Resource, response: &ApiResponse) {
    if let Ok(record @ Value::Object(_)) = response.json() {
        ctx.output
            .records(std::slice::from_ref(&record), resource.columns);
    }
}
