use anyhow::Result;
use clap::Args;
use serde_json::json;

use super::{CommandContext, open_source, print_envelope};
use crate::inspect::list_tables;
use crate::models::ResponseEnvelope;

const COMMAND: &str = "tables";

#[derive(Debug, Clone, Args)]
pub struct TablesArgs {}

pub fn run(_args: &TablesArgs, context: &CommandContext) -> Result<()> {
    let source = open_source(context, COMMAND)?;
    let tables = list_tables(&source).map_err(|error| {
        ResponseEnvelope::error(COMMAND, "tables_unavailable", "unable to list tables")
            .with_error_details(json!({ "cause": error.to_string() }))
            .into_failure()
    })?;

    let envelope = ResponseEnvelope::ok(
        COMMAND,
        json!({
            "schema": context.schema,
            "tables": tables,
        }),
    )
    .with_meta("table_count", json!(tables.len()));
    print_envelope(&envelope)
}
