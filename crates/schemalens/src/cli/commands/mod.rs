pub mod chat;
pub mod report;
pub mod run;
pub mod schema;
pub mod tables;

use anyhow::{Context, Result};
use serde_json::json;

use crate::config::{GeneratorOverrides, RuntimePaths};
use crate::models::ResponseEnvelope;
use crate::source::SqliteSource;
use crate::store::SqliteReportStore;

/// Resolved runtime inputs shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub paths: RuntimePaths,
    pub schema: String,
    pub generator: GeneratorOverrides,
}

pub fn print_envelope(envelope: &ResponseEnvelope) -> Result<()> {
    let encoded =
        serde_json::to_string_pretty(envelope).context("failed to encode response envelope")?;
    println!("{encoded}");
    Ok(())
}

/// Opens the configured data source; a missing flag or unreadable database is
/// a boundary failure.
pub fn open_source(context: &CommandContext, command: &str) -> Result<SqliteSource> {
    let Some(database) = context.paths.database.as_deref() else {
        return Err(ResponseEnvelope::error(
            command,
            "database_required",
            "a data source is required; pass --database PATH",
        )
        .into_failure());
    };

    SqliteSource::open(database)
        .map(|source| source.with_schema(context.schema.clone()))
        .map_err(|error| {
            ResponseEnvelope::error(command, "source_unavailable", "unable to open data source")
                .with_error_details(json!({
                    "database": database.display().to_string(),
                    "cause": format!("{error:#}"),
                }))
                .into_failure()
        })
}

pub fn open_store(context: &CommandContext, command: &str) -> Result<SqliteReportStore> {
    let store_path = &context.paths.store;
    SqliteReportStore::open(store_path).map_err(|error| {
        ResponseEnvelope::error(command, "store_unavailable", "unable to open report store")
            .with_error_details(json!({
                "store": store_path.display().to_string(),
                "cause": format!("{error:#}"),
            }))
            .into_failure()
    })
}
