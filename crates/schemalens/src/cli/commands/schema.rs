use anyhow::Result;
use clap::Args;
use serde_json::json;

use super::print_envelope;
use crate::models::report::REPORT_SCHEMA_VERSION;
use crate::models::{ResponseEnvelope, json_schema};

#[derive(Debug, Clone, Args)]
pub struct SchemaArgs {}

pub fn run(_args: &SchemaArgs) -> Result<()> {
    let envelope = ResponseEnvelope::ok("schema", json_schema())
        .with_meta("report_schema_version", json!(REPORT_SCHEMA_VERSION));
    print_envelope(&envelope)
}
