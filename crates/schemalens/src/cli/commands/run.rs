use anyhow::Result;
use clap::Args;
use serde_json::json;

use super::{CommandContext, open_source, open_store, print_envelope};
use crate::config::GeneratorSettings;
use crate::generation::{DisabledGenerator, HttpCompletionClient, TextGenerator};
use crate::models::ResponseEnvelope;
use crate::pipeline::{RunOptions, SourceSession, run_pipeline};

const COMMAND: &str = "run";

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Comma-separated table names to analyze; all tables when omitted.
    #[arg(long, value_name = "TABLES", value_delimiter = ',')]
    pub tables: Vec<String>,

    /// Skip text generation; plans are empty and fallbacks are used.
    #[arg(long, default_value_t = false)]
    pub offline: bool,
}

pub fn run(args: &RunArgs, context: &CommandContext) -> Result<()> {
    let source = open_source(context, COMMAND)?;
    let store = open_store(context, COMMAND)?;

    let http_client;
    let generator: &dyn TextGenerator = if args.offline {
        &DisabledGenerator
    } else {
        let settings = GeneratorSettings::from_process_env(context.generator.clone())
            .map_err(|error| {
                ResponseEnvelope::error(COMMAND, "llm_settings_invalid", format!("{error:#}"))
                    .into_failure()
            })?;
        http_client = HttpCompletionClient::new(settings)?;
        &http_client
    };

    let tables = args
        .tables
        .iter()
        .map(|table| table.trim().to_string())
        .filter(|table| !table.is_empty())
        .collect::<Vec<_>>();
    let options = RunOptions {
        tables: (!tables.is_empty()).then_some(tables),
    };

    let report = run_pipeline(
        SourceSession::owned(Box::new(source)),
        generator,
        &store,
        &options,
    )?;

    let mut envelope = ResponseEnvelope::ok(COMMAND, report.to_document()?)
        .with_meta("load_id", json!(report.meta.load_id))
        .with_meta("store", json!(context.paths.store.display().to_string()));
    if args.offline {
        envelope = envelope.with_warning(
            "generation_disabled",
            "text generation was skipped; plans were empty and fallbacks were used",
        );
    }
    if report.summary.tables_count == 0 {
        envelope = envelope.with_warning("no_tables", "no tables matched the active schema");
    }
    print_envelope(&envelope)
}
