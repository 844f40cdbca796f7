use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use super::{CommandContext, open_store, print_envelope};
use crate::models::ResponseEnvelope;
use crate::store::ReportStore;

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    #[command(subcommand)]
    pub command: ReportCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ReportCommand {
    /// Most recently persisted report.
    Latest,
    /// Report persisted under a run id.
    Show(ReportShowArgs),
    /// All persisted runs, newest first.
    Runs,
}

#[derive(Debug, Clone, Args)]
pub struct ReportShowArgs {
    #[arg(value_name = "LOAD_ID")]
    pub load_id: String,
}

pub fn run(args: &ReportArgs, context: &CommandContext) -> Result<()> {
    match &args.command {
        ReportCommand::Latest => run_latest(context),
        ReportCommand::Show(show_args) => run_show(show_args, context),
        ReportCommand::Runs => run_runs(context),
    }
}

fn run_latest(context: &CommandContext) -> Result<()> {
    const COMMAND: &str = "report.latest";
    let store = open_store(context, COMMAND)?;
    let Some(report) = store.latest().context("failed to read latest report")? else {
        return Err(
            ResponseEnvelope::error(COMMAND, "report_not_found", "No reports found").into_failure(),
        );
    };

    let envelope = ResponseEnvelope::ok(COMMAND, serde_json::to_value(&report)?)
        .with_meta("load_id", json!(report.load_id));
    print_envelope(&envelope)
}

fn run_show(args: &ReportShowArgs, context: &CommandContext) -> Result<()> {
    const COMMAND: &str = "report.show";
    let store = open_store(context, COMMAND)?;
    let Some(report) = store
        .by_run_id(&args.load_id)
        .with_context(|| format!("failed to read report {}", args.load_id))?
    else {
        return Err(ResponseEnvelope::error(
            COMMAND,
            "report_not_found",
            "No report found for given load_id",
        )
        .with_error_details(json!({ "load_id": args.load_id }))
        .into_failure());
    };

    let envelope = ResponseEnvelope::ok(COMMAND, serde_json::to_value(&report)?)
        .with_meta("load_id", json!(report.load_id));
    print_envelope(&envelope)
}

fn run_runs(context: &CommandContext) -> Result<()> {
    const COMMAND: &str = "report.runs";
    let store = open_store(context, COMMAND)?;
    let runs = store.list_runs().context("failed to list report runs")?;

    let envelope = ResponseEnvelope::ok(COMMAND, json!({ "runs": runs }))
        .with_meta("run_count", json!(runs.len()));
    print_envelope(&envelope)
}
