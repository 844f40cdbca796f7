use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands::{
    chat::ChatArgs, report::ReportArgs, run::RunArgs, schema::SchemaArgs, tables::TablesArgs,
};

#[derive(Debug, Parser)]
#[command(
    name = "schemalens",
    version,
    about = "LLM-assisted relational schema analytics reports"
)]
pub struct Cli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct RuntimeArgs {
    #[arg(long, global = true, value_name = "PATH")]
    pub home_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub cwd: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub out_dir: Option<PathBuf>,

    /// SQLite database to analyze.
    #[arg(long, global = true, value_name = "PATH")]
    pub database: Option<PathBuf>,

    #[arg(long, global = true, value_name = "NAME", default_value = "main")]
    pub schema: String,

    /// Report store; defaults to `<out-dir>/reports.sqlite`.
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    #[arg(long, global = true, value_name = "URL")]
    pub llm_base_url: Option<String>,

    #[arg(long, global = true, value_name = "MODEL")]
    pub llm_model: Option<String>,

    #[arg(long, global = true, value_name = "SECONDS")]
    pub llm_timeout_secs: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the analysis pipeline and persist the report.
    Run(RunArgs),
    /// List tables in the active schema.
    Tables(TablesArgs),
    /// Retrieve persisted reports.
    Report(ReportArgs),
    /// Ask a question about the latest report.
    Chat(ChatArgs),
    /// Print the report JSON schema.
    Schema(SchemaArgs),
}
