#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use clap::error::ErrorKind;
use schemalens::cli::app::{Cli, Command, RuntimeArgs};
use schemalens::cli::commands::{self, CommandContext};
use schemalens::config::{GeneratorOverrides, PathOverrides, RuntimePaths};
use schemalens::models::EnvelopeCommandFailure;
use tracing_subscriber::EnvFilter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_BOUNDARY_FAILURE: i32 = 2;
const EXIT_USAGE_ERROR: i32 = 64;

const DEFAULT_LOG_FILTER: &str = "schemalens=info";

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return exit_code_for_parse_error(error),
    };
    init_tracing();

    let command_name = command_name(&cli.command);
    tracing::debug!(command = command_name, "starting");

    match execute(cli) {
        Ok(()) => {
            tracing::debug!(command = command_name, exit_code = EXIT_SUCCESS, "completed");
            EXIT_SUCCESS
        }
        Err(error) => {
            let exit_code = classify_runtime_error(&error);
            if let Some(failure) = error.downcast_ref::<EnvelopeCommandFailure>() {
                if let Err(print_error) = commands::print_envelope(failure.envelope()) {
                    eprintln!("schemalens: {print_error:#}");
                }
                eprintln!("schemalens: {failure}");
            } else {
                eprintln!("schemalens: failed `{command_name}` (exit_code={exit_code})");
                eprintln!("{error:#}");
            }
            exit_code
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Schema(args) => commands::schema::run(&args),
        Command::Run(args) => commands::run::run(&args, &command_context(&cli.runtime)?),
        Command::Tables(args) => commands::tables::run(&args, &command_context(&cli.runtime)?),
        Command::Report(args) => commands::report::run(&args, &command_context(&cli.runtime)?),
        Command::Chat(args) => commands::chat::run(&args, &command_context(&cli.runtime)?),
    }
}

fn classify_runtime_error(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<EnvelopeCommandFailure>().is_some() {
        EXIT_BOUNDARY_FAILURE
    } else {
        EXIT_RUNTIME_FAILURE
    }
}

fn exit_code_for_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            EXIT_SUCCESS
        }
        _ => {
            let _ = error.print();
            EXIT_USAGE_ERROR
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Run(_) => "run",
        Command::Tables(_) => "tables",
        Command::Report(_) => "report",
        Command::Chat(_) => "chat",
        Command::Schema(_) => "schema",
    }
}

fn command_context(args: &RuntimeArgs) -> Result<CommandContext> {
    Ok(CommandContext {
        paths: resolve_runtime_paths(args)?,
        schema: args.schema.clone(),
        generator: GeneratorOverrides {
            base_url: args.llm_base_url.clone(),
            model: args.llm_model.clone(),
            timeout_secs: args.llm_timeout_secs,
        },
    })
}

fn resolve_runtime_paths(args: &RuntimeArgs) -> Result<RuntimePaths> {
    let home_dir = match &args.home_dir {
        Some(path) => path.clone(),
        None => std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("HOME is not set; pass --home-dir"))?,
    };

    let cwd = match &args.cwd {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    schemalens::config::resolve_runtime_paths(
        &home_dir,
        &cwd,
        PathOverrides {
            out_dir: args.out_dir.as_deref(),
            database: args.database.as_deref(),
            store: args.store.as_deref(),
        },
    )
}
