use std::path::Path;

use clap::Parser;
use schemalens::cli::app::{Cli, Command};
use schemalens::cli::commands::report::ReportCommand;

#[test]
fn parses_global_runtime_flags_for_run() {
    let cli = Cli::parse_from([
        "schemalens",
        "--home-dir",
        "/home/tester",
        "--cwd",
        "/work/repo",
        "--database",
        "shop.sqlite",
        "--store",
        "/tmp/reports.sqlite",
        "--llm-model",
        "local-model",
        "run",
        "--tables",
        "ORDERS,USERS",
        "--offline",
    ]);

    assert_eq!(
        cli.runtime.home_dir.as_deref(),
        Some(Path::new("/home/tester"))
    );
    assert_eq!(
        cli.runtime.database.as_deref(),
        Some(Path::new("shop.sqlite"))
    );
    assert_eq!(
        cli.runtime.store.as_deref(),
        Some(Path::new("/tmp/reports.sqlite"))
    );
    assert_eq!(cli.runtime.llm_model.as_deref(), Some("local-model"));
    assert_eq!(cli.runtime.schema, "main");

    match cli.command {
        Command::Run(args) => {
            assert_eq!(args.tables, vec!["ORDERS", "USERS"]);
            assert!(args.offline);
        }
        other => panic!("expected run command, got {other:?}"),
    }
}

#[test]
fn global_flags_are_accepted_after_the_subcommand() {
    let cli = Cli::parse_from(["schemalens", "tables", "--schema", "analytics"]);

    assert_eq!(cli.runtime.schema, "analytics");
    assert!(matches!(cli.command, Command::Tables(_)));
}

#[test]
fn parses_report_subcommands() {
    let cli = Cli::parse_from(["schemalens", "report", "show", "run-123"]);
    match cli.command {
        Command::Report(args) => match args.command {
            ReportCommand::Show(show) => assert_eq!(show.load_id, "run-123"),
            other => panic!("expected report show, got {other:?}"),
        },
        other => panic!("expected report command, got {other:?}"),
    }

    let cli = Cli::parse_from(["schemalens", "report", "latest"]);
    assert!(matches!(
        cli.command,
        Command::Report(args) if matches!(args.command, ReportCommand::Latest)
    ));
}

#[test]
fn chat_message_is_optional_at_parse_time() {
    let cli = Cli::parse_from(["schemalens", "chat", "How many orders?"]);
    match cli.command {
        Command::Chat(args) => {
            assert_eq!(args.message.as_deref(), Some("How many orders?"));
            assert!(!args.offline);
        }
        other => panic!("expected chat command, got {other:?}"),
    }

    let cli = Cli::parse_from(["schemalens", "chat"]);
    assert!(matches!(cli.command, Command::Chat(args) if args.message.is_none()));
}

#[test]
fn rejects_unknown_subcommands() {
    assert!(Cli::try_parse_from(["schemalens", "ingest"]).is_err());
}
