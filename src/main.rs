//! sheetql - SQL-style queries and edits over a workbook of sheets.

mod cli;
mod commands;
mod config;

use clap::Parser;
use cli::Cli;
use commands::Session;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (config, warnings) = if cli.no_config {
        (config::Config::default(), Vec::new())
    } else {
        config::load_config(cli.config.as_deref())
    };
    for warning in warnings {
        tracing::warn!("{}", warning);
    }

    tracing::debug!(?config, "configuration loaded");
    let session = Session {
        workbook: cli.workbook.or(config.workbook),
        default_sheet: config.default_sheet,
        missing_column: cli
            .missing_column
            .map(Into::into)
            .unwrap_or(config.missing_column),
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = commands::run(cli.command, &session, &mut stdout) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
