use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ll_cli::commands::{add, analyze, export, init, logs, summary, tags};
use ll_cli::{Cli, Commands, Config};
use ll_core::RecordInput;
use ll_store::Table;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let table = Table::open(&config.data_path);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Some(Commands::Init) => init::run(&mut out, &table)?,
        Some(Commands::Add {
            date,
            activity,
            duration,
            mood,
            tags,
            notes,
        }) => {
            let input = RecordInput {
                date,
                activity,
                duration,
                mood,
                tags,
                notes,
            };
            add::run(&mut out, &table, &input)?;
        }
        Some(Commands::Logs) => logs::run(&mut out, &table)?,
        Some(Commands::Summary { json }) => summary::run(&mut out, &table, json)?,
        Some(Commands::Week { date, json }) => summary::run_week(&mut out, &table, date, json)?,
        Some(Commands::Range { start, end, json }) => {
            summary::run_range(&mut out, &table, &start, &end, json)?;
        }
        Some(Commands::Tags { top, json }) => tags::run(&mut out, &table, top, json)?,
        Some(Commands::Words { top }) => tags::run_words(&mut out, &table, top)?,
        Some(Commands::Search { query }) => tags::run_search(&mut out, &table, &query)?,
        Some(Commands::Analyze) => analyze::run(&mut out, &table)?,
        Some(Commands::Export { out: out_dir }) => {
            let out_dir = out_dir.unwrap_or_else(|| config.export_dir.clone());
            export::run(&mut out, &table, &out_dir)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    out.flush()?;
    Ok(())
}
