//! `doms` command-line entry point.
//!
//! Parses arguments, sets up tracing (stderr, so stdout carries only report
//! lines) and dispatches to the handlers in `commands/`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{certainize::CertainizeArgs, count::CountArgs};

#[derive(Parser)]
#[command(name = "doms")]
#[command(about = "DOMS repository certainizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit datastream completeness and reconcile against a required-files list
    Certainize(CertainizeArgs),

    /// Run an iTQL query and report how many rows it returns
    Count(CountArgs),

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> site -> run overrides)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Silent if the file does not exist.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Certainize(args) => commands::certainize::run(args).await?,
        Commands::Count(args) => commands::count::run(args).await?,
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = doms_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
