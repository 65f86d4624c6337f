//! `doms count`: run an iTQL query and report how many rows came back.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use doms_config::ConfigMode;

use super::{build_source, load_config, SourceArgs};

#[derive(Args, Debug)]
pub struct CountArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// iTQL query text
    #[arg(short = 'q', long, conflicts_with = "query_file")]
    pub query: Option<String>,

    /// File holding the iTQL query
    #[arg(short = 'f', long)]
    pub query_file: Option<PathBuf>,
}

pub async fn run(args: CountArgs) -> Result<()> {
    let cfg = load_config(&args.source.config_paths, ConfigMode::Count)?;

    let has_query = args.query.is_some() || args.query_file.is_some();
    let query = match (&args.source.input, has_query) {
        (Some(_), true) => bail!("--query/--query-file cannot be combined with --input"),
        (Some(_), false) => None,
        (None, false) => bail!("one of --query or --query-file is required"),
        (None, true) => Some(read_query(&args)?),
    };

    let source = build_source(&args.source, &cfg, query)?;
    let summary = doms_risearch::count_rows(source.as_ref())
        .await
        .with_context(|| format!("count rows from {}", source.describe()))?;

    println!(
        "results={} elapsed_secs={:.3}",
        summary.rows,
        summary.elapsed.as_secs_f64()
    );
    Ok(())
}

fn read_query(args: &CountArgs) -> Result<String> {
    match (&args.query, &args.query_file) {
        (Some(q), _) => Ok(q.clone()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("read query file '{}'", path.display())),
        (None, None) => bail!("one of --query or --query-file is required"),
    }
}
