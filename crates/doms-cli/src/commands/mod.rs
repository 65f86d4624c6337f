//! Command handler modules for the `doms` binary.
//!
//! Shared config/source wiring lives here; command-specific logic lives in
//! the submodules.

pub mod certainize;
pub mod count;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use doms_config::{AuditConfig, ConfigMode, UnusedKeyPolicy};
use doms_risearch::{FileSource, ResultSource, RiSearchClient};

/// Where the result rows come from. Shared by every command.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Layered config paths in merge order
    #[arg(short = 'c', long = "config")]
    pub config_paths: Vec<String>,

    /// Resource-index host (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Resource-index port (overrides config)
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Basic-auth username (overrides config)
    #[arg(short = 'u', long)]
    pub username: Option<String>,

    /// Row limit passed to risearch; 0 = unlimited (overrides config)
    #[arg(short = 'l', long)]
    pub limit: Option<u64>,

    /// Read a saved TSV result instead of querying risearch
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,
}

/// Load layered config (or defaults when no paths are given) and warn about
/// keys `mode` never reads.
pub fn load_config(paths: &[String], mode: ConfigMode) -> Result<AuditConfig> {
    if paths.is_empty() {
        return Ok(AuditConfig::default());
    }

    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    let loaded = doms_config::load_layered_yaml(&path_refs)?;
    tracing::info!(config_hash = %loaded.config_hash, mode = mode.as_str(), "config loaded");

    let report = doms_config::report_unused_keys(mode, &loaded.config_json, UnusedKeyPolicy::Warn)?;
    for key in &report.unused_leaf_pointers {
        tracing::warn!(key = %key, mode = %report.mode, "config key not used");
    }

    AuditConfig::from_loaded(&loaded)
}

/// Build the row source. `--host` and `--input` are mutually exclusive; with
/// `--input` the configured host is ignored. `query` replaces the default
/// certainizer query on the HTTP path.
pub fn build_source(
    args: &SourceArgs,
    cfg: &AuditConfig,
    query: Option<String>,
) -> Result<Box<dyn ResultSource>> {
    if args.host.is_some() && args.input.is_some() {
        bail!("only one of --host and --input allowed");
    }

    if let Some(path) = &args.input {
        return Ok(Box::new(FileSource::new(path.clone())));
    }

    let host = args.host.as_deref().unwrap_or(cfg.risearch.host.as_str());
    let port = args.port.unwrap_or(cfg.risearch.port);
    let limit = args.limit.unwrap_or(cfg.risearch.limit);
    let creds = doms_config::resolve_credentials(cfg, args.username.as_deref());
    if !creds.from_env {
        tracing::debug!(
            env = %cfg.risearch.password_env,
            "password env var unset; using Fedora default password"
        );
    }

    let mut client = RiSearchClient::new(
        host,
        port,
        creds.username,
        creds.password,
        Duration::from_secs(cfg.risearch.timeout_secs),
    )
    .context("risearch client setup failed")?
    .with_limit(limit);
    if let Some(q) = query {
        client = client.with_query(q);
    }

    Ok(Box::new(client))
}
