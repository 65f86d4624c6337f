//! `doms certainize`: audit datastream completeness, then reconcile the
//! found filenames against a required-files list.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use doms_audit::{
    load_required_files, reconcile, AuditOutcome, AuditSettings, ListKind, OrderingPolicy,
    PhaseTimer, ReportSink, StreamAuditor,
};
use doms_config::{AuditConfig, ConfigMode};

use super::{build_source, load_config, SourceArgs};

#[derive(Args, Debug)]
pub struct CertainizeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write object lines here instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Write missing filenames here instead of stdout
    #[arg(short = 'm', long)]
    pub missing: Option<PathBuf>,

    /// Write extra filenames here instead of stdout
    #[arg(short = 'e', long)]
    pub extra: Option<PathBuf>,

    /// Only objects in this state count as found (overrides config)
    #[arg(short = 's', long)]
    pub state: Option<String>,

    /// Required-files list (bare filenames or checksum lines)
    #[arg(short = 'r', long)]
    pub required: Option<PathBuf>,

    /// warn | fail on a filename that reappears after its group closed
    #[arg(long)]
    pub ordering_policy: Option<String>,

    /// Records per throughput log line; 0 disables (overrides config)
    #[arg(long)]
    pub report_interval: Option<u64>,
}

pub async fn run(args: CertainizeArgs) -> Result<()> {
    let cfg = load_config(&args.source.config_paths, ConfigMode::Certainize)?;
    let settings = audit_settings(&args, &cfg)?;
    tracing::info!(
        ordering_policy = settings.ordering_policy.as_str(),
        required_datastreams = settings.required_datastreams.len(),
        report_interval = settings.report_interval,
        "audit settings"
    );

    // Read before the fetch so a bad path fails fast.
    let required_files = match &args.required {
        Some(path) => load_required_files(path)
            .with_context(|| format!("load required files '{}'", path.display()))?,
        None => BTreeSet::new(),
    };

    let source = build_source(&args.source, &cfg, None)?;

    let timer = PhaseTimer::start(format!("fetch {}", source.describe()));
    let mut auditor = StreamAuditor::new(settings);
    let lines = source
        .stream_lines(&mut auditor)
        .await
        .with_context(|| format!("read results from {}", source.describe()))?;
    timer.stop();

    let outcome = auditor.finish();
    tracing::info!(
        lines,
        objects = outcome.objects.len(),
        unparsable = outcome.unparsable_lines,
        ordering_violations = outcome.violations.len(),
        "audit complete"
    );

    let mut objects_out = ReportSink::file_or_console(args.output.as_deref())
        .context("open object output")?;
    objects_out.write_objects(&outcome.objects)?;

    print_stats(&outcome);

    let state = args.state.clone().or_else(|| cfg.audit.required_state.clone());
    let report = reconcile(&outcome.objects, state.as_deref(), &required_files);

    let mut missing_out =
        ReportSink::file_or_console(args.missing.as_deref()).context("open missing output")?;
    missing_out.write_filenames(ListKind::Missing, &report.missing)?;

    let mut extra_out =
        ReportSink::file_or_console(args.extra.as_deref()).context("open extra output")?;
    extra_out.write_filenames(ListKind::Extra, &report.extra)?;

    tracing::info!(
        found = report.found.len(),
        missing = report.missing.len(),
        extra = report.extra.len(),
        "reconcile complete"
    );

    Ok(())
}

fn audit_settings(args: &CertainizeArgs, cfg: &AuditConfig) -> Result<AuditSettings> {
    let policy_str = args
        .ordering_policy
        .as_deref()
        .unwrap_or(cfg.audit.ordering_policy.as_str());

    Ok(AuditSettings {
        required_datastreams: cfg.audit.required_datastreams.iter().cloned().collect(),
        ordering_policy: OrderingPolicy::parse(policy_str)?,
        report_interval: args.report_interval.unwrap_or(cfg.audit.report_interval),
    })
}

fn print_stats(outcome: &AuditOutcome) {
    let stats = &outcome.stats;
    let incomplete = outcome.objects.iter().filter(|o| !o.is_complete()).count();
    println!(
        "processed={} objects={} unparsable={} ordering_violations={} incomplete={}",
        stats.processed_items,
        outcome.objects.len(),
        outcome.unparsable_lines,
        outcome.violations.len(),
        incomplete
    );
    println!(
        "avg_secs={:.9} per_sec={:.1}",
        stats.average_secs,
        stats.rate_per_sec()
    );
    println!(
        "loop_secs={:.3} parse_secs={:.3}",
        stats.loop_secs, stats.parse_secs
    );
}
