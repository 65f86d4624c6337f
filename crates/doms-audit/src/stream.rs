//! Line-fed driver: header skip, parse, aggregate, time.
//!
//! Sources push lines one at a time through [`LineSink`], so a network body
//! can be audited while it is still arriving. [`audit_reader`] is the
//! convenience wrapper for anything that implements `BufRead`.

use std::collections::BTreeSet;
use std::io::BufRead;
use std::time::{Duration, Instant};

use crate::aggregate::{
    AggregateOutput, AuditError, DomsObject, ObjectAggregator, OrderingPolicy, OrderingViolation,
    DEFAULT_REQUIRED_DATASTREAMS,
};
use crate::record::parse_line;
use crate::timing::{AuditStats, ThroughputTracker, DEFAULT_REPORT_INTERVAL};

/// Consumer of raw result lines, in order.
pub trait LineSink {
    fn accept(&mut self, line: &str) -> Result<(), AuditError>;
}

/// Settings the auditor is built from. Constructed once by the caller.
#[derive(Debug, Clone)]
pub struct AuditSettings {
    pub required_datastreams: BTreeSet<String>,
    pub ordering_policy: OrderingPolicy,
    /// Records between throughput log lines; 0 disables them.
    pub report_interval: u64,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            required_datastreams: DEFAULT_REQUIRED_DATASTREAMS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ordering_policy: OrderingPolicy::Warn,
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }
}

/// Result of one audit pass.
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub objects: Vec<DomsObject>,
    pub violations: Vec<OrderingViolation>,
    /// Data lines that did not match the record pattern.
    pub unparsable_lines: u64,
    pub stats: AuditStats,
}

/// Stateful line consumer wrapping an [`ObjectAggregator`].
#[derive(Debug)]
pub struct StreamAuditor {
    aggregator: ObjectAggregator,
    tracker: ThroughputTracker,
    header_seen: bool,
    unparsable: u64,
    parse_time: Duration,
    loop_start: Option<Instant>,
}

impl StreamAuditor {
    pub fn new(settings: AuditSettings) -> Self {
        Self {
            aggregator: ObjectAggregator::new(
                settings.required_datastreams,
                settings.ordering_policy,
            ),
            tracker: ThroughputTracker::new(settings.report_interval),
            header_seen: false,
            unparsable: 0,
            parse_time: Duration::ZERO,
            loop_start: None,
        }
    }

    /// Close the open object and return everything gathered so far.
    pub fn finish(self) -> AuditOutcome {
        let loop_secs = self
            .loop_start
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);

        let AggregateOutput {
            objects,
            violations,
        } = self.aggregator.finish();

        AuditOutcome {
            objects,
            violations,
            unparsable_lines: self.unparsable,
            stats: AuditStats {
                processed_items: self.tracker.processed(),
                average_secs: self.tracker.average_secs(),
                loop_secs,
                parse_secs: self.parse_time.as_secs_f64(),
            },
        }
    }
}

impl LineSink for StreamAuditor {
    fn accept(&mut self, line: &str) -> Result<(), AuditError> {
        if !self.header_seen {
            self.header_seen = true;
            self.loop_start = Some(Instant::now());
            return Ok(());
        }

        let started = Instant::now();

        let parsed = parse_line(line);
        self.parse_time += started.elapsed();

        match parsed {
            Some(record) => self.aggregator.push(record)?,
            None => {
                self.unparsable += 1;
                tracing::warn!(line = %line.trim_end(), "unexpected input");
            }
        }

        if let Some(rate) = self.tracker.observe(started.elapsed()) {
            tracing::info!(
                processed = self.tracker.processed(),
                per_sec = rate,
                "throughput"
            );
        }
        Ok(())
    }
}

/// Audit every line of `reader` (first line is the header).
pub fn audit_reader<R: BufRead>(
    reader: R,
    settings: AuditSettings,
) -> Result<AuditOutcome, AuditError> {
    let mut auditor = StreamAuditor::new(settings);
    for line in reader.lines() {
        let line = line.map_err(|e| AuditError::Io(format!("read line: {e}")))?;
        auditor.accept(&line)?;
    }
    Ok(auditor.finish())
}
