//! Throughput bookkeeping for the audit loop.
//!
//! Nothing here feeds back into aggregation results; a run with the tracker
//! disabled produces the same objects.

use std::time::{Duration, Instant};

/// Records between throughput log lines unless configured otherwise.
pub const DEFAULT_REPORT_INTERVAL: u64 = 5_000;

/// Cumulative moving average of per-record processing time.
#[derive(Debug, Clone)]
pub struct ThroughputTracker {
    report_interval: u64,
    processed: u64,
    average_secs: f64,
}

impl ThroughputTracker {
    /// `report_interval == 0` disables batch observations.
    pub fn new(report_interval: u64) -> Self {
        Self {
            report_interval,
            processed: 0,
            average_secs: 0.0,
        }
    }

    /// Fold one sample into the average.
    ///
    /// Returns the current records/sec rate when this sample completes a batch
    /// of `report_interval` records.
    pub fn observe(&mut self, sample: Duration) -> Option<f64> {
        let n = self.processed as f64;
        self.average_secs = (self.average_secs * n + sample.as_secs_f64()) / (n + 1.0);
        self.processed += 1;

        if self.report_interval > 0 && self.processed % self.report_interval == 0 {
            Some(self.rate_per_sec())
        } else {
            None
        }
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn average_secs(&self) -> f64 {
        self.average_secs
    }

    /// `1 / average`; zero before the first sample (or if every sample was 0s).
    pub fn rate_per_sec(&self) -> f64 {
        if self.average_secs > 0.0 {
            1.0 / self.average_secs
        } else {
            0.0
        }
    }
}

impl Default for ThroughputTracker {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_INTERVAL)
    }
}

/// Named wall-clock phase; logs on start and on stop.
#[derive(Debug)]
pub struct PhaseTimer {
    label: String,
    start: Instant,
}

impl PhaseTimer {
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        tracing::info!(phase = %label, "started");
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn stop(self) -> Duration {
        let elapsed = self.start.elapsed();
        tracing::info!(phase = %self.label, elapsed_secs = elapsed.as_secs_f64(), "done");
        elapsed
    }
}

/// Aggregate timing figures for one audit run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AuditStats {
    /// Data lines seen (parsable or not).
    pub processed_items: u64,
    /// Mean seconds spent per line.
    pub average_secs: f64,
    /// Wall-clock seconds for the whole record loop.
    pub loop_secs: f64,
    /// Seconds spent in pattern matching alone.
    pub parse_secs: f64,
}

impl AuditStats {
    pub fn rate_per_sec(&self) -> f64 {
        if self.average_secs > 0.0 {
            1.0 / self.average_secs
        } else {
            0.0
        }
    }
}
