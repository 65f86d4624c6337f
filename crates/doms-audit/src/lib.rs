//! doms-audit
//!
//! Streaming certainizer core: parses resource-index TSV rows, groups them
//! into objects, tracks which required datastreams each object lacks, and
//! reconciles the objects found against a required-files list.
//!
//! Single pass, single thread. No network and no config parsing here; callers
//! build [`AuditSettings`] once and push lines through [`LineSink`].

pub mod aggregate;
pub mod record;
pub mod reconcile;
pub mod report;
pub mod required;
pub mod stream;
pub mod timing;

pub use aggregate::{
    AggregateOutput, AuditError, DomsObject, ObjectAggregator, OrderingPolicy, OrderingViolation,
    DEFAULT_REQUIRED_DATASTREAMS,
};
pub use record::{parse_line, Record};
pub use reconcile::{found_files, reconcile, ReconcileReport};
pub use report::{format_object_line, ListKind, ReportSink, ReportStyle};
pub use required::{
    load_required_files, parse_required_line, parse_required_str, read_required_files,
};
pub use stream::{audit_reader, AuditOutcome, AuditSettings, LineSink, StreamAuditor};
pub use timing::{AuditStats, PhaseTimer, ThroughputTracker, DEFAULT_REPORT_INTERVAL};
