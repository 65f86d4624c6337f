//! Object aggregation over an ordered record stream.
//!
//! Records arrive ordered by object id, so every record for one file is
//! adjacent to the others. The aggregator keeps at most one object open and
//! closes it as soon as a record for a different filename shows up:
//!
//! ```text
//!   Idle --record--> Open(obj)
//!   Open(obj) --record, same filename--> Open(obj)          (datastream ticked off)
//!   Open(obj) --record, new filename---> Open(new)          (obj finalized)
//!   Open(obj) --finish-----------------> obj finalized
//! ```
//!
//! Contiguity is a precondition of the upstream query. A filename that turns up
//! again after its object was closed is reported as an [`OrderingViolation`];
//! [`OrderingPolicy`] decides whether that is a warning or a hard error.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::record::Record;

/// The default required datastream set.
pub const DEFAULT_REQUIRED_DATASTREAMS: &[&str] =
    &["BROADCAST_METADATA", "FFPROBE", "FFPROBE_ERRORS"];

/// A repository object assembled from one or more adjacent records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomsObject {
    pub uuid: String,
    pub state: String,
    pub filename: String,
    /// Required datastreams not seen in any record of this object.
    pub missing_datastreams: BTreeSet<String>,
}

impl DomsObject {
    fn open(record: &Record, required: &BTreeSet<String>) -> Self {
        Self {
            uuid: record.uuid.clone(),
            state: record.state.clone(),
            filename: record.filename.clone(),
            missing_datastreams: required.clone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_datastreams.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Ordering policy + errors
// ---------------------------------------------------------------------------

/// What to do when a filename reappears after its object was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// Log, record the violation, and keep going (a second object is opened).
    #[default]
    Warn,
    /// Abort aggregation with [`AuditError::OrderingViolation`].
    Fail,
}

impl OrderingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderingPolicy::Warn => "warn",
            OrderingPolicy::Fail => "fail",
        }
    }

    pub fn parse(s: &str) -> Result<Self, AuditError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(OrderingPolicy::Warn),
            "fail" => Ok(OrderingPolicy::Fail),
            other => Err(AuditError::InvalidSetting(format!(
                "invalid ordering policy '{other}'. expected one of: warn | fail"
            ))),
        }
    }
}

/// A filename that was seen again after its object had been finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingViolation {
    pub filename: String,
    /// uuid of the record that reopened the filename.
    pub uuid: String,
}

/// Errors produced while auditing a record stream.
#[derive(Debug)]
pub enum AuditError {
    /// Input was not grouped by object and the policy is [`OrderingPolicy::Fail`].
    OrderingViolation(OrderingViolation),
    /// A setting value could not be interpreted.
    InvalidSetting(String),
    /// Reading input or writing a report failed.
    Io(String),
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditError::OrderingViolation(v) => write!(
                f,
                "ordering violation: filename '{}' reappeared (uuid {}) after its object \
                 was closed; input must be ordered by object id",
                v.filename, v.uuid
            ),
            AuditError::InvalidSetting(msg) => write!(f, "invalid setting: {msg}"),
            AuditError::Io(msg) => write!(f, "audit io error: {msg}"),
        }
    }
}

impl std::error::Error for AuditError {}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum OpenState {
    Idle,
    Open(DomsObject),
}

/// Everything the aggregator produced once the stream is exhausted.
#[derive(Debug, Clone, Default)]
pub struct AggregateOutput {
    pub objects: Vec<DomsObject>,
    pub violations: Vec<OrderingViolation>,
}

/// Groups adjacent records by filename into [`DomsObject`]s.
#[derive(Debug)]
pub struct ObjectAggregator {
    required: BTreeSet<String>,
    policy: OrderingPolicy,
    state: OpenState,
    closed_filenames: HashSet<String>,
    objects: Vec<DomsObject>,
    violations: Vec<OrderingViolation>,
}

impl ObjectAggregator {
    pub fn new(required: BTreeSet<String>, policy: OrderingPolicy) -> Self {
        Self {
            required,
            policy,
            state: OpenState::Idle,
            closed_filenames: HashSet::new(),
            objects: Vec::new(),
            violations: Vec::new(),
        }
    }

    /// Aggregator over [`DEFAULT_REQUIRED_DATASTREAMS`] with the `Warn` policy.
    pub fn with_defaults() -> Self {
        Self::new(
            DEFAULT_REQUIRED_DATASTREAMS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            OrderingPolicy::Warn,
        )
    }

    pub fn push(&mut self, record: Record) -> Result<(), AuditError> {
        let needs_new = match &self.state {
            OpenState::Idle => true,
            OpenState::Open(obj) => obj.filename != record.filename,
        };

        if needs_new {
            if self.closed_filenames.contains(&record.filename) {
                let violation = OrderingViolation {
                    filename: record.filename.clone(),
                    uuid: record.uuid.clone(),
                };
                match self.policy {
                    OrderingPolicy::Fail => return Err(AuditError::OrderingViolation(violation)),
                    OrderingPolicy::Warn => {
                        tracing::warn!(
                            filename = %violation.filename,
                            uuid = %violation.uuid,
                            "filename reappeared after its object was closed"
                        );
                        self.violations.push(violation);
                    }
                }
            }

            let next = OpenState::Open(DomsObject::open(&record, &self.required));
            if let OpenState::Open(done) = std::mem::replace(&mut self.state, next) {
                self.close(done);
            }
        }

        if let OpenState::Open(obj) = &mut self.state {
            obj.missing_datastreams.remove(&record.datastream);
        }
        Ok(())
    }

    /// Finalize the open object (if any) and hand back the results.
    pub fn finish(mut self) -> AggregateOutput {
        if let OpenState::Open(done) = std::mem::replace(&mut self.state, OpenState::Idle) {
            self.close(done);
        }
        AggregateOutput {
            objects: self.objects,
            violations: self.violations,
        }
    }

    fn close(&mut self, obj: DomsObject) {
        self.closed_filenames.insert(obj.filename.clone());
        self.objects.push(obj);
    }
}
