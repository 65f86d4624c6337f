//! doms-risearch
//!
//! Sources of resource-index result rows.
//!
//! This crate owns the [`ResultSource`] abstraction and its two
//! implementations: the Fedora `risearch` HTTP endpoint and a local TSV file.
//! It does **not** interpret rows; every line, header included, is handed to a
//! [`LineSink`] in order.

pub mod lines;
pub mod query;

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use doms_audit::{AuditError, LineSink};
use tokio::io::AsyncBufReadExt;

pub use lines::LineSplitter;
pub use query::CERTAINIZER_QUERY;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum SourceError {
    /// Network or transport failure.
    Transport(String),
    /// The endpoint answered with a non-success status.
    Http { status: u16, body: String },
    /// Local file could not be read.
    Io(String),
    /// A line was not valid UTF-8.
    Decode(String),
    /// Client could not be built from the given settings.
    Config(String),
    /// The sink rejected a line.
    Sink(AuditError),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Transport(msg) => write!(f, "transport error: {msg}"),
            SourceError::Http { status, body } => {
                write!(f, "risearch http error status={status}: {body}")
            }
            SourceError::Io(msg) => write!(f, "io error: {msg}"),
            SourceError::Decode(msg) => write!(f, "decode error: {msg}"),
            SourceError::Config(msg) => write!(f, "config error: {msg}"),
            SourceError::Sink(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Sink(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AuditError> for SourceError {
    fn from(e: AuditError) -> Self {
        SourceError::Sink(e)
    }
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Producer of result rows.
#[async_trait::async_trait]
pub trait ResultSource: Send + Sync {
    /// Human-readable origin for log lines (e.g. `"doms:7880"`).
    fn describe(&self) -> String;

    /// Push every line, in order, into `sink`. Returns the number of lines
    /// delivered.
    async fn stream_lines(&self, sink: &mut (dyn LineSink + Send)) -> Result<u64, SourceError>;
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Fedora resource-index client (`/fedora/risearch`, iTQL, TSV output).
///
/// The password is passed in by the caller; do not log it.
#[derive(Clone)]
pub struct RiSearchClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    limit: u64,
    query: String,
}

impl fmt::Debug for RiSearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiSearchClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl RiSearchClient {
    pub fn new(
        host: &str,
        port: u16,
        username: String,
        password: String,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        Self::new_with_base_url(
            format!("http://{host}:{port}"),
            username,
            password,
            timeout,
        )
    }

    /// `timeout` bounds the connect and each body read, not the transfer.
    pub fn new_with_base_url(
        base_url: String,
        username: String,
        password: String,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|e| SourceError::Config(format!("http client build failed: {e}")))?;
        Ok(Self {
            http,
            base_url,
            username,
            password,
            limit: 0,
            query: CERTAINIZER_QUERY.to_string(),
        })
    }

    /// Row limit; 0 means unlimited.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Replace the default certainizer query.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/fedora/risearch", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl ResultSource for RiSearchClient {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    async fn stream_lines(&self, sink: &mut (dyn LineSink + Send)) -> Result<u64, SourceError> {
        let limit = self.limit.to_string();
        tracing::debug!(endpoint = %self.endpoint(), limit = self.limit, "risearch query");
        let mut resp = self
            .http
            .get(self.endpoint())
            .basic_auth(&self.username, Some(&self.password))
            .query(&[
                ("lang", "itql"),
                ("format", "tsv"),
                ("limit", limit.as_str()),
                ("query", self.query.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Transport(format!("risearch request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Http {
                status: status.as_u16(),
                body: body.chars().take(512).collect(),
            });
        }

        let mut splitter = LineSplitter::new();
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| SourceError::Transport(format!("risearch body read failed: {e}")))?
        {
            splitter.push(&chunk, &mut *sink)?;
        }
        let delivered = splitter.finish(&mut *sink)?;
        tracing::debug!(lines = delivered, "risearch body consumed");
        Ok(delivered)
    }
}

// ---------------------------------------------------------------------------
// Local file
// ---------------------------------------------------------------------------

/// TSV result previously saved to disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl ResultSource for FileSource {
    fn describe(&self) -> String {
        format!("'{}'", self.path.display())
    }

    async fn stream_lines(&self, sink: &mut (dyn LineSink + Send)) -> Result<u64, SourceError> {
        let file = tokio::fs::File::open(&self.path)
            .await
            .map_err(|e| SourceError::Io(format!("open '{}': {e}", self.path.display())))?;
        let mut lines = tokio::io::BufReader::new(file).lines();

        let mut n = 0u64;
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| SourceError::Io(format!("read '{}': {e}", self.path.display())))?
        {
            sink.accept(&line)?;
            n += 1;
        }
        Ok(n)
    }
}

// ---------------------------------------------------------------------------
// Row counting
// ---------------------------------------------------------------------------

/// Counts data rows (header excluded).
#[derive(Debug, Default)]
pub struct RowCounter {
    lines: u64,
}

impl RowCounter {
    pub fn rows(&self) -> u64 {
        self.lines.saturating_sub(1)
    }
}

impl LineSink for RowCounter {
    fn accept(&mut self, _line: &str) -> Result<(), AuditError> {
        self.lines += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountSummary {
    pub rows: u64,
    pub elapsed: Duration,
}

/// Run the source's query and count result rows.
pub async fn count_rows(source: &dyn ResultSource) -> Result<CountSummary, SourceError> {
    let start = Instant::now();
    let mut counter = RowCounter::default();
    source.stream_lines(&mut counter).await?;
    Ok(CountSummary {
        rows: counter.rows(),
        elapsed: start.elapsed(),
    })
}
