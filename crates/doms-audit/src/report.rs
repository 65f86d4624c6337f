//! Report rendering.
//!
//! A [`ReportSink`] pairs a writer with a [`ReportStyle`]. Console sinks mark
//! filename lists (`-` missing, `+` extra); file sinks write bare filenames so
//! the output can be fed to other tools.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::aggregate::{AuditError, DomsObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStyle {
    Console,
    File,
}

/// Which filename list is being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Missing,
    Extra,
}

impl ListKind {
    pub fn console_marker(&self) -> char {
        match self {
            ListKind::Missing => '-',
            ListKind::Extra => '+',
        }
    }
}

/// `uuid<TAB>filename<TAB>space-joined missing datastreams`
pub fn format_object_line(obj: &DomsObject) -> String {
    let missing: Vec<&str> = obj.missing_datastreams.iter().map(String::as_str).collect();
    format!("{}\t{}\t{}", obj.uuid, obj.filename, missing.join(" "))
}

pub struct ReportSink {
    out: Box<dyn Write + Send>,
    style: ReportStyle,
}

impl std::fmt::Debug for ReportSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportSink")
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

impl ReportSink {
    pub fn console() -> Self {
        Self::from_writer(Box::new(io::stdout()), ReportStyle::Console)
    }

    /// Create (truncate) `path` for writing.
    pub fn file(path: &Path) -> Result<Self, AuditError> {
        let f = File::create(path)
            .map_err(|e| AuditError::Io(format!("create '{}': {e}", path.display())))?;
        Ok(Self::from_writer(
            Box::new(BufWriter::new(f)),
            ReportStyle::File,
        ))
    }

    /// File sink when a path is configured, console otherwise.
    pub fn file_or_console(path: Option<&Path>) -> Result<Self, AuditError> {
        match path {
            Some(p) => Self::file(p),
            None => Ok(Self::console()),
        }
    }

    pub fn from_writer(out: Box<dyn Write + Send>, style: ReportStyle) -> Self {
        Self { out, style }
    }

    pub fn write_object(&mut self, obj: &DomsObject) -> Result<(), AuditError> {
        writeln!(self.out, "{}", format_object_line(obj)).map_err(io_err)
    }

    pub fn write_objects(&mut self, objects: &[DomsObject]) -> Result<(), AuditError> {
        for obj in objects {
            self.write_object(obj)?;
        }
        self.flush()
    }

    pub fn write_filenames<'a, I>(&mut self, kind: ListKind, names: I) -> Result<(), AuditError>
    where
        I: IntoIterator<Item = &'a String>,
    {
        for name in names {
            let res = match self.style {
                ReportStyle::Console => writeln!(self.out, "{}{}", kind.console_marker(), name),
                ReportStyle::File => writeln!(self.out, "{name}"),
            };
            res.map_err(io_err)?;
        }
        self.flush()
    }

    pub fn flush(&mut self) -> Result<(), AuditError> {
        self.out.flush().map_err(io_err)
    }
}

fn io_err(e: io::Error) -> AuditError {
    AuditError::Io(format!("write report: {e}"))
}
