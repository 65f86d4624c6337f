//! Byte-chunk to line reassembly.
//!
//! HTTP bodies arrive in arbitrary chunks; a row (or a multi-byte UTF-8
//! character) may be split across two of them. Bytes are buffered until a
//! `\n` is seen, and a trailing `\r` is dropped.

use doms_audit::LineSink;

use crate::SourceError;

#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
    delivered: u64,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk; every line it completes goes to `sink`.
    pub fn push<S: LineSink + ?Sized>(
        &mut self,
        chunk: &[u8],
        sink: &mut S,
    ) -> Result<(), SourceError> {
        let mut rest = chunk;
        while let Some(pos) = rest.iter().position(|b| *b == b'\n') {
            self.pending.extend_from_slice(&rest[..pos]);
            rest = &rest[pos + 1..];
            self.emit(sink)?;
        }
        self.pending.extend_from_slice(rest);
        Ok(())
    }

    /// Flush an unterminated final line. Returns the total lines delivered.
    pub fn finish<S: LineSink + ?Sized>(mut self, sink: &mut S) -> Result<u64, SourceError> {
        if !self.pending.is_empty() {
            self.emit(sink)?;
        }
        Ok(self.delivered)
    }

    fn emit<S: LineSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), SourceError> {
        if self.pending.last() == Some(&b'\r') {
            self.pending.pop();
        }
        let line = std::str::from_utf8(&self.pending).map_err(|e| {
            SourceError::Decode(format!("line {} is not utf-8: {e}", self.delivered + 1))
        })?;
        sink.accept(line)?;
        self.pending.clear();
        self.delivered += 1;
        Ok(())
    }
}
