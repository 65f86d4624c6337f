//! Required-files list loading.
//!
//! Accepts checksum manifests (`<md5 hex> <size> <filename>`) and plain
//! one-filename-per-line lists, mixed freely. The result is sorted and
//! de-duplicated.

use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::aggregate::AuditError;

static CHECKSUM_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-f]{32} \d+ (?P<filename>.+)").expect("checksum line regex should compile")
});

/// Extract the filename from one manifest line. Blank lines yield `None`.
pub fn parse_required_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match CHECKSUM_LINE_REGEX.captures(line) {
        Some(caps) => Some(caps["filename"].trim().to_string()),
        None => Some(line.to_string()),
    }
}

pub fn parse_required_str(src: &str) -> BTreeSet<String> {
    src.lines().filter_map(parse_required_line).collect()
}

pub fn read_required_files<R: BufRead>(reader: R) -> Result<BTreeSet<String>, AuditError> {
    let mut out = BTreeSet::new();
    for line in reader.lines() {
        let line = line.map_err(|e| AuditError::Io(format!("read required list: {e}")))?;
        if let Some(name) = parse_required_line(&line) {
            out.insert(name);
        }
    }
    Ok(out)
}

pub fn load_required_files(path: &Path) -> Result<BTreeSet<String>, AuditError> {
    let file = std::fs::File::open(path)
        .map_err(|e| AuditError::Io(format!("open '{}': {e}", path.display())))?;
    read_required_files(std::io::BufReader::new(file))
}
