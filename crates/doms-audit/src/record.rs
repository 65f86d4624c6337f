//! Resource-index TSV row parsing.
//!
//! One row of the certainizer query result looks like
//!
//! ```text
//! info:fedora/uuid:1f..<TAB>info:fedora/fedora-system:def/model#Active<TAB>http://host/path/a.mp4<TAB>info:fedora/*/FFPROBE
//! ```
//!
//! | Field | Extracted as  | Rule                                          |
//! |-------|---------------|-----------------------------------------------|
//! | 1     | `uuid`        | everything after the `info:fedora/` prefix    |
//! | 2     | `state`       | the URI fragment after the last `#`           |
//! | 3     | `filename`    | last `/`-separated segment                    |
//! | 4     | `datastream`  | trailing `[A-Za-z0-9_]+` token                |
//!
//! A non-matching row is not an error: [`parse_line`] returns `None` and the
//! caller decides how loudly to complain.

use std::sync::LazyLock;

use regex::Regex;

static RECORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^info:fedora/(?P<uuid>[^\t]+)",
        r"\t[^#]+#(?P<state>[^\t]+)",
        r"\t.+/(?P<filename>[^\t/]+)",
        r"\t.+?(?P<datastream>[a-zA-Z0-9_]+)$",
    ))
    .expect("record regex should compile")
});

/// One (object, datastream) association taken from a single result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub uuid: String,
    pub state: String,
    pub filename: String,
    pub datastream: String,
}

/// Parse one data row. Trailing `\r`/`\n` are ignored.
///
/// Returns `None` when the row does not have the four-field shape described in
/// the module docs.
pub fn parse_line(line: &str) -> Option<Record> {
    let line = line.trim_end_matches(['\r', '\n']);
    let caps = RECORD_REGEX.captures(line)?;

    Some(Record {
        uuid: caps["uuid"].to_string(),
        state: caps["state"].to_string(),
        filename: caps["filename"].to_string(),
        datastream: caps["datastream"].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(uuid: &str, state: &str, filename: &str, ds: &str) -> String {
        format!(
            "info:fedora/{uuid}\tinfo:fedora/fedora-system:def/model#{state}\t\
             http://bitfinder.example/bart/{filename}\tinfo:fedora/*/{ds}"
        )
    }

    #[test]
    fn well_formed_row_parses_all_fields() {
        let r = parse_line(&row("uuid:abc-1", "Active", "a.mp4", "FFPROBE")).unwrap();
        assert_eq!(r.uuid, "uuid:abc-1");
        assert_eq!(r.state, "Active");
        assert_eq!(r.filename, "a.mp4");
        assert_eq!(r.datastream, "FFPROBE");
    }

    #[test]
    fn underscores_kept_in_datastream_name() {
        let r = parse_line(&row("uuid:x", "Inactive", "b.ts", "BROADCAST_METADATA")).unwrap();
        assert_eq!(r.datastream, "BROADCAST_METADATA");
        assert_eq!(r.state, "Inactive");
    }

    #[test]
    fn filename_is_last_path_segment_only() {
        let line = "info:fedora/uuid:x\tmodel#A\thttp://h/a/b/c/deep.file.ts\tds/DC";
        let r = parse_line(line).unwrap();
        assert_eq!(r.filename, "deep.file.ts");
        assert_eq!(r.datastream, "DC");
    }

    #[test]
    fn crlf_line_ending_tolerated() {
        let line = format!("{}\r\n", row("uuid:x", "Active", "a.mp4", "FFPROBE_ERRORS"));
        let r = parse_line(&line).unwrap();
        assert_eq!(r.datastream, "FFPROBE_ERRORS");
    }

    #[test]
    fn header_row_does_not_match() {
        assert!(parse_line("\"pid\"\t\"state\"\t\"label\"\t\"datastream\"").is_none());
    }

    #[test]
    fn missing_scheme_prefix_rejected() {
        let line = "uuid:x\tmodel#Active\thttp://h/a.mp4\tinfo:fedora/*/FFPROBE";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn three_fields_rejected() {
        let line = "info:fedora/uuid:x\tmodel#Active\thttp://h/a.mp4";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn empty_and_garbage_rejected() {
        assert!(parse_line("").is_none());
        assert!(parse_line("garbage").is_none());
    }
}
