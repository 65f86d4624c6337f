//! Grouping of adjacent records into objects.
//!
//! GREEN when:
//! - contiguous input yields exactly one object per distinct filename
//! - objects come out in stream order
//! - a filename reappearing after closure is detected (warn: recorded, fail: error)

use std::collections::BTreeSet;

use doms_audit::{audit_reader, AuditError, AuditSettings, OrderingPolicy};

const HEADER: &str = "pid\tstate\tlabel\tdatastream";

fn row(uuid: &str, filename: &str, ds: &str) -> String {
    format!("info:fedora/{uuid}\tmodel#Active\thttp://h/x/{filename}\tinfo:fedora/*/{ds}")
}

fn contiguous_input(files: usize, per_file: usize) -> String {
    let streams = ["BROADCAST_METADATA", "FFPROBE", "FFPROBE_ERRORS", "DC"];
    let mut s = String::from(HEADER);
    for f in 0..files {
        for d in 0..per_file {
            s.push('\n');
            s.push_str(&row(
                &format!("uuid:{f}"),
                &format!("file{f:03}.ts"),
                streams[d % streams.len()],
            ));
        }
    }
    s
}

#[test]
fn one_object_per_distinct_filename_when_contiguous() {
    for (files, per_file) in [(1, 1), (5, 3), (40, 4), (7, 1)] {
        let input = contiguous_input(files, per_file);

        let out = audit_reader(input.as_bytes(), AuditSettings::default()).unwrap();

        let distinct: BTreeSet<&str> = out.objects.iter().map(|o| o.filename.as_str()).collect();
        assert_eq!(out.objects.len(), files, "files={files} per_file={per_file}");
        assert_eq!(distinct.len(), files);
        assert!(out.violations.is_empty());
    }
}

#[test]
fn objects_preserve_stream_order() {
    let input = format!(
        "{HEADER}\n{}\n{}\n{}\n",
        row("u3", "zz.ts", "FFPROBE"),
        row("u1", "aa.ts", "FFPROBE"),
        row("u2", "mm.ts", "FFPROBE"),
    );

    let out = audit_reader(input.as_bytes(), AuditSettings::default()).unwrap();

    let names: Vec<&str> = out.objects.iter().map(|o| o.filename.as_str()).collect();
    assert_eq!(names, ["zz.ts", "aa.ts", "mm.ts"]);
}

#[test]
fn interleaved_input_recorded_under_warn_policy() {
    let input = format!(
        "{HEADER}\n{}\n{}\n{}\n",
        row("u1", "a.ts", "FFPROBE"),
        row("u2", "b.ts", "FFPROBE"),
        row("u1", "a.ts", "FFPROBE_ERRORS"),
    );

    let out = audit_reader(input.as_bytes(), AuditSettings::default()).unwrap();

    // Split, as the grouping rule dictates, but not silently.
    assert_eq!(out.objects.len(), 3);
    assert_eq!(out.violations.len(), 1);
    assert_eq!(out.violations[0].filename, "a.ts");
}

#[test]
fn interleaved_input_rejected_under_fail_policy() {
    let input = format!(
        "{HEADER}\n{}\n{}\n{}\n",
        row("u1", "a.ts", "FFPROBE"),
        row("u2", "b.ts", "FFPROBE"),
        row("u1", "a.ts", "FFPROBE_ERRORS"),
    );
    let settings = AuditSettings {
        ordering_policy: OrderingPolicy::Fail,
        ..AuditSettings::default()
    };

    let err = audit_reader(input.as_bytes(), settings).unwrap_err();

    match err {
        AuditError::OrderingViolation(v) => assert_eq!(v.filename, "a.ts"),
        other => panic!("expected ordering violation, got {other}"),
    }
}
