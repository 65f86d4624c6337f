use std::fs;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

const INTERLEAVED_TSV: &str = "\
pid\tstate\tlabel\tdatastream
info:fedora/uuid:1\tmodel#Active\thttp://h/a.mp4\tinfo:fedora/*/FFPROBE
info:fedora/uuid:2\tmodel#Active\thttp://h/b.mp4\tinfo:fedora/*/FFPROBE
info:fedora/uuid:1\tmodel#Active\thttp://h/a.mp4\tinfo:fedora/*/FFPROBE_ERRORS
";

/// GREEN when `--host` and `--input` together are refused before any I/O.
#[test]
fn host_and_input_are_mutually_exclusive() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("doms")?;
    cmd.args([
        "certainize",
        "--host",
        "doms",
        "--input",
        "/nonexistent/result.tsv",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("only one of --host and --input allowed"));

    Ok(())
}

/// GREEN when:
/// - the default policy warns and still completes
/// - `--ordering-policy fail` exits non-zero naming the filename
#[test]
fn ordering_policy_controls_interleaved_input() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("result.tsv");
    fs::write(&input, INTERLEAVED_TSV)?;

    Command::cargo_bin("doms")?
        .arg("certainize")
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("ordering_violations=1"));

    Command::cargo_bin("doms")?
        .arg("certainize")
        .arg("--input")
        .arg(&input)
        .args(["--ordering-policy", "fail"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("a.mp4"));

    Ok(())
}

#[test]
fn unknown_ordering_policy_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("result.tsv");
    fs::write(&input, INTERLEAVED_TSV)?;

    Command::cargo_bin("doms")?
        .arg("certainize")
        .arg("--input")
        .arg(&input)
        .args(["--ordering-policy", "sometimes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sometimes"));

    Ok(())
}

#[test]
fn missing_required_file_fails() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("result.tsv");
    fs::write(&input, INTERLEAVED_TSV)?;

    Command::cargo_bin("doms")?
        .arg("certainize")
        .arg("--input")
        .arg(&input)
        .args(["--required", "/nonexistent/required.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required.txt"));

    Ok(())
}
