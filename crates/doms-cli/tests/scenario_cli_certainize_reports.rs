use std::fs;
use std::path::Path;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

const RESULT_TSV: &str = "\
\"pid\"\t\"state\"\t\"label\"\t\"datastream\"
info:fedora/uuid:1\tinfo:fedora/fedora-system:def/model#Active\thttp://bitfinder/a.mp4\tinfo:fedora/fedora-system:FedoraObject-3.0/FFPROBE
info:fedora/uuid:2\tinfo:fedora/fedora-system:def/model#Inactive\thttp://bitfinder/b.mp4\tinfo:fedora/fedora-system:FedoraObject-3.0/BROADCAST_METADATA
info:fedora/uuid:2\tinfo:fedora/fedora-system:def/model#Inactive\thttp://bitfinder/b.mp4\tinfo:fedora/fedora-system:FedoraObject-3.0/FFPROBE
info:fedora/uuid:2\tinfo:fedora/fedora-system:def/model#Inactive\thttp://bitfinder/b.mp4\tinfo:fedora/fedora-system:FedoraObject-3.0/FFPROBE_ERRORS
";

const REQUIRED: &str = "\
0123456789abcdef0123456789abcdef 1024 a.mp4
c.mp4
";

fn write_inputs(dir: &Path) -> (String, String) {
    let input = dir.join("result.tsv");
    let required = dir.join("required.txt");
    fs::write(&input, RESULT_TSV).unwrap();
    fs::write(&required, REQUIRED).unwrap();
    (
        input.to_string_lossy().to_string(),
        required.to_string_lossy().to_string(),
    )
}

/// GREEN when:
/// - object lines go to stdout as uuid, filename, missing datastreams
/// - missing/extra filenames carry `-`/`+` markers on the console
/// - statistics are printed as key=value lines, counting incomplete objects
#[test]
fn certainize_console_report() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let (input, required) = write_inputs(dir.path());

    let mut cmd = Command::cargo_bin("doms")?;
    cmd.args(["certainize", "--input", &input, "--required", &required]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "uuid:1\ta.mp4\tBROADCAST_METADATA FFPROBE_ERRORS\n",
        ))
        .stdout(predicate::str::contains("uuid:2\tb.mp4\t\n"))
        .stdout(predicate::str::contains(
            "processed=4 objects=2 unparsable=0 ordering_violations=0 incomplete=1\n",
        ))
        .stdout(predicate::str::contains("-c.mp4\n"))
        .stdout(predicate::str::contains("+b.mp4\n"))
        .stdout(predicate::str::contains("-a.mp4").not());

    Ok(())
}

/// GREEN when:
/// - `--state Active` drops the Inactive object from the found set
/// - report files hold bare filenames, no markers
#[test]
fn certainize_state_filter_writes_report_files() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let (input, required) = write_inputs(dir.path());
    let objects = dir.path().join("objects.tsv");
    let missing = dir.path().join("missing.txt");
    let extra = dir.path().join("extra.txt");

    let mut cmd = Command::cargo_bin("doms")?;
    cmd.args(["certainize", "--input", &input, "--required", &required])
        .args(["--state", "Active"])
        .arg("--output")
        .arg(&objects)
        .arg("--missing")
        .arg(&missing)
        .arg("--extra")
        .arg(&extra);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("uuid:1").not());

    assert_eq!(
        fs::read_to_string(&objects)?,
        "uuid:1\ta.mp4\tBROADCAST_METADATA FFPROBE_ERRORS\nuuid:2\tb.mp4\t\n"
    );
    assert_eq!(fs::read_to_string(&missing)?, "c.mp4\n");
    assert_eq!(fs::read_to_string(&extra)?, "");

    Ok(())
}

/// GREEN when the datastream list comes from layered config.
#[test]
fn certainize_uses_configured_datastreams() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let (input, _) = write_inputs(dir.path());
    let cfg = dir.path().join("doms.yaml");
    fs::write(&cfg, "audit:\n  required_datastreams: [FFPROBE]\n")?;

    let mut cmd = Command::cargo_bin("doms")?;
    cmd.args(["certainize", "--input", &input]).arg("--config").arg(&cfg);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("uuid:1\ta.mp4\t\n"));

    Ok(())
}
