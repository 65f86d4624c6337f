//! Unused-key guard.
//!
//! GREEN when:
//! - unused keys are reported under Warn without an error
//! - unused keys fail under Fail
//! - keys under consumed prefixes are never flagged
//! - count mode flags the audit section it does not read

use doms_config::{load_layered_yaml_from_strings, report_unused_keys, ConfigMode, UnusedKeyPolicy};

const YAML: &str = r#"
risearch:
  host: "doms"
audit:
  required_state: "Active"
typo_section:
  foo: 1
  bar: 2
"#;

#[test]
fn warn_mode_reports_without_error() {
    let loaded = load_layered_yaml_from_strings(&[YAML]).unwrap();
    let report =
        report_unused_keys(ConfigMode::Certainize, &loaded.config_json, UnusedKeyPolicy::Warn)
            .expect("warn mode must not error");

    assert_eq!(
        report.unused_leaf_pointers,
        vec!["/typo_section/bar".to_string(), "/typo_section/foo".to_string()]
    );
}

#[test]
fn fail_mode_errors() {
    let loaded = load_layered_yaml_from_strings(&[YAML]).unwrap();
    let err =
        report_unused_keys(ConfigMode::Certainize, &loaded.config_json, UnusedKeyPolicy::Fail)
            .unwrap_err();
    assert!(format!("{err:?}").contains("CONFIG_UNUSED_KEYS"));
}

#[test]
fn consumed_sections_are_clean() {
    let yaml = "risearch:\n  host: \"doms\"\n  limit: 10\naudit:\n  report_interval: 1\n";
    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();
    let report =
        report_unused_keys(ConfigMode::Certainize, &loaded.config_json, UnusedKeyPolicy::Fail)
            .unwrap();
    assert!(report.is_clean());
}

#[test]
fn count_mode_accepts_shared_audit_section() {
    let yaml = "risearch:\n  host: \"doms\"\naudit:\n  required_state: \"Active\"\n\
                reporting:\n  format: \"tsv\"\n";
    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();
    let report =
        report_unused_keys(ConfigMode::Count, &loaded.config_json, UnusedKeyPolicy::Warn).unwrap();
    assert_eq!(report.unused_leaf_pointers, vec!["/reporting/format".to_string()]);
}
