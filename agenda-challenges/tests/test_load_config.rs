use agenda_challenges::load_config::{load_config, PROGRAM_ENV};
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn config_file(yaml: &str) -> NamedTempFile {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), yaml).unwrap();
    config_file
}

/// A full config maps every field onto the core run config.
#[test]
#[serial]
fn test_load_config_full() {
    env::remove_var(PROGRAM_ENV);
    let file = config_file(
        r#"
challenges: data/challenges.yaml
base_pdf: data/agenda_a4.pdf
output: out/output.pdf
work_dir: ./tmp/run
pages: 12
per_page: 8
mandatory: [tachadas]
max_attempts: 5000
template_dir: odt
converter:
  program: soffice
"#,
    );

    let config = load_config(file.path()).expect("Config should load");

    let generate = &config.generate;
    assert_eq!(generate.challenges, PathBuf::from("data/challenges.yaml"));
    assert_eq!(generate.base_pdf, PathBuf::from("data/agenda_a4.pdf"));
    assert_eq!(generate.output, PathBuf::from("out/output.pdf"));
    assert_eq!(generate.work_dir, PathBuf::from("./tmp/run"));
    assert_eq!(generate.pages, 12);
    assert_eq!(generate.per_page, 8);
    assert_eq!(generate.mandatory, vec!["tachadas".to_string()]);
    assert_eq!(generate.max_attempts, Some(5000));
    assert_eq!(generate.template_dir, Some(PathBuf::from("odt")));
    assert_eq!(config.converter.program, "soffice");
}

/// Omitted optional fields fall back to their defaults.
#[test]
#[serial]
fn test_load_config_defaults() {
    env::remove_var(PROGRAM_ENV);
    let file = config_file(
        r#"
challenges: challenges.yaml
base_pdf: agenda_a4.pdf
output: output.pdf
"#,
    );

    let config = load_config(file.path()).expect("Minimal config should load");

    assert_eq!(config.generate.work_dir, PathBuf::from("tmp"));
    assert_eq!(config.generate.pages, 10);
    assert_eq!(config.generate.per_page, 10);
    assert_eq!(config.generate.mandatory, vec!["tachadas".to_string()]);
    assert_eq!(config.generate.max_attempts, None);
    assert_eq!(config.generate.template_dir, None);
    assert_eq!(config.converter.program, "libreoffice");
}

#[test]
#[serial]
fn test_load_config_env_overrides_program() {
    let file = config_file(
        r#"
challenges: challenges.yaml
base_pdf: agenda_a4.pdf
output: output.pdf
converter:
  program: soffice
"#,
    );

    env::set_var(PROGRAM_ENV, "/opt/libreoffice/program/soffice");
    let result = load_config(file.path());
    env::remove_var(PROGRAM_ENV);

    let config = result.expect("Config should load");
    assert_eq!(config.converter.program, "/opt/libreoffice/program/soffice");
}

#[test]
#[serial]
fn test_load_config_errors_on_missing_fields() {
    let file = config_file("challenges: challenges.yaml\n");

    let err = load_config(file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("parse"), "Parse error expected, got: {msg}");
}

/// This test ensures that if the config file is not valid YAML, load_config errors and reports as such.
#[test]
#[serial]
fn test_load_config_errors_for_invalid_file() {
    let file = config_file("not-yaml: [:::");

    let err = load_config(file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
#[serial]
fn test_load_config_errors_for_missing_file() {
    let err = load_config("does/not/exist.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
#[serial]
fn test_load_config_empty_mandatory_list_disables_default() {
    env::remove_var(PROGRAM_ENV);
    let file = config_file(
        r#"
challenges: challenges.txt
base_pdf: agenda_a4.pdf
output: output.pdf
mandatory: []
"#,
    );

    let config = load_config(file.path()).expect("Config should load");
    assert!(config.generate.mandatory.is_empty());
    assert!(config.generate.sampling_rules().mandatory.is_empty());
}
