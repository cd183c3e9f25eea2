//! Integration tests for CLI config parsing and util helpers.

use std::path::Path;

use phantasus_cli::config::{load_cli_config, CliConfig};
use phantasus_cli::util::{ensure_output_dir, tsv_path};

// ---------------------------------------------------------------------------
// CliConfig
// ---------------------------------------------------------------------------

#[test]
fn default_config_values() {
    let cfg = CliConfig::default();
    assert!(cfg.loader.timeout_secs > 0);
    assert!(cfg.loader.base_url.starts_with("https://"));
    assert!(cfg.output_dir.is_none());
}

#[test]
fn config_round_trips_json() {
    let cfg = CliConfig::default();
    let json = serde_json::to_string(&cfg).unwrap();
    let back: CliConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(cfg, back);
}

#[test]
fn partial_config_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phantasus.json");
    std::fs::write(
        &path,
        r#"{ "loader": { "timeout_secs": 7 }, "output_dir": "exports" }"#,
    )
    .unwrap();

    let cfg = load_cli_config(&path).unwrap();
    assert_eq!(cfg.loader.timeout_secs, 7);
    assert_eq!(cfg.loader.connect_timeout_secs, CliConfig::default().loader.connect_timeout_secs);
    assert_eq!(cfg.output_dir.as_deref(), Some("exports"));
}

#[test]
fn malformed_config_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = load_cli_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config"));
}

// ---------------------------------------------------------------------------
// util
// ---------------------------------------------------------------------------

#[test]
fn ensure_output_dir_creates_nested() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("a").join("b");
    let made = ensure_output_dir(target.to_str().unwrap()).unwrap();
    assert!(made.is_dir());
}

#[test]
fn ensure_output_dir_rejects_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("taken");
    std::fs::write(&file, "x").unwrap();
    assert!(ensure_output_dir(file.to_str().unwrap()).is_err());
}

#[test]
fn tsv_path_keeps_accession_names() {
    assert_eq!(
        tsv_path(Path::new("out"), "GSE5000-GPL96"),
        Path::new("out").join("GSE5000-GPL96.tsv")
    );
}
