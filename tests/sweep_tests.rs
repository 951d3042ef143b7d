// SPDX-License-Identifier: PMPL-1.0-or-later

//! Tests for the scan subcommand (batch catalog scanning)

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tslingo::check::CheckConfig;
use tslingo::sweep::{self, SweepConfig};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn config(directory: &Path) -> SweepConfig {
    SweepConfig {
        directory: directory.to_path_buf(),
        incomplete_only: false,
        exclude: Vec::new(),
        checks: CheckConfig::default(),
    }
}

#[test]
fn test_sweep_empty_directory() {
    let dir = TempDir::new().unwrap();
    let report = sweep::run(&config(dir.path())).expect("sweep should succeed on empty dir");
    assert_eq!(report.catalogs_scanned, 0);
    assert_eq!(report.total_messages, 0);
    assert!(report.results.is_empty());
}

#[test]
fn test_sweep_rejects_missing_directory() {
    let dir = TempDir::new().unwrap();
    assert!(sweep::run(&config(&dir.path().join("nope"))).is_err());
}

#[test]
fn test_sweep_sorts_least_translated_first() {
    let report = sweep::run(&config(&fixtures().join("l10n"))).unwrap();
    assert_eq!(report.catalogs_scanned, 3);
    assert_eq!(report.catalogs_complete, 2);

    let names: Vec<String> = report
        .results
        .iter()
        .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["taot_fa.ts", "taot_ru.ts", "taot_zh_CN.ts"]);

    let fa = &report.results[0];
    assert_eq!(fa.language.as_deref(), Some("fa"));
    assert_eq!(fa.messages, 6);
    assert_eq!(fa.unfinished, 3);
    assert_eq!(fa.percent, 50.0);

    let ru = &report.results[1];
    assert_eq!(ru.errors, 2);
    assert_eq!(ru.warnings, 0);
}

#[test]
fn test_sweep_incomplete_only() {
    let mut cfg = config(&fixtures().join("l10n"));
    cfg.incomplete_only = true;
    let report = sweep::run(&cfg).unwrap();
    assert_eq!(report.catalogs_scanned, 3);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].language.as_deref(), Some("fa"));
}

#[test]
fn test_sweep_recurses_and_honours_exclude() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("app/translations");
    let build = dir.path().join("build/translations");
    fs::create_dir_all(&nested).unwrap();
    fs::create_dir_all(&build).unwrap();
    fs::copy(fixtures().join("l10n/taot_fa.ts"), nested.join("app_fa.ts")).unwrap();
    fs::copy(fixtures().join("l10n/taot_ru.ts"), build.join("app_ru.ts")).unwrap();
    fs::write(nested.join("README.md"), "not a catalog").unwrap();

    let report = sweep::run(&config(dir.path())).unwrap();
    assert_eq!(report.catalogs_scanned, 2);

    let mut cfg = config(dir.path());
    cfg.exclude = vec!["build".to_string()];
    let report = sweep::run(&cfg).unwrap();
    assert_eq!(report.catalogs_scanned, 1);
    assert!(report.results[0].path.ends_with("app/translations/app_fa.ts"));
}

#[test]
fn test_sweep_reports_broken_catalogs() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.ts"), "<TS version=\"2.1\"><context>").unwrap();
    let report = sweep::run(&config(dir.path())).unwrap();
    assert_eq!(report.results.len(), 1);
    assert!(report.results[0].error.is_some());
}

#[test]
fn test_sweep_report_written_as_json() {
    let dir = TempDir::new().unwrap();
    let report = sweep::run(&config(&fixtures().join("l10n"))).unwrap();
    let out = dir.path().join("reports/scan.json");
    sweep::write_report(&report, &out).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(parsed["catalogs_scanned"], 3);
    assert!(parsed["created_at"].is_string());
}
