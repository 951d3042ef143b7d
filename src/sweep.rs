// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sweep: batch scanning of every catalog under a directory
//!
//! Walks a directory tree, finds `*.ts` files, parses and checks them in
//! parallel, and produces a summary report sorted by completion (least
//! translated first).

use crate::check::{check_catalog, CheckConfig};
use crate::report::generator::catalog_stats;
use crate::ts;
use crate::types::Severity;
use anyhow::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for a sweep run
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub directory: PathBuf,
    /// Only keep catalogs below 100% completion
    pub incomplete_only: bool,
    /// Path components to skip (`build`, `3rdparty`, ...)
    pub exclude: Vec<String>,
    pub checks: CheckConfig,
}

/// Results for a single catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRow {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub messages: usize,
    pub finished: usize,
    pub unfinished: usize,
    pub obsolete: usize,
    pub percent: f64,
    pub errors: usize,
    pub warnings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Complete sweep report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub created_at: String,
    pub directory: PathBuf,
    pub catalogs_scanned: usize,
    pub catalogs_complete: usize,
    pub total_messages: usize,
    pub total_findings: usize,
    pub results: Vec<CatalogRow>,
}

fn is_excluded(path: &Path, root: &Path, exclude: &[String]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|c| {
        let name = c.as_os_str().to_string_lossy();
        exclude.iter().any(|e| *e == name)
    })
}

/// Find all TS catalogs under the given directory
pub fn discover_catalogs(directory: &Path, exclude: &[String]) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        anyhow::bail!("Not a directory: {}", directory.display());
    }

    let mut catalogs: Vec<PathBuf> = WalkDir::new(directory)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry.path(), directory, exclude))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "ts"))
        .collect();

    catalogs.sort();
    Ok(catalogs)
}

fn scan_one(path: &Path, checks: &CheckConfig) -> CatalogRow {
    match ts::read_file(path) {
        Ok(catalog) => {
            let stats = catalog_stats(&catalog);
            let findings = check_catalog(&catalog, checks);
            debug!(path = %path.display(), findings = findings.len(), "catalog scanned");
            CatalogRow {
                path: path.to_path_buf(),
                language: catalog.language.clone(),
                messages: stats.messages,
                finished: stats.finished,
                unfinished: stats.unfinished,
                obsolete: stats.obsolete,
                percent: stats.percent,
                errors: findings.iter().filter(|f| f.severity == Severity::Error).count(),
                warnings: findings
                    .iter()
                    .filter(|f| f.severity == Severity::Warning)
                    .count(),
                error: None,
            }
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "catalog could not be read");
            CatalogRow {
                path: path.to_path_buf(),
                language: None,
                messages: 0,
                finished: 0,
                unfinished: 0,
                obsolete: 0,
                percent: 0.0,
                errors: 0,
                warnings: 0,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Run sweep across all catalogs in a directory
pub fn run(config: &SweepConfig) -> Result<SweepReport> {
    let catalogs = discover_catalogs(&config.directory, &config.exclude)?;

    let mut results: Vec<CatalogRow> = catalogs
        .par_iter()
        .map(|path| scan_one(path, &config.checks))
        .collect();

    // Least translated first; ties by path for stable output
    results.sort_by(|a, b| {
        a.percent
            .total_cmp(&b.percent)
            .then_with(|| a.path.cmp(&b.path))
    });

    if config.incomplete_only {
        results.retain(|r| r.error.is_some() || r.percent < 100.0);
    }

    let catalogs_complete = results
        .iter()
        .filter(|r| r.error.is_none() && r.percent >= 100.0)
        .count();
    let total_messages = results.iter().map(|r| r.messages).sum();
    let total_findings = results.iter().map(|r| r.errors + r.warnings).sum();

    Ok(SweepReport {
        created_at: chrono::Utc::now().to_rfc3339(),
        directory: config.directory.clone(),
        catalogs_scanned: catalogs.len(),
        catalogs_complete,
        total_messages,
        total_findings,
        results,
    })
}

/// Print a summary table to the terminal
pub fn print_summary(report: &SweepReport, quiet: bool) {
    if quiet {
        return;
    }

    println!("\n=== SCAN SUMMARY ===");
    println!(
        "Directory: {}  |  Catalogs scanned: {}  |  Complete: {}",
        report.directory.display(),
        report.catalogs_scanned,
        report.catalogs_complete
    );
    println!(
        "Total messages: {}  |  Findings: {}",
        report.total_messages, report.total_findings
    );
    println!();

    if report.results.is_empty() {
        println!("  No catalogs to report.");
        return;
    }

    println!(
        "  {:<40} {:<8} {:>6} {:>6} {:>8} {:>6} {:>6}",
        "Catalog", "Lang", "Total", "Todo", "Percent", "Err", "Warn"
    );
    println!("  {}", "-".repeat(86));

    for row in &report.results {
        let name = row
            .path
            .strip_prefix(&report.directory)
            .unwrap_or(&row.path)
            .display()
            .to_string();
        if let Some(err) = &row.error {
            println!("  {:<40} ERROR: {}", name, err);
        } else {
            println!(
                "  {:<40} {:<8} {:>6} {:>6} {:>7.1}% {:>6} {:>6}",
                name,
                row.language.as_deref().unwrap_or("-"),
                row.messages,
                row.unfinished,
                row.percent,
                row.errors,
                row.warnings,
            );
        }
    }
    println!();
}

/// Write sweep report as JSON
pub fn write_report(report: &SweepReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}
