// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report generation module

pub mod formatter;
pub mod generator;
pub mod output;
pub mod sarif;

use crate::types::{Catalog, Finding};
use anyhow::Result;
use std::path::Path;

pub use formatter::ReportFormatter;
pub use generator::{CatalogReport, CatalogStats, ContextStats, ReportGenerator};
pub use output::ReportOutputFormat;

/// Build the statistics report for one catalog
pub fn generate(path: &Path, catalog: &Catalog, findings: Vec<Finding>) -> CatalogReport {
    ReportGenerator::new().generate(path, catalog, findings)
}

/// Save report to file in a structured format
pub fn save_report(report: &CatalogReport, path: &Path, format: ReportOutputFormat) -> Result<()> {
    output::save(report, path, format)
}

/// Print report to console
pub fn print_report(report: &CatalogReport) {
    ReportFormatter::new().print(report);
}
