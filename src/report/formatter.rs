// SPDX-License-Identifier: PMPL-1.0-or-later

//! Terminal rendering of reports

use crate::check::CheckReport;
use crate::merge::MergeSummary;
use crate::report::CatalogReport;
use crate::types::{Finding, Severity};
use colored::*;
use std::path::Path;

pub struct ReportFormatter;

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn print(&self, report: &CatalogReport) {
        println!("\n{}", "=== TSLINGO CATALOG REPORT ===".bold().cyan());
        println!();
        println!("  File: {}", report.path.display());
        match (&report.language, &report.language_name) {
            (Some(code), Some(name)) => println!("  Language: {} ({})", code, name),
            (Some(code), None) => println!("  Language: {}", code),
            _ => println!("  Language: {}", "not set".yellow()),
        }
        if let Some(rule) = report.plural_rule {
            println!("  Plural rule: {:?}", rule);
        }
        println!();

        let stats = &report.stats;
        println!("{}", "MESSAGES".bold().yellow());
        println!("    Contexts: {}", stats.contexts);
        println!("    Messages: {}", stats.messages);
        println!("    Finished: {}", stats.finished);
        println!("    Unfinished: {}", stats.unfinished);
        println!("    Obsolete: {}", stats.obsolete);
        println!("    Numerus: {}", stats.numerus);
        println!("    Source words: {}", stats.words_source);
        println!("  Completion: {}", colored_percent(stats.percent).bold());
        println!();

        if !report.contexts.is_empty() {
            println!("{}", "CONTEXTS".bold().yellow());
            println!(
                "  {:<36} {:>6} {:>6} {:>6} {:>8}",
                "Context", "Total", "Done", "Todo", "Percent"
            );
            println!("  {}", "-".repeat(66));
            for row in &report.contexts {
                println!(
                    "  {:<36} {:>6} {:>6} {:>6} {:>8}",
                    row.name,
                    row.messages,
                    row.finished,
                    row.unfinished,
                    colored_percent(row.percent)
                );
            }
            println!();
        }

        self.print_findings(&report.path, &report.findings);
    }

    pub fn print_check(&self, report: &CheckReport) {
        println!(
            "{} {}",
            "CHECK".bold().yellow(),
            report.path.display().to_string().bold()
        );
        self.print_findings(&report.path, &report.findings);
        println!(
            "  {} errors, {} warnings, {} notes",
            report.count(Severity::Error),
            report.count(Severity::Warning),
            report.count(Severity::Note)
        );
        println!();
    }

    fn print_findings(&self, path: &Path, findings: &[Finding]) {
        if findings.is_empty() {
            println!("  {}", "No findings".green());
            return;
        }
        for finding in findings {
            let location = match finding.line {
                Some(line) => format!("{}:{}", path.display(), line),
                None => path.display().to_string(),
            };
            let subject = match (&finding.context, &finding.source) {
                (Some(context), Some(source)) => format!(" {} {:?}", context.bold(), source),
                _ => String::new(),
            };
            println!(
                "  {}: {} [{}]{}: {}",
                location,
                colored_severity(finding.severity),
                finding.kind.name(),
                subject,
                finding.message
            );
        }
    }

    pub fn print_merge(&self, output: &Path, summary: &MergeSummary) {
        println!("{} {}", "MERGED".bold().yellow(), output.display());
        println!("    Kept: {}", summary.kept);
        println!("    Same text: {}", summary.same_text);
        println!("    New: {}", summary.new.to_string().cyan());
        println!("    Obsoleted: {}", summary.obsoleted);
        println!("    Dropped: {}", summary.dropped);
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn colored_severity(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow(),
        Severity::Note => "note".blue(),
    }
}

pub fn colored_percent(percent: f64) -> ColoredString {
    let text = format!("{:.1}%", percent);
    if percent >= 100.0 {
        text.green()
    } else if percent >= 50.0 {
        text.yellow()
    } else {
        text.red()
    }
}
