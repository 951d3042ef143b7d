// SPDX-License-Identifier: PMPL-1.0-or-later

//! Catalog consistency checks
//!
//! Runs the rules translators know from Qt Linguist (accelerators,
//! ending punctuation, place markers, surrounding whitespace) plus the
//! structural problems lrelease complains about (wrong number of plural
//! forms, duplicate messages) over every active message of a catalog.

pub mod rules;

use crate::plural::PluralRule;
use crate::ts;
use crate::types::*;
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Which checks to run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    pub accelerators: bool,
    pub punctuation: bool,
    pub place_markers: bool,
    pub whitespace: bool,
    pub numerus: bool,
    pub empty: bool,
    pub duplicates: bool,
    /// Report every unfinished message as a note
    pub unfinished: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            accelerators: true,
            punctuation: true,
            place_markers: true,
            whitespace: true,
            numerus: true,
            empty: true,
            duplicates: true,
            unfinished: false,
        }
    }
}

/// Findings for one catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub findings: Vec<Finding>,
}

impl CheckReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    pub fn worst(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }
}

pub fn check_file(path: &Path, config: &CheckConfig) -> Result<CheckReport> {
    let catalog = ts::read_file(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(CheckReport {
        path: path.to_path_buf(),
        language: catalog.language.clone(),
        findings: check_catalog(&catalog, config),
    })
}

pub fn check_catalog(catalog: &Catalog, config: &CheckConfig) -> Vec<Finding> {
    Checker::new(catalog, config).run()
}

struct Checker<'a> {
    catalog: &'a Catalog,
    config: &'a CheckConfig,
    rule: Option<PluralRule>,
    findings: Vec<Finding>,
}

impl<'a> Checker<'a> {
    fn new(catalog: &'a Catalog, config: &'a CheckConfig) -> Self {
        let rule = catalog
            .language_tag()
            .as_ref()
            .and_then(PluralRule::for_language);
        Self {
            catalog,
            config,
            rule,
            findings: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Finding> {
        self.check_header();

        let mut seen = HashSet::new();
        for (context, message) in self.catalog.messages() {
            if !message.is_active() {
                continue;
            }
            if self.config.duplicates && !seen.insert(message.key(context)) {
                self.report(
                    FindingKind::Duplicate,
                    Severity::Error,
                    context,
                    message,
                    "duplicate message with the same source and disambiguation".to_string(),
                );
            }
            if self.config.unfinished && message.translation.state == TranslationState::Unfinished
            {
                self.report(
                    FindingKind::Unfinished,
                    Severity::Note,
                    context,
                    message,
                    "translation is unfinished".to_string(),
                );
            }
            if self.config.empty && message.translation.state == TranslationState::Finished {
                let forms = &message.translation.forms;
                if forms.is_empty() || forms.iter().any(|f| f.is_empty()) {
                    self.report(
                        FindingKind::EmptyFinished,
                        Severity::Warning,
                        context,
                        message,
                        "translation is marked finished but has an empty form".to_string(),
                    );
                }
            }
            if message.is_translated() {
                self.check_message(context, message);
            }
        }
        self.findings
    }

    fn check_header(&mut self) {
        match (&self.catalog.language, self.rule) {
            (None, _) => self.findings.push(Finding {
                kind: FindingKind::MissingLanguage,
                severity: Severity::Warning,
                context: None,
                source: None,
                line: None,
                message: "catalog has no language attribute; plural forms cannot be verified"
                    .to_string(),
            }),
            (Some(language), None) => self.findings.push(Finding {
                kind: FindingKind::UnknownPluralRule,
                severity: Severity::Warning,
                context: None,
                source: None,
                line: None,
                message: format!("no plural rule known for language {:?}", language),
            }),
            _ => {}
        }
    }

    fn check_message(&mut self, context: &str, message: &Message) {
        let forms = &message.translation.forms;

        if self.config.numerus && message.numerus {
            if let Some(rule) = self.rule {
                if forms.len() != rule.form_count() {
                    self.report(
                        FindingKind::NumerusForms,
                        Severity::Error,
                        context,
                        message,
                        format!(
                            "{} plural forms given, language needs {} ({})",
                            forms.len(),
                            rule.form_count(),
                            rule.form_names().join(", ")
                        ),
                    );
                }
            }
        }

        for (index, form) in forms.iter().enumerate() {
            if form.is_empty() {
                continue;
            }
            for variant in form.split(VARIANT_SEPARATOR) {
                self.check_text(context, message, index, variant);
            }
        }
    }

    fn check_text(&mut self, context: &str, message: &Message, index: usize, text: &str) {
        let source = message.source.as_str();
        let label = |detail: String| {
            if message.numerus {
                format!("form {}: {}", index + 1, detail)
            } else {
                detail
            }
        };

        if self.config.accelerators {
            if let Some(detail) = rules::accelerator_mismatch(source, text) {
                self.report(FindingKind::Accelerator, Severity::Warning, context, message, label(detail));
            }
        }
        if self.config.punctuation {
            if let Some(detail) = rules::punctuation_mismatch(source, text) {
                self.report(FindingKind::Punctuation, Severity::Warning, context, message, label(detail));
            }
        }
        if self.config.place_markers {
            if let Some(detail) = rules::place_marker_mismatch(source, text) {
                self.report(FindingKind::PlaceMarkers, Severity::Error, context, message, label(detail));
            }
            if message.numerus
                && rules::count_marker_missing(source, text)
                && self.form_covers_many_counts(index)
            {
                self.report(
                    FindingKind::CountMarker,
                    Severity::Warning,
                    context,
                    message,
                    label("%n missing in a form used for several counts".to_string()),
                );
            }
        }
        if self.config.whitespace {
            if let Some(detail) = rules::whitespace_mismatch(source, text) {
                self.report(FindingKind::Whitespace, Severity::Warning, context, message, label(detail));
            }
        }
    }

    /// A form selected by a single count (English "one coin") may spell
    /// the number out; any other form has to show it. Languages without
    /// plural distinctions are exempt.
    fn form_covers_many_counts(&self, index: usize) -> bool {
        let rule = self.rule.unwrap_or(PluralRule::English);
        rule.form_count() > 1 && (0..100).filter(|&n| rule.form_index(n) == index).count() > 1
    }

    fn report(
        &mut self,
        kind: FindingKind,
        severity: Severity,
        context: &str,
        message: &Message,
        detail: String,
    ) {
        self.findings.push(Finding {
            kind,
            severity,
            context: Some(context.to_string()),
            source: Some(message.source.clone()),
            line: message.line,
            message: detail,
        });
    }
}
