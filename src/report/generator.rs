// SPDX-License-Identifier: PMPL-1.0-or-later

//! Catalog statistics

use crate::plural::PluralRule;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub contexts: usize,
    /// Active messages (obsolete and vanished ones excluded)
    pub messages: usize,
    pub finished: usize,
    pub unfinished: usize,
    /// Obsolete plus vanished
    pub obsolete: usize,
    pub numerus: usize,
    pub words_source: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextStats {
    pub name: String,
    pub messages: usize,
    pub finished: usize,
    pub unfinished: usize,
    pub obsolete: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogReport {
    pub created_at: String,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural_rule: Option<PluralRule>,
    pub stats: CatalogStats,
    pub contexts: Vec<ContextStats>,
    pub findings: Vec<Finding>,
}

pub struct ReportGenerator;

impl ReportGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, path: &Path, catalog: &Catalog, findings: Vec<Finding>) -> CatalogReport {
        let tag = catalog.language_tag();
        CatalogReport {
            created_at: chrono::Utc::now().to_rfc3339(),
            path: path.to_path_buf(),
            language: catalog.language.clone(),
            language_name: tag.as_ref().map(|t| t.display_name()),
            plural_rule: tag.as_ref().and_then(PluralRule::for_language),
            stats: catalog_stats(catalog),
            contexts: catalog.contexts.iter().map(context_stats).collect(),
            findings,
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn catalog_stats(catalog: &Catalog) -> CatalogStats {
    let mut stats = CatalogStats {
        contexts: catalog.contexts.len(),
        ..CatalogStats::default()
    };
    for (_, message) in catalog.messages() {
        match message.translation.state {
            TranslationState::Obsolete | TranslationState::Vanished => {
                stats.obsolete += 1;
                continue;
            }
            TranslationState::Finished => stats.finished += 1,
            TranslationState::Unfinished => stats.unfinished += 1,
        }
        stats.messages += 1;
        if message.numerus {
            stats.numerus += 1;
        }
        stats.words_source += message.source.split_whitespace().count();
    }
    stats.percent = percent(stats.finished, stats.messages);
    stats
}

pub fn context_stats(context: &Context) -> ContextStats {
    let mut row = ContextStats {
        name: context.name.clone(),
        messages: 0,
        finished: 0,
        unfinished: 0,
        obsolete: 0,
        percent: 0.0,
    };
    for message in &context.messages {
        match message.translation.state {
            TranslationState::Obsolete | TranslationState::Vanished => row.obsolete += 1,
            TranslationState::Finished => {
                row.finished += 1;
                row.messages += 1;
            }
            TranslationState::Unfinished => {
                row.unfinished += 1;
                row.messages += 1;
            }
        }
    }
    row.percent = percent(row.finished, row.messages);
    row
}

/// Completion percentage; a catalog with nothing to translate is complete.
fn percent(finished: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        finished as f64 * 100.0 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts::parse_str;

    const DOC: &str = r#"<TS version="2.0" language="fa"><context><name>AboutPage</name>
<message><source>About</source><translation>درباره</translation></message>
<message><source>Donate with PayPal</source><translation type="unfinished"></translation></message>
<message numerus="yes"><source>%n coins</source><translation type="unfinished"><numerusform></numerusform></translation></message>
<message><source>Old text</source><translation type="obsolete">قدیمی</translation></message>
</context><context><name>Empty</name></context></TS>"#;

    #[test]
    fn counts_follow_states() {
        let catalog = parse_str(DOC).unwrap();
        let stats = catalog_stats(&catalog);
        assert_eq!(stats.contexts, 2);
        assert_eq!(stats.messages, 3);
        assert_eq!(stats.finished, 1);
        assert_eq!(stats.unfinished, 2);
        assert_eq!(stats.obsolete, 1);
        assert_eq!(stats.numerus, 1);
        assert_eq!(stats.words_source, 1 + 3 + 2);
        assert!((stats.percent - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn report_carries_language_and_rows() {
        let catalog = parse_str(DOC).unwrap();
        let report = ReportGenerator::new().generate(Path::new("taot_fa.ts"), &catalog, Vec::new());
        assert_eq!(report.language.as_deref(), Some("fa"));
        assert_eq!(report.language_name.as_deref(), Some("Persian"));
        assert_eq!(report.plural_rule, Some(PluralRule::OneForm));
        assert_eq!(report.contexts.len(), 2);
        assert_eq!(report.contexts[1].percent, 100.0);
        assert_eq!(report.contexts[0].obsolete, 1);
    }
}
