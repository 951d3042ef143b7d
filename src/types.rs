// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for tslingo
//!
//! Mirrors the structure of a Qt Linguist TS document: a catalog holds
//! contexts, a context holds messages, and every message carries its
//! source text, disambiguation, translator notes, provenance and the
//! translation itself (one form, or one form per plural category).

use crate::locale::LanguageTag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A whole translation catalog (one `.ts` file)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: String,
    pub language: Option<String>,
    pub source_language: Option<String>,
    pub contexts: Vec<Context>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            version: "2.1".to_string(),
            language: None,
            source_language: None,
            contexts: Vec::new(),
        }
    }
}

impl Catalog {
    /// Iterate all messages in document order together with their context name.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.contexts
            .iter()
            .flat_map(|ctx| ctx.messages.iter().map(move |m| (ctx.name.as_str(), m)))
    }

    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|c| c.messages.len()).sum()
    }

    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Get the context with the given name, appending an empty one if missing.
    pub fn context_mut(&mut self, name: &str) -> &mut Context {
        let index = match self.contexts.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.contexts.push(Context::new(name));
                self.contexts.len() - 1
            }
        };
        &mut self.contexts[index]
    }

    /// Find a message by its identity. An absent comment matches only
    /// messages without a disambiguation comment.
    pub fn find(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&Message> {
        let comment = comment.unwrap_or("");
        self.context(context)?
            .messages
            .iter()
            .find(|m| m.source == source && m.comment.as_deref().unwrap_or("") == comment)
    }

    pub fn language_tag(&self) -> Option<LanguageTag> {
        self.language
            .as_deref()
            .and_then(|lang| LanguageTag::parse(lang).ok())
    }

    /// Major/minor TS format version, `(2, 1)` when unparseable.
    pub fn format_version(&self) -> (u32, u32) {
        let mut parts = self.version.split('.');
        let major = parts.next().and_then(|p| p.trim().parse().ok());
        let minor = parts.next().and_then(|p| p.trim().parse().ok()).unwrap_or(0);
        match major {
            Some(major) => (major, minor),
            None => (2, 1),
        }
    }
}

/// A named group of messages, usually one per UI class or QML component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    pub comment: Option<String>,
    pub messages: Vec<Message>,
}

impl Context {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            comment: None,
            messages: Vec::new(),
        }
    }
}

/// A single translation unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_source: Option<String>,
    /// Disambiguation comment; part of the message identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translator_comment: Option<String>,
    pub locations: Vec<Location>,
    pub numerus: bool,
    pub translation: Translation,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
    /// Line of the `<message>` element in the TS file it was read from
    #[serde(skip)]
    pub line: Option<usize>,
}

impl Message {
    pub fn new(source: &str) -> Self {
        Self {
            id: None,
            source: source.to_string(),
            old_source: None,
            comment: None,
            old_comment: None,
            extra_comment: None,
            translator_comment: None,
            locations: Vec::new(),
            numerus: false,
            translation: Translation::unfinished(1),
            extras: BTreeMap::new(),
            line: None,
        }
    }

    pub fn key(&self, context: &str) -> MessageKey {
        MessageKey::new(context, &self.source, self.comment.as_deref())
    }

    /// True when at least one translated form has text.
    pub fn is_translated(&self) -> bool {
        self.translation.forms.iter().any(|f| !f.is_empty())
    }

    /// Obsolete and vanished messages are kept for reference only.
    pub fn is_active(&self) -> bool {
        !matches!(
            self.translation.state,
            TranslationState::Obsolete | TranslationState::Vanished
        )
    }

    /// First recorded provenance as `file:line`.
    pub fn origin(&self) -> Option<String> {
        self.locations.first().map(|loc| loc.to_string())
    }
}

/// Where a message was extracted from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub filename: String,
    pub line: Option<u32>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.filename, line),
            None => write!(f, "{}", self.filename),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationState {
    Finished,
    Unfinished,
    Obsolete,
    Vanished,
}

impl TranslationState {
    /// Value of the `type` attribute; `None` for finished translations.
    pub fn attribute(&self) -> Option<&'static str> {
        match self {
            TranslationState::Finished => None,
            TranslationState::Unfinished => Some("unfinished"),
            TranslationState::Obsolete => Some("obsolete"),
            TranslationState::Vanished => Some("vanished"),
        }
    }

    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "" | "finished" => Some(TranslationState::Finished),
            "unfinished" => Some(TranslationState::Unfinished),
            "obsolete" => Some(TranslationState::Obsolete),
            "vanished" => Some(TranslationState::Vanished),
            _ => None,
        }
    }
}

/// Translated text of a message.
///
/// Non-numerus messages have exactly one form. Numerus messages have one
/// form per plural category of the target language. A form may contain
/// length variants separated by U+009C when `variants` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub state: TranslationState,
    pub forms: Vec<String>,
    #[serde(default)]
    pub variants: bool,
}

/// Separator between length variants of a single form
pub const VARIANT_SEPARATOR: char = '\u{9c}';

impl Translation {
    pub fn finished(text: &str) -> Self {
        Self {
            state: TranslationState::Finished,
            forms: vec![text.to_string()],
            variants: false,
        }
    }

    pub fn unfinished(form_count: usize) -> Self {
        Self {
            state: TranslationState::Unfinished,
            forms: vec![String::new(); form_count.max(1)],
            variants: false,
        }
    }

    /// The first form, or an empty string.
    pub fn text(&self) -> &str {
        self.forms.first().map(String::as_str).unwrap_or("")
    }
}

/// Identity of a message inside a catalog: context, source text and
/// disambiguation comment (empty when absent).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageKey {
    pub context: String,
    pub source: String,
    pub comment: String,
}

impl MessageKey {
    pub fn new(context: &str, source: &str, comment: Option<&str>) -> Self {
        Self {
            context: context.to_string(),
            source: source.to_string(),
            comment: comment.unwrap_or("").to_string(),
        }
    }
}

/// Severity of a check finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Kind of consistency problem found in a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    Accelerator,
    Punctuation,
    PlaceMarkers,
    CountMarker,
    Whitespace,
    NumerusForms,
    EmptyFinished,
    Duplicate,
    Unfinished,
    MissingLanguage,
    UnknownPluralRule,
}

impl FindingKind {
    pub fn all() -> Vec<Self> {
        vec![
            FindingKind::Accelerator,
            FindingKind::Punctuation,
            FindingKind::PlaceMarkers,
            FindingKind::CountMarker,
            FindingKind::Whitespace,
            FindingKind::NumerusForms,
            FindingKind::EmptyFinished,
            FindingKind::Duplicate,
            FindingKind::Unfinished,
            FindingKind::MissingLanguage,
            FindingKind::UnknownPluralRule,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            FindingKind::Accelerator => "accelerator",
            FindingKind::Punctuation => "punctuation",
            FindingKind::PlaceMarkers => "place-markers",
            FindingKind::CountMarker => "count-marker",
            FindingKind::Whitespace => "whitespace",
            FindingKind::NumerusForms => "numerus-forms",
            FindingKind::EmptyFinished => "empty-finished",
            FindingKind::Duplicate => "duplicate",
            FindingKind::Unfinished => "unfinished",
            FindingKind::MissingLanguage => "missing-language",
            FindingKind::UnknownPluralRule => "unknown-plural-rule",
        }
    }
}

/// A single problem reported by the checker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Line of the offending message in the TS file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        let mut catalog = Catalog {
            language: Some("zh_CN".to_string()),
            ..Catalog::default()
        };
        let ctx = catalog.context_mut("GoogleTranslate");
        let mut unknown = Message::new("Unknown (%1)");
        unknown.comment = Some("Unknown language".to_string());
        unknown.translation = Translation::finished("未知语言(%1)");
        ctx.messages.push(unknown);
        let mut plain = Message::new("Unknown (%1)");
        plain.translation = Translation::finished("未知(%1)");
        ctx.messages.push(plain);
        catalog
    }

    #[test]
    fn find_respects_disambiguation() {
        let catalog = sample();
        let with = catalog
            .find("GoogleTranslate", "Unknown (%1)", Some("Unknown language"))
            .unwrap();
        assert_eq!(with.translation.text(), "未知语言(%1)");
        let without = catalog.find("GoogleTranslate", "Unknown (%1)", None).unwrap();
        assert_eq!(without.translation.text(), "未知(%1)");
        assert!(catalog.find("Other", "Unknown (%1)", None).is_none());
    }

    #[test]
    fn context_mut_reuses_existing() {
        let mut catalog = sample();
        catalog.context_mut("GoogleTranslate");
        catalog.context_mut("MainPage");
        assert_eq!(catalog.contexts.len(), 2);
        assert_eq!(catalog.message_count(), 2);
    }

    #[test]
    fn format_version_parses() {
        let mut catalog = Catalog::default();
        catalog.version = "2.0".to_string();
        assert_eq!(catalog.format_version(), (2, 0));
        catalog.version = "junk".to_string();
        assert_eq!(catalog.format_version(), (2, 1));
    }

    #[test]
    fn translation_state_attributes() {
        assert_eq!(TranslationState::Finished.attribute(), None);
        assert_eq!(
            TranslationState::from_attribute("vanished"),
            Some(TranslationState::Vanished)
        );
        assert_eq!(TranslationState::from_attribute("bogus"), None);
    }

    #[test]
    fn severity_orders_by_gravity() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Note);
    }
}
