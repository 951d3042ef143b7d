// SPDX-License-Identifier: PMPL-1.0-or-later

//! Template synchronisation
//!
//! Brings an existing translated catalog up to date with a freshly
//! extracted template, the way `lupdate` does: translations follow their
//! message key, provenance follows the template, and messages that left
//! the sources are kept as obsolete so their work is not lost.

use crate::plural::PluralRule;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct MergeOptions {
    /// Remove messages that are no longer in the template
    pub drop_obsolete: bool,
    /// Reuse the translation of an identical source text from another context
    pub same_text: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            drop_obsolete: false,
            same_text: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummary {
    pub kept: usize,
    pub same_text: usize,
    pub new: usize,
    pub obsoleted: usize,
    pub dropped: usize,
}

pub fn merge(template: &Catalog, existing: &Catalog, options: MergeOptions) -> (Catalog, MergeSummary) {
    let rule = PluralRule::resolve(
        existing
            .language_tag()
            .or_else(|| template.language_tag())
            .as_ref(),
    );

    let by_key: HashMap<MessageKey, &Message> = {
        let mut map = HashMap::new();
        for (context, message) in existing.messages() {
            map.entry(message.key(context)).or_insert(message);
        }
        map
    };
    let by_source: HashMap<(&str, bool), &Message> = {
        let mut map = HashMap::new();
        for (_, message) in existing.messages() {
            if message.is_active() && message.is_translated() {
                map.entry((message.source.as_str(), message.numerus))
                    .or_insert(message);
            }
        }
        map
    };

    let mut merged = Catalog {
        version: existing.version.clone(),
        language: existing.language.clone().or_else(|| template.language.clone()),
        source_language: existing
            .source_language
            .clone()
            .or_else(|| template.source_language.clone()),
        contexts: Vec::new(),
    };
    let mut summary = MergeSummary::default();
    let mut wanted = HashSet::new();

    for context in &template.contexts {
        let target = merged.context_mut(&context.name);
        if target.comment.is_none() {
            target.comment = context.comment.clone();
        }
        for message in &context.messages {
            let key = message.key(&context.name);
            let mut unit = message.clone();
            unit.line = None;

            if let Some(previous) = by_key.get(&key) {
                unit.translation = previous.translation.clone();
                if !previous.is_active() {
                    unit.translation.state = TranslationState::Unfinished;
                }
                unit.translator_comment = previous.translator_comment.clone();
                summary.kept += 1;
            } else if let Some(similar) = by_source
                .get(&(message.source.as_str(), message.numerus))
                .filter(|_| options.same_text)
            {
                unit.translation = similar.translation.clone();
                unit.translation.state = TranslationState::Unfinished;
                summary.same_text += 1;
                debug!(context = %context.name, source = %message.source, "same-text match");
            } else {
                let forms = if message.numerus { rule.form_count() } else { 1 };
                unit.translation = Translation::unfinished(forms);
                summary.new += 1;
            }

            wanted.insert(key);
            target.messages.push(unit);
        }
    }

    let retired = if merged.format_version() >= (2, 1) {
        TranslationState::Vanished
    } else {
        TranslationState::Obsolete
    };
    let mut seen = HashSet::new();
    for (context, message) in existing.messages() {
        let key = message.key(context);
        if !seen.insert(key.clone()) {
            warn!(context, source = %message.source, "duplicate message dropped");
            summary.dropped += 1;
            continue;
        }
        if wanted.contains(&key) {
            continue;
        }
        if options.drop_obsolete || !message.is_translated() {
            summary.dropped += 1;
            continue;
        }
        let mut unit = message.clone();
        unit.line = None;
        if unit.is_active() {
            unit.translation.state = retired;
        }
        merged.context_mut(context).messages.push(unit);
        summary.obsoleted += 1;
    }

    info!(
        kept = summary.kept,
        same_text = summary.same_text,
        new = summary.new,
        obsoleted = summary.obsoleted,
        dropped = summary.dropped,
        "merge complete"
    );
    (merged, summary)
}
