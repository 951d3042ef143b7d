// SPDX-License-Identifier: PMPL-1.0-or-later

//! Runtime translation lookup.
//!
//! A [`Translator`] is the queryable form of one catalog: only messages
//! that would ship in a release build are kept, keyed by context, source
//! text and disambiguation comment. Lookups follow Qt's rules:
//!
//! - a disambiguated lookup that misses retries without the comment,
//! - numerus messages pick a form with the catalog language's plural rule,
//! - an empty or missing form is "untranslated" and falls back to the source,
//! - `%n` is replaced by the count after the text is chosen.
//!
//! [`TranslatorStack`] layers several translators, newest first, the way
//! an application installs a base catalog and then overrides.

use crate::locale::{group_separator, LanguageTag};
use crate::placeholder::replace_count;
use crate::plural::PluralRule;
use crate::ts;
use crate::types::{Catalog, MessageKey, TranslationState, VARIANT_SEPARATOR};
use anyhow::{anyhow, Context as _, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
pub struct TranslatorOptions {
    /// Ship translations still marked unfinished (lrelease's default)
    pub include_unfinished: bool,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            include_unfinished: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Translator {
    language: Option<LanguageTag>,
    rule: PluralRule,
    entries: HashMap<MessageKey, Vec<String>>,
    by_id: HashMap<String, Vec<String>>,
}

impl Translator {
    pub fn from_catalog(catalog: &Catalog, options: TranslatorOptions) -> Self {
        let language = catalog.language_tag();
        let rule = PluralRule::resolve(language.as_ref());
        let mut entries = HashMap::new();
        let mut by_id = HashMap::new();

        for (context, message) in catalog.messages() {
            let shipped = match message.translation.state {
                TranslationState::Finished => true,
                TranslationState::Unfinished => options.include_unfinished,
                TranslationState::Obsolete | TranslationState::Vanished => false,
            };
            if !shipped || !message.is_translated() {
                continue;
            }

            let forms = message.translation.forms.clone();
            if let Some(id) = &message.id {
                by_id.entry(id.clone()).or_insert_with(|| forms.clone());
            }
            let key = message.key(context);
            if entries.contains_key(&key) {
                warn!(
                    context,
                    source = %message.source,
                    "duplicate message, keeping the first translation"
                );
                continue;
            }
            entries.insert(key, forms);
        }

        debug!(
            language = ?language,
            messages = entries.len(),
            "translator ready"
        );

        Self {
            language,
            rule,
            entries,
            by_id,
        }
    }

    pub fn load(path: &Path, options: TranslatorOptions) -> Result<Self> {
        let catalog =
            ts::read_file(path).with_context(|| format!("loading {}", path.display()))?;
        Ok(Self::from_catalog(&catalog, options))
    }

    /// Find `prefix_<locale>.ts` in `dir`, trying progressively less
    /// specific locale names and finally `prefix.ts`.
    pub fn load_for_locale(
        dir: &Path,
        prefix: &str,
        locale: &LanguageTag,
        options: TranslatorOptions,
    ) -> Result<(Self, PathBuf)> {
        let mut candidates: Vec<PathBuf> = locale
            .fallback_chain()
            .iter()
            .map(|suffix| dir.join(format!("{}_{}.ts", prefix, suffix)))
            .collect();
        candidates.push(dir.join(format!("{}.ts", prefix)));

        for candidate in &candidates {
            if candidate.is_file() {
                let translator = Self::load(candidate, options)?;
                return Ok((translator, candidate.clone()));
            }
        }
        Err(anyhow!(
            "no catalog for {} in {} (tried {})",
            locale,
            dir.display(),
            candidates
                .iter()
                .filter_map(|c| c.file_name().map(|n| n.to_string_lossy().into_owned()))
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    pub fn language(&self) -> Option<&LanguageTag> {
        self.language.as_ref()
    }

    pub fn plural_rule(&self) -> PluralRule {
        self.rule
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Translated text, or `None` when the message is untranslated.
    ///
    /// `n` selects the numerus form; without it the first form is used.
    pub fn lookup(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        n: Option<i64>,
    ) -> Option<&str> {
        let exact = MessageKey::new(context, source, disambiguation);
        let forms = match self.entries.get(&exact) {
            Some(forms) => Some(forms),
            None if disambiguation.is_some_and(|d| !d.is_empty()) => {
                self.entries.get(&MessageKey::new(context, source, None))
            }
            None => None,
        }?;
        self.pick(forms, n)
    }

    /// Lookup for messages carrying an explicit `id`.
    pub fn lookup_id(&self, id: &str, n: Option<i64>) -> Option<&str> {
        self.by_id.get(id).and_then(|forms| self.pick(forms, n))
    }

    fn pick<'a>(&self, forms: &'a [String], n: Option<i64>) -> Option<&'a str> {
        let index = n.map(|n| self.rule.form_index(n)).unwrap_or(0);
        let form = forms.get(index)?;
        // Length variants are ordered longest first; without a renderer
        // to measure against, the first one is the answer.
        let text = form.split(VARIANT_SEPARATOR).next().unwrap_or("");
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Translate with source fallback and `%n` substitution.
    pub fn translate(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        n: Option<i64>,
    ) -> String {
        let text = self
            .lookup(context, source, disambiguation, n)
            .unwrap_or(source);
        finish(text, n, self.language.as_ref())
    }
}

fn finish(text: &str, n: Option<i64>, language: Option<&LanguageTag>) -> String {
    match n {
        Some(n) => replace_count(text, n, group_separator(language)),
        None => text.to_string(),
    }
}

/// Several translators consulted newest first.
#[derive(Debug, Default)]
pub struct TranslatorStack {
    translators: Vec<Translator>,
}

impl TranslatorStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self, translator: Translator) {
        self.translators.push(translator);
    }

    /// Remove the most recently installed translator.
    pub fn pop(&mut self) -> Option<Translator> {
        self.translators.pop()
    }

    pub fn len(&self) -> usize {
        self.translators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }

    pub fn translate(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        n: Option<i64>,
    ) -> String {
        for translator in self.translators.iter().rev() {
            if let Some(text) = translator.lookup(context, source, disambiguation, n) {
                return finish(text, n, translator.language());
            }
        }
        let language = self.translators.last().and_then(|t| t.language());
        finish(source, n, language)
    }

    /// Language of the translator that answers this message: the newest
    /// one that has it, otherwise the newest installed.
    pub fn language_for(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        n: Option<i64>,
    ) -> Option<&LanguageTag> {
        self.answering(|t| t.lookup(context, source, disambiguation, n).is_some())
    }

    pub fn language_for_id(&self, id: &str, n: Option<i64>) -> Option<&LanguageTag> {
        self.answering(|t| t.lookup_id(id, n).is_some())
    }

    fn answering(&self, answers: impl Fn(&Translator) -> bool) -> Option<&LanguageTag> {
        self.translators
            .iter()
            .rev()
            .find(|&t| answers(t))
            .or_else(|| self.translators.last())
            .and_then(|t| t.language())
    }

    pub fn translate_id(&self, id: &str, n: Option<i64>) -> Option<String> {
        self.translators.iter().rev().find_map(|translator| {
            translator
                .lookup_id(id, n)
                .map(|text| finish(text, n, translator.language()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts::parse_str;

    const RU: &str = r#"<TS version="2.1" language="ru">
<context><name>AboutPage</name>
<message numerus="yes"><source>You donated %n coins</source>
<translation><numerusform>Вы пожертвовали %n монету</numerusform><numerusform>Вы пожертвовали %n монеты</numerusform><numerusform></numerusform></translation></message>
<message><source>About</source><translation type="unfinished">О программе</translation></message>
<message><source>Unknown</source><comment>Unknown language</comment><translation>Неизвестный язык</translation></message>
<message><source>Old</source><translation type="vanished">Старое</translation></message>
<message id="app.share"><source>Share</source><translation>Поделиться</translation></message>
</context></TS>"#;

    fn translator() -> Translator {
        Translator::from_catalog(&parse_str(RU).unwrap(), TranslatorOptions::default())
    }

    #[test]
    fn numerus_selects_russian_forms() {
        let t = translator();
        assert_eq!(
            t.translate("AboutPage", "You donated %n coins", None, Some(21)),
            "Вы пожертвовали 21 монету"
        );
        assert_eq!(
            t.translate("AboutPage", "You donated %n coins", None, Some(3)),
            "Вы пожертвовали 3 монеты"
        );
    }

    #[test]
    fn empty_form_falls_back_to_source() {
        let t = translator();
        assert_eq!(t.lookup("AboutPage", "You donated %n coins", None, Some(5)), None);
        assert_eq!(
            t.translate("AboutPage", "You donated %n coins", None, Some(5)),
            "You donated 5 coins"
        );
    }

    #[test]
    fn disambiguation_falls_back_to_plain() {
        let t = translator();
        assert_eq!(
            t.lookup("AboutPage", "Unknown", Some("Unknown language"), None),
            Some("Неизвестный язык")
        );
        assert_eq!(t.lookup("AboutPage", "Unknown", None, None), None);
        assert_eq!(
            t.lookup("AboutPage", "About", Some("menu entry"), None),
            Some("О программе")
        );
    }

    #[test]
    fn unfinished_respects_options() {
        let catalog = parse_str(RU).unwrap();
        let strict = Translator::from_catalog(
            &catalog,
            TranslatorOptions {
                include_unfinished: false,
            },
        );
        assert_eq!(strict.lookup("AboutPage", "About", None, None), None);
        assert_eq!(strict.translate("AboutPage", "About", None, None), "About");
    }

    #[test]
    fn vanished_messages_are_not_shipped() {
        let t = translator();
        assert_eq!(t.lookup("AboutPage", "Old", None, None), None);
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn id_lookup() {
        let t = translator();
        assert_eq!(t.lookup_id("app.share", None), Some("Поделиться"));
        assert_eq!(t.lookup_id("app.missing", None), None);

        let mut stack = TranslatorStack::new();
        stack.install(t);
        assert_eq!(stack.translate_id("app.share", None).as_deref(), Some("Поделиться"));
        assert_eq!(stack.translate_id("app.missing", None), None);
    }

    #[test]
    fn stack_prefers_newest() {
        let base = translator();
        let patch = parse_str(
            r#"<TS version="2.1" language="ru"><context><name>AboutPage</name>
<message><source>About</source><translation>Сведения</translation></message>
</context></TS>"#,
        )
        .unwrap();
        let mut stack = TranslatorStack::new();
        stack.install(base);
        stack.install(Translator::from_catalog(&patch, TranslatorOptions::default()));
        assert_eq!(stack.translate("AboutPage", "About", None, None), "Сведения");
        assert_eq!(
            stack.translate("AboutPage", "Unknown", Some("Unknown language"), None),
            "Неизвестный язык"
        );
        assert_eq!(stack.translate("Nowhere", "Missing", None, None), "Missing");
        stack.pop();
        assert_eq!(stack.translate("AboutPage", "About", None, None), "О программе");
    }

    #[test]
    fn stack_reports_answering_language() {
        let german = parse_str(
            r#"<TS version="2.1" language="de"><context><name>AboutPage</name>
<message><source>Downloads: %L1</source><translation>Downloads: %L1</translation></message>
</context></TS>"#,
        )
        .unwrap();
        let mut stack = TranslatorStack::new();
        assert_eq!(stack.language_for("AboutPage", "About", None, None), None);

        stack.install(Translator::from_catalog(&german, TranslatorOptions::default()));
        stack.install(translator());
        let answered = |tag: Option<&LanguageTag>| tag.map(|t| t.language.clone());
        assert_eq!(
            answered(stack.language_for("AboutPage", "Downloads: %L1", None, None)),
            Some("de".to_string())
        );
        assert_eq!(
            answered(stack.language_for("AboutPage", "About", None, None)),
            Some("ru".to_string())
        );
        assert_eq!(
            answered(stack.language_for("Nowhere", "Missing", None, None)),
            Some("ru".to_string())
        );
        assert_eq!(answered(stack.language_for_id("app.share", None)), Some("ru".to_string()));
    }
}
