// SPDX-License-Identifier: PMPL-1.0-or-later

//! Language tags as they appear in TS `language` attributes and catalog
//! file names (`taot_zh_CN.ts`), plus the little per-locale data the
//! runtime needs: display names and the digit group separator used by
//! `%Ln` and `%L1` placeholders.

mod iso639;

pub use iso639::{is_valid_iso639_1, language_name, native_name};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed `language[_Script][_TERRITORY]` tag.
///
/// Both `_` and `-` are accepted as separators; the canonical rendering
/// uses `_`, which is what Qt writes into TS files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguageTag {
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub territory: Option<String>,
}

impl LanguageTag {
    pub fn parse(tag: &str) -> Result<Self, String> {
        let tag = tag.trim();
        // POSIX locales may carry an encoding or modifier suffix.
        let tag = tag.split(['.', '@']).next().unwrap_or("");
        let mut parts = tag.split(['_', '-']);

        let language = parts.next().unwrap_or("");
        if language.len() < 2
            || language.len() > 3
            || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(format!("invalid language tag: {:?}", tag));
        }

        let mut script = None;
        let mut territory = None;
        for part in parts {
            if part.len() == 4 && part.chars().all(|c| c.is_ascii_alphabetic()) && script.is_none()
            {
                let mut chars = part.chars();
                let head = chars.next().map(|c| c.to_ascii_uppercase());
                script = head.map(|h| {
                    std::iter::once(h)
                        .chain(chars.map(|c| c.to_ascii_lowercase()))
                        .collect()
                });
            } else if (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
                || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
            {
                territory = Some(part.to_ascii_uppercase());
            } else {
                return Err(format!("invalid subtag {:?} in {:?}", part, tag));
            }
        }

        Ok(Self {
            language: language.to_ascii_lowercase(),
            script,
            territory,
        })
    }

    /// Candidate suffixes from most to least specific, as used when
    /// searching for `prefix_<suffix>.ts`.
    pub fn fallback_chain(&self) -> Vec<String> {
        let mut chain = Vec::new();
        if let (Some(script), Some(territory)) = (&self.script, &self.territory) {
            chain.push(format!("{}_{}_{}", self.language, script, territory));
        }
        if let Some(script) = &self.script {
            chain.push(format!("{}_{}", self.language, script));
        }
        if let Some(territory) = &self.territory {
            chain.push(format!("{}_{}", self.language, territory));
        }
        chain.push(self.language.clone());
        chain
    }

    pub fn display_name(&self) -> String {
        let base = language_name(&self.language).unwrap_or(&self.language);
        match &self.territory {
            Some(territory) => format!("{} ({})", base, territory),
            None => base.to_string(),
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)?;
        if let Some(script) = &self.script {
            write!(f, "_{}", script)?;
        }
        if let Some(territory) = &self.territory {
            write!(f, "_{}", territory)?;
        }
        Ok(())
    }
}

/// Digit group separator for localized numbers.
pub fn group_separator(tag: Option<&LanguageTag>) -> char {
    let Some(tag) = tag else {
        return ',';
    };
    match tag.language.as_str() {
        "de" | "da" | "es" | "id" | "it" | "nl" | "pt" | "tr" | "el" | "sl" | "hr" | "ro" => '.',
        "fr" | "ru" | "uk" | "pl" | "cs" | "sk" | "fi" | "sv" | "nb" | "no" | "bg" | "hu"
        | "lt" | "lv" | "et" => '\u{a0}',
        "fa" | "ar" => '\u{66c}',
        _ => ',',
    }
}
