// SPDX-License-Identifier: PMPL-1.0-or-later

//! Plural-form ("numerus") rules.
//!
//! Each rule family decides how many translated forms a numerus message
//! needs in a language and which form a count selects. The families and
//! their language assignments follow the ones Qt Linguist writes into
//! compiled catalogs, so a TS file produced for Qt lines up with the
//! forms chosen here.

use crate::locale::LanguageTag;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluralRule {
    /// A single form for every count (Chinese, Japanese, Persian, ...)
    OneForm,
    /// `n == 1` singular, everything else plural
    English,
    /// `n <= 1` singular
    French,
    Latvian,
    Icelandic,
    Irish,
    /// Czech and Slovak: 1, 2-4, other
    Slovak,
    Macedonian,
    Lithuanian,
    /// East and South Slavic except Polish
    Russian,
    Polish,
    Romanian,
    Slovenian,
    Maltese,
    Welsh,
    Arabic,
    Tagalog,
}

impl PluralRule {
    pub fn for_language(tag: &LanguageTag) -> Option<Self> {
        if tag.language == "pt" && tag.territory.as_deref() == Some("BR") {
            return Some(PluralRule::French);
        }
        let rule = match tag.language.as_str() {
            "bi" | "bo" | "dz" | "fa" | "fj" | "gn" | "hu" | "id" | "ja" | "jv" | "ko" | "ms"
            | "my" | "na" | "om" | "su" | "th" | "tr" | "tt" | "vi" | "yo" | "za" | "zh" => {
                PluralRule::OneForm
            }
            "aa" | "ab" | "af" | "am" | "as" | "ay" | "az" | "bg" | "bn" | "ca" | "co" | "da"
            | "de" | "el" | "en" | "eo" | "es" | "et" | "eu" | "fi" | "fo" | "fy" | "gl" | "gu"
            | "ha" | "he" | "hi" | "hy" | "ia" | "ie" | "it" | "ka" | "kk" | "kl" | "km" | "kn"
            | "ks" | "ku" | "ky" | "la" | "lb" | "lo" | "ml" | "mn" | "mr" | "nb" | "ne" | "nl"
            | "nn" | "no" | "oc" | "or" | "pa" | "ps" | "pt" | "qu" | "rm" | "rw" | "sd" | "si"
            | "so" | "sq" | "sv" | "sw" | "ta" | "te" | "tg" | "ti" | "tk" | "to" | "ts" | "ug"
            | "ur" | "uz" | "vo" | "xh" | "yi" | "zu" => PluralRule::English,
            "br" | "fr" | "ln" => PluralRule::French,
            "lv" => PluralRule::Latvian,
            "is" => PluralRule::Icelandic,
            "dv" | "ga" | "gd" | "gv" | "iu" | "mi" | "sa" | "se" | "sm" => PluralRule::Irish,
            "cs" | "sk" => PluralRule::Slovak,
            "mk" => PluralRule::Macedonian,
            "lt" => PluralRule::Lithuanian,
            "be" | "bs" | "hr" | "ru" | "sr" | "uk" => PluralRule::Russian,
            "pl" => PluralRule::Polish,
            "mo" | "ro" => PluralRule::Romanian,
            "sl" => PluralRule::Slovenian,
            "mt" => PluralRule::Maltese,
            "cy" => PluralRule::Welsh,
            "ar" => PluralRule::Arabic,
            "fil" | "tl" => PluralRule::Tagalog,
            _ => return None,
        };
        Some(rule)
    }

    /// Rule for an optional tag, falling back to English-style plurals.
    pub fn resolve(tag: Option<&LanguageTag>) -> Self {
        match tag {
            Some(tag) => Self::for_language(tag).unwrap_or_else(|| {
                warn!(language = %tag, "no plural rule known, using English-style forms");
                PluralRule::English
            }),
            None => PluralRule::English,
        }
    }

    pub fn form_count(&self) -> usize {
        self.form_names().len()
    }

    /// Names Linguist shows translators for each form.
    pub fn form_names(&self) -> &'static [&'static str] {
        match self {
            PluralRule::OneForm => &["Universal Form"],
            PluralRule::English | PluralRule::French | PluralRule::Icelandic => {
                &["Singular", "Plural"]
            }
            PluralRule::Latvian => &["Singular", "Plural", "Nullar"],
            PluralRule::Irish => &["Singular", "Dual", "Plural"],
            PluralRule::Slovak
            | PluralRule::Lithuanian
            | PluralRule::Russian
            | PluralRule::Polish => &["Singular", "Paucal", "Plural"],
            PluralRule::Macedonian => &["Singular", "Dual", "Plural"],
            PluralRule::Romanian => &["Singular", "Paucal", "Plural"],
            PluralRule::Slovenian => &["Singular", "Dual", "Trial", "Plural"],
            PluralRule::Maltese => &["Singular", "Paucal", "Greater Paucal", "Plural"],
            PluralRule::Welsh => &["Nullar", "Singular", "Dual", "Sexal", "Plural"],
            PluralRule::Arabic => &[
                "Nullar",
                "Singular",
                "Dual",
                "Minority Plural",
                "Plural",
                "Plural (100-102, ...)",
            ],
            PluralRule::Tagalog => &["Singular", "Plural (consonant-ended)", "Plural (vowel-ended)"],
        }
    }

    /// Index of the form a count selects. Always `< form_count()`.
    pub fn form_index(&self, n: i64) -> usize {
        let n = n.unsigned_abs();
        let m10 = n % 10;
        let m100 = n % 100;
        match self {
            PluralRule::OneForm => 0,
            PluralRule::English => usize::from(n != 1),
            PluralRule::French => usize::from(n > 1),
            PluralRule::Latvian => {
                if m10 == 1 && m100 != 11 {
                    0
                } else if n != 0 {
                    1
                } else {
                    2
                }
            }
            PluralRule::Icelandic => usize::from(!(m10 == 1 && m100 != 11)),
            PluralRule::Irish => match n {
                1 => 0,
                2 => 1,
                _ => 2,
            },
            PluralRule::Slovak => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            PluralRule::Macedonian => match m10 {
                1 => 0,
                2 => 1,
                _ => 2,
            },
            PluralRule::Lithuanian => {
                if m10 == 1 && m100 != 11 {
                    0
                } else if m10 >= 2 && !(10..20).contains(&m100) {
                    1
                } else {
                    2
                }
            }
            PluralRule::Russian => {
                if m10 == 1 && m100 != 11 {
                    0
                } else if (2..=4).contains(&m10) && !(10..20).contains(&m100) {
                    1
                } else {
                    2
                }
            }
            PluralRule::Polish => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&m10) && !(10..20).contains(&m100) {
                    1
                } else {
                    2
                }
            }
            PluralRule::Romanian => {
                if n == 1 {
                    0
                } else if n == 0 || (1..=19).contains(&m100) {
                    1
                } else {
                    2
                }
            }
            PluralRule::Slovenian => match m100 {
                1 => 0,
                2 => 1,
                3 | 4 => 2,
                _ => 3,
            },
            PluralRule::Maltese => {
                if n == 1 {
                    0
                } else if n == 0 || (1..=10).contains(&m100) {
                    1
                } else if (11..=19).contains(&m100) {
                    2
                } else {
                    3
                }
            }
            PluralRule::Welsh => match n {
                0 => 0,
                1 => 1,
                2..=5 => 2,
                6 => 3,
                _ => 4,
            },
            PluralRule::Arabic => {
                if n <= 2 {
                    n as usize
                } else if (3..=10).contains(&m100) {
                    3
                } else if m100 >= 11 {
                    4
                } else {
                    5
                }
            }
            PluralRule::Tagalog => {
                if n <= 1 {
                    0
                } else if matches!(m10, 4 | 6 | 9) {
                    1
                } else {
                    2
                }
            }
        }
    }

    /// A small count that selects each form, for previews. `None` when no
    /// count below 1000 reaches the form.
    pub fn sample_for_form(&self, form: usize) -> Option<i64> {
        (0..1000).find(|&n| self.form_index(n) == form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(tag: &str) -> PluralRule {
        PluralRule::for_language(&LanguageTag::parse(tag).unwrap()).unwrap()
    }

    #[test]
    fn catalog_languages_resolve() {
        assert_eq!(rule("fa"), PluralRule::OneForm);
        assert_eq!(rule("zh_CN"), PluralRule::OneForm);
        assert_eq!(rule("en"), PluralRule::English);
        assert_eq!(rule("pt_BR"), PluralRule::French);
        assert_eq!(rule("pt_PT"), PluralRule::English);
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let tag = LanguageTag::parse("xx").unwrap();
        assert_eq!(PluralRule::for_language(&tag), None);
        assert_eq!(PluralRule::resolve(Some(&tag)), PluralRule::English);
        assert_eq!(PluralRule::resolve(None), PluralRule::English);
    }

    #[test]
    fn russian_forms() {
        let ru = rule("ru");
        assert_eq!(ru.form_count(), 3);
        assert_eq!(ru.form_index(1), 0);
        assert_eq!(ru.form_index(21), 0);
        assert_eq!(ru.form_index(11), 2);
        assert_eq!(ru.form_index(3), 1);
        assert_eq!(ru.form_index(13), 2);
        assert_eq!(ru.form_index(24), 1);
        assert_eq!(ru.form_index(5), 2);
        assert_eq!(ru.form_index(-1), 0);
    }

    #[test]
    fn tagalog_forms() {
        let tl = rule("tl");
        assert_eq!(rule("fil"), tl);
        assert_eq!(tl.form_count(), 3);
        assert_eq!(tl.form_index(0), 0);
        assert_eq!(tl.form_index(1), 0);
        assert_eq!(tl.form_index(4), 1);
        assert_eq!(tl.form_index(16), 1);
        assert_eq!(tl.form_index(29), 1);
        assert_eq!(tl.form_index(2), 2);
        assert_eq!(tl.form_index(10), 2);
        assert_eq!(tl.form_index(23), 2);
    }

    #[test]
    fn polish_and_french_differ_from_english() {
        let pl = rule("pl");
        assert_eq!(pl.form_index(1), 0);
        assert_eq!(pl.form_index(21), 2);
        assert_eq!(pl.form_index(22), 1);
        assert_eq!(rule("fr").form_index(0), 0);
        assert_eq!(rule("en").form_index(0), 1);
    }

    #[test]
    fn arabic_has_six_forms() {
        let ar = rule("ar");
        assert_eq!(ar.form_count(), 6);
        let picked: Vec<usize> = [0, 1, 2, 3, 11, 100].iter().map(|&n| ar.form_index(n)).collect();
        assert_eq!(picked, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn index_always_in_range() {
        let all = [
            "fa", "en", "fr", "lv", "is", "ga", "cs", "mk", "lt", "ru", "pl", "ro", "sl", "mt",
            "cy", "ar", "tl",
        ];
        for tag in all {
            let r = rule(tag);
            for n in 0..500 {
                assert!(r.form_index(n) < r.form_count(), "{} n={}", tag, n);
            }
        }
    }

    #[test]
    fn samples_reach_every_form() {
        for tag in ["ru", "sl", "cy", "lv"] {
            let r = rule(tag);
            for form in 0..r.form_count() {
                let n = r.sample_for_form(form).expect("form reachable");
                assert_eq!(r.form_index(n), form);
            }
        }
    }
}
