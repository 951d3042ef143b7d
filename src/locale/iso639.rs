// SPDX-License-Identifier: PMPL-1.0-or-later

//! ISO 639-1 language code validation and display names.
//!
//! Covers the two-letter codes that may appear in a TS `language`
//! attribute. Names are only provided for the languages tslingo has
//! plural rules and number formatting for.
//!
//! Reference: <https://www.loc.gov/standards/iso639-2/php/code_list.php>

/// All ISO 639-1 codes, sorted for binary search.
const ISO639_1: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az", "ba", "be", "bg",
    "bh", "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv",
    "cy", "da", "de", "dv", "dz", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi",
    "fj", "fo", "fr", "fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr",
    "ht", "hu", "hy", "hz", "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu", "ja",
    "jv", "ka", "kg", "ki", "kj", "kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw",
    "ky", "la", "lb", "lg", "li", "ln", "lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml",
    "mn", "mr", "ms", "mt", "my", "na", "nb", "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv",
    "ny", "oc", "oj", "om", "or", "os", "pa", "pi", "pl", "ps", "pt", "qu", "rm", "rn", "ro",
    "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk", "sl", "sm", "sn", "so", "sq", "sr",
    "ss", "st", "su", "sv", "sw", "ta", "te", "tg", "th", "ti", "tk", "tl", "tn", "to", "tr",
    "ts", "tt", "tw", "ty", "ug", "uk", "ur", "uz", "ve", "vi", "vo", "wa", "wo", "xh", "yi",
    "yo", "za", "zh", "zu",
];

/// Validates whether a string is a known ISO 639-1 two-letter language code.
///
/// Codes are case-sensitive and must be lowercase.
///
/// # Examples
/// ```
/// assert!(tslingo::locale::is_valid_iso639_1("fa"));
/// assert!(tslingo::locale::is_valid_iso639_1("zh"));
/// assert!(!tslingo::locale::is_valid_iso639_1("xx"));
/// ```
pub fn is_valid_iso639_1(code: &str) -> bool {
    ISO639_1.binary_search(&code).is_ok()
}

/// English name of an ISO 639-1 code.
pub fn language_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "ar" => "Arabic",
        "be" => "Belarusian",
        "bg" => "Bulgarian",
        "bs" => "Bosnian",
        "ca" => "Catalan",
        "cs" => "Czech",
        "cy" => "Welsh",
        "da" => "Danish",
        "de" => "German",
        "el" => "Greek",
        "en" => "English",
        "es" => "Spanish",
        "et" => "Estonian",
        "fa" => "Persian",
        "fi" => "Finnish",
        "fr" => "French",
        "ga" => "Irish",
        "he" => "Hebrew",
        "hi" => "Hindi",
        "hr" => "Croatian",
        "hu" => "Hungarian",
        "id" => "Indonesian",
        "is" => "Icelandic",
        "it" => "Italian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "lt" => "Lithuanian",
        "lv" => "Latvian",
        "mk" => "Macedonian",
        "ms" => "Malay",
        "mt" => "Maltese",
        "nb" | "no" => "Norwegian",
        "nl" => "Dutch",
        "pl" => "Polish",
        "pt" => "Portuguese",
        "ro" => "Romanian",
        "ru" => "Russian",
        "sk" => "Slovak",
        "sl" => "Slovenian",
        "sr" => "Serbian",
        "sv" => "Swedish",
        "th" => "Thai",
        "tl" => "Tagalog",
        "tr" => "Turkish",
        "uk" => "Ukrainian",
        "vi" => "Vietnamese",
        "zh" => "Chinese",
        _ => return None,
    };
    Some(name)
}

/// Native name of a language, as shown in language pickers.
pub fn native_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "ar" => "العربية",
        "cs" => "Čeština",
        "de" => "Deutsch",
        "en" => "English",
        "es" => "Español",
        "fa" => "فارسی",
        "fi" => "Suomi",
        "fr" => "Français",
        "it" => "Italiano",
        "ja" => "日本語",
        "ko" => "한국어",
        "nl" => "Nederlands",
        "pl" => "Polski",
        "pt" => "Português",
        "ru" => "Русский",
        "sv" => "Svenska",
        "tr" => "Türkçe",
        "uk" => "Українська",
        "zh" => "中文",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        let mut sorted = ISO639_1.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, ISO639_1);
    }

    #[test]
    fn valid_codes_accepted() {
        assert!(is_valid_iso639_1("en"));
        assert!(is_valid_iso639_1("fa"));
        assert!(is_valid_iso639_1("zh"));
        assert!(is_valid_iso639_1("zu"));
    }

    #[test]
    fn invalid_codes_rejected() {
        assert!(!is_valid_iso639_1("xx"));
        assert!(!is_valid_iso639_1(""));
        assert!(!is_valid_iso639_1("fas"));
        assert!(!is_valid_iso639_1("FA"));
    }

    #[test]
    fn names_resolve() {
        assert_eq!(language_name("fa"), Some("Persian"));
        assert_eq!(native_name("fa"), Some("فارسی"));
        assert_eq!(native_name("zh"), Some("中文"));
        assert_eq!(language_name("xx"), None);
    }
}
