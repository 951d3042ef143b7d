// SPDX-License-Identifier: PMPL-1.0-or-later

//! TS document writer
//!
//! Produces the layout lupdate writes: XML declaration, `<!DOCTYPE TS>`,
//! four-space indentation and a fixed element order inside `<message>`,
//! so normalized catalogs diff cleanly against tool-generated ones.

use crate::error::Result;
use crate::types::*;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Render a catalog as a TS document.
pub fn to_ts_string(catalog: &Catalog) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<!DOCTYPE TS>\n");
    out.push_str(&format!("<TS version=\"{}\"", escape_attr(&catalog.version)));
    if let Some(language) = &catalog.language {
        out.push_str(&format!(" language=\"{}\"", escape_attr(language)));
    }
    if let Some(source_language) = &catalog.source_language {
        out.push_str(&format!(" sourcelanguage=\"{}\"", escape_attr(source_language)));
    }
    out.push_str(">\n");

    for context in &catalog.contexts {
        write_context(&mut out, context);
    }

    out.push_str("</TS>\n");
    out
}

/// Write a catalog to disk, creating parent directories as needed.
pub fn write_file(catalog: &Catalog, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, to_ts_string(catalog))?;
    Ok(())
}

fn write_context(out: &mut String, context: &Context) {
    out.push_str("<context>\n");
    element(out, 1, "name", &context.name);
    if let Some(comment) = &context.comment {
        element(out, 1, "comment", comment);
    }
    for message in &context.messages {
        write_message(out, message);
    }
    out.push_str("</context>\n");
}

fn write_message(out: &mut String, message: &Message) {
    let mut open = String::from("    <message");
    if let Some(id) = &message.id {
        let _ = write!(open, " id=\"{}\"", escape_attr(id));
    }
    if message.numerus {
        open.push_str(" numerus=\"yes\"");
    }
    open.push_str(">\n");
    out.push_str(&open);

    for location in &message.locations {
        match location.line {
            Some(line) => {
                let _ = writeln!(
                    out,
                    "        <location filename=\"{}\" line=\"{}\"/>",
                    escape_attr(&location.filename),
                    line
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "        <location filename=\"{}\"/>",
                    escape_attr(&location.filename)
                );
            }
        }
    }

    element(out, 2, "source", &message.source);
    let optional = [
        ("oldsource", &message.old_source),
        ("comment", &message.comment),
        ("oldcomment", &message.old_comment),
        ("extracomment", &message.extra_comment),
        ("translatorcomment", &message.translator_comment),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            element(out, 2, name, value);
        }
    }

    write_translation(out, message);

    if let Some(userdata) = message.extras.get("userdata") {
        element(out, 2, "userdata", userdata);
    }
    for (key, value) in &message.extras {
        if key != "userdata" {
            element(out, 2, &format!("extra-{}", key), value);
        }
    }

    out.push_str("    </message>\n");
}

fn write_translation(out: &mut String, message: &Message) {
    let translation = &message.translation;
    let mut attrs = String::new();
    if let Some(kind) = translation.state.attribute() {
        let _ = write!(attrs, " type=\"{}\"", kind);
    }
    if translation.variants && !message.numerus {
        attrs.push_str(" variants=\"yes\"");
    }

    if message.numerus {
        let _ = writeln!(out, "        <translation{}>", attrs);
        for form in &translation.forms {
            if translation.variants && form.contains(VARIANT_SEPARATOR) {
                out.push_str("            <numerusform variants=\"yes\">");
                for variant in form.split(VARIANT_SEPARATOR) {
                    let _ = write!(out, "<lengthvariant>{}</lengthvariant>", escape_text(variant));
                }
                out.push_str("</numerusform>\n");
            } else {
                let _ = writeln!(
                    out,
                    "            <numerusform>{}</numerusform>",
                    escape_text(form)
                );
            }
        }
        out.push_str("        </translation>\n");
    } else if translation.variants {
        let _ = write!(out, "        <translation{}>", attrs);
        for variant in translation.text().split(VARIANT_SEPARATOR) {
            let _ = write!(out, "<lengthvariant>{}</lengthvariant>", escape_text(variant));
        }
        out.push_str("</translation>\n");
    } else {
        let _ = writeln!(
            out,
            "        <translation{}>{}</translation>",
            attrs,
            escape_text(translation.text())
        );
    }
}

fn element(out: &mut String, depth: usize, name: &str, text: &str) {
    let _ = writeln!(
        out,
        "{}<{}>{}</{}>",
        "    ".repeat(depth),
        name,
        escape_text(text),
        name
    );
}

/// Escape element content. Control characters XML cannot carry are
/// written as `<byte value="xNN"/>`.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(ch),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "<byte value=\"x{:x}\"/>", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "&#x{:x};", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts::parse_str;

    fn sample() -> Catalog {
        let mut catalog = Catalog {
            version: "2.1".to_string(),
            language: Some("ru".to_string()),
            source_language: Some("en".to_string()),
            contexts: Vec::new(),
        };
        let ctx = catalog.context_mut("AboutPage");

        let mut version = Message::new("Version: <b>%1</b>");
        version.locations.push(Location {
            filename: "../qml/AboutPage.qml".to_string(),
            line: Some(42),
        });
        version.translation = Translation::finished("Версия: <b>%1</b>");
        ctx.messages.push(version);

        let mut donated = Message::new("You donated <b>%n coins</b>. Thank you!");
        donated.numerus = true;
        donated.translator_comment = Some("check 'coins'".to_string());
        donated.translation = Translation {
            state: TranslationState::Unfinished,
            forms: vec!["%n монету".into(), "%n монеты".into(), String::new()],
            variants: false,
        };
        ctx.messages.push(donated);
        catalog
    }

    #[test]
    fn layout_matches_lupdate() {
        let text = to_ts_string(&sample());
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n"));
        assert!(text.contains("<TS version=\"2.1\" language=\"ru\" sourcelanguage=\"en\">"));
        assert!(text.contains("        <source>Version: &lt;b&gt;%1&lt;/b&gt;</source>\n"));
        assert!(text.contains("    <message numerus=\"yes\">\n"));
        assert!(text.contains("            <numerusform></numerusform>\n"));
        assert!(text.contains("<translatorcomment>check &apos;coins&apos;</translatorcomment>"));
        assert!(text.contains("<translation type=\"unfinished\">\n"));
    }

    #[test]
    fn written_catalog_reads_back() {
        let original = sample();
        let reread = without_lines(parse_str(&to_ts_string(&original)).unwrap());
        assert_eq!(reread, original);
    }

    fn without_lines(mut catalog: Catalog) -> Catalog {
        for ctx in &mut catalog.contexts {
            for msg in &mut ctx.messages {
                msg.line = None;
            }
        }
        catalog
    }

    #[test]
    fn numerus_length_variants_read_back() {
        let mut catalog = sample();
        let donated = &mut catalog.contexts[0].messages[1];
        donated.translation = Translation {
            state: TranslationState::Finished,
            forms: vec![
                format!("%n монету{}%n мон.", VARIANT_SEPARATOR),
                "%n монеты".into(),
                "%n монет".into(),
            ],
            variants: true,
        };

        let text = to_ts_string(&catalog);
        assert!(text.contains(
            "<numerusform variants=\"yes\"><lengthvariant>%n монету</lengthvariant><lengthvariant>%n мон.</lengthvariant></numerusform>\n"
        ));
        assert!(text.contains("            <numerusform>%n монеты</numerusform>\n"));

        let reread = without_lines(parse_str(&text).unwrap());
        assert_eq!(reread, catalog);
    }

    #[test]
    fn byte_elements_read_back() {
        let mut catalog = sample();
        let ctx = catalog.context_mut("Terminal");
        let mut bell = Message::new("Ring\u{7}");
        bell.translation = Translation::finished("Klingel\u{7}\u{1b}[0m");
        ctx.messages.push(bell);

        let text = to_ts_string(&catalog);
        assert!(text.contains("<source>Ring<byte value=\"x7\"/></source>"));
        assert!(text.contains("Klingel<byte value=\"x7\"/><byte value=\"x1b\"/>[0m</translation>"));

        let reread = without_lines(parse_str(&text).unwrap());
        let bell = reread.find("Terminal", "Ring\u{7}", None).unwrap();
        assert_eq!(bell.translation.text(), "Klingel\u{7}\u{1b}[0m");
        assert_eq!(reread, catalog);
    }

    #[test]
    fn utf16_big_endian_catalog_reads_back() {
        let catalog = sample();
        let mut bytes = vec![0xFE, 0xFF];
        for unit in to_ts_string(&catalog).encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        let text = crate::ts::decode(&bytes).unwrap();
        assert!(text.starts_with("<?xml"));
        let reread = without_lines(parse_str(&text).unwrap());
        assert_eq!(reread, catalog);
    }

    #[test]
    fn control_characters_become_byte_elements() {
        assert_eq!(escape_text("a\u{1}b\tc"), "a<byte value=\"x1\"/>b\tc");
        assert_eq!(escape_attr("x\u{1}"), "x&#x1;");
    }
}
