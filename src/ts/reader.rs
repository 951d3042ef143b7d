// SPDX-License-Identifier: PMPL-1.0-or-later

//! TS document reader
//!
//! Pull-parses the XML with quick-xml and builds a [`Catalog`]. Text is
//! kept verbatim (no trimming), entities and `<byte value="..."/>`
//! escapes are decoded, and TS 2.1 relative locations (`line="+3"`,
//! omitted `filename`) are resolved to absolute ones.

use crate::error::{Result, TsError};
use crate::types::*;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Read and parse a catalog from disk.
pub fn read_file(path: &Path) -> Result<Catalog> {
    let bytes = fs::read(path)?;
    let text = decode(&bytes)?;
    parse_str(&text)
}

/// Decode raw catalog bytes into a string.
///
/// Honours UTF-8 and UTF-16 byte order marks. Files without a BOM must be
/// UTF-8; anything else is read as Windows-1252 with a warning, which is
/// what hand-edited legacy catalogs usually turn out to be.
pub fn decode(bytes: &[u8]) -> Result<String> {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if had_errors {
            return Err(TsError::Encoding(format!(
                "invalid {} byte sequence",
                encoding.name()
            )));
        }
        return Ok(text.into_owned());
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(err) => {
            let (text, _, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
            if had_errors {
                return Err(TsError::Encoding(format!("not UTF-8: {}", err)));
            }
            warn!("catalog is not UTF-8, decoded as Windows-1252");
            Ok(text.into_owned())
        }
    }
}

/// Parse a TS document held in memory.
pub fn parse_str(input: &str) -> Result<Catalog> {
    Parser::new(input).parse()
}

type Attributes = HashMap<String, String>;

struct Parser<'a> {
    input: &'a str,
    reader: Reader<&'a [u8]>,
    current_file: String,
    file_lines: HashMap<String, i64>,
    /// Last `(byte position, line)` handed out by `line()`
    line_mark: Cell<(usize, usize)>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let mut reader = Reader::from_str(input);
        reader.trim_text(false);
        Self {
            input,
            reader,
            current_file: String::new(),
            file_lines: HashMap::new(),
            line_mark: Cell::new((0, 1)),
        }
    }

    /// 1-based line of the reader's position. Only the bytes read since
    /// the previous call are counted.
    fn line(&self) -> usize {
        let pos = self.reader.buffer_position().min(self.input.len());
        let (mut from, mut line) = self.line_mark.get();
        if pos < from {
            (from, line) = (0, 1);
        }
        line += self.input.as_bytes()[from..pos]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        self.line_mark.set((pos, line));
        line
    }

    fn syntax(&self, message: impl Into<String>) -> TsError {
        TsError::Syntax {
            line: self.line(),
            message: message.into(),
        }
    }

    fn next(&mut self) -> Result<Event<'a>> {
        match self.reader.read_event() {
            Ok(event) => Ok(event),
            Err(err) => Err(TsError::Xml {
                line: self.line(),
                message: err.to_string(),
            }),
        }
    }

    fn attributes(&self, start: &BytesStart<'_>) -> Result<Attributes> {
        let mut attrs = HashMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|err| TsError::Xml {
                line: self.line(),
                message: err.to_string(),
            })?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|err| TsError::Xml {
                line: self.line(),
                message: err.to_string(),
            })?;
            attrs.insert(key, value.into_owned());
        }
        Ok(attrs)
    }

    fn parse(mut self) -> Result<Catalog> {
        loop {
            match self.next()? {
                Event::Start(e) if e.name().as_ref() == b"TS" => {
                    let mut catalog = self.catalog_header(&e)?;
                    self.ts_body(&mut catalog)?;
                    return Ok(catalog);
                }
                Event::Empty(e) if e.name().as_ref() == b"TS" => {
                    return self.catalog_header(&e);
                }
                Event::Start(e) | Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(self.syntax(format!("expected <TS> root element, found <{}>", name)));
                }
                Event::Eof => return Err(self.syntax("missing <TS> root element")),
                _ => {}
            }
        }
    }

    fn catalog_header(&self, start: &BytesStart<'_>) -> Result<Catalog> {
        let mut attrs = self.attributes(start)?;
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Ok(Catalog {
            version: attrs.remove("version").unwrap_or_else(|| "1.1".to_string()),
            language: non_empty(attrs.remove("language")),
            source_language: non_empty(attrs.remove("sourcelanguage")),
            contexts: Vec::new(),
        })
    }

    fn ts_body(&mut self, catalog: &mut Catalog) -> Result<()> {
        loop {
            match self.next()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"context" => {
                        let context = self.context()?;
                        catalog.contexts.push(context);
                    }
                    other => {
                        let name = String::from_utf8_lossy(other).into_owned();
                        self.skip(&name)?;
                    }
                },
                Event::End(e) if e.name().as_ref() == b"TS" => return Ok(()),
                Event::Eof => return Err(self.syntax("unexpected end of document inside <TS>")),
                _ => {}
            }
        }
    }

    fn context(&mut self) -> Result<Context> {
        let mut context = Context::new("");
        let mut named = false;
        loop {
            match self.next()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"name" => {
                        context.name = self.text("name")?;
                        named = true;
                    }
                    b"comment" => context.comment = Some(self.text("comment")?),
                    b"message" => {
                        let line = self.line();
                        let attrs = self.attributes(&e)?;
                        let mut message = self.message(&attrs)?;
                        message.line = Some(line);
                        context.messages.push(message);
                    }
                    other => {
                        let name = String::from_utf8_lossy(other).into_owned();
                        self.skip(&name)?;
                    }
                },
                Event::Empty(e) if e.name().as_ref() == b"name" => named = true,
                Event::End(e) if e.name().as_ref() == b"context" => break,
                Event::Eof => return Err(self.syntax("unexpected end of document inside <context>")),
                _ => {}
            }
        }
        if !named {
            return Err(self.syntax("<context> without <name>"));
        }
        Ok(context)
    }

    fn message(&mut self, attrs: &Attributes) -> Result<Message> {
        let mut message = Message::new("");
        message.numerus = attrs.get("numerus").map(|v| v == "yes").unwrap_or(false);
        message.id = attrs.get("id").cloned();
        let mut translation = None;

        loop {
            match self.next()? {
                Event::Empty(e) => match e.name().as_ref() {
                    b"location" => {
                        let attrs = self.attributes(&e)?;
                        let location = self.location(&attrs)?;
                        message.locations.push(location);
                    }
                    b"translation" => {
                        let attrs = self.attributes(&e)?;
                        let mut empty = Translation::unfinished(1);
                        empty.state = self.state(&attrs)?;
                        translation = Some(empty);
                    }
                    b"oldsource" => message.old_source = Some(String::new()),
                    b"comment" => message.comment = Some(String::new()),
                    b"extracomment" => message.extra_comment = Some(String::new()),
                    b"translatorcomment" => message.translator_comment = Some(String::new()),
                    _ => {}
                },
                Event::Start(e) => match e.name().as_ref() {
                    b"location" => {
                        let attrs = self.attributes(&e)?;
                        let location = self.location(&attrs)?;
                        message.locations.push(location);
                        self.skip("location")?;
                    }
                    b"source" => message.source = self.text("source")?,
                    b"oldsource" => message.old_source = Some(self.text("oldsource")?),
                    b"comment" => message.comment = Some(self.text("comment")?),
                    b"oldcomment" => message.old_comment = Some(self.text("oldcomment")?),
                    b"extracomment" => message.extra_comment = Some(self.text("extracomment")?),
                    b"translatorcomment" => {
                        message.translator_comment = Some(self.text("translatorcomment")?)
                    }
                    b"translation" => {
                        let attrs = self.attributes(&e)?;
                        translation = Some(self.translation(&attrs)?);
                    }
                    b"userdata" => {
                        let data = self.text("userdata")?;
                        message.extras.insert("userdata".to_string(), data);
                    }
                    other => {
                        let name = String::from_utf8_lossy(other).into_owned();
                        match name.strip_prefix("extra-") {
                            Some(key) => {
                                let value = self.text(&name)?;
                                message.extras.insert(key.to_string(), value);
                            }
                            None => self.skip(&name)?,
                        }
                    }
                },
                Event::End(e) if e.name().as_ref() == b"message" => break,
                Event::Eof => return Err(self.syntax("unexpected end of document inside <message>")),
                _ => {}
            }
        }

        message.translation = translation.unwrap_or_else(|| Translation::unfinished(1));
        Ok(message)
    }

    fn state(&self, attrs: &Attributes) -> Result<TranslationState> {
        let value = attrs.get("type").map(String::as_str).unwrap_or("");
        TranslationState::from_attribute(value)
            .ok_or_else(|| self.syntax(format!("unknown translation type {:?}", value)))
    }

    fn location(&mut self, attrs: &Attributes) -> Result<Location> {
        if let Some(filename) = attrs.get("filename") {
            self.current_file = filename.clone();
        }
        let filename = self.current_file.clone();

        let line = match attrs.get("line").map(|l| l.trim()) {
            None | Some("") => None,
            Some(raw) => {
                let relative = raw.starts_with('+') || raw.starts_with('-');
                let value: i64 = raw
                    .parse()
                    .map_err(|_| self.syntax(format!("invalid location line {:?}", raw)))?;
                let absolute = if relative {
                    self.file_lines.get(&filename).copied().unwrap_or(0) + value
                } else {
                    value
                };
                let line = u32::try_from(absolute)
                    .map_err(|_| self.syntax(format!("location line {} out of range", absolute)))?;
                self.file_lines.insert(filename.clone(), absolute);
                Some(line)
            }
        };

        Ok(Location { filename, line })
    }

    fn translation(&mut self, attrs: &Attributes) -> Result<Translation> {
        let state = self.state(attrs)?;
        let mut variants = attrs.get("variants").map(|v| v == "yes").unwrap_or(false);
        let mut loose = String::new();
        let mut forms = Vec::new();
        let mut length_variants = Vec::new();

        loop {
            match self.next()? {
                Event::Text(t) => loose.push_str(&self.unescape(&t)?),
                Event::CData(c) => loose.push_str(&String::from_utf8_lossy(&c.into_inner())),
                Event::Empty(e) => match e.name().as_ref() {
                    b"byte" => {
                        let attrs = self.attributes(&e)?;
                        loose.push(self.byte(&attrs)?);
                    }
                    b"numerusform" => forms.push(String::new()),
                    b"lengthvariant" => length_variants.push(String::new()),
                    _ => {}
                },
                Event::Start(e) => match e.name().as_ref() {
                    b"numerusform" => {
                        let attrs = self.attributes(&e)?;
                        let (form, had_variants) = self.numerus_form(&attrs)?;
                        variants |= had_variants;
                        forms.push(form);
                    }
                    b"lengthvariant" => length_variants.push(self.text("lengthvariant")?),
                    other => {
                        let name = String::from_utf8_lossy(other).into_owned();
                        self.skip(&name)?;
                    }
                },
                Event::End(e) if e.name().as_ref() == b"translation" => break,
                Event::Eof => {
                    return Err(self.syntax("unexpected end of document inside <translation>"))
                }
                _ => {}
            }
        }

        if forms.is_empty() {
            if length_variants.is_empty() {
                forms.push(loose);
            } else {
                variants = true;
                forms.push(length_variants.join(&VARIANT_SEPARATOR.to_string()));
            }
        }

        Ok(Translation {
            state,
            forms,
            variants,
        })
    }

    /// A `<numerusform>` body, possibly split into `<lengthvariant>`s.
    fn numerus_form(&mut self, attrs: &Attributes) -> Result<(String, bool)> {
        let declared = attrs.get("variants").map(|v| v == "yes").unwrap_or(false);
        let mut text = String::new();
        let mut length_variants = Vec::new();
        loop {
            match self.next()? {
                Event::Text(t) => text.push_str(&self.unescape(&t)?),
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
                Event::Empty(e) if e.name().as_ref() == b"byte" => {
                    let attrs = self.attributes(&e)?;
                    text.push(self.byte(&attrs)?);
                }
                Event::Empty(e) if e.name().as_ref() == b"lengthvariant" => {
                    length_variants.push(String::new())
                }
                Event::Start(e) if e.name().as_ref() == b"lengthvariant" => {
                    length_variants.push(self.text("lengthvariant")?)
                }
                Event::End(e) if e.name().as_ref() == b"numerusform" => break,
                Event::Eof => {
                    return Err(self.syntax("unexpected end of document inside <numerusform>"))
                }
                _ => {}
            }
        }
        if length_variants.is_empty() {
            Ok((text, declared))
        } else {
            Ok((length_variants.join(&VARIANT_SEPARATOR.to_string()), true))
        }
    }

    /// Collect the text content of the element just opened, up to its end tag.
    fn text(&mut self, element: &str) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.next()? {
                Event::Text(t) => out.push_str(&self.unescape(&t)?),
                Event::CData(c) => out.push_str(&String::from_utf8_lossy(&c.into_inner())),
                Event::Empty(e) if e.name().as_ref() == b"byte" => {
                    let attrs = self.attributes(&e)?;
                    out.push(self.byte(&attrs)?);
                }
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    self.skip(&name)?;
                }
                Event::End(e) if e.name().as_ref() == element.as_bytes() => return Ok(out),
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(self.syntax(format!(
                        "expected </{}>, found </{}>",
                        element, name
                    )));
                }
                Event::Eof => {
                    return Err(self.syntax(format!("unexpected end of document inside <{}>", element)))
                }
                _ => {}
            }
        }
    }

    fn unescape(&self, text: &quick_xml::events::BytesText<'_>) -> Result<String> {
        text.unescape()
            .map(|cow| cow.into_owned())
            .map_err(|err| TsError::Xml {
                line: self.line(),
                message: err.to_string(),
            })
    }

    /// Decode `<byte value="x9"/>` (hex with `x` prefix, or decimal).
    fn byte(&self, attrs: &Attributes) -> Result<char> {
        let raw = attrs
            .get("value")
            .ok_or_else(|| self.syntax("<byte> without value"))?;
        let code = match raw.strip_prefix('x').or_else(|| raw.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .ok_or_else(|| self.syntax(format!("invalid byte value {:?}", raw)))
    }

    /// Skip the element just opened, including all of its children.
    fn skip(&mut self, element: &str) -> Result<()> {
        debug!(element, line = self.line(), "skipping unsupported TS element");
        let mut depth = 1usize;
        loop {
            match self.next()? {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Event::Eof => {
                    return Err(self.syntax(format!("unexpected end of document inside <{}>", element)))
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.0" language="fa">
<context>
    <name>AboutPage</name>
    <message>
        <location filename="../qml/bb10/AboutPage.qml" line="42"/>
        <location filename="../qml/harmattan/AboutPage.qml" line="59"/>
        <source>Version: &lt;b&gt;%1&lt;/b&gt;</source>
        <translation type="unfinished"></translation>
    </message>
    <message numerus="yes">
        <location filename="../qml/bb10/AboutPage.qml" line="47"/>
        <source>You donated &lt;b&gt;%n coins&lt;/b&gt;. Thank you!</source>
        <translation>
            <numerusform>شما &lt;b&gt;%n سکه&lt;/b&gt; اهدا کردید. سپاسگزاریم!</numerusform>
        </translation>
    </message>
    <message>
        <location filename="../src/main.cpp" line="141"/>
        <source>%1 (build %2)</source>
        <extracomment>%1 - version, %2 - build number</extracomment>
        <translation>%1 (ساخت %2)</translation>
    </message>
</context>
</TS>
"#;

    #[test]
    fn parses_header_and_messages() {
        let catalog = parse_str(DOC).unwrap();
        assert_eq!(catalog.version, "2.0");
        assert_eq!(catalog.language.as_deref(), Some("fa"));
        assert_eq!(catalog.contexts.len(), 1);
        let ctx = &catalog.contexts[0];
        assert_eq!(ctx.name, "AboutPage");
        assert_eq!(ctx.messages.len(), 3);

        let version = &ctx.messages[0];
        assert_eq!(version.source, "Version: <b>%1</b>");
        assert_eq!(version.locations.len(), 2);
        assert_eq!(version.locations[1].line, Some(59));
        assert_eq!(version.translation.state, TranslationState::Unfinished);
        assert_eq!(version.translation.forms, vec![String::new()]);
        assert_eq!(version.line, Some(6));
    }

    #[test]
    fn numerus_forms_drop_loose_whitespace() {
        let catalog = parse_str(DOC).unwrap();
        let donated = &catalog.contexts[0].messages[1];
        assert!(donated.numerus);
        assert_eq!(donated.translation.state, TranslationState::Finished);
        assert_eq!(donated.translation.forms.len(), 1);
        assert!(donated.translation.forms[0].starts_with("شما <b>%n"));
    }

    #[test]
    fn extracomment_is_kept() {
        let catalog = parse_str(DOC).unwrap();
        let build = &catalog.contexts[0].messages[2];
        assert_eq!(
            build.extra_comment.as_deref(),
            Some("%1 - version, %2 - build number")
        );
        assert_eq!(build.comment, None);
    }

    #[test]
    fn relative_locations_resolve() {
        let doc = r#"<TS version="2.1" language="de">
<context><name>C</name>
<message><location filename="a.cpp" line="+10"/><location line="+5"/><source>x</source><translation>y</translation></message>
<message><location filename="b.cpp" line="+3"/><location filename="a.cpp" line="-2"/><source>z</source><translation>w</translation></message>
</context></TS>"#;
        let catalog = parse_str(doc).unwrap();
        let msgs = &catalog.contexts[0].messages;
        assert_eq!(msgs[0].locations[0].to_string(), "a.cpp:10");
        assert_eq!(msgs[0].locations[1].to_string(), "a.cpp:15");
        assert_eq!(msgs[1].locations[0].to_string(), "b.cpp:3");
        assert_eq!(msgs[1].locations[1].to_string(), "a.cpp:13");
    }

    #[test]
    fn byte_escapes_and_length_variants() {
        let doc = r#"<TS version="2.1"><context><name>C</name>
<message><source>tab<byte value="x9"/>here</source>
<translation variants="yes"><lengthvariant>Long text</lengthvariant><lengthvariant>Short</lengthvariant></translation></message>
</context></TS>"#;
        let catalog = parse_str(doc).unwrap();
        let msg = &catalog.contexts[0].messages[0];
        assert_eq!(msg.source, "tab\there");
        assert!(msg.translation.variants);
        assert_eq!(msg.translation.text(), "Long text\u{9c}Short");
    }

    #[test]
    fn extras_and_unknown_elements() {
        let doc = r#"<TS version="2.1"><context><name>C</name>
<message id="app.title"><source>Title</source><translation>Titel</translation>
<extra-po-flags>c-format</extra-po-flags><frobnicate><deep/>x</frobnicate></message>
</context></TS>"#;
        let catalog = parse_str(doc).unwrap();
        let msg = &catalog.contexts[0].messages[0];
        assert_eq!(msg.id.as_deref(), Some("app.title"));
        assert_eq!(msg.extras.get("po-flags").map(String::as_str), Some("c-format"));
        assert_eq!(msg.translation.state, TranslationState::Finished);
    }

    #[test]
    fn rejects_wrong_root_and_bad_type() {
        let err = parse_str("<html></html>").unwrap_err();
        assert!(err.to_string().contains("expected <TS>"));

        let doc = r#"<TS><context><name>C</name><message><source>a</source>
<translation type="sideways">b</translation></message></context></TS>"#;
        let err = parse_str(doc).unwrap_err();
        assert!(matches!(err, TsError::Syntax { line: 2, .. }), "{}", err);
    }

    #[test]
    fn message_lines_follow_the_document() {
        let mut doc = String::from("<TS version=\"2.1\" language=\"de\">\n<context><name>C</name>\n");
        for i in 0..200 {
            doc.push_str(&format!(
                "<message>\n<source>m{}</source>\n<translation>t</translation>\n</message>\n",
                i
            ));
        }
        doc.push_str("</context>\n</TS>\n");
        let catalog = parse_str(&doc).unwrap();
        let lines: Vec<Option<usize>> = catalog.contexts[0].messages.iter().map(|m| m.line).collect();
        assert_eq!(lines.len(), 200);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(*line, Some(3 + 4 * i));
        }

        doc.truncate(doc.len() - "</context>\n</TS>\n".len());
        doc.push_str("<message><source>x</source>\n<translation type=\"bad\">y</translation></message>");
        let err = parse_str(&doc).unwrap_err();
        assert!(matches!(err, TsError::Syntax { line: 804, .. }), "{}", err);
    }

    #[test]
    fn truncated_document_is_an_error() {
        let err = parse_str("<TS><context><name>C</name>").unwrap_err();
        assert!(err.to_string().contains("unexpected end"));
    }

    #[test]
    fn decode_handles_boms() {
        let mut utf16 = vec![0xFF, 0xFE];
        for unit in "<TS/>".encode_utf16() {
            utf16.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode(&utf16).unwrap(), "<TS/>");
        assert_eq!(decode(b"\xEF\xBB\xBF<TS/>").unwrap(), "<TS/>");
        assert_eq!(decode(b"caf\xE9").unwrap(), "café");
    }
}
