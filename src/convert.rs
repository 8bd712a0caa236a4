//! Conversion of raw field values into Unicode text or names.
use std::sync::Arc;

use crate::bibliography::FieldValue;
use crate::names::NameParser;
use crate::parse::Config;
use crate::unicode::UnicodeMapping;

const TEXTIT: &str = "\\textit{";

/// Normalizes raw field values.
///
/// Conversion runs in two stages. [`Converter::normalize`] condenses whitespace, marks italics
/// and substitutes LaTeX macros; [`Converter::finish`] then either splits the text into names
/// (for name fields such as `author`) or removes the remaining grouping braces.
#[derive(Debug, Clone)]
pub struct Converter {
    mapping: Arc<UnicodeMapping>,
    names: NameParser,
    name_fields: Vec<String>,
    italic_open: String,
    italic_close: String,
}

impl Converter {
    pub fn new(mapping: Arc<UnicodeMapping>, names: NameParser, config: &Config) -> Self {
        Self {
            mapping,
            names,
            name_fields: config
                .name_fields
                .iter()
                .map(|field| field.to_lowercase())
                .collect(),
            italic_open: config.italic_open.clone(),
            italic_close: config.italic_close.clone(),
        }
    }

    pub(crate) fn set_name_parser(&mut self, names: NameParser) {
        self.names = names;
    }

    pub fn mapping(&self) -> &UnicodeMapping {
        &self.mapping
    }

    /// The lowercased keys of the fields parsed as names.
    pub fn name_fields(&self) -> &[String] {
        &self.name_fields
    }

    /// Whether values of the field `key` are parsed as names.
    pub fn is_name_field(&self, key: &str) -> bool {
        self.name_fields.iter().any(|f| f.eq_ignore_ascii_case(key))
    }

    /// Fully convert the raw value of the field `key`.
    pub fn convert(&self, raw: &str, key: &str) -> FieldValue {
        self.finish(key, self.normalize(raw))
    }

    /// Condense whitespace, mark `\textit` spans and substitute macros.
    pub fn normalize(&self, raw: &str) -> String {
        let text = condense_whitespace(raw);
        let text = self.replace_italics(&text);
        let text = self.substitute_normal(&text);
        self.substitute_diacritics(&text)
    }

    /// Turn normalized text into the value of the field `key`. Text values are trimmed.
    pub fn finish(&self, key: &str, text: String) -> FieldValue {
        if self.is_name_field(key) {
            FieldValue::Names(self.names.parse(&text))
        } else {
            FieldValue::Text(strip_braces(text.trim()))
        }
    }

    fn replace_italics(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(idx) = rest.find(TEXTIT) {
            let inner = &rest[idx + TEXTIT.len()..];
            let Some(close) = closing_brace(inner) else {
                break;
            };
            out.push_str(&rest[..idx]);
            out.push_str(&self.italic_open);
            out.push_str(&inner[..close]);
            out.push_str(&self.italic_close);
            rest = &inner[close + 1..];
        }

        out.push_str(rest);
        out
    }

    fn substitute_normal(&self, text: &str) -> String {
        let trie = self.mapping.normal_trie();
        if trie.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        for m in trie.find_iter(text) {
            out.push_str(&text[copied..m.start]);
            out.push(m.value);
            copied = m.end;
        }
        out.push_str(&text[copied..]);
        out
    }

    /// Replace `\'{e}` by `e` followed by the combining mark: LaTeX puts the accent command
    /// before its base character, Unicode puts the mark after it.
    fn substitute_diacritics(&self, text: &str) -> String {
        let trie = self.mapping.diacritic_trie();
        if trie.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut pos = 0;
        while pos < text.len() {
            if let Some((len, mark)) = trie.longest_prefix(&text[pos..]) {
                if let Some((base, consumed)) = accent_target(&text[pos + len..]) {
                    out.push_str(&text[copied..pos]);
                    out.push(base);
                    out.push(mark);
                    pos += len + consumed;
                    copied = pos;
                    continue;
                }
            }
            pos += text[pos..].chars().next().map_or(1, char::len_utf8);
        }
        out.push_str(&text[copied..]);
        out
    }
}

/// Replace every run of spaces, tabs and line breaks by a single space.
pub fn condense_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;
    for ch in raw.chars() {
        if matches!(ch, ' ' | '\t' | '\n' | '\r') {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// Remove `{` and `}` except inside `$...$` math.
pub fn strip_braces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut math = false;
    for ch in text.chars() {
        if !matches!(ch, '{' | '}') || math {
            out.push(ch);
        }
        if ch == '$' {
            math = !math;
        }
    }
    out
}

/// Index of the `}` closing a group which was opened just before `text`.
fn closing_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(idx),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// The base character of an accent: an optional `{`, one character, and an optional `}`.
/// Returns the character and the number of bytes consumed.
fn accent_target(text: &str) -> Option<(char, usize)> {
    let start = if text.starts_with('{') && text.len() > 1 {
        1
    } else {
        0
    };
    let base = text[start..].chars().next()?;
    let mut end = start + base.len_utf8();
    if text[end..].starts_with('}') {
        end += 1;
    }
    Some((base, end))
}
