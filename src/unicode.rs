//! LaTeX to Unicode correspondence tables.
//!
//! The tables are built once from a character dataset in the shape of the W3C `unicode.xml`
//! charlist: every record names a code point and the LaTeX forms which produce it. Loading the
//! dataset from its source format is left to the caller; see [`CharacterRecord`].
mod trie;

use std::collections::HashMap;

use serde::Deserialize;

pub use trie::{MacroTrie, Match, Matches};

/// How a character from the dataset is substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterKind {
    #[default]
    Normal,
    /// A combining mark, such as the one produced by `\'` or `\^`. In LaTeX the command precedes
    /// the base character, whereas the Unicode mark follows it.
    Diacritic,
    #[serde(other)]
    Other,
}

/// One record of the correspondence dataset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CharacterRecord {
    /// Code point identifier such as `U000E9`.
    pub id: String,
    /// LaTeX forms producing the character. Only the first one is used.
    #[serde(rename = "latexForms", default)]
    pub latex: Vec<String>,
    #[serde(rename = "type", default)]
    pub kind: CharacterKind,
}

impl CharacterRecord {
    pub fn new<S: Into<String>>(id: S, latex: &[&str], kind: CharacterKind) -> Self {
        Self {
            id: id.into(),
            latex: latex.iter().map(|s| s.to_string()).collect(),
            kind,
        }
    }
}

/// Remove the first `{` and the first `}` from `form`.
fn strip_first_braces(form: &str) -> String {
    let mut out = String::with_capacity(form.len());
    let (mut open, mut close) = (false, false);
    for ch in form.chars() {
        match ch {
            '{' if !open => open = true,
            '}' if !close => close = true,
            _ => out.push(ch),
        }
    }
    out
}

/// Whether `form` ends with a single character wrapped in braces, like `\'{e}`.
fn ends_with_braced_char(form: &str) -> bool {
    let mut rev = form.chars().rev();
    matches!(
        (rev.next(), rev.next(), rev.next()),
        (Some('}'), Some(_), Some('{'))
    )
}

/// Parse an identifier of the form `U0XXXX` naming a basic-plane code point.
fn basic_plane_char(id: &str) -> Option<char> {
    let hex = id.strip_prefix("U0")?;
    if hex.len() != 4 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

/// Immutable LaTeX to Unicode tables.
///
/// The `normal` table substitutes a macro by a character; the `diacritic` table maps a macro to a
/// combining mark which is placed after the following character. Registration is
/// first-write-wins: a macro defined twice in the dataset keeps its first mapping.
#[derive(Debug, Clone, Default)]
pub struct UnicodeMapping {
    normal: HashMap<String, char>,
    diacritic: HashMap<String, char>,
    normal_trie: MacroTrie,
    diacritic_trie: MacroTrie,
}

impl UnicodeMapping {
    /// A mapping without any substitutions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the tables from a correspondence dataset.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CharacterRecord>,
    {
        let mut mapping = Self::default();
        let mut skipped = 0usize;

        for record in records {
            let Some(form) = record.latex.first() else {
                skipped += 1;
                continue;
            };
            if strip_first_braces(form).chars().count() <= 1
                || !(form.contains('\\') || form == "--")
            {
                skipped += 1;
                continue;
            }
            let Some(ch) = basic_plane_char(&record.id) else {
                skipped += 1;
                continue;
            };

            match record.kind {
                CharacterKind::Diacritic => mapping.register_diacritic(form, ch),
                CharacterKind::Normal | CharacterKind::Other => {
                    if mapping.register_normal(form, ch) && ends_with_braced_char(form) {
                        mapping.register_normal(&strip_first_braces(form), ch);
                    }
                }
            }
        }

        tracing::debug!(
            normal = mapping.normal.len(),
            diacritic = mapping.diacritic.len(),
            skipped,
            "built unicode mapping"
        );
        mapping
    }

    fn register_normal(&mut self, form: &str, ch: char) -> bool {
        if self.normal.contains_key(form) {
            return false;
        }
        self.normal.insert(form.to_string(), ch);
        self.normal_trie.insert(form, ch);
        true
    }

    fn register_diacritic(&mut self, form: &str, ch: char) {
        if !self.diacritic.contains_key(form) {
            self.diacritic.insert(form.to_string(), ch);
            self.diacritic_trie.insert(form, ch);
        }
    }

    /// The character substituted for a macro.
    pub fn normal(&self, latex: &str) -> Option<char> {
        self.normal.get(latex).copied()
    }

    /// The combining mark substituted for a diacritic macro.
    pub fn diacritic(&self, latex: &str) -> Option<char> {
        self.diacritic.get(latex).copied()
    }

    pub fn normal_trie(&self) -> &MacroTrie {
        &self.normal_trie
    }

    pub fn diacritic_trie(&self) -> &MacroTrie {
        &self.diacritic_trie
    }

    /// Total number of registered macros.
    pub fn len(&self) -> usize {
        self.normal.len() + self.diacritic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter() {
        let mapping = UnicodeMapping::from_records([
            // accepted
            CharacterRecord::new("U000E9", &[r"\'{e}"], CharacterKind::Normal),
            CharacterRecord::new("U02013", &["--"], CharacterKind::Normal),
            // single character after brace stripping
            CharacterRecord::new("U00041", &["{A}"], CharacterKind::Normal),
            // no backslash
            CharacterRecord::new("U00391", &["Alpha"], CharacterKind::Normal),
            // outside the basic plane
            CharacterRecord::new("U1D400", &[r"\mathbf{A}"], CharacterKind::Normal),
            // composite identifier
            CharacterRecord::new("U0004C-00301", &[r"\'{L}"], CharacterKind::Normal),
            // no latex form at all
            CharacterRecord::new("U000A0", &[], CharacterKind::Normal),
        ]);

        assert_eq!(mapping.normal(r"\'{e}"), Some('é'));
        assert_eq!(mapping.normal("--"), Some('–'));
        assert_eq!(mapping.normal("{A}"), None);
        assert_eq!(mapping.normal("Alpha"), None);
        assert_eq!(mapping.normal(r"\mathbf{A}"), None);
        assert_eq!(mapping.normal(r"\'{L}"), None);
    }

    #[test]
    fn test_braced_alias() {
        let mapping = UnicodeMapping::from_records([
            CharacterRecord::new("U000E9", &[r"\'{e}"], CharacterKind::Normal),
            CharacterRecord::new("U000DF", &[r"\ss"], CharacterKind::Normal),
        ]);
        assert_eq!(mapping.normal(r"\'e"), Some('é'));
        assert_eq!(mapping.normal(r"\ss"), Some('ß'));
        // only `\'{e}` and its alias, plus `\ss`
        assert_eq!(mapping.len(), 3);
    }

    #[test]
    fn test_first_registration_wins() {
        let mapping = UnicodeMapping::from_records([
            CharacterRecord::new("U000C9", &[r"\'{E}"], CharacterKind::Normal),
            CharacterRecord::new("U00118", &[r"\'{E}"], CharacterKind::Normal),
            CharacterRecord::new("U00301", &[r"\'"], CharacterKind::Diacritic),
            CharacterRecord::new("U00341", &[r"\'"], CharacterKind::Diacritic),
        ]);
        assert_eq!(mapping.normal(r"\'{E}"), Some('É'));
        assert_eq!(mapping.diacritic(r"\'"), Some('\u{301}'));
        assert_eq!(mapping.normal_trie().longest_prefix(r"\'{E}"), Some((5, 'É')));
    }

    #[test]
    fn test_diacritic_table() {
        let mapping = UnicodeMapping::from_records([CharacterRecord::new(
            "U00304",
            &[r"\="],
            CharacterKind::Diacritic,
        )]);
        assert_eq!(mapping.diacritic(r"\="), Some('\u{304}'));
        assert_eq!(mapping.normal(r"\="), None);
        assert_eq!(mapping.diacritic_trie().len(), 1);
    }

    #[test]
    fn test_deserialize_record() {
        let record: CharacterRecord = serde_json::from_str(
            r#"{"id": "U00301", "latexForms": ["\\'"], "type": "diacritic"}"#,
        )
        .unwrap();
        assert_eq!(record.kind, CharacterKind::Diacritic);
        assert_eq!(record.latex, vec![r"\'".to_string()]);

        let record: CharacterRecord =
            serde_json::from_str(r#"{"id": "U000E9", "type": "punctuation"}"#).unwrap();
        assert_eq!(record.kind, CharacterKind::Other);
        assert!(record.latex.is_empty());
    }
}
