use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;

use crate::error::Error;
use crate::names::Name;

/// Field holding the lowercased entry type, e.g. `article`.
pub const TYPE_FIELD: &str = "type";
/// Alias of [`TYPE_FIELD`].
pub const BIBTYPE_FIELD: &str = "bibtype";
/// Field holding a source `type = {...}` value, e.g. `Research Note` on a `@techreport`.
pub const SOURCE_TYPE_FIELD: &str = "source_type";
/// Field holding the verbatim source of the entry.
pub const BIBTEX_FIELD: &str = "bibtex";
/// Suffix of the fields holding abbreviated names, e.g. `author_short`.
pub const SHORT_SUFFIX: &str = "_short";

/// The value of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    /// Parsed `author` or `editor` lists.
    Names(Vec<Name>),
    /// Abbreviated names, one per [`Name`].
    Short(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_names(&self) -> Option<&[Name]> {
        match self {
            Self::Names(names) => Some(names),
            _ => None,
        }
    }

    pub fn as_short(&self) -> Option<&[String]> {
        match self {
            Self::Short(short) => Some(short),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One bibliographic record: a map from field name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Entry {
    fields: BTreeMap<String, FieldValue>,
}

impl Entry {
    /// An entry with its `type` and `bibtype` fields set.
    pub fn new(entry_type: &str) -> Self {
        let mut entry = Self::default();
        entry.insert(TYPE_FIELD, entry_type);
        entry.insert(BIBTYPE_FIELD, entry_type);
        entry
    }

    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<FieldValue>
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// The value of a text field.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    /// The value of a name field.
    pub fn names(&self, key: &str) -> Option<&[Name]> {
        self.get(key).and_then(FieldValue::as_names)
    }

    /// The abbreviated names derived from the name field `key`.
    pub fn short(&self, key: &str) -> Option<&[String]> {
        self.get(&format!("{key}{SHORT_SUFFIX}"))
            .and_then(FieldValue::as_short)
    }

    pub fn entry_type(&self) -> &str {
        self.text(TYPE_FIELD).unwrap_or_default()
    }

    pub fn bibtex(&self) -> Option<&str> {
        self.text(BIBTEX_FIELD)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.fields.iter()
    }

    /// Add a `<field>_short` value for every name field in `name_fields`.
    pub(crate) fn add_short_names(&mut self, name_fields: &[String]) {
        for field in name_fields {
            let short: Option<Vec<String>> = self
                .names(field)
                .map(|names| names.iter().map(Name::short).collect());
            if let Some(short) = short {
                self.insert(format!("{field}{SHORT_SUFFIX}"), FieldValue::Short(short));
            }
        }
    }
}

impl<'a> IntoIterator for &'a Entry {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The result of a parse: the entries by citation key, the recovered errors, and the bodies of
/// `@comment` directives.
///
/// A non-empty `errors` list means partial success; every entry completed before or after a
/// failure is still present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bibliography {
    pub entries: BTreeMap<String, Entry>,
    pub errors: Vec<Error>,
    pub comments: Vec<String>,
}

impl Bibliography {
    pub fn get_entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Insert an entry. An entry with the same citation key is replaced and returned.
    pub fn insert(&mut self, key: String, entry: Entry) -> Option<Entry> {
        if self.entries.contains_key(&key) {
            tracing::warn!(key = %key, "duplicate citation key, keeping the later entry");
        }
        self.entries.insert(key, entry)
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
