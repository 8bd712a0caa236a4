//! Recursive descent parsing of BibTeX source.
//!
//! The grammar is
//! ```text
//! bibtex           := ( stray_text? directive )*
//! directive        := '@' key '{' body '}'
//! body             := key_equals_value | value | comment_text | entry_body
//! entry_body       := key ( ',' key_equals_value ( ',' key_equals_value )* ','? )?
//! key_equals_value := key '=' value
//! value            := single_value ( '#' single_value )*
//! single_value     := '{' balanced_text '}' | '"' quoted_text '"' | key
//! ```
//! Whitespace and `%` line comments may appear between any two tokens.
//!
//! A failure inside a directive never aborts the parse: the error is recorded, the partial
//! directive is dropped, and scanning resumes at the next `@`.
mod cursor;
mod validate;

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, trace, warn};
use unicase::UniCase;

use self::cursor::Cursor;
use crate::bibliography::{
    BIBTEX_FIELD, Bibliography, Entry, FieldValue, SOURCE_TYPE_FIELD, TYPE_FIELD,
};
use crate::convert::{Converter, strip_braces};
use crate::error::{Error, ErrorCode, Result};
use crate::macros::MacroDictionary;
use crate::names::{NameParser, PropositionRule};
use crate::unicode::UnicodeMapping;

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fields whose values are split into names. Matched case-insensitively.
    pub name_fields: Vec<String>,
    /// Predefine `jan` through `dec`.
    pub month_macros: bool,
    /// Replacement for `\textit{`.
    pub italic_open: String,
    /// Replacement for the brace closing a `\textit{` group.
    pub italic_close: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name_fields: vec!["author".to_string(), "editor".to_string()],
            month_macros: true,
            italic_open: "<i>".to_string(),
            italic_close: "</i>".to_string(),
        }
    }
}

/// The kinds of directive, distinguished by the name following `@`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryType<'r> {
    Preamble,
    Comment,
    Macro,
    Regular(&'r str),
}

impl<'r> EntryType<'r> {
    fn from_name(name: &'r str) -> Self {
        let folded = UniCase::new(name);
        if folded == UniCase::new("string") {
            Self::Macro
        } else if folded == UniCase::new("preamble") {
            Self::Preamble
        } else if folded == UniCase::new("comment") {
            Self::Comment
        } else {
            Self::Regular(name)
        }
    }
}

/// A successfully parsed directive.
#[derive(Debug)]
enum Directive {
    Entry { key: String, entry: Entry },
    Macro { name: String, value: String },
    Preamble,
    Comment(String),
}

/// A reusable BibTeX parser.
///
/// The parser holds only immutable configuration: the shared [`UnicodeMapping`], the name
/// parsing rule, and the macros every parse starts with. Each call to [`Parser::parse`] works
/// on fresh state, so `@string` definitions never leak between calls and one parser can be
/// shared between threads.
///
/// ```
/// use bibtex_unicode::{Parser, UnicodeMapping};
///
/// let parser = Parser::new(UnicodeMapping::empty());
/// let bib = parser.parse("@article{k, title = {On {T}rees}, month = sep}");
///
/// let entry = bib.get_entry("k").unwrap();
/// assert_eq!(entry.entry_type(), "article");
/// assert_eq!(entry.text("title"), Some("On Trees"));
/// assert_eq!(entry.text("month"), Some("September"));
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    converter: Converter,
    macros: MacroDictionary,
}

impl Parser {
    pub fn new<M: Into<Arc<UnicodeMapping>>>(mapping: M) -> Self {
        Self::with_config(mapping, Config::default())
    }

    pub fn with_config<M: Into<Arc<UnicodeMapping>>>(mapping: M, config: Config) -> Self {
        let macros = if config.month_macros {
            MacroDictionary::with_month_macros()
        } else {
            MacroDictionary::default()
        };

        Self {
            converter: Converter::new(mapping.into(), NameParser::default(), &config),
            macros,
        }
    }

    /// Add macros which are defined at the start of every parse. They replace month macros
    /// with the same names.
    pub fn with_macros(mut self, macros: MacroDictionary) -> Self {
        self.macros.extend(macros);
        self
    }

    /// Replace the rule deciding which name parts are propositions.
    pub fn with_proposition_rule<R: PropositionRule + 'static>(mut self, rule: R) -> Self {
        self.converter.set_name_parser(NameParser::new(rule));
        self
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// Parse a complete bibliography. Errors are collected in [`Bibliography::errors`].
    pub fn parse(&self, input: &str) -> Bibliography {
        ParseState::new(self, input).run()
    }
}

/// Parse `input` with the default configuration.
pub fn parse<M: Into<Arc<UnicodeMapping>>>(input: &str, mapping: M) -> Bibliography {
    Parser::new(mapping).parse(input)
}

/// The state of a single call to [`Parser::parse`].
struct ParseState<'p, 'r> {
    parser: &'p Parser,
    cursor: Cursor<'r>,
    macros: MacroDictionary,
    bib: Bibliography,
}

impl<'p, 'r> ParseState<'p, 'r> {
    fn new(parser: &'p Parser, input: &'r str) -> Self {
        Self {
            parser,
            cursor: Cursor::new(input),
            macros: parser.macros.clone(),
            bib: Bibliography::default(),
        }
    }

    fn run(mut self) -> Bibliography {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.at_end() {
                break;
            }

            if !self.cursor.peek("@") {
                let origin = self.cursor.clone();
                let text = self.cursor.skip_to(b'@');
                self.record(origin.error(ErrorCode::StrayText(text.trim_end().to_string())));
                continue;
            }

            let start = self.cursor.pos();
            match self.directive(start) {
                Ok(directive) => self.apply(directive),
                Err(err) => {
                    self.record(err);
                    self.resync(start);
                }
            }
        }

        debug!(
            entries = self.bib.entries.len(),
            errors = self.bib.errors.len(),
            "parsed bibliography"
        );
        self.bib
    }

    fn record(&mut self, err: Error) {
        warn!(line = err.line, "{}", err.code);
        self.bib.errors.push(err);
    }

    /// Move to the next `@` after the failed directive starting at `start`.
    fn resync(&mut self, start: usize) {
        if self.cursor.pos() <= start {
            let _ = self.cursor.eat("@");
        }
        self.cursor.skip_to(b'@');
    }

    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Entry { key, entry } => {
                debug!(key = %key, fields = entry.len(), "parsed entry");
                self.bib.insert(key, entry);
            }
            Directive::Macro { name, value } => {
                trace!(name = %name, value = %value, "defined macro");
                self.macros.insert(name, value);
            }
            Directive::Preamble => {}
            Directive::Comment(body) => self.bib.comments.push(body),
        }
    }

    /// Parse one directive starting at the `@` at `start`.
    fn directive(&mut self, start: usize) -> Result<Directive> {
        self.cursor.eat("@")?;
        let name = self.cursor.key()?;
        if name.is_empty() {
            return Err(self.cursor.error(ErrorCode::MissingEntryType));
        }

        self.cursor.eat("{")?;
        let mut directive = match EntryType::from_name(name) {
            EntryType::Macro => self.macro_body()?,
            EntryType::Preamble => {
                self.value()?;
                Directive::Preamble
            }
            EntryType::Comment => Directive::Comment(self.cursor.comment_body()?.to_string()),
            EntryType::Regular(entry_type) => self.entry_body(entry_type)?,
        };
        let end = self.cursor.eat("}")?;

        if let Directive::Entry { entry, .. } = &mut directive {
            entry.insert(BIBTEX_FIELD, self.cursor.slice(start, end));
            entry.add_short_names(self.parser.converter.name_fields());
        }
        Ok(directive)
    }

    /// `name = value` inside `@string`.
    fn macro_body(&mut self) -> Result<Directive> {
        let name = self.key_equals()?;
        let value = strip_braces(&self.value()?);
        Ok(Directive::Macro { name, value })
    }

    /// The citation key and the fields of a regular entry.
    fn entry_body(&mut self, entry_type: &str) -> Result<Directive> {
        let key = self.cursor.key()?.to_string();
        let mut entry = Entry::new(&entry_type.to_lowercase());

        if self.cursor.peek(",") {
            self.cursor.eat(",")?;
            while !self.cursor.peek("}") {
                let (field, value) = self.field()?;
                if field == TYPE_FIELD {
                    // `type` stays the entry keyword
                    tracing::debug!(key = %key, "storing source `type` field as `source_type`");
                    entry.insert(SOURCE_TYPE_FIELD, value);
                } else {
                    entry.insert(field, value);
                }
                if !self.cursor.peek(",") {
                    break;
                }
                self.cursor.eat(",")?;
            }
        }

        Ok(Directive::Entry { key, entry })
    }

    fn field(&mut self) -> Result<(String, FieldValue)> {
        let key = self.key_equals()?;
        let text = self.value()?;
        let value = self.parser.converter.finish(&key, text);
        Ok((key, value))
    }

    /// Consume a key followed by `=`, returning the lowercased key.
    fn key_equals(&mut self) -> Result<String> {
        let key = self.cursor.key()?.to_lowercase();
        if !self.cursor.peek("=") {
            return Err(self.cursor.error(ErrorCode::MissingEquals));
        }
        self.cursor.eat("=")?;
        Ok(key)
    }

    /// Parse `single_value ( '#' single_value )*`, returning the concatenated normalized text.
    fn value(&mut self) -> Result<String> {
        let mut text = self.single_value()?;
        while self.cursor.peek("#") {
            self.cursor.eat("#")?;
            text.push_str(&self.single_value()?);
        }
        Ok(text)
    }

    fn single_value(&mut self) -> Result<String> {
        let converter = &self.parser.converter;
        if self.cursor.peek("{") {
            Ok(converter.normalize(self.cursor.braced()?))
        } else if self.cursor.peek("\"") {
            Ok(converter.normalize(self.cursor.quoted()?))
        } else {
            let key = self.cursor.key()?;
            Ok(match self.macros.get(key) {
                Some(expansion) => expansion.to_string(),
                None => key.to_string(),
            })
        }
    }
}
