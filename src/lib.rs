//! A BibTeX parser which normalizes LaTeX markup to Unicode and decomposes author and editor
//! names.
//!
//! ```
//! use bibtex_unicode::{CharacterKind, CharacterRecord, Parser, UnicodeMapping};
//!
//! let mapping = UnicodeMapping::from_records([
//!     CharacterRecord::new("U000E9", &[r"\'{e}"], CharacterKind::Normal),
//! ]);
//! let parser = Parser::new(mapping);
//!
//! let bib = parser.parse(r"@book{k, author = {Ren\'{e} Descartes}, title = {M\'{e}ditations}}");
//! let entry = bib.get_entry("k").unwrap();
//! assert_eq!(entry.text("title"), Some("Méditations"));
//! assert_eq!(entry.short("author"), Some(&["Descartes, R.".to_string()][..]));
//! ```

/// Parsed entries and the parse result.
pub mod bibliography;

/// Conversion of raw values.
pub mod convert;

/// Error types for parsing.
pub mod error;

/// `@string` macro definitions.
pub mod macros;

/// Decomposition of author and editor names.
pub mod names;

/// Fundamental parsers.
pub mod parse;

/// LaTeX to Unicode correspondence tables.
pub mod unicode;

// re-exports
pub use bibliography::{Bibliography, Entry, FieldValue};
pub use convert::Converter;
pub use error::{Error, ErrorCode, Result};
pub use macros::MacroDictionary;
pub use names::{LowercaseInitial, Name, NameParser, PropositionRule};
pub use parse::{Config, Parser, parse};
pub use unicode::{CharacterKind, CharacterRecord, UnicodeMapping};
