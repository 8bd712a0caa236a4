use serde::Serialize;
use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

/// Maximum number of characters of source text kept as error context.
pub const CONTEXT_LEN: usize = 100;

/// The kinds of failure recovered while parsing a directive.
#[derive(ThisError, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    /// The expected literal was not found at the cursor.
    #[error("token mismatch, expected {0:?}")]
    TokenMismatch(&'static str),
    /// An opening brace or quote has no terminator before the end of input.
    #[error("unterminated value")]
    UnterminatedValue,
    /// A key ran to the end of input.
    #[error("runaway key")]
    RunawayKey,
    /// A `@comment` body ran to the end of input.
    #[error("runaway comment")]
    RunawayComment,
    /// A field key is not followed by `=`.
    #[error("value expected, missing equals sign?")]
    MissingEquals,
    /// An `@` which is not followed by a directive name.
    #[error("missing entry type after '@'")]
    MissingEntryType,
    /// Text which is neither whitespace nor a `%` comment between directives.
    #[error("non-comment text in between entries: {0:?}")]
    StrayText(String),
}

/// A recovered parse error.
///
/// Errors never abort a parse: each one is attached to the
/// [`Bibliography`](crate::Bibliography) and scanning resumes at the next `@`.
#[derive(ThisError, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{code} at line {line}")]
pub struct Error {
    pub code: ErrorCode,
    /// Up to [`CONTEXT_LEN`] characters of input starting at the failure point.
    pub context: String,
    /// 1-based line of the failure point.
    pub line: usize,
}

impl Error {
    /// Construct a syntax error at `pos` in `input`.
    pub(crate) fn syntax(code: ErrorCode, input: &str, pos: usize, line: usize) -> Self {
        Self {
            code,
            context: context_at(input, pos),
            line,
        }
    }

    /// The human-readable message, without position information.
    pub fn message(&self) -> String {
        self.code.to_string()
    }
}

fn context_at(input: &str, pos: usize) -> String {
    match input.get(pos..) {
        Some(tail) => tail.chars().take(CONTEXT_LEN).collect(),
        None => String::new(),
    }
}
