//! Position tracking over the raw input.
//!
//! All cuts are performed immediately before or after an ascii byte, so every slice handed out
//! by the cursor is a valid `str`.
use memchr::{memchr, memchr_iter, memchr2_iter, memchr3_iter};

use super::validate::is_key_byte;
use crate::error::{Error, ErrorCode, Result};

#[derive(Debug, Clone)]
pub struct Cursor<'r> {
    input: &'r str,
    pos: usize,
    line: usize,
}

impl<'r> Cursor<'r> {
    pub fn new(input: &'r str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
        }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// The input between `start` and `end`.
    pub fn slice(&self, start: usize, end: usize) -> &'r str {
        &self.input[start..end]
    }

    /// Construct an error located at the current position.
    pub fn error(&self, code: ErrorCode) -> Error {
        Error::syntax(code, self.input, self.pos, self.line)
    }

    #[inline]
    fn bytes(&self) -> &'r [u8] {
        self.input.as_bytes()
    }

    /// Advance to `end`, counting the newlines passed over.
    fn advance_to(&mut self, end: usize) {
        self.line += memchr_iter(b'\n', &self.bytes()[self.pos..end]).count();
        self.pos = end;
    }

    /// Discard whitespace and `%` line comments.
    pub fn skip_whitespace(&mut self) {
        let bytes = self.bytes();
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'%' => match memchr(b'\n', &bytes[self.pos..]) {
                    // leave the newline for the next iteration so it is counted
                    Some(offset) => self.pos += offset,
                    None => self.pos = bytes.len(),
                },
                _ => return,
            }
        }
    }

    /// Check whether `literal` follows after any whitespace, without consuming it.
    pub fn peek(&mut self, literal: &str) -> bool {
        self.skip_whitespace();
        self.bytes()[self.pos..].starts_with(literal.as_bytes())
    }

    /// Consume `literal` and the whitespace around it. Returns the offset immediately after
    /// `literal`.
    pub fn eat(&mut self, literal: &'static str) -> Result<usize> {
        self.open(literal)?;
        let end = self.pos;
        self.skip_whitespace();
        Ok(end)
    }

    /// Consume `literal` after any whitespace, keeping the text following it intact.
    fn open(&mut self, literal: &'static str) -> Result<()> {
        if !self.peek(literal) {
            return Err(self.error(ErrorCode::TokenMismatch(literal)));
        }
        self.pos += literal.len();
        Ok(())
    }

    /// Advance to the next occurrence of `target`, or to the end of input. Returns the text
    /// passed over.
    pub fn skip_to(&mut self, target: u8) -> &'r str {
        let start = self.pos;
        let end = match memchr(target, &self.bytes()[start..]) {
            Some(offset) => start + offset,
            None => self.input.len(),
        };
        self.advance_to(end);
        self.slice(start, end)
    }

    /// Consume a possibly empty run of key characters.
    pub fn key(&mut self) -> Result<&'r str> {
        let bytes = self.bytes();
        let start = self.pos;
        let mut end = start;
        while end < bytes.len() && is_key_byte(bytes[end]) {
            end += 1;
        }
        if end == bytes.len() {
            self.pos = end;
            return Err(self.error(ErrorCode::RunawayKey));
        }
        self.pos = end;
        Ok(self.slice(start, end))
    }

    #[inline]
    fn is_escaped(&self, idx: usize) -> bool {
        idx > 0 && self.bytes()[idx - 1] == b'\\'
    }

    /// Consume `{balanced text}` and return the text between the outer braces. Braces preceded
    /// by a backslash do not count towards the depth.
    pub fn braced(&mut self) -> Result<&'r str> {
        self.open("{")?;
        let start = self.pos;
        let mut depth = 0usize;

        for offset in memchr2_iter(b'{', b'}', &self.bytes()[start..]) {
            let idx = start + offset;
            if self.is_escaped(idx) {
                continue;
            }
            if self.bytes()[idx] == b'{' {
                depth += 1;
            } else if depth > 0 {
                depth -= 1;
            } else {
                self.advance_to(idx);
                self.eat("}")?;
                return Ok(self.slice(start, idx));
            }
        }

        self.advance_to(self.input.len());
        Err(self.error(ErrorCode::UnterminatedValue))
    }

    /// Consume `"quoted text"` and return the text between the quotes. A quote terminates only
    /// when it is not escaped and not protected by braces.
    pub fn quoted(&mut self) -> Result<&'r str> {
        self.open("\"")?;
        let start = self.pos;
        let mut depth = 0usize;

        for offset in memchr3_iter(b'"', b'{', b'}', &self.bytes()[start..]) {
            let idx = start + offset;
            if self.is_escaped(idx) {
                continue;
            }
            match self.bytes()[idx] {
                b'{' => depth += 1,
                b'}' => depth = depth.saturating_sub(1),
                _ if depth == 0 => {
                    self.advance_to(idx);
                    self.eat("\"")?;
                    return Ok(self.slice(start, idx));
                }
                _ => {}
            }
        }

        self.advance_to(self.input.len());
        Err(self.error(ErrorCode::UnterminatedValue))
    }

    /// Consume the raw body of a `@comment` up to, but not including, the first unescaped `}`.
    pub fn comment_body(&mut self) -> Result<&'r str> {
        let start = self.pos;
        for offset in memchr_iter(b'}', &self.bytes()[start..]) {
            let idx = start + offset;
            if !self.is_escaped(idx) {
                self.advance_to(idx);
                return Ok(self.slice(start, idx));
            }
        }

        self.advance_to(self.input.len());
        Err(self.error(ErrorCode::RunawayComment))
    }
}
