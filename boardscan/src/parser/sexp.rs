//! S-expression reader for KiCad board files.
//!
//! Produces a span-carrying tree of atoms and lists. The reader is
//! best-effort: a malformed child group is skipped up to its balancing
//! parenthesis and reading continues with the siblings, so one bad group
//! never loses the rest of the file.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum group nesting the reader will follow. Nesting depth is author
/// controlled, so anything deeper is treated as a malformed group and
/// skipped rather than recursed into.
pub const MAX_GROUP_DEPTH: usize = 128;

#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEof(usize),
    #[error("unterminated quoted string starting at byte {0}")]
    UnterminatedString(usize),
    #[error("group at byte {0} nested deeper than {MAX_GROUP_DEPTH} levels")]
    DepthExceeded(usize),
    #[error("expected '(' at byte {0}")]
    ExpectedGroup(usize),
}

/// Byte extent of a group in the source buffer, including both parentheses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SExp {
    Atom(String),
    List(Vec<SExp>, Span),
}

impl SExp {
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            SExp::Atom(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SExp]> {
        match self {
            SExp::List(items, _) => Some(items),
            _ => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            SExp::List(_, span) => Some(*span),
            _ => None,
        }
    }

    /// Leading keyword of a list, e.g. `net` for `(net 2 "GND")`.
    pub fn tag(&self) -> Option<&str> {
        self.as_list()?.first()?.as_atom()
    }

    /// The i-th atom argument after the tag: `arg(0)` of `(net 2 "GND")`
    /// is `2`, `arg(1)` is `GND`.
    pub fn arg(&self, i: usize) -> Option<&str> {
        self.as_list()?.get(i + 1)?.as_atom()
    }

    /// First child list whose tag equals `key`.
    pub fn get(&self, key: &str) -> Option<&SExp> {
        self.as_list()?.iter().find(|item| item.tag() == Some(key))
    }

    /// Every child list whose tag equals `key`, in file order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a SExp> + 'a {
        self.as_list()
            .unwrap_or_default()
            .iter()
            .filter(move |item| item.tag() == Some(key))
    }

    /// First value atom of the child list `key`: `value_of("width")` of
    /// `(segment (width 0.25) ...)` is `0.25`.
    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.get(key)?.arg(0)
    }
}

impl fmt::Display for SExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SExp::Atom(s) => {
                if s.is_empty()
                    || s.contains(|c: char| {
                        c.is_whitespace() || c == '(' || c == ')' || c == '"'
                    })
                {
                    write!(f, "\"{}\"", s.replace('"', "\\\""))
                } else {
                    write!(f, "{}", s)
                }
            }
            SExp::List(items, _) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

pub struct SExpReader<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> SExpReader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    /// Read the root group. Returns `None` for an empty buffer, a buffer
    /// that does not start with a group, or a root so malformed that no
    /// tree could be recovered; none of these are fatal to the caller.
    pub fn parse(&mut self) -> Option<SExp> {
        self.skip_whitespace();
        if self.is_eof() {
            tracing::debug!("empty input buffer");
            return None;
        }
        if self.peek() != Some(b'(') {
            tracing::warn!("input does not start with a group at byte {}", self.pos);
            return None;
        }
        match self.read_list() {
            Ok(root) => Some(root),
            Err(err) => {
                tracing::warn!("unrecoverable root group: {err}");
                None
            }
        }
    }

    fn read_list(&mut self) -> Result<SExp, SyntaxError> {
        let start = self.pos;
        if self.depth >= MAX_GROUP_DEPTH {
            return Err(SyntaxError::DepthExceeded(start));
        }
        self.expect(b'(')?;
        self.depth += 1;
        let mut items = Vec::new();
        let end;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    tracing::warn!("group at byte {start} is unbalanced, input ended before ')'");
                    end = self.pos;
                    break;
                }
                Some(b')') => {
                    self.advance();
                    end = self.pos;
                    break;
                }
                Some(b'(') => {
                    let child_start = self.pos;
                    match self.read_list() {
                        Ok(child) => items.push(child),
                        Err(err) => {
                            tracing::warn!("skipping malformed group at byte {child_start}: {err}");
                            self.recover_group(child_start);
                        }
                    }
                }
                Some(b'"') => match self.read_string() {
                    Ok(atom) => items.push(atom),
                    Err(err) => {
                        self.depth -= 1;
                        return Err(err);
                    }
                },
                Some(_) => items.push(self.read_symbol()),
            }
        }
        self.depth -= 1;
        Ok(SExp::List(items, Span { start, end }))
    }

    fn read_string(&mut self) -> Result<SExp, SyntaxError> {
        let start = self.pos;
        self.advance(); // opening quote
        let mut buf = Vec::new();
        loop {
            match self.peek() {
                // Strings never span lines in the board format, so a bare
                // newline means the closing quote is missing.
                None | Some(b'\n') | Some(b'\r') => {
                    return Err(SyntaxError::UnterminatedString(start));
                }
                Some(b'"') => {
                    self.advance();
                    break;
                }
                Some(b'\\') => {
                    self.advance();
                    let escaped = self.peek().ok_or(SyntaxError::UnterminatedString(start))?;
                    buf.push(match escaped {
                        b'n' => b'\n',
                        b't' => b'\t',
                        b'r' => b'\r',
                        other => other,
                    });
                    self.advance();
                }
                Some(byte) => {
                    buf.push(byte);
                    self.advance();
                }
            }
        }
        Ok(SExp::Atom(String::from_utf8_lossy(&buf).into_owned()))
    }

    fn read_symbol(&mut self) -> SExp {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if byte.is_ascii_whitespace() || byte == b'(' || byte == b')' || byte == b'"' {
                break;
            }
            self.advance();
        }
        let text = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();
        SExp::Atom(text)
    }

    /// Skip a malformed group: rewind to its opening parenthesis and scan
    /// forward to the balancing close by depth counting. Quoted text is
    /// stepped over so embedded parentheses do not perturb the count; an
    /// unterminated quote is abandoned at end of line.
    fn recover_group(&mut self, start: usize) {
        self.pos = start;
        let mut depth = 0usize;
        while let Some(byte) = self.peek() {
            match byte {
                b'(' => depth += 1,
                b')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                b'"' => {
                    self.advance();
                    while let Some(inner) = self.peek() {
                        match inner {
                            b'"' => break,
                            b'\n' | b'\r' => break,
                            b'\\' => {
                                self.advance();
                                if self.peek().is_some() {
                                    self.advance();
                                }
                                continue;
                            }
                            _ => self.advance(),
                        }
                    }
                    if self.peek() == Some(b'"') {
                        self.advance();
                    }
                    continue;
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.peek() {
            if !byte.is_ascii_whitespace() {
                break;
            }
            self.advance();
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), SyntaxError> {
        match self.peek() {
            Some(byte) if byte == expected => {
                self.advance();
                Ok(())
            }
            Some(_) => Err(SyntaxError::ExpectedGroup(self.pos)),
            None => Err(SyntaxError::UnexpectedEof(self.pos)),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) {
        if self.pos < self.input.len() {
            self.pos += 1;
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}
