//! Hand-written tokenizer for `.hfx` source.
//!
//! The lexer never copies text: every [`Token`] borrows from the source
//! buffer. Numbers are also pushed into the [`LiteralBuffer`] as they are
//! scanned, so the parser can pick the value up by "last entry".
//!
//! [`Lexer::expect_token`] is sticky: after the first failure every further
//! expectation succeeds without consuming input, and the first failure is kept
//! for reporting.

use hfx_core::{LiteralBuffer, INVALID_LITERAL_INDEX};
use tracing::warn;

use crate::token::{Token, TokenKind, UnexpectedToken};

/// Saved scan position for speculative parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    position: usize,
    line: u32,
}

pub struct Lexer<'src, 'buf> {
    source: &'src str,
    position: usize,
    line: u32,
    error: Option<UnexpectedToken>,
    literals: &'buf mut LiteralBuffer,
    last_literal: u32,
}

fn is_end_of_line(c: u8) -> bool {
    c == b'\n' || c == b'\r'
}

fn is_whitespace(c: u8) -> bool {
    c == b' ' || c == b'\t' || is_end_of_line(c)
}

impl<'src, 'buf> Lexer<'src, 'buf> {
    pub fn new(source: &'src str, literals: &'buf mut LiteralBuffer) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            error: None,
            literals,
            last_literal: INVALID_LITERAL_INDEX,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Value of the most recently scanned number, or `None` if it did not fit
    /// in the literal buffer.
    pub fn last_literal(&self) -> Option<f64> {
        if self.last_literal == INVALID_LITERAL_INDEX {
            return None;
        }
        self.literals.get_data(self.last_literal)
    }

    /// First expectation failure, if any.
    pub fn error(&self) -> Option<&UnexpectedToken> {
        self.error.as_ref()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error_line(&self) -> Option<u32> {
        self.error.as_ref().map(|err| err.line)
    }

    pub fn take_error(&mut self) -> Option<UnexpectedToken> {
        self.error.take()
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
            line: self.line,
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.position;
        self.line = checkpoint.line;
    }

    /// Token spanning from the start of `first` to the end of `last`.
    pub fn join(&self, first: &Token<'src>, last: &Token<'src>) -> Token<'src> {
        Token {
            kind: first.kind,
            text: &self.source[first.offset..last.end()],
            offset: first.offset,
            line: first.line,
        }
    }

    /// Scan the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        self.skip_whitespace_and_comments();

        let start = self.position;
        let line = self.line;
        let Some(&c) = self.source.as_bytes().get(start) else {
            return Token {
                kind: TokenKind::EndOfStream,
                text: &self.source[start..],
                offset: start,
                line,
            };
        };
        self.position += 1;

        if let Some(kind) = TokenKind::from_punctuation(c) {
            return self.token(kind, start, line);
        }

        match c {
            b'"' => self.scan_string(line),
            c if c.is_ascii_alphabetic() => {
                while matches!(self.peek(0), b'_') || self.peek(0).is_ascii_alphanumeric() {
                    self.position += 1;
                }
                self.token(TokenKind::Identifier, start, line)
            }
            c if c.is_ascii_digit() || c == b'-' => {
                self.position = start;
                let value = self.scan_number();
                self.last_literal = self.literals.add_data(value);
                self.token(TokenKind::Number, start, line)
            }
            _ => {
                // Step over the whole character so the span stays on a char
                // boundary.
                let width = self.source[start..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                self.position = start + width;
                self.token(TokenKind::Unknown, start, line)
            }
        }
    }

    /// Consume the next token and report whether it has the expected kind.
    pub fn equal_token(&mut self, expected: TokenKind) -> bool {
        self.next_token().kind == expected
    }

    /// Consume the next token and require the expected kind.
    ///
    /// Once an expectation has failed, this returns a placeholder of the
    /// expected kind (empty text, nothing consumed) for the rest of the
    /// lexer's life.
    pub fn expect_token(&mut self, expected: TokenKind) -> Result<Token<'src>, UnexpectedToken> {
        if self.error.is_some() {
            return Ok(Token {
                kind: expected,
                text: &self.source[self.position..self.position],
                offset: self.position,
                line: self.line,
            });
        }

        let token = self.next_token();
        if token.kind == expected {
            return Ok(token);
        }

        let err = UnexpectedToken {
            expected,
            found: token.kind,
            text: token.text.to_owned(),
            line: token.line,
        };
        warn!(
            line = err.line,
            expected = expected.name(),
            found = token.kind.name(),
            text = token.text,
            "unexpected token"
        );
        self.error = Some(err.clone());
        Err(err)
    }

    /// Record a structural error found by the parser itself.
    pub fn report(&mut self, expected: TokenKind, found: &Token<'src>) {
        if self.error.is_none() {
            warn!(
                line = found.line,
                expected = expected.name(),
                found = found.kind.name(),
                "unexpected token"
            );
            self.error = Some(UnexpectedToken {
                expected,
                found: found.kind,
                text: found.text.to_owned(),
                line: found.line,
            });
        }
    }

    fn token(&self, kind: TokenKind, start: usize, line: u32) -> Token<'src> {
        Token {
            kind,
            text: &self.source[start..self.position],
            offset: start,
            line,
        }
    }

    fn peek(&self, ahead: usize) -> u8 {
        self.source
            .as_bytes()
            .get(self.position + ahead)
            .copied()
            .unwrap_or(0)
    }

    fn at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            let c = self.peek(0);
            if is_whitespace(c) {
                if c == b'\n' {
                    self.line += 1;
                }
                self.position += 1;
            } else if c == b'/' && self.peek(1) == b'/' {
                self.position += 2;
                while !self.at_end() && !is_end_of_line(self.peek(0)) {
                    self.position += 1;
                }
            } else if c == b'/' && self.peek(1) == b'*' {
                self.position += 2;
                while !self.at_end() && !(self.peek(0) == b'*' && self.peek(1) == b'/') {
                    if self.peek(0) == b'\n' {
                        self.line += 1;
                    }
                    self.position += 1;
                }
                if !self.at_end() {
                    self.position += 2;
                }
            } else {
                break;
            }
        }
    }

    /// Scan a string whose opening quote was consumed. A backslash escapes the
    /// following character.
    fn scan_string(&mut self, line: u32) -> Token<'src> {
        let start = self.position;
        while !self.at_end() && self.peek(0) != b'"' {
            if self.peek(0) == b'\\' && self.position + 1 < self.source.len() {
                self.position += 1;
            }
            if self.peek(0) == b'\n' {
                self.line += 1;
            }
            self.position += 1;
        }
        let token = self.token(TokenKind::String, start, line);
        if !self.at_end() {
            self.position += 1;
        }
        token
    }

    /// Parse `[-]digits[.digits][e|E]`.
    ///
    /// The exponent marker is consumed but its digits are not, and no
    /// scaling is applied: `4e2` scans as `4`.
    fn scan_number(&mut self) -> f64 {
        let mut sign = 1.0;
        if self.peek(0) == b'-' {
            sign = -1.0;
            self.position += 1;
        }

        while self.peek(0) == b'0' {
            self.position += 1;
        }

        let mut integer_part: u64 = 0;
        while self.peek(0).is_ascii_digit() {
            let digit = u64::from(self.peek(0) - b'0');
            integer_part = integer_part.saturating_mul(10).saturating_add(digit);
            self.position += 1;
        }

        let mut fractional_part: u64 = 0;
        let mut fractional_divisor: u64 = 1;
        if self.peek(0) == b'.' {
            self.position += 1;
            while self.peek(0).is_ascii_digit() {
                // Digits past u64 precision are dropped.
                if fractional_divisor < 1_000_000_000_000_000_000 {
                    fractional_part = fractional_part * 10 + u64::from(self.peek(0) - b'0');
                    fractional_divisor *= 10;
                }
                self.position += 1;
            }
        }

        if matches!(self.peek(0), b'e' | b'E') {
            self.position += 1;
        }

        sign * (integer_part as f64 + fractional_part as f64 / fractional_divisor as f64)
    }
}
