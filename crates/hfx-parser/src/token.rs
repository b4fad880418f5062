//! Tokens produced by the [`Lexer`](crate::Lexer).

use hfx_core::HfxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Unknown,
    OpenParen,
    CloseParen,
    Colon,
    Semicolon,
    Asterisk,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Equals,
    Hash,
    Comma,
    String,
    Identifier,
    Number,
    EndOfStream,
}

impl TokenKind {
    /// Kind of a single-character token, if `c` is one.
    pub fn from_punctuation(c: u8) -> Option<Self> {
        let kind = match c {
            b'(' => TokenKind::OpenParen,
            b')' => TokenKind::CloseParen,
            b':' => TokenKind::Colon,
            b';' => TokenKind::Semicolon,
            b'*' => TokenKind::Asterisk,
            b'[' => TokenKind::OpenBracket,
            b']' => TokenKind::CloseBracket,
            b'{' => TokenKind::OpenBrace,
            b'}' => TokenKind::CloseBrace,
            b'=' => TokenKind::Equals,
            b'#' => TokenKind::Hash,
            b',' => TokenKind::Comma,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Unknown => "unknown",
            TokenKind::OpenParen => "`(`",
            TokenKind::CloseParen => "`)`",
            TokenKind::Colon => "`:`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Asterisk => "`*`",
            TokenKind::OpenBracket => "`[`",
            TokenKind::CloseBracket => "`]`",
            TokenKind::OpenBrace => "`{`",
            TokenKind::CloseBrace => "`}`",
            TokenKind::Equals => "`=`",
            TokenKind::Hash => "`#`",
            TokenKind::Comma => "`,`",
            TokenKind::String => "string",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::EndOfStream => "end of stream",
        }
    }
}

/// A token borrowing its text from the source buffer.
///
/// For strings `text` excludes the quotes. `offset` is the byte offset of
/// `text` in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub offset: usize,
    pub line: u32,
}

impl<'src> Token<'src> {
    /// Byte offset one past the end of `text`.
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        expect_keyword(self.text, keyword)
    }
}

/// Exact keyword comparison: same length, same bytes.
pub fn expect_keyword(text: &str, keyword: &str) -> bool {
    text.len() == keyword.len() && text.as_bytes() == keyword.as_bytes()
}

/// A required token kind was not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnexpectedToken {
    pub expected: TokenKind,
    pub found: TokenKind,
    pub text: String,
    pub line: u32,
}

impl From<UnexpectedToken> for HfxError {
    fn from(err: UnexpectedToken) -> Self {
        HfxError::UnexpectedToken {
            expected: err.expected.name(),
            found: err.found.name(),
            text: err.text,
            line: err.line,
        }
    }
}
