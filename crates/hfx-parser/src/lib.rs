//! Lexer and parser for `.hfx` effect files.
//!
//! ```
//! let output = hfx_parser::parse_effect("effect Blit { glsl Copy { } pass Main { vertex = Copy } }")?;
//! assert_eq!(output.effect.name, "Blit");
//! assert!(output.error.is_none());
//! # Ok::<(), hfx_core::HfxError>(())
//! ```

pub mod lexer;
pub mod parser;
pub mod token;

pub use lexer::{Checkpoint, Lexer};
pub use parser::{ParseOutput, Parser};
pub use token::{expect_keyword, Token, TokenKind, UnexpectedToken};

use hfx_core::{LiteralBuffer, LiteralCapacity, Result};

/// Parse `source` with a default-sized literal buffer.
pub fn parse_effect(source: &str) -> Result<ParseOutput> {
    parse_effect_with(source, LiteralCapacity::default())
}

/// Parse `source` with a literal buffer of the given capacity.
pub fn parse_effect_with(source: &str, capacity: LiteralCapacity) -> Result<ParseOutput> {
    let mut literals = LiteralBuffer::new(capacity);
    let lexer = Lexer::new(source, &mut literals);
    Parser::new(lexer).parse()
}
