use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while compiling, generating or (de)serializing an effect.
#[derive(Error, Debug)]
pub enum HfxError {
    #[error("line {line}: expected {expected}, found {found} `{text}`")]
    UnexpectedToken {
        expected: &'static str,
        found: &'static str,
        text: String,
        line: u32,
    },

    #[error("line {line}: unsupported default value `{text}` for property `{property}`")]
    UnsupportedDefault {
        property: String,
        text: String,
        line: u32,
    },

    #[error("line {line}: numeric literal dropped, literal buffer is full")]
    LiteralOverflow { line: u32 },

    #[error("pass `{pass}` {stage} stage references missing code chunk (index {index:#x})")]
    UnresolvedCodeChunk {
        pass: String,
        stage: String,
        index: u32,
    },

    #[error("failed to open `{}`: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {what} discriminant {value}")]
    InvalidDiscriminant { what: &'static str, value: u32 },

    #[error("length {0} does not fit a 32-bit prefix")]
    LengthOverflow(usize),

    #[error("string payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HfxError>;
