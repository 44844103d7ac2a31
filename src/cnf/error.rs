//! Errors raised around the scanner.
//!
//! Tokenizing itself cannot fail. These cover the host-facing pieces: looking up
//! lexers, loading configuration and rendering output.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no lexer for alias '{0}' found")]
    LexerNotFound(String),

    #[error("no lexer for filename '{0}' found")]
    NoLexerForFile(String),

    #[error("invalid file name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("unknown output format '{0}'")]
    UnknownFormat(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
