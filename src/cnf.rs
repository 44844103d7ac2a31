//! OpenSSL configuration lexing
//!
//!     The modules here cover one job: annotating the text of an OpenSSL `.cnf`/`.conf`
//!     file with token kinds for syntax highlighting.
//!
//!     token       the closed set of token kinds
//!     lexing      mode stack, rule tables and the scanner driver
//!     merging     coalescing adjacent tokens of one kind
//!     detection   cheap content sniffing for autodetection
//!     registry    lookup of lexers by alias, file name or content
//!     config      layered TOML configuration for scan policies
//!     formats     plain / json / yaml / html renderings of a token stream

pub mod config;
pub mod detection;
pub mod error;
pub mod formats;
pub mod lexing;
pub mod merging;
pub mod registry;
pub mod token;

pub use detection::looks_like;
pub use error::{Error, Result};
pub use lexing::{lex, tokenize, ScanOptions, Scanner, Tokens};
pub use merging::MergePolicy;
pub use registry::{Lexer, LexerRegistry, OpenSslLexer};
pub use token::{KindSet, Token, TokenKind};
