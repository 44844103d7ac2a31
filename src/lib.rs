//! # cnflex
//!
//! A lexer for OpenSSL configuration files (`openssl.cnf` and friends), producing
//! classified tokens for syntax highlighting.
//!
//! It is not a parser. Nothing is validated or resolved; the output is a flat,
//! gap-free sequence of `(TokenKind, Range<usize>)` pairs that covers the input
//! exactly. See [cnf::lexing] for how the scanner works.
//!
//! ```text
//! use cnflex::cnf::{lex, TokenKind};
//!
//! let tokens = lex("[ req ]\ndefault_bits = 2048\n");
//! assert_eq!(tokens[0], (TokenKind::SectionHeader, "[ req ]"));
//! ```

pub mod cnf;
