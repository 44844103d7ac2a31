//! Lexer
//!
//!     This module turns an OpenSSL configuration buffer into a stream of classified
//!     tokens for syntax highlighting. It does not parse: no tree is built, nothing is
//!     validated, and `$variable` references are not resolved. Only character ranges
//!     are annotated with a [`TokenKind`].
//!
//! The Lexing Pipeline
//!
//!     1. Scanning. See [scanner]. A small state machine over an explicit mode stack
//!        (see [modes]) runs ordered regex rules (see [rules]) from the active mode.
//!        First match wins; a per-mode catch-all consumes one character when nothing
//!        matches, so the scanner is total over any input.
//!
//!     2. Merging. See [merging](crate::cnf::merging). Adjacent tokens of the same
//!        kind are coalesced according to a [`MergePolicy`].
//!
//!     Both stages are lazy iterators, so callers can stop at any point. Every call to
//!     [`tokenize`] starts from scratch with a fresh mode stack.
//!
//! Coverage
//!
//!     Token ranges are contiguous and cover the whole input, before and after merging:
//!     concatenating the token texts gives back the source exactly.

pub mod modes;
pub mod rules;
pub mod scanner;

use crate::cnf::merging::{MergePolicy, Merged};
use crate::cnf::token::{Token, TokenKind};
pub use modes::{Mode, ModeStack, Transition};
pub use scanner::RawTokens;
use serde::Deserialize;

/// Knobs for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScanOptions {
    /// A `#` inside a value starts a comment. When off, it stays value text.
    pub inline_comments: bool,
    pub merge: MergePolicy,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            inline_comments: true,
            merge: MergePolicy::default(),
        }
    }
}

/// Configured entry point to the scanner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Scanner { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Merged token stream over `source`.
    pub fn tokenize<'a>(&self, source: &'a str) -> Tokens<'a> {
        Tokens {
            inner: Merged::new(self.tokenize_raw(source), self.options.merge),
        }
    }

    /// Token stream straight from the rule tables, without merging.
    pub fn tokenize_raw<'a>(&self, source: &'a str) -> RawTokens<'a> {
        RawTokens::new(source, self.options.inline_comments)
    }
}

/// Lazy stream of `(TokenKind, Range<usize>)` pairs.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    inner: Merged<RawTokens<'a>>,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.inner.next()
    }
}

/// Tokenize with the default options.
pub fn tokenize(source: &str) -> Tokens<'_> {
    Scanner::default().tokenize(source)
}

/// Tokenize with the default options and resolve each range to its text.
pub fn lex(source: &str) -> Vec<(TokenKind, &str)> {
    resolve(source, tokenize(source))
}

/// Pair each token kind with the slice of `source` it covers.
pub fn resolve<'a, I>(source: &'a str, tokens: I) -> Vec<(TokenKind, &'a str)>
where
    I: IntoIterator<Item = Token>,
{
    tokens
        .into_iter()
        .map(|(kind, range)| (kind, &source[range]))
        .collect()
}
