//! Lexer registry
//!
//! This module is how hosts find the scanner: by alias (`openssl`), by file name
//! (`*.cnf`, `*.conf`) or by sniffing content. Each lexer implements the `Lexer`
//! trait and is registered with `LexerRegistry`.

use crate::cnf::detection::looks_like;
use crate::cnf::error::{Error, Result};
use crate::cnf::lexing::{RawTokens, ScanOptions, Scanner, Tokens};
use glob::Pattern;
use std::path::Path;
use tracing::debug;

/// Trait for lexers a host can look up.
pub trait Lexer: Send + Sync {
    /// Display name (e.g., "OpenSSL")
    fn name(&self) -> &str;

    /// Lookup aliases, matched case-insensitively
    fn aliases(&self) -> &[&str];

    /// File name globs this lexer handles
    fn filenames(&self) -> &[&str];

    fn mimetypes(&self) -> &[&str] {
        &[]
    }

    /// Whether `text` looks like something this lexer handles
    fn analyse_text(&self, text: &str) -> bool;

    /// Tokenize a whole buffer
    fn tokenize<'a>(&self, source: &'a str) -> Tokens<'a>;

    /// Tokenize without the merge pass
    fn tokenize_raw<'a>(&self, source: &'a str) -> RawTokens<'a>;
}

/// The OpenSSL configuration lexer.
#[derive(Debug, Clone, Default)]
pub struct OpenSslLexer {
    scanner: Scanner,
}

impl OpenSslLexer {
    pub fn new(options: ScanOptions) -> Self {
        OpenSslLexer {
            scanner: Scanner::new(options),
        }
    }
}

impl Lexer for OpenSslLexer {
    fn name(&self) -> &str {
        "OpenSSL"
    }

    fn aliases(&self) -> &[&str] {
        &["openssl"]
    }

    fn filenames(&self) -> &[&str] {
        &["*.cnf", "*.conf"]
    }

    fn mimetypes(&self) -> &[&str] {
        &["text/x-openssl"]
    }

    fn analyse_text(&self, text: &str) -> bool {
        looks_like(text)
    }

    fn tokenize<'a>(&self, source: &'a str) -> Tokens<'a> {
        self.scanner.tokenize(source)
    }

    fn tokenize_raw<'a>(&self, source: &'a str) -> RawTokens<'a> {
        self.scanner.tokenize_raw(source)
    }
}

/// Match a file name against a glob such as `*.cnf` or `openssl*.cn?`.
fn glob_matches(pattern: &str, file_name: &str) -> Result<bool> {
    let compiled = Pattern::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(compiled.matches(file_name))
}

/// Registry of lexers
///
/// Lexers are kept in registration order; lookups return the first match.
pub struct LexerRegistry {
    lexers: Vec<Box<dyn Lexer>>,
}

impl LexerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        LexerRegistry { lexers: Vec::new() }
    }

    /// Create a registry with the built-in lexers using `options`
    pub fn with_options(options: ScanOptions) -> Self {
        let mut registry = Self::new();
        registry.register(OpenSslLexer::new(options));
        registry
    }

    /// Register a lexer
    ///
    /// A lexer with the same name replaces the existing one.
    pub fn register<L: Lexer + 'static>(&mut self, lexer: L) {
        self.lexers.retain(|existing| existing.name() != lexer.name());
        self.lexers.push(Box::new(lexer));
    }

    /// Get a lexer by alias
    pub fn get_by_name(&self, alias: &str) -> Result<&dyn Lexer> {
        let found = self.lexers.iter().find(|lexer| {
            lexer
                .aliases()
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(alias))
        });
        debug!(alias, found = found.is_some(), "lexer lookup by alias");
        found
            .map(|lexer| lexer.as_ref())
            .ok_or_else(|| Error::LexerNotFound(alias.to_string()))
    }

    /// Get a lexer for a file path, matching its file name against the globs
    ///
    /// A malformed glob in a registered lexer is reported rather than skipped.
    pub fn for_filename(&self, path: impl AsRef<Path>) -> Result<&dyn Lexer> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        for lexer in &self.lexers {
            for pattern in lexer.filenames() {
                if glob_matches(pattern, file_name)? {
                    debug!(file_name, lexer = lexer.name(), "lexer lookup by filename");
                    return Ok(lexer.as_ref());
                }
            }
        }
        debug!(file_name, "no lexer for filename");
        Err(Error::NoLexerForFile(path.display().to_string()))
    }

    /// First lexer whose content sniffing accepts `text`
    pub fn guess(&self, text: &str) -> Option<&dyn Lexer> {
        self.lexers
            .iter()
            .find(|lexer| lexer.analyse_text(text))
            .map(|lexer| lexer.as_ref())
    }

    /// List all registered lexers, sorted by name
    pub fn list_lexers(&self) -> Vec<&dyn Lexer> {
        let mut lexers: Vec<_> = self.lexers.iter().map(|lexer| lexer.as_ref()).collect();
        lexers.sort_by(|a, b| a.name().cmp(b.name()));
        lexers
    }
}

impl Default for LexerRegistry {
    fn default() -> Self {
        Self::with_options(ScanOptions::default())
    }
}
