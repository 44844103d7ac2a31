//! Token kinds produced by the OpenSSL configuration scanner.
//!
//!     The scanner never builds a tree. Its whole output is a flat sequence of
//!     `(TokenKind, Range<usize>)` pairs, where the range is a byte range into the
//!     source buffer. Ranges are contiguous: each one starts where the previous one
//!     ended, and together they cover the input exactly.
//!
//! Kind Groups
//!
//!     Left hand side:
//!         Attribute (keys), SectionHeader, KnownDirectiveName / OtherDirectiveName.
//!
//!     Right hand side:
//!         String is the default value kind. Quoted strings, variables, numbers,
//!         object identifiers, section references and typed values (Email,
//!         IpAddress, HexValue) refine it.
//!
//!     Pragmas:
//!         KnownPragmaName / OtherPragmaName tag the `name` in `.pragma name:value`.
//!
//!     Shared:
//!         Comment, Operator, Whitespace and StringEscape (line continuation).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A token as emitted by the scanner: its kind and the byte range it covers.
pub type Token = (TokenKind, Range<usize>);

/// The closed set of token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Comment,
    SectionHeader,
    Operator,
    Whitespace,
    /// A backslash continuing the current line.
    StringEscape,
    StringDouble,
    StringSingle,
    VariableName,
    Number,
    NumberFloat,
    /// Dotted numeric OID, e.g. `1.2.840.113549`.
    ObjectIdentifier,
    /// `@section` references.
    SectionReference,
    KeywordCritical,
    /// `.include` and `.pragma`.
    KnownDirectiveName,
    OtherDirectiveName,
    KnownPragmaName,
    OtherPragmaName,
    /// Left hand side of an assignment.
    Attribute,
    /// Right hand side text with no finer classification.
    String,
    Email,
    IpAddress,
    HexValue,
}

impl TokenKind {
    /// Every kind, in declaration order.
    pub const ALL: [TokenKind; 22] = [
        TokenKind::Comment,
        TokenKind::SectionHeader,
        TokenKind::Operator,
        TokenKind::Whitespace,
        TokenKind::StringEscape,
        TokenKind::StringDouble,
        TokenKind::StringSingle,
        TokenKind::VariableName,
        TokenKind::Number,
        TokenKind::NumberFloat,
        TokenKind::ObjectIdentifier,
        TokenKind::SectionReference,
        TokenKind::KeywordCritical,
        TokenKind::KnownDirectiveName,
        TokenKind::OtherDirectiveName,
        TokenKind::KnownPragmaName,
        TokenKind::OtherPragmaName,
        TokenKind::Attribute,
        TokenKind::String,
        TokenKind::Email,
        TokenKind::IpAddress,
        TokenKind::HexValue,
    ];

    /// Pygments short CSS class for this kind, as used by HTML highlighters.
    ///
    /// Whitespace carries no class and is rendered as bare text.
    pub fn short_class(self) -> &'static str {
        match self {
            TokenKind::Comment => "c",
            TokenKind::SectionHeader => "k",
            TokenKind::Operator => "o",
            TokenKind::Whitespace => "",
            TokenKind::StringEscape => "se",
            TokenKind::StringDouble => "s2",
            TokenKind::StringSingle => "s1",
            TokenKind::VariableName => "nv",
            TokenKind::Number => "mi",
            TokenKind::NumberFloat => "mf",
            TokenKind::ObjectIdentifier => "nf",
            TokenKind::SectionReference => "no",
            TokenKind::KeywordCritical => "kp",
            TokenKind::KnownDirectiveName => "kn",
            TokenKind::OtherDirectiveName => "nd",
            TokenKind::KnownPragmaName => "nb",
            TokenKind::OtherPragmaName => "nx",
            TokenKind::Attribute => "na",
            TokenKind::String => "s",
            TokenKind::Email => "ni",
            TokenKind::IpAddress => "nl",
            TokenKind::HexValue => "mh",
        }
    }

    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A copyable set of token kinds.
///
/// Deserializes from a list of kebab-case kind names, which is how the merge
/// policy names the kinds it must leave alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<TokenKind>")]
pub struct KindSet(u32);

impl KindSet {
    pub const EMPTY: KindSet = KindSet(0);

    pub fn contains(self, kind: TokenKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn with(self, kind: TokenKind) -> KindSet {
        KindSet(self.0 | kind.bit())
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Vec<TokenKind>> for KindSet {
    fn from(kinds: Vec<TokenKind>) -> Self {
        kinds.into_iter().collect()
    }
}

impl FromIterator<TokenKind> for KindSet {
    fn from_iter<I: IntoIterator<Item = TokenKind>>(iter: I) -> Self {
        iter.into_iter().fold(KindSet::EMPTY, KindSet::with)
    }
}
