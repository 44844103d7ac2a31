//! Rule tables
//!
//!     Each mode owns an ordered list of rules. A rule is a regex anchored at the scan
//!     position, the token kinds it emits, optional context guards, and a mode
//!     transition. Rules are tried in declaration order and the first one that matches
//!     wins, so order encodes priority: the comment rule sits above everything else, the
//!     OID rule above the number rules, whitespace near the bottom.
//!
//!     The tables are compiled once into a process-wide static and never mutated, so
//!     concurrent scans share them freely.
//!
//! Guards
//!
//!     The regex crate has no look-around. Context that a pattern cannot see on its own
//!     is checked by guards around the regex match:
//!
//!         NonWordBefore      the character before the match is not a word character
//!         NonWordAfter       the character after the match is not a word character
//!         NoBackslashBefore  the character before the match is not `\`
//!         LineBreakAfter     the match is followed by `\n` or `\r\n`
//!         DirectiveEnd       the directive word is followed by whitespace, `=`, a
//!                            continuation `\` or the end of the buffer
//!
//!     The start and end of the buffer satisfy the word guards, and the end of the
//!     buffer counts as a line break. Guards decided by the match start alone are
//!     checked before the regex runs, so a rule that cannot start mid-word never reads
//!     the rest of that word.
//!
//! Miss Memos
//!
//!     Some rules scan far ahead before they fail: a quoted string with no closing
//!     quote reads to the end of the buffer, a bracket with no closing `]` reads to the
//!     end of the line. When such a rule misses at one offset it also misses at every
//!     later offset up to a horizon, so the scanner records the horizon and skips the
//!     rule until it is passed. This keeps scanning linear in the input length.
//!
//! Zero-width Rules
//!
//!     A few rules match the empty string: the typed sub-scans (email, ip, hex) fall back
//!     to an unconditional pop, and interpolation modes give up at a line break so the
//!     enclosing value mode can see it. The scanner only accepts an empty match when its
//!     transition actually changes the mode stack.

use crate::cnf::lexing::modes::{Mode, Transition};
use crate::cnf::token::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::VecDeque;

/// Pragma names OpenSSL understands.
pub const KNOWN_PRAGMAS: &[&str] = &["dollarid", "abspath", "includedir"];

pub fn is_known_pragma(name: &str) -> bool {
    KNOWN_PRAGMAS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(name))
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Context condition checked around a regex match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    NonWordBefore,
    NonWordAfter,
    NoBackslashBefore,
    LineBreakAfter,
    DirectiveEnd,
}

impl Guard {
    /// Whether the guard can be decided from the match start alone.
    fn is_leading(self) -> bool {
        matches!(
            self,
            Guard::NonWordBefore | Guard::NoBackslashBefore | Guard::DirectiveEnd
        )
    }

    /// Whether the guard holds for a match spanning `start..end` of `source`.
    pub fn holds(self, source: &str, start: usize, end: usize) -> bool {
        match self {
            Guard::NonWordBefore => source[..start]
                .chars()
                .next_back()
                .map_or(true, |c| !is_word_char(c)),
            Guard::NonWordAfter => source[end..]
                .chars()
                .next()
                .map_or(true, |c| !is_word_char(c)),
            Guard::NoBackslashBefore => !source[..start].ends_with('\\'),
            Guard::LineBreakAfter => {
                let rest = &source[end..];
                rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n")
            }
            Guard::DirectiveEnd => {
                let word = &source[start..];
                let word_end = word
                    .char_indices()
                    .skip(1)
                    .find(|&(_, c)| !is_word_char(c))
                    .map_or(word.len(), |(index, _)| index);
                let rest = &word[word_end..];
                match rest.chars().next() {
                    None => true,
                    Some('\\') => Guard::LineBreakAfter.holds(rest, 0, 1),
                    Some(c) => c.is_whitespace() || c == '=',
                }
            }
        }
    }
}

/// Rule whose miss carries forward to later offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissMemo {
    /// Every `"` after an unterminated double-quoted string is escaped, so none of them
    /// opens a terminated string either.
    DoubleQuoted,
    SingleQuoted,
    /// No `[` later on the line can reach a `]` that ends the line.
    SectionHeader,
}

impl MissMemo {
    pub const COUNT: usize = 3;

    pub fn index(self) -> usize {
        self as usize
    }

    fn opener(self) -> char {
        match self {
            MissMemo::DoubleQuoted => '"',
            MissMemo::SingleQuoted => '\'',
            MissMemo::SectionHeader => '[',
        }
    }

    /// First offset at which a miss at `pos` no longer holds.
    ///
    /// Only a miss on the opening character carries forward; `None` otherwise.
    pub fn horizon(self, source: &str, pos: usize) -> Option<usize> {
        let rest = &source[pos..];
        if !rest.starts_with(self.opener()) {
            return None;
        }
        let horizon = match self {
            MissMemo::DoubleQuoted | MissMemo::SingleQuoted => source.len(),
            MissMemo::SectionHeader => rest
                .find(|c: char| c == '\r' || c == '\n')
                .map_or(source.len(), |index| pos + index),
        };
        Some(horizon)
    }
}

/// Kind binding for one capture group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bind {
    Kind(TokenKind),
    /// Known or other pragma name, decided by [`KNOWN_PRAGMAS`].
    PragmaName,
}

impl Bind {
    fn resolve(self, text: &str) -> TokenKind {
        match self {
            Bind::Kind(kind) => kind,
            Bind::PragmaName if is_known_pragma(text) => TokenKind::KnownPragmaName,
            Bind::PragmaName => TokenKind::OtherPragmaName,
        }
    }
}

/// How a match turns into tokens.
#[derive(Debug, Clone, Copy)]
pub enum Emit {
    /// One token covering the whole match.
    Whole(TokenKind),
    /// One token per capture group; empty groups emit nothing.
    Groups(&'static [Bind]),
}

#[derive(Debug, Clone)]
pub struct Rule {
    regex: Regex,
    emit: Emit,
    guards: &'static [Guard],
    transition: Transition,
    inline_comment: bool,
    memo: Option<MissMemo>,
}

impl Rule {
    fn new(pattern: &str, emit: Emit) -> Self {
        let anchored = format!("^(?:{pattern})");
        Rule {
            regex: Regex::new(&anchored).unwrap(),
            emit,
            guards: &[],
            transition: Transition::None,
            inline_comment: false,
            memo: None,
        }
    }

    fn token(pattern: &str, kind: TokenKind) -> Self {
        Self::new(pattern, Emit::Whole(kind))
    }

    fn groups(pattern: &str, binds: &'static [Bind]) -> Self {
        Self::new(pattern, Emit::Groups(binds))
    }

    fn when(mut self, guards: &'static [Guard]) -> Self {
        self.guards = guards;
        self
    }

    fn then(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    fn inline_comment(mut self) -> Self {
        self.inline_comment = true;
        self
    }

    fn memo(mut self, memo: MissMemo) -> Self {
        self.memo = Some(memo);
        self
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }

    /// Comment rules inside value modes, switchable by the comment policy.
    pub fn is_inline_comment(&self) -> bool {
        self.inline_comment
    }

    pub fn miss_memo(&self) -> Option<MissMemo> {
        self.memo
    }

    /// Try the rule at `pos`.
    ///
    /// On success the emitted tokens are appended to `out` and the end offset of the
    /// match is returned. Nothing is appended when the rule does not match.
    pub fn scan(&self, source: &str, pos: usize, out: &mut VecDeque<Token>) -> Option<usize> {
        if !self.leading_guards_hold(source, pos) {
            return None;
        }
        let rest = &source[pos..];
        match self.emit {
            Emit::Whole(kind) => {
                let found = self.regex.find(rest)?;
                let end = pos + found.end();
                if !self.guards_hold(source, pos, end) {
                    return None;
                }
                if end > pos {
                    out.push_back((kind, pos..end));
                }
                Some(end)
            }
            Emit::Groups(binds) => {
                let captures = self.regex.captures(rest)?;
                let end = pos + captures.get(0).map_or(0, |m| m.end());
                if !self.guards_hold(source, pos, end) {
                    return None;
                }
                for (index, bind) in binds.iter().enumerate() {
                    if let Some(group) = captures.get(index + 1) {
                        if !group.is_empty() {
                            let kind = bind.resolve(group.as_str());
                            out.push_back((kind, pos + group.start()..pos + group.end()));
                        }
                    }
                }
                Some(end)
            }
        }
    }

    fn leading_guards_hold(&self, source: &str, start: usize) -> bool {
        self.guards
            .iter()
            .filter(|guard| guard.is_leading())
            .all(|guard| guard.holds(source, start, start))
    }

    fn guards_hold(&self, source: &str, start: usize, end: usize) -> bool {
        self.guards
            .iter()
            .filter(|guard| !guard.is_leading())
            .all(|guard| guard.holds(source, start, end))
    }
}

const COMMENT: &str = r"#[^\r\n]*";
const LINE_BREAK: &str = r"\r?\n";
const DOUBLE_QUOTED: &str = r#"(?s)"(?:\\\\|\\[0-7]+|\\.|[^"\\])*""#;
const SINGLE_QUOTED: &str = r"(?s)'(?:\\\\|\\[0-7]+|\\.|[^'\\])*'";
const VARIABLE: &str = r"\$\w+(?:::\w+)?";
const SCOPED_NAME: &str = r"\w+(?:::\w+)?";
const OID: &str = r"\d+\.\d+\.(?:\d+\.?)*";
const FLOAT: &str = r"\d+\.\d+";
const INTEGER: &str = r"\d+";
const SPACES: &str = r"[^\S\n]+";
const IPV4: &str = r"\d{1,3}(?:\.\d{1,3}){3}";
const IPV6: &str = r"(?:[0-9A-Fa-f]{0,4}:){2,7}(?:\d{1,3}(?:\.\d{1,3}){3}|[0-9A-Fa-f]{0,4})";
const EMAIL: &str = r"[\w.+-]+@[\w-]+(?:\.[\w-]+)*";
const HEX: &str = r"[0-9A-Fa-f]+(?::[0-9A-Fa-f]+)*";

const BOUNDED: &[Guard] = &[Guard::NonWordBefore, Guard::NonWordAfter];

const DIRECTIVE_BODY: &[Bind] = &[
    Bind::Kind(TokenKind::KnownDirectiveName),
    Bind::Kind(TokenKind::Whitespace),
    Bind::Kind(TokenKind::Operator),
    Bind::Kind(TokenKind::Whitespace),
];

const OTHER_DIRECTIVE_BODY: &[Bind] = &[
    Bind::Kind(TokenKind::OtherDirectiveName),
    Bind::Kind(TokenKind::Whitespace),
    Bind::Kind(TokenKind::Operator),
    Bind::Kind(TokenKind::Whitespace),
];

const TYPED_INTRODUCER: &[Bind] = &[
    Bind::Kind(TokenKind::String),
    Bind::Kind(TokenKind::Operator),
];

/// Backslash right before a line break.
fn continuation() -> Rule {
    Rule::token(r"\\", TokenKind::StringEscape).when(&[Guard::LineBreakAfter])
}

/// Comment and line-break handling shared by value modes.
///
/// An unescaped line break leaves the mode (`exit` levels); a line break right after
/// a continuation backslash is plain whitespace.
fn line_end(exit: usize) -> Vec<Rule> {
    vec![
        Rule::token(COMMENT, TokenKind::Comment).inline_comment(),
        Rule::token(LINE_BREAK, TokenKind::Whitespace)
            .when(&[Guard::NoBackslashBefore])
            .then(Transition::Pop(exit)),
        Rule::token(LINE_BREAK, TokenKind::Whitespace),
    ]
}

/// Quoted strings and variable references.
fn strings_and_variables() -> Vec<Rule> {
    vec![
        Rule::token(DOUBLE_QUOTED, TokenKind::StringDouble).memo(MissMemo::DoubleQuoted),
        Rule::token(SINGLE_QUOTED, TokenKind::StringSingle).memo(MissMemo::SingleQuoted),
        Rule::token(r"\$\{", TokenKind::VariableName).then(Transition::Push(Mode::CurlyBrace)),
        Rule::token(r"\$\(", TokenKind::VariableName).then(Transition::Push(Mode::Paren)),
        Rule::token(VARIABLE, TokenKind::VariableName),
    ]
}

fn numbers() -> Vec<Rule> {
    vec![
        Rule::token(FLOAT, TokenKind::NumberFloat).when(BOUNDED),
        Rule::token(INTEGER, TokenKind::Number).when(BOUNDED),
    ]
}

fn trailing() -> Vec<Rule> {
    vec![continuation(), Rule::token(SPACES, TokenKind::Whitespace)]
}

fn root() -> Vec<Rule> {
    vec![
        Rule::token(COMMENT, TokenKind::Comment),
        Rule::token(r"\[[^\r\n]*\]", TokenKind::SectionHeader)
            .when(&[Guard::LineBreakAfter])
            .memo(MissMemo::SectionHeader),
        Rule::groups(r"(?i)(\.pragma)\b([^\S\n]*)(=*)([^\S\n]*)", DIRECTIVE_BODY)
            .when(&[Guard::DirectiveEnd])
            .then(Transition::Push(Mode::Pragma)),
        Rule::groups(r"(?i)(\.include)\b([^\S\n]*)(=*)([^\S\n]*)", DIRECTIVE_BODY)
            .when(&[Guard::DirectiveEnd])
            .then(Transition::Push(Mode::OtherDirective)),
        Rule::groups(r"(\.\w+)([^\S\n]*)(=*)([^\S\n]*)", OTHER_DIRECTIVE_BODY)
            .then(Transition::Push(Mode::OtherDirective)),
        Rule::groups(
            r"(\w+)([^\S\n]*)",
            &[
                Bind::Kind(TokenKind::Attribute),
                Bind::Kind(TokenKind::Whitespace),
            ],
        ),
        Rule::groups(
            r"(=)([^\S\n]*)",
            &[
                Bind::Kind(TokenKind::Operator),
                Bind::Kind(TokenKind::Whitespace),
            ],
        )
        .then(Transition::Push(Mode::Rhs)),
        continuation(),
        Rule::token(r"\s+", TokenKind::Whitespace),
    ]
}

fn rhs() -> Vec<Rule> {
    let mut rules = line_end(1);
    rules.extend(strings_and_variables());
    rules.push(Rule::token(OID, TokenKind::ObjectIdentifier).when(BOUNDED));
    rules.extend(numbers());
    rules.push(Rule::token(r"@\w+", TokenKind::SectionReference));
    rules.push(Rule::token(r"(?i)critical", TokenKind::KeywordCritical).when(BOUNDED));
    for (pattern, mode) in [
        (r"(?i)(email)(:)", Mode::Email),
        (r"(?i)(ip)(:)", Mode::Ip),
        (r"(?i)(der)(:)", Mode::Hex),
    ] {
        rules.push(
            Rule::groups(pattern, TYPED_INTRODUCER)
                .when(&[Guard::NonWordBefore])
                .then(Transition::Push(mode)),
        );
    }
    rules.extend(trailing());
    rules
}

fn pragma() -> Vec<Rule> {
    let mut rules = line_end(1);
    rules.push(
        Rule::groups(
            r"(\w+)([^\S\n]*)(:)([^\S\n]*)",
            &[
                Bind::PragmaName,
                Bind::Kind(TokenKind::Whitespace),
                Bind::Kind(TokenKind::Operator),
                Bind::Kind(TokenKind::Whitespace),
            ],
        )
        .when(&[Guard::NonWordBefore])
        .then(Transition::Push(Mode::PragmaValue)),
    );
    rules.extend(strings_and_variables());
    rules.extend(numbers());
    rules.extend(trailing());
    rules
}

/// Body of a directive or pragma value; `exit` levels are popped at the line break.
fn directive_value(exit: usize) -> Vec<Rule> {
    let mut rules = line_end(exit);
    rules.extend(strings_and_variables());
    rules.extend(numbers());
    rules.extend(trailing());
    rules
}

/// Interpolation opened by `${` or `$(`.
fn interpolation(close: &str, inner: &str, next: Mode) -> Vec<Rule> {
    vec![
        Rule::token(close, TokenKind::VariableName).then(Transition::Pop(1)),
        Rule::token(SCOPED_NAME, TokenKind::VariableName).then(Transition::Push(next)),
        Rule::token("", TokenKind::Whitespace)
            .when(&[Guard::LineBreakAfter])
            .then(Transition::Pop(1)),
        Rule::token(inner, TokenKind::String),
    ]
}

/// After the variable name: anything up to the closing delimiter is value text.
fn interpolation_close(close: &str, inner: &str) -> Vec<Rule> {
    vec![
        Rule::token(close, TokenKind::VariableName).then(Transition::Pop(2)),
        Rule::token("", TokenKind::Whitespace)
            .when(&[Guard::LineBreakAfter])
            .then(Transition::Pop(2)),
        Rule::token(inner, TokenKind::String),
    ]
}

/// Typed value after `email:`, `IP:` or `DER:`, then back to the value.
fn typed(pattern: &str, kind: TokenKind, guards: &'static [Guard]) -> Vec<Rule> {
    vec![
        Rule::token(pattern, kind).when(guards),
        Rule::token("", kind).then(Transition::Pop(1)),
    ]
}

/// Compiled rules for every mode.
pub struct RuleTables {
    root: Vec<Rule>,
    rhs: Vec<Rule>,
    pragma: Vec<Rule>,
    pragma_value: Vec<Rule>,
    other_directive: Vec<Rule>,
    curly_brace: Vec<Rule>,
    close_brace: Vec<Rule>,
    paren: Vec<Rule>,
    close_paren: Vec<Rule>,
    email: Vec<Rule>,
    ip: Vec<Rule>,
    hex: Vec<Rule>,
}

impl RuleTables {
    fn build() -> Self {
        let ip = format!(r"(?:{IPV4}|{IPV6})(?:/(?:{IPV4}|{IPV6}|\d+))?");
        RuleTables {
            root: root(),
            rhs: rhs(),
            pragma: pragma(),
            pragma_value: directive_value(2),
            other_directive: directive_value(1),
            curly_brace: interpolation(r"\}", r"[^}\r\n]+", Mode::CloseBrace),
            close_brace: interpolation_close(r"\}", r"[^}\r\n]+"),
            paren: interpolation(r"\)", r"[^)\r\n]+", Mode::CloseParen),
            close_paren: interpolation_close(r"\)", r"[^)\r\n]+"),
            email: typed(EMAIL, TokenKind::Email, &[]),
            ip: typed(&ip, TokenKind::IpAddress, &[Guard::NonWordAfter]),
            hex: typed(HEX, TokenKind::HexValue, &[Guard::NonWordAfter]),
        }
    }

    /// Ordered rules of a mode.
    pub fn for_mode(&self, mode: Mode) -> &[Rule] {
        match mode {
            Mode::Root => &self.root,
            Mode::Rhs => &self.rhs,
            Mode::Pragma => &self.pragma,
            Mode::PragmaValue => &self.pragma_value,
            Mode::OtherDirective => &self.other_directive,
            Mode::CurlyBrace => &self.curly_brace,
            Mode::CloseBrace => &self.close_brace,
            Mode::Paren => &self.paren,
            Mode::CloseParen => &self.close_paren,
            Mode::Email => &self.email,
            Mode::Ip => &self.ip,
            Mode::Hex => &self.hex,
        }
    }
}

/// Process-wide rule tables, compiled on first use.
pub static RULES: Lazy<RuleTables> = Lazy::new(RuleTables::build);
