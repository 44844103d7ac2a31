//! Lexing modes and the mode stack
//!
//!     A mode is a named lexing context with its own ordered rule list. The scanner
//!     keeps an explicit stack of modes instead of recursing: the top of the stack is
//!     the active mode, pushes enter nested contexts (a value, a directive body, an
//!     interpolation) and pops leave them.
//!
//!     The root mode is the floor of the stack. Pops never remove it: asking to pop
//!     more levels than exist above root leaves the stack at root.

use crate::cnf::token::TokenKind;

/// The lexing contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Line starts: keys, section headers, directives.
    Root,
    /// Right hand side of `key = value`.
    Rhs,
    /// Body of a `.pragma` directive.
    Pragma,
    /// Value after `name:` inside a pragma.
    PragmaValue,
    /// Body of `.include` and unknown directives.
    OtherDirective,
    /// After `${`.
    CurlyBrace,
    /// After the variable name inside `${...}`.
    CloseBrace,
    /// After `$(`.
    Paren,
    /// After the variable name inside `$(...)`.
    CloseParen,
    /// After `email:` in a value.
    Email,
    /// After `IP:` in a value.
    Ip,
    /// After `DER:` in a value.
    Hex,
}

impl Mode {
    /// Kind given to a single character when no rule of this mode matches.
    pub fn default_kind(self) -> TokenKind {
        match self {
            Mode::Root => TokenKind::Attribute,
            _ => TokenKind::String,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Root => "root",
            Mode::Rhs => "rhs",
            Mode::Pragma => "pragma",
            Mode::PragmaValue => "pragma-value",
            Mode::OtherDirective => "other-directive",
            Mode::CurlyBrace => "curly-brace",
            Mode::CloseBrace => "close-brace",
            Mode::Paren => "paren",
            Mode::CloseParen => "close-paren",
            Mode::Email => "email",
            Mode::Ip => "ip",
            Mode::Hex => "hex",
        }
    }
}

/// What a matching rule does to the mode stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Push(Mode),
    /// Pop this many levels, stopping at root.
    Pop(usize),
    /// Pop, then push.
    PopPush(usize, Mode),
}

/// Stack of active modes. Never empty: root is always at the bottom.
#[derive(Debug, Clone)]
pub struct ModeStack {
    modes: Vec<Mode>,
}

impl ModeStack {
    pub fn new() -> Self {
        ModeStack {
            modes: vec![Mode::Root],
        }
    }

    /// The active mode.
    pub fn top(&self) -> Mode {
        self.modes.last().copied().unwrap_or(Mode::Root)
    }

    pub fn depth(&self) -> usize {
        self.modes.len()
    }

    pub fn push(&mut self, mode: Mode) {
        self.modes.push(mode);
    }

    /// Pop up to `count` levels. Returns how many were actually removed.
    pub fn pop(&mut self, count: usize) -> usize {
        let keep = self.modes.len().saturating_sub(count).max(1);
        let removed = self.modes.len() - keep;
        self.modes.truncate(keep);
        removed
    }

    /// Apply a transition. Returns true if the stack changed.
    pub fn apply(&mut self, transition: Transition) -> bool {
        match transition {
            Transition::None => false,
            Transition::Push(mode) => {
                self.push(mode);
                true
            }
            Transition::Pop(count) => self.pop(count) > 0,
            Transition::PopPush(count, mode) => {
                self.pop(count);
                self.push(mode);
                true
            }
        }
    }
}

impl Default for ModeStack {
    fn default() -> Self {
        Self::new()
    }
}
