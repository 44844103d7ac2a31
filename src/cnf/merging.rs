//! Merge filter
//!
//!     Coalesces runs of adjacent tokens with the same kind into one token whose range
//!     covers the whole run. The catch-all rules emit one token per character, so
//!     without this pass any unrecognized stretch of text would come out as a flood of
//!     single-character tokens.
//!
//!     The pass is lazy, order preserving and looks back at one token only. Ranges stay
//!     contiguous, so the merged stream still covers the input exactly.
//!
//!     Kinds listed in the policy's `keep_distinct` set are never merged. By default this
//!     holds variable names, so an interpolation such as `${ENV::variable}` keeps its
//!     delimiters and its name as separate tokens.

use crate::cnf::token::{KindSet, Token, TokenKind};
use serde::Deserialize;

/// Which tokens the merge filter may coalesce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MergePolicy {
    pub enabled: bool,
    pub keep_distinct: KindSet,
}

impl MergePolicy {
    /// Pass every token through untouched.
    pub fn disabled() -> Self {
        MergePolicy {
            enabled: false,
            keep_distinct: KindSet::EMPTY,
        }
    }

    /// Merge everything, including variable names.
    pub fn merge_all() -> Self {
        MergePolicy {
            enabled: true,
            keep_distinct: KindSet::EMPTY,
        }
    }

    fn merges(&self, kind: TokenKind) -> bool {
        self.enabled && !self.keep_distinct.contains(kind)
    }
}

impl Default for MergePolicy {
    fn default() -> Self {
        MergePolicy {
            enabled: true,
            keep_distinct: KindSet::EMPTY.with(TokenKind::VariableName),
        }
    }
}

/// Iterator adapter applying a [`MergePolicy`] to a token stream.
#[derive(Debug, Clone)]
pub struct Merged<I> {
    inner: I,
    policy: MergePolicy,
    held: Option<Token>,
}

impl<I: Iterator<Item = Token>> Merged<I> {
    pub fn new(inner: I, policy: MergePolicy) -> Self {
        Merged {
            inner,
            policy,
            held: None,
        }
    }
}

impl<I: Iterator<Item = Token>> Iterator for Merged<I> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let (kind, mut range) = match self.held.take() {
            Some(token) => token,
            None => self.inner.next()?,
        };
        if !self.policy.merges(kind) {
            return Some((kind, range));
        }
        for (next_kind, next_range) in self.inner.by_ref() {
            if next_kind == kind && next_range.start == range.end {
                range.end = next_range.end;
            } else {
                self.held = Some((next_kind, next_range));
                break;
            }
        }
        Some((kind, range))
    }
}

/// Merge a finished token list in one pass.
pub fn merge(tokens: Vec<Token>, policy: MergePolicy) -> Vec<Token> {
    Merged::new(tokens.into_iter(), policy).collect()
}
