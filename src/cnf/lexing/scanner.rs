//! Scanner driver
//!
//!     The driver walks the buffer once. At each position it takes the active mode from
//!     the top of the mode stack, tries that mode's rules in order, and takes the first
//!     match: its tokens are queued, the position moves to the end of the match, and the
//!     rule's transition is applied to the stack.
//!
//!     When no rule matches, the mode's catch-all consumes exactly one character and
//!     gives it the mode's default kind. Malformed input therefore degrades into runs of
//!     single characters instead of failing; the merge pass folds those runs back
//!     together.
//!
//!     Rules with a miss memo are skipped while the position is below the horizon of
//!     their last miss, so no offset is rescanned by the same long-running rule.
//!
//!     Raw tokens are produced lazily. Dropping the iterator early is always safe: the
//!     position and the mode stack live in the iterator and nowhere else.

use crate::cnf::lexing::modes::{Mode, ModeStack};
use crate::cnf::lexing::rules::{MissMemo, RULES};
use crate::cnf::token::Token;
use std::collections::VecDeque;
use tracing::trace;

/// Lazy stream of unmerged tokens over one buffer.
#[derive(Debug, Clone)]
pub struct RawTokens<'a> {
    source: &'a str,
    pos: usize,
    stack: ModeStack,
    pending: VecDeque<Token>,
    inline_comments: bool,
    /// Per memo, the offset below which the rule is known to miss.
    misses: [usize; MissMemo::COUNT],
}

impl<'a> RawTokens<'a> {
    pub fn new(source: &'a str, inline_comments: bool) -> Self {
        RawTokens {
            source,
            pos: 0,
            stack: ModeStack::new(),
            pending: VecDeque::new(),
            inline_comments,
            misses: [0; MissMemo::COUNT],
        }
    }

    /// The active mode.
    pub fn mode(&self) -> Mode {
        self.stack.top()
    }

    /// Run one rule (or the catch-all) at the current position.
    fn step(&mut self) {
        let mode = self.stack.top();
        for rule in RULES.for_mode(mode) {
            if rule.is_inline_comment() && !self.inline_comments {
                continue;
            }
            let memo = rule.miss_memo();
            if memo.is_some_and(|memo| self.pos < self.misses[memo.index()]) {
                continue;
            }
            let Some(end) = rule.scan(self.source, self.pos, &mut self.pending) else {
                if let Some(memo) = memo {
                    if let Some(horizon) = memo.horizon(self.source, self.pos) {
                        trace!(?memo, offset = self.pos, horizon, "rule skipped until horizon");
                        self.misses[memo.index()] = horizon;
                    }
                }
                continue;
            };
            if end == self.pos {
                // empty matches only count when they move the stack
                if self.stack.apply(rule.transition()) {
                    self.log_transition(mode);
                    return;
                }
                continue;
            }
            self.pos = end;
            if self.stack.apply(rule.transition()) {
                self.log_transition(mode);
            }
            return;
        }

        let width = self.source[self.pos..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        self.pending
            .push_back((mode.default_kind(), self.pos..self.pos + width));
        self.pos += width;
    }
}

impl RawTokens<'_> {
    fn log_transition(&self, from: Mode) {
        trace!(
            from = from.name(),
            to = self.stack.top().name(),
            depth = self.stack.depth(),
            offset = self.pos,
            "mode transition"
        );
    }
}

impl Iterator for RawTokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.pos >= self.source.len() {
                return None;
            }
            self.step();
        }
    }
}
