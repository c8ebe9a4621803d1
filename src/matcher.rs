//! The backtracking matcher behind [`Pattern::is_match`](crate::Pattern::is_match) and
//! [`Pattern::starts_with`](crate::Pattern::starts_with).
//!
//! Offsets handed around in here are byte offsets into the query text, but they always sit on
//! character boundaries, and `?` always skips whole characters.

use memchr::memmem;

use crate::pattern::Token;

/// How much of the text the tokens have to account for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Mode {
    /// The tokens have to produce exactly the text.
    Anchored,

    /// The text only has to be a leading part of something the tokens could produce.
    Prefix,
}

/// The wildcards seen since the last literal was consumed.
///
/// One of these lives on the stack of every call, and every backtracking branch starts with a
/// fresh one, so nothing is ever shared between two queries.
#[derive(Clone, Copy, Debug, Default)]
struct MatchState {
    on_star: bool,
    pending_single: usize,
}

impl MatchState {
    /// Check if the pending wildcards can absorb all of `text[pos..]`.
    fn accepts_rest(self, text: &str, pos: usize) -> bool {
        // No need to count further than one past the pending `?`s.
        let remaining = text[pos..].chars().take(self.pending_single + 1).count();
        remaining == self.pending_single || (self.on_star && remaining >= self.pending_single)
    }
}

/// Outcome of matching a tail of the tokens from some position.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum MatchResult {
    Match,

    /// This placement failed, a later one of an enclosing `*` literal might still work.
    NoMatch,

    /// A `*` literal ran out of placements. Starting it any further right only leaves it fewer
    /// placements, so no enclosing `*` literal needs to be retried either.
    AbortAll,
}

/// Run the tokens against `text`.
pub(crate) fn matches(tokens: &[Token], text: &str, mode: Mode) -> bool {
    do_matches(tokens, text, 0, MatchState::default(), mode) == MatchResult::Match
}

fn do_matches(
    mut tokens: &[Token],
    text: &str,
    mut pos: usize,
    mut state: MatchState,
    mode: Mode,
) -> MatchResult {
    while let Some((token, rest)) = tokens.split_first() {
        if mode == Mode::Prefix && state.accepts_rest(text, pos) {
            return MatchResult::Match;
        }

        match token {
            Token::Star => state.on_star = true,
            Token::QuestionMark => state.pending_single += 1,
            Token::Literal(literal) => {
                let Some(min_start) = skip_chars(text, pos, state.pending_single) else {
                    // The text ran out within the pending `?`s.
                    return accept_if(mode == Mode::Prefix);
                };

                if state.on_star {
                    return match_after_star(literal, rest, text, min_start, mode);
                }

                if !text[min_start..].starts_with(literal.as_str()) {
                    return accept_if(
                        mode == Mode::Prefix && ends_within(&text[min_start..], literal),
                    );
                }

                pos = min_start + literal.len();
                state = MatchState::default();
            }
        }

        tokens = rest;
    }

    accept_if(state.accepts_rest(text, pos))
}

fn accept_if(matched: bool) -> MatchResult {
    if matched {
        MatchResult::Match
    } else {
        MatchResult::NoMatch
    }
}

/// A literal preceded by a `*` may be placed at any occurrence at or after `min_start`. Try them
/// from left to right until the remaining tokens match.
///
/// This never reports a plain `NoMatch`: once every placement failed, the enclosing literals
/// cannot help by moving right, which keeps a call linear in the number of stars.
fn match_after_star(
    literal: &str,
    rest: &[Token],
    text: &str,
    min_start: usize,
    mode: Mode,
) -> MatchResult {
    let finder = memmem::Finder::new(literal.as_bytes());
    let haystack = text.as_bytes();

    let mut from = min_start;
    let mut tried = false;
    while let Some(idx) = finder.find(&haystack[from..]).map(|at| from + at) {
        if tried {
            log::trace!("backtracking: retrying literal {literal:?} at byte {idx}");
        }
        tried = true;

        match do_matches(rest, text, idx + literal.len(), MatchState::default(), mode) {
            MatchResult::NoMatch => (),
            other => return other,
        }

        // Occurrences may overlap, so only skip a single byte. A literal never starts with a
        // continuation byte, so every hit is on a character boundary.
        from = idx + 1;
    }

    if !tried && mode == Mode::Prefix && ends_within(&text[min_start..], literal) {
        MatchResult::Match
    } else {
        MatchResult::AbortAll
    }
}

/// Get the byte offset `count` characters after `pos`, if the text is long enough.
fn skip_chars(text: &str, pos: usize, count: usize) -> Option<usize> {
    let mut rest = text[pos..].chars();
    for _ in 0..count {
        rest.next()?;
    }
    Some(text.len() - rest.as_str().len())
}

/// Check if the text stops somewhere in the middle of `literal`.
fn ends_within(tail: &str, literal: &str) -> bool {
    tail.len() < literal.len() && literal.starts_with(tail)
}
