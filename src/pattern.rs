//! Compiling wildcard text into a [`Pattern`] and the queries it answers.

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::mem;
use std::str::FromStr;

use bitflags::bitflags;

use crate::matcher::{self, Mode};

const STAR: char = '*';
const QUESTION_MARK: char = '?';

fn is_wildcard(ch: char) -> bool {
    ch == STAR || ch == QUESTION_MARK
}

/// One component of a pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token {
    /// A non-empty run of plain characters. The `a` and `.txt` in `a*.txt`.
    Literal(String),

    /// A star matches any number of characters, including none.
    Star,

    /// A question mark matches exactly one character.
    QuestionMark,
}

bitflags! {
    /// Flags affecting how a pattern should match.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct PatternFlag: u8 {
        /// Ignore upper/lower case on the pattern and the text. Note that this only affects
        /// ascii characters.
        const IGNORE_CASE = 0x01;
    }
}

bitflags! {
    /// What we learned about the pattern while compiling it.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    struct Shape: u8 {
        /// There are no wildcards, so matching is a plain comparison.
        const REGULAR = 0x01;

        /// The pattern is a lone `*`. No tokens are produced for it.
        const ALWAYS_MATCHES = 0x02;
    }
}

/// Error cases which may happen while creating a pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// No pattern text was provided at all.
    MissingPattern,

    /// The pattern bytes are not valid UTF-8, starting at the contained byte offset.
    InvalidUtf8(usize),
}

impl std::error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::MissingPattern => write!(f, "missing pattern"),
            ParseError::InvalidUtf8(at) => {
                write!(f, "invalid utf-8 in pattern at byte {}", at)
            }
        }
    }
}

/// Returned by [`Pattern::split`] when the index is not a character offset of the pattern.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OutOfRange {
    /// The requested character offset.
    pub index: usize,

    /// The length of the pattern in characters.
    pub len: usize,
}

impl std::error::Error for OutOfRange {}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "split index {} out of range for pattern of length {}",
            self.index, self.len
        )
    }
}

/// A compiled wildcard pattern: `*` matches any run of characters, `?` exactly one character,
/// and everything else matches itself. There is no escaping.
///
/// A pattern is immutable once created and can be queried from several threads at once.
/// All offsets it deals in count characters, not bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pattern {
    /// Original pattern the user provided.
    text: String,

    /// Matching components we parsed out of the string. Literals are already lowercased for
    /// `PatternFlag::IGNORE_CASE`.
    tokens: Vec<Token>,

    shape: Shape,

    flags: PatternFlag,
}

impl Pattern {
    /// Create a pattern from text which may be absent.
    pub fn compile<T: AsRef<str>>(pattern: Option<T>) -> Result<Self, ParseError> {
        let pattern = pattern.ok_or(ParseError::MissingPattern)?;
        Ok(Self::new_do(pattern.as_ref(), PatternFlag::empty()))
    }

    /// Create a new pattern with default flags.
    pub fn new<T: AsRef<str>>(pattern: T) -> Self {
        Self::new_do(pattern.as_ref(), PatternFlag::empty())
    }

    /// Create a new pattern with specific flags.
    pub fn with_flags<T: AsRef<str>>(pattern: T, flags: PatternFlag) -> Self {
        Self::new_do(pattern.as_ref(), flags)
    }

    /// Create a pattern from raw bytes, which need to be valid UTF-8.
    pub fn from_bytes<T: AsRef<[u8]>>(pattern: T, flags: PatternFlag) -> Result<Self, ParseError> {
        let pattern = std::str::from_utf8(pattern.as_ref())
            .map_err(|err| ParseError::InvalidUtf8(err.valid_up_to()))?;
        Ok(Self::new_do(pattern, flags))
    }

    fn new_do(pattern: &str, flags: PatternFlag) -> Self {
        if pattern.len() == 1 && pattern.starts_with(STAR) {
            return Self {
                text: pattern.to_string(),
                tokens: Vec::new(),
                shape: Shape::ALWAYS_MATCHES,
                flags,
            };
        }

        let mut tokens = Vec::<Token>::new();
        let mut literal = String::new();

        fn push_literal(literal: &mut String, tokens: &mut Vec<Token>, flags: PatternFlag) {
            if !literal.is_empty() {
                if flags.intersects(PatternFlag::IGNORE_CASE) {
                    literal.make_ascii_lowercase();
                }
                tokens.push(Token::Literal(mem::take(literal)));
            }
        }

        // Adjacent wildcards stay separate tokens so `??` still needs two characters.
        for ch in pattern.chars() {
            match ch {
                STAR => {
                    push_literal(&mut literal, &mut tokens, flags);
                    tokens.push(Token::Star);
                }
                QUESTION_MARK => {
                    push_literal(&mut literal, &mut tokens, flags);
                    tokens.push(Token::QuestionMark);
                }
                ch => literal.push(ch),
            }
        }
        push_literal(&mut literal, &mut tokens, flags);

        let shape = if tokens.iter().all(|token| matches!(token, Token::Literal(_))) {
            Shape::REGULAR
        } else {
            Shape::empty()
        };

        log::trace!(
            "compiled pattern {:?} into {} tokens ({:?})",
            pattern,
            tokens.len(),
            shape
        );

        Self {
            text: pattern.to_string(),
            tokens,
            shape,
            flags,
        }
    }

    /// Get the original input pattern.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the tokens the pattern was compiled into. The lone `*` pattern has none.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Get the flags the pattern was created with.
    pub fn flags(&self) -> PatternFlag {
        self.flags
    }

    /// Check if the pattern contains no wildcards.
    pub fn is_regular(&self) -> bool {
        self.shape.intersects(Shape::REGULAR)
    }

    /// Check if this is the lone `*` pattern.
    pub fn always_matches(&self) -> bool {
        self.shape.intersects(Shape::ALWAYS_MATCHES)
    }

    /// Get the character offset of the first wildcard, if there is one.
    pub fn index_of_wildcard(&self) -> Option<usize> {
        if self.always_matches() {
            return Some(0);
        }
        self.text.chars().position(is_wildcard)
    }

    /// Check whether this pattern matches the entire text.
    pub fn is_match<T: AsRef<str>>(&self, text: T) -> bool {
        if self.always_matches() {
            return true;
        }

        let text = self.fold(text.as_ref());
        if self.is_regular() {
            return self.regular_literal() == text;
        }

        matcher::matches(&self.tokens, &text, Mode::Anchored)
    }

    /// Check whether some text matching this pattern starts with `text`.
    pub fn starts_with<T: AsRef<str>>(&self, text: T) -> bool {
        if self.always_matches() {
            return true;
        }

        let text = self.fold(text.as_ref());
        if self.is_regular() {
            return self.regular_literal().starts_with(&*text);
        }

        matcher::matches(&self.tokens, &text, Mode::Prefix)
    }

    /// Check whether some text matching this pattern ends with `text`.
    ///
    /// This is a prefix check of the reversed text against the reversed pattern.
    pub fn ends_with<T: AsRef<str>>(&self, text: T) -> bool {
        let reversed = Self::new_do(&self.text.chars().rev().collect::<String>(), self.flags);
        reversed.starts_with(text.as_ref().chars().rev().collect::<String>())
    }

    /// Get the character offsets at which `ch` could be the first character of a matching text,
    /// in ascending order.
    ///
    /// Every wildcard up to the first literal `ch` could produce it, and so could that literal.
    /// If `ch` does not occur literally, every wildcard qualifies.
    pub fn index_of(&self, ch: char) -> Vec<usize> {
        self.candidates(self.text.chars().enumerate(), ch)
    }

    /// Like [`index_of`](Pattern::index_of), scanning from the end. The offsets are in
    /// descending order.
    pub fn last_index_of(&self, ch: char) -> Vec<usize> {
        let last = self.text.chars().count().saturating_sub(1);
        self.candidates(
            self.text.chars().rev().enumerate().map(|(i, c)| (last - i, c)),
            ch,
        )
    }

    fn candidates(&self, chars: impl Iterator<Item = (usize, char)>, wanted: char) -> Vec<usize> {
        let mut found = Vec::new();
        for (offset, ch) in chars {
            if is_wildcard(ch) {
                found.push(offset);
            } else if self.same_char(ch, wanted) {
                found.push(offset);
                break;
            }
        }
        found
    }

    /// Split the pattern into two at the character offset `index`.
    ///
    /// A `*` at `index` ends up in both halves, any other character is dropped.
    pub fn split(&self, index: usize) -> Result<(Self, Self), OutOfRange> {
        let (at, ch) = self.text.char_indices().nth(index).ok_or_else(|| OutOfRange {
            index,
            len: self.text.chars().count(),
        })?;
        let after = at + ch.len_utf8();

        let (first, second) = if ch == STAR {
            (&self.text[..after], &self.text[at..])
        } else {
            (&self.text[..at], &self.text[after..])
        };

        log::debug!(
            "split pattern {:?} at {} into {:?} and {:?}",
            self.text,
            index,
            first,
            second
        );

        Ok((
            Self::new_do(first, self.flags),
            Self::new_do(second, self.flags),
        ))
    }

    fn fold<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.flags.intersects(PatternFlag::IGNORE_CASE) {
            Cow::Owned(text.to_ascii_lowercase())
        } else {
            Cow::Borrowed(text)
        }
    }

    fn same_char(&self, a: char, b: char) -> bool {
        if self.flags.intersects(PatternFlag::IGNORE_CASE) {
            a.eq_ignore_ascii_case(&b)
        } else {
            a == b
        }
    }

    /// The whole (folded) text of a regular pattern.
    fn regular_literal(&self) -> &str {
        match self.tokens.first() {
            Some(Token::Literal(literal)) => literal,
            _ => "",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Pattern {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Pattern {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl From<String> for Pattern {
    fn from(pattern: String) -> Self {
        Self::new(pattern)
    }
}
