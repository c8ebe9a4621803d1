//! Compiled `*`/`?` wildcard patterns.
//!
//! A [`Pattern`] is compiled once from text in which `*` stands for any run of characters
//! (including none) and `?` for exactly one character. It can then tell whether a text matches
//! it in full, and whether a text could be the beginning or the end of some matching text. It
//! also knows where a given character could show up first or last, and how to be cut into two
//! patterns.
//!
//! ```
//! # use globpattern::*;
//! # fn test() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
//! let pattern = Pattern::compile(Some("*.log"))?;
//! assert!(pattern.is_match("app.log"));
//! assert!(pattern.is_match(".log"));
//! assert!(!pattern.is_match("app.log.old"));
//!
//! // Could this be the beginning or the end of a matching name?
//! assert!(pattern.starts_with("app"));
//! assert!(pattern.ends_with("g.log"));
//! assert!(!pattern.ends_with("log.old"));
//!
//! // Question marks need exactly one character each:
//! let pattern = Pattern::new("a?b");
//! assert!(pattern.is_match("axb"));
//! assert!(!pattern.is_match("ab"));
//! assert!(!pattern.is_match("axxb"));
//!
//! // The star may stand in for the 'c', or the literal 'c' comes first:
//! let pattern = Pattern::new("a*c");
//! assert_eq!(pattern.index_of('c'), [1, 2]);
//!
//! // A star at the split point stays on both sides:
//! let (head, tail) = pattern.split(1)?;
//! assert_eq!(head.text(), "a*");
//! assert_eq!(tail.text(), "*c");
//!
//! let pattern = Pattern::with_flags("*.TXT", PatternFlag::IGNORE_CASE);
//! assert!(pattern.is_match("Readme.txt"));
//! # Ok(())
//! # }
//! # test().unwrap()
//! ```

mod matcher;
mod pattern;

#[doc(inline)]
pub use pattern::{OutOfRange, ParseError, Pattern, PatternFlag, Token};
