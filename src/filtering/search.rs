//! Literal text patterns.
//!
//! Every caller-supplied term that ends up inside a pattern (SQL `LIKE` or a
//! regular expression) goes through this module. Nothing else in the crate
//! builds a pattern from raw input.

use regex::{Regex, RegexBuilder};

// Basic safety limits
pub const MAX_SEARCH_TERM_LENGTH: usize = 256;

/// Escape character for every `LIKE` pattern this crate builds.
/// Must not be special inside a quoted string literal on any backend.
pub const LIKE_ESCAPE: char = '!';

/// Escape LIKE wildcards to prevent wildcard injection attacks
/// Escapes: % (match any) and _ (match single char), with [`LIKE_ESCAPE`] as the escape character
#[must_use]
pub fn escape_like_wildcards(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Escape every regular-expression metacharacter so `input` only ever matches itself.
#[must_use]
pub fn escape_pattern(input: &str) -> String {
    regex::escape(input)
}

/// Case folding shared by patterns and stored values.
///
/// Both sides of every text comparison go through this, so matching is
/// case-insensitive for all of Unicode even where the database only folds ASCII.
#[must_use]
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// How much of the field a [`TextPattern`] has to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// The term may appear anywhere in the field.
    Substring,
    /// The term has to match the whole field.
    Whole,
}

/// A case-insensitive match of a literal term.
///
/// The term is stored as given; folding and escaping happen in exactly one
/// place per target syntax ([`TextPattern::like_pattern`], [`TextPattern::matcher`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPattern {
    term: String,
    anchor: Anchor,
}

impl TextPattern {
    #[must_use]
    pub fn substring(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            anchor: Anchor::Substring,
        }
    }

    #[must_use]
    pub fn whole(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            anchor: Anchor::Whole,
        }
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub const fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Folded `LIKE` pattern for use with `ESCAPE '!'` against a folded column.
    #[must_use]
    pub fn like_pattern(&self) -> String {
        let escaped = escape_like_wildcards(&fold_case(&self.term));
        match self.anchor {
            Anchor::Substring => format!("%{escaped}%"),
            Anchor::Whole => escaped,
        }
    }

    /// In-process matcher with the same semantics as [`TextPattern::like_pattern`].
    ///
    /// # Errors
    ///
    /// Only fails if the escaped term exceeds the regex size limit.
    pub fn matcher(&self) -> Result<TextMatcher, regex::Error> {
        let escaped = escape_pattern(&fold_case(&self.term));
        let source = match self.anchor {
            Anchor::Substring => escaped,
            Anchor::Whole => format!("^(?:{escaped})$"),
        };
        Ok(TextMatcher {
            regex: RegexBuilder::new(&source).build()?,
        })
    }
}

/// Compiled [`TextPattern`]. Folds the haystack before matching.
#[derive(Debug, Clone)]
pub struct TextMatcher {
    regex: Regex,
}

impl TextMatcher {
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(&fold_case(text))
    }
}
