//! Validation Support
//!
//! Query parameters arrive as untrusted strings. Anything that cannot be
//! interpreted without guessing is rejected with a [`ValidationError`] naming
//! the offending parameter, so that "bad request" never collapses into
//! "no results".
//!
//! ```rust,ignore
//! use searchcrate::validation::ValidationError;
//!
//! let err = ValidationError::new("minRating", "must be a number");
//! assert_eq!(err.to_string(), "minRating: must be a number");
//! ```

use serde::Serialize;
use std::fmt;

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The query parameter that failed validation, as the caller spelled it
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// A strictly numeric parameter carried something that is not a finite number.
    #[must_use]
    pub fn not_a_number(field: &str, raw: &str) -> Self {
        Self::new(field, format!("expected a number, got '{}'", truncate_for_message(raw)))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Echoed input is cut short so error bodies stay bounded.
fn truncate_for_message(raw: &str) -> String {
    const MAX_ECHO: usize = 32;
    if raw.chars().count() <= MAX_ECHO {
        raw.to_string()
    } else {
        let head: String = raw.chars().take(MAX_ECHO).collect();
        format!("{head}...")
    }
}
