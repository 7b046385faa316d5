//! Search configuration.
//!
//! Process bootstrap owns where configuration comes from; this module only
//! defines the knobs and a loader for the environment.

use std::env;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

/// How a `tags=a,b` filter matches a listing's tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagMatch {
    /// The listing has at least one of the requested tags.
    #[default]
    Any,
    /// The listing has every requested tag.
    All,
}

impl TagMatch {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(Self::Any),
            "all" => Ok(Self::All),
            other => bail!("unknown tag match policy '{other}', expected 'any' or 'all'"),
        }
    }
}

/// Search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Tag matching policy (default: any).
    pub tag_match: TagMatch,

    /// Page size when the request has none (default: 10).
    default_page_size: u64,

    /// Upper bound for `limit` (default: 100).
    max_page_size: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tag_match: TagMatch::Any,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn new(tag_match: TagMatch, default_page_size: u64, max_page_size: u64) -> Self {
        Self {
            tag_match,
            default_page_size,
            max_page_size,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `SEARCH_TAG_MATCH` (`any` | `all`), `SEARCH_DEFAULT_PAGE_SIZE` and
    /// `SEARCH_MAX_PAGE_SIZE`; unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to something unparseable.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let tag_match = match env::var("SEARCH_TAG_MATCH") {
            Ok(raw) => TagMatch::parse(&raw).context("SEARCH_TAG_MATCH is invalid")?,
            Err(_) => defaults.tag_match,
        };

        let default_page_size = env::var("SEARCH_DEFAULT_PAGE_SIZE")
            .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
            .parse()
            .context("SEARCH_DEFAULT_PAGE_SIZE must be a valid u64")?;

        let max_page_size = env::var("SEARCH_MAX_PAGE_SIZE")
            .unwrap_or_else(|_| MAX_PAGE_SIZE.to_string())
            .parse()
            .context("SEARCH_MAX_PAGE_SIZE must be a valid u64")?;

        Ok(Self::new(tag_match, default_page_size, max_page_size))
    }

    /// Never below 1.
    #[must_use]
    pub fn max_page_size(&self) -> u64 {
        self.max_page_size.max(1)
    }

    /// Always within `[1, max_page_size]`.
    #[must_use]
    pub fn default_page_size(&self) -> u64 {
        self.default_page_size.clamp(1, self.max_page_size())
    }
}
