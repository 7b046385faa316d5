//! # Query Translation
//!
//! Turns untrusted query parameters into a typed, store-agnostic query.
//!
//! ## Main Components
//!
//! - **[`build_query`]**: validates parameters and builds a [`ListingQuery`]
//! - **[`PredicateTree`]**: conjunction of typed [`Predicate`]s
//! - **[`parse_sorting`]**: allow-listed sort field and direction
//! - **[`parse_pagination`]**: clamped page window
//! - **[`TextPattern`]**: the only place caller text becomes a pattern
//!
//! ## Query Parameter Examples
//!
//! ```rust,ignore
//! // Free text across name, category and tags
//! GET /listings?q=sushi
//!
//! // Exact, case-insensitive categorical filters
//! GET /listings?city=lima&category=japanese
//!
//! // Ranges (AND semantics)
//! GET /listings?minRating=4&maxPrice=2
//!
//! // Tags (any of, unless configured otherwise)
//! GET /listings?tags=vegan,casual
//!
//! // Sorting and paging
//! GET /listings?sortBy=rating&order=desc&page=2&limit=20
//! ```

pub mod conditions;
pub mod pagination;
pub mod search;
pub mod sort;

// Re-export commonly used items
pub use conditions::{ListingQuery, NumericField, Predicate, PredicateTree, TextField, build_query, parse_tags};
pub use pagination::{PageWindow, parse_pagination, total_pages};
pub use search::{LIKE_ESCAPE, TextMatcher, TextPattern, escape_like_wildcards, escape_pattern, fold_case};
pub use sort::{SortDirection, SortField, SortSpec, parse_sorting};
