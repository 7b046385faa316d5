//! In-memory listing store.
//!
//! Evaluates the predicate tree with regular expressions built from escaped,
//! case-folded terms. Useful for tests and for small, read-only
//! catalogs embedded in a process.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;

use super::{ListingPage, ListingStore, StoreError};
use crate::config::TagMatch;
use crate::filtering::{
    ListingQuery, NumericField, Predicate, SortDirection, SortField, SortSpec, TextField, TextMatcher,
};
use crate::models::Listing;

/// A predicate with its patterns compiled once per query.
enum Compiled<'q> {
    Text(TextField, TextMatcher),
    AtLeast(NumericField, f64),
    AtMost(NumericField, f64),
    Tags(&'q [String], TagMatch),
    AnyText(TextMatcher),
}

fn compile(predicate: &Predicate) -> Result<Compiled<'_>, StoreError> {
    let regex_error = |e: regex::Error| StoreError::Corrupt {
        id: None,
        reason: format!("pattern could not be compiled: {e}"),
    };
    Ok(match predicate {
        Predicate::Text { field, pattern } => Compiled::Text(*field, pattern.matcher().map_err(regex_error)?),
        Predicate::AtLeast { field, value } => Compiled::AtLeast(*field, *value),
        Predicate::AtMost { field, value } => Compiled::AtMost(*field, *value),
        Predicate::Tags { tags, policy } => Compiled::Tags(tags, *policy),
        Predicate::AnyText { pattern } => Compiled::AnyText(pattern.matcher().map_err(regex_error)?),
    })
}

fn text_value(item: &Listing, field: TextField) -> Option<&str> {
    match field {
        TextField::Name => Some(&item.name),
        TextField::Category => item.category.as_deref(),
        TextField::City => item.address.city.as_deref(),
    }
}

fn numeric_value(item: &Listing, field: NumericField) -> f64 {
    match field {
        NumericField::Rating => item.rating,
        NumericField::PriceTier => f64::from(item.price_tier),
    }
}

impl Compiled<'_> {
    fn matches(&self, item: &Listing) -> bool {
        match self {
            Self::Text(field, matcher) => text_value(item, *field).is_some_and(|v| matcher.is_match(v)),
            Self::AtLeast(field, value) => numeric_value(item, *field) >= *value,
            Self::AtMost(field, value) => numeric_value(item, *field) <= *value,
            Self::Tags(tags, TagMatch::Any) => tags.iter().any(|t| item.tags.contains(t)),
            Self::Tags(tags, TagMatch::All) => tags.iter().all(|t| item.tags.contains(t)),
            Self::AnyText(matcher) => {
                matcher.is_match(&item.name)
                    || item.category.as_deref().is_some_and(|c| matcher.is_match(c))
                    || item.tags.iter().any(|t| matcher.is_match(t))
            }
        }
    }
}

fn compare(a: &Listing, b: &Listing, sort: SortSpec) -> Ordering {
    let primary = match sort.field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Rating => a.rating.total_cmp(&b.rating),
        SortField::PriceTier => a.price_tier.cmp(&b.price_tier),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    };
    let primary = match sort.direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

/// Immutable snapshot of listings; every query reads the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryListingStore {
    listings: Arc<[Listing]>,
}

impl MemoryListingStore {
    #[must_use]
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings: listings.into(),
        }
    }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn find_page(&self, query: &ListingQuery) -> Result<ListingPage, StoreError> {
        let compiled = query
            .filter
            .predicates()
            .iter()
            .map(compile)
            .collect::<Result<Vec<_>, _>>()?;

        let mut matched: Vec<&Listing> = self
            .listings
            .iter()
            .filter(|item| compiled.iter().all(|c| c.matches(item)))
            .collect();
        matched.sort_by(|a, b| compare(a, b, query.sort));

        let total = matched.len() as u64;
        let offset = usize::try_from(query.window.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.window.limit).unwrap_or(usize::MAX);
        let items = matched.into_iter().skip(offset).take(limit).cloned().collect();

        Ok(ListingPage { items, total })
    }
}
