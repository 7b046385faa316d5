//! Store access capability.
//!
//! The executor never talks to a database directly: it is handed something
//! implementing [`ListingStore`] at construction time.

pub mod database;
pub mod memory;

use async_trait::async_trait;
use std::fmt;

use crate::filtering::ListingQuery;
use crate::models::Listing;

pub use database::SeaOrmListingStore;
pub use memory::MemoryListingStore;

/// One page of listings plus the number of listings matching the filter,
/// both taken from the same snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub items: Vec<Listing>,
    pub total: u64,
}

/// Failure inside the store. Carries internal detail that must never reach a caller.
#[derive(Debug)]
pub enum StoreError {
    /// The database rejected or failed the query.
    Database(sea_orm::DbErr),
    /// A stored row could not be projected into a [`Listing`].
    Corrupt { id: Option<uuid::Uuid>, reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database(err) => write!(f, "database error: {err}"),
            Self::Corrupt { id: Some(id), reason } => write!(f, "listing {id} is corrupt: {reason}"),
            Self::Corrupt { id: None, reason } => write!(f, "corrupt search result: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(err) => Some(err),
            Self::Corrupt { .. } => None,
        }
    }
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err)
    }
}

/// Executes a combined filter + sort + window + count over the listing collection.
///
/// Implementations must:
/// - order by the query's sort field and direction, then by `id` ascending;
/// - count every listing matching the filter, ignoring the window;
/// - derive the page and the count from one consistent read, in one call.
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn find_page(&self, query: &ListingQuery) -> Result<ListingPage, StoreError>;
}

#[async_trait]
impl<S: ListingStore + ?Sized> ListingStore for std::sync::Arc<S> {
    async fn find_page(&self, query: &ListingQuery) -> Result<ListingPage, StoreError> {
        (**self).find_page(query).await
    }
}
