//! Paginated query executor.
//!
//! `search` is the single operation exposed to the routing layer: build the
//! query, make exactly one store call, and assemble the envelope.

use tracing::{debug, error};

use crate::config::SearchConfig;
use crate::errors::SearchError;
use crate::filtering::{ListingQuery, build_query, total_pages};
use crate::models::{PageMeta, PaginationEnvelope, SearchParams};
use crate::store::{ListingPage, ListingStore};

/// Searches listings through an injected store.
#[derive(Debug, Clone)]
pub struct ListingSearch<S> {
    store: S,
    config: SearchConfig,
}

impl<S: ListingStore> ListingSearch<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_config(store, SearchConfig::default())
    }

    #[must_use]
    pub const fn with_config(store: S, config: SearchConfig) -> Self {
        Self { store, config }
    }

    /// Validate `params` and return one page of matching listings.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Validation`] if a parameter cannot be interpreted
    /// - [`SearchError::Execution`] if the store call fails; no partial result is returned
    pub async fn search(&self, params: &SearchParams) -> Result<PaginationEnvelope, SearchError> {
        let query = build_query(params, &self.config).inspect_err(|err| {
            debug!(field = %err.field, message = %err.message, "Rejected search parameters");
        })?;
        self.execute(&query).await
    }

    /// Run an already-built query.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Execution`] if the store call fails.
    pub async fn execute(&self, query: &ListingQuery) -> Result<PaginationEnvelope, SearchError> {
        let ListingPage { items, total } = self.store.find_page(query).await.inspect_err(|err| {
            error!(error = %err, "Listing search failed");
        })?;

        let meta = PageMeta {
            page: query.window.page,
            limit: query.window.limit,
            total,
            pages: total_pages(total, query.window.limit),
            sort_by: query.sort.field,
            order: query.sort.direction,
        };

        Ok(PaginationEnvelope { meta, data: items })
    }
}
