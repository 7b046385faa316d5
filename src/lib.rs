//! # searchcrate
//!
//! Query translation and pagination for a searchable listing catalog.
//!
//! Untrusted query parameters become a typed predicate tree
//! ([`filtering::build_query`]), which a [`store::ListingStore`] executes as a
//! single combined "page + total" read. [`ListingSearch`] ties the two
//! together and returns a [`models::PaginationEnvelope`].
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use searchcrate::{ListingSearch, SearchConfig, SeaOrmListingStore, routes};
//!
//! let db = sea_orm::Database::connect(url).await?;
//! let store: Arc<dyn searchcrate::ListingStore> = Arc::new(SeaOrmListingStore::new(db));
//! let search = Arc::new(ListingSearch::with_config(store, SearchConfig::from_env()?));
//! let app = routes::router(search);
//! ```

pub mod config;
pub mod entity;
pub mod errors;
pub mod executor;
pub mod filtering;
pub mod models;
pub mod routes;
pub mod store;
pub mod validation;

pub use config::{SearchConfig, TagMatch};
pub use errors::SearchError;
pub use executor::ListingSearch;
pub use models::{Listing, PaginationEnvelope, SearchParams};
pub use store::{ListingStore, MemoryListingStore, SeaOrmListingStore, StoreError};
pub use validation::ValidationError;
