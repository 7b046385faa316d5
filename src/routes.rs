//! Axum surface for the search operation.
//!
//! Only the read path lives here; create/update/delete routes belong to the
//! application mounting this router.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde_json::{Value, json};
use utoipa::OpenApi;

use crate::errors::SearchError;
use crate::executor::ListingSearch;
use crate::models::{PaginationEnvelope, SearchParams};
use crate::store::ListingStore;

/// Search executor shared by every request. Holds no mutable state.
pub type SharedSearch = Arc<ListingSearch<Arc<dyn ListingStore>>>;

#[utoipa::path(
    get,
    path = "/listings",
    params(SearchParams),
    responses(
        (status = axum::http::StatusCode::OK, description = "One page of matching listings", body = PaginationEnvelope),
        (status = axum::http::StatusCode::BAD_REQUEST, description = "A query parameter could not be interpreted"),
        (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
    ),
    operation_id = "search_listings",
    summary = "Search listings",
    description = "Filters, sorts and paginates listings. An unmatched filter returns an empty page, not an error."
)]
pub async fn search_handler(
    State(search): State<SharedSearch>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PaginationEnvelope>, SearchError> {
    search.search(&params).await.map(Json)
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "ok": true }))
}

#[derive(OpenApi)]
#[openapi(
    paths(search_handler),
    components(schemas(
        crate::models::PaginationEnvelope,
        crate::models::PageMeta,
        crate::models::Listing,
        crate::models::Address,
        crate::filtering::SortField,
        crate::filtering::SortDirection
    ))
)]
pub struct ApiDoc;

/// `GET /listings` and `GET /health`.
pub fn router(search: SharedSearch) -> Router {
    Router::new()
        .route("/listings", get(search_handler))
        .route("/health", get(health_handler))
        .with_state(search)
}
