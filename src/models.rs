use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::filtering::sort::{SortDirection, SortField};

/// Raw query parameters for searching listings.
///
/// Every field is an untrusted string and every field is optional; an absent
/// parameter means "no constraint". Interpretation happens in
/// [`build_query`](crate::filtering::build_query).
///
/// # Filtering
/// - **Free text:** `q=sushi` matches name, category or any tag, case-insensitively
/// - **Name:** `name=go` matches the name only
/// - **Exact categorical match:** `city=Lima`, `category=japanese` (alias `cuisine`)
/// - **Ranges:** `minRating=4`, `maxPrice=2`
/// - **Tags:** `tags=vegan,casual`
///
/// # Sorting
/// `sortBy` is one of `name`, `rating`, `priceTier`, `createdAt`; `order` is `asc` or `desc`.
///
/// # Pagination
/// `page` is 1-based; `limit` is clamped to the configured maximum.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Free-text term matched against name, category and tags.
    #[param(example = "sushi")]
    pub q: Option<String>,
    /// Substring match on the listing name only.
    #[param(example = "go")]
    pub name: Option<String>,
    /// Case-insensitive exact city.
    #[param(example = "Lima")]
    pub city: Option<String>,
    /// Case-insensitive exact category.
    #[param(example = "japanese")]
    pub category: Option<String>,
    /// Legacy spelling of `category`.
    pub cuisine: Option<String>,
    /// Minimum rating, inclusive.
    #[param(example = "4")]
    pub min_rating: Option<String>,
    /// Maximum price tier, inclusive.
    #[param(example = "2")]
    pub max_price: Option<String>,
    /// Comma-separated tag list.
    #[param(example = "vegan,casual")]
    pub tags: Option<String>,
    /// Sort field.
    #[param(example = "rating")]
    pub sort_by: Option<String>,
    /// Sort direction, `asc` or `desc`.
    #[param(example = "desc")]
    pub order: Option<String>,
    /// Page number (1-based).
    #[param(example = "1")]
    pub page: Option<String>,
    /// Page size.
    #[param(example = "10")]
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub city: Option<String>,
}

/// The projection of a listing returned by searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub rating: f64,
    pub price_tier: i32,
    pub tags: Vec<String>,
    pub address: Address,
    pub created_at: DateTime<Utc>,
}

/// What was actually applied after clamping and defaulting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
    pub sort_by: SortField,
    pub order: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PaginationEnvelope {
    pub meta: PageMeta,
    pub data: Vec<Listing>,
}
