use serde::Serialize;
use utoipa::ToSchema;

/// Fields a search may be ordered by. Anything else falls back to
/// [`SortField::CreatedAt`]; the allow-list keeps unindexed columns out of `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum SortField {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "rating")]
    Rating,
    #[serde(rename = "priceTier")]
    PriceTier,
    #[serde(rename = "createdAt")]
    CreatedAt,
}

impl SortField {
    /// Resolve a caller-supplied sort key, accepting the historical spellings.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "name" => Some(Self::Name),
            "rating" | "avg_rating" => Some(Self::Rating),
            "priceTier" | "price" | "price_level" => Some(Self::PriceTier),
            "createdAt" | "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    /// Canonical name, as echoed back in `meta.sortBy`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Rating => "rating",
            Self::PriceTier => "priceTier",
            Self::CreatedAt => "createdAt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Convert sort order string to a direction; anything unrecognised is descending
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Self::Asc,
            _ => Self::Desc,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Resolved ordering. The store always appends `id ASC` as a tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

/// Parse `sortBy` / `order`. Field and direction fall back independently.
#[must_use]
pub fn parse_sorting(sort_by: Option<&str>, order: Option<&str>) -> SortSpec {
    let default = SortSpec::default();
    SortSpec {
        field: sort_by.and_then(SortField::parse).unwrap_or(default.field),
        direction: order.map_or(default.direction, SortDirection::parse),
    }
}
