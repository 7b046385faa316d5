//! SeaORM-backed listing store.
//!
//! The whole search is one statement: a single-row count subquery LEFT JOINed
//! with the windowed page subquery, so count and page come from one snapshot
//! and one round trip.
//!
//! ```sql
//! SELECT facet_total.total, facet_page.*
//! FROM (SELECT COUNT(listings.id) AS total FROM listings WHERE <filter>) AS facet_total
//! LEFT JOIN (
//!     SELECT <projection> FROM listings WHERE <filter>
//!     ORDER BY <sort> <dir>, listings.id ASC LIMIT <limit> OFFSET <offset>
//! ) AS facet_page ON 1 = 1
//! ORDER BY facet_page.<sort> <dir>, facet_page.id ASC
//! ```
//!
//! A window past the last match still yields one row: the total with an
//! all-NULL page, which is dropped during projection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    Condition, ConnectionTrait, DatabaseConnection, FromQueryResult,
    sea_query::{Alias, Expr, Func, IntoColumnRef, JoinType, LikeExpr, Order, Query, SelectStatement, SimpleExpr},
};
use uuid::Uuid;

use super::{ListingPage, ListingStore, StoreError};
use crate::config::TagMatch;
use crate::entity::{decode_tags, listing, listing_tag};
use crate::filtering::{
    LIKE_ESCAPE, ListingQuery, NumericField, Predicate, PredicateTree, SortDirection, SortField, TextField, TextPattern,
};
use crate::models::{Address, Listing};

const TOTAL_ALIAS: &str = "facet_total";
const PAGE_ALIAS: &str = "facet_page";
const TOTAL_COLUMN: &str = "total";

/// Fields returned for each listing; never the full row.
const PROJECTION: [listing::Column; 8] = [
    listing::Column::Id,
    listing::Column::Name,
    listing::Column::Category,
    listing::Column::Rating,
    listing::Column::PriceTier,
    listing::Column::Tags,
    listing::Column::City,
    listing::Column::CreatedAt,
];

#[derive(Debug, Clone)]
pub struct SeaOrmListingStore {
    db: DatabaseConnection,
}

impl SeaOrmListingStore {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Text filters compare against the case-folded shadow columns.
const fn text_column(field: TextField) -> listing::Column {
    match field {
        TextField::Name => listing::Column::NameFolded,
        TextField::Category => listing::Column::CategoryFolded,
        TextField::City => listing::Column::CityFolded,
    }
}

const fn numeric_column(field: NumericField) -> listing::Column {
    match field {
        NumericField::Rating => listing::Column::Rating,
        NumericField::PriceTier => listing::Column::PriceTier,
    }
}

const fn sort_column(field: SortField) -> listing::Column {
    match field {
        SortField::Name => listing::Column::Name,
        SortField::Rating => listing::Column::Rating,
        SortField::PriceTier => listing::Column::PriceTier,
        SortField::CreatedAt => listing::Column::CreatedAt,
    }
}

const fn order_for(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}

/// `column LIKE pattern ESCAPE '!'` on a folded column, with the folded pattern bound as a value.
fn like_folded<C: IntoColumnRef>(column: C, pattern: &TextPattern) -> SimpleExpr {
    Expr::col(column).like(LikeExpr::new(pattern.like_pattern()).escape(LIKE_ESCAPE))
}

/// `listings.id IN (SELECT listing_id FROM listing_tags WHERE <filter> ...)`
fn id_in_tag_rows(filter: SimpleExpr, require_all: Option<usize>) -> SimpleExpr {
    let listing_id = (listing_tag::Entity, listing_tag::Column::ListingId);
    let mut rows = Query::select();
    rows.column(listing_id)
        .from(listing_tag::Entity)
        .and_where(filter);

    // (listing_id, tag) is the primary key, so a plain count is a distinct count.
    if let Some(required) = require_all {
        rows.group_by_col(listing_id)
            .and_having(Expr::expr(Func::count(Expr::col(listing_id))).eq(i64::try_from(required).unwrap_or(i64::MAX)));
    }

    Expr::col((listing::Entity, listing::Column::Id)).in_subquery(rows.to_owned())
}

fn predicate_condition(predicate: &Predicate) -> Condition {
    match predicate {
        Predicate::Text { field, pattern } => {
            Condition::all().add(like_folded((listing::Entity, text_column(*field)), pattern))
        }
        Predicate::AtLeast { field, value } => {
            Condition::all().add(Expr::col((listing::Entity, numeric_column(*field))).gte(*value))
        }
        Predicate::AtMost { field, value } => {
            Condition::all().add(Expr::col((listing::Entity, numeric_column(*field))).lte(*value))
        }
        Predicate::Tags { tags, policy } => {
            let membership = Expr::col((listing_tag::Entity, listing_tag::Column::Tag)).is_in(tags.iter().cloned());
            let require_all = match policy {
                TagMatch::Any => None,
                TagMatch::All => Some(tags.len()),
            };
            Condition::all().add(id_in_tag_rows(membership, require_all))
        }
        Predicate::AnyText { pattern } => {
            let tag = like_folded((listing_tag::Entity, listing_tag::Column::TagFolded), pattern);
            Condition::any()
                .add(like_folded((listing::Entity, listing::Column::NameFolded), pattern))
                .add(like_folded((listing::Entity, listing::Column::CategoryFolded), pattern))
                .add(id_in_tag_rows(tag, None))
        }
    }
}

/// Translate the predicate tree; an empty tree is an empty `AND` and matches everything.
#[must_use]
pub fn condition_for(tree: &PredicateTree) -> Condition {
    tree.predicates()
        .iter()
        .fold(Condition::all(), |condition, predicate| condition.add(predicate_condition(predicate)))
}

/// Build the combined count + page statement for `query`.
#[must_use]
pub fn facet_statement(query: &ListingQuery) -> SelectStatement {
    let condition = condition_for(&query.filter);
    let sort = sort_column(query.sort.field);
    let order = order_for(query.sort.direction);
    let page_alias = Alias::new(PAGE_ALIAS);

    let count = Query::select()
        .expr_as(
            Func::count(Expr::col((listing::Entity, listing::Column::Id))),
            Alias::new(TOTAL_COLUMN),
        )
        .from(listing::Entity)
        .cond_where(condition.clone())
        .to_owned();

    let page = Query::select()
        .columns(PROJECTION.iter().map(|column| (listing::Entity, *column)))
        .from(listing::Entity)
        .cond_where(condition)
        .order_by((listing::Entity, sort), order.clone())
        .order_by((listing::Entity, listing::Column::Id), Order::Asc)
        .limit(query.window.limit)
        .offset(query.window.offset())
        .to_owned();

    Query::select()
        .column((Alias::new(TOTAL_ALIAS), Alias::new(TOTAL_COLUMN)))
        .columns(PROJECTION.iter().map(|column| (page_alias.clone(), *column)))
        .from_subquery(count, Alias::new(TOTAL_ALIAS))
        .join_subquery(JoinType::LeftJoin, page, page_alias.clone(), Expr::val(1).eq(1))
        .order_by((page_alias.clone(), sort), order)
        .order_by((page_alias, listing::Column::Id), Order::Asc)
        .to_owned()
}

/// One result row. Page columns are NULL on the padding row of an empty window.
#[derive(Debug, FromQueryResult)]
struct FacetRow {
    total: i64,
    id: Option<Uuid>,
    name: Option<String>,
    category: Option<String>,
    rating: Option<f64>,
    price_tier: Option<i32>,
    tags: Option<String>,
    city: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl FacetRow {
    fn into_listing(self) -> Result<Option<Listing>, StoreError> {
        let Some(id) = self.id else {
            return Ok(None);
        };
        let missing = |column: &str| StoreError::Corrupt {
            id: Some(id),
            reason: format!("{column} is NULL"),
        };

        let tags = self.tags.ok_or_else(|| missing("tags"))?;
        let tags = decode_tags(&tags).map_err(|e| StoreError::Corrupt {
            id: Some(id),
            reason: format!("tags column is not a JSON string array: {e}"),
        })?;

        Ok(Some(Listing {
            id,
            name: self.name.ok_or_else(|| missing("name"))?,
            category: self.category,
            rating: self.rating.ok_or_else(|| missing("rating"))?,
            price_tier: self.price_tier.ok_or_else(|| missing("price_tier"))?,
            tags,
            address: Address { city: self.city },
            created_at: self.created_at.ok_or_else(|| missing("created_at"))?,
        }))
    }
}

#[async_trait]
impl ListingStore for SeaOrmListingStore {
    async fn find_page(&self, query: &ListingQuery) -> Result<ListingPage, StoreError> {
        let statement = self.db.get_database_backend().build(&facet_statement(query));
        tracing::trace!(sql = %statement, "Executing listing search");

        let rows = FacetRow::find_by_statement(statement).all(&self.db).await?;

        let total = rows.first().map_or(0, |row| row.total);
        let total = u64::try_from(total).map_err(|_| StoreError::Corrupt {
            id: None,
            reason: format!("negative match count {total}"),
        })?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(item) = row.into_listing()? {
                items.push(item);
            }
        }

        tracing::debug!(total, returned = items.len(), "Listing page fetched");
        Ok(ListingPage { items, total })
    }
}
