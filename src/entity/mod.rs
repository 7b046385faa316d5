//! SeaORM entities backing the listing store, plus schema and index creation.
//!
//! Connection lifecycle belongs to process bootstrap; these functions only
//! need a connection handed to them.

pub mod listing;
pub mod listing_tag;

use sea_orm::{
    ActiveValue, ConnectionTrait, DbErr, EntityTrait, Schema, TransactionTrait,
    sea_query::{Index, IndexCreateStatement},
};

use crate::filtering::fold_case;
use crate::models::Listing;

/// Serialize a tag set into the `listings.tags` column.
///
/// # Errors
///
/// Returns `DbErr::Json` if serialization fails.
pub fn encode_tags(tags: &[String]) -> Result<String, DbErr> {
    serde_json::to_string(tags).map_err(|e| DbErr::Json(e.to_string()))
}

/// Parse the `listings.tags` column.
///
/// # Errors
///
/// Returns the JSON error if the column does not hold an array of strings.
pub fn decode_tags(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(raw)
}

fn indexes() -> Vec<IndexCreateStatement> {
    let single = |name: &str, column: listing::Column| {
        Index::create()
            .name(name)
            .table(listing::Entity)
            .col(column)
            .if_not_exists()
            .to_owned()
    };

    vec![
        single("idx_listings_city_folded", listing::Column::CityFolded),
        single("idx_listings_category_folded", listing::Column::CategoryFolded),
        single("idx_listings_rating", listing::Column::Rating),
        single("idx_listings_price_tier", listing::Column::PriceTier),
        single("idx_listings_created_at", listing::Column::CreatedAt),
        single("idx_listings_name", listing::Column::Name),
        Index::create()
            .name("idx_listings_created_at_id")
            .table(listing::Entity)
            .col(listing::Column::CreatedAt)
            .col(listing::Column::Id)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_listing_tags_tag")
            .table(listing_tag::Entity)
            .col(listing_tag::Column::Tag)
            .if_not_exists()
            .to_owned(),
    ]
}

/// Create the listing tables and every index the search operation relies on.
///
/// # Errors
///
/// Returns a `DbErr` if any statement fails.
pub async fn create_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut listings = schema.create_table_from_entity(listing::Entity);
    listings.if_not_exists();
    db.execute(backend.build(&listings)).await?;

    let mut tags = schema.create_table_from_entity(listing_tag::Entity);
    tags.if_not_exists();
    db.execute(backend.build(&tags)).await?;

    for index in indexes() {
        db.execute(backend.build(&index)).await?;
    }

    tracing::debug!("Listing schema ready");
    Ok(())
}

/// Write a listing and its tag rows in one transaction so the two never disagree.
///
/// # Errors
///
/// Returns a `DbErr` if the transaction fails.
pub async fn insert_listing<C: ConnectionTrait + TransactionTrait>(db: &C, item: &Listing) -> Result<(), DbErr> {
    let txn = db.begin().await?;

    listing::Entity::insert(listing::ActiveModel {
        id: ActiveValue::Set(item.id),
        name: ActiveValue::Set(item.name.clone()),
        name_folded: ActiveValue::Set(fold_case(&item.name)),
        category: ActiveValue::Set(item.category.clone()),
        category_folded: ActiveValue::Set(item.category.as_deref().map(fold_case)),
        rating: ActiveValue::Set(item.rating),
        price_tier: ActiveValue::Set(item.price_tier),
        tags: ActiveValue::Set(encode_tags(&item.tags)?),
        city: ActiveValue::Set(item.address.city.clone()),
        city_folded: ActiveValue::Set(item.address.city.as_deref().map(fold_case)),
        created_at: ActiveValue::Set(item.created_at),
    })
    .exec_without_returning(&txn)
    .await?;

    let mut seen: Vec<&String> = Vec::new();
    for tag in &item.tags {
        if seen.contains(&tag) {
            continue;
        }
        seen.push(tag);
        listing_tag::Entity::insert(listing_tag::ActiveModel {
            listing_id: ActiveValue::Set(item.id),
            tag: ActiveValue::Set(tag.clone()),
            tag_folded: ActiveValue::Set(fold_case(tag)),
        })
        .exec_without_returning(&txn)
        .await?;
    }

    txn.commit().await
}
