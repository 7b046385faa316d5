use sea_orm::entity::prelude::*;

/// Listings table. `tags` holds the tag set as a JSON array for projection;
/// filtering on tags goes through [`super::listing_tag`].
///
/// The `*_folded` columns hold [`fold_case`](crate::filtering::fold_case) of
/// their source column and are what text filters compare against.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub name_folded: String,
    pub category: Option<String>,
    pub category_folded: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    pub price_tier: i32,
    #[sea_orm(column_type = "Text")]
    pub tags: String,
    pub city: Option<String>,
    pub city_folded: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::listing_tag::Entity")]
    Tags,
}

impl Related<super::listing_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
