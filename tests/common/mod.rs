#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection, DbErr};
use searchcrate::entity::{create_schema, insert_listing};
use searchcrate::models::Address;
use searchcrate::{Listing, ListingSearch, ListingStore, SearchConfig, SeaOrmListingStore, routes};
use tower::ServiceExt;
use uuid::Uuid;

/// Route `tracing` output through the test harness; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("searchcrate=debug")
        .with_test_writer()
        .try_init();
}

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    init_tracing();
    let db = Database::connect("sqlite::memory:").await?;
    create_schema(&db).await?;
    Ok(db)
}

pub async fn setup_seeded_db(listings: &[Listing]) -> Result<DatabaseConnection, DbErr> {
    let db = setup_test_db().await?;
    for item in listings {
        insert_listing(&db, item).await?;
    }
    Ok(db)
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    setup_test_app_with_config(db, SearchConfig::default())
}

pub fn setup_test_app_with_config(db: DatabaseConnection, config: SearchConfig) -> Router {
    let store: Arc<dyn ListingStore> = Arc::new(SeaOrmListingStore::new(db));
    routes::router(Arc::new(ListingSearch::with_config(store, config)))
}

/// Fixture builder. `n` fixes both the id and the creation time (minute `n` of 2024).
pub struct ListingFixture {
    inner: Listing,
}

pub fn listing(n: u128, name: &str) -> ListingFixture {
    ListingFixture {
        inner: Listing {
            id: Uuid::from_u128(n),
            name: name.to_string(),
            category: None,
            rating: 3.0,
            price_tier: 2,
            tags: vec![],
            address: Address { city: None },
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::minutes(i64::try_from(n).unwrap()),
        },
    }
}

impl ListingFixture {
    pub fn city(mut self, city: &str) -> Self {
        self.inner.address.city = Some(city.to_string());
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.inner.category = Some(category.to_string());
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.inner.rating = rating;
        self
    }

    pub fn price(mut self, price_tier: i32) -> Self {
        self.inner.price_tier = price_tier;
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.inner.tags = tags.iter().map(|t| (*t).to_string()).collect();
        self
    }

    pub fn created_minute(mut self, minute: i64) -> Self {
        self.inner.created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minute);
        self
    }

    pub fn build(self) -> Listing {
        self.inner
    }
}

/// GET `uri` and return the status with the decoded JSON body.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Names in `data`, in response order.
pub fn names(body: &serde_json::Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data should be an array")
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect()
}

pub fn encode(value: &str) -> String {
    url_escape::encode_component(value).to_string()
}
