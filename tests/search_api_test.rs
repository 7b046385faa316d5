use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{encode, get_json, listing, names, setup_seeded_db, setup_test_app, setup_test_db};

#[tokio::test]
async fn test_end_to_end_search() {
    let db = setup_seeded_db(&[
        listing(1, "Sushi Go").city("Lima").rating(4.5).tags(&["casual"]).build(),
        listing(2, "Go Burgers").city("Lima").rating(3.0).tags(&["fast"]).build(),
    ])
    .await
    .expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (status, body) = get_json(&app, "/listings?q=go&minRating=4&sortBy=rating&order=desc&page=1&limit=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Sushi Go"]);
    assert_eq!(
        body["meta"],
        json!({"page": 1, "limit": 10, "total": 1, "pages": 1, "sortBy": "rating", "order": "desc"})
    );
}

#[tokio::test]
async fn test_listing_projection_shape() {
    let db = setup_seeded_db(&[listing(7, "Ceviche Bar")
        .city("Lima")
        .category("peruvian")
        .rating(4.0)
        .price(3)
        .tags(&["seafood", "lunch"])
        .build()])
    .await
    .expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (_, body) = get_json(&app, "/listings").await;
    let item = &body["data"][0];

    assert_eq!(item["id"], "00000000-0000-0000-0000-000000000007");
    assert_eq!(item["name"], "Ceviche Bar");
    assert_eq!(item["category"], "peruvian");
    assert_eq!(item["rating"], 4.0);
    assert_eq!(item["priceTier"], 3);
    assert_eq!(item["tags"], json!(["seafood", "lunch"]));
    assert_eq!(item["address"], json!({"city": "Lima"}));
    assert!(item["createdAt"].as_str().unwrap().starts_with("2024-01-01T00:07:00"));
}

#[tokio::test]
async fn test_empty_result_is_well_formed() {
    let db = setup_seeded_db(&[listing(1, "Sushi Go").city("Lima").build()])
        .await
        .expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (status, body) = get_json(&app, "/listings?city=Paris").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["meta"]["total"], 0);
    assert_eq!(body["meta"]["pages"], 1);
    assert_eq!(body["meta"]["page"], 1);
}

#[tokio::test]
async fn test_empty_store() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (status, body) = get_json(&app, "/listings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 0);
    assert_eq!(body["meta"]["pages"], 1);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_non_numeric_min_rating_is_bad_request() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (status, body) = get_json(&app, "/listings?minRating=high").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "minRating");
}

#[tokio::test]
async fn test_non_numeric_max_price_is_bad_request() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (status, body) = get_json(&app, "/listings?maxPrice=%24%24").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "maxPrice");
}

#[tokio::test]
async fn test_clamped_values_are_echoed() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (_, body) = get_json(&app, "/listings?limit=500&page=0").await;
    assert_eq!(body["meta"]["limit"], 100);
    assert_eq!(body["meta"]["page"], 1);

    let (_, body) = get_json(&app, "/listings?limit=-5&page=-1").await;
    assert_eq!(body["meta"]["limit"], 1);
    assert_eq!(body["meta"]["page"], 1);

    let (_, body) = get_json(&app, "/listings?limit=0").await;
    assert_eq!(body["meta"]["limit"], 1);
}

#[tokio::test]
async fn test_invalid_sort_falls_back_to_default() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let uri = format!("/listings?sortBy={}&order=upwards", encode("id; DROP TABLE listings"));
    let (status, body) = get_json(&app, &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["sortBy"], "createdAt");
    assert_eq!(body["meta"]["order"], "desc");
}

#[tokio::test]
async fn test_health() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (status, body) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
}
