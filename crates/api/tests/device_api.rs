//! HTTP-level tests for the device, favorite and lookup endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_device, delete_auth, get, get_auth, patch_json_auth,
    post_json_auth, put_json_auth, send,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Health / middleware
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_reports_store_state() {
    let app = build_test_app();

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-request-id").is_some());
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);

    app.store.fail_queries(true).await;
    let json = body_json(get(&app, "/health").await).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app();
    let response = get(&app, "/api/v1/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_uses_token_identity_as_owner() {
    let app = build_test_app();
    let body = json!({
        "name": "Camera",
        "price_per_day": 20.0,
        "owner_id": "someone-else",
    });

    let response = post_json_auth(&app, "/api/v1/devices", body, &app.token("u1")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let device = &json["data"];
    assert_eq!(device["owner_id"], "u1");
    assert_eq!(device["available"], true);
    assert!(device["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(device["created_at"].is_string());

    let id = device["id"].as_str().unwrap();
    let fetched = body_json(get(&app, &format!("/api/v1/devices/{id}")).await).await;
    assert_eq!(fetched["data"], *device);
}

#[tokio::test]
async fn create_without_token_is_unauthorized() {
    let app = build_test_app();
    let body = json!({ "name": "Camera", "price_per_day": 20.0 });

    let response = send(
        &app,
        axum::http::Method::POST,
        "/api/v1/devices",
        None,
        Some(body.clone()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");

    let response = post_json_auth(&app, "/api/v1/devices", body, "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn provider_token_with_only_sub_and_exp_is_accepted() {
    let app = build_test_app();
    let exp = chrono::Utc::now().timestamp() + 600;
    let token = app.sign(json!({ "sub": "u1", "exp": exp }));
    let body = json!({ "name": "Camera", "price_per_day": 20.0 });

    let response = post_json_auth(&app, "/api/v1/devices", body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["owner_id"], "u1");
}

#[tokio::test]
async fn token_with_blank_subject_is_unauthorized() {
    let app = build_test_app();
    let exp = chrono::Utc::now().timestamp() + 600;
    let token = app.sign(json!({ "sub": "  ", "exp": exp }));

    let response = get_auth(&app, "/api/v1/devices/favorite", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_rejects_negative_price() {
    let app = build_test_app();
    let body = json!({ "name": "Camera", "price_per_day": -5.0 });

    let response = post_json_auth(&app, "/api/v1/devices", body, &app.token("u1")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn get_missing_device_is_404() {
    let app = build_test_app();

    let response = get(&app, "/api/v1/devices/does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn price_range_filter_scenario() {
    let app = build_test_app();
    let device = create_device(&app, "u1", "Camera", 20.0).await;

    let json = body_json(get(&app, "/api/v1/devices?min_price=15&max_price=25").await).await;
    let ids: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].clone())
        .collect();
    assert!(ids.contains(&device["id"]));

    let json = body_json(get(&app, "/api/v1/devices?min_price=30").await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn listing_pages_and_sorts() {
    let app = build_test_app();
    for i in 0..15 {
        create_device(&app, "u1", &format!("D{i:02}"), f64::from(i)).await;
    }

    let page1 = body_json(get(&app, "/api/v1/devices?sort=price_asc&page=1&limit=10").await).await;
    let page2 = body_json(get(&app, "/api/v1/devices?sort=price_asc&page=2&limit=10").await).await;
    let page1 = page1["data"].as_array().unwrap().clone();
    let page2 = page2["data"].as_array().unwrap().clone();

    assert_eq!(page1.len(), 10);
    assert_eq!(page2.len(), 5);
    let prices: Vec<f64> = page1
        .iter()
        .chain(page2.iter())
        .map(|d| d["price_per_day"].as_f64().unwrap())
        .collect();
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));

    let desc = body_json(get(&app, "/api/v1/devices?sort=price_desc&limit=100").await).await;
    let prices: Vec<f64> = desc["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["price_per_day"].as_f64().unwrap())
        .collect();
    assert_eq!(prices.len(), 15);
    assert!(prices.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn malformed_parameters_fall_back_to_defaults() {
    let app = build_test_app();
    for i in 0..12 {
        create_device(&app, "u1", &format!("D{i:02}"), f64::from(i)).await;
    }

    let response = get(
        &app,
        "/api/v1/devices?page=abc&limit=-3&min_price=cheap&available=maybe&sort=sideways",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn repeated_listing_is_served_from_cache() {
    let app = build_test_app();
    create_device(&app, "u1", "Camera", 20.0).await;

    let first = body_json(get(&app, "/api/v1/devices?category=camera").await).await;
    let second = body_json(get(&app, "/api/v1/devices?category=camera").await).await;

    assert_eq!(first, second);
    assert_eq!(app.store.query_calls(), 1);
}

#[tokio::test]
async fn listing_survives_cache_outage() {
    let app = build_test_app();
    create_device(&app, "u1", "Camera", 20.0).await;
    app.cache.fail(true);

    let response = get(&app, "/api/v1/devices").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn store_outage_is_a_server_error() {
    let app = build_test_app();
    app.store.fail_queries(true).await;

    let response = get(&app, "/api/v1/devices").await;

    assert!(response.status().is_server_error());
    let json = body_json(response).await;
    assert!(json["code"].is_string());
}

// ---------------------------------------------------------------------------
// Ownership-guarded writes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_ownership_scenario() {
    let app = build_test_app();
    let device = create_device(&app, "u1", "Camera", 20.0).await;
    let uri = format!("/api/v1/devices/{}", device["id"].as_str().unwrap());

    let response = delete_auth(&app, &uri, &app.token("u2")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND_OR_FORBIDDEN");
    assert_eq!(json["error"], "Not found or no permission");

    let response = delete_auth(&app, &uri, &app.token("u1")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn foreign_and_missing_devices_get_identical_responses() {
    let app = build_test_app();
    let device = create_device(&app, "u1", "Camera", 20.0).await;
    let token = app.token("u2");
    let update = json!({ "name": "Mine now", "price_per_day": 1.0, "available": true });

    let foreign = put_json_auth(
        &app,
        &format!("/api/v1/devices/{}", device["id"].as_str().unwrap()),
        update.clone(),
        &token,
    )
    .await;
    let missing = put_json_auth(&app, "/api/v1/devices/no-such-id", update, &token).await;

    assert_eq!(foreign.status(), missing.status());
    assert_eq!(body_json(foreign).await, body_json(missing).await);
}

#[tokio::test]
async fn owner_can_update_device() {
    let app = build_test_app();
    let device = create_device(&app, "u1", "Camera", 20.0).await;
    let uri = format!("/api/v1/devices/{}", device["id"].as_str().unwrap());
    let update = json!({
        "name": "Camera II",
        "description": "now with lens",
        "category": "camera",
        "price_per_day": 25.0,
        "available": false,
        "image_url": "https://storage.example.com/cam2.jpg",
    });

    let response = put_json_auth(&app, &uri, update, &app.token("u1")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Camera II");
    assert_eq!(json["data"]["price_per_day"], 25.0);
    assert_eq!(json["data"]["available"], false);
    assert_eq!(json["data"]["image_url"], "https://storage.example.com/cam2.jpg");
    assert_eq!(json["data"]["owner_id"], "u1");
    assert_eq!(json["data"]["city"], "Almaty");
}

#[tokio::test]
async fn availability_read_and_toggle() {
    let app = build_test_app();
    let device = create_device(&app, "u1", "Camera", 20.0).await;
    let uri = format!(
        "/api/v1/devices/{}/availability",
        device["id"].as_str().unwrap()
    );

    let json = body_json(get(&app, &uri).await).await;
    assert_eq!(json["data"]["available"], true);

    let denied = patch_json_auth(&app, &uri, json!({ "available": false }), &app.token("u2")).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let response = patch_json_auth(&app, &uri, json!({ "available": false }), &app.token("u1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["available"], false);

    let json = body_json(get(&app, &uri).await).await;
    assert_eq!(json["data"]["available"], false);

    let missing = get(&app, "/api/v1/devices/nope/availability").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

#[tokio::test]
async fn favorites_flow() {
    let app = build_test_app();
    let device = create_device(&app, "u1", "Camera", 20.0).await;
    let id = device["id"].as_str().unwrap();
    let uri = format!("/api/v1/devices/{id}/favorite");
    let token = app.token("u2");

    for _ in 0..2 {
        let response = post_json_auth(&app, &uri, json!({}), &token).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
    assert_eq!(app.store.favorite_count().await, 1);

    let json = body_json(get_auth(&app, "/api/v1/devices/favorite", &token).await).await;
    let favorites = json["data"].as_array().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["id"], id);

    let response = delete_auth(&app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(&app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn favoriting_missing_device_is_404() {
    let app = build_test_app();

    let response = post_json_auth(
        &app,
        "/api/v1/devices/ghost/favorite",
        json!({}),
        &app.token("u1"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn favorites_require_auth() {
    let app = build_test_app();

    let response = get(&app, "/api/v1/devices/favorite").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn trending_ranks_by_favorites() {
    let app = build_test_app();
    let quiet = create_device(&app, "u1", "quiet", 1.0).await;
    let popular = create_device(&app, "u1", "popular", 1.0).await;
    create_device(&app, "u1", "newest", 1.0).await;

    for user in ["u2", "u3"] {
        let uri = format!("/api/v1/devices/{}/favorite", popular["id"].as_str().unwrap());
        post_json_auth(&app, &uri, json!({}), &app.token(user)).await;
    }
    let uri = format!("/api/v1/devices/{}/favorite", quiet["id"].as_str().unwrap());
    post_json_auth(&app, &uri, json!({}), &app.token("u2")).await;

    let json = body_json(get(&app, "/api/v1/devices/trending?limit=2").await).await;
    let ranked = json["data"].as_array().unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0]["id"], popular["id"]);
    assert_eq!(ranked[1]["id"], quiet["id"]);
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lookups_list_distinct_values() {
    let app = build_test_app();
    create_device(&app, "u1", "a", 1.0).await;
    create_device(&app, "u2", "b", 2.0).await;

    let categories = body_json(get(&app, "/api/v1/categories").await).await;
    assert_eq!(categories["data"], json!(["camera"]));

    let cities = body_json(get(&app, "/api/v1/cities").await).await;
    assert_eq!(cities["data"], json!(["Almaty"]));

    let regions = body_json(get(&app, "/api/v1/regions").await).await;
    assert_eq!(regions["data"], json!(["South"]));
}
