#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use devicehub_api::auth::jwt::JwtConfig;
use devicehub_api::config::ServerConfig;
use devicehub_api::router::build_app_router;
use devicehub_api::state::AppState;
use devicehub_cache::CacheConfig;
use devicehub_catalog::testing::{MemoryStore, MockCache};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        },
        cache: CacheConfig::default(),
    }
}

/// The router plus handles on its in-memory collaborators.
pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub cache: MockCache,
    pub config: ServerConfig,
}

impl TestApp {
    /// A bearer token whose subject is `user_id`, shaped like the ones the
    /// identity provider issues: only `sub` and `exp`.
    pub fn token(&self, user_id: &str) -> String {
        let exp = chrono::Utc::now().timestamp() + 600;
        self.sign(serde_json::json!({ "sub": user_id, "exp": exp }))
    }

    /// Sign arbitrary claims with the configured secret.
    pub fn sign(&self, claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt.secret.as_bytes()),
        )
        .expect("token encoding should succeed")
    }
}

/// Build the full application router, with the production middleware stack,
/// over an in-memory store and cache.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = MemoryStore::new();
    let cache = MockCache::new();

    let state = AppState::new(config.clone(), Arc::new(store.clone()), Arc::new(cache.clone()));
    let router = build_app_router(state, &config);

    TestApp {
        router,
        store,
        cache,
        config,
    }
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send a request, optionally authenticated and with a JSON body.
pub async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: &TestApp,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: &TestApp,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: &TestApp,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Create a device through the API as `user_id` and return its JSON.
pub async fn create_device(
    app: &TestApp,
    user_id: &str,
    name: &str,
    price: f64,
) -> serde_json::Value {
    let body = serde_json::json!({
        "name": name,
        "description": "test device",
        "category": "camera",
        "price_per_day": price,
        "city": "Almaty",
        "region": "South",
    });
    let response = post_json_auth(app, "/api/v1/devices", body, &app.token(user_id)).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
