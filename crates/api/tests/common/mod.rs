//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the full production router (same middleware stack as `main.rs`)
//! and drives it with `tower::ServiceExt::oneshot`. Fixtures create users
//! through the repository layer and mint real JWTs for them.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use corkboard_api::auth::jwt::{generate_access_token, JwtConfig};
use corkboard_api::auth::password::hash_password;
use corkboard_api::config::ServerConfig;
use corkboard_api::router::build_app_router;
use corkboard_api::state::AppState;
use corkboard_core::roles::ROLE_ADMIN;
use corkboard_core::types::DbId;
use corkboard_db::models::user::CreateUser;
use corkboard_db::repositories::UserRepo;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: test_jwt_config(),
    }
}

/// JWT config shared between the router and the token-minting fixture.
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-long-enough-for-hmac".to_string(),
        token_expiry_days: 7,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses. No mailer is configured.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: None,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A test account with a valid bearer token.
pub struct TestUser {
    pub id: DbId,
    pub token: String,
}

/// Create a regular user and mint a token for them.
pub async fn create_user(pool: &PgPool, name: &str) -> TestUser {
    create_user_with_role(pool, name, "user").await
}

/// Create an admin user and mint a token for them.
pub async fn create_admin(pool: &PgPool, name: &str) -> TestUser {
    create_user_with_role(pool, name, ROLE_ADMIN).await
}

async fn create_user_with_role(pool: &PgPool, name: &str, role: &str) -> TestUser {
    let input = CreateUser {
        email: format!("{name}@example.com"),
        display_name: name.to_string(),
        password_hash: hash_password("hunter2-hunter2").unwrap(),
    };
    let user = UserRepo::create(pool, &input).await.unwrap();
    let user = if role == ROLE_ADMIN {
        UserRepo::update_role(pool, user.id, ROLE_ADMIN)
            .await
            .unwrap()
            .unwrap()
    } else {
        user
    };

    let token = generate_access_token(user.id, &user.role, &test_jwt_config()).unwrap();
    TestUser {
        id: user.id,
        token,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: &Router,
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
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    json: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, token, Some(json)).await
}

pub async fn put_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    json: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, token, Some(json)).await
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::DELETE, uri, token, None).await
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
