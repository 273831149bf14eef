#![allow(dead_code)]

use std::sync::Arc;

use antrean_api::auth::jwt::{generate_access_token, JwtConfig};
use antrean_api::config::ServerConfig;
use antrean_api::router::build_app_router;
use antrean_api::state::AppState;
use antrean_core::intake::FieldType;
use antrean_db::models::form_field::CreateFormField;
use antrean_db::models::room::{CreateRoom, RoomWithFields};
use antrean_db::models::user::{AccountProfile, Company, CreateAccount, User};
use antrean_db::repositories::{CompanyRepo, RoomRepo, UserRepo};
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        app_url: "http://localhost:3000".to_string(),
        cookie_secure: false,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router, with the production middleware stack,
/// over the given database pool. No mailer is configured, so verification
/// links are only logged.
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
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body, None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_request(app, Method::POST, uri, body, Some(token)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_request(app, Method::PUT, uri, body, Some(token)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_request(app, Method::PATCH, uri, body, Some(token)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Mint an access token the way login does.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt).unwrap()
}

fn account(email: &str, profile: AccountProfile) -> CreateAccount {
    CreateAccount {
        email: email.to_string(),
        password_hash: "unused".to_string(),
        profile,
        verification_token: format!("verify-{email}"),
        verification_expires_at: Utc::now() + Duration::hours(1),
    }
}

/// Insert a `user`-role account and return it with an access token.
pub async fn create_user(pool: &PgPool, email: &str) -> (User, String) {
    let profile = AccountProfile::User {
        full_name: "Queue Joiner".to_string(),
        phone: None,
    };
    let user = UserRepo::register(pool, &account(email, profile)).await.unwrap();
    let token = token_for(&user);
    (user, token)
}

/// Insert a `company`-role account with its company row.
pub async fn create_company(pool: &PgPool, email: &str) -> (Company, String) {
    let profile = AccountProfile::Company {
        company_name: format!("Company of {email}"),
        industry: None,
        website: None,
        address: None,
    };
    let user = UserRepo::register(pool, &account(email, profile)).await.unwrap();
    let company = CompanyRepo::find_by_user_id(pool, user.id)
        .await
        .unwrap()
        .unwrap();
    let token = token_for(&user);
    (company, token)
}

/// Insert a room with a required "Name" text field and an optional "Notes"
/// text field.
pub async fn create_room(pool: &PgPool, company_id: i64, secret_key: &str) -> RoomWithFields {
    let input = CreateRoom {
        name: "Front desk".to_string(),
        description: Some("Walk-in queue".to_string()),
        fields: vec![
            CreateFormField {
                label: "Name".to_string(),
                field_type: FieldType::Text,
                required: true,
            },
            CreateFormField {
                label: "Notes".to_string(),
                field_type: FieldType::Text,
                required: false,
            },
        ],
    };
    RoomRepo::create_with_fields(pool, company_id, secret_key, &input)
        .await
        .unwrap()
}

/// Join `secret_key` answering the "Name" field, returning the response body.
pub async fn join_as(
    app: Router,
    token: &str,
    secret_key: &str,
    name_field_id: i64,
) -> Response<Body> {
    let body = serde_json::json!({
        "secret_key": secret_key,
        "answers": [{ "field_id": name_field_id, "value": "Bob" }],
    });
    post_json_auth(app, "/api/v1/rooms/join", body, token).await
}
