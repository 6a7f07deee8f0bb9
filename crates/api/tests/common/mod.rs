#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use airwatch_api::auth::jwt::{generate_access_token, JwtConfig};
use airwatch_api::auth::password::hash_password;
use airwatch_api::config::ServerConfig;
use airwatch_api::router::build_app_router;
use airwatch_api::state::AppState;
use airwatch_db::models::user::{CreateUser, User};
use airwatch_db::repositories::UserRepo;

pub const TEST_PASSWORD: &str = "secret123";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        expiry_hours: 12,
    }
}

/// Test config with safe defaults; uploads go to `upload_dir`.
pub fn test_config(upload_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir,
        jwt: test_jwt_config(),
    }
}

/// The production router over `pool`, with uploads in a shared temp dir.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_uploads(pool, std::env::temp_dir().join("airwatch-test-uploads"))
}

pub fn build_test_app_with_uploads(pool: PgPool, upload_dir: PathBuf) -> Router {
    let config = test_config(upload_dir);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] and the given role.
pub async fn create_user(pool: &PgPool, name: &str, role: &str) -> User {
    let input = CreateUser {
        name: name.to_string(),
        email: format!("{}@test.com", name.to_lowercase()),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// A valid Bearer token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.name, &user.role, &test_jwt_config())
        .expect("token generation should succeed")
}

/// Create a user with `role` and return its token.
pub async fn login_as(pool: &PgPool, name: &str, role: &str) -> String {
    let user = create_user(pool, name, role).await;
    token_for(&user)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    json: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match json {
        Some(value) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(json)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    json: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(json)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    json: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(json)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// POST a `multipart/form-data` body built from `(field, file name, mime,
/// bytes)` parts.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    parts: &[(&str, &str, &str, &[u8])],
    token: &str,
) -> Response<Body> {
    const BOUNDARY: &str = "airwatch-test-boundary";
    let mut body = Vec::new();
    for (field, file_name, mime, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {mime}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

// ---------------------------------------------------------------------------
// Domain payloads
// ---------------------------------------------------------------------------

/// Readings inside every limit.
pub fn compliant_values() -> serde_json::Value {
    serde_json::json!({
        "humidity": 50.0,
        "air_speed": 0.2,
        "temperature": 23.0,
        "fungi_internal": 500.0,
        "fungi_external": 600.0,
        "ie_ratio": 1.0,
        "aerodispersoids": 60.0,
        "bacteria_internal": 300.0,
        "bacteria_external": 400.0,
        "co2_internal": 800.0,
        "co2_external": 400.0,
        "pm10": 40.0,
        "pm25": 20.0
    })
}

/// A measurement body for `date` with `values` merged in.
pub fn measurement_body(
    institution_id: i64,
    sector_id: i64,
    date: &str,
    values: serde_json::Value,
) -> serde_json::Value {
    let mut body = values;
    let obj = body.as_object_mut().expect("values must be an object");
    obj.insert("date".into(), date.into());
    obj.insert("institution_id".into(), institution_id.into());
    obj.insert("sector_id".into(), sector_id.into());
    body
}

/// Create an institution and one of its sectors via the API; returns
/// `(institution_id, sector_id)`.
pub async fn create_location(app: &Router, token: &str, institution: &str, sector: &str) -> (i64, i64) {
    let resp = post_json_auth(
        app.clone(),
        "/api/institutions",
        serde_json::json!({ "name": institution }),
        token,
    )
    .await;
    let institution_id = body_json(resp).await["id"].as_i64().unwrap();

    let resp = post_json_auth(
        app.clone(),
        "/api/sectors",
        serde_json::json!({ "name": sector, "institution_id": institution_id }),
        token,
    )
    .await;
    let sector_id = body_json(resp).await["id"].as_i64().unwrap();

    (institution_id, sector_id)
}
