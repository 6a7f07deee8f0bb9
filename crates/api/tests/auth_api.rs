//! Registration, login and role enforcement over HTTP.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{
    body_json, build_test_app, create_user, delete_auth, get, get_auth, login_as, post_json,
    post_json_auth, put_json_auth, TEST_PASSWORD,
};

// ---------------------------------------------------------------------------
// Register / login
// ---------------------------------------------------------------------------

/// Registration defaults the role to viewer and never echoes the hash.
#[sqlx::test(migrations = "../../db/migrations")]
async fn register_creates_viewer(pool: PgPool) {
    let app = build_test_app(pool);
    let body = json!({ "name": "Ana", "email": "ana@example.com", "password": "secret123" });

    let response = post_json(app, "/api/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["email"], "ana@example.com");
    assert_eq!(json["role"], "viewer");
    assert!(json.get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_duplicate_email_is_conflict(pool: PgPool) {
    let app = build_test_app(pool);
    let body = json!({ "name": "Ana", "email": "ana@example.com", "password": "secret123" });

    let first = post_json(app.clone(), "/api/auth/register", body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(app, "/api/auth/register", body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_short_password_and_bad_role(pool: PgPool) {
    let app = build_test_app(pool);

    let short = json!({ "name": "Ana", "email": "ana@example.com", "password": "abc" });
    let response = post_json(app.clone(), "/api/auth/register", short).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let bad_role = json!({
        "name": "Ana",
        "email": "ana@example.com",
        "password": "secret123",
        "role": "superuser"
    });
    let response = post_json(app, "/api/auth/register", bad_role).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Self-registration cannot grant elevated roles.
#[sqlx::test(migrations = "../../db/migrations")]
async fn register_cannot_choose_admin(pool: PgPool) {
    let app = build_test_app(pool);
    let body = json!({
        "name": "Eve",
        "email": "eve@example.com",
        "password": "secret123",
        "role": "admin"
    });

    let response = post_json(app.clone(), "/api/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Nothing was created.
    let response = post_json(
        app,
        "/api/auth/login",
        json!({ "email": "eve@example.com", "password": "secret123" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A successful login returns a token usable on protected routes.
#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_working_token(pool: PgPool) {
    let user = create_user(&pool, "Bruno", "analyst").await;
    let app = build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/auth/login",
        json!({ "email": user.email, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["user"]["name"], "Bruno");
    assert_eq!(json["user"]["role"], "analyst");
    assert_eq!(json["expires_in"], 12 * 3600);

    let token = json["token"].as_str().unwrap();
    let response = get_auth(app, "/api/institutions", token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_bad_credentials_is_401(pool: PgPool) {
    let user = create_user(&pool, "Carla", "viewer").await;
    let app = build_test_app(pool);

    let wrong_password = post_json(
        app.clone(),
        "/api/auth/login",
        json!({ "email": user.email, "password": "wrong-password" }),
    )
    .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(wrong_password).await;

    let unknown = post_json(
        app,
        "/api/auth/login",
        json!({ "email": "nobody@test.com", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);

    // Same message either way.
    assert_eq!(wrong_password["error"], body_json(unknown).await["error"]);
}

// ---------------------------------------------------------------------------
// Authentication and roles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_route_without_token_is_401(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app.clone(), "/api/measurements").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert!(json["error"].is_string());

    let response = get_auth(app, "/api/measurements", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_management_requires_admin(pool: PgPool) {
    let viewer = login_as(&pool, "Viewer", "viewer").await;
    let app = build_test_app(pool);

    // Listing is open to any authenticated user.
    let response = get_auth(app.clone(), "/api/users", &viewer).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json!({ "name": "X", "email": "x@test.com", "password": "secret123" });
    let response = post_json_auth(app, "/api/users", body, &viewer).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}

/// Admin creates, edits and removes an account.
#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_manages_users(pool: PgPool) {
    let admin = login_as(&pool, "Admin", "admin").await;
    let app = build_test_app(pool);

    let body = json!({
        "name": "Diego",
        "email": "diego@test.com",
        "password": "secret123",
        "role": "analyst"
    });
    let response = post_json_auth(app.clone(), "/api/users", body, &admin).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/users/{id}"),
        json!({ "role": "viewer", "password": "newpass123" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["role"], "viewer");
    assert_eq!(json["name"], "Diego");

    // The new password works.
    let response = post_json(
        app.clone(),
        "/api/auth/login",
        json!({ "email": "diego@test.com", "password": "newpass123" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete_auth(app.clone(), &format!("/api/users/{id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, "/api/users", &admin).await;
    let items = body_json(response).await["items"].as_array().unwrap().clone();
    assert!(items.iter().all(|u| u["id"] != id));
}

/// Updates go through the same name and email rules as account creation.
#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_update_validates_fields(pool: PgPool) {
    let admin = login_as(&pool, "Admin", "admin").await;
    let target = create_user(&pool, "Fabio", "viewer").await;
    let app = build_test_app(pool);
    let uri = format!("/api/users/{}", target.id);

    for body in [
        json!({ "email": "not-an-email" }),
        json!({ "email": "" }),
        json!({ "name": "   " }),
        json!({ "password": "abc" }),
    ] {
        let response = put_json_auth(app.clone(), &uri, body, &admin).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    // The rejected updates left the account usable.
    let response = post_json(
        app.clone(),
        "/api/auth/login",
        json!({ "email": target.email, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json_auth(
        app,
        &uri,
        json!({ "email": "  fabio.novo@test.com " }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["email"], "fabio.novo@test.com");
}
