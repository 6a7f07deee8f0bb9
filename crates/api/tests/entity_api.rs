//! Institutions and sectors over HTTP.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{
    body_json, build_test_app, compliant_values, create_location, delete_auth, get_auth,
    login_as, measurement_body, post_json_auth, put_json_auth,
};

#[sqlx::test(migrations = "../../db/migrations")]
async fn institution_crud(pool: PgPool) {
    let token = login_as(&pool, "Ana", "analyst").await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/institutions",
        json!({ "name": "  Hospital Alfa " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["name"], "Hospital Alfa");
    let id = created["id"].as_i64().unwrap();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/institutions/{id}"),
        json!({ "name": "Hospital Alfa II" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app.clone(), &format!("/api/institutions/{id}"), &token).await;
    assert_eq!(body_json(response).await["name"], "Hospital Alfa II");

    let response = get_auth(app.clone(), "/api/institutions", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["items"].as_array().unwrap().len(), 1);

    let response = delete_auth(app.clone(), &format!("/api/institutions/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &format!("/api/institutions/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].as_str().unwrap().contains("Institution"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_and_duplicate_institution_names_are_rejected(pool: PgPool) {
    let token = login_as(&pool, "Ana", "analyst").await;
    let app = build_test_app(pool);

    let response =
        post_json_auth(app.clone(), "/api/institutions", json!({ "name": "  " }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "name": "Universidade Beta" });
    let first = post_json_auth(app.clone(), "/api/institutions", body.clone(), &token).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = post_json_auth(app, "/api/institutions", body, &token).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sectors_filter_by_institution(pool: PgPool) {
    let token = login_as(&pool, "Ana", "analyst").await;
    let app = build_test_app(pool);

    let (alfa, _) = create_location(&app, &token, "Hospital Alfa", "UTI Adulto").await;
    let (beta, _) = create_location(&app, &token, "Universidade Beta", "Biblioteca").await;
    let response = post_json_auth(
        app.clone(),
        "/api/sectors",
        json!({ "name": "Laboratório", "institution_id": alfa }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(
        app.clone(),
        &format!("/api/sectors?institution_id={alfa}"),
        &token,
    )
    .await;
    let items = body_json(response).await["items"].as_array().unwrap().clone();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|s| s["institution_id"] == alfa));

    let response = get_auth(app.clone(), "/api/sectors", &token).await;
    assert_eq!(body_json(response).await["items"].as_array().unwrap().len(), 3);

    let response = get_auth(app, &format!("/api/sectors?institution_id={beta}"), &token).await;
    assert_eq!(body_json(response).await["items"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sector_for_unknown_institution_is_404(pool: PgPool) {
    let token = login_as(&pool, "Ana", "analyst").await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/sectors",
        json!({ "name": "Recepção", "institution_id": 9999 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Institutions and sectors still referenced by measurements cannot be
/// removed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn referenced_location_delete_is_conflict(pool: PgPool) {
    let token = login_as(&pool, "Ana", "analyst").await;
    let app = build_test_app(pool);

    let (institution_id, sector_id) =
        create_location(&app, &token, "Hospital Alfa", "UTI Adulto").await;
    let body = measurement_body(
        institution_id,
        sector_id,
        "2025-03-09T10:00:00Z",
        compliant_values(),
    );
    let response = post_json_auth(app.clone(), "/api/measurements", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = delete_auth(app.clone(), &format!("/api/sectors/{sector_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response =
        delete_auth(app, &format!("/api/institutions/{institution_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Moving a sector to another institution moves its measurements with it.
#[sqlx::test(migrations = "../../db/migrations")]
async fn moving_sector_carries_its_measurements(pool: PgPool) {
    let token = login_as(&pool, "Ana", "analyst").await;
    let app = build_test_app(pool);

    let (alfa, sector_id) = create_location(&app, &token, "Hospital Alfa", "UTI Adulto").await;
    let (beta, _) = create_location(&app, &token, "Universidade Beta", "Biblioteca").await;

    let body = measurement_body(alfa, sector_id, "2025-03-09T10:00:00Z", compliant_values());
    let response = post_json_auth(app.clone(), "/api/measurements", body, &token).await;
    let measurement_id = body_json(response).await["id"].as_i64().unwrap();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/sectors/{sector_id}"),
        json!({ "institution_id": beta }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["institution_id"], beta);

    let uri = format!("/api/measurements/{measurement_id}");
    let json = body_json(get_auth(app.clone(), &uri, &token).await).await;
    assert_eq!(json["institution_id"], beta);
    assert_eq!(json["institution_name"], "Universidade Beta");

    // Re-saving the row against its sector's new institution still validates.
    let body = measurement_body(beta, sector_id, "2025-03-09T10:00:00Z", compliant_values());
    let response = put_json_auth(app.clone(), &uri, body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let uri = format!("/api/measurements?institution_id={alfa}");
    assert_eq!(body_json(get_auth(app.clone(), &uri, &token).await).await["total"], 0);
    let uri = format!("/api/measurements?institution_id={beta}");
    assert_eq!(body_json(get_auth(app, &uri, &token).await).await["total"], 1);
}
