//! Measurement recording, listing, the dashboard and deletion over HTTP.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use sqlx::PgPool;

use common::{
    body_json, build_test_app, compliant_values, create_location, delete_auth, get_auth,
    login_as, measurement_body, post_json_auth, put_json_auth,
};

fn with(field: &str, value: f64) -> Value {
    let mut values = compliant_values();
    values[field] = json!(value);
    values
}

// ---------------------------------------------------------------------------
// Create / update
// ---------------------------------------------------------------------------

/// The server classifies the readings and records the caller as author.
#[sqlx::test(migrations = "../../db/migrations")]
async fn create_computes_status(pool: PgPool) {
    let token = login_as(&pool, "Ana", "analyst").await;
    let app = build_test_app(pool);
    let (inst, sector) = create_location(&app, &token, "Hospital Alfa", "UTI Adulto").await;

    let body = measurement_body(inst, sector, "2025-03-09T10:00:00Z", compliant_values());
    let response = post_json_auth(app.clone(), "/api/measurements", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["status"], "compliant");

    let body = measurement_body(inst, sector, "2025-03-10T10:00:00Z", with("humidity", 65.0));
    let response = post_json_auth(app, "/api/measurements", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["status"], "non_compliant");
}

/// A client-supplied status is ignored.
#[sqlx::test(migrations = "../../db/migrations")]
async fn client_status_is_ignored(pool: PgPool) {
    let token = login_as(&pool, "Ana", "analyst").await;
    let app = build_test_app(pool);
    let (inst, sector) = create_location(&app, &token, "Hospital Alfa", "UTI Adulto").await;

    let mut body = measurement_body(inst, sector, "2025-03-09T10:00:00Z", with("pm25", 40.0));
    body["status"] = json!("compliant");
    let response = post_json_auth(app, "/api/measurements", body, &token).await;
    assert_eq!(body_json(response).await["status"], "non_compliant");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sector_must_belong_to_institution(pool: PgPool) {
    let token = login_as(&pool, "Ana", "analyst").await;
    let app = build_test_app(pool);
    let (alfa, _) = create_location(&app, &token, "Hospital Alfa", "UTI Adulto").await;
    let (_, beta_sector) = create_location(&app, &token, "Universidade Beta", "Biblioteca").await;

    let body = measurement_body(alfa, beta_sector, "2025-03-09T10:00:00Z", compliant_values());
    let response = post_json_auth(app.clone(), "/api/measurements", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let mut body = measurement_body(alfa, beta_sector, "2025-03-09T10:00:00Z", compliant_values());
    body.as_object_mut().unwrap().remove("pm10");
    let response = post_json_auth(app, "/api/measurements", body, &token).await;
    assert!(response.status().is_client_error());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_recomputes_status(pool: PgPool) {
    let token = login_as(&pool, "Ana", "analyst").await;
    let app = build_test_app(pool);
    let (inst, sector) = create_location(&app, &token, "Hospital Alfa", "UTI Adulto").await;

    let body = measurement_body(inst, sector, "2025-03-09T10:00:00Z", compliant_values());
    let response = post_json_auth(app.clone(), "/api/measurements", body, &token).await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    // 1200 - 400 exceeds the 700 ppm differential.
    let body = measurement_body(inst, sector, "2025-03-09T10:00:00Z", with("co2_internal", 1200.0));
    let response =
        put_json_auth(app.clone(), &format!("/api/measurements/{id}"), body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "non_compliant");

    let body = measurement_body(inst, sector, "2025-03-09T10:00:00Z", compliant_values());
    let response = put_json_auth(app, "/api/measurements/9999", body, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// The detail view names the failing checks and joins location/author.
#[sqlx::test(migrations = "../../db/migrations")]
async fn detail_includes_breakdown(pool: PgPool) {
    let token = login_as(&pool, "Ana", "analyst").await;
    let app = build_test_app(pool);
    let (inst, sector) = create_location(&app, &token, "Hospital Alfa", "UTI Adulto").await;

    let mut values = with("temperature", 27.0);
    values["air_speed"] = json!(0.4);
    let body = measurement_body(inst, sector, "2025-03-09T10:00:00Z", values);
    let response = post_json_auth(app.clone(), "/api/measurements", body, &token).await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = get_auth(app, &format!("/api/measurements/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["institution_name"], "Hospital Alfa");
    assert_eq!(json["sector_name"], "UTI Adulto");
    assert_eq!(json["user_name"], "Ana");
    assert_eq!(json["checks"].as_array().unwrap().len(), 10);
    assert_eq!(json["failed_parameters"], json!(["temperature", "air_speed"]));
    assert_eq!(json["files"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_paginates_newest_first(pool: PgPool) {
    let token = login_as(&pool, "Ana", "analyst").await;
    let app = build_test_app(pool);
    let (inst, sector) = create_location(&app, &token, "Hospital Alfa", "UTI Adulto").await;

    for day in 1..=3 {
        let date = format!("2025-03-0{day}T10:00:00Z");
        let body = measurement_body(inst, sector, &date, compliant_values());
        post_json_auth(app.clone(), "/api/measurements", body, &token).await;
    }

    let response = get_auth(app.clone(), "/api/measurements?page=1&page_size=2", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 3);
    assert_eq!(json["page"], 1);
    assert_eq!(json["page_size"], 2);
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items[0]["date"].as_str().unwrap().starts_with("2025-03-03"));
    assert!(items[1]["date"].as_str().unwrap().starts_with("2025-03-02"));

    let response = get_auth(app, "/api/measurements?page=2&page_size=2", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_location_and_date(pool: PgPool) {
    let token = login_as(&pool, "Ana", "analyst").await;
    let app = build_test_app(pool);
    let (alfa, uti) = create_location(&app, &token, "Hospital Alfa", "UTI Adulto").await;
    let (beta, biblioteca) = create_location(&app, &token, "Universidade Beta", "Biblioteca").await;

    for (inst, sector, date) in [
        (alfa, uti, "2025-03-01T08:00:00Z"),
        (alfa, uti, "2025-03-05T23:30:00Z"),
        (beta, biblioteca, "2025-03-05T12:00:00Z"),
    ] {
        let body = measurement_body(inst, sector, date, compliant_values());
        post_json_auth(app.clone(), "/api/measurements", body, &token).await;
    }

    let uri = format!("/api/measurements?institution_id={alfa}");
    let json = body_json(get_auth(app.clone(), &uri, &token).await).await;
    assert_eq!(json["total"], 2);

    // A date-only `to` covers the whole day.
    let uri = "/api/measurements?from=2025-03-02&to=2025-03-05";
    let json = body_json(get_auth(app.clone(), uri, &token).await).await;
    assert_eq!(json["total"], 2);

    let uri = format!("/api/measurements?sector_id={uti}&from=2025-03-02&to=2025-03-05");
    let json = body_json(get_auth(app.clone(), &uri, &token).await).await;
    assert_eq!(json["total"], 1);

    let response = get_auth(app.clone(), "/api/measurements?from=2025-03-06&to=2025-03-01", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(app, "/api/measurements?from=yesterday", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn thresholds_are_served(pool: PgPool) {
    let token = login_as(&pool, "Ana", "viewer").await;
    let app = build_test_app(pool);

    let json = body_json(get_auth(app, "/api/measurements/thresholds", &token).await).await;
    assert_eq!(json["co2_max"], 1000.0);
    assert_eq!(json["co2_differential_max"], 700.0);
    assert_eq!(json["temperature_min"], 20.0);
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn bi_aggregates_filtered_rows(pool: PgPool) {
    let token = login_as(&pool, "Ana", "analyst").await;
    let app = build_test_app(pool);
    let (inst, sector) = create_location(&app, &token, "Hospital Alfa", "UTI Adulto").await;

    for (date, values) in [
        ("2025-03-02T10:00:00Z", with("temperature", 22.0)),
        ("2025-03-01T10:00:00Z", with("temperature", 24.0)),
        ("2025-03-03T10:00:00Z", with("humidity", 70.0)),
    ] {
        let body = measurement_body(inst, sector, date, values);
        post_json_auth(app.clone(), "/api/measurements", body, &token).await;
    }

    let response = get_auth(app.clone(), "/api/measurements/bi", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["kpis"]["compliant_count"], 2);
    assert_eq!(json["kpis"]["non_compliant_count"], 1);
    assert_eq!(json["kpis"]["temperature_avg"], 23.0);

    let series = json["series"].as_array().unwrap();
    let dates: Vec<&str> = series.iter().map(|p| p["date"].as_str().unwrap()).collect();
    assert_eq!(dates, ["2025-03-01", "2025-03-02", "2025-03-03"]);

    let response = get_auth(app, "/api/measurements/bi?from=2026-01-01", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["kpis"]["temperature_avg"], 0.0);
    assert_eq!(json["series"], json!([]));
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_measurement(pool: PgPool) {
    let token = login_as(&pool, "Ana", "analyst").await;
    let app = build_test_app(pool);
    let (inst, sector) = create_location(&app, &token, "Hospital Alfa", "UTI Adulto").await;

    let body = measurement_body(inst, sector, "2025-03-09T10:00:00Z", compliant_values());
    let response = post_json_auth(app.clone(), "/api/measurements", body, &token).await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let uri = format!("/api/measurements/{id}");
    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
