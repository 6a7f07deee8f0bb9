//! Handlers for the `/measurements` resource.
//!
//! Every write recomputes the compliance status from the submitted values;
//! clients never send `status`.

use std::collections::HashMap;

use airwatch_core::compliance::{
    check_parameters, compute_status, failed_parameters, ParameterCheck, ThresholdTable, LIMITS,
};
use airwatch_core::error::CoreError;
use airwatch_core::pagination::Page;
use airwatch_core::types::DbId;
use airwatch_core::uploads::stored_name_from_public_path;
use airwatch_db::models::measurement::{
    Measurement, MeasurementDetail, MeasurementInput, MeasurementWithFiles,
};
use airwatch_db::models::measurement_file::MeasurementFile;
use airwatch_db::repositories::{MeasurementFileRepo, MeasurementRepo, SectorRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::MeasurementQuery;
use crate::response::PaginatedResponse;
use crate::state::AppState;

/// Measurement detail with attachments and the per-parameter breakdown.
#[derive(Debug, Serialize)]
pub struct MeasurementView {
    #[serde(flatten)]
    pub detail: MeasurementDetail,
    pub files: Vec<MeasurementFile>,
    pub checks: Vec<ParameterCheck>,
    pub failed_parameters: Vec<&'static str>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/measurements
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<MeasurementQuery>,
) -> AppResult<Json<PaginatedResponse<MeasurementWithFiles>>> {
    let filter = params.filter()?;
    let page = Page::from_params(params.page, params.page_size);

    let rows =
        MeasurementRepo::list_page(&state.pool, &filter, page.page_size, page.offset()).await?;
    let total = MeasurementRepo::count(&state.pool, &filter).await?;
    let items = attach_files(&state, rows).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: page.page,
        page_size: page.page_size,
    }))
}

/// GET /api/measurements/thresholds
pub async fn thresholds(_user: AuthUser) -> Json<ThresholdTable> {
    Json(LIMITS)
}

/// GET /api/measurements/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MeasurementView>> {
    let detail = MeasurementRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Measurement", id))?;
    let files = MeasurementFileRepo::list_by_measurement(&state.pool, id).await?;

    let values = detail.measurement.values();
    Ok(Json(MeasurementView {
        checks: check_parameters(&values),
        failed_parameters: failed_parameters(&values),
        detail,
        files,
    }))
}

/// POST /api/measurements
///
/// The authenticated user is recorded as the measurement's author.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<MeasurementInput>,
) -> AppResult<(StatusCode, Json<Measurement>)> {
    validate_location(&state, &input).await?;

    let status = compute_status(&input.values);
    let measurement = MeasurementRepo::create(&state.pool, user.user_id, &input, status).await?;

    tracing::info!(
        measurement_id = measurement.id,
        user_id = user.user_id,
        status = status.as_str(),
        "Measurement recorded"
    );
    Ok((StatusCode::CREATED, Json(measurement)))
}

/// PUT /api/measurements/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<MeasurementInput>,
) -> AppResult<Json<Measurement>> {
    validate_location(&state, &input).await?;

    let status = compute_status(&input.values);
    let measurement = MeasurementRepo::update(&state.pool, id, &input, status)
        .await?
        .ok_or(AppError::not_found("Measurement", id))?;

    tracing::info!(
        measurement_id = id,
        user_id = user.user_id,
        status = status.as_str(),
        "Measurement updated"
    );
    Ok(Json(measurement))
}

/// DELETE /api/measurements/{id}
///
/// File rows go in the same transaction as the measurement; the stored files
/// are removed afterwards and a failure there is only logged.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let paths = MeasurementRepo::delete_with_files(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Measurement", id))?;

    for path in &paths {
        let Some(stored) = stored_name_from_public_path(path) else {
            tracing::warn!(%path, "Skipping file outside the uploads prefix");
            continue;
        };
        if let Err(e) = tokio::fs::remove_file(state.config.upload_dir.join(stored)).await {
            tracing::warn!(%path, error = %e, "Failed to remove stored file");
        }
    }

    tracing::info!(
        measurement_id = id,
        user_id = user.user_id,
        files = paths.len(),
        "Measurement deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The sector must exist and belong to the given institution.
async fn validate_location(state: &AppState, input: &MeasurementInput) -> AppResult<()> {
    let sector = SectorRepo::find_by_id(&state.pool, input.sector_id)
        .await?
        .ok_or_else(|| {
            CoreError::Validation(format!("Sector {} does not exist", input.sector_id))
        })?;
    if sector.institution_id != input.institution_id {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Sector {} does not belong to institution {}",
            sector.id, input.institution_id
        ))));
    }
    Ok(())
}

/// Embed each measurement's attachments, fetched in one query.
async fn attach_files(
    state: &AppState,
    rows: Vec<MeasurementDetail>,
) -> AppResult<Vec<MeasurementWithFiles>> {
    let ids: Vec<DbId> = rows.iter().map(|r| r.measurement.id).collect();
    let mut by_measurement: HashMap<DbId, Vec<MeasurementFile>> = HashMap::new();
    for file in MeasurementFileRepo::list_by_measurements(&state.pool, &ids).await? {
        by_measurement.entry(file.measurement_id).or_default().push(file);
    }

    Ok(rows
        .into_iter()
        .map(|detail| MeasurementWithFiles {
            files: by_measurement
                .remove(&detail.measurement.id)
                .unwrap_or_default(),
            detail,
        })
        .collect())
}
