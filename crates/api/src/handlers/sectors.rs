//! Handlers for the `/sectors` resource.

use airwatch_core::types::DbId;
use airwatch_db::models::sector::{CreateSector, Sector, UpdateSector};
use airwatch_db::repositories::{InstitutionRepo, SectorRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::handlers::institutions::require_name;
use crate::middleware::rbac::RequireAuth;
use crate::query::SectorListParams;
use crate::response::ListResponse;
use crate::state::AppState;

async fn ensure_institution_exists(state: &AppState, id: DbId) -> AppResult<()> {
    InstitutionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Institution", id))?;
    Ok(())
}

/// GET /api/sectors?institution_id=
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<SectorListParams>,
) -> AppResult<Json<ListResponse<Sector>>> {
    let sectors = SectorRepo::list(&state.pool, params.institution_id).await?;
    Ok(Json(sectors.into()))
}

/// GET /api/sectors/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Sector>> {
    let sector = SectorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Sector", id))?;
    Ok(Json(sector))
}

/// POST /api/sectors
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<CreateSector>,
) -> AppResult<(StatusCode, Json<Sector>)> {
    ensure_institution_exists(&state, input.institution_id).await?;
    let input = CreateSector {
        name: require_name(&input.name)?,
        institution_id: input.institution_id,
    };
    let sector = SectorRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(sector)))
}

/// PUT /api/sectors/{id}
///
/// A new `institution_id` carries the sector's measurements along.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSector>,
) -> AppResult<Json<Sector>> {
    if let Some(institution_id) = input.institution_id {
        ensure_institution_exists(&state, institution_id).await?;
    }
    let input = UpdateSector {
        name: input.name.as_deref().map(require_name).transpose()?,
        institution_id: input.institution_id,
    };
    let sector = SectorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Sector", id))?;
    Ok(Json(sector))
}

/// DELETE /api/sectors/{id}
///
/// 409 while measurements still reference the sector.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if SectorRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Sector", id))
    }
}
