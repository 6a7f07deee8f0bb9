//! Handlers for the `/institutions` resource.

use airwatch_core::error::CoreError;
use airwatch_core::types::DbId;
use airwatch_db::models::institution::{CreateInstitution, Institution, UpdateInstitution};
use airwatch_db::repositories::InstitutionRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::ListResponse;
use crate::state::AppState;

/// Trimmed, non-empty display name.
pub(crate) fn require_name(name: &str) -> Result<String, CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Name must not be empty".into()));
    }
    Ok(name.to_string())
}

/// GET /api/institutions
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<ListResponse<Institution>>> {
    let institutions = InstitutionRepo::list(&state.pool).await?;
    Ok(Json(institutions.into()))
}

/// GET /api/institutions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Institution>> {
    let institution = InstitutionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Institution", id))?;
    Ok(Json(institution))
}

/// POST /api/institutions
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<CreateInstitution>,
) -> AppResult<(StatusCode, Json<Institution>)> {
    let input = CreateInstitution {
        name: require_name(&input.name)?,
    };
    let institution = InstitutionRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(institution)))
}

/// PUT /api/institutions/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInstitution>,
) -> AppResult<Json<Institution>> {
    let input = UpdateInstitution {
        name: input.name.as_deref().map(require_name).transpose()?,
    };
    let institution = InstitutionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Institution", id))?;
    Ok(Json(institution))
}

/// DELETE /api/institutions/{id}
///
/// 409 while sectors or measurements still reference the institution.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if InstitutionRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Institution", id))
    }
}
