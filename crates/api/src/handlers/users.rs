//! Handlers for the `/users` resource.
//!
//! Listing is open to any authenticated user; changes require `admin`.

use airwatch_core::error::CoreError;
use airwatch_core::roles::validate_role;
use airwatch_core::types::DbId;
use airwatch_db::models::user::{UpdateUser, UserResponse};
use airwatch_db::repositories::UserRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::{create_account, AccountFields};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::ListResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

/// A non-empty `password` replaces the current one.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<ListResponse<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    let items: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(items.into()))
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user =
        create_account(&state, &input.name, &input.email, &input.password, input.role).await?;
    tracing::info!(user_id = user.id, admin_id = admin.user_id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    if let Some(role) = &input.role {
        validate_role(role)?;
    }
    let fields = AccountFields::new(input.name.as_deref(), input.email.as_deref())?;

    let password_hash = match input.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => {
            validate_password_strength(password, MIN_PASSWORD_LENGTH)
                .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
            Some(hash_password(password).map_err(|e| {
                AppError::InternalError(format!("Password hashing error: {e}"))
            })?)
        }
        None => None,
    };
    let password_reset = password_hash.is_some();

    let update = UpdateUser {
        name: fields.name,
        email: fields.email,
        role: input.role,
        password_hash,
    };
    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::not_found("User", id))?;

    tracing::info!(
        user_id = id,
        admin_id = admin.user_id,
        password_reset,
        "User updated"
    );
    Ok(Json(user.into()))
}

/// DELETE /api/users/{id}
///
/// A user who recorded measurements cannot be deleted (409).
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("User", id));
    }
    tracing::info!(user_id = id, admin_id = admin.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
