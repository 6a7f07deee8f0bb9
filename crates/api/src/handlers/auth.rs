//! Handlers for the `/auth` resource (register, login).

use airwatch_core::error::CoreError;
use airwatch_core::roles::{validate_role, DEFAULT_ROLE};
use airwatch_db::models::user::{CreateUser, UserResponse};
use airwatch_db::repositories::UserRepo;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Same message for unknown email and wrong password.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Only `viewer` (the default) is accepted.
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Self-registration always yields a `viewer`; other roles are assigned by an
/// admin through `/users`.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    if let Some(role) = input.role.as_deref() {
        validate_role(role)?;
        if role != DEFAULT_ROLE {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only an admin can assign this role".into(),
            )));
        }
    }

    let user = create_account(&state, &input.name, &input.email, &input.password, input.role)
        .await?;

    tracing::info!(user_id = user.id, role = %user.role, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(user_id = user.id, "Failed login attempt");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    let token = generate_access_token(user.id, &user.name, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse {
        token,
        expires_in: state.config.jwt.expires_in(),
        user: user.into(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Name and email of an account, trimmed. Absent fields (partial updates)
/// are not checked.
#[derive(Debug, Default, Validate)]
pub(crate) struct AccountFields {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

impl AccountFields {
    pub(crate) fn new(name: Option<&str>, email: Option<&str>) -> Result<Self, CoreError> {
        let fields = Self {
            name: name.map(|n| n.trim().to_string()),
            email: email.map(|e| e.trim().to_string()),
        };
        fields.validate()?;
        Ok(fields)
    }
}

/// Validate, hash and insert a new account. Shared with admin user creation.
///
/// An already-registered email is a 409.
pub(crate) async fn create_account(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
    role: Option<String>,
) -> AppResult<UserResponse> {
    let fields = AccountFields::new(Some(name), Some(email))?;
    let name = fields.name.unwrap_or_default();
    let email = fields.email.unwrap_or_default();

    validate_password_strength(password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = role.unwrap_or_else(|| DEFAULT_ROLE.to_string());
    validate_role(&role)?;

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email already registered".into(),
        )));
    }

    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name,
            email,
            password_hash,
            role,
        },
    )
    .await?;

    Ok(user.into())
}
