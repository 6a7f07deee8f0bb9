//! Handlers for the `/contact` resource.

use airwatch_core::contact::{ContactSubmission, SUPPORT_MAILBOX};
use airwatch_db::models::contact_message::{ContactMessage, CreateContactMessage};
use airwatch_db::repositories::ContactMessageRepo;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::ListResponse;
use crate::state::AppState;

/// POST /api/contact (public)
///
/// `email`-type messages are also relayed to the support mailbox; without a
/// mail transport the relay is recorded in the log.
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<ContactSubmission>,
) -> AppResult<(StatusCode, Json<ContactMessage>)> {
    let input = input.checked()?;
    let forwards = input.forwards_to_support();

    let message = ContactMessageRepo::create(
        &state.pool,
        &CreateContactMessage {
            name: input.name,
            email: input.email,
            message: input.message,
            message_type: input.kind,
        },
    )
    .await?;

    if forwards {
        tracing::info!(
            message_id = message.id,
            to = SUPPORT_MAILBOX,
            from = %message.email,
            "Contact message relayed to support"
        );
    } else {
        tracing::info!(message_id = message.id, "Contact message stored");
    }

    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /api/contact
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<ListResponse<ContactMessage>>> {
    let messages = ContactMessageRepo::list(&state.pool).await?;
    Ok(Json(messages.into()))
}
