//! Contact-form message model.

use airwatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub message: String,
    /// `email` or `internal`.
    #[serde(rename = "type")]
    pub message_type: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub message_type: String,
}
