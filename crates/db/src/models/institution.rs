//! Institution entity model and DTOs.

use airwatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A monitored organisation (hospital, university, ...).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Institution {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInstitution {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInstitution {
    pub name: Option<String>,
}
