//! Sector entity model and DTOs.

use airwatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A physical area inside an institution where readings are taken.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Sector {
    pub id: DbId,
    pub name: String,
    pub institution_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSector {
    pub name: String,
    pub institution_id: DbId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSector {
    pub name: Option<String>,
    pub institution_id: Option<DbId>,
}
