//! Files attached to a measurement (photos, lab reports, certificates).

use airwatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MeasurementFile {
    pub id: DbId,
    pub measurement_id: DbId,
    /// Original client-side file name.
    pub name: String,
    /// Public URL path, e.g. `/uploads/1700000000000_laudo.pdf`.
    pub path: String,
    pub mime: String,
    pub size: i64,
    pub category: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateMeasurementFile {
    pub name: String,
    pub path: String,
    pub mime: String,
    pub size: i64,
    pub category: Option<String>,
}
