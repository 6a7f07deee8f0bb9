//! Measurement entity model, its joined views and DTOs.

use airwatch_core::compliance::{ComplianceStatus, MeasurementValues};
use airwatch_core::date_range::DateRange;
use airwatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::measurement_file::MeasurementFile;

/// A row from the `measurements` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Measurement {
    pub id: DbId,
    pub date: Timestamp,
    pub institution_id: DbId,
    pub sector_id: DbId,
    /// The user who recorded the measurement.
    pub user_id: DbId,
    pub humidity: f64,
    pub air_speed: f64,
    pub temperature: f64,
    pub fungi_internal: f64,
    pub fungi_external: f64,
    pub ie_ratio: f64,
    pub aerodispersoids: f64,
    pub bacteria_internal: f64,
    pub bacteria_external: f64,
    pub co2_internal: f64,
    pub co2_external: f64,
    pub pm10: f64,
    pub pm25: f64,
    /// `compliant` or `non_compliant`, as computed at write time.
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Measurement {
    pub fn values(&self) -> MeasurementValues {
        MeasurementValues {
            humidity: self.humidity,
            air_speed: self.air_speed,
            temperature: self.temperature,
            fungi_internal: self.fungi_internal,
            fungi_external: self.fungi_external,
            ie_ratio: self.ie_ratio,
            aerodispersoids: self.aerodispersoids,
            bacteria_internal: self.bacteria_internal,
            bacteria_external: self.bacteria_external,
            co2_internal: self.co2_internal,
            co2_external: self.co2_external,
            pm10: self.pm10,
            pm25: self.pm25,
        }
    }

    /// The stored verdict. Anything other than `compliant` reads as
    /// non-compliant.
    pub fn compliance(&self) -> ComplianceStatus {
        ComplianceStatus::parse(&self.status).unwrap_or(ComplianceStatus::NonCompliant)
    }
}

/// A measurement joined with the names of its institution, sector and
/// recorder.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MeasurementDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub measurement: Measurement,
    pub institution_name: String,
    pub sector_name: String,
    pub user_name: String,
}

/// A listing entry: the joined measurement plus its attachments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementWithFiles {
    #[serde(flatten)]
    pub detail: MeasurementDetail,
    pub files: Vec<MeasurementFile>,
}

/// Request body for creating or fully replacing a measurement.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementInput {
    pub date: Timestamp,
    pub institution_id: DbId,
    pub sector_id: DbId,
    #[serde(flatten)]
    pub values: MeasurementValues,
}

/// Row filter shared by the listing, dashboard and report queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasurementFilter {
    pub institution_id: Option<DbId>,
    pub sector_id: Option<DbId>,
    pub range: DateRange,
}
