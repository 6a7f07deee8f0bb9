//! Shared query parameter types for API handlers.

use airwatch_core::date_range::DateRange;
use airwatch_core::error::CoreError;
use airwatch_core::types::DbId;
use airwatch_db::models::measurement::MeasurementFilter;
use serde::Deserialize;

/// Query string accepted by the measurement listing, dashboard and report
/// endpoints. Each endpoint reads the subset it needs.
///
/// `?institution_id=&sector_id=&from=&to=&page=&page_size=&limit=&format=`
#[derive(Debug, Default, Deserialize)]
pub struct MeasurementQuery {
    pub institution_id: Option<DbId>,
    pub sector_id: Option<DbId>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub limit: Option<i64>,
    pub format: Option<String>,
}

impl MeasurementQuery {
    /// Parse the row filter; invalid dates are a validation error.
    pub fn filter(&self) -> Result<MeasurementFilter, CoreError> {
        Ok(MeasurementFilter {
            institution_id: self.institution_id,
            sector_id: self.sector_id,
            range: DateRange::parse(self.from.as_deref(), self.to.as_deref())?,
        })
    }
}

/// `?institution_id=` on the sector listing.
#[derive(Debug, Deserialize)]
pub struct SectorListParams {
    pub institution_id: Option<DbId>,
}

/// `?category=` on file uploads.
#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub category: Option<String>,
}
