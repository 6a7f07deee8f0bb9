//! Dashboard (BI) endpoint.

use airwatch_core::dashboard::{build_series, compute_kpis, DashboardSample, Kpis, SeriesPoint};
use airwatch_db::repositories::MeasurementRepo;
use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::MeasurementQuery;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BiResponse {
    pub kpis: Kpis,
    pub series: Vec<SeriesPoint>,
}

/// GET /api/measurements/bi
///
/// KPIs and a temperature/humidity series over every measurement matching
/// the filter, oldest first.
pub async fn bi(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<MeasurementQuery>,
) -> AppResult<Json<BiResponse>> {
    let filter = params.filter()?;
    let rows = MeasurementRepo::list_chronological(&state.pool, &filter).await?;

    let samples: Vec<DashboardSample> = rows
        .iter()
        .map(|m| DashboardSample {
            date: m.date,
            temperature: m.temperature,
            humidity: m.humidity,
            status: m.compliance(),
        })
        .collect();

    Ok(Json(BiResponse {
        kpis: compute_kpis(&samples),
        series: build_series(&samples),
    }))
}
