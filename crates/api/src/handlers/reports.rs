//! Report downloads: the filtered summary (PDF / XLSX / CSV) and the
//! single-measurement PDF.

use airwatch_core::pagination::{clamp_limit, DEFAULT_REPORT_LIMIT, MAX_REPORT_LIMIT};
use airwatch_core::report::{
    attachment_disposition, build_csv, measurement_report_filename, ReportFormat, SummaryRow,
};
use airwatch_core::types::DbId;
use airwatch_db::models::measurement::MeasurementDetail;
use airwatch_db::repositories::MeasurementRepo;
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::MeasurementQuery;
use crate::render::{pdf, xlsx};
use crate::state::AppState;

fn summary_row(detail: MeasurementDetail) -> SummaryRow {
    let m = &detail.measurement;
    SummaryRow {
        date: m.date,
        temperature: m.temperature,
        humidity: m.humidity,
        co2_internal: m.co2_internal,
        co2_external: m.co2_external,
        status: m.compliance(),
        institution: detail.institution_name,
        sector: detail.sector_name,
    }
}

fn download(content_type: &'static str, file_name: &str, body: Vec<u8>) -> Response {
    (
        [
            (CONTENT_TYPE, content_type.to_string()),
            (CONTENT_DISPOSITION, attachment_disposition(file_name)),
        ],
        body,
    )
        .into_response()
}

/// GET /api/measurements/report?format=pdf|excel|csv&limit=
///
/// Newest first; `limit` defaults to 500 and is capped at 2000.
pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<MeasurementQuery>,
) -> AppResult<Response> {
    let format = ReportFormat::parse(params.format.as_deref())?;
    let filter = params.filter()?;
    let limit = clamp_limit(params.limit, DEFAULT_REPORT_LIMIT, MAX_REPORT_LIMIT);

    let rows: Vec<SummaryRow> = MeasurementRepo::list_recent(&state.pool, &filter, limit)
        .await?
        .into_iter()
        .map(summary_row)
        .collect();

    let body = match format {
        ReportFormat::Pdf => pdf::summary_pdf(&rows)?,
        ReportFormat::Excel => xlsx::summary_xlsx(&rows)?,
        ReportFormat::Csv => build_csv(&rows).into_bytes(),
    };

    tracing::info!(
        user_id = user.user_id,
        format = ?format,
        rows = rows.len(),
        "Report exported"
    );
    Ok(download(format.content_type(), format.file_name(), body))
}

/// GET /api/measurements/{id}/report
pub async fn measurement(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let detail = MeasurementRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Measurement", id))?;

    let body = pdf::measurement_pdf(&detail)?;
    let file_name = measurement_report_filename(
        &detail.measurement.date,
        &detail.institution_name,
        &detail.sector_name,
    );
    Ok(download(ReportFormat::Pdf.content_type(), &file_name, body))
}
