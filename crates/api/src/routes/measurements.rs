//! Route definitions for the `/measurements` resource, including
//! attachments, the dashboard and report exports.

use airwatch_core::uploads::{MAX_FILES_PER_UPLOAD, MAX_FILE_SIZE_BYTES};
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{dashboard, files, measurements, reports};
use crate::state::AppState;

/// Largest accepted upload request: five full-size files plus multipart
/// framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_FILES_PER_UPLOAD * MAX_FILE_SIZE_BYTES + 1024 * 1024;

/// Routes mounted at `/measurements`.
///
/// ```text
/// GET    /                -> list (filtered, paginated)
/// POST   /                -> create
/// GET    /thresholds      -> thresholds
/// GET    /bi              -> dashboard::bi
/// GET    /report          -> reports::summary
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// GET    /{id}/files      -> files::list
/// POST   /{id}/files      -> files::upload
/// GET    /{id}/report     -> reports::measurement
/// ```
pub fn router() -> Router<AppState> {
    let file_routes = Router::new()
        .route("/{id}/files", get(files::list).post(files::upload))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(UPLOAD_BODY_LIMIT));

    Router::new()
        .route("/", get(measurements::list).post(measurements::create))
        .route("/thresholds", get(measurements::thresholds))
        .route("/bi", get(dashboard::bi))
        .route("/report", get(reports::summary))
        .route(
            "/{id}",
            get(measurements::get_by_id)
                .put(measurements::update)
                .delete(measurements::delete),
        )
        .route("/{id}/report", get(reports::measurement))
        .merge(file_routes)
}
