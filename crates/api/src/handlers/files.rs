//! Handlers for measurement attachments (`/measurements/{id}/files`).

use std::path::PathBuf;

use airwatch_core::error::CoreError;
use airwatch_core::types::DbId;
use airwatch_core::uploads::{
    parse_category, public_path, stored_file_name, MAX_FILES_PER_UPLOAD, MAX_FILE_SIZE_BYTES,
};
use airwatch_db::models::measurement_file::{CreateMeasurementFile, MeasurementFile};
use airwatch_db::repositories::{MeasurementFileRepo, MeasurementRepo};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::UploadParams;
use crate::state::AppState;

/// Multipart field carrying the uploaded files.
const FILES_FIELD: &str = "files";

#[derive(Debug, Serialize, Deserialize)]
pub struct FilesResponse {
    pub files: Vec<MeasurementFile>,
}

/// One file read from the request, not yet written.
struct PendingUpload {
    name: String,
    mime: String,
    data: Vec<u8>,
}

/// GET /api/measurements/{id}/files
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<FilesResponse>> {
    MeasurementRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Measurement", id))?;
    let files = MeasurementFileRepo::list_by_measurement(&state.pool, id).await?;
    Ok(Json(FilesResponse { files }))
}

/// POST /api/measurements/{id}/files?category=photo|report|certificate
///
/// Accepts up to five files of at most 10 MiB each in the `files` field.
/// Nothing is written unless the whole request is acceptable.
pub async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<FilesResponse>)> {
    let category = parse_category(params.category.as_deref())?;
    MeasurementRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Measurement", id))?;

    let mut pending: Vec<PendingUpload> = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        if pending.len() == MAX_FILES_PER_UPLOAD {
            return Err(AppError::Core(CoreError::Validation(format!(
                "At most {MAX_FILES_PER_UPLOAD} files per upload"
            ))));
        }

        let name = field.file_name().unwrap_or("upload").to_string();
        let mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if data.len() > MAX_FILE_SIZE_BYTES {
            return Err(AppError::Core(CoreError::Validation(format!(
                "File '{name}' exceeds the {} MiB limit",
                MAX_FILE_SIZE_BYTES / (1024 * 1024)
            ))));
        }
        pending.push(PendingUpload {
            name,
            mime,
            data: data.to_vec(),
        });
    }

    if pending.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Missing required '{FILES_FIELD}' field"
        )));
    }

    let upload_dir = &state.config.upload_dir;
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let mut written: Vec<PathBuf> = Vec::with_capacity(pending.len());
    let mut inputs = Vec::with_capacity(pending.len());
    for file in &pending {
        let stored = free_stored_name(upload_dir, &file.name, &written).await?;
        let target = upload_dir.join(&stored);
        if let Err(e) = tokio::fs::write(&target, &file.data).await {
            remove_all(&written).await;
            return Err(AppError::InternalError(e.to_string()));
        }
        written.push(target);
        inputs.push(CreateMeasurementFile {
            name: file.name.clone(),
            path: public_path(&stored),
            mime: file.mime.clone(),
            size: file.data.len() as i64,
            category: category.clone(),
        });
    }

    let files = match MeasurementFileRepo::create_many(&state.pool, id, &inputs).await {
        Ok(files) => files,
        Err(e) => {
            remove_all(&written).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        measurement_id = id,
        user_id = user.user_id,
        count = files.len(),
        category = category.as_deref().unwrap_or("-"),
        "Files attached"
    );
    Ok((StatusCode::CREATED, Json(FilesResponse { files })))
}

/// A stored name not already on disk or claimed earlier in this request.
async fn free_stored_name(
    dir: &std::path::Path,
    original: &str,
    claimed: &[PathBuf],
) -> AppResult<String> {
    let mut millis = chrono::Utc::now().timestamp_millis();
    loop {
        let name = stored_file_name(millis, original);
        let candidate = dir.join(&name);
        let on_disk = tokio::fs::try_exists(&candidate)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        if !on_disk && !claimed.contains(&candidate) {
            return Ok(name);
        }
        millis += 1;
    }
}

async fn remove_all(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to clean up upload");
        }
    }
}
