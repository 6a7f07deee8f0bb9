//! Naming and limits for files attached to measurements.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum number of files accepted by one upload request.
pub const MAX_FILES_PER_UPLOAD: usize = 5;
/// Maximum size of a single uploaded file (10 MiB).
pub const MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// URL prefix under which stored files are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

pub const CATEGORY_PHOTO: &str = "photo";
pub const CATEGORY_REPORT: &str = "report";
pub const CATEGORY_CERTIFICATE: &str = "certificate";

/// All valid attachment categories.
pub const VALID_CATEGORIES: &[&str] = &[CATEGORY_PHOTO, CATEGORY_REPORT, CATEGORY_CERTIFICATE];

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Replace every whitespace run with a single `_`.
pub fn underscore_whitespace(value: &str) -> Cow<'_, str> {
    WHITESPACE_RE.replace_all(value, "_")
}

/// Normalise the optional `category` query parameter.
///
/// Missing or empty means uncategorised; anything else must be one of
/// [`VALID_CATEGORIES`].
pub fn parse_category(value: Option<&str>) -> Result<Option<String>, CoreError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(c) if VALID_CATEGORIES.contains(&c) => Ok(Some(c.to_string())),
        Some(other) => Err(CoreError::Validation(format!(
            "Unknown file category: '{other}'. Valid categories: {}",
            VALID_CATEGORIES.join(", ")
        ))),
    }
}

/// Name under which an upload is written to disk:
/// `<unix-millis>_<original base name>`, whitespace runs replaced by `_`.
///
/// Directory components of the client-supplied name are dropped so the file
/// always lands directly inside the upload directory.
pub fn stored_file_name(timestamp_millis: i64, original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim_start_matches('.');
    let base = if base.trim().is_empty() { "upload" } else { base };
    format!("{timestamp_millis}_{}", underscore_whitespace(base))
}

/// Public URL path of a stored file.
pub fn public_path(stored_name: &str) -> String {
    format!("{UPLOADS_URL_PREFIX}/{stored_name}")
}

/// Inverse of [`public_path`]: the stored file name, if `path` points into
/// the uploads prefix.
pub fn stored_name_from_public_path(path: &str) -> Option<&str> {
    path.strip_prefix(UPLOADS_URL_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|name| !name.is_empty() && !name.contains(['/', '\\']))
}
