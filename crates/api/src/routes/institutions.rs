use axum::routing::get;
use axum::Router;

use crate::handlers::institutions;
use crate::state::AppState;

/// Routes mounted at `/institutions`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(institutions::list).post(institutions::create))
        .route(
            "/{id}",
            get(institutions::get_by_id)
                .put(institutions::update)
                .delete(institutions::delete),
        )
}
