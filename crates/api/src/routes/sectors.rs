use axum::routing::get;
use axum::Router;

use crate::handlers::sectors;
use crate::state::AppState;

/// Routes mounted at `/sectors`.
///
/// ```text
/// GET    /?institution_id= -> list
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sectors::list).post(sectors::create))
        .route(
            "/{id}",
            get(sectors::get_by_id)
                .put(sectors::update)
                .delete(sectors::delete),
        )
}
