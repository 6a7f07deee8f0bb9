pub mod auth;
pub mod contact;
pub mod health;
pub mod institutions;
pub mod measurements;
pub mod sectors;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/register                          register (public)
/// /auth/login                             login (public)
///
/// /users                                  list (auth), create (admin)
/// /users/{id}                             update, delete (admin)
///
/// /institutions                           list, create
/// /institutions/{id}                      get, update, delete
///
/// /sectors?institution_id=                list, create
/// /sectors/{id}                           get, update, delete
///
/// /measurements                           filtered page, create
/// /measurements/thresholds                threshold table
/// /measurements/bi                        KPIs + series
/// /measurements/report                    pdf | excel | csv export
/// /measurements/{id}                      detail, replace, delete
/// /measurements/{id}/files                list, upload
/// /measurements/{id}/report               single-measurement PDF
///
/// /contact                                submit (public), list (auth)
/// ```
///
/// Everything except the public routes requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/institutions", institutions::router())
        .nest("/sectors", sectors::router())
        .nest("/measurements", measurements::router())
        .nest("/contact", contact::router())
}
