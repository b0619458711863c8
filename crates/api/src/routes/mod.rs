pub mod admin;
pub mod auth;
pub mod health;
pub mod subject;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/me                                         get, update own profile
///
/// /admin/teachers                                  list, create (admin only)
/// /admin/teachers/{id}                             get, update, delete
/// /admin/students                                  list, create
/// /admin/students/{id}                             get, update, delete
/// /admin/users                                     list
/// /admin/users/{id}                                get, deactivate (DELETE)
///
/// /subjects                                        list, create
/// /subjects/{id}                                   get (with lessons), update, delete
/// /subjects/{id}/lessons                           list, create (append)
/// /subjects/{id}/lessons/reorder                   bulk reorder (POST)
/// /subjects/{id}/lessons/{lesson_id}               get, update, delete
/// /subjects/{id}/lessons/{lesson_id}/order         move one lesson (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/subjects", subject::router())
}
