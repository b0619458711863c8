//! Route definitions for the `/admin` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{admin, student};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /teachers        -> list_teachers
/// POST   /teachers        -> create_teacher
/// GET    /teachers/{id}   -> get_teacher
/// PUT    /teachers/{id}   -> update_teacher
/// DELETE /teachers/{id}   -> delete_teacher
/// GET    /students        -> list_students
/// POST   /students        -> create_student
/// GET    /students/{id}   -> get_student
/// PUT    /students/{id}   -> update_student
/// DELETE /students/{id}   -> delete_student
/// GET    /users           -> list_users
/// GET    /users/{id}      -> get_user
/// DELETE /users/{id}      -> deactivate_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/teachers",
            get(admin::list_teachers).post(admin::create_teacher),
        )
        .route(
            "/teachers/{id}",
            get(admin::get_teacher)
                .put(admin::update_teacher)
                .delete(admin::delete_teacher),
        )
        .route(
            "/students",
            get(student::list_students).post(student::create_student),
        )
        .route(
            "/students/{id}",
            get(student::get_student)
                .put(student::update_student)
                .delete(student::delete_student),
        )
        .route("/users", get(admin::list_users))
        .route(
            "/users/{id}",
            get(admin::get_user).delete(admin::deactivate_user),
        )
}
