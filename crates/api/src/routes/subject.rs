//! Route definitions for `/subjects` and the lessons nested under it.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{lesson, subject};
use crate::state::AppState;

/// Routes mounted at `/subjects`.
///
/// ```text
/// GET    /                                  -> list_subjects
/// POST   /                                  -> create_subject
/// GET    /{id}                              -> get_subject
/// PUT    /{id}                              -> update_subject
/// DELETE /{id}                              -> delete_subject
///
/// GET    /{id}/lessons                      -> list_lessons
/// POST   /{id}/lessons                      -> create_lesson
/// POST   /{id}/lessons/reorder              -> reorder_lessons
/// GET    /{id}/lessons/{lesson_id}          -> get_lesson
/// PUT    /{id}/lessons/{lesson_id}          -> update_lesson
/// DELETE /{id}/lessons/{lesson_id}          -> delete_lesson
/// PUT    /{id}/lessons/{lesson_id}/order    -> reorder_lesson
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(subject::list_subjects).post(subject::create_subject),
        )
        .route(
            "/{id}",
            get(subject::get_subject)
                .put(subject::update_subject)
                .delete(subject::delete_subject),
        )
        .route(
            "/{id}/lessons",
            get(lesson::list_lessons).post(lesson::create_lesson),
        )
        .route("/{id}/lessons/reorder", post(lesson::reorder_lessons))
        .route(
            "/{id}/lessons/{lesson_id}",
            get(lesson::get_lesson)
                .put(lesson::update_lesson)
                .delete(lesson::delete_lesson),
        )
        .route(
            "/{id}/lessons/{lesson_id}/order",
            put(lesson::reorder_lesson),
        )
}
