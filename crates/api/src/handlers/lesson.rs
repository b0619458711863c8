//! Handlers for lessons nested under `/subjects/{id}/lessons`.
//!
//! Writes go through [`LessonOrdering`], which keeps each subject's
//! `sort_order` values dense.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use elearn_core::error::CoreError;
use elearn_core::ordering::OrderAssignment;
use elearn_core::types::{DbId, SortOrder};
use elearn_core::validation::require_non_blank;
use elearn_db::models::lesson::{CreateLesson, Lesson, UpdateLesson};
use elearn_db::models::subject::Subject;
use elearn_db::repositories::{LessonRepo, SubjectRepo};
use serde::Deserialize;
use validator::Validate;

use crate::access::Caller;
use crate::error::AppResult;
use crate::lessons::LessonOrdering;
use crate::middleware::rbac::{RequireAuth, RequireStaff};
use crate::query::PageParams;
use crate::response::{DataResponse, PaginatedResponse, Pagination};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /subjects/{id}/lessons`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLessonRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub title: String,
    pub body: Option<String>,
    /// URLs of attached media.
    #[serde(default)]
    pub files: Vec<String>,
}

/// Request body for `PUT /subjects/{id}/lessons/{lesson_id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLessonRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub title: Option<String>,
    pub body: Option<String>,
    pub files: Option<Vec<String>>,
    /// Move the lesson as part of the same update.
    pub sort_order: Option<SortOrder>,
}

/// Request body for `PUT /subjects/{id}/lessons/{lesson_id}/order`.
#[derive(Debug, Deserialize)]
pub struct ReorderOneRequest {
    pub sort_order: SortOrder,
}

/// Request body for `POST /subjects/{id}/lessons/reorder`.
#[derive(Debug, Deserialize)]
pub struct ReorderBulkRequest {
    pub items: Vec<OrderAssignment>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/subjects/{id}/lessons
///
/// Appends the lesson after the subject's last one. Returns 201.
pub async fn create_lesson(
    State(state): State<AppState>,
    RequireStaff(auth): RequireStaff,
    Path(subject_id): Path<DbId>,
    Json(input): Json<CreateLessonRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Lesson>>)> {
    input.validate().map_err(CoreError::from)?;
    require_non_blank(&input.title, "title")?;

    let caller = Caller::resolve(&state.pool, &auth).await?;
    let create = CreateLesson {
        title: input.title.trim().to_string(),
        body: input.body,
        files: input.files,
    };
    let lesson = LessonOrdering::create(&state.pool, &caller, subject_id, &create).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: lesson })))
}

/// GET /api/v1/subjects/{id}/lessons
///
/// Paginated lessons in display order, optionally filtered by `search`.
pub async fn list_lessons(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(subject_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<Lesson>>> {
    let caller = Caller::resolve(&state.pool, &auth).await?;
    viewable_subject(&state, &caller, subject_id).await?;

    let lessons = LessonRepo::list_page(
        &state.pool,
        subject_id,
        params.search(),
        params.limit(),
        params.offset(),
    )
    .await?;
    let total = LessonRepo::count_page(&state.pool, subject_id, params.search()).await?;

    Ok(Json(PaginatedResponse {
        data: lessons,
        pagination: Pagination::new(total, params.limit(), params.page()),
    }))
}

/// GET /api/v1/subjects/{id}/lessons/{lesson_id}
pub async fn get_lesson(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path((subject_id, lesson_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Lesson>>> {
    let caller = Caller::resolve(&state.pool, &auth).await?;
    viewable_subject(&state, &caller, subject_id).await?;

    let lesson = LessonRepo::find_in_subject(&state.pool, subject_id, lesson_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Lesson",
            id: lesson_id,
        })?;
    Ok(Json(DataResponse { data: lesson }))
}

/// PUT /api/v1/subjects/{id}/lessons/{lesson_id}
///
/// Patch content; an included `sort_order` also moves the lesson.
pub async fn update_lesson(
    State(state): State<AppState>,
    RequireStaff(auth): RequireStaff,
    Path((subject_id, lesson_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateLessonRequest>,
) -> AppResult<Json<DataResponse<Lesson>>> {
    input.validate().map_err(CoreError::from)?;
    if let Some(title) = input.title.as_deref() {
        require_non_blank(title, "title")?;
    }

    let caller = Caller::resolve(&state.pool, &auth).await?;
    let patch = UpdateLesson {
        title: input.title.map(|s| s.trim().to_string()),
        body: input.body,
        files: input.files,
    };
    let lesson = LessonOrdering::update(
        &state.pool,
        &caller,
        subject_id,
        lesson_id,
        &patch,
        input.sort_order,
    )
    .await?;

    Ok(Json(DataResponse { data: lesson }))
}

/// DELETE /api/v1/subjects/{id}/lessons/{lesson_id}
///
/// Later lessons move up one place. Returns 204.
pub async fn delete_lesson(
    State(state): State<AppState>,
    RequireStaff(auth): RequireStaff,
    Path((subject_id, lesson_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let caller = Caller::resolve(&state.pool, &auth).await?;
    LessonOrdering::delete(&state.pool, &caller, subject_id, lesson_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/subjects/{id}/lessons/{lesson_id}/order
pub async fn reorder_lesson(
    State(state): State<AppState>,
    RequireStaff(auth): RequireStaff,
    Path((subject_id, lesson_id)): Path<(DbId, DbId)>,
    Json(input): Json<ReorderOneRequest>,
) -> AppResult<Json<DataResponse<Lesson>>> {
    let caller = Caller::resolve(&state.pool, &auth).await?;
    let lesson = LessonOrdering::reorder_one(
        &state.pool,
        &caller,
        subject_id,
        lesson_id,
        input.sort_order,
    )
    .await?;
    Ok(Json(DataResponse { data: lesson }))
}

/// POST /api/v1/subjects/{id}/lessons/reorder
///
/// All-or-nothing. Returns every lesson of the subject in its new order.
pub async fn reorder_lessons(
    State(state): State<AppState>,
    RequireStaff(auth): RequireStaff,
    Path(subject_id): Path<DbId>,
    Json(input): Json<ReorderBulkRequest>,
) -> AppResult<Json<DataResponse<Vec<Lesson>>>> {
    let caller = Caller::resolve(&state.pool, &auth).await?;
    let lessons =
        LessonOrdering::reorder_bulk(&state.pool, &caller, subject_id, &input.items).await?;
    Ok(Json(DataResponse { data: lessons }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn viewable_subject(
    state: &AppState,
    caller: &Caller,
    subject_id: DbId,
) -> AppResult<Subject> {
    let subject = SubjectRepo::find_by_id(&state.pool, subject_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Subject",
            id: subject_id,
        })?;
    caller.ensure_can_view(&subject)?;
    Ok(subject)
}
