//! Handlers for the `/subjects` resource.
//!
//! Admins manage every subject. Teachers create subjects for themselves and
//! only see or change their own. Students read everything.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use elearn_core::error::CoreError;
use elearn_core::types::DbId;
use elearn_core::validation::{require_non_blank, validate_category};
use elearn_db::models::subject::{
    CreateSubject, Subject, SubjectFilter, SubjectWithLessons, UpdateSubject,
};
use elearn_db::repositories::{LessonRepo, SubjectRepo, TeacherRepo};
use serde::Deserialize;
use validator::Validate;

use crate::access::Caller;
use crate::error::AppResult;
use crate::middleware::rbac::{RequireAuth, RequireStaff};
use crate::query::PageParams;
use crate::response::{DataResponse, PaginatedResponse, Pagination};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /subjects`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "is required"))]
    pub description: String,
    pub category: String,
    /// Owner profile. Required for admins; teachers may omit it.
    pub teacher_id: Option<DbId>,
}

/// Request body for `PUT /subjects/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSubjectRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub description: Option<String>,
    pub category: Option<String>,
    /// Reassign the subject. Admin only.
    pub teacher_id: Option<DbId>,
}

/// Query parameters for `GET /subjects`.
#[derive(Debug, Default, Deserialize)]
pub struct SubjectListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub teacher_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/subjects
pub async fn create_subject(
    State(state): State<AppState>,
    RequireStaff(auth): RequireStaff,
    Json(input): Json<CreateSubjectRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Subject>>)> {
    input.validate().map_err(CoreError::from)?;
    require_non_blank(&input.title, "title")?;
    validate_category(&input.category)?;

    let caller = Caller::resolve(&state.pool, &auth).await?;
    let teacher_id = if caller.is_admin() {
        input.teacher_id.ok_or_else(|| {
            CoreError::Validation("teacher_id is required when an admin creates a subject".into())
        })?
    } else {
        let own = caller.teacher_id.ok_or_else(|| {
            CoreError::Forbidden("No teacher profile is linked to this account".into())
        })?;
        if input.teacher_id.is_some_and(|id| id != own) {
            return Err(CoreError::Forbidden(
                "Teachers can only create subjects for themselves".into(),
            )
            .into());
        }
        own
    };

    TeacherRepo::find_by_id(&state.pool, teacher_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Teacher",
            id: teacher_id,
        })?;

    let subject = SubjectRepo::create(
        &state.pool,
        &CreateSubject {
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            category: input.category,
            teacher_id,
        },
    )
    .await?;

    tracing::info!(
        subject_id = subject.id,
        teacher_id,
        user_id = caller.user_id,
        "Subject created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: subject })))
}

/// GET /api/v1/subjects
///
/// Paginated, newest first. Teachers only ever see their own subjects,
/// whatever `teacher_id` they pass.
pub async fn list_subjects(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Query(params): Query<SubjectListParams>,
) -> AppResult<Json<PaginatedResponse<Subject>>> {
    let caller = Caller::resolve(&state.pool, &auth).await?;
    let page = PageParams {
        page: params.page,
        limit: params.limit,
        search: params.search,
    };

    if let Some(category) = params.category.as_deref() {
        validate_category(category)?;
    }

    let filter = SubjectFilter {
        search: page.search().map(str::to_string),
        category: params.category,
        teacher_id: caller.list_scope().or(params.teacher_id),
    };

    let subjects = SubjectRepo::list(&state.pool, &filter, page.limit(), page.offset()).await?;
    let total = SubjectRepo::count(&state.pool, &filter).await?;

    Ok(Json(PaginatedResponse {
        data: subjects,
        pagination: Pagination::new(total, page.limit(), page.page()),
    }))
}

/// GET /api/v1/subjects/{id}
///
/// The subject with its lessons in display order.
pub async fn get_subject(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SubjectWithLessons>>> {
    let caller = Caller::resolve(&state.pool, &auth).await?;
    let subject = SubjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Subject",
            id,
        })?;
    caller.ensure_can_view(&subject)?;

    let lessons = LessonRepo::list_by_subject(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: SubjectWithLessons { subject, lessons },
    }))
}

/// PUT /api/v1/subjects/{id}
pub async fn update_subject(
    State(state): State<AppState>,
    RequireStaff(auth): RequireStaff,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSubjectRequest>,
) -> AppResult<Json<DataResponse<Subject>>> {
    input.validate().map_err(CoreError::from)?;
    if let Some(title) = input.title.as_deref() {
        require_non_blank(title, "title")?;
    }
    if let Some(category) = input.category.as_deref() {
        validate_category(category)?;
    }

    let caller = Caller::resolve(&state.pool, &auth).await?;

    let mut tx = state.pool.begin().await?;
    let subject = SubjectRepo::lock_for_update(&mut tx, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Subject",
            id,
        })?;
    caller.ensure_can_manage(&subject)?;

    if let Some(new_owner) = input.teacher_id {
        if new_owner != subject.teacher_id {
            if !caller.is_admin() {
                return Err(CoreError::Forbidden(
                    "Only admins can reassign a subject to another teacher".into(),
                )
                .into());
            }
            TeacherRepo::find_by_id(&mut *tx, new_owner)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "Teacher",
                    id: new_owner,
                })?;
        }
    }

    let update = UpdateSubject {
        title: input.title.map(|s| s.trim().to_string()),
        description: input.description.map(|s| s.trim().to_string()),
        category: input.category,
        teacher_id: input.teacher_id,
    };
    let updated = SubjectRepo::update(&mut *tx, id, &update)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Subject",
            id,
        })?;
    tx.commit().await?;

    tracing::info!(subject_id = id, user_id = caller.user_id, "Subject updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/subjects/{id}
///
/// Removes the subject and all of its lessons. Returns 204.
pub async fn delete_subject(
    State(state): State<AppState>,
    RequireStaff(auth): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let caller = Caller::resolve(&state.pool, &auth).await?;

    let mut tx = state.pool.begin().await?;
    let subject = SubjectRepo::lock_for_update(&mut tx, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Subject",
            id,
        })?;
    caller.ensure_can_manage(&subject)?;
    SubjectRepo::delete(&mut *tx, id).await?;
    tx.commit().await?;

    tracing::info!(subject_id = id, user_id = caller.user_id, "Subject deleted");

    Ok(StatusCode::NO_CONTENT)
}
