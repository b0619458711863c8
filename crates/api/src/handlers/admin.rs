//! Handlers for the `/admin` resource: teacher accounts and the generic
//! user listing. Student accounts live in [`super::student`].
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use elearn_core::error::CoreError;
use elearn_core::roles::ROLE_ID_TEACHER;
use elearn_core::types::DbId;
use elearn_db::models::teacher::{CreateTeacher, Teacher, UpdateTeacher};
use elearn_db::models::user::{CreateUser, UserResponse};
use elearn_db::repositories::{TeacherRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PageParams;
use crate::response::{DataResponse, PaginatedResponse, Pagination};
use crate::state::AppState;

/// Request body for `POST /admin/teachers`.
///
/// Creates the login account and the teacher profile together.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeacherRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub full_name: String,
    #[validate(length(min = 3, max = 50, message = "must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    pub password: String,
    /// Staff registration number.
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub nrk: String,
    #[validate(length(min = 6, max = 20, message = "must be 6-20 characters"))]
    pub phone: String,
}

/// Request body for `PUT /admin/teachers/{id}`. Name and email are copied
/// onto the login account as well.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTeacherRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub full_name: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub nrk: Option<String>,
    #[validate(length(min = 6, max = 20, message = "must be 6-20 characters"))]
    pub phone: Option<String>,
}

/// POST /api/v1/admin/teachers
///
/// Create a teacher account and profile in one transaction. Returns 201.
pub async fn create_teacher(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateTeacherRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Teacher>>)> {
    input.validate().map_err(CoreError::from)?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let full_name = input.full_name.trim().to_string();
    let email = input.email.trim().to_lowercase();

    let mut tx = state.pool.begin().await?;
    let user = UserRepo::create(
        &mut *tx,
        &CreateUser {
            full_name: full_name.clone(),
            username: input.username.trim().to_string(),
            email: email.clone(),
            password_hash: hashed,
            role_id: ROLE_ID_TEACHER,
        },
    )
    .await?;
    let teacher = TeacherRepo::create(
        &mut *tx,
        &CreateTeacher {
            user_id: user.id,
            full_name,
            email,
            nrk: input.nrk.trim().to_string(),
            phone: input.phone.trim().to_string(),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        teacher_id = teacher.id,
        user_id = user.id,
        admin_id = admin.user_id,
        "Teacher created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: teacher })))
}

/// GET /api/v1/admin/teachers
///
/// Paginated, ordered by name. `search` matches name, email, NRK and phone.
pub async fn list_teachers(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(page): Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<Teacher>>> {
    let teachers =
        TeacherRepo::list(&state.pool, page.search(), page.limit(), page.offset()).await?;
    let total = TeacherRepo::count(&state.pool, page.search()).await?;
    Ok(Json(PaginatedResponse {
        data: teachers,
        pagination: Pagination::new(total, page.limit(), page.page()),
    }))
}

/// GET /api/v1/admin/teachers/{id}
pub async fn get_teacher(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Teacher>>> {
    let teacher = TeacherRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Teacher",
            id,
        })?;
    Ok(Json(DataResponse { data: teacher }))
}

/// PUT /api/v1/admin/teachers/{id}
pub async fn update_teacher(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTeacherRequest>,
) -> AppResult<Json<DataResponse<Teacher>>> {
    input.validate().map_err(CoreError::from)?;

    let patch = UpdateTeacher {
        full_name: input.full_name.map(|s| s.trim().to_string()),
        email: input.email.map(|s| s.trim().to_lowercase()),
        nrk: input.nrk.map(|s| s.trim().to_string()),
        phone: input.phone.map(|s| s.trim().to_string()),
    };

    let mut tx = state.pool.begin().await?;
    let teacher = TeacherRepo::update(&mut *tx, id, &patch)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Teacher",
            id,
        })?;
    UserRepo::sync_identity(
        &mut *tx,
        teacher.user_id,
        patch.full_name.as_deref(),
        patch.email.as_deref(),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(teacher_id = id, admin_id = admin.user_id, "Teacher updated");
    Ok(Json(DataResponse { data: teacher }))
}

/// DELETE /api/v1/admin/teachers/{id}
///
/// Removes the profile and its login account. Refused with 409 while the
/// teacher still owns subjects; reassign or delete those first.
pub async fn delete_teacher(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    let teacher = TeacherRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Teacher",
            id,
        })?;

    let owned = TeacherRepo::count_subjects(&mut *tx, id).await?;
    if owned > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Teacher still owns {owned} subject(s)"
        ))));
    }

    UserRepo::delete(&mut *tx, teacher.user_id).await?;
    tx.commit().await?;

    tracing::info!(
        teacher_id = id,
        user_id = teacher.user_id,
        admin_id = admin.user_id,
        "Teacher deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
///
/// Every account with its role name, newest first. `search` matches name,
/// username and email.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(page): Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<UserResponse>>> {
    let users =
        UserRepo::list_summaries(&state.pool, page.search(), page.limit(), page.offset()).await?;
    let total = UserRepo::count_summaries(&state.pool, page.search()).await?;
    Ok(Json(PaginatedResponse {
        data: users,
        pagination: Pagination::new(total, page.limit(), page.page()),
    }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_summary(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;
    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Deactivates the account so it can no longer log in. Profiles and owned
/// subjects are kept. Deactivating an inactive account is a no-op.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot deactivate your own account".into(),
        )));
    }

    let changed = UserRepo::deactivate(&state.pool, id).await?;
    if !changed && UserRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    if changed {
        tracing::info!(user_id = id, admin_id = admin.user_id, "User deactivated");
    }
    Ok(StatusCode::NO_CONTENT)
}
