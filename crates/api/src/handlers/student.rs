//! Handlers for `/admin/students` (student account management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use elearn_core::error::CoreError;
use elearn_core::roles::ROLE_ID_STUDENT;
use elearn_core::types::DbId;
use elearn_db::models::student::{CreateStudent, Student, UpdateStudent};
use elearn_db::models::user::CreateUser;
use elearn_db::repositories::{StudentRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PageParams;
use crate::response::{DataResponse, PaginatedResponse, Pagination};
use crate::state::AppState;

/// Request body for `POST /admin/students`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub full_name: String,
    /// Defaults to the local part of `email`.
    #[validate(length(min = 3, max = 50, message = "must be 3-50 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    pub password: String,
    /// School registration number.
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub nis: String,
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub class_name: String,
    #[validate(length(min = 6, max = 20, message = "must be 6-20 characters"))]
    pub phone: String,
}

/// Request body for `PUT /admin/students/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStudentRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub full_name: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub nis: Option<String>,
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub class_name: Option<String>,
    #[validate(length(min = 6, max = 20, message = "must be 6-20 characters"))]
    pub phone: Option<String>,
}

fn username_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

/// POST /api/v1/admin/students
///
/// Create a student account and profile in one transaction. Returns 201.
pub async fn create_student(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateStudentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Student>>)> {
    input.validate().map_err(CoreError::from)?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let full_name = input.full_name.trim().to_string();
    let email = input.email.trim().to_lowercase();
    let username = match input.username.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => username_from_email(&email),
    };

    let mut tx = state.pool.begin().await?;
    let user = UserRepo::create(
        &mut *tx,
        &CreateUser {
            full_name: full_name.clone(),
            username,
            email: email.clone(),
            password_hash: hashed,
            role_id: ROLE_ID_STUDENT,
        },
    )
    .await?;
    let student = StudentRepo::create(
        &mut *tx,
        &CreateStudent {
            user_id: user.id,
            full_name,
            email,
            nis: input.nis.trim().to_string(),
            class_name: input.class_name.trim().to_string(),
            phone: input.phone.trim().to_string(),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        student_id = student.id,
        user_id = user.id,
        admin_id = admin.user_id,
        "Student created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: student })))
}

/// GET /api/v1/admin/students
///
/// Paginated, newest first. `search` matches name, NIS, class and phone.
pub async fn list_students(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(page): Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<Student>>> {
    let students =
        StudentRepo::list(&state.pool, page.search(), page.limit(), page.offset()).await?;
    let total = StudentRepo::count(&state.pool, page.search()).await?;
    Ok(Json(PaginatedResponse {
        data: students,
        pagination: Pagination::new(total, page.limit(), page.page()),
    }))
}

/// GET /api/v1/admin/students/{id}
pub async fn get_student(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Student>>> {
    let student = StudentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Student",
            id,
        })?;
    Ok(Json(DataResponse { data: student }))
}

/// PUT /api/v1/admin/students/{id}
///
/// Name and email are copied onto the login account in the same transaction.
pub async fn update_student(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStudentRequest>,
) -> AppResult<Json<DataResponse<Student>>> {
    input.validate().map_err(CoreError::from)?;

    let patch = UpdateStudent {
        full_name: input.full_name.map(|s| s.trim().to_string()),
        email: input.email.map(|s| s.trim().to_lowercase()),
        nis: input.nis.map(|s| s.trim().to_string()),
        class_name: input.class_name.map(|s| s.trim().to_string()),
        phone: input.phone.map(|s| s.trim().to_string()),
    };

    let mut tx = state.pool.begin().await?;
    let student = StudentRepo::update(&mut *tx, id, &patch)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Student",
            id,
        })?;
    UserRepo::sync_identity(
        &mut *tx,
        student.user_id,
        patch.full_name.as_deref(),
        patch.email.as_deref(),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(student_id = id, admin_id = admin.user_id, "Student updated");
    Ok(Json(DataResponse { data: student }))
}

/// DELETE /api/v1/admin/students/{id}
///
/// Removes the profile together with its login account.
pub async fn delete_student(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    let student = StudentRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Student",
            id,
        })?;
    UserRepo::delete(&mut *tx, student.user_id).await?;
    tx.commit().await?;

    tracing::info!(
        student_id = id,
        user_id = student.user_id,
        admin_id = admin.user_id,
        "Student deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_defaults_to_email_local_part() {
        assert_eq!(username_from_email("budi.santoso@sekolah.test"), "budi.santoso");
        assert_eq!(username_from_email("tanpa-domain"), "tanpa-domain");
    }
}
