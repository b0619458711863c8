//! Subject ownership checks.
//!
//! Role extractors in [`crate::middleware::rbac`] only know the caller's
//! role. Whether a teacher may touch a particular subject depends on the
//! subject's `teacher_id`, so that check happens here once the subject row
//! has been loaded.

use elearn_core::error::CoreError;
use elearn_core::roles::{may_manage_subject, may_view_subject, ROLE_ADMIN, ROLE_TEACHER};
use elearn_core::types::DbId;
use elearn_db::models::subject::Subject;
use elearn_db::repositories::TeacherRepo;
use sqlx::PgExecutor;

use crate::middleware::auth::AuthUser;

/// An authenticated caller with their teacher profile resolved.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: DbId,
    pub role: String,
    /// The caller's `teachers.id`, present only for teachers with a profile.
    pub teacher_id: Option<DbId>,
}

impl Caller {
    /// Resolve the teacher profile for `user`. Non-teachers skip the lookup.
    pub async fn resolve<'e, E>(executor: E, user: &AuthUser) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let teacher_id = if user.role == ROLE_TEACHER {
            TeacherRepo::find_by_user_id(executor, user.user_id)
                .await?
                .map(|t| t.id)
        } else {
            None
        };

        Ok(Self {
            user_id: user.user_id,
            role: user.role.clone(),
            teacher_id,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Reject with `Forbidden` unless the caller may change `subject`.
    pub fn ensure_can_manage(&self, subject: &Subject) -> Result<(), CoreError> {
        if may_manage_subject(&self.role, self.teacher_id, subject.teacher_id) {
            return Ok(());
        }
        Err(CoreError::Forbidden(format!(
            "You do not have permission to modify subject {}",
            subject.id
        )))
    }

    /// Reject with `Forbidden` unless the caller may read `subject`.
    pub fn ensure_can_view(&self, subject: &Subject) -> Result<(), CoreError> {
        if may_view_subject(&self.role, self.teacher_id, subject.teacher_id) {
            return Ok(());
        }
        Err(CoreError::Forbidden(format!(
            "You do not have access to subject {}",
            subject.id
        )))
    }

    /// Teacher id that list queries must be scoped to, if any.
    ///
    /// A teacher without a profile is scoped to an id no subject can carry.
    pub fn list_scope(&self) -> Option<DbId> {
        if self.role == ROLE_TEACHER {
            Some(self.teacher_id.unwrap_or(0))
        } else {
            None
        }
    }
}
