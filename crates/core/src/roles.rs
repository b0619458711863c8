//! Well-known role names and the subject ownership rule.
//!
//! Names and ids must match the seed rows in `20260301000001_create_users.sql`.

use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_TEACHER: &str = "teacher";
pub const ROLE_STUDENT: &str = "student";

/// Seeded `roles.id` values.
pub const ROLE_ID_ADMIN: DbId = 1;
pub const ROLE_ID_TEACHER: DbId = 2;
pub const ROLE_ID_STUDENT: DbId = 3;

/// Whether a caller may change a subject and its lessons.
///
/// Admins may change any subject. Teachers only the subjects assigned to
/// their own teacher profile (`caller_teacher_id`). Everyone else is read-only.
pub fn may_manage_subject(
    role: &str,
    caller_teacher_id: Option<DbId>,
    owner_teacher_id: DbId,
) -> bool {
    match role {
        ROLE_ADMIN => true,
        ROLE_TEACHER => caller_teacher_id == Some(owner_teacher_id),
        _ => false,
    }
}

/// Whether a caller may read a subject and its lessons.
///
/// Teachers are scoped to their own subjects; admins and students see all.
pub fn may_view_subject(
    role: &str,
    caller_teacher_id: Option<DbId>,
    owner_teacher_id: DbId,
) -> bool {
    match role {
        ROLE_TEACHER => caller_teacher_id == Some(owner_teacher_id),
        _ => true,
    }
}
