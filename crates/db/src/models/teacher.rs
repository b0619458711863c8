//! Teacher profile model and DTOs.

use elearn_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `teachers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Teacher {
    pub id: DbId,
    pub user_id: DbId,
    pub full_name: String,
    pub email: String,
    /// Staff registration number.
    pub nrk: String,
    pub phone: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a teacher profile for an existing user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeacher {
    pub user_id: DbId,
    pub full_name: String,
    pub email: String,
    pub nrk: String,
    pub phone: String,
}

/// DTO for patching a teacher profile. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTeacher {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub nrk: Option<String>,
    pub phone: Option<String>,
}
