//! Student profile model and DTOs.

use elearn_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `students` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: DbId,
    pub user_id: DbId,
    pub full_name: String,
    pub email: String,
    /// School registration number.
    pub nis: String,
    pub class_name: String,
    pub phone: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a student profile for an existing user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudent {
    pub user_id: DbId,
    pub full_name: String,
    pub email: String,
    pub nis: String,
    pub class_name: String,
    pub phone: String,
}

/// DTO for patching a student profile. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStudent {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub nis: Option<String>,
    pub class_name: Option<String>,
    pub phone: Option<String>,
}
