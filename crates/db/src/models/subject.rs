//! Subject ("mata pelajaran") model and DTOs.
//!
//! A subject is owned by one teacher and holds an ordered list of lessons.

use elearn_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::lesson::Lesson;

/// A row from the `subjects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subject {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub teacher_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A subject together with its lessons in display order.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectWithLessons {
    #[serde(flatten)]
    pub subject: Subject,
    pub lessons: Vec<Lesson>,
}

/// DTO for creating a subject.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubject {
    pub title: String,
    pub description: String,
    pub category: String,
    pub teacher_id: DbId,
}

/// DTO for updating a subject. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub teacher_id: Option<DbId>,
}

/// Filters for listing subjects.
#[derive(Debug, Clone, Default)]
pub struct SubjectFilter {
    /// Case-insensitive match on title or description.
    pub search: Option<String>,
    pub category: Option<String>,
    pub teacher_id: Option<DbId>,
}
