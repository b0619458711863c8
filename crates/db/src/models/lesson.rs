//! Lesson ("materi pelajaran") model and DTOs.
//!
//! `sort_order` is owned by the ordering protocol: it is assigned on insert
//! and only changed through range shifts, never through a plain update.

use elearn_core::types::{DbId, SortOrder, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `lessons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lesson {
    pub id: DbId,
    pub subject_id: DbId,
    pub title: String,
    pub body: Option<String>,
    /// URLs of attached media.
    pub files: Vec<String>,
    pub sort_order: SortOrder,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Content fields for a new lesson. The subject and order are supplied
/// separately by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLesson {
    pub title: String,
    pub body: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

/// Content patch for a lesson. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLesson {
    pub title: Option<String>,
    pub body: Option<String>,
    pub files: Option<Vec<String>>,
}
