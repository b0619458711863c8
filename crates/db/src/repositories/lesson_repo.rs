//! Repository for the `lessons` table.
//!
//! These are the storage primitives of the lesson ordering protocol. None of
//! them keeps `sort_order` dense on its own; callers combine them inside one
//! transaction that holds the subject lock
//! (see [`SubjectRepo::lock_for_update`](super::SubjectRepo::lock_for_update)).

use elearn_core::ordering::RangeShift;
use elearn_core::types::{DbId, SortOrder};
use sqlx::{PgExecutor, PgPool};

use crate::models::lesson::{CreateLesson, Lesson, UpdateLesson};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, subject_id, title, body, files, sort_order, created_at, updated_at";

/// Shared search clause for paged listing. `$2` is the search text or NULL.
const SEARCH: &str = "($2::TEXT IS NULL \
                       OR title ILIKE '%' || $2 || '%' \
                       OR body ILIKE '%' || $2 || '%')";

/// Provides ordering-aware storage operations for lessons.
pub struct LessonRepo;

impl LessonRepo {
    /// Highest `sort_order` in a subject, or `None` if it has no lessons.
    pub async fn find_max_order<'e, E>(
        executor: E,
        subject_id: DbId,
    ) -> Result<Option<SortOrder>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, Option<SortOrder>>(
            "SELECT MAX(sort_order) FROM lessons WHERE subject_id = $1",
        )
        .bind(subject_id)
        .fetch_one(executor)
        .await
    }

    /// Number of lessons in a subject.
    pub async fn count_by_subject<'e, E>(executor: E, subject_id: DbId) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM lessons WHERE subject_id = $1")
            .bind(subject_id)
            .fetch_one(executor)
            .await
    }

    /// Find a lesson by id, scoped to its subject.
    pub async fn find_in_subject<'e, E>(
        executor: E,
        subject_id: DbId,
        id: DbId,
    ) -> Result<Option<Lesson>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM lessons WHERE id = $1 AND subject_id = $2");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .bind(subject_id)
            .fetch_optional(executor)
            .await
    }

    /// All lessons of a subject in display order.
    pub async fn list_by_subject<'e, E>(
        executor: E,
        subject_id: DbId,
    ) -> Result<Vec<Lesson>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM lessons WHERE subject_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(subject_id)
            .fetch_all(executor)
            .await
    }

    /// `(id, sort_order)` pairs of a subject's lessons in display order.
    pub async fn list_orders<'e, E>(
        executor: E,
        subject_id: DbId,
    ) -> Result<Vec<(DbId, SortOrder)>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, (DbId, SortOrder)>(
            "SELECT id, sort_order FROM lessons WHERE subject_id = $1 ORDER BY sort_order, id",
        )
        .bind(subject_id)
        .fetch_all(executor)
        .await
    }

    /// One page of a subject's lessons in display order, optionally filtered by
    /// a case-insensitive search over title and body.
    pub async fn list_page(
        pool: &PgPool,
        subject_id: DbId,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lesson>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lessons \
             WHERE subject_id = $1 AND {SEARCH} \
             ORDER BY sort_order, id \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(subject_id)
            .bind(search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count the lessons [`list_page`](Self::list_page) would page through.
    pub async fn count_page(
        pool: &PgPool,
        subject_id: DbId,
        search: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM lessons WHERE subject_id = $1 AND {SEARCH}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(subject_id)
            .bind(search)
            .fetch_one(pool)
            .await
    }

    /// Insert a lesson at an explicit `sort_order`, returning the created row.
    pub async fn create_with_order<'e, E>(
        executor: E,
        subject_id: DbId,
        input: &CreateLesson,
        sort_order: SortOrder,
    ) -> Result<Lesson, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO lessons (subject_id, title, body, files, sort_order) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(subject_id)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.files)
            .bind(sort_order)
            .fetch_one(executor)
            .await
    }

    /// Patch a lesson's content fields. `sort_order` is left untouched.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_content<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateLesson,
    ) -> Result<Option<Lesson>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE lessons SET \
                title = COALESCE($2, title), \
                body = COALESCE($3, body), \
                files = COALESCE($4, files) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.files)
            .fetch_optional(executor)
            .await
    }

    /// Set one lesson's `sort_order`, returning the updated row.
    pub async fn update_order<'e, E>(
        executor: E,
        id: DbId,
        sort_order: SortOrder,
    ) -> Result<Option<Lesson>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("UPDATE lessons SET sort_order = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .bind(sort_order)
            .fetch_optional(executor)
            .await
    }

    /// Add `shift.delta` to every lesson of the subject whose order lies in
    /// `shift.low..=shift.high`. Returns the number of lessons moved.
    pub async fn shift_order_range<'e, E>(
        executor: E,
        subject_id: DbId,
        shift: &RangeShift,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE lessons SET sort_order = sort_order + $4 \
             WHERE subject_id = $1 AND sort_order BETWEEN $2 AND $3",
        )
        .bind(subject_id)
        .bind(shift.low)
        .bind(shift.high)
        .bind(shift.delta)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete a lesson. Returns `true` if a row was deleted.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
