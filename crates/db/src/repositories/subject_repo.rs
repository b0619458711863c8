//! Repository for the `subjects` table.

use elearn_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::subject::{CreateSubject, Subject, SubjectFilter, UpdateSubject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, category, teacher_id, created_at, updated_at";

/// Shared WHERE clause for [`SubjectRepo::list`] and [`SubjectRepo::count`].
///
/// `$1` search text, `$2` category, `$3` teacher id; NULL disables a filter.
const FILTER: &str = "($1::TEXT IS NULL \
                        OR title ILIKE '%' || $1 || '%' \
                        OR description ILIKE '%' || $1 || '%') \
                      AND ($2::TEXT IS NULL OR category = $2) \
                      AND ($3::BIGINT IS NULL OR teacher_id = $3)";

/// Provides CRUD operations for subjects.
pub struct SubjectRepo;

impl SubjectRepo {
    /// Insert a new subject, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreateSubject) -> Result<Subject, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO subjects (title, description, category, teacher_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.teacher_id)
            .fetch_one(executor)
            .await
    }

    /// Find a subject by its internal ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Subject>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM subjects WHERE id = $1");
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a subject and hold a row lock on it until the transaction ends.
    ///
    /// Every write to a subject's lessons takes this lock first, which
    /// serializes concurrent reorders on the same subject while leaving other
    /// subjects uncontended.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Subject>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subjects WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List subjects matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &SubjectFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Subject>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subjects WHERE {FILTER} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(&filter.search)
            .bind(&filter.category)
            .bind(filter.teacher_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count subjects matching `filter`.
    pub async fn count(pool: &PgPool, filter: &SubjectFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM subjects WHERE {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(&filter.search)
            .bind(&filter.category)
            .bind(filter.teacher_id)
            .fetch_one(pool)
            .await
    }

    /// Update a subject. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateSubject,
    ) -> Result<Option<Subject>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE subjects SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                category = COALESCE($4, category), \
                teacher_id = COALESCE($5, teacher_id) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.teacher_id)
            .fetch_optional(executor)
            .await
    }

    /// Delete a subject. Its lessons go with it (`ON DELETE CASCADE`).
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
