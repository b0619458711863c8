//! Repository for the `teachers` table.

use elearn_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::teacher::{CreateTeacher, Teacher, UpdateTeacher};

const COLUMNS: &str = "id, user_id, full_name, email, nrk, phone, created_at, updated_at";

/// `$1` is the search text or NULL.
const SEARCH: &str = "($1::TEXT IS NULL \
                       OR full_name ILIKE '%' || $1 || '%' \
                       OR email ILIKE '%' || $1 || '%' \
                       OR nrk ILIKE '%' || $1 || '%' \
                       OR phone ILIKE '%' || $1 || '%')";

/// Provides CRUD operations for teacher profiles.
pub struct TeacherRepo;

impl TeacherRepo {
    /// Insert a teacher profile, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreateTeacher) -> Result<Teacher, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO teachers (user_id, full_name, email, nrk, phone) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Teacher>(&query)
            .bind(input.user_id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.nrk)
            .bind(&input.phone)
            .fetch_one(executor)
            .await
    }

    /// Find a teacher by its internal ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Teacher>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM teachers WHERE id = $1");
        sqlx::query_as::<_, Teacher>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find the teacher profile belonging to a user account.
    pub async fn find_by_user_id<'e, E>(
        executor: E,
        user_id: DbId,
    ) -> Result<Option<Teacher>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM teachers WHERE user_id = $1");
        sqlx::query_as::<_, Teacher>(&query)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// One page of teachers ordered by name, optionally filtered by a
    /// case-insensitive search over name, email, NRK and phone.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Teacher>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM teachers WHERE {SEARCH} \
             ORDER BY full_name, id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Teacher>(&query)
            .bind(search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM teachers WHERE {SEARCH}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(search)
            .fetch_one(pool)
            .await
    }

    /// Update a teacher. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateTeacher,
    ) -> Result<Option<Teacher>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE teachers SET \
                full_name = COALESCE($2, full_name), \
                email = COALESCE($3, email), \
                nrk = COALESCE($4, nrk), \
                phone = COALESCE($5, phone) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Teacher>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.nrk)
            .bind(&input.phone)
            .fetch_optional(executor)
            .await
    }

    /// Number of subjects assigned to a teacher.
    pub async fn count_subjects<'e, E>(executor: E, id: DbId) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subjects WHERE teacher_id = $1")
            .bind(id)
            .fetch_one(executor)
            .await
    }
}
