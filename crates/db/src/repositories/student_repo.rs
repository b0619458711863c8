//! Repository for the `students` table.
//!
//! Profiles are removed together with their user row (`ON DELETE CASCADE`),
//! so there is no delete here; see [`UserRepo::delete`](super::UserRepo::delete).

use elearn_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::student::{CreateStudent, Student, UpdateStudent};

const COLUMNS: &str =
    "id, user_id, full_name, email, nis, class_name, phone, created_at, updated_at";

/// `$1` is the search text or NULL.
const SEARCH: &str = "($1::TEXT IS NULL \
                       OR full_name ILIKE '%' || $1 || '%' \
                       OR nis ILIKE '%' || $1 || '%' \
                       OR class_name ILIKE '%' || $1 || '%' \
                       OR phone ILIKE '%' || $1 || '%')";

/// Provides CRUD operations for student profiles.
pub struct StudentRepo;

impl StudentRepo {
    /// Insert a student profile, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreateStudent) -> Result<Student, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO students (user_id, full_name, email, nis, class_name, phone) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(input.user_id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.nis)
            .bind(&input.class_name)
            .bind(&input.phone)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Student>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = $1");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// One page of students, newest first, optionally filtered by a
    /// case-insensitive search over name, NIS, class and phone.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Student>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM students WHERE {SEARCH} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM students WHERE {SEARCH}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(search)
            .fetch_one(pool)
            .await
    }

    /// Update a student. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateStudent,
    ) -> Result<Option<Student>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE students SET \
                full_name = COALESCE($2, full_name), \
                email = COALESCE($3, email), \
                nis = COALESCE($4, nis), \
                class_name = COALESCE($5, class_name), \
                phone = COALESCE($6, phone) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.nis)
            .bind(&input.class_name)
            .bind(&input.phone)
            .fetch_optional(executor)
            .await
    }
}
