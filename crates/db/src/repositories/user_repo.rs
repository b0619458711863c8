//! Repository for the `users` table.

use elearn_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::user::{CreateUser, UpdateProfile, User, UserResponse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, full_name, username, email, password_hash, role_id, is_active, \
                        profile_picture, created_at, updated_at";

/// User columns joined with the role name, matching [`UserResponse`].
const SUMMARY: &str = "SELECT u.id, u.full_name, u.username, u.email, r.name AS role, \
                        u.is_active, u.profile_picture, u.created_at \
                       FROM users u JOIN roles r ON r.id = u.role_id";

/// `$1` is the search text or NULL.
const SEARCH: &str = "($1::TEXT IS NULL \
                       OR u.full_name ILIKE '%' || $1 || '%' \
                       OR u.username ILIKE '%' || $1 || '%' \
                       OR u.email ILIKE '%' || $1 || '%')";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreateUser) -> Result<User, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO users (full_name, username, email, password_hash, role_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.full_name)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .fetch_one(executor)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user whose username or email equals `identifier` (case-sensitive).
    pub async fn find_by_identifier(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1 OR email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(identifier)
            .fetch_optional(pool)
            .await
    }

    /// Whether any active user holds the given role.
    pub async fn exists_with_role(pool: &PgPool, role_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE role_id = $1 AND is_active = true)",
        )
        .bind(role_id)
        .fetch_one(pool)
        .await
    }

    /// Update the caller-editable profile fields. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                full_name = COALESCE($2, full_name),
                username = COALESCE($3, username),
                email = COALESCE($4, email),
                profile_picture = COALESCE($5, profile_picture)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.profile_picture)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a user by setting `is_active = false`.
    ///
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Copy a profile's name and email onto its login account.
    ///
    /// `None` leaves a field unchanged. Returns `true` if the row exists.
    pub async fn sync_identity<'e, E>(
        executor: E,
        id: DbId,
        full_name: Option<&str>,
        email: Option<&str>,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE users SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email)
             WHERE id = $1",
        )
        .bind(id)
        .bind(full_name)
        .bind(email)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a user. Teacher and student profiles go with it.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of users with their role names, newest first.
    pub async fn list_summaries(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserResponse>, sqlx::Error> {
        let query = format!(
            "{SUMMARY} WHERE {SEARCH} ORDER BY u.created_at DESC, u.id DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, UserResponse>(&query)
            .bind(search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_summaries(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM users u WHERE {SEARCH}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(search)
            .fetch_one(pool)
            .await
    }

    /// A single user with its role name.
    pub async fn find_summary(pool: &PgPool, id: DbId) -> Result<Option<UserResponse>, sqlx::Error> {
        let query = format!("{SUMMARY} WHERE u.id = $1");
        sqlx::query_as::<_, UserResponse>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
