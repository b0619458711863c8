//! Repository for the `roles` lookup table.

use elearn_core::types::DbId;
use sqlx::PgExecutor;

/// Read access to roles.
pub struct RoleRepo;

impl RoleRepo {
    /// Resolve a role id to its name.
    ///
    /// Fails with `RowNotFound` if the id does not exist.
    pub async fn resolve_name<'e, E>(executor: E, role_id: DbId) -> Result<String, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, String>("SELECT name FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_one(executor)
            .await
    }
}
