//! First-run provisioning of an admin account.

use elearn_core::error::CoreError;
use elearn_core::roles::ROLE_ID_ADMIN;
use elearn_db::models::user::CreateUser;
use elearn_db::repositories::UserRepo;
use elearn_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured admin unless an active admin already exists.
///
/// Returns `true` when an account was created.
pub async fn ensure_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<bool> {
    if UserRepo::exists_with_role(pool, ROLE_ID_ADMIN).await? {
        return Ok(false);
    }

    validate_password_strength(&admin.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            full_name: "Administrator".into(),
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash,
            role_id: ROLE_ID_ADMIN,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap admin created");
    Ok(true)
}
