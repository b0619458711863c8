//! Access tokens for school accounts.
//!
//! A token is an HS256-signed JWT naming the account (`sub`) and the role it
//! logged in with. Handlers trust the role claim for coarse RBAC; subject
//! ownership is always re-checked against the database (see
//! [`crate::access`]). There are no refresh tokens: clients log in again
//! once `exp` passes.

use elearn_core::roles::{ROLE_ADMIN, ROLE_STUDENT, ROLE_TEACHER};
use elearn_core::types::DbId;
use jsonwebtoken::errors::{Error, ErrorKind};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// `users.id` of the account.
    pub sub: DbId,
    /// `"admin"`, `"teacher"` or `"student"`.
    pub role: String,
    /// Expiry, UTC Unix seconds.
    pub exp: i64,
    /// Issue time, UTC Unix seconds.
    pub iat: i64,
    /// Random token id, logged for audit.
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret shared by signing and verification.
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty) and `JWT_ACCESS_EXPIRY_MINS`
    /// (default 60).
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or the expiry is not an integer.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Token lifetime in seconds, as reported to clients on login.
    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }
}

fn is_school_role(role: &str) -> bool {
    matches!(role, ROLE_ADMIN | ROLE_TEACHER | ROLE_STUDENT)
}

/// Issue an access token for an account that just logged in.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: now + config.expires_in_secs(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature and expiry, and reject tokens whose role is not one of
/// the school roles.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, Error> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?
    .claims;

    if !is_school_role(&claims.role) {
        return Err(ErrorKind::InvalidToken.into());
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "kunci-rahasia-sekolah-yang-cukup-panjang".to_string(),
            access_token_expiry_mins: 60,
        }
    }

    fn sign(claims: &Claims, config: &JwtConfig) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn every_school_role_round_trips() {
        let config = config();
        for role in [ROLE_ADMIN, ROLE_TEACHER, ROLE_STUDENT] {
            let token = generate_access_token(7, role, &config).unwrap();
            let claims = validate_token(&token, &config).unwrap();
            assert_eq!(claims.sub, 7);
            assert_eq!(claims.role, role);
            assert_eq!(claims.exp - claims.iat, config.expires_in_secs());
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        let config = config();
        let token = generate_access_token(7, "kepala_sekolah", &config).unwrap();
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config();
        // Past the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let token = sign(
            &Claims {
                sub: 1,
                role: ROLE_STUDENT.to_string(),
                exp: now - 300,
                iat: now - 600,
                jti: Uuid::new_v4().to_string(),
            },
            &config,
        );
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn token_from_another_deployment_is_rejected() {
        let other = JwtConfig {
            secret: "kunci-server-lain".to_string(),
            ..config()
        };
        let token = generate_access_token(1, ROLE_ADMIN, &other).unwrap();
        assert!(validate_token(&token, &config()).is_err());
    }

    #[test]
    fn expiry_is_reported_in_seconds() {
        assert_eq!(config().expires_in_secs(), 3600);
    }
}
