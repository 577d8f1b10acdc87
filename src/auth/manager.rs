/// Auth core: credential seeding, reset-token issuance and consumption, login
///
/// Uses runtime sqlx queries so no DATABASE_URL is needed at compile time.
use crate::{
    auth::{
        hasher::PasswordHasher,
        session::SessionTokenIssuer,
        token::{self, DEFAULT_TOKEN_LENGTH},
    },
    config::AuthConfig,
    db::models::Credential,
    error::{ApiError, ApiResult},
};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Special characters accepted by the password policy
const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Auth core service
pub struct AuthManager {
    db: SqlitePool,
    hasher: PasswordHasher,
    sessions: SessionTokenIssuer,
}

impl AuthManager {
    /// Create a new auth manager from configuration
    pub fn new(db: SqlitePool, config: &AuthConfig) -> ApiResult<Self> {
        let sessions = SessionTokenIssuer::new(
            config.jwt_secret.clone(),
            &config.jwt_algorithm,
            config.session_ttl_secs,
        )?;

        Ok(Self {
            db,
            hasher: PasswordHasher::new(config.password_salt.clone()),
            sessions,
        })
    }

    pub fn sessions(&self) -> &SessionTokenIssuer {
        &self.sessions
    }

    /// Seed a credential for a freshly created user
    ///
    /// Stores a hashed generated password and a fresh reset token, so the
    /// account is claimed by consuming the token, never by a default
    /// password. Returns the reset token.
    pub async fn seed_credential(&self, user_id: &str) -> ApiResult<String> {
        let generated = token::generate_password(DEFAULT_TOKEN_LENGTH);
        let reset_token = token::random_token(DEFAULT_TOKEN_LENGTH);
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO credentials (id, user_id, password_hash, active, reset_token, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(self.hasher.hash(&generated))
        .bind(true)
        .bind(&reset_token)
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        tracing::info!(user_id, "credential seeded");

        Ok(reset_token)
    }

    /// Rotate the reset token on a user's active credential
    ///
    /// Last writer wins; only consumption needs the compare-and-set guard.
    pub async fn issue_reset_token(&self, user_id: &str) -> ApiResult<String> {
        let reset_token = token::random_token(DEFAULT_TOKEN_LENGTH);

        let result = sqlx::query(
            "UPDATE credentials SET reset_token = ?1, updated_at = ?2
             WHERE user_id = ?3 AND active = 1 AND deleted_at IS NULL",
        )
        .bind(&reset_token)
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Credential not found".to_string()));
        }

        tracing::info!(user_id, "reset token issued");

        Ok(reset_token)
    }

    /// Consume a reset token and set a new password
    ///
    /// Token and username must jointly match; a valid token presented for the
    /// wrong user fails with the same error as a wrong token, so the response
    /// never reveals which half was wrong.
    pub async fn password_reset(
        &self,
        username: &str,
        reset_token: &str,
        new_password: &str,
        new_password_confirm: &str,
    ) -> ApiResult<String> {
        // The blank sentinel means "no outstanding reset" and must never match
        if reset_token.is_empty() {
            return Err(ApiError::NotFound("Invalid link".to_string()));
        }

        let user = sqlx::query("SELECT id FROM users WHERE username = ?1 AND deleted_at IS NULL")
            .bind(username)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::Database)?
            .ok_or_else(|| ApiError::NotFound("Invalid link".to_string()))?;

        let user_id: String = user.get("id");

        let credential = sqlx::query_as::<_, Credential>(
            "SELECT id, user_id, password_hash, active, reset_token, created_at, updated_at, deleted_at
             FROM credentials
             WHERE user_id = ?1 AND reset_token = ?2 AND reset_token <> ''
               AND active = 1 AND deleted_at IS NULL",
        )
        .bind(&user_id)
        .bind(reset_token)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound("Invalid link".to_string()))?;

        if new_password != new_password_confirm {
            return Err(ApiError::Mismatch);
        }

        validate_password_strength(new_password)?;

        // Compare-and-set on the original token value: of two concurrent
        // consumptions, only one can see a non-zero row count.
        let result = sqlx::query(
            "UPDATE credentials SET password_hash = ?1, reset_token = '', updated_at = ?2
             WHERE id = ?3 AND reset_token = ?4",
        )
        .bind(self.hasher.hash(new_password))
        .bind(Utc::now())
        .bind(&credential.id)
        .bind(reset_token)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Invalid link".to_string()));
        }

        tracing::info!(user_id, "password reset completed");

        Ok("Your password has been set.".to_string())
    }

    /// Verify credentials and mint a session token
    ///
    /// Unknown username, inactive account, and wrong password all surface the
    /// identical `InvalidCredentials` error.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        let user = sqlx::query(
            "SELECT id, username FROM users
             WHERE username = ?1 AND is_active = 1 AND deleted_at IS NULL",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?;

        let Some(user) = user else {
            tracing::warn!(username, "login rejected");
            return Err(ApiError::InvalidCredentials);
        };

        let user_id: String = user.get("id");
        let canonical_username: String = user.get("username");

        let credential = sqlx::query_as::<_, Credential>(
            "SELECT id, user_id, password_hash, active, reset_token, created_at, updated_at, deleted_at
             FROM credentials
             WHERE user_id = ?1 AND active = 1 AND deleted_at IS NULL",
        )
        .bind(&user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?;

        let Some(credential) = credential else {
            tracing::warn!(username, "login rejected");
            return Err(ApiError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &credential.password_hash) {
            tracing::warn!(username, "login rejected");
            return Err(ApiError::InvalidCredentials);
        }

        tracing::info!(user_id, "login succeeded");

        self.sessions.encode(&user_id, &canonical_username)
    }
}

/// Password strength policy
///
/// Length over 8, at least one lowercase letter, one uppercase letter, one
/// digit, and one special character.
pub fn validate_password_strength(password: &str) -> ApiResult<()> {
    if password.len() <= 8 {
        return Err(ApiError::WeakPassword(
            "Password should be more than 8 characters".to_string(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_lowercase())
        || !password.chars().any(|c| c.is_ascii_uppercase())
        || !password.chars().any(|c| c.is_ascii_digit())
        || !password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
    {
        return Err(ApiError::WeakPassword(
            "Password must have at least one uppercase letter, one lowercase letter, \
             one number, and one special character"
                .to_string(),
        ));
    }

    Ok(())
}
