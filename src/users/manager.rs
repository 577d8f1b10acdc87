/// User manager implementation using runtime queries
use crate::{
    db::models::User,
    error::{ApiError, ApiResult},
    users::{CreateUserRequest, UpdateUserRequest},
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::ValidateEmail;

/// Marker appended to the username on soft deletion
const DELETED_MARKER: &str = "[deleted]";

/// Users listed per page
const PAGE_SIZE: i64 = 20;

/// User management service
pub struct UserManager {
    db: SqlitePool,
}

impl UserManager {
    /// Create a new user manager
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a new user
    pub async fn create_user(&self, req: CreateUserRequest) -> ApiResult<User> {
        let username = validate_username(&req.username)?;

        if let Some(ref email) = req.email {
            validate_email(email)?;
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            username,
            email: req.email,
            is_active: true,
            created_at: now,
            updated_at: None,
            deleted_at: None,
        };

        sqlx::query(
            "INSERT INTO users (id, username, email, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("User already exists".to_string())
            } else {
                ApiError::Database(e)
            }
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, "user created");

        Ok(user)
    }

    /// Get an active, non-deleted user by username
    pub async fn get_user(&self, username: &str) -> ApiResult<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, is_active, created_at, updated_at, deleted_at
             FROM users
             WHERE username = ?1 AND is_active = 1 AND deleted_at IS NULL",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// List active users, ordered by username, one page at a time
    pub async fn list_users(&self, page: i64) -> ApiResult<Vec<User>> {
        let page = page.max(1);

        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, is_active, created_at, updated_at, deleted_at
             FROM users
             WHERE is_active = 1 AND deleted_at IS NULL
             ORDER BY username ASC
             LIMIT ?1 OFFSET ?2",
        )
        .bind(PAGE_SIZE)
        .bind((page - 1) * PAGE_SIZE)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(users)
    }

    /// Rename a user and/or toggle its active flag
    ///
    /// The new username must not be taken by another user.
    pub async fn update_user(&self, req: UpdateUserRequest) -> ApiResult<User> {
        let mut user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, is_active, created_at, updated_at, deleted_at
             FROM users WHERE id = ?1 AND deleted_at IS NULL",
        )
        .bind(&req.id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let username = validate_username(&req.username)?;

        // Check if the new username is already taken by another user
        let taken: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?1 AND id <> ?2")
                .bind(&username)
                .bind(&req.id)
                .fetch_one(&self.db)
                .await
                .map_err(ApiError::Database)?;

        if taken > 0 {
            return Err(ApiError::Conflict("User already exists".to_string()));
        }

        let now = Utc::now();
        sqlx::query("UPDATE users SET username = ?1, is_active = ?2, updated_at = ?3 WHERE id = ?4")
            .bind(&username)
            .bind(req.is_active)
            .bind(now)
            .bind(&req.id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        user.username = username;
        user.is_active = req.is_active;
        user.updated_at = Some(now);

        tracing::info!(user_id = %user.id, "user updated");

        Ok(user)
    }

    /// Soft-delete a user
    ///
    /// Deactivates the row, appends the deletion marker to the username, and
    /// stamps `deleted_at`. Rows are never hard-deleted.
    pub async fn delete_user(&self, username: &str) -> ApiResult<User> {
        let mut user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, is_active, created_at, updated_at, deleted_at
             FROM users WHERE username = ?1 AND deleted_at IS NULL",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let now = Utc::now();
        let tombstone = format!("{}{}", user.username, DELETED_MARKER);

        sqlx::query(
            "UPDATE users SET is_active = 0, username = ?1, deleted_at = ?2 WHERE id = ?3",
        )
        .bind(&tombstone)
        .bind(now)
        .bind(&user.id)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        user.username = tombstone;
        user.is_active = false;
        user.deleted_at = Some(now);

        tracing::info!(user_id = %user.id, "user soft-deleted");

        Ok(user)
    }
}

/// Normalize and validate a username
///
/// Trims, lowercases, and enforces length 3..=254 over the charset
/// `[a-z0-9._-]`. The deletion marker is rejected outright so a live
/// username can never collide with a tombstone.
pub fn validate_username(username: &str) -> ApiResult<String> {
    let username = username.trim().to_lowercase();

    if username.len() <= 2 {
        return Err(ApiError::Validation(
            "Username should be more than 2 characters".to_string(),
        ));
    }
    if username.len() >= 255 {
        return Err(ApiError::Validation(
            "Username should be less than 255 characters".to_string(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '_'))
        || username.contains(DELETED_MARKER)
    {
        return Err(ApiError::Validation(
            "Username must be alphanumeric, underscore and dots only".to_string(),
        ));
    }

    Ok(username)
}

/// Validate an email address
pub fn validate_email(email: &str) -> ApiResult<()> {
    if !email.validate_email() {
        return Err(ApiError::Validation("Email format is invalid.".to_string()));
    }

    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
