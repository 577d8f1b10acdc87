/// User management
///
/// Handles user creation, lookup, rename, activation, and soft deletion.

mod manager;

pub use manager::UserManager;

use crate::db::models::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: Option<String>,
}

/// User update request (rename and/or activation toggle)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub id: String,
    pub username: String,
    pub is_active: bool,
}

/// Outward-facing user representation
///
/// Never carries credential material; hashes and reset tokens stay inside
/// the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
