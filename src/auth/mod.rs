/// Authentication subsystem
///
/// Password hashing, security-token generation, reset-token issuance and
/// consumption, login, and session-token encode/decode.

pub mod hasher;
mod manager;
pub mod session;
pub mod token;

pub use manager::{validate_password_strength, AuthManager};

use serde::{Deserialize, Serialize};

/// Password reset consumption request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub username: String,
    pub reset_token: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

/// Password reset confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetMessage {
    pub message: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response carrying the bearer session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}
