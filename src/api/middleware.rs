/// Bearer-token extraction and session validation helpers
use crate::{
    auth::session::SessionClaims,
    context::AppContext,
    error::{ApiError, ApiResult},
};
use axum::http::HeaderMap;

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

/// Require a valid session token - decode it or return 401
pub fn require_session(ctx: &AppContext, headers: &HeaderMap) -> ApiResult<SessionClaims> {
    let token = extract_bearer_token(headers)
        .ok_or_else(|| ApiError::InvalidToken("Missing authorization header".to_string()))?;

    ctx.auth.sessions().decode(&token)
}
