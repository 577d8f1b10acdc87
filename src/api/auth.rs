/// Authentication endpoints
use crate::{
    api::middleware,
    auth::{
        session::SessionClaims, LoginRequest, LoginResponse, PasswordResetMessage,
        PasswordResetRequest,
    },
    context::AppContext,
    error::ApiResult,
};
use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, patch, post},
    Json, Router,
};

/// Build auth routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/auth/password", patch(password_reset))
        .route("/auth/login", post(login))
        .route("/auth/session", get(get_session))
}

/// Consume a reset token and set a new password
async fn password_reset(
    State(ctx): State<AppContext>,
    Json(req): Json<PasswordResetRequest>,
) -> ApiResult<Json<PasswordResetMessage>> {
    let message = ctx
        .auth
        .password_reset(
            &req.username,
            &req.reset_token,
            &req.new_password,
            &req.new_password_confirm,
        )
        .await?;

    Ok(Json(PasswordResetMessage { message }))
}

/// Login endpoint
async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let access_token = ctx.auth.login(&req.username, &req.password).await?;

    Ok(Json(LoginResponse { access_token }))
}

/// Decode the bearer session token and return its claims
async fn get_session(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> ApiResult<Json<SessionClaims>> {
    let claims = middleware::require_session(&ctx, &headers)?;

    Ok(Json(claims))
}
