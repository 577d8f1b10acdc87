/// User CRUD endpoints
use crate::{
    context::AppContext,
    error::ApiResult,
    users::{CreateUserRequest, UpdateUserRequest, UserView},
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

/// Build user routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/user", post(create_user).put(update_user))
        .route("/user/:username", get(read_user).delete(delete_user))
        .route("/users/:page", get(read_all_users))
}

/// Create user endpoint
///
/// Creates the user row and seeds its credential: a hashed generated
/// password plus a fresh reset token, so the account is claimed through the
/// reset flow rather than a default password. The token itself is delivered
/// out of band and never appears in the response.
async fn create_user(
    State(ctx): State<AppContext>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<Json<UserView>> {
    let user = ctx.users.create_user(req).await?;
    ctx.auth.seed_credential(&user.id).await?;

    Ok(Json(user.into()))
}

/// Read one active user by username
async fn read_user(
    State(ctx): State<AppContext>,
    Path(username): Path<String>,
) -> ApiResult<Json<UserView>> {
    let user = ctx.users.get_user(&username).await?;

    Ok(Json(user.into()))
}

/// List active users, one page at a time
async fn read_all_users(
    State(ctx): State<AppContext>,
    Path(page): Path<i64>,
) -> ApiResult<Json<Vec<UserView>>> {
    let users = ctx.users.list_users(page).await?;

    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// Rename / (de)activate endpoint
async fn update_user(
    State(ctx): State<AppContext>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserView>> {
    let user = ctx.users.update_user(req).await?;

    Ok(Json(user.into()))
}

/// Soft-delete endpoint
async fn delete_user(
    State(ctx): State<AppContext>,
    Path(username): Path<String>,
) -> ApiResult<Json<UserView>> {
    let user = ctx.users.delete_user(&username).await?;

    Ok(Json(user.into()))
}
