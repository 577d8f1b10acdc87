/// Router-level integration tests
///
/// Drive the full axum router over an in-memory database, covering the
/// account lifecycle and the reset/login/session flow end to end.
use accountd::{
    config::{
        AppConfig, AuthConfig, CorsConfig, LoggingConfig, ServiceConfig, StorageConfig,
    },
    context::AppContext,
    server,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::PathBuf;
use tower::ServiceExt;

fn test_config() -> AppConfig {
    AppConfig {
        service: ServiceConfig {
            host: "localhost".to_string(),
            port: 0,
            version: "0.1.0".to_string(),
        },
        storage: StorageConfig {
            data_directory: PathBuf::from("./data"),
            account_db: PathBuf::from(":memory:"),
        },
        auth: AuthConfig {
            password_salt: "test-salt".to_string(),
            jwt_secret: "test-secret-key-for-testing-only!!".to_string(),
            jwt_algorithm: "HS256".to_string(),
            session_ttl_secs: 3600,
        },
        cors: CorsConfig {
            allow_origins: vec!["*".to_string()],
        },
        logging: LoggingConfig {
            level: "info".to_string(),
        },
    }
}

async fn test_context() -> AppContext {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();
    accountd::db::run_migrations(&pool).await.unwrap();

    AppContext::with_pool(test_config(), pool).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_user(router: &Router, username: &str) -> Value {
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/user",
            json!({ "username": username, "email": format!("{}@example.com", username) }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Reset tokens are delivered out of band, so tests read them straight from
/// the credential row like an operator would.
async fn reset_token_for(ctx: &AppContext, user_id: &str) -> String {
    sqlx::query_scalar("SELECT reset_token FROM credentials WHERE user_id = ?1 AND active = 1")
        .bind(user_id)
        .fetch_one(&ctx.db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = test_context().await;
    let router = server::build_router(ctx);

    let response = router.clone().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");

    let response = router.oneshot(get_request("/health/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_user_shape() {
    let ctx = test_context().await;
    let router = server::build_router(ctx);

    let body = create_user(&router, "test321").await;
    assert!(body["id"].is_string());
    assert_eq!(body["username"], "test321");
    assert_eq!(body["is_active"], true);
    assert!(body["created_at"].is_string());
    assert!(body.get("password_hash").is_none());
    assert!(body.get("reset_token").is_none());
}

#[tokio::test]
async fn test_create_user_validation_and_conflict() {
    let ctx = test_context().await;
    let router = server::build_router(ctx);

    let response = router
        .clone()
        .oneshot(json_request("POST", "/user", json!({ "username": "t" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router
        .clone()
        .oneshot(json_request("POST", "/user", json!({ "username": "ttt&" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    create_user(&router, "test321").await;
    let response = router
        .oneshot(json_request("POST", "/user", json!({ "username": "test321" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_password_reset_and_login_flow() {
    let ctx = test_context().await;
    let router = server::build_router(ctx.clone());

    let user = create_user(&router, "flowuser").await;
    let user_id = user["id"].as_str().unwrap().to_string();
    let token = reset_token_for(&ctx, &user_id).await;

    // Consume the reset token
    let response = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/auth/password",
            json!({
                "username": "flowuser",
                "reset_token": token,
                "new_password": "Secret123#!",
                "new_password_confirm": "Secret123#!",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Your password has been set.");

    // A second consumption fails: the token was cleared
    let response = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/auth/password",
            json!({
                "username": "flowuser",
                "reset_token": token,
                "new_password": "Another123!",
                "new_password_confirm": "Another123!",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid link");

    // Login with the new password
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({ "username": "flowuser", "password": "Secret123#!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let access_token = body["access_token"].as_str().unwrap().to_string();
    assert!(!access_token.is_empty());

    // The bearer token decodes back to the subject
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/session")
                .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let claims = body_json(response).await;
    assert_eq!(claims["sub"], user_id.as_str());
    assert_eq!(claims["username"], "flowuser");
}

#[tokio::test]
async fn test_login_failures_share_status_and_message() {
    let ctx = test_context().await;
    let router = server::build_router(ctx.clone());

    let user = create_user(&router, "flowuser").await;
    let user_id = user["id"].as_str().unwrap().to_string();
    let token = reset_token_for(&ctx, &user_id).await;
    router
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/auth/password",
            json!({
                "username": "flowuser",
                "reset_token": token,
                "new_password": "Secret123#!",
                "new_password_confirm": "Secret123#!",
            }),
        ))
        .await
        .unwrap();

    let wrong_password = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({ "username": "flowuser", "password": "WrongPass1!" }),
        ))
        .await
        .unwrap();
    let unknown_user = router
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({ "username": "nobody", "password": "Secret123#!" }),
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(wrong_password).await,
        body_json(unknown_user).await
    );
}

#[tokio::test]
async fn test_reset_error_branches() {
    let ctx = test_context().await;
    let router = server::build_router(ctx.clone());

    let user = create_user(&router, "flowuser").await;
    let user_id = user["id"].as_str().unwrap().to_string();
    let token = reset_token_for(&ctx, &user_id).await;

    // Confirmation mismatch
    let response = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/auth/password",
            json!({
                "username": "flowuser",
                "reset_token": token,
                "new_password": "Abcdef12!",
                "new_password_confirm": "Abcdef13!",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Passwords don't match");

    // Weak password
    let response = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/auth/password",
            json!({
                "username": "flowuser",
                "reset_token": token,
                "new_password": "secret",
                "new_password_confirm": "secret",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "WeakPassword");

    // Wrong token
    let response = router
        .oneshot(json_request(
            "PATCH",
            "/auth/password",
            json!({
                "username": "flowuser",
                "reset_token": "definitely-not-the-token",
                "new_password": "Secret123#!",
                "new_password_confirm": "Secret123#!",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid link");
}

#[tokio::test]
async fn test_user_lifecycle() {
    let ctx = test_context().await;
    let router = server::build_router(ctx);

    create_user(&router, "alice").await;
    create_user(&router, "bob").await;

    // Listing is ordered by username
    let response = router.clone().oneshot(get_request("/users/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["alice", "bob"]);

    // Soft delete hides the user
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/user/alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "alice[deleted]");
    assert_eq!(body["is_active"], false);

    let response = router.oneshot(get_request("/user/alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_user_cannot_login() {
    let ctx = test_context().await;
    let router = server::build_router(ctx.clone());

    let user = create_user(&router, "alice").await;
    let user_id = user["id"].as_str().unwrap().to_string();
    let token = reset_token_for(&ctx, &user_id).await;
    router
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/auth/password",
            json!({
                "username": "alice",
                "reset_token": token,
                "new_password": "Secret123#!",
                "new_password_confirm": "Secret123#!",
            }),
        ))
        .await
        .unwrap();

    router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/user/alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let response = router
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({ "username": "alice", "password": "Secret123#!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_requires_valid_token() {
    let ctx = test_context().await;
    let router = server::build_router(ctx);

    let response = router
        .clone()
        .oneshot(get_request("/auth/session"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/auth/session")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "InvalidToken");
}
