//! Basic authentication and account endpoints.

use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_requests_without_credentials_are_rejected() {
    let ctx = bootstrap_context().await;
    let app = create_test_app(&ctx).await;

    let (status, body) = call(&app, "GET", "/api/v1/projects", None, None).await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = call(
        &app,
        "GET",
        "/api/v1/projects",
        Some((ADMIN_EMAIL, "wrong-password")),
        None,
    )
    .await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
async fn test_health_needs_no_credentials() {
    let ctx = bootstrap_context().await;
    let app = create_test_app(&ctx).await;

    let (status, body) = call(&app, "GET", "/api/v1/health", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
}

#[actix_rt::test]
async fn test_login_and_me() {
    let ctx = bootstrap_context().await;
    let app = create_test_app(&ctx).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"email": "Grace@Example.com", "password": ctx.admin_password})),
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["email"], ADMIN_EMAIL);
    assert!(body.get("password").is_none());

    let (status, body) = call(&app, "GET", "/api/v1/auth/me", Some(ctx.admin()), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], ADMIN_NAME);
    assert_eq!(body["status"], "Active");
    assert_eq!(body["language"], "en");
}

#[actix_rt::test]
async fn test_change_password() {
    let ctx = bootstrap_context().await;
    let app = create_test_app(&ctx).await;

    let (status, _) = call(
        &app,
        "PUT",
        "/api/v1/auth/password",
        Some(ctx.admin()),
        Some(json!({"current_password": ctx.admin_password, "new_password": "short"})),
    )
    .await;
    assert_eq!(status, 400);

    let (status, body) = call(
        &app,
        "PUT",
        "/api/v1/auth/password",
        Some(ctx.admin()),
        Some(json!({"current_password": ctx.admin_password, "new_password": "a-longer-secret"})),
    )
    .await;
    assert_eq!(status, 200, "{}", body);

    let (status, _) = call(&app, "GET", "/api/v1/auth/me", Some(ctx.admin()), None).await;
    assert_eq!(status, 401);

    let (status, _) = call(
        &app,
        "GET",
        "/api/v1/auth/me",
        Some((ADMIN_EMAIL, "a-longer-secret")),
        None,
    )
    .await;
    assert_eq!(status, 200);
}
