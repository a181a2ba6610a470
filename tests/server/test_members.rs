//! Member invitation and management.

use std::sync::Arc;

use serde_json::json;
use tcm_lib::services::MemoryMailSender;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_invite_mails_a_working_password() {
    let ctx = bootstrap_context().await;
    let app = create_test_app(&ctx).await;

    let (status, member) = call(
        &app,
        "POST",
        "/api/v1/members",
        Some(ctx.admin()),
        Some(json!({"name": "Linus", "email": "Linus@Example.com", "language": "fi"})),
    )
    .await;
    assert_eq!(status, 201, "{}", member);
    assert_eq!(member["email"], "linus@example.com");
    assert_eq!(member["language"], "fi");
    assert_eq!(member["status"], "Active");

    let sent = ctx.mailer.sent();
    assert_eq!(sent.len(), 2);
    let invite = &sent[1];
    assert_eq!(invite.to, vec!["linus@example.com".to_string()]);
    assert_eq!(invite.subject, "Your Account");
    let password = invite
        .body
        .strip_prefix("Welcome Linus Your Password is ")
        .unwrap();
    assert_eq!(password.len(), 10);

    let (status, me) = call(
        &app,
        "GET",
        "/api/v1/auth/me",
        Some(("linus@example.com", password)),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(me["id"], member["id"]);
}

#[actix_rt::test]
async fn test_invite_rolls_back_when_mail_fails() {
    let ctx = bootstrap_context().await;
    let app =
        create_test_app_with_mailer(&ctx, Arc::new(MemoryMailSender::failing("relay down")))
            .await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/members",
        Some(ctx.admin()),
        Some(json!({"name": "Ada", "email": "ada@example.com"})),
    )
    .await;
    assert_eq!(status, 502, "{}", body);
    assert_eq!(body["error"], "MAIL_ERROR");

    assert!(
        ctx.pool
            .find_user_by_email("ada@example.com")
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(ctx.pool.count_users().await.unwrap(), 1);

    // The address stays free for a retry once mail works again.
    let app = create_test_app(&ctx).await;
    let (status, _) = call(
        &app,
        "POST",
        "/api/v1/members",
        Some(ctx.admin()),
        Some(json!({"name": "Ada", "email": "ada@example.com"})),
    )
    .await;
    assert_eq!(status, 201);
}

#[actix_rt::test]
async fn test_invite_validation() {
    let ctx = bootstrap_context().await;
    let app = create_test_app(&ctx).await;

    let (status, _) = call(
        &app,
        "POST",
        "/api/v1/members",
        Some(ctx.admin()),
        Some(json!({"name": "No Mail", "email": "not-an-address"})),
    )
    .await;
    assert_eq!(status, 400);

    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/members",
        Some(ctx.admin()),
        Some(json!({"name": "Copy", "email": ADMIN_EMAIL})),
    )
    .await;
    assert_eq!(status, 409, "{}", body);
    assert_eq!(ctx.mailer.sent().len(), 1);
}

#[actix_rt::test]
async fn test_inactive_member_cannot_authenticate() {
    let ctx = bootstrap_context().await;
    let app = create_test_app(&ctx).await;

    let (_, member) = call(
        &app,
        "POST",
        "/api/v1/members",
        Some(ctx.admin()),
        Some(json!({"name": "Temp", "email": "temp@example.com"})),
    )
    .await;
    let id = id_of(&member);
    let password = ctx.mailer.sent()[1]
        .body
        .strip_prefix("Welcome Temp Your Password is ")
        .unwrap()
        .to_string();

    let (status, _) = call(
        &app,
        "PUT",
        &format!("/api/v1/members/{}", id),
        Some(ctx.admin()),
        Some(json!({"status": "Retired"})),
    )
    .await;
    assert_eq!(status, 400);

    let (status, updated) = call(
        &app,
        "PUT",
        &format!("/api/v1/members/{}", id),
        Some(ctx.admin()),
        Some(json!({"status": "inactive"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["status"], "Inactive");

    let (status, _) = call(
        &app,
        "GET",
        "/api/v1/projects",
        Some(("temp@example.com", password.as_str())),
        None,
    )
    .await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
async fn test_member_removal() {
    let ctx = bootstrap_context().await;
    let app = create_test_app(&ctx).await;

    let (status, me) = call(&app, "GET", "/api/v1/auth/me", Some(ctx.admin()), None).await;
    assert_eq!(status, 200);
    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/api/v1/members/{}", id_of(&me)),
        Some(ctx.admin()),
        None,
    )
    .await;
    assert_eq!(status, 400);

    let (_, member) = call(
        &app,
        "POST",
        "/api/v1/members",
        Some(ctx.admin()),
        Some(json!({"name": "Leaving", "email": "leaving@example.com"})),
    )
    .await;
    let uri = format!("/api/v1/members/{}", id_of(&member));

    let (status, _) = call(&app, "DELETE", &uri, Some(ctx.admin()), None).await;
    assert_eq!(status, 200);
    let (status, _) = call(&app, "GET", &uri, Some(ctx.admin()), None).await;
    assert_eq!(status, 404);

    let (status, list) = call(&app, "GET", "/api/v1/members", Some(ctx.admin()), None).await;
    assert_eq!(status, 200);
    assert_eq!(list.as_array().unwrap().len(), 1);
}
