//! Status endpoints.

use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_status_crud() {
    let ctx = bootstrap_context().await;
    let app = create_test_app(&ctx).await;

    let (status, body) = call(&app, "GET", "/api/v1/statuses", Some(ctx.admin()), None).await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, created) = call(
        &app,
        "POST",
        "/api/v1/statuses",
        Some(ctx.admin()),
        Some(json!({"name": "  Flaky  ", "color": "#ff9800"})),
    )
    .await;
    assert_eq!(status, 201, "{}", created);
    assert_eq!(created["name"], "Flaky");
    let id = id_of(&created);

    let (status, _) = call(
        &app,
        "POST",
        "/api/v1/statuses",
        Some(ctx.admin()),
        Some(json!({"name": "Flaky"})),
    )
    .await;
    assert_eq!(status, 409);

    let (status, updated) = call(
        &app,
        "PUT",
        &format!("/api/v1/statuses/{}", id),
        Some(ctx.admin()),
        Some(json!({"color": "#000000"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["name"], "Flaky");
    assert_eq!(updated["color"], "#000000");

    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/api/v1/statuses/{}", id),
        Some(ctx.admin()),
        None,
    )
    .await;
    assert_eq!(status, 200);

    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/api/v1/statuses/{}", id),
        Some(ctx.admin()),
        None,
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_blank_status_name_rejected() {
    let ctx = bootstrap_context().await;
    let app = create_test_app(&ctx).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/statuses",
        Some(ctx.admin()),
        Some(json!({"name": "   "})),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
}
