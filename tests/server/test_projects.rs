//! Projects with their milestones, suites, cases and plans.

use serde_json::{Value, json};

use super::test_helpers::*;

async fn create<S>(app: &S, ctx: &TestContext, uri: &str, body: Value) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, created) = call(app, "POST", uri, Some(ctx.admin()), Some(body)).await;
    assert_eq!(status, 201, "POST {} failed: {}", uri, created);
    created
}

#[actix_rt::test]
async fn test_project_crud() {
    let ctx = bootstrap_context().await;
    let app = create_test_app(&ctx).await;

    let project = create(
        &app,
        &ctx,
        "/api/v1/projects",
        json!({"name": "Checkout", "description": "Web shop checkout"}),
    )
    .await;
    let uri = format!("/api/v1/projects/{}", id_of(&project));

    let (status, body) = call(&app, "GET", &uri, Some(ctx.admin()), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], "Checkout");

    let (status, body) = call(
        &app,
        "PUT",
        &uri,
        Some(ctx.admin()),
        Some(json!({"name": "Checkout v2"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], "Checkout v2");
    assert_eq!(body["description"], "Web shop checkout");

    let (status, body) = call(&app, "GET", "/api/v1/projects", Some(ctx.admin()), None).await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = call(&app, "DELETE", &uri, Some(ctx.admin()), None).await;
    assert_eq!(status, 200);
    let (status, body) = call(&app, "GET", &uri, Some(ctx.admin()), None).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_rt::test]
async fn test_nested_resources() {
    let ctx = bootstrap_context().await;
    let app = create_test_app(&ctx).await;

    let project = create(&app, &ctx, "/api/v1/projects", json!({"name": "Mobile"})).await;
    let project_id = id_of(&project);

    let milestone = create(
        &app,
        &ctx,
        &format!("/api/v1/projects/{}/milestones", project_id),
        json!({"name": "1.0", "due_date": "2026-12-01"}),
    )
    .await;
    assert_eq!(milestone["completed"], false);
    assert_eq!(milestone["due_date"], "2026-12-01");

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/v1/milestones/{}", id_of(&milestone)),
        Some(ctx.admin()),
        Some(json!({"completed": true})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["completed"], true);
    assert_eq!(body["name"], "1.0");

    let suite = create(
        &app,
        &ctx,
        &format!("/api/v1/projects/{}/suites", project_id),
        json!({"name": "Login"}),
    )
    .await;
    let suite_id = id_of(&suite);

    let (_, statuses) = call(&app, "GET", "/api/v1/statuses", Some(ctx.admin()), None).await;
    let untested = id_of(&statuses[0]);

    let case = create(
        &app,
        &ctx,
        &format!("/api/v1/suites/{}/cases", suite_id),
        json!({
            "title": "Login with valid password",
            "steps": "Enter credentials, press login",
            "expected_result": "Dashboard is shown",
            "priority": "High",
            "status_id": untested,
        }),
    )
    .await;
    assert_eq!(case["test_suite_id"], suite_id.as_str());
    assert_eq!(case["status_id"], untested.as_str());

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/v1/suites/{}/cases", suite_id),
        Some(ctx.admin()),
        Some(json!({"title": "Bad status", "status_id": uuid::Uuid::now_v7()})),
    )
    .await;
    assert_eq!(status, 400, "{}", body);

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/v1/cases/{}", id_of(&case)),
        Some(ctx.admin()),
        Some(json!({"priority": "Low"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["priority"], "Low");
    assert_eq!(body["title"], "Login with valid password");

    let plan = create(
        &app,
        &ctx,
        &format!("/api/v1/projects/{}/plans", project_id),
        json!({"name": "Release 1.0", "milestone_id": id_of(&milestone)}),
    )
    .await;
    assert_eq!(plan["milestone_id"], id_of(&milestone).as_str());

    let (status, cases) = call(
        &app,
        "GET",
        &format!("/api/v1/suites/{}/cases", suite_id),
        Some(ctx.admin()),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(cases.as_array().unwrap().len(), 1);

    // Deleting the project removes everything below it
    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/api/v1/projects/{}", project_id),
        Some(ctx.admin()),
        None,
    )
    .await;
    assert_eq!(status, 200);
    let (status, _) = call(
        &app,
        "GET",
        &format!("/api/v1/cases/{}", id_of(&case)),
        Some(ctx.admin()),
        None,
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_missing_parent_is_not_found() {
    let ctx = bootstrap_context().await;
    let app = create_test_app(&ctx).await;
    let missing = uuid::Uuid::now_v7();

    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/v1/projects/{}/suites", missing),
        Some(ctx.admin()),
        Some(json!({"name": "Orphan"})),
    )
    .await;
    assert_eq!(status, 404);

    let (status, _) = call(
        &app,
        "GET",
        &format!("/api/v1/suites/{}/cases", missing),
        Some(ctx.admin()),
        None,
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_plan_rejects_foreign_milestone() {
    let ctx = bootstrap_context().await;
    let app = create_test_app(&ctx).await;

    let first = create(&app, &ctx, "/api/v1/projects", json!({"name": "A"})).await;
    let second = create(&app, &ctx, "/api/v1/projects", json!({"name": "B"})).await;
    let milestone = create(
        &app,
        &ctx,
        &format!("/api/v1/projects/{}/milestones", id_of(&first)),
        json!({"name": "M1"}),
    )
    .await;

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/v1/projects/{}/plans", id_of(&second)),
        Some(ctx.admin()),
        Some(json!({"name": "Cross", "milestone_id": id_of(&milestone)})),
    )
    .await;
    assert_eq!(status, 400, "{}", body);
}
