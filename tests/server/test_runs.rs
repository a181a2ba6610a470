//! Test runs, scheduled cases and comments.

use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_run_lifecycle() {
    let ctx = bootstrap_context().await;
    let app = create_test_app(&ctx).await;
    let admin = Some(ctx.admin());

    let (_, project) = call(&app, "POST", "/api/v1/projects", admin, Some(json!({"name": "API"}))).await;
    let project_id = id_of(&project);
    let (_, suite) = call(
        &app,
        "POST",
        &format!("/api/v1/projects/{}/suites", project_id),
        admin,
        Some(json!({"name": "Smoke"})),
    )
    .await;

    let mut case_ids = Vec::new();
    for title in ["GET /health", "GET /ready"] {
        let (status, case) = call(
            &app,
            "POST",
            &format!("/api/v1/suites/{}/cases", id_of(&suite)),
            admin,
            Some(json!({"title": title})),
        )
        .await;
        assert_eq!(status, 201);
        case_ids.push(id_of(&case));
    }

    let (status, run) = call(
        &app,
        "POST",
        &format!("/api/v1/projects/{}/runs", project_id),
        admin,
        Some(json!({
            "name": "Nightly",
            // Duplicates collapse into one scheduled case
            "case_ids": [case_ids[0], case_ids[1], case_ids[0]],
        })),
    )
    .await;
    assert_eq!(status, 201, "{}", run);
    assert_eq!(run["name"], "Nightly");
    let scheduled = run["cases"].as_array().unwrap();
    assert_eq!(scheduled.len(), 2);
    let run_id = id_of(&run);
    let run_case_id = id_of(&scheduled[0]);

    let (status, cases) = call(&app, "GET", &format!("/api/v1/runs/{}/cases", run_id), admin, None).await;
    assert_eq!(status, 200);
    assert_eq!(cases.as_array().unwrap().len(), 2);

    let (_, statuses) = call(&app, "GET", "/api/v1/statuses", admin, None).await;
    let passed = statuses
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["name"] == "Passed")
        .map(id_of)
        .unwrap();

    let (status, updated) = call(
        &app,
        "PUT",
        &format!("/api/v1/run-cases/{}", run_case_id),
        admin,
        Some(json!({"status_id": passed})),
    )
    .await;
    assert_eq!(status, 200, "{}", updated);
    assert_eq!(updated["status_id"], passed.as_str());

    let (status, comment) = call(
        &app,
        "POST",
        &format!("/api/v1/run-cases/{}/comments", run_case_id),
        admin,
        Some(json!({"content": "Green on first try"})),
    )
    .await;
    assert_eq!(status, 201);
    let (_, me) = call(&app, "GET", "/api/v1/auth/me", admin, None).await;
    assert_eq!(comment["user_id"], me["id"]);

    let (status, comments) = call(
        &app,
        "GET",
        &format!("/api/v1/run-cases/{}/comments", run_case_id),
        admin,
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(comments[0]["content"], "Green on first try");

    let (status, detail) = call(&app, "GET", &format!("/api/v1/runs/{}", run_id), admin, None).await;
    assert_eq!(status, 200);
    assert_eq!(detail["cases"].as_array().unwrap().len(), 2);

    let (status, _) = call(&app, "DELETE", &format!("/api/v1/runs/{}", run_id), admin, None).await;
    assert_eq!(status, 200);
    let (status, _) = call(
        &app,
        "GET",
        &format!("/api/v1/run-cases/{}/comments", run_case_id),
        admin,
        None,
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_run_rejects_cases_from_other_projects() {
    let ctx = bootstrap_context().await;
    let app = create_test_app(&ctx).await;
    let admin = Some(ctx.admin());

    let (_, other) = call(&app, "POST", "/api/v1/projects", admin, Some(json!({"name": "Other"}))).await;
    let (_, suite) = call(
        &app,
        "POST",
        &format!("/api/v1/projects/{}/suites", id_of(&other)),
        admin,
        Some(json!({"name": "S"})),
    )
    .await;
    let (_, case) = call(
        &app,
        "POST",
        &format!("/api/v1/suites/{}/cases", id_of(&suite)),
        admin,
        Some(json!({"title": "Foreign"})),
    )
    .await;

    let (_, project) = call(&app, "POST", "/api/v1/projects", admin, Some(json!({"name": "Mine"}))).await;
    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/v1/projects/{}/runs", id_of(&project)),
        admin,
        Some(json!({"name": "Run", "case_ids": [id_of(&case)]})),
    )
    .await;
    assert_eq!(status, 400, "{}", body);

    let (status, runs) = call(
        &app,
        "GET",
        &format!("/api/v1/projects/{}/runs", id_of(&project)),
        admin,
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert!(runs.as_array().unwrap().is_empty());
}
