//! Partner endpoints, including the cascading delete.

use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_partners_listed_by_name() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;

    create_partner(&app, json!({ "name": "Zeta Water" })).await;
    create_partner(&app, json!({ "name": "Alpha Solutions", "meeting_frequency": "mensuelle" })).await;

    let (status, body) = get(&app, "/api/partners").await;
    assert_eq!(status, 200);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alpha Solutions", "Zeta Water"]);
    assert_eq!(body[0]["meeting_frequency"], "monthly");
}

#[actix_rt::test]
async fn test_inverted_contract_dates_rejected() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;

    let (status, body) = post_json(
        &app,
        "/api/partners",
        json!({
            "name": "Backwards Ltd",
            "contract_start_date": "2025-01-01",
            "contract_end_date": "2024-12-31"
        }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");

    let (status, _) = post_json(&app, "/api/partners", json!({ "name": "  " })).await;
    assert_eq!(status, 400);

    let (_, body) = get(&app, "/api/partners").await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[actix_rt::test]
async fn test_partner_detail() {
    let ctx = TestContext::demo().await;
    let app = create_test_app(&ctx).await;

    let (status, body) = get(&app, "/api/partners/1").await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], "Alpha Solutions");
    assert_eq!(body["projects"].as_array().unwrap().len(), 1);
    assert_eq!(body["projects"][0]["id"], 101);
    assert_eq!(body["events"].as_array().unwrap().len(), 2);
    assert_eq!(body["templates"].as_array().unwrap().len(), 1);
    assert!(body["contract_progress"]["elapsed_percent"].is_u64());

    let (_, body) = get(&app, "/api/partners/2").await;
    assert!(body["contract_progress"]["elapsed_percent"].is_u64());

    // No contract dates, no progress.
    let id = create_partner(&app, json!({ "name": "Delta Water" })).await;
    let (status, body) = get(&app, &format!("/api/partners/{}", id)).await;
    assert_eq!(status, 200);
    assert!(body["contract_progress"].is_null());

    let (status, body) = get(&app, "/api/partners/99").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_rt::test]
async fn test_partner_projects() {
    let ctx = TestContext::demo().await;
    let app = create_test_app(&ctx).await;

    let (status, body) = get(&app, "/api/partners/2/projects").await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Audit Écomobilité");

    let (status, _) = get(&app, "/api/partners/42/projects").await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_delete_partner_cascades() {
    let ctx = TestContext::demo().await;
    let app = create_test_app(&ctx).await;

    let (status, _) = delete(&app, "/api/partners/1").await;
    assert_eq!(status, 204);

    let (status, _) = get(&app, "/api/partners/1").await;
    assert_eq!(status, 404);
    let (status, _) = get(&app, "/api/projects/101").await;
    assert_eq!(status, 404);
    let (status, _) = get(&app, "/api/reports/1001").await;
    assert_eq!(status, 404);

    let (_, reports) = get(&app, "/api/reports?partnerId=1").await;
    assert_eq!(reports.as_array().unwrap().len(), 0);

    let (_, calendar) = get(&app, "/api/events?partner_id=1").await;
    assert_eq!(calendar.as_array().unwrap().len(), 0);

    let (_, templates) = get(&app, "/api/templates").await;
    let templates = templates.as_array().unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0]["partner_id"], 2);

    // The other partner is untouched.
    let (_, reports) = get(&app, "/api/reports?partnerId=2").await;
    assert_eq!(reports.as_array().unwrap().len(), 2);

    let (status, _) = delete(&app, "/api/partners/1").await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_delete_partner_removes_report_files() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;

    let partner_id = create_partner(&app, json!({ "name": "Alpha Solutions" })).await;
    let project_id = create_project(&app, partner_id, "Digitalisation").await;
    let report_id = create_report(
        &app,
        json!({ "project_id": project_id, "title": "Rapport Q1" }),
    )
    .await;

    let (status, report) = post_multipart(
        &app,
        &format!("/api/reports/{}/submit", report_id),
        "file",
        "q1.txt",
        NARRATIVE_TEXT.as_bytes(),
        &[],
    )
    .await;
    assert_eq!(status, 200, "{:?}", report);
    let file = ctx.upload_path(report["file_path"].as_str().unwrap());
    assert!(file.exists());

    let (status, _) = delete(&app, &format!("/api/partners/{}", partner_id)).await;
    assert_eq!(status, 204);
    assert!(!file.exists());
}
