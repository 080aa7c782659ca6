//! Report lifecycle endpoints: creation, submission, status, deletion, analysis.

use serde_json::json;

use super::test_helpers::*;

/// Partner, project and report ids of a fresh one-report setup.
async fn setup<S>(app: &S, report: serde_json::Value) -> (i64, i64, i64)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let partner_id = create_partner(app, json!({ "name": "Alpha Solutions" })).await;
    let project_id = create_project(app, partner_id, "Digitalisation Phase 1").await;
    let mut body = report;
    body["project_id"] = json!(project_id);
    let report_id = create_report(app, body).await;
    (partner_id, project_id, report_id)
}

#[actix_rt::test]
async fn test_create_report_validation() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;

    let (status, body) = post_json(
        &app,
        "/api/reports",
        json!({ "project_id": 404, "title": "Orphan" }),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");

    let partner_id = create_partner(&app, json!({ "name": "Alpha" })).await;
    let project_id = create_project(&app, partner_id, "P").await;
    let (status, _) = post_json(
        &app,
        "/api/reports",
        json!({ "project_id": project_id, "title": "   " }),
    )
    .await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_report_view_is_enriched() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;
    let (partner_id, _, report_id) = setup(
        &app,
        json!({ "title": "Rapport Janvier", "deadline": "2099-01-31" }),
    )
    .await;

    let (status, body) = get(&app, &format!("/api/reports/{}", report_id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["deadline"], "2099-01-31");
    assert_eq!(body["partner_id"], partner_id);
    assert_eq!(body["partner_name"], "Alpha Solutions");
    assert_eq!(body["project_title"], "Digitalisation Phase 1");
    assert!(body["file_url"].is_null());
}

#[actix_rt::test]
async fn test_overdue_pending_report_reads_as_late() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;
    let (_, project_id, report_id) = setup(
        &app,
        json!({ "title": "Rapport 2020", "deadline": "2020-01-31" }),
    )
    .await;
    create_report(
        &app,
        json!({ "project_id": project_id, "title": "Brouillon", "deadline": "2020-01-31", "status": "draft" }),
    )
    .await;

    let (_, body) = get(&app, &format!("/api/reports?projectId={}", project_id)).await;
    let statuses: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["late", "draft"]);

    // Submitting clears the late state.
    let (status, body) = post_multipart(
        &app,
        &format!("/api/reports/{}/submit", report_id),
        "report",
        "rapport.txt",
        NARRATIVE_TEXT.as_bytes(),
        &[],
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "pending");
    assert!(body["submission_date"].is_string());
}

#[actix_rt::test]
async fn test_submit_stores_file() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;
    let (_, _, report_id) = setup(
        &app,
        json!({ "title": "Rapport Q1", "status": "draft" }),
    )
    .await;

    let (status, body) = post_multipart(
        &app,
        &format!("/api/reports/{}/submit", report_id),
        "file",
        "Rapport Q1.txt",
        NARRATIVE_TEXT.as_bytes(),
        &[],
    )
    .await;
    assert_eq!(status, 200, "{:?}", body);
    assert_eq!(body["status"], "pending");

    let file_path = body["file_path"].as_str().unwrap();
    assert!(file_path.starts_with(&format!("reports/{}/", report_id)));
    assert_eq!(body["file_url"], format!("/uploads/{}", file_path));
    let stored = std::fs::read(ctx.upload_path(file_path)).unwrap();
    assert_eq!(stored, NARRATIVE_TEXT.as_bytes());
}

#[actix_rt::test]
async fn test_resubmission_replaces_previous_file() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;
    let (_, _, report_id) = setup(&app, json!({ "title": "Rapport" })).await;
    let uri = format!("/api/reports/{}/submit", report_id);

    let (_, first) = post_multipart(&app, &uri, "file", "v1.txt", b"version one", &[]).await;
    let (_, second) = post_multipart(&app, &uri, "file", "v2.txt", b"version two", &[]).await;

    let first_path = ctx.upload_path(first["file_path"].as_str().unwrap());
    let second_path = ctx.upload_path(second["file_path"].as_str().unwrap());
    assert!(!first_path.exists());
    assert!(second_path.exists());
}

#[actix_rt::test]
async fn test_submitting_validated_report_keeps_it_validated() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;
    let (_, _, report_id) = setup(
        &app,
        json!({ "title": "Rapport validé", "status": "validated" }),
    )
    .await;

    let (status, body) = post_multipart(
        &app,
        &format!("/api/reports/{}/submit", report_id),
        "file",
        "annexe.txt",
        b"annexe",
        &[],
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "validated");
    assert!(body["submission_date"].is_string());
}

#[actix_rt::test]
async fn test_submit_errors() {
    let mut ctx = TestContext::empty().await;
    ctx.max_upload_size = 64;
    let app = create_test_app(&ctx).await;
    let (_, _, report_id) = setup(&app, json!({ "title": "Rapport" })).await;
    let uri = format!("/api/reports/{}/submit", report_id);

    let (status, _) = post_multipart(&app, &uri, "file", "big.txt", &[b'x'; 512], &[]).await;
    assert_eq!(status, 400);

    let (status, _) = post_multipart(&app, &uri, "attachment", "a.txt", b"small", &[]).await;
    assert_eq!(status, 400);

    let (status, _) =
        post_multipart(&app, "/api/reports/9999/submit", "file", "a.txt", b"small", &[]).await;
    assert_eq!(status, 404);

    // Nothing was recorded.
    let (_, body) = get(&app, &format!("/api/reports/{}", report_id)).await;
    assert!(body["submission_date"].is_null());
}

#[actix_rt::test]
async fn test_status_change() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;
    let (_, _, report_id) = setup(&app, json!({ "title": "Rapport" })).await;
    let uri = format!("/api/reports/{}/status", report_id);

    let req = actix_web::test::TestRequest::patch()
        .uri(&uri)
        .set_json(json!({ "status": "validé" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "validated");
    assert!(body["submission_date"].is_null());

    let req = actix_web::test::TestRequest::patch()
        .uri(&uri)
        .set_json(json!({ "status": "archived" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_delete_removes_file_then_404() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;
    let (_, _, report_id) = setup(&app, json!({ "title": "Rapport" })).await;

    let (_, body) = post_multipart(
        &app,
        &format!("/api/reports/{}/submit", report_id),
        "file",
        "rapport.txt",
        b"contenu",
        &[],
    )
    .await;
    let file = ctx.upload_path(body["file_path"].as_str().unwrap());
    assert!(file.exists());

    let uri = format!("/api/reports/{}", report_id);
    let (status, _) = delete(&app, &uri).await;
    assert_eq!(status, 204);
    assert!(!file.exists());

    let (status, _) = delete(&app, &uri).await;
    assert_eq!(status, 404);
    let (status, _) = get(&app, &uri).await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_delete_survives_missing_file() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;
    let (_, _, report_id) = setup(&app, json!({ "title": "Rapport" })).await;

    let (_, body) = post_multipart(
        &app,
        &format!("/api/reports/{}/submit", report_id),
        "file",
        "rapport.txt",
        b"contenu",
        &[],
    )
    .await;
    std::fs::remove_file(ctx.upload_path(body["file_path"].as_str().unwrap())).unwrap();

    let (status, _) = delete(&app, &format!("/api/reports/{}", report_id)).await;
    assert_eq!(status, 204);
}

#[actix_rt::test]
async fn test_analyze_attached_file() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;
    let (_, _, report_id) = setup(&app, json!({ "title": "Rapport financier" })).await;
    let analyze = format!("/api/reports/{}/analyze?type=financial", report_id);

    let (status, body) = post_json(&app, &analyze, json!({})).await;
    assert_eq!(status, 400, "no file attached yet: {:?}", body);

    let text = "Le budget consommé sur la période atteint 125000 EUR au total. \
        Un retard de décaissement de 4000 EUR est signalé pour le second lot.";
    post_multipart(
        &app,
        &format!("/api/reports/{}/submit", report_id),
        "file",
        "finances.txt",
        text.as_bytes(),
        &[],
    )
    .await;

    let (status, body) = post_json(&app, &analyze, json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["kind"], "financial");
    assert_eq!(body["source"], "local");
    assert_eq!(body["budget_total_used"], "125000 EUR");
    assert_eq!(body["key_figures"].as_array().unwrap().len(), 2);
    assert_eq!(body["anomalies"].as_array().unwrap().len(), 1);
}
