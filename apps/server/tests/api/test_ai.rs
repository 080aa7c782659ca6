//! AI endpoints with the offline gateway.

use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_generate_template_is_deterministic() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;
    let prompt = json!({ "prompt": "Projet d'accès à l'eau potable et suivi du budget" });

    let (status, first) = post_json(&app, "/api/ai/generate-template", prompt.clone()).await;
    assert_eq!(status, 200);
    let (_, second) = post_json(&app, "/api/ai/generate-template", prompt).await;
    assert_eq!(first, second);

    assert_eq!(first["requires_video"], true);
    assert_eq!(first["requires_audio"], false);
    assert_eq!(first["requires_text"], true);
    let sections: Vec<&str> = first["structure"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["section"].as_str().unwrap())
        .collect();
    assert!(sections.contains(&"Accès à l'eau et assainissement"));
    assert!(sections.contains(&"Exécution budgétaire"));
}

#[actix_rt::test]
async fn test_generate_template_requires_prompt() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;

    let (status, body) =
        post_json(&app, "/api/ai/generate-template", json!({ "prompt": "   " })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_generated_template_can_be_saved() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;
    let partner_id = create_partner(&app, json!({ "name": "Santé Plus" })).await;

    let (_, mut template) = post_json(
        &app,
        "/api/ai/generate-template",
        json!({ "prompt": "Programme de santé maternelle" }),
    )
    .await;
    template["partner_id"] = json!(partner_id);

    let (status, saved) = post_json(&app, "/api/templates", template).await;
    assert_eq!(status, 201, "{:?}", saved);
    assert_eq!(saved["requires_audio"], true);

    let (_, listed) = get(&app, &format!("/api/templates?partnerId={}", partner_id)).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["partner_name"], "Santé Plus");

    let (status, _) = post_json(
        &app,
        "/api/templates",
        json!({ "partner_id": 999, "title": "Orphelin" }),
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_summarize_blank_document_is_unreadable() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;

    for kind in ["narrative", "financial"] {
        let (status, body) = post_multipart(
            &app,
            "/api/ai/summarize",
            "report",
            "scan.txt",
            b"   \n  ",
            &[("type", kind)],
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["source"], "fixed");
        assert_eq!(body["kind"], kind);
        assert!(body["summary"].as_str().unwrap().contains("illisible"));
        assert_eq!(body["risks"], json!(["Document peut-être non-OCRisé"]));
    }
}

#[actix_rt::test]
async fn test_summarize_narrative_locally() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;

    let (status, body) = post_multipart(
        &app,
        "/api/ai/summarize",
        "report",
        "rapport.md",
        NARRATIVE_TEXT.as_bytes(),
        &[],
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["kind"], "narrative");
    assert_eq!(body["source"], "local");
    assert!(
        body["summary"]
            .as_str()
            .unwrap()
            .starts_with("Analyse locale du rapport narratif.")
    );
    assert_eq!(body["achievements"].as_array().unwrap().len(), 2);
    assert_eq!(body["risks"].as_array().unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_summarize_rejects_bad_uploads() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;

    let (status, _) = post_multipart(
        &app,
        "/api/ai/summarize",
        "report",
        "setup.exe",
        b"MZ\x90\x00",
        &[],
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) =
        post_multipart(&app, "/api/ai/summarize", "file", "a.txt", b"text", &[]).await;
    assert_eq!(status, 400);
}
