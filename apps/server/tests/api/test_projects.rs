//! Project endpoints and the evolution series.

use futures_util::future::join_all;
use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_create_and_get_project() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;

    let partner = create_partner(&app, json!({ "name": "Delta Water" })).await;
    let (status, body) = post_json(
        &app,
        "/api/projects",
        json!({
            "partner_id": partner,
            "title": "Forages ruraux",
            "evolution_data": [
                { "date": "2024-03", "prog": 35 },
                { "date": "2024-01", "progress": 10 },
                { "date": "2024-03", "progress": 40 }
            ]
        }),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(body["status"], "active");
    let series = body["evolution_data"].as_array().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["date"], "2024-01");
    assert_eq!(series[1]["progress"], 40);

    let id = body["id"].as_i64().unwrap();
    let (status, body) = get(&app, &format!("/api/projects/{}", id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["title"], "Forages ruraux");

    let (status, body) = get(&app, &format!("/api/projects?partnerId={}", partner)).await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = get(&app, "/api/projects/4242").await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_create_project_validation() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;

    let (status, body) = post_json(
        &app,
        "/api/projects",
        json!({ "partner_id": 77, "title": "Orphelin" }),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");

    let partner = create_partner(&app, json!({ "name": "Delta Water" })).await;
    let (status, body) = post_json(
        &app,
        "/api/projects",
        json!({ "partner_id": partner, "title": "  " }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_record_evolution() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;

    let partner = create_partner(&app, json!({ "name": "Delta Water" })).await;
    let project = create_project(&app, partner, "Forages ruraux").await;
    let uri = format!("/api/projects/{}/evolution", project);

    let (status, body) = post_json(&app, &uri, json!({ "date": "2024-05", "progress": 50 })).await;
    assert_eq!(status, 200);
    assert_eq!(body["evolution_data"].as_array().unwrap().len(), 1);

    let (_, body) = post_json(&app, &uri, json!({ "date": "2024-02", "prog": 20 })).await;
    let (_, body2) = post_json(&app, &uri, json!({ "date": "2024-05", "progress": 55 })).await;
    assert_eq!(body["evolution_data"][0]["date"], "2024-02");
    let series = body2["evolution_data"].as_array().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[1]["progress"], 55);

    let (status, body) = post_json(&app, &uri, json!({ "date": "2024-06", "progress": 150 })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");

    let (status, _) = post_json(&app, &uri, json!({ "date": "juin 2024", "progress": 60 })).await;
    assert_eq!(status, 400);

    let (status, body) = post_json(
        &app,
        "/api/projects/4242/evolution",
        json!({ "date": "2024-06", "progress": 60 }),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_rt::test]
async fn test_concurrent_evolution_points_are_all_kept() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;

    let partner = create_partner(&app, json!({ "name": "Delta Water" })).await;
    let project = create_project(&app, partner, "Forages ruraux").await;
    let uri = format!("/api/projects/{}/evolution", project);

    let (app, uri) = (&app, uri.as_str());
    let responses = join_all((1..=6).map(move |month| {
        post_json(
            app,
            uri,
            json!({ "date": format!("2024-{:02}", month), "progress": month * 10 }),
        )
    }))
    .await;
    assert!(responses.iter().all(|(status, _)| *status == 200));

    let (_, body) = get(app, &format!("/api/projects/{}", project)).await;
    let months: Vec<&str> = body["evolution_data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["date"].as_str().unwrap())
        .collect();
    assert_eq!(
        months,
        vec!["2024-01", "2024-02", "2024-03", "2024-04", "2024-05", "2024-06"]
    );
}
