//! Unified calendar endpoint.

use chrono::{Duration, Utc};
use serde_json::{Value, json};

use super::test_helpers::*;

fn items_of_kind<'a>(calendar: &'a Value, kind: &str) -> Vec<&'a Value> {
    calendar
        .as_array()
        .unwrap()
        .iter()
        .filter(|item| item["source"]["kind"] == kind)
        .collect()
}

#[actix_rt::test]
async fn test_calendar_merges_all_sources() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;

    // Weekly meetings anchored on today: 14 fall within three months, capped at 12.
    let alpha = create_partner(
        &app,
        json!({ "name": "Alpha Solutions", "meeting_frequency": "weekly" }),
    )
    .await;
    let project = create_project(&app, alpha, "Digitalisation").await;
    let report = create_report(
        &app,
        json!({ "project_id": project, "title": "Rapport Mars", "deadline": "2099-03-31" }),
    )
    .await;
    let (status, event) = post_json(
        &app,
        "/api/events",
        json!({
            "partner_id": alpha,
            "title": "Comité de pilotage",
            "event_date": (Utc::now() + Duration::days(1)).to_rfc3339(),
            "type": "meeting"
        }),
    )
    .await;
    assert_eq!(status, 201, "{:?}", event);

    let (status, calendar) = get(&app, "/api/events").await;
    assert_eq!(status, 200);

    let stored = items_of_kind(&calendar, "stored");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["key"], format!("event-{}", event["id"]));
    assert_eq!(stored[0]["is_alert"], true);
    assert_eq!(stored[0]["partner_name"], "Alpha Solutions");

    let deadlines = items_of_kind(&calendar, "derived_from_deadline");
    assert_eq!(deadlines.len(), 1);
    assert_eq!(deadlines[0]["key"], format!("report-{}", report));
    assert_eq!(deadlines[0]["date"], "2099-03-31T23:59:59Z");
    assert_eq!(deadlines[0]["type"], "deadline");
    assert_eq!(deadlines[0]["is_alert"], false);

    let meetings = items_of_kind(&calendar, "derived_from_recurrence");
    assert_eq!(meetings.len(), 12);
    assert_eq!(meetings[0]["title"], "Réunion de suivi - Alpha Solutions");
    assert!(
        meetings[0]["key"]
            .as_str()
            .unwrap()
            .starts_with(&format!("meeting-{}-", alpha))
    );

    let dates: Vec<&str> = calendar
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["date"].as_str().unwrap())
        .collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
}

#[actix_rt::test]
async fn test_calendar_partner_filter() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;

    let alpha = create_partner(&app, json!({ "name": "Alpha" })).await;
    let green = create_partner(&app, json!({ "name": "Green" })).await;
    for (partner_id, title) in [
        (json!(alpha), "Alpha review"),
        (json!(green), "Green audit"),
        (Value::Null, "Assemblée générale"),
    ] {
        let (status, _) = post_json(
            &app,
            "/api/events",
            json!({
                "partner_id": partner_id,
                "title": title,
                "event_date": "2099-06-01T10:00:00Z"
            }),
        )
        .await;
        assert_eq!(status, 201);
    }

    let (_, all) = get(&app, "/api/events?partner_id=all").await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, only_green) = get(&app, &format!("/api/events?partner_id={}", green)).await;
    let only_green = only_green.as_array().unwrap();
    assert_eq!(only_green.len(), 1);
    assert_eq!(only_green[0]["title"], "Green audit");
    assert_eq!(only_green[0]["type"], "other");

    let (status, body) = get(&app, "/api/events?partner_id=green").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_partner_without_cadence_has_no_meetings() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;
    create_partner(
        &app,
        json!({ "name": "Quiet", "meeting_frequency": "none", "contract_start_date": "2024-01-01" }),
    )
    .await;

    let (_, calendar) = get(&app, "/api/events").await;
    assert_eq!(calendar.as_array().unwrap().len(), 0);
}

#[actix_rt::test]
async fn test_event_validation() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;

    let (status, _) = post_json(
        &app,
        "/api/events",
        json!({ "title": " ", "event_date": "2099-06-01T10:00:00Z" }),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = post_json(
        &app,
        "/api/events",
        json!({ "partner_id": 77, "title": "Ghost", "event_date": "2099-06-01T10:00:00Z" }),
    )
    .await;
    assert_eq!(status, 404);
}
