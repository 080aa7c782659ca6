//! Dashboard statistics endpoints.

use super::test_helpers::*;

#[actix_rt::test]
async fn test_global_progress_over_demo_data() {
    let ctx = TestContext::demo().await;
    let app = create_test_app(&ctx).await;

    let (status, body) = get(&app, "/api/stats/global").await;
    assert_eq!(status, 200);
    let points = body.as_array().unwrap();
    assert!(!points.is_empty());

    // The earliest demo project started in June 2023.
    assert_eq!(points[0]["month"], "2023-06");
    assert_eq!(points[0]["label"], "Jun 2023");

    let expected: Vec<u64> = points.iter().map(|p| p["expected"].as_u64().unwrap()).collect();
    let actual: Vec<u64> = points.iter().map(|p| p["actual"].as_u64().unwrap()).collect();
    assert!(expected.windows(2).all(|w| w[0] <= w[1]));
    assert!(actual.windows(2).all(|w| w[0] <= w[1]));

    // Every demo report is due by the end; three of four were submitted.
    assert_eq!(expected.last(), Some(&100));
    assert_eq!(actual.last(), Some(&75));
}

#[actix_rt::test]
async fn test_global_progress_without_data() {
    let ctx = TestContext::empty().await;
    let app = create_test_app(&ctx).await;

    let (status, body) = get(&app, "/api/stats/global").await;
    assert_eq!(status, 200);
    let points = body.as_array().unwrap();
    assert!(points.len() >= 10);
    assert!(points.iter().all(|p| p["expected"] == 0 && p["actual"] == 0));
}

#[actix_rt::test]
async fn test_summary_counters() {
    let ctx = TestContext::demo().await;
    let app = create_test_app(&ctx).await;

    let (status, body) = get(&app, "/api/stats/summary").await;
    assert_eq!(status, 200);
    assert_eq!(body["partners"], 2);
    assert_eq!(body["active_projects"], 2);
    assert_eq!(body["reports_validated"], 2);
    assert_eq!(body["reports_pending"], 1);
    assert_eq!(body["reports_late"], 0);
    assert!(body["alerts"].is_u64());
}
