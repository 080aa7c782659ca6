//! SeaORM store against an in-process SQLite database.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use luxdev_portal_lib::config::DatabaseEngine;
use luxdev_portal_lib::db::DbPool;
use luxdev_portal_lib::models::{
    CreateEventRequest, CreatePartnerRequest, CreateProjectRequest, CreateTemplateRequest,
    EvolutionPoint, NewReport, PartnerFilter, ReportFilter, ReportStatus,
};
use luxdev_portal_lib::store::PortalStore;
use sea_orm::{ConnectOptions, Database};
use serde_json::json;

use super::test_helpers::*;

/// Fresh migrated database; one connection keeps the in-memory schema alive.
async fn sqlite_pool() -> DbPool {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let conn = Database::connect(options)
        .await
        .expect("Failed to open SQLite database");

    let pool = DbPool::from_connection(conn, DatabaseEngine::Sqlite);
    pool.run_migrations().await.expect("Failed to run migrations");
    pool
}

fn partner_request(name: &str) -> CreatePartnerRequest {
    serde_json::from_value(json!({
        "name": name,
        "contract_start_date": "2024-01-01",
        "contract_end_date": "2027-01-01",
        "meeting_frequency": "monthly"
    }))
    .unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[actix_rt::test]
async fn test_sqlite_round_trip_and_cascade() {
    let pool = sqlite_pool().await;
    assert_eq!(pool.backend(), "sqlite");
    assert!(!pool.is_mock());
    pool.ping().await.unwrap();

    let alpha = pool.insert_partner(&partner_request("Alpha Solutions")).await.unwrap();
    let green = pool.insert_partner(&partner_request("Green Energy Co")).await.unwrap();
    let names: Vec<String> = pool
        .list_partners()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Alpha Solutions", "Green Energy Co"]);
    assert_eq!(alpha.contract_start_date, Some(date(2024, 1, 1)));

    let project: CreateProjectRequest = serde_json::from_value(json!({
        "partner_id": alpha.id,
        "title": "Digitalisation",
        "evolution_data": [{ "date": "2024-03", "prog": 35 }, { "date": "2024-01", "progress": 10 }]
    }))
    .unwrap();
    let project = pool.insert_project(&project).await.unwrap();
    assert_eq!(project.evolution_data.len(), 2);
    assert_eq!(project.evolution_data[0].date, "2024-01");

    let updated = pool
        .record_project_point(
            project.id,
            EvolutionPoint {
                date: "2024-06".to_string(),
                progress: 60,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.evolution_data.len(), 3);
    assert_eq!(updated.evolution_data[2].date, "2024-06");

    let replaced = pool
        .record_project_point(
            project.id,
            EvolutionPoint {
                date: "2024-03".to_string(),
                progress: 40,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.evolution_data.len(), 3);
    assert_eq!(replaced.evolution_data[1].progress, 40);
    assert!(pool
        .record_project_point(9999, EvolutionPoint { date: "2024-06".to_string(), progress: 1 })
        .await
        .unwrap()
        .is_none());

    let green_project: CreateProjectRequest = serde_json::from_value(json!({
        "partner_id": green.id,
        "title": "Audit"
    }))
    .unwrap();
    let green_project = pool.insert_project(&green_project).await.unwrap();

    let mut report = pool
        .insert_report(&NewReport {
            project_id: project.id,
            title: "Rapport Mars".to_string(),
            deadline: Some(date(2025, 3, 31)),
            submission_date: None,
            status: ReportStatus::Pending,
        })
        .await
        .unwrap();
    pool.insert_report(&NewReport {
        project_id: project.id,
        title: "Rapport Janvier".to_string(),
        deadline: Some(date(2025, 1, 31)),
        submission_date: None,
        status: ReportStatus::Draft,
    })
    .await
    .unwrap();
    pool.insert_report(&NewReport {
        project_id: green_project.id,
        title: "Audit final".to_string(),
        deadline: None,
        submission_date: None,
        status: ReportStatus::Pending,
    })
    .await
    .unwrap();

    let alpha_reports = pool
        .list_reports(&ReportFilter {
            project_id: None,
            partner_id: Some(alpha.id),
        })
        .await
        .unwrap();
    let titles: Vec<&str> = alpha_reports.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Rapport Janvier", "Rapport Mars"]);

    let all_reports = pool.list_reports(&ReportFilter::default()).await.unwrap();
    assert_eq!(all_reports.len(), 3);
    assert_eq!(all_reports[2].title, "Audit final");

    let submitted_at = Utc.with_ymd_and_hms(2025, 3, 20, 9, 30, 0).unwrap();
    report.mark_submitted(submitted_at, Some("reports/1/abc-mars.pdf".to_string()));
    let report = pool.update_report(&report).await.unwrap();
    assert_eq!(report.submission_date, Some(submitted_at));
    assert_eq!(report.status, ReportStatus::Pending);

    let event: CreateEventRequest = serde_json::from_value(json!({
        "partner_id": alpha.id,
        "title": "Comité",
        "event_date": "2025-02-15T10:00:00Z",
        "type": "meeting"
    }))
    .unwrap();
    pool.insert_event(&event).await.unwrap();
    let org_event: CreateEventRequest = serde_json::from_value(json!({
        "title": "Assemblée générale",
        "event_date": "2025-01-10T10:00:00Z"
    }))
    .unwrap();
    pool.insert_event(&org_event).await.unwrap();
    assert_eq!(pool.list_events(PartnerFilter::All).await.unwrap().len(), 2);
    assert_eq!(
        pool.list_events(PartnerFilter::Partner(alpha.id))
            .await
            .unwrap()
            .len(),
        1
    );

    let template: CreateTemplateRequest = serde_json::from_value(json!({
        "partner_id": alpha.id,
        "title": "Rapport technique",
        "structure": [{ "section": "Contexte", "details": "Rappel" }]
    }))
    .unwrap();
    let template = pool.insert_template(&template).await.unwrap();
    assert_eq!(template.structure.len(), 1);

    let files = pool.delete_partner(alpha.id).await.unwrap().unwrap();
    assert_eq!(files, vec!["reports/1/abc-mars.pdf".to_string()]);

    assert!(pool.get_partner(alpha.id).await.unwrap().is_none());
    assert!(pool.get_project(project.id).await.unwrap().is_none());
    assert!(pool.get_report(report.id).await.unwrap().is_none());
    assert!(pool.list_templates(Some(alpha.id)).await.unwrap().is_empty());
    // Organization-wide events survive.
    assert_eq!(pool.list_events(PartnerFilter::All).await.unwrap().len(), 1);
    assert_eq!(pool.list_reports(&ReportFilter::default()).await.unwrap().len(), 1);

    assert!(pool.delete_partner(alpha.id).await.unwrap().is_none());
}

#[actix_rt::test]
async fn test_sqlite_store_behind_the_api() {
    let pool = sqlite_pool().await;
    let ctx = TestContext::with_store(Arc::new(pool)).await;
    let app = create_test_app(&ctx).await;

    let (_, health) = get(&app, "/api/health").await;
    assert_eq!(health["store"], "sqlite");
    assert_eq!(health["mock"], false);

    let partner_id = create_partner(&app, json!({ "name": "Alpha Solutions" })).await;
    let project_id = create_project(&app, partner_id, "Digitalisation").await;
    let report_id = create_report(
        &app,
        json!({ "project_id": project_id, "title": "Rapport", "deadline": "2099-01-31" }),
    )
    .await;

    let (status, body) = delete(&app, &format!("/api/reports/{}", report_id)).await;
    assert_eq!(status, 204, "{:?}", body);
    let (status, _) = delete(&app, &format!("/api/reports/{}", report_id)).await;
    assert_eq!(status, 404);
}
