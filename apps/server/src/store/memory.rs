//! In-memory store used when no database is reachable.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::dates::{parse_date, parse_timestamp};
use crate::models::{
    CreateEventRequest, CreatePartnerRequest, CreateProjectRequest, CreateTemplateRequest, Event,
    EventType, EvolutionPoint, MeetingFrequency, NewReport, Partner, PartnerFilter, Project,
    ProjectStatus, Report, ReportFilter, ReportStatus, ReportTemplate, TemplateSection,
    record_point,
};

use super::PortalStore;

#[derive(Default)]
struct Tables {
    partners: Vec<Partner>,
    projects: Vec<Project>,
    reports: Vec<Report>,
    events: Vec<Event>,
    templates: Vec<ReportTemplate>,
    sequences: Sequences,
}

/// Last id handed out per table; ids are never reused.
#[derive(Default)]
struct Sequences {
    partner: i32,
    project: i32,
    report: i32,
    event: i32,
    template: i32,
}

fn next(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

fn max_id(ids: impl Iterator<Item = i32>) -> i32 {
    ids.max().unwrap_or(0)
}

impl Tables {
    fn reset_sequences(&mut self) {
        self.sequences = Sequences {
            partner: max_id(self.partners.iter().map(|p| p.id)),
            project: max_id(self.projects.iter().map(|p| p.id)),
            report: max_id(self.reports.iter().map(|r| r.id)),
            event: max_id(self.events.iter().map(|e| e.id)),
            template: max_id(self.templates.iter().map(|t| t.id)),
        };
    }

    fn partner_of_project(&self, project_id: i32) -> Option<i32> {
        self.projects
            .iter()
            .find(|p| p.id == project_id)
            .map(|p| p.partner_id)
    }
}

/// Process-local tables behind an async `RwLock`.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Store seeded with the demonstration dataset.
    pub fn with_demo_data() -> Self {
        let mut tables = demo_tables();
        tables.reset_sequences();
        Self {
            tables: RwLock::new(tables),
        }
    }
}

#[async_trait]
impl PortalStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn is_mock(&self) -> bool {
        true
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn list_partners(&self) -> AppResult<Vec<Partner>> {
        let tables = self.tables.read().await;
        let mut partners = tables.partners.clone();
        partners.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(partners)
    }

    async fn get_partner(&self, id: i32) -> AppResult<Option<Partner>> {
        let tables = self.tables.read().await;
        Ok(tables.partners.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_partner(&self, req: &CreatePartnerRequest) -> AppResult<Partner> {
        let mut tables = self.tables.write().await;
        let partner = Partner {
            id: next(&mut tables.sequences.partner),
            name: req.name.trim().to_string(),
            contact_email: req.contact_email.clone(),
            description: req.description.clone(),
            country: req.country.clone(),
            contract_start_date: req.contract_start_date,
            contract_end_date: req.contract_end_date,
            meeting_frequency: req.meeting_frequency,
            created_at: Utc::now(),
        };
        tables.partners.push(partner.clone());
        Ok(partner)
    }

    async fn delete_partner(&self, id: i32) -> AppResult<Option<Vec<String>>> {
        let mut tables = self.tables.write().await;
        if !tables.partners.iter().any(|p| p.id == id) {
            return Ok(None);
        }

        let project_ids: HashSet<i32> = tables
            .projects
            .iter()
            .filter(|p| p.partner_id == id)
            .map(|p| p.id)
            .collect();

        let file_paths = tables
            .reports
            .iter()
            .filter(|r| project_ids.contains(&r.project_id))
            .filter_map(|r| r.file_path.clone())
            .collect();

        tables.reports.retain(|r| !project_ids.contains(&r.project_id));
        tables.projects.retain(|p| p.partner_id != id);
        tables.events.retain(|e| e.partner_id != Some(id));
        tables.templates.retain(|t| t.partner_id != id);
        tables.partners.retain(|p| p.id != id);

        Ok(Some(file_paths))
    }

    async fn list_projects(&self, partner_id: Option<i32>) -> AppResult<Vec<Project>> {
        let tables = self.tables.read().await;
        let mut projects: Vec<Project> = tables
            .projects
            .iter()
            .filter(|p| partner_id.is_none_or(|id| p.partner_id == id))
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(projects)
    }

    async fn get_project(&self, id: i32) -> AppResult<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_project(&self, req: &CreateProjectRequest) -> AppResult<Project> {
        let mut tables = self.tables.write().await;
        let project = Project {
            id: next(&mut tables.sequences.project),
            partner_id: req.partner_id,
            title: req.title.trim().to_string(),
            description: req.description.clone(),
            status: req.status.unwrap_or_default(),
            evolution_data: req.normalized_evolution(),
            created_at: Utc::now(),
        };
        tables.projects.push(project.clone());
        Ok(project)
    }

    async fn record_project_point(
        &self,
        id: i32,
        point: EvolutionPoint,
    ) -> AppResult<Option<Project>> {
        let mut tables = self.tables.write().await;
        Ok(tables.projects.iter_mut().find(|p| p.id == id).map(|p| {
            record_point(&mut p.evolution_data, point);
            p.clone()
        }))
    }

    async fn list_reports(&self, filter: &ReportFilter) -> AppResult<Vec<Report>> {
        let tables = self.tables.read().await;
        let mut reports: Vec<Report> = tables
            .reports
            .iter()
            .filter(|r| filter.project_id.is_none_or(|id| r.project_id == id))
            .filter(|r| {
                filter
                    .partner_id
                    .is_none_or(|id| tables.partner_of_project(r.project_id) == Some(id))
            })
            .cloned()
            .collect();
        reports.sort_by_key(|r| (r.deadline.is_none(), r.deadline, r.id));
        Ok(reports)
    }

    async fn get_report(&self, id: i32) -> AppResult<Option<Report>> {
        let tables = self.tables.read().await;
        Ok(tables.reports.iter().find(|r| r.id == id).cloned())
    }

    async fn insert_report(&self, new: &NewReport) -> AppResult<Report> {
        let mut tables = self.tables.write().await;
        let report = Report {
            id: next(&mut tables.sequences.report),
            project_id: new.project_id,
            title: new.title.clone(),
            deadline: new.deadline,
            submission_date: new.submission_date,
            status: new.status,
            file_path: None,
            created_at: Utc::now(),
        };
        tables.reports.push(report.clone());
        Ok(report)
    }

    async fn update_report(&self, report: &Report) -> AppResult<Report> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .reports
            .iter_mut()
            .find(|r| r.id == report.id)
            .ok_or_else(|| AppError::NotFound(format!("Report {}", report.id)))?;

        stored.status = report.status;
        stored.submission_date = report.submission_date;
        stored.file_path = report.file_path.clone();
        Ok(stored.clone())
    }

    async fn delete_report(&self, id: i32) -> AppResult<Option<Report>> {
        let mut tables = self.tables.write().await;
        let position = tables.reports.iter().position(|r| r.id == id);
        Ok(position.map(|i| tables.reports.remove(i)))
    }

    async fn list_events(&self, filter: PartnerFilter) -> AppResult<Vec<Event>> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables
            .events
            .iter()
            .filter(|e| filter.matches(e.partner_id))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.event_date.cmp(&b.event_date).then(a.id.cmp(&b.id)));
        Ok(events)
    }

    async fn insert_event(&self, req: &CreateEventRequest) -> AppResult<Event> {
        let mut tables = self.tables.write().await;
        let event = Event {
            id: next(&mut tables.sequences.event),
            partner_id: req.partner_id,
            title: req.title.trim().to_string(),
            description: req.description.clone(),
            event_date: req.event_date,
            event_type: req.event_type,
            created_at: Utc::now(),
        };
        tables.events.push(event.clone());
        Ok(event)
    }

    async fn list_templates(&self, partner_id: Option<i32>) -> AppResult<Vec<ReportTemplate>> {
        let tables = self.tables.read().await;
        let mut templates: Vec<ReportTemplate> = tables
            .templates
            .iter()
            .filter(|t| partner_id.is_none_or(|id| t.partner_id == id))
            .cloned()
            .collect();
        templates.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(templates)
    }

    async fn insert_template(&self, req: &CreateTemplateRequest) -> AppResult<ReportTemplate> {
        let mut tables = self.tables.write().await;
        let content = &req.content;
        let template = ReportTemplate {
            id: next(&mut tables.sequences.template),
            partner_id: req.partner_id,
            title: content.title.trim().to_string(),
            instructions: content.instructions.clone(),
            structure: content.structure.clone(),
            requires_video: content.requires_video,
            requires_audio: content.requires_audio,
            requires_text: content.requires_text,
            text_formats: content.text_formats.clone(),
            created_at: Utc::now(),
        };
        tables.templates.push(template.clone());
        Ok(template)
    }
}

fn day(raw: &str) -> Option<NaiveDate> {
    parse_date(raw)
}

fn at(raw: &str) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap_or_else(Utc::now)
}

fn points(raw: &[(&str, u8)]) -> Vec<EvolutionPoint> {
    raw.iter()
        .map(|(date, progress)| EvolutionPoint {
            date: (*date).to_string(),
            progress: *progress,
        })
        .collect()
}

fn demo_tables() -> Tables {
    let partners = vec![
        Partner {
            id: 1,
            name: "Alpha Solutions".to_string(),
            contact_email: Some("contact@alpha.lu".to_string()),
            description: Some("Partenaire technologique spécialisé en infrastructure.".to_string()),
            country: Some("Luxembourg".to_string()),
            contract_start_date: day("2024-01-01"),
            contract_end_date: day("2027-01-01"),
            meeting_frequency: MeetingFrequency::Monthly,
            created_at: at("2024-01-01T09:00:00Z"),
        },
        Partner {
            id: 2,
            name: "Green Energy Co".to_string(),
            contact_email: Some("info@green.lu".to_string()),
            description: Some("Consultants en développement durable.".to_string()),
            country: Some("Luxembourg".to_string()),
            contract_start_date: day("2023-06-01"),
            contract_end_date: day("2025-06-01"),
            meeting_frequency: MeetingFrequency::None,
            created_at: at("2023-06-01T09:00:00Z"),
        },
    ];

    let projects = vec![
        Project {
            id: 101,
            partner_id: 1,
            title: "Digitalisation Phase 1".to_string(),
            description: Some("Mise en place de serveurs cloud.".to_string()),
            status: ProjectStatus::Active,
            evolution_data: points(&[
                ("2024-01", 10),
                ("2024-03", 35),
                ("2024-06", 60),
                ("2024-09", 85),
            ]),
            created_at: at("2024-01-10T00:00:00Z"),
        },
        Project {
            id: 102,
            partner_id: 2,
            title: "Audit Écomobilité".to_string(),
            description: Some("Analyse du parc automobile du partenaire.".to_string()),
            status: ProjectStatus::Active,
            evolution_data: points(&[("2023-06", 5), ("2023-12", 45), ("2024-06", 90)]),
            created_at: at("2023-06-15T00:00:00Z"),
        },
    ];

    let report = |id, project_id, title: &str, deadline, submitted: Option<&str>, status| Report {
        id,
        project_id,
        title: title.to_string(),
        deadline: day(deadline),
        submission_date: submitted.map(at),
        status,
        file_path: None,
        created_at: at("2024-12-01T00:00:00Z"),
    };
    let reports = vec![
        report(
            1001,
            101,
            "Rapport Mensuel Janvier - Digitalisation",
            "2025-01-31",
            Some("2025-01-05T00:00:00Z"),
            ReportStatus::Validated,
        ),
        report(
            1002,
            101,
            "Rapport Mensuel Février - Digitalisation",
            "2025-02-28",
            Some("2025-02-02T00:00:00Z"),
            ReportStatus::Pending,
        ),
        report(
            1003,
            102,
            "Audit Mi-parcours - Écomobilité",
            "2024-12-31",
            Some("2024-12-15T00:00:00Z"),
            ReportStatus::Validated,
        ),
        report(
            1004,
            102,
            "Rapport Trimestriel Q1 - Écomobilité",
            "2025-03-31",
            None,
            ReportStatus::Draft,
        ),
    ];

    let events = vec![
        Event {
            id: 1,
            partner_id: Some(1),
            title: "Réunion de Pilotage".to_string(),
            description: Some("Discussion sur la phase 2 du projet.".to_string()),
            event_date: at("2025-02-15T10:00:00"),
            event_type: EventType::Meeting,
            created_at: at("2025-01-15T00:00:00Z"),
        },
        Event {
            id: 2,
            partner_id: Some(2),
            title: "Présentation Audit".to_string(),
            description: Some("Restitution finale de l'audit écomobilité.".to_string()),
            event_date: at("2025-02-20T14:30:00"),
            event_type: EventType::Meeting,
            created_at: at("2025-01-15T00:00:00Z"),
        },
        Event {
            id: 3,
            partner_id: Some(1),
            title: "Deadline Rapport Trimestriel".to_string(),
            description: Some("Échéance pour la soumission du rapport Q1.".to_string()),
            event_date: at("2025-03-31T23:59:59"),
            event_type: EventType::Deadline,
            created_at: at("2025-01-15T00:00:00Z"),
        },
    ];

    let section = |name: &str, details: &str| TemplateSection {
        section: name.to_string(),
        details: details.to_string(),
    };
    let templates = vec![
        ReportTemplate {
            id: 1,
            partner_id: 1,
            title: "Template de Rapport Technique Infra".to_string(),
            instructions: "Merci d'inclure une vidéo de démonstration de l'infrastructure, un audio explicatif des choix techniques et le document PDF détaillé.".to_string(),
            structure: vec![
                section("Architecture", "Schéma et choix techniques"),
                section("Déploiement", "État d'avancement des serveurs"),
            ],
            requires_video: true,
            requires_audio: true,
            requires_text: true,
            text_formats: "Word, PDF, Texte Simple".to_string(),
            created_at: at("2024-02-01T00:00:00Z"),
        },
        ReportTemplate {
            id: 2,
            partner_id: 2,
            title: "Modèle d'Audit Écologique".to_string(),
            instructions: "Audio court pour résumer les points clés + rapport Word complet.".to_string(),
            structure: vec![
                section("Constats", "Principaux résultats de l'audit"),
                section("Recommandations", "Actions proposées"),
            ],
            requires_video: false,
            requires_audio: true,
            requires_text: true,
            text_formats: "Word, PDF".to_string(),
            created_at: at("2024-02-01T00:00:00Z"),
        },
    ];

    Tables {
        partners,
        projects,
        reports,
        events,
        templates,
        sequences: Sequences::default(),
    }
}
