//! Unified calendar: stored events, report deadlines and recurring meetings.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::{
    CalendarItem, CalendarSource, Event, EventType, Partner, PartnerFilter, Project, Report,
};

use super::recurrence::recurring_occurrences;

/// Items up to this long ago still count as alerts.
pub const ALERT_TRAIL: Duration = Duration::hours(12);

/// Items closer than this count as alerts.
pub const ALERT_LEAD: Duration = Duration::days(3);

/// Whether `date` falls in the notification window `[now - 12h, now + 3d)`.
pub fn is_alert(date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    date >= now - ALERT_TRAIL && date < now + ALERT_LEAD
}

/// Merge the three calendar sources for the selected partners.
///
/// Items are sorted by date; the sort is stable, so items sharing a date
/// keep the order stored events, deadlines, recurring meetings.
pub fn build_calendar(
    events: &[Event],
    reports: &[Report],
    projects: &[Project],
    partners: &[Partner],
    filter: PartnerFilter,
    now: DateTime<Utc>,
) -> Vec<CalendarItem> {
    let partner_names: HashMap<i32, &str> =
        partners.iter().map(|p| (p.id, p.name.as_str())).collect();
    let projects_by_id: HashMap<i32, &Project> = projects.iter().map(|p| (p.id, p)).collect();
    let name_of = |id: Option<i32>| {
        id.and_then(|id| partner_names.get(&id))
            .map(|name| (*name).to_string())
    };

    let mut items = Vec::new();

    for event in events.iter().filter(|e| filter.matches(e.partner_id)) {
        items.push(CalendarItem {
            key: format!("event-{}", event.id),
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.event_date,
            event_type: event.event_type,
            partner_id: event.partner_id,
            partner_name: name_of(event.partner_id),
            source: CalendarSource::Stored { event_id: event.id },
            is_alert: is_alert(event.event_date, now),
        });
    }

    for report in reports {
        let Some(deadline) = report.deadline else {
            continue;
        };
        let project = projects_by_id.get(&report.project_id);
        let partner_id = project.map(|p| p.partner_id);
        if !filter.matches(partner_id) {
            continue;
        }
        let Some(date) = deadline.and_hms_opt(23, 59, 59).map(|d| d.and_utc()) else {
            continue;
        };

        items.push(CalendarItem {
            key: format!("report-{}", report.id),
            title: report.title.clone(),
            description: Some(match project {
                Some(p) => format!("Échéance de remise du rapport ({})", p.title),
                None => "Échéance de remise du rapport".to_string(),
            }),
            date,
            event_type: EventType::Deadline,
            partner_id,
            partner_name: name_of(partner_id),
            source: CalendarSource::DerivedFromDeadline {
                report_id: report.id,
                project_id: report.project_id,
            },
            is_alert: is_alert(date, now),
        });
    }

    for partner in partners.iter().filter(|p| filter.matches(Some(p.id))) {
        for occurrence in recurring_occurrences(partner, now) {
            items.push(CalendarItem {
                key: format!(
                    "meeting-{}-{}",
                    partner.id,
                    occurrence.date.format("%Y-%m-%d")
                ),
                title: format!("Réunion de suivi - {}", partner.name),
                description: Some(format!(
                    "Réunion {} avec {}",
                    frequency_label(partner),
                    partner.name
                )),
                date: occurrence.date,
                event_type: EventType::Meeting,
                partner_id: Some(partner.id),
                partner_name: Some(partner.name.clone()),
                source: CalendarSource::DerivedFromRecurrence {
                    frequency: partner.meeting_frequency,
                    occurrence: occurrence.index,
                },
                is_alert: is_alert(occurrence.date, now),
            });
        }
    }

    items.sort_by_key(|item| item.date);
    items
}

fn frequency_label(partner: &Partner) -> &'static str {
    use crate::models::MeetingFrequency;
    match partner.meeting_frequency {
        MeetingFrequency::Weekly => "hebdomadaire",
        MeetingFrequency::Monthly => "mensuelle",
        MeetingFrequency::Yearly => "annuelle",
        MeetingFrequency::None => "ponctuelle",
    }
}
