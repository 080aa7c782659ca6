//! Global progress curve, contract progress and dashboard counters.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

use crate::models::{
    CalendarItem, ContractProgress, Partner, ProgressPoint, Project, ProjectStatus, Report,
    ReportStatus, SummaryStats,
};

/// Months shown before now when there are no projects yet.
const DEFAULT_LOOKBACK_MONTHS: u32 = 6;

/// Months shown after now at minimum.
const LOOKAHEAD_MONTHS: u32 = 3;

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(first: NaiveDate) -> NaiveDate {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first)
}

fn percent(count: usize, total: usize) -> u8 {
    let ratio = count as f64 * 100.0 / total.max(1) as f64;
    ratio.round().clamp(0.0, 100.0) as u8
}

/// Expected-versus-actual submission curve across all reports.
///
/// One point per month from the month of the earliest project to the latest
/// of: the last deadline, the last submission, and three months from now.
/// A month counts everything due (or submitted) by its last day.
pub fn progress_series(
    projects: &[Project],
    reports: &[Report],
    now: DateTime<Utc>,
) -> Vec<ProgressPoint> {
    let today = now.date_naive();

    let start = projects
        .iter()
        .map(|p| p.created_at.date_naive())
        .min()
        .unwrap_or_else(|| {
            today
                .checked_sub_months(Months::new(DEFAULT_LOOKBACK_MONTHS))
                .unwrap_or(today)
        });
    let start = first_of_month(start);

    let deadlines: Vec<NaiveDate> = reports.iter().filter_map(|r| r.deadline).collect();
    let submissions: Vec<NaiveDate> = reports
        .iter()
        .filter_map(|r| r.submission_date.map(|d| d.date_naive()))
        .collect();

    let end = [
        deadlines.iter().max().copied(),
        submissions.iter().max().copied(),
        today.checked_add_months(Months::new(LOOKAHEAD_MONTHS)),
    ]
    .into_iter()
    .flatten()
    .max()
    .unwrap_or(today);
    let end = first_of_month(end);

    let total = reports.len();
    let mut points = Vec::new();
    let mut month = start;

    while month <= end {
        let boundary = last_of_month(month);
        let due = deadlines.iter().filter(|d| **d <= boundary).count();
        let submitted = submissions.iter().filter(|d| **d <= boundary).count();

        points.push(ProgressPoint {
            month: month.format("%Y-%m").to_string(),
            label: month.format("%b %Y").to_string(),
            expected: percent(due, total),
            actual: percent(submitted, total),
        });

        month = match month.checked_add_months(Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    points
}

/// Elapsed share of a partner's contract, if both dates are set and ordered.
pub fn contract_progress(partner: &Partner, now: DateTime<Utc>) -> Option<ContractProgress> {
    let start = partner.contract_start_date?;
    let end = partner.contract_end_date?;
    if end <= start {
        return None;
    }

    let today = now.date_naive();
    let total = (end - start).num_days();
    let elapsed = (today - start).num_days().clamp(0, total);

    Some(ContractProgress {
        elapsed_percent: percent(elapsed as usize, total as usize),
        days_remaining: (end - today).num_days().max(0),
        ended: today >= end,
    })
}

/// Headline counters for the dashboard.
pub fn summary_stats(
    partners: &[Partner],
    projects: &[Project],
    reports: &[Report],
    calendar: &[CalendarItem],
    now: DateTime<Utc>,
) -> SummaryStats {
    let today = now.date_naive();
    let mut stats = SummaryStats {
        partners: partners.len(),
        active_projects: projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Active)
            .count(),
        alerts: calendar.iter().filter(|item| item.is_alert).count(),
        ..Default::default()
    };

    for report in reports {
        match report.effective_status(today) {
            ReportStatus::Pending => stats.reports_pending += 1,
            ReportStatus::Validated => stats.reports_validated += 1,
            ReportStatus::Late => stats.reports_late += 1,
            ReportStatus::Draft => {}
        }
    }

    stats
}
