//! Dashboard statistics DTOs.

use serde::Serialize;
use utoipa::ToSchema;

/// One month of the global expected-vs-actual report curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProgressPoint {
    /// `YYYY-MM`
    pub month: String,
    /// Display label, e.g. `Feb 2024`.
    pub label: String,
    /// Percentage of all reports due by the end of this month.
    pub expected: u8,
    /// Percentage of all reports submitted by the end of this month.
    pub actual: u8,
}

/// Headline counters for the dashboard cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SummaryStats {
    pub partners: usize,
    pub active_projects: usize,
    pub reports_pending: usize,
    pub reports_validated: usize,
    pub reports_late: usize,
    /// Calendar items inside the alert window.
    pub alerts: usize,
}
