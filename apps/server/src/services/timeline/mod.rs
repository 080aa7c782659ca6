//! Timeline views derived from stored data: the unified calendar, the
//! recurring meeting series, the global progress curve and dashboard counters.
//!
//! Everything here is a pure function of store snapshots and an explicit
//! `now`, so handlers fetch, call in, and serialize.

mod calendar;
mod progress;
mod recurrence;

pub use calendar::{build_calendar, is_alert, ALERT_LEAD, ALERT_TRAIL};
pub use progress::{contract_progress, progress_series, summary_stats};
pub use recurrence::{recurring_occurrences, Occurrence, HORIZON_MONTHS, MAX_OCCURRENCES};
