//! Recurring partner meetings, synthesized on read.

use chrono::{DateTime, Datelike, Duration, Months, Utc};

use crate::models::dates::start_of_day;
use crate::models::{MeetingFrequency, Partner};

/// How far past `now` the series extends, in calendar months.
pub const HORIZON_MONTHS: u32 = 3;

/// Upper bound on generated occurrences per partner.
pub const MAX_OCCURRENCES: usize = 12;

/// One generated meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    /// Steps from the anchor, so `anchor + index * cadence == date`.
    pub index: u32,
    pub date: DateTime<Utc>,
}

/// The `n`-th occurrence after `anchor`.
///
/// Month and year steps are computed from the anchor rather than chained, so
/// a series anchored on the 31st lands on month ends without drifting.
fn nth(anchor: DateTime<Utc>, frequency: MeetingFrequency, n: u32) -> Option<DateTime<Utc>> {
    match frequency {
        MeetingFrequency::None => None,
        MeetingFrequency::Weekly => anchor.checked_add_signed(Duration::weeks(i64::from(n))),
        MeetingFrequency::Monthly => anchor.checked_add_months(Months::new(n)),
        MeetingFrequency::Yearly => anchor.checked_add_months(Months::new(n.checked_mul(12)?)),
    }
}

/// A step count that is at or just before the first occurrence >= `today`.
fn first_candidate(anchor: DateTime<Utc>, today: DateTime<Utc>, frequency: MeetingFrequency) -> u32 {
    if anchor >= today {
        return 0;
    }

    let (a, t) = (anchor.date_naive(), today.date_naive());
    let steps = match frequency {
        MeetingFrequency::None => 0,
        MeetingFrequency::Weekly => (t - a).num_days() / 7,
        MeetingFrequency::Monthly => {
            i64::from(t.year() - a.year()) * 12 + i64::from(t.month()) - i64::from(a.month()) - 1
        }
        MeetingFrequency::Yearly => i64::from(t.year() - a.year()) - 1,
    };

    u32::try_from(steps.max(0)).unwrap_or(u32::MAX)
}

/// Meeting occurrences for a partner between today and the horizon.
///
/// The series is anchored on the contract start date at midnight UTC, or on
/// `now` when the partner has none. Occurrences start at the first one on or
/// after the start of today, stop after [`HORIZON_MONTHS`] months or
/// [`MAX_OCCURRENCES`] items, and never pass the contract end date.
pub fn recurring_occurrences(partner: &Partner, now: DateTime<Utc>) -> Vec<Occurrence> {
    let frequency = partner.meeting_frequency;
    if frequency == MeetingFrequency::None {
        return Vec::new();
    }

    let anchor = partner.contract_start_date.map(start_of_day).unwrap_or(now);
    let today = start_of_day(now.date_naive());
    let horizon = now
        .checked_add_months(Months::new(HORIZON_MONTHS))
        .unwrap_or(now);

    let mut n = first_candidate(anchor, today, frequency);
    let mut out = Vec::new();

    while out.len() < MAX_OCCURRENCES {
        let Some(date) = nth(anchor, frequency, n) else {
            break;
        };
        if date > horizon {
            break;
        }
        if partner
            .contract_end_date
            .is_some_and(|end| date.date_naive() > end)
        {
            break;
        }
        if date >= today {
            out.push(Occurrence { index: n, date });
        }
        n = match n.checked_add(1) {
            Some(next) => next,
            None => break,
        };
    }

    out
}
