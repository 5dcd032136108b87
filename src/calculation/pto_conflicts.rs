//! PTO overlap and conflict detection.
//!
//! Cross-references time-off requests against the employees assigned on a
//! schedule day. Date ranges are inclusive at both ends.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::{PtoRequest, PtoStatus, PtoSummary, ScheduleSlot};

/// Location code that applies a request, or a scope, to every location.
pub const ALL_LOCATIONS: &str = "BOTH";

/// Whether a request filed for `request_location` applies to `scope_location`.
///
/// Codes must match exactly. A request with an empty location or the
/// [`ALL_LOCATIONS`] wildcard applies everywhere, and an [`ALL_LOCATIONS`]
/// scope accepts every request.
pub fn pto_location_matches(request_location: &str, scope_location: &str) -> bool {
    let request = request_location.trim();
    let scope = scope_location.trim();
    request.is_empty() || request == ALL_LOCATIONS || scope == ALL_LOCATIONS || request == scope
}

/// Whether the request overlaps `start..=end`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use scheduling_engine::calculation::pto_date_overlap;
/// use scheduling_engine::models::{PtoRequest, PtoStatus};
///
/// let date = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
/// let request = PtoRequest {
///     id: "p1".into(),
///     employee: "Ana".into(),
///     start_date: date(1),
///     end_date: date(5),
///     location: "EP".into(),
///     status: PtoStatus::Approved,
/// };
/// assert!(pto_date_overlap(&request, date(5), date(9)));
/// assert!(!pto_date_overlap(&request, date(6), date(9)));
/// ```
pub fn pto_date_overlap(request: &PtoRequest, start: NaiveDate, end: NaiveDate) -> bool {
    request.start_date <= end && request.end_date >= start
}

/// Requests in scope for `location` that overlap `start..=end`.
pub fn pto_rows_for_range<'a>(
    requests: &'a [PtoRequest],
    location: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<&'a PtoRequest> {
    requests
        .iter()
        .filter(|request| {
            pto_location_matches(&request.location, location) && pto_date_overlap(request, start, end)
        })
        .collect()
}

/// Requests in scope for `location` that cover `date`.
pub fn pto_rows_for_day<'a>(
    requests: &'a [PtoRequest],
    location: &str,
    date: NaiveDate,
) -> Vec<&'a PtoRequest> {
    pto_rows_for_range(requests, location, date, date)
}

fn normalized_person_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalized names of everyone assigned across `slots`.
///
/// Names are trimmed, inner whitespace collapsed and lowercased; blanks are
/// skipped.
pub fn assigned_people_for_day(slots: &[ScheduleSlot]) -> BTreeSet<String> {
    slots
        .iter()
        .flat_map(|slot| slot.assignments.iter())
        .map(|name| normalized_person_name(name))
        .filter(|name| !name.is_empty())
        .collect()
}

/// PTO counts and conflicts for one day.
///
/// A conflict is an assigned employee with approved PTO covering the day.
/// Assigned employees with pending PTO are reported separately.
pub fn pto_summary_for_day(
    requests: &[PtoRequest],
    location: &str,
    date: NaiveDate,
    slots: &[ScheduleSlot],
) -> PtoSummary {
    let rows = pto_rows_for_day(requests, location, date);
    let assigned = assigned_people_for_day(slots);

    let approved: Vec<&PtoRequest> = rows
        .iter()
        .copied()
        .filter(|row| row.status == PtoStatus::Approved)
        .collect();
    let pending: Vec<&PtoRequest> = rows
        .iter()
        .copied()
        .filter(|row| row.status == PtoStatus::Pending)
        .collect();

    let conflicting = |candidates: &[&PtoRequest]| -> Vec<PtoRequest> {
        candidates
            .iter()
            .filter(|row| assigned.contains(&normalized_person_name(&row.employee)))
            .map(|row| (*row).clone())
            .collect()
    };

    PtoSummary {
        total: rows.len(),
        approved_count: approved.len(),
        pending_count: pending.len(),
        conflicts: conflicting(&approved),
        pending_conflicts: conflicting(&pending),
    }
}
