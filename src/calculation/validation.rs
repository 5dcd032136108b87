//! Day coverage validation and week readiness.
//!
//! Coverage rules come from [`WorkflowSettings`]; business-rule violations
//! are reported as data, never as errors.

use crate::config::{PayRates, RoleTaxonomy, WorkflowSettings};
use crate::models::{
    AssignmentGapRow, CoverageFailure, CoverageRule, DayValidation, PtoRequest, ScheduleSlot,
    ScheduleWeek, WeekReadinessChecks,
};

use super::pto_conflicts::pto_summary_for_day;
use super::roles::{is_closer_role, is_opener_role};
use super::slots::{estimated_labor_for_day, slot_hours};

/// Message returned when every coverage rule holds.
pub const COVERAGE_OK_MESSAGE: &str = "Coverage rules satisfied.";

fn plural(count: u32) -> &'static str {
    if count == 1 { "" } else { "s" }
}

fn counted_headcount(slots: &[ScheduleSlot], counts: impl Fn(&str) -> bool) -> u32 {
    slots
        .iter()
        .filter(|slot| counts(&slot.role))
        .fold(0, |total, slot| total.saturating_add(slot.headcount))
}

/// Checks a day's slots against the workflow coverage rules.
///
/// One failure is reported per unmet rule, openers first. The result
/// message is the first failure's message, or [`COVERAGE_OK_MESSAGE`].
///
/// # Arguments
///
/// * `slots` - The day's slots
/// * `workflow` - Minimum opener and closer positions
/// * `taxonomy` - Role classification table
///
/// # Example
///
/// ```
/// use scheduling_engine::calculation::day_validation;
/// use scheduling_engine::config::{RoleTaxonomy, WorkflowSettings};
/// use scheduling_engine::models::ScheduleSlot;
///
/// let slots = vec![
///     ScheduleSlot::new("a", "11:00".parse().unwrap(), "19:00".parse().unwrap(), "Opener Lead", 1).unwrap(),
///     ScheduleSlot::new("b", "15:00".parse().unwrap(), "23:00".parse().unwrap(), "Closer Lead", 1).unwrap(),
/// ];
/// let result = day_validation(&slots, &WorkflowSettings::default(), &RoleTaxonomy::default());
/// assert!(!result.ok);
/// assert_eq!(result.message, "Need at least 2 closing positions.");
/// ```
pub fn day_validation(
    slots: &[ScheduleSlot],
    workflow: &WorkflowSettings,
    taxonomy: &RoleTaxonomy,
) -> DayValidation {
    let openers = counted_headcount(slots, |role| is_opener_role(role, taxonomy));
    let closers = counted_headcount(slots, |role| is_closer_role(role, taxonomy));

    let mut failures = Vec::new();
    if openers < workflow.min_openers {
        failures.push(CoverageFailure {
            rule: CoverageRule::MinOpeners,
            required: workflow.min_openers,
            actual: openers,
            message: format!(
                "Need at least {} opener shift{}.",
                workflow.min_openers,
                plural(workflow.min_openers)
            ),
        });
    }
    if closers < workflow.min_closers {
        failures.push(CoverageFailure {
            rule: CoverageRule::MinClosers,
            required: workflow.min_closers,
            actual: closers,
            message: format!(
                "Need at least {} closing position{}.",
                workflow.min_closers,
                plural(workflow.min_closers)
            ),
        });
    }

    DayValidation {
        ok: failures.is_empty(),
        message: failures
            .first()
            .map_or_else(|| COVERAGE_OK_MESSAGE.to_string(), |f| f.message.clone()),
        failures,
    }
}

/// Total scheduled position-hours in a week.
pub fn week_labor_hours(week: &ScheduleWeek) -> f64 {
    week.days
        .iter()
        .flat_map(|day| day.slots.iter())
        .map(|slot| slot_hours(slot) * f64::from(slot.headcount))
        .sum()
}

/// Estimated labor cost of a week.
pub fn week_estimated_labor(week: &ScheduleWeek, pay_rates: &PayRates) -> f64 {
    week.days
        .iter()
        .map(|day| estimated_labor_for_day(&day.slots, pay_rates))
        .sum()
}

/// Readiness gate for publishing a week.
///
/// PTO conflicts count both approved and pending overlaps with assigned
/// employees.
pub fn next_week_checks(
    week: &ScheduleWeek,
    location: &str,
    pto: &[PtoRequest],
    workflow: &WorkflowSettings,
    taxonomy: &RoleTaxonomy,
) -> WeekReadinessChecks {
    let mut checks = WeekReadinessChecks::default();

    for day in &week.days {
        if day.pending_request_id.is_some() {
            checks.pending_requests += 1;
        }
        if day.has_exception {
            checks.unsubmitted_exceptions += 1;
        }
        if !day_validation(&day.slots, workflow, taxonomy).ok {
            checks.invalid_coverage_days += 1;
        }

        let summary = pto_summary_for_day(pto, location, day.date, &day.slots);
        checks.pto_conflicts += (summary.conflicts.len() + summary.pending_conflicts.len()) as u32;

        checks.unassigned_positions = day
            .slots
            .iter()
            .map(ScheduleSlot::open_positions)
            .fold(checks.unassigned_positions, u32::saturating_add);
    }

    checks
}

/// Unassigned positions for the first `weeks_ahead` weeks.
///
/// Weeks with every position filled are omitted. `unstaffed_slot_ids` lists
/// slots with nobody assigned at all.
pub fn assignment_gap_summary(weeks: &[ScheduleWeek], weeks_ahead: usize) -> Vec<AssignmentGapRow> {
    weeks
        .iter()
        .take(weeks_ahead)
        .filter_map(|week| {
            let mut unassigned = 0;
            let mut days_with_gaps = 0;
            let mut unstaffed_slot_ids = Vec::new();

            for day in &week.days {
                let open = day
                    .slots
                    .iter()
                    .map(ScheduleSlot::open_positions)
                    .fold(0u32, u32::saturating_add);
                if open > 0 {
                    days_with_gaps += 1;
                }
                unassigned = open.saturating_add(unassigned);
                unstaffed_slot_ids.extend(
                    day.slots
                        .iter()
                        .filter(|slot| slot.open_positions() == slot.effective_headcount())
                        .map(|slot| slot.id.clone()),
                );
            }

            (unassigned > 0).then(|| AssignmentGapRow {
                week_label: format!("Week of {}", week.week_start),
                unassigned,
                days_with_gaps,
                unstaffed_slot_ids,
            })
        })
        .collect()
}
