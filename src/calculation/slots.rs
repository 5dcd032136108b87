//! Slot-level scheduling primitives.
//!
//! Slot construction with deterministic identifiers, slot duration, evening
//! detection, pay-rate lookup, daily labor estimation and seasonal hours.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::{EveningWindow, PayRates, RoleTaxonomy, SeasonHours};
use crate::error::EngineResult;
use crate::models::{ClockTime, RoleTag, ScheduleSlot, Season};

use super::roles::classify_role;

/// Opening and closing hour for a season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonWindow {
    /// Opening hour, fractional.
    pub open_hour: f64,
    /// Closing hour, fractional.
    pub close_hour: f64,
}

/// Identifier for the `index`th slot generated for a weekday template.
pub fn template_slot_id(weekday: Weekday, index: usize) -> String {
    format!("slot_{}_{}", weekday.to_string().to_lowercase(), index)
}

/// Identifier for the slot a weather recommendation adds to a date.
pub fn weather_slot_id(date: NaiveDate) -> String {
    format!("slot_weather_{}", date)
}

/// Creates a slot with `max(1, headcount)` open positions.
///
/// Identifiers are supplied by the caller so repeated calls produce equal
/// slots; see [`template_slot_id`] and [`weather_slot_id`].
///
/// # Returns
///
/// Returns `InvalidSlot` when `end` is earlier than `start`.
pub fn make_slot(
    id: impl Into<String>,
    start: ClockTime,
    end: ClockTime,
    role: &str,
    headcount: u32,
) -> EngineResult<ScheduleSlot> {
    ScheduleSlot::new(id, start, end, role, headcount)
}

/// Slot duration in hours.
///
/// Slots never cross midnight, so this is `end - start` and never negative.
///
/// # Example
///
/// ```
/// use scheduling_engine::calculation::slot_hours;
/// use scheduling_engine::models::ScheduleSlot;
///
/// let slot = ScheduleSlot::new("s", "11:00".parse().unwrap(), "19:30".parse().unwrap(), "Opener", 1).unwrap();
/// assert_eq!(slot_hours(&slot), 8.5);
/// ```
pub fn slot_hours(slot: &ScheduleSlot) -> f64 {
    (slot.end.hours() - slot.start.hours()).max(0.0)
}

/// Whether a slot covers the evening.
///
/// True when the slot starts at or after the window's start hour, ends at or
/// after its end hour, or carries an evening role.
pub fn is_evening_slot(slot: &ScheduleSlot, window: &EveningWindow, taxonomy: &RoleTaxonomy) -> bool {
    slot.start.hours() >= window.start_hour
        || slot.end.hours() >= window.end_hour
        || classify_role(&slot.role, taxonomy) == RoleTag::Evening
}

/// Hourly rate for the slot's role.
pub fn role_rate_for_slot(slot: &ScheduleSlot, pay_rates: &PayRates) -> f64 {
    pay_rates.rate_for_role(&slot.role)
}

/// Estimated labor cost for a day's slots.
///
/// Each slot contributes hours x `max(1, headcount)` x role rate.
pub fn estimated_labor_for_day(slots: &[ScheduleSlot], pay_rates: &PayRates) -> f64 {
    slots
        .iter()
        .map(|slot| {
            slot_hours(slot) * f64::from(slot.effective_headcount()) * role_rate_for_slot(slot, pay_rates)
        })
        .sum()
}

/// Opening and closing hours for `season`.
pub fn season_hours_for(season: Season, hours: &SeasonHours) -> SeasonWindow {
    let (open, close) = hours.for_season(season);
    SeasonWindow {
        open_hour: open.hours(),
        close_hour: close.hours(),
    }
}
