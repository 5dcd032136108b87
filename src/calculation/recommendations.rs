//! Weather-driven staffing recommendations for a schedule day.
//!
//! [`day_recommendation`] proposes adding or trimming one support position;
//! [`apply_recommendation_to_day`] returns a new day with the change made.
//! Opener and closer slots are never touched.

use tracing::debug;

use crate::config::TenantSettings;
use crate::models::{
    ClockTime, RecommendationAction, RoleTag, ScheduleDay, ScheduleSlot, StaffingRecommendation,
    WeatherImpact, WeatherSignal, WeatherWindow, MAX_SLOT_HEADCOUNT,
};

use super::roles::{classify_role, is_adjustable_role};
use super::slots::{is_evening_slot, weather_slot_id};
use super::weather_impact::staffing_weather_action;

/// Role of the slot added when a day has nothing adjustable.
pub const WEATHER_SUPPORT_ROLE: &str = "Weather Support";

/// Builds the recommendation for a day under a weather signal.
///
/// Neutral weather yields no action. Otherwise the key is
/// `"<date>:<action>"`; a day whose last accepted key matches is reported as
/// already applied and cannot be applied again. Trimming needs at least one
/// adjustable slot.
pub fn day_recommendation(
    signal: &WeatherSignal,
    day: &ScheduleDay,
    settings: &TenantSettings,
) -> StaffingRecommendation {
    let message = staffing_weather_action(signal, &settings.workflow);

    let action = match signal.impact {
        WeatherImpact::Up => RecommendationAction::IncreaseSupport,
        WeatherImpact::Down => RecommendationAction::DecreaseSupport,
        WeatherImpact::Neutral => {
            return StaffingRecommendation {
                action: None,
                signal: signal.clone(),
                message,
                can_apply: false,
                button_label: String::new(),
                key: String::new(),
                already_applied: false,
            };
        }
    };

    let key = format!("{}:{}", day.date, action.as_str());
    let already_applied = day.last_accepted_recommendation_key.as_deref() == Some(key.as_str());
    let has_adjustable = day
        .slots
        .iter()
        .any(|slot| is_adjustable_role(&slot.role, &settings.role_taxonomy));
    let applicable = match action {
        RecommendationAction::IncreaseSupport => true,
        RecommendationAction::DecreaseSupport => has_adjustable,
    };

    let button_label = if already_applied {
        "Recommendation Applied"
    } else {
        match action {
            RecommendationAction::IncreaseSupport => "Accept Recommendation (+1 Support)",
            RecommendationAction::DecreaseSupport => "Accept Recommendation (-1 Support)",
        }
    };

    StaffingRecommendation {
        action: Some(action),
        signal: signal.clone(),
        message,
        can_apply: applicable && !already_applied,
        button_label: button_label.to_string(),
        key,
        already_applied,
    }
}

fn weather_support_slot(day: &ScheduleDay) -> ScheduleSlot {
    ScheduleSlot {
        id: weather_slot_id(day.date),
        start: ClockTime::from_minutes(17 * 60),
        end: ClockTime::from_minutes(22 * 60),
        role: WEATHER_SUPPORT_ROLE.to_string(),
        headcount: 1,
        assignments: vec![String::new()],
    }
}

/// Applies a recommendation, returning the updated day.
///
/// The input day is never modified. Adding support grows the first
/// support-tagged slot (else the first adjustable slot) by one position, up
/// to [`MAX_SLOT_HEADCOUNT`]; with nothing adjustable a 17:00-22:00
/// [`WEATHER_SUPPORT_ROLE`] slot is added. Trimming draws from adjustable
/// slots, preferring evening slots for an evening signal, and takes the
/// first support-tagged candidate or else the last one. A candidate at one
/// position is removed outright.
///
/// A recommendation with no action, or one the day already carries, returns
/// an unchanged copy.
pub fn apply_recommendation_to_day(
    day: &ScheduleDay,
    rec: &StaffingRecommendation,
    settings: &TenantSettings,
) -> ScheduleDay {
    let mut next = day.clone();
    let Some(action) = rec.action else {
        return next;
    };
    if next.last_accepted_recommendation_key.as_deref() == Some(rec.key.as_str()) {
        debug!(key = %rec.key, "Recommendation already applied");
        return next;
    }

    let taxonomy = &settings.role_taxonomy;
    let adjustable: Vec<usize> = next
        .slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| is_adjustable_role(&slot.role, taxonomy))
        .map(|(idx, _)| idx)
        .collect();
    let is_support = |slot: &ScheduleSlot| classify_role(&slot.role, taxonomy) == RoleTag::Support;

    match action {
        RecommendationAction::IncreaseSupport => {
            let target = adjustable
                .iter()
                .copied()
                .find(|&idx| is_support(&next.slots[idx]))
                .or_else(|| adjustable.first().copied());
            match target {
                Some(idx) => {
                    let slot = &mut next.slots[idx];
                    let count = slot.effective_headcount().saturating_add(1).min(MAX_SLOT_HEADCOUNT);
                    slot.resize(count);
                }
                None => {
                    let slot = weather_support_slot(day);
                    next.slots.push(slot);
                }
            }
        }
        RecommendationAction::DecreaseSupport => {
            if adjustable.is_empty() {
                return next;
            }
            let evening: Vec<usize> = if rec.signal.window == Some(WeatherWindow::Evening) {
                adjustable
                    .iter()
                    .copied()
                    .filter(|&idx| is_evening_slot(&next.slots[idx], &settings.evening_window, taxonomy))
                    .collect()
            } else {
                Vec::new()
            };
            let pool = if evening.is_empty() { &adjustable } else { &evening };
            let target = pool
                .iter()
                .copied()
                .find(|&idx| is_support(&next.slots[idx]))
                .or_else(|| pool.last().copied());

            let Some(idx) = target else {
                return next;
            };
            let count = next.slots[idx].effective_headcount();
            if count > 1 {
                next.slots[idx].resize(count - 1);
            } else {
                next.slots.remove(idx);
            }
        }
    }

    next.last_accepted_recommendation_key = Some(rec.key.clone());
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn slot(id: &str, start: &str, end: &str, role: &str, headcount: u32) -> ScheduleSlot {
        ScheduleSlot::new(id, start.parse().unwrap(), end.parse().unwrap(), role, headcount).unwrap()
    }

    fn day(slots: Vec<ScheduleSlot>) -> ScheduleDay {
        ScheduleDay::new(NaiveDate::from_ymd_opt(2025, 7, 4).unwrap(), slots)
    }

    fn core_slots() -> Vec<ScheduleSlot> {
        vec![
            slot("open", "11:00", "19:00", "Opener Lead", 1),
            slot("close", "15:00", "23:00", "Closer Lead", 2),
        ]
    }

    fn signal(impact: WeatherImpact) -> WeatherSignal {
        WeatherSignal {
            impact,
            delta: Some(match impact {
                WeatherImpact::Up => 12.0,
                WeatherImpact::Down => -12.0,
                WeatherImpact::Neutral => 0.0,
            }),
            ..WeatherSignal::neutral("test", "test")
        }
    }

    fn evening_signal() -> WeatherSignal {
        WeatherSignal {
            impact: WeatherImpact::Down,
            window: Some(WeatherWindow::Evening),
            event_hour: Some(21),
            ..WeatherSignal::neutral("Evening Rain Risk", "rain")
        }
    }

    // =========================================================================
    // Recommendation
    // =========================================================================

    #[test]
    fn test_neutral_signal_has_no_action() {
        let rec = day_recommendation(&signal(WeatherImpact::Neutral), &day(core_slots()), &TenantSettings::default());
        assert!(rec.action.is_none());
        assert!(!rec.can_apply);
        assert!(rec.key.is_empty());
    }

    #[test]
    fn test_increase_recommendation() {
        let rec = day_recommendation(&signal(WeatherImpact::Up), &day(core_slots()), &TenantSettings::default());
        assert_eq!(rec.action, Some(RecommendationAction::IncreaseSupport));
        assert_eq!(rec.key, "2025-07-04:increase_support");
        assert!(rec.can_apply);
        assert_eq!(rec.button_label, "Accept Recommendation (+1 Support)");
    }

    #[test]
    fn test_decrease_needs_adjustable_slot() {
        let settings = TenantSettings::default();
        let rec = day_recommendation(&signal(WeatherImpact::Down), &day(core_slots()), &settings);
        assert!(!rec.can_apply);

        let mut slots = core_slots();
        slots.push(slot("peak", "17:00", "22:00", "Peak Scooper", 2));
        let rec = day_recommendation(&signal(WeatherImpact::Down), &day(slots), &settings);
        assert!(rec.can_apply);
        assert_eq!(rec.button_label, "Accept Recommendation (-1 Support)");
    }

    #[test]
    fn test_already_applied_detection() {
        let mut applied = day(core_slots());
        applied.last_accepted_recommendation_key = Some("2025-07-04:increase_support".to_string());
        let rec = day_recommendation(&signal(WeatherImpact::Up), &applied, &TenantSettings::default());
        assert!(rec.already_applied);
        assert!(!rec.can_apply);
        assert_eq!(rec.button_label, "Recommendation Applied");
    }

    // =========================================================================
    // Apply
    // =========================================================================

    #[test]
    fn test_increase_grows_support_slot() {
        let settings = TenantSettings::default();
        let mut slots = core_slots();
        slots.push(slot("mgr", "12:00", "20:00", "Manager", 1));
        slots.push(slot("peak", "17:00", "22:00", "Peak Scooper", 1));
        let original = day(slots);
        let rec = day_recommendation(&signal(WeatherImpact::Up), &original, &settings);

        let updated = apply_recommendation_to_day(&original, &rec, &settings);
        assert_eq!(updated.slots[3].headcount, 2);
        assert_eq!(updated.slots[3].assignments.len(), 2);
        assert_eq!(updated.slots[2].headcount, 1);
        assert_eq!(updated.last_accepted_recommendation_key.as_deref(), Some(rec.key.as_str()));
        // input untouched
        assert_eq!(original.slots[3].headcount, 1);
        assert!(original.last_accepted_recommendation_key.is_none());
    }

    #[test]
    fn test_increase_caps_headcount() {
        let settings = TenantSettings::default();
        let original = day(vec![slot("peak", "17:00", "22:00", "Peak Scooper", 6)]);
        let rec = day_recommendation(&signal(WeatherImpact::Up), &original, &settings);
        let updated = apply_recommendation_to_day(&original, &rec, &settings);
        assert_eq!(updated.slots[0].headcount, 6);
    }

    #[test]
    fn test_increase_adds_weather_slot_when_nothing_adjustable() {
        let settings = TenantSettings::default();
        let original = day(core_slots());
        let rec = day_recommendation(&signal(WeatherImpact::Up), &original, &settings);
        let updated = apply_recommendation_to_day(&original, &rec, &settings);
        assert_eq!(updated.slots.len(), 3);
        let added = &updated.slots[2];
        assert_eq!(added.role, WEATHER_SUPPORT_ROLE);
        assert_eq!(added.id, "slot_weather_2025-07-04");
        assert_eq!(added.start.to_string(), "17:00");
        assert_eq!(added.end.to_string(), "22:00");
    }

    #[test]
    fn test_decrease_prefers_evening_slot_for_evening_signal() {
        let settings = TenantSettings::default();
        let mut slots = core_slots();
        slots.push(slot("day_support", "12:00", "16:00", "Support Scooper", 2));
        slots.push(slot("late_float", "18:00", "22:00", "Float", 2));
        let original = day(slots);
        let rec = day_recommendation(&evening_signal(), &original, &settings);

        let updated = apply_recommendation_to_day(&original, &rec, &settings);
        assert_eq!(updated.slots[2].headcount, 2);
        assert_eq!(updated.slots[3].headcount, 1);
    }

    #[test]
    fn test_decrease_removes_single_position_slot() {
        let settings = TenantSettings::default();
        let mut slots = core_slots();
        slots.push(slot("peak", "17:00", "22:00", "Peak Scooper", 1));
        let original = day(slots);
        let rec = day_recommendation(&signal(WeatherImpact::Down), &original, &settings);

        let updated = apply_recommendation_to_day(&original, &rec, &settings);
        assert_eq!(updated.slots.len(), 2);
        assert!(updated.slots.iter().all(|s| s.id != "peak"));
    }

    #[test]
    fn test_decrease_without_adjustable_is_noop() {
        let settings = TenantSettings::default();
        let original = day(core_slots());
        let rec = day_recommendation(&signal(WeatherImpact::Down), &original, &settings);
        let updated = apply_recommendation_to_day(&original, &rec, &settings);
        assert_eq!(updated, original);
    }

    #[test]
    fn test_apply_twice_is_idempotent() {
        let settings = TenantSettings::default();
        let mut slots = core_slots();
        slots.push(slot("peak", "17:00", "22:00", "Peak Scooper", 2));
        let original = day(slots);
        let rec = day_recommendation(&signal(WeatherImpact::Up), &original, &settings);
        let once = apply_recommendation_to_day(&original, &rec, &settings);
        let twice = apply_recommendation_to_day(&once, &rec, &settings);
        assert_eq!(once, twice);
    }
}
