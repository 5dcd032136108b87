//! Weekly schedule templates.
//!
//! Planners store templates as loosely typed slot lists keyed by weekday.
//! This module validates them, merges layered profiles and expands a day's
//! template into concrete slots.

use std::collections::BTreeMap;

use chrono::Weekday;
use tracing::debug;

use crate::error::EngineResult;
use crate::models::{
    ClockTime, MAX_SLOT_HEADCOUNT, RawTemplateSlot, ScheduleSlot, TemplateSlotDef,
    WeeklyTemplateProfile,
};

use super::slots::{make_slot, template_slot_id};

/// Role given to template slots that do not name one.
pub const DEFAULT_TEMPLATE_ROLE: &str = "Support Scooper";

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Validates one raw template slot.
///
/// Both times must be strict `HH:MM` and the end strictly after the start.
/// A blank role becomes [`DEFAULT_TEMPLATE_ROLE`]; the headcount is clamped
/// to `1..=MAX_SLOT_HEADCOUNT`, with missing or zero treated as one.
///
/// # Returns
///
/// `None` when the slot cannot be used.
pub fn normalize_template_slot(raw: &RawTemplateSlot) -> Option<TemplateSlotDef> {
    let start: ClockTime = raw.start.as_deref()?.trim().parse().ok()?;
    let end: ClockTime = raw.end.as_deref()?.trim().parse().ok()?;
    if end <= start {
        return None;
    }

    let role = raw
        .role
        .as_deref()
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .unwrap_or(DEFAULT_TEMPLATE_ROLE)
        .to_string();

    let headcount = match raw.headcount {
        Some(count) if count.is_finite() && count != 0.0 => {
            count.clamp(1.0, f64::from(MAX_SLOT_HEADCOUNT)) as u32
        }
        _ => 1,
    };

    Some(TemplateSlotDef {
        start,
        end,
        role,
        headcount,
    })
}

fn canonical_weekday(raw: &str) -> Option<Weekday> {
    let prefix: String = raw.trim().chars().take(3).collect();
    prefix.parse().ok()
}

/// Builds a profile from weekday-keyed raw slot lists.
///
/// Keys are matched on their first three letters, case-insensitively, so
/// "Tue", "tuesday" and "TUES" all address Tuesday. Unknown keys and invalid
/// slots are dropped.
pub fn normalize_template_profile(
    raw: &BTreeMap<String, Vec<RawTemplateSlot>>,
) -> WeeklyTemplateProfile {
    let mut profile = WeeklyTemplateProfile::default();
    for (key, slots) in raw {
        let Some(weekday) = canonical_weekday(key) else {
            debug!(key = %key, "Ignoring unknown template weekday");
            continue;
        };
        *profile.day_mut(weekday) = slots.iter().filter_map(normalize_template_slot).collect();
    }
    profile
}

/// Layers template profiles.
///
/// For each weekday the last profile with a non-empty list wins. Monday then
/// mirrors Tuesday, and any day still empty falls back to Tuesday.
pub fn merge_template_profiles(profiles: &[WeeklyTemplateProfile]) -> WeeklyTemplateProfile {
    let mut merged = WeeklyTemplateProfile::default();
    for profile in profiles {
        for weekday in WEEKDAYS {
            let slots = profile.day(weekday);
            if !slots.is_empty() {
                *merged.day_mut(weekday) = slots.to_vec();
            }
        }
    }

    let tuesday = merged.tue.clone();
    if !tuesday.is_empty() {
        merged.mon = tuesday.clone();
        for weekday in WEEKDAYS {
            let day = merged.day_mut(weekday);
            if day.is_empty() {
                *day = tuesday.clone();
            }
        }
    }

    merged
}

/// Expands the template for `weekday` into slots.
///
/// Slot ids are `slot_<weekday>_<index>`. An empty template day yields the
/// fallback day: an 11:00-19:00 Opener Lead, a 15:00-23:00 Closer Lead and
/// a 16:00-23:00 Closer Scooper.
pub fn build_template_slots(
    weekday: Weekday,
    profile: &WeeklyTemplateProfile,
) -> EngineResult<Vec<ScheduleSlot>> {
    let defs = profile.day(weekday);
    if defs.is_empty() {
        let fallback = [
            (11, 19, "Opener Lead"),
            (15, 23, "Closer Lead"),
            (16, 23, "Closer Scooper"),
        ];
        return fallback
            .iter()
            .enumerate()
            .map(|(idx, &(start, end, role))| {
                make_slot(
                    template_slot_id(weekday, idx),
                    ClockTime::new(start, 0)?,
                    ClockTime::new(end, 0)?,
                    role,
                    1,
                )
            })
            .collect();
    }

    defs.iter()
        .enumerate()
        .map(|(idx, def)| {
            make_slot(
                template_slot_id(weekday, idx),
                def.start,
                def.end,
                &def.role,
                def.headcount,
            )
        })
        .collect()
}
