//! Schedule slot, day and week models.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::time::{ClockTime, Season};

/// Maximum headcount a single slot may carry.
pub const MAX_SLOT_HEADCOUNT: u32 = 6;

/// Role classification derived from a slot's free-text role name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTag {
    /// Opens the store; counts toward the minimum-opener rule.
    Opener,
    /// Closes the store; counts toward the minimum-closer rule.
    Closer,
    /// Flexible peak/support coverage.
    Support,
    /// Evening-only coverage.
    Evening,
    /// Anything the taxonomy does not recognise.
    Other,
}

/// A staffed time window on a schedule day.
///
/// Slots never cross midnight: `end` must not be earlier than `start`, and
/// headcount never exceeds [`MAX_SLOT_HEADCOUNT`]. Deserialization and
/// [`ScheduleSlot::new`] both enforce this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SlotRecord")]
pub struct ScheduleSlot {
    /// Caller-supplied or deterministically generated identifier.
    pub id: String,
    /// Start of the slot.
    pub start: ClockTime,
    /// End of the slot.
    pub end: ClockTime,
    /// Free-text role name (e.g. "Closer Scooper").
    pub role: String,
    /// Number of positions in the slot.
    pub headcount: u32,
    /// Employee names assigned to each position; blanks are open positions.
    #[serde(default)]
    pub assignments: Vec<String>,
}

#[derive(Deserialize)]
struct SlotRecord {
    #[serde(default)]
    id: String,
    start: ClockTime,
    end: ClockTime,
    #[serde(default)]
    role: String,
    #[serde(default = "default_headcount")]
    headcount: u32,
    #[serde(default)]
    assignments: Vec<String>,
}

fn default_headcount() -> u32 {
    1
}

impl TryFrom<SlotRecord> for ScheduleSlot {
    type Error = EngineError;

    fn try_from(record: SlotRecord) -> Result<Self, Self::Error> {
        if record.end < record.start {
            return Err(EngineError::InvalidSlot {
                slot_id: record.id,
                message: format!(
                    "end time {} is before start time {}; slots cannot cross midnight",
                    record.end, record.start
                ),
            });
        }
        if record.headcount > MAX_SLOT_HEADCOUNT {
            return Err(EngineError::InvalidSlot {
                slot_id: record.id,
                message: format!(
                    "headcount {} exceeds the maximum of {}",
                    record.headcount, MAX_SLOT_HEADCOUNT
                ),
            });
        }
        Ok(Self {
            id: record.id,
            start: record.start,
            end: record.end,
            role: record.role,
            headcount: record.headcount,
            assignments: record.assignments,
        })
    }
}

impl ScheduleSlot {
    /// Creates a slot with `max(1, headcount)` open positions.
    ///
    /// # Returns
    ///
    /// Returns `InvalidSlot` when `end` is earlier than `start` or the
    /// headcount exceeds [`MAX_SLOT_HEADCOUNT`].
    ///
    /// # Example
    ///
    /// ```
    /// use scheduling_engine::models::{ClockTime, ScheduleSlot};
    ///
    /// let slot = ScheduleSlot::new(
    ///     "slot_tue_0",
    ///     "15:00".parse::<ClockTime>().unwrap(),
    ///     "23:00".parse::<ClockTime>().unwrap(),
    ///     "Closer Lead",
    ///     2,
    /// )
    /// .unwrap();
    /// assert_eq!(slot.assignments, vec!["".to_string(), "".to_string()]);
    /// ```
    pub fn new(
        id: impl Into<String>,
        start: ClockTime,
        end: ClockTime,
        role: impl Into<String>,
        headcount: u32,
    ) -> EngineResult<Self> {
        let count = headcount.max(1);
        Self::try_from(SlotRecord {
            id: id.into(),
            start,
            end,
            role: role.into(),
            headcount: count,
            assignments: vec![String::new(); count as usize],
        })
    }

    /// Headcount with a floor of one position.
    pub fn effective_headcount(&self) -> u32 {
        self.headcount.max(1)
    }

    /// Sets the headcount, capped at [`MAX_SLOT_HEADCOUNT`], and pads or
    /// truncates the assignment list to match.
    pub fn resize(&mut self, headcount: u32) {
        let headcount = headcount.min(MAX_SLOT_HEADCOUNT);
        self.headcount = headcount;
        self.assignments.resize(headcount as usize, String::new());
    }

    /// Number of positions with no employee assigned.
    pub fn open_positions(&self) -> u32 {
        (0..self.effective_headcount() as usize)
            .filter(|&idx| {
                self.assignments
                    .get(idx)
                    .is_none_or(|name| name.trim().is_empty())
            })
            .count() as u32
    }
}

/// One planned day of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DayRecord", rename_all = "camelCase")]
pub struct ScheduleDay {
    /// Calendar date.
    pub date: NaiveDate,
    /// Day of the week, derived from `date` when not supplied.
    pub weekday: Weekday,
    /// Season bucket, derived from `date` when not supplied.
    pub season: Season,
    /// Staffed slots for the day.
    pub slots: Vec<ScheduleSlot>,
    /// Free-text planner note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Whether the day carries an exception not yet submitted for approval.
    pub has_exception: bool,
    /// Open approval request for this day, if any.
    pub pending_request_id: Option<String>,
    /// Most recent approval decision.
    pub last_decision: Option<String>,
    /// Key of the most recently accepted staffing recommendation.
    pub last_accepted_recommendation_key: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DayRecord {
    date: NaiveDate,
    #[serde(default)]
    weekday: Option<Weekday>,
    #[serde(default)]
    season: Option<Season>,
    #[serde(default)]
    slots: Vec<ScheduleSlot>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    has_exception: bool,
    #[serde(default)]
    pending_request_id: Option<String>,
    #[serde(default)]
    last_decision: Option<String>,
    #[serde(default)]
    last_accepted_recommendation_key: Option<String>,
}

impl From<DayRecord> for ScheduleDay {
    fn from(record: DayRecord) -> Self {
        Self {
            weekday: record.weekday.unwrap_or_else(|| record.date.weekday()),
            season: record
                .season
                .unwrap_or_else(|| Season::from_month(record.date.month())),
            date: record.date,
            slots: record.slots,
            note: record.note,
            has_exception: record.has_exception,
            pending_request_id: record.pending_request_id,
            last_decision: record.last_decision,
            last_accepted_recommendation_key: record.last_accepted_recommendation_key,
        }
    }
}

impl ScheduleDay {
    /// Creates a day with weekday and season derived from the date.
    pub fn new(date: NaiveDate, slots: Vec<ScheduleSlot>) -> Self {
        Self {
            date,
            weekday: date.weekday(),
            season: Season::from_month(date.month()),
            slots,
            note: None,
            has_exception: false,
            pending_request_id: None,
            last_decision: None,
            last_accepted_recommendation_key: None,
        }
    }
}

/// A planned week starting on `week_start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWeek {
    /// First day of the week (a Monday by convention).
    pub week_start: NaiveDate,
    /// Planned days.
    #[serde(default)]
    pub days: Vec<ScheduleDay>,
}

/// A validated template slot definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSlotDef {
    /// Slot start.
    pub start: ClockTime,
    /// Slot end, strictly after `start`.
    pub end: ClockTime,
    /// Role name.
    pub role: String,
    /// Positions, between 1 and [`MAX_SLOT_HEADCOUNT`].
    pub headcount: u32,
}

/// An unvalidated template slot as stored by planners.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTemplateSlot {
    /// Start time text.
    #[serde(default)]
    pub start: Option<String>,
    /// End time text.
    #[serde(default)]
    pub end: Option<String>,
    /// Role name.
    #[serde(default)]
    pub role: Option<String>,
    /// Requested headcount.
    #[serde(default)]
    pub headcount: Option<f64>,
}

/// Template slot definitions for each day of the week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTemplateProfile {
    /// Monday slots.
    #[serde(rename = "Mon", default)]
    pub mon: Vec<TemplateSlotDef>,
    /// Tuesday slots.
    #[serde(rename = "Tue", default)]
    pub tue: Vec<TemplateSlotDef>,
    /// Wednesday slots.
    #[serde(rename = "Wed", default)]
    pub wed: Vec<TemplateSlotDef>,
    /// Thursday slots.
    #[serde(rename = "Thu", default)]
    pub thu: Vec<TemplateSlotDef>,
    /// Friday slots.
    #[serde(rename = "Fri", default)]
    pub fri: Vec<TemplateSlotDef>,
    /// Saturday slots.
    #[serde(rename = "Sat", default)]
    pub sat: Vec<TemplateSlotDef>,
    /// Sunday slots.
    #[serde(rename = "Sun", default)]
    pub sun: Vec<TemplateSlotDef>,
}

impl WeeklyTemplateProfile {
    /// Slot definitions for `weekday`.
    pub fn day(&self, weekday: Weekday) -> &[TemplateSlotDef] {
        match weekday {
            Weekday::Mon => &self.mon,
            Weekday::Tue => &self.tue,
            Weekday::Wed => &self.wed,
            Weekday::Thu => &self.thu,
            Weekday::Fri => &self.fri,
            Weekday::Sat => &self.sat,
            Weekday::Sun => &self.sun,
        }
    }

    /// Mutable slot definitions for `weekday`.
    pub fn day_mut(&mut self, weekday: Weekday) -> &mut Vec<TemplateSlotDef> {
        match weekday {
            Weekday::Mon => &mut self.mon,
            Weekday::Tue => &mut self.tue,
            Weekday::Wed => &mut self.wed,
            Weekday::Thu => &mut self.thu,
            Weekday::Fri => &mut self.fri,
            Weekday::Sat => &mut self.sat,
            Weekday::Sun => &mut self.sun,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn time(raw: &str) -> ClockTime {
        raw.parse().unwrap()
    }

    #[test]
    fn test_new_slot_fills_open_assignments() {
        let slot = ScheduleSlot::new("s1", time("11:00"), time("19:00"), "Opener Lead", 0).unwrap();
        assert_eq!(slot.headcount, 1);
        assert_eq!(slot.assignments, vec![String::new()]);
    }

    #[test]
    fn test_new_slot_rejects_midnight_crossing() {
        let result = ScheduleSlot::new("late", time("22:00"), time("02:00"), "Closer", 1);
        match result {
            Err(EngineError::InvalidSlot { slot_id, message }) => {
                assert_eq!(slot_id, "late");
                assert!(message.contains("cannot cross midnight"));
            }
            other => panic!("Expected InvalidSlot, got {:?}", other),
        }
    }

    #[test]
    fn test_slot_deserialization_rejects_reversed_times() {
        let raw = json!({"id": "x", "start": "20:00", "end": "18:00", "role": "Support"});
        assert!(serde_json::from_value::<ScheduleSlot>(raw).is_err());
    }

    #[test]
    fn test_slot_deserialization_rejects_negative_headcount() {
        let raw = json!({"id": "x", "start": "12:00", "end": "18:00", "headcount": -2});
        assert!(serde_json::from_value::<ScheduleSlot>(raw).is_err());
    }

    #[test]
    fn test_slot_deserialization_rejects_headcount_over_cap() {
        let raw = json!({"role": "Peak Scooper", "start": "12:00", "end": "18:00", "headcount": 4294967295u32});
        assert!(serde_json::from_value::<ScheduleSlot>(raw).is_err());

        let at_cap = json!({"start": "12:00", "end": "18:00", "headcount": MAX_SLOT_HEADCOUNT});
        let slot: ScheduleSlot = serde_json::from_value(at_cap).unwrap();
        assert_eq!(slot.headcount, MAX_SLOT_HEADCOUNT);
    }

    #[test]
    fn test_new_slot_rejects_headcount_over_cap() {
        let result = ScheduleSlot::new("big", time("12:00"), time("18:00"), "Support", MAX_SLOT_HEADCOUNT + 1);
        match result {
            Err(EngineError::InvalidSlot { slot_id, message }) => {
                assert_eq!(slot_id, "big");
                assert!(message.contains("exceeds the maximum"));
            }
            other => panic!("Expected InvalidSlot, got {:?}", other),
        }
    }

    #[test]
    fn test_resize_caps_headcount() {
        let mut slot = ScheduleSlot::new("s", time("12:00"), time("18:00"), "Support", 5).unwrap();
        slot.resize(u32::MAX);
        assert_eq!(slot.headcount, MAX_SLOT_HEADCOUNT);
        assert_eq!(slot.assignments.len(), MAX_SLOT_HEADCOUNT as usize);
    }

    #[test]
    fn test_slot_deserialization_defaults() {
        let raw = json!({"start": "12:00", "end": "18:00"});
        let slot: ScheduleSlot = serde_json::from_value(raw).unwrap();
        assert_eq!(slot.headcount, 1);
        assert!(slot.assignments.is_empty());
        assert_eq!(slot.open_positions(), 1);
    }

    #[test]
    fn test_resize_pads_and_truncates_assignments() {
        let mut slot = ScheduleSlot::new("s", time("12:00"), time("18:00"), "Support", 2).unwrap();
        slot.assignments[0] = "Ana".to_string();
        slot.resize(3);
        assert_eq!(slot.assignments, vec!["Ana", "", ""]);
        slot.resize(1);
        assert_eq!(slot.assignments, vec!["Ana"]);
    }

    #[test]
    fn test_open_positions_ignores_blank_names() {
        let mut slot = ScheduleSlot::new("s", time("12:00"), time("18:00"), "Support", 3).unwrap();
        slot.assignments = vec!["Ana".to_string(), "  ".to_string()];
        assert_eq!(slot.open_positions(), 2);
    }

    #[test]
    fn test_day_derives_weekday_and_season() {
        let raw = json!({"date": "2025-07-15", "slots": []});
        let day: ScheduleDay = serde_json::from_value(raw).unwrap();
        assert_eq!(day.weekday, Weekday::Tue);
        assert_eq!(day.season, Season::Summer);
        assert!(!day.has_exception);
    }

    #[test]
    fn test_day_serializes_camel_case() {
        let day = ScheduleDay::new(NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(), vec![]);
        let value = serde_json::to_value(&day).unwrap();
        assert_eq!(value["weekday"], "Tue");
        assert_eq!(value["season"], "winter");
        assert!(value.get("lastAcceptedRecommendationKey").is_some());
    }
}
