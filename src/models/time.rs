//! Strictly parsed clock times, month keys and seasons.
//!
//! Schedule data arrives as `"HH:MM"` and `"YYYY-MM"` strings. These types
//! reject anything that is not exactly that shape at the parsing boundary so
//! the calculation functions can stay total.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A 24-hour wall-clock time with minute precision.
///
/// Parsing only accepts a two-digit hour (`00`-`23`), a colon and a two-digit
/// minute (`00`-`59`). Times never wrap past midnight; a slot that would end
/// on the following day is rejected when the slot is built.
///
/// # Example
///
/// ```
/// use scheduling_engine::models::ClockTime;
///
/// let time: ClockTime = "17:30".parse().unwrap();
/// assert_eq!(time.hours(), 17.5);
/// assert_eq!(time.to_string(), "17:30");
/// assert!("7:30".parse::<ClockTime>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    /// Builds a time from an hour and minute, rejecting out-of-range parts.
    pub fn new(hour: u32, minute: u32) -> EngineResult<Self> {
        if hour > 23 {
            return Err(EngineError::MalformedTime {
                value: format!("{:02}:{:02}", hour, minute),
                reason: "hour must be between 00 and 23".to_string(),
            });
        }
        if minute > 59 {
            return Err(EngineError::MalformedTime {
                value: format!("{:02}:{:02}", hour, minute),
                reason: "minute must be between 00 and 59".to_string(),
            });
        }
        Ok(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    /// Builds a time from minutes after midnight, clamped to `00:00..=23:59`.
    pub fn from_minutes(minutes: u32) -> Self {
        Self {
            minutes: minutes.min(u32::from(MINUTES_PER_DAY - 1)) as u16,
        }
    }

    /// The hour component.
    pub fn hour(&self) -> u32 {
        u32::from(self.minutes / 60)
    }

    /// The minute component.
    pub fn minute(&self) -> u32 {
        u32::from(self.minutes % 60)
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(&self) -> u32 {
        u32::from(self.minutes)
    }

    /// Fractional hours since midnight (`"09:15"` is `9.25`).
    pub fn hours(&self) -> f64 {
        f64::from(self.minutes) / 60.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| EngineError::MalformedTime {
            value: raw.to_string(),
            reason: reason.to_string(),
        };

        let bytes = raw.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(malformed("expected two-digit HH:MM"));
        }
        let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(malformed("hour and minute must be numeric"));
        }

        let hour = u32::from(digits[0] - b'0') * 10 + u32::from(digits[1] - b'0');
        let minute = u32::from(digits[2] - b'0') * 10 + u32::from(digits[3] - b'0');
        Self::new(hour, minute).map_err(|err| match err {
            EngineError::MalformedTime { reason, .. } => malformed(&reason),
            other => other,
        })
    }
}

impl TryFrom<String> for ClockTime {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Parses a strict `"HH:MM"` string into fractional hours.
///
/// # Returns
///
/// Returns the hours since midnight, or `MalformedTime` when the input is not
/// a two-digit 24-hour time.
///
/// # Example
///
/// ```
/// use scheduling_engine::models::parse_time_to_hours;
///
/// assert_eq!(parse_time_to_hours("22:30").unwrap(), 22.5);
/// assert!(parse_time_to_hours("24:00").is_err());
/// ```
pub fn parse_time_to_hours(raw: &str) -> EngineResult<f64> {
    Ok(raw.parse::<ClockTime>()?.hours())
}

/// Formats fractional hours as `"HH:MM"`.
///
/// The value is rounded to the nearest minute and clamped into the day, so
/// `hour_to_time(parse_time_to_hours(t)?)` returns `t` for every valid time.
/// Non-finite input formats as midnight.
pub fn hour_to_time(hours: f64) -> String {
    if !hours.is_finite() {
        return ClockTime::from_minutes(0).to_string();
    }
    let minutes = (hours * 60.0).round().clamp(0.0, f64::from(MINUTES_PER_DAY - 1));
    ClockTime::from_minutes(minutes as u32).to_string()
}

/// A calendar month in `"YYYY-MM"` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    first_day: NaiveDate,
}

impl MonthKey {
    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// The month number, 1 through 12.
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || EngineError::MalformedMonthKey {
            value: raw.to_string(),
        };

        let (year, month) = raw.split_once('-').ok_or_else(malformed)?;
        if year.len() != 4
            || month.len() != 2
            || !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(malformed)?;
        Ok(Self { first_day })
    }
}

impl TryFrom<String> for MonthKey {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

/// Northern-hemisphere season buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// December through February.
    Winter,
    /// March through May.
    Spring,
    /// June through August.
    Summer,
    /// September through November.
    Fall,
}

impl Season {
    /// Maps a month number (1-12) to its season.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Fall,
        }
    }
}
