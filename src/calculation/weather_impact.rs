//! Weather-driven demand signals.
//!
//! Compares a day's forecast or observed high against historical normals and
//! scans the evening hours for discrete precipitation events. The resulting
//! [`WeatherSignal`] feeds staffing recommendations and the retrospective
//! overstaff assessment.

use chrono::NaiveDate;
use tracing::debug;

use crate::config::WorkflowSettings;
use crate::models::{
    HourlyWeatherRow, PrecipSignal, TemperatureDelta, WeatherImpact, WeatherNormals, WeatherRow,
    WeatherSignal, WeatherWindow,
};

/// First hour of the evening precipitation window.
pub const EVENING_START_HOUR: u32 = 20;

/// Last hour of the evening precipitation window.
pub const EVENING_END_HOUR: u32 = 23;

const HEAVY_PRECIP_PROB: f64 = 75.0;
const HEAVY_PRECIP_MM: f64 = 2.0;
const MODERATE_PRECIP_PROB: f64 = 60.0;
const MODERATE_PRECIP_MM: f64 = 1.0;

// Rounds halves toward positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn format_signed_degrees(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => {
            let rounded = round_half_up(v);
            format!("{}{}F", if rounded > 0 { "+" } else { "" }, rounded)
        }
        None => "N/A".to_string(),
    }
}

fn format_hour_label(hour: u32) -> String {
    let normalized = hour % 24;
    let meridiem = if normalized >= 12 { "pm" } else { "am" };
    let twelve_hour = match normalized % 12 {
        0 => 12,
        h => h,
    };
    format!("{}{}", twelve_hour, meridiem)
}

/// Human-readable label for a WMO weather code.
///
/// Unmapped codes are "Mixed".
///
/// # Example
///
/// ```
/// use scheduling_engine::calculation::weather_code_label;
///
/// assert_eq!(weather_code_label(0), "Clear");
/// assert_eq!(weather_code_label(63), "Rain");
/// assert_eq!(weather_code_label(42), "Mixed");
/// ```
pub fn weather_code_label(code: i32) -> &'static str {
    match code {
        0 => "Clear",
        1 | 2 => "Partly Cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 | 56 | 57 => "Drizzle",
        61 | 63 | 65 | 66 | 67 => "Rain",
        71 | 73 | 75 | 77 => "Snow",
        80..=82 => "Rain Showers",
        85 | 86 => "Snow Showers",
        95 | 96 | 99 => "Thunderstorm",
        _ => "Mixed",
    }
}

/// Normal high for `date`, looked up by its `MM-DD` key.
pub fn expected_temp_for_date(normals: &WeatherNormals, date: NaiveDate) -> Option<f64> {
    normals
        .get(&date.format("%m-%d").to_string())
        .copied()
        .filter(|v| v.is_finite())
}

/// Difference between the row's high and the normal high for `date`.
///
/// Unavailable when either figure is missing; the one that exists is still
/// reported.
pub fn temperature_delta_for_date(
    normals: &WeatherNormals,
    date: NaiveDate,
    row: &WeatherRow,
) -> TemperatureDelta {
    let actual = row.temp_max.filter(|v| v.is_finite());
    let expected = expected_temp_for_date(normals, date);
    match (actual, expected) {
        (Some(actual), Some(expected)) => TemperatureDelta {
            available: true,
            actual: Some(actual),
            expected: Some(expected),
            delta: Some(actual - expected),
        },
        _ => TemperatureDelta {
            available: false,
            actual,
            expected,
            delta: None,
        },
    }
}

/// Detects a precipitation event in the evening window.
///
/// Heavy rain (at least 75% chance or 2mm) anywhere in the window takes
/// precedence over moderate rain (at least 60% or 1mm). The earliest
/// qualifying hour is reported.
pub fn timed_precip_signal(hourly: &[HourlyWeatherRow]) -> Option<PrecipSignal> {
    let evening: Vec<&HourlyWeatherRow> = hourly
        .iter()
        .filter(|row| (EVENING_START_HOUR..=EVENING_END_HOUR).contains(&row.hour))
        .collect();

    let prob = |row: &HourlyWeatherRow| row.precip_prob.filter(|v| v.is_finite()).unwrap_or(0.0);
    let mm = |row: &HourlyWeatherRow| row.precip_mm.filter(|v| v.is_finite()).unwrap_or(0.0);

    if let Some(heavy) = evening
        .iter()
        .find(|row| prob(row) >= HEAVY_PRECIP_PROB || mm(row) >= HEAVY_PRECIP_MM)
    {
        return Some(PrecipSignal {
            impact: WeatherImpact::Down,
            label: "Evening Rain Risk".to_string(),
            window: WeatherWindow::Evening,
            event_hour: heavy.hour,
            reason: format!(
                "Heavy precipitation likely after {} ({}% rain chance).",
                format_hour_label(heavy.hour),
                round_half_up(prob(heavy))
            ),
        });
    }

    evening
        .iter()
        .find(|row| prob(row) >= MODERATE_PRECIP_PROB || mm(row) >= MODERATE_PRECIP_MM)
        .map(|moderate| PrecipSignal {
            impact: WeatherImpact::Down,
            label: "Late Rain Risk".to_string(),
            window: WeatherWindow::Evening,
            event_hour: moderate.hour,
            reason: format!(
                "Rain risk increases around {} ({}% rain chance).",
                format_hour_label(moderate.hour),
                round_half_up(prob(moderate))
            ),
        })
}

/// Demand signal for a date.
///
/// Evaluated in order:
/// 1. No weather row: neutral "No weather signal".
/// 2. An evening precipitation event: that event, impact down.
/// 3. No normal high for the date: neutral "No baseline".
/// 4. Delta at least `threshold_f`: up "Demand Lift".
/// 5. Delta at most `-threshold_f`: down "Demand Risk".
/// 6. Otherwise neutral "Near Expected".
///
/// A precipitation signal still reports the day's high as `actual` whenever
/// it is finite; a reading of 0°F is a real reading, not a missing one.
///
/// # Arguments
///
/// * `normals` - Normal highs keyed by `MM-DD`
/// * `date` - The day being assessed
/// * `row` - Daily forecast or observation
/// * `hourly` - Hourly forecast rows, may be empty
/// * `threshold_f` - Degrees Fahrenheit that move demand
pub fn weather_impact_signal(
    normals: &WeatherNormals,
    date: NaiveDate,
    row: Option<&WeatherRow>,
    hourly: &[HourlyWeatherRow],
    threshold_f: f64,
) -> WeatherSignal {
    let Some(row) = row else {
        return WeatherSignal::unavailable();
    };

    if let Some(event) = timed_precip_signal(hourly) {
        debug!(%date, hour = event.event_hour, "Evening precipitation event");
        return WeatherSignal {
            impact: event.impact,
            label: event.label,
            reason: event.reason,
            delta: None,
            expected: None,
            actual: row.temp_max.filter(|v| v.is_finite()),
            window: Some(event.window),
            event_hour: Some(event.event_hour),
        };
    }

    let info = temperature_delta_for_date(normals, date, row);
    let (Some(delta), Some(expected)) = (info.delta, info.expected) else {
        return WeatherSignal {
            expected: info.expected,
            actual: info.actual,
            ..WeatherSignal::neutral(
                "No baseline",
                "Expected temperature baseline unavailable for this date.",
            )
        };
    };

    let (impact, label) = if delta >= threshold_f {
        (WeatherImpact::Up, "Demand Lift")
    } else if delta <= -threshold_f {
        (WeatherImpact::Down, "Demand Risk")
    } else {
        (WeatherImpact::Neutral, "Near Expected")
    };

    WeatherSignal {
        impact,
        label: label.to_string(),
        reason: format!(
            "High is {} vs expected {}F.",
            format_signed_degrees(Some(delta)),
            round_half_up(expected)
        ),
        delta: Some(delta),
        expected: Some(expected),
        actual: info.actual,
        window: None,
        event_hour: None,
    }
}

/// Staffing guidance text for a weather signal.
///
/// Adding or trimming guidance always restates the workflow's coverage
/// floor.
pub fn staffing_weather_action(signal: &WeatherSignal, workflow: &WorkflowSettings) -> String {
    let floor = workflow.coverage_floor_text();
    match signal.impact {
        WeatherImpact::Up => format!(
            "Weather recommendation: add +1 peak/support position ({} vs expected). Keep minimum {}.",
            format_signed_degrees(signal.delta),
            floor
        ),
        WeatherImpact::Down if signal.window == Some(WeatherWindow::Evening) => {
            let hour_text = signal
                .event_hour
                .map(|hour| format!(" around {}", format_hour_label(hour)))
                .unwrap_or_default();
            format!(
                "Weather recommendation: trim 1 evening peak/support position{}. Never below {}.",
                hour_text, floor
            )
        }
        WeatherImpact::Down => format!(
            "Weather recommendation: trim 1 peak/support position ({} vs expected). Never below {}.",
            format_signed_degrees(signal.delta),
            floor
        ),
        WeatherImpact::Neutral => {
            "Weather recommendation: keep baseline staffing (temperature within expected range)."
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()
    }

    fn normals() -> WeatherNormals {
        WeatherNormals::from([("07-04".to_string(), 85.0)])
    }

    fn row(temp_max: f64) -> WeatherRow {
        WeatherRow {
            temp_max: Some(temp_max),
            code: Some(0),
            precip_prob: None,
            precip_mm: None,
        }
    }

    fn hourly(hour: u32, prob: f64, mm: f64) -> HourlyWeatherRow {
        HourlyWeatherRow {
            hour,
            precip_prob: Some(prob),
            precip_mm: Some(mm),
        }
    }

    // =========================================================================
    // Labels and lookups
    // =========================================================================

    #[test]
    fn test_weather_code_labels() {
        assert_eq!(weather_code_label(2), "Partly Cloudy");
        assert_eq!(weather_code_label(48), "Fog");
        assert_eq!(weather_code_label(57), "Drizzle");
        assert_eq!(weather_code_label(77), "Snow");
        assert_eq!(weather_code_label(81), "Rain Showers");
        assert_eq!(weather_code_label(86), "Snow Showers");
        assert_eq!(weather_code_label(99), "Thunderstorm");
        assert_eq!(weather_code_label(-1), "Mixed");
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_signed_degrees(Some(12.4)), "+12F");
        assert_eq!(format_signed_degrees(Some(-12.5)), "-12F");
        assert_eq!(format_signed_degrees(Some(0.2)), "0F");
        assert_eq!(format_signed_degrees(None), "N/A");
        assert_eq!(format_hour_label(20), "8pm");
        assert_eq!(format_hour_label(0), "12am");
        assert_eq!(format_hour_label(12), "12pm");
    }

    #[test]
    fn test_expected_temp_and_delta() {
        assert_eq!(expected_temp_for_date(&normals(), date()), Some(85.0));
        assert_eq!(
            expected_temp_for_date(&normals(), NaiveDate::from_ymd_opt(2025, 7, 5).unwrap()),
            None
        );

        let delta = temperature_delta_for_date(&normals(), date(), &row(97.0));
        assert!(delta.available);
        assert_eq!(delta.delta, Some(12.0));

        let missing = temperature_delta_for_date(&normals(), date(), &WeatherRow::default());
        assert!(!missing.available);
        assert_eq!(missing.expected, Some(85.0));
        assert_eq!(missing.actual, None);
    }

    // =========================================================================
    // Precipitation
    // =========================================================================

    #[test]
    fn test_heavy_precip_beats_earlier_moderate() {
        let rows = vec![hourly(20, 65.0, 0.0), hourly(22, 80.0, 0.0)];
        let signal = timed_precip_signal(&rows).unwrap();
        assert_eq!(signal.label, "Evening Rain Risk");
        assert_eq!(signal.event_hour, 22);
        assert_eq!(signal.reason, "Heavy precipitation likely after 10pm (80% rain chance).");
    }

    #[test]
    fn test_moderate_precip_by_millimetres() {
        let rows = vec![hourly(21, 10.0, 1.0)];
        let signal = timed_precip_signal(&rows).unwrap();
        assert_eq!(signal.label, "Late Rain Risk");
        assert_eq!(signal.reason, "Rain risk increases around 9pm (10% rain chance).");
    }

    #[test]
    fn test_precip_outside_evening_ignored() {
        let rows = vec![hourly(15, 100.0, 10.0), hourly(20, 30.0, 0.2)];
        assert!(timed_precip_signal(&rows).is_none());
        assert!(timed_precip_signal(&[]).is_none());
    }

    // =========================================================================
    // Impact signal
    // =========================================================================

    #[test]
    fn test_signal_without_row_is_neutral() {
        let signal = weather_impact_signal(&normals(), date(), None, &[], 10.0);
        assert_eq!(signal.impact, WeatherImpact::Neutral);
        assert_eq!(signal.label, "No weather signal");
        assert_eq!(signal.reason, "Weather data unavailable.");
    }

    #[test]
    fn test_signal_precip_takes_priority() {
        let signal = weather_impact_signal(
            &normals(),
            date(),
            Some(&row(100.0)),
            &[hourly(20, 90.0, 3.0)],
            10.0,
        );
        assert_eq!(signal.impact, WeatherImpact::Down);
        assert_eq!(signal.window, Some(WeatherWindow::Evening));
        assert_eq!(signal.event_hour, Some(20));
        assert_eq!(signal.actual, Some(100.0));
        assert_eq!(signal.delta, None);
    }

    #[test]
    fn test_signal_precip_keeps_zero_degree_reading() {
        let signal = weather_impact_signal(&normals(), date(), Some(&row(0.0)), &[hourly(21, 90.0, 3.0)], 10.0);
        assert_eq!(signal.window, Some(WeatherWindow::Evening));
        assert_eq!(signal.actual, Some(0.0));

        let missing = WeatherRow {
            temp_max: Some(f64::NAN),
            ..row(0.0)
        };
        let signal = weather_impact_signal(&normals(), date(), Some(&missing), &[hourly(21, 90.0, 3.0)], 10.0);
        assert_eq!(signal.actual, None);
    }

    #[test]
    fn test_signal_without_normals() {
        let signal = weather_impact_signal(&WeatherNormals::new(), date(), Some(&row(90.0)), &[], 10.0);
        assert_eq!(signal.label, "No baseline");
        assert_eq!(signal.actual, Some(90.0));
        assert_eq!(signal.expected, None);
    }

    #[test]
    fn test_signal_threshold_is_inclusive() {
        let up = weather_impact_signal(&normals(), date(), Some(&row(95.0)), &[], 10.0);
        assert_eq!(up.impact, WeatherImpact::Up);
        assert_eq!(up.label, "Demand Lift");
        assert_eq!(up.reason, "High is +10F vs expected 85F.");

        let down = weather_impact_signal(&normals(), date(), Some(&row(75.0)), &[], 10.0);
        assert_eq!(down.impact, WeatherImpact::Down);
        assert_eq!(down.label, "Demand Risk");

        let near = weather_impact_signal(&normals(), date(), Some(&row(94.0)), &[], 10.0);
        assert_eq!(near.impact, WeatherImpact::Neutral);
        assert_eq!(near.label, "Near Expected");
        assert_eq!(near.delta, Some(9.0));
    }

    #[test]
    fn test_signal_respects_custom_threshold() {
        let signal = weather_impact_signal(&normals(), date(), Some(&row(91.0)), &[], 5.0);
        assert_eq!(signal.impact, WeatherImpact::Up);
    }

    // =========================================================================
    // Staffing action text
    // =========================================================================

    #[test]
    fn test_staffing_action_text() {
        let workflow = WorkflowSettings::default();
        let up = weather_impact_signal(&normals(), date(), Some(&row(97.0)), &[], 10.0);
        assert_eq!(
            staffing_weather_action(&up, &workflow),
            "Weather recommendation: add +1 peak/support position (+12F vs expected). Keep minimum 1 opener and 2 closers."
        );

        let down = weather_impact_signal(&normals(), date(), Some(&row(70.0)), &[], 10.0);
        assert_eq!(
            staffing_weather_action(&down, &workflow),
            "Weather recommendation: trim 1 peak/support position (-15F vs expected). Never below 1 opener and 2 closers."
        );

        let evening = weather_impact_signal(&normals(), date(), Some(&row(85.0)), &[hourly(21, 80.0, 0.0)], 10.0);
        assert_eq!(
            staffing_weather_action(&evening, &workflow),
            "Weather recommendation: trim 1 evening peak/support position around 9pm. Never below 1 opener and 2 closers."
        );

        assert!(staffing_weather_action(&WeatherSignal::unavailable(), &workflow).contains("keep baseline staffing"));
    }
}
