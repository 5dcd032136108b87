//! Expected-day baselines derived from historical actuals.

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::debug;

use crate::config::TenantSettings;
use crate::models::{ActualDayRow, Baseline, DayExpectedProfile, WeekdayProfile, WeekdayProfileDay};

use super::metrics::{gross_profit, labor_percent, rolling_average};

/// Baseline for `date` from prior actuals on the same weekday and month.
///
/// Matching rows strictly before `date` are ordered by date and the most
/// recent `window` of them are averaged. A row with a non-finite revenue or
/// labor figure is dropped whole so the two averages cover the same days.
///
/// # Returns
///
/// [`Baseline::Absent`] when `window` is zero or no prior comparable day
/// with finite figures exists.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use scheduling_engine::calculation::day_expected_profile;
/// use scheduling_engine::config::TenantSettings;
/// use scheduling_engine::models::{ActualDayRow, Baseline};
///
/// let date = |d| NaiveDate::from_ymd_opt(2025, 6, d).unwrap();
/// let actuals = vec![ActualDayRow {
///     date: date(3),
///     revenue: 1000.0,
///     store_labor: 200.0,
///     location: None,
/// }];
///
/// let baseline = day_expected_profile(&actuals, date(10), &TenantSettings::default(), 4);
/// assert_eq!(baseline.profile().unwrap().gross_profit, 520.0);
/// assert_eq!(
///     day_expected_profile(&actuals, date(3), &TenantSettings::default(), 4),
///     Baseline::Absent
/// );
/// ```
pub fn day_expected_profile(
    actuals: &[ActualDayRow],
    date: NaiveDate,
    settings: &TenantSettings,
    window: usize,
) -> Baseline {
    if window == 0 {
        debug!(%date, "Zero baseline window");
        return Baseline::Absent;
    }

    let mut matches: Vec<&ActualDayRow> = actuals
        .iter()
        .filter(|row| {
            row.date < date && row.date.weekday() == date.weekday() && row.date.month() == date.month()
        })
        .filter(|row| row.revenue.is_finite() && row.store_labor.is_finite())
        .collect();

    if matches.is_empty() {
        debug!(%date, "No comparable history for baseline");
        return Baseline::Absent;
    }

    matches.sort_by_key(|row| row.date);
    let revenues: Vec<f64> = matches.iter().map(|row| row.revenue).collect();
    let labors: Vec<f64> = matches.iter().map(|row| row.store_labor).collect();

    let revenue = rolling_average(&revenues, window);
    let labor = rolling_average(&labors, window);

    Baseline::Present(DayExpectedProfile {
        revenue,
        labor,
        gross_profit: gross_profit(revenue, labor, settings.gp_margin_factor),
        labor_pct: labor_percent(labor, revenue),
    })
}

/// Weekday averages for one calendar month of actuals.
///
/// Only rows in `year`/`month` count. Weekdays with no rows stay `None`.
/// Delivery components are not part of daily actuals and are left at zero.
pub fn weekday_profile_from_actuals(actuals: &[ActualDayRow], year: i32, month: u32) -> WeekdayProfile {
    let mut profile = WeekdayProfile::default();
    let weekdays = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    for weekday in weekdays {
        let rows: Vec<&ActualDayRow> = actuals
            .iter()
            .filter(|row| {
                row.date.year() == year && row.date.month() == month && row.date.weekday() == weekday
            })
            .collect();
        if rows.is_empty() {
            continue;
        }
        let count = rows.len() as f64;
        profile.set_day(
            weekday,
            Some(WeekdayProfileDay {
                avg_revenue: rows.iter().map(|row| row.revenue).sum::<f64>() / count,
                avg_labor: rows.iter().map(|row| row.store_labor).sum::<f64>() / count,
                avg_doordash_net: 0.0,
            }),
        );
    }

    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{NO_BASELINE_MESSAGE, overstaff_assessment};
    use crate::models::WeatherSignal;

    fn row(year: i32, month: u32, day: u32, revenue: f64, labor: f64) -> ActualDayRow {
        ActualDayRow {
            date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            revenue,
            store_labor: labor,
            location: Some("EP".to_string()),
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_baseline_uses_same_weekday_and_month() {
        // Tuesdays in June 2025: 3, 10, 17; the Wednesday and the May Tuesday are ignored
        let actuals = vec![
            row(2025, 6, 3, 1000.0, 200.0),
            row(2025, 6, 10, 1200.0, 240.0),
            row(2025, 6, 4, 9000.0, 100.0),
            row(2025, 5, 27, 9000.0, 100.0),
        ];
        let baseline = day_expected_profile(&actuals, date(2025, 6, 17), &TenantSettings::default(), 4);
        let profile = baseline.profile().unwrap();
        assert_eq!(profile.revenue, 1100.0);
        assert_eq!(profile.labor, 220.0);
        assert!((profile.labor_pct - 20.0).abs() < 1e-9);
        assert!((profile.gross_profit - (1100.0 * 0.72 - 220.0)).abs() < 1e-9);
    }

    #[test]
    fn test_baseline_includes_prior_years() {
        let actuals = vec![row(2024, 6, 4, 800.0, 160.0)];
        let baseline = day_expected_profile(&actuals, date(2025, 6, 3), &TenantSettings::default(), 4);
        assert_eq!(baseline.profile().unwrap().revenue, 800.0);
    }

    #[test]
    fn test_baseline_window_keeps_most_recent() {
        let actuals = vec![
            row(2025, 6, 10, 2000.0, 400.0),
            row(2025, 6, 3, 1000.0, 200.0),
            row(2024, 6, 4, 10.0, 2.0),
        ];
        let baseline = day_expected_profile(&actuals, date(2025, 6, 17), &TenantSettings::default(), 2);
        assert_eq!(baseline.profile().unwrap().revenue, 1500.0);
    }

    #[test]
    fn test_baseline_absent_without_history() {
        let actuals = vec![row(2025, 6, 17, 1000.0, 200.0)];
        assert_eq!(
            day_expected_profile(&actuals, date(2025, 6, 17), &TenantSettings::default(), 4),
            Baseline::Absent
        );
        assert_eq!(
            day_expected_profile(&[], date(2025, 6, 17), &TenantSettings::default(), 4),
            Baseline::Absent
        );
    }

    #[test]
    fn test_baseline_absent_with_zero_window() {
        let actuals = vec![row(2025, 6, 3, 1000.0, 200.0)];
        let settings = TenantSettings::default();
        let baseline = day_expected_profile(&actuals, date(2025, 6, 10), &settings, 0);
        assert_eq!(baseline, Baseline::Absent);

        // an absent baseline never hides a revenue miss behind a zero profile
        let assessment = overstaff_assessment(
            &baseline,
            100.0,
            900.0,
            &WeatherSignal::unavailable(),
            &settings,
        );
        assert_eq!(assessment.recommendation, NO_BASELINE_MESSAGE);
    }

    #[test]
    fn test_baseline_drops_rows_with_non_finite_figures() {
        let actuals = vec![
            row(2025, 6, 3, 1000.0, 200.0),
            row(2025, 6, 10, 3000.0, f64::NAN),
            row(2025, 5, 6, 9000.0, 900.0),
        ];
        let baseline = day_expected_profile(&actuals, date(2025, 6, 17), &TenantSettings::default(), 4);
        let profile = baseline.profile().unwrap();
        assert_eq!(profile.revenue, 1000.0);
        assert_eq!(profile.labor, 200.0);

        let non_finite = vec![row(2025, 6, 3, f64::INFINITY, 200.0)];
        assert_eq!(
            day_expected_profile(&non_finite, date(2025, 6, 10), &TenantSettings::default(), 4),
            Baseline::Absent
        );
    }

    #[test]
    fn test_weekday_profile_from_actuals() {
        let actuals = vec![
            row(2025, 6, 3, 1000.0, 200.0),
            row(2025, 6, 10, 1400.0, 260.0),
            row(2025, 6, 7, 3000.0, 400.0),
            row(2025, 7, 1, 5000.0, 500.0),
        ];
        let profile = weekday_profile_from_actuals(&actuals, 2025, 6);
        let tue = profile.day(Weekday::Tue).unwrap();
        assert_eq!(tue.avg_revenue, 1200.0);
        assert_eq!(tue.avg_labor, 230.0);
        assert_eq!(profile.day(Weekday::Sat).unwrap().avg_revenue, 3000.0);
        assert!(profile.day(Weekday::Mon).is_none());
    }
}
