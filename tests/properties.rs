//! Property tests for engine invariants that hold over whole input ranges.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use scheduling_engine::calculation::{
    apply_recommendation_to_day, day_financial_viability, day_recommendation, labor_percent,
    overstaff_assessment, pto_date_overlap, rolling_average, weather_impact_signal,
};
use scheduling_engine::config::TenantSettings;
use scheduling_engine::models::{
    Baseline, DayExpectedProfile, PtoRequest, PtoStatus, ScheduleDay, ScheduleSlot, WeatherImpact,
    WeatherNormals, WeatherRow, WeatherSignal, hour_to_time, parse_time_to_hours,
};

// =============================================================================
// Strategies
// =============================================================================

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn date_in_year() -> impl Strategy<Value = NaiveDate> {
    (0i64..365).prop_map(|offset| base_date() + Duration::days(offset))
}

fn impact() -> impl Strategy<Value = WeatherImpact> {
    prop_oneof![
        Just(WeatherImpact::Up),
        Just(WeatherImpact::Down),
        Just(WeatherImpact::Neutral),
    ]
}

fn signal_with(impact: WeatherImpact) -> WeatherSignal {
    WeatherSignal {
        impact,
        ..WeatherSignal::neutral("test", "test")
    }
}

fn slots(support_headcount: u32) -> Vec<ScheduleSlot> {
    let slot = |id: &str, start: &str, end: &str, role: &str, headcount: u32| {
        ScheduleSlot::new(id, start.parse().unwrap(), end.parse().unwrap(), role, headcount).unwrap()
    };
    vec![
        slot("open", "11:00", "19:00", "Opener Lead", 1),
        slot("close", "15:00", "23:00", "Closer Lead", 2),
        slot("peak", "13:00", "18:00", "Peak Scooper", support_headcount),
    ]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_labor_percent_zero_without_revenue(labor in -1e6f64..1e6, revenue in -1e6f64..=0.0) {
        prop_assert_eq!(labor_percent(labor, revenue), 0.0);
    }

    #[test]
    fn prop_time_round_trip(hour in 0u32..24, minute in 0u32..60) {
        let raw = format!("{:02}:{:02}", hour, minute);
        let hours = parse_time_to_hours(&raw).unwrap();
        prop_assert_eq!(hour_to_time(hours), raw);
    }

    #[test]
    fn prop_pto_overlap_is_inclusive(start in date_in_year(), len in 0i64..14, gap in -20i64..20) {
        let request = PtoRequest {
            id: "pto".to_string(),
            employee: "Ana".to_string(),
            start_date: start,
            end_date: start + Duration::days(len),
            location: "EP".to_string(),
            status: PtoStatus::Approved,
        };
        // a range starting on the request's last day always overlaps
        prop_assert!(pto_date_overlap(&request, request.end_date, request.end_date + Duration::days(3)));

        let range_start = start + Duration::days(gap);
        let range_end = range_start + Duration::days(2);
        let expected = request.start_date <= range_end && range_start <= request.end_date;
        prop_assert_eq!(pto_date_overlap(&request, range_start, range_end), expected);
    }

    #[test]
    fn prop_absent_baseline_never_overstaffed(
        revenue in -1e5f64..1e5,
        labor in -1e5f64..1e5,
        impact in impact(),
    ) {
        let result = overstaff_assessment(
            &Baseline::Absent,
            revenue,
            labor,
            &signal_with(impact),
            &TenantSettings::default(),
        );
        prop_assert!(!result.overstaffed);
    }

    #[test]
    fn prop_rolling_average_uses_available_values(values in prop::collection::vec(0f64..1e4, 1..6)) {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        prop_assert!((rolling_average(&values, 10) - mean).abs() < 1e-6);
    }

    #[test]
    fn prop_engine_functions_are_deterministic(
        revenue in 1f64..1e4,
        actual in 1f64..1e4,
        labor in 0f64..5e3,
        temp in 40f64..110.0,
        date in date_in_year(),
        impact in impact(),
        headcount in 1u32..4,
    ) {
        let settings = TenantSettings::default();
        let baseline = Baseline::Present(DayExpectedProfile {
            revenue,
            labor: revenue * 0.2,
            gross_profit: revenue * 0.52,
            labor_pct: 20.0,
        });
        let signal = signal_with(impact);
        prop_assert_eq!(
            overstaff_assessment(&baseline, actual, labor, &signal, &settings),
            overstaff_assessment(&baseline, actual, labor, &signal, &settings)
        );
        prop_assert_eq!(
            day_financial_viability(&baseline, &slots(headcount), &settings),
            day_financial_viability(&baseline, &slots(headcount), &settings)
        );

        let mut normals = WeatherNormals::new();
        normals.insert(date.format("%m-%d").to_string(), 80.0);
        let row = WeatherRow { temp_max: Some(temp), ..WeatherRow::default() };
        prop_assert_eq!(
            weather_impact_signal(&normals, date, Some(&row), &[], 10.0),
            weather_impact_signal(&normals, date, Some(&row), &[], 10.0)
        );
    }

    #[test]
    fn prop_applying_recommendation_twice_changes_nothing(
        date in date_in_year(),
        impact in impact(),
        headcount in 1u32..4,
    ) {
        let settings = TenantSettings::default();
        let day = ScheduleDay::new(date, slots(headcount));
        let rec = day_recommendation(&signal_with(impact), &day, &settings);
        let once = apply_recommendation_to_day(&day, &rec, &settings);
        let twice = apply_recommendation_to_day(&once, &rec, &settings);
        prop_assert_eq!(once, twice);
    }
}
