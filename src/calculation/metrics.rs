//! Financial metric calculations.
//!
//! Gross profit, labor percentage, delivery-mode revenue, shared-manager cost
//! and the weekly/monthly location metrics built from them. All percentages
//! are on a 0-100 scale.

use chrono::Weekday;

use crate::config::TenantSettings;
use crate::models::{
    CalendarMonth, DeliveryMode, MetricsScenario, MondayScenario, MonthlyDataRow, MonthlyMetrics,
    OperatingPlan, SharedManagerImpact, WeekdayProfile, WeeklyMetrics,
};

/// Days a six-day store trades.
pub const OPERATING_DAYS_6: [Weekday; 6] = [
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Weekly hours a shared manager works across both stores.
pub const SHARED_MANAGER_WEEKLY_HOURS: f64 = 40.0;

/// Gross profit after cost of goods and labor.
///
/// `revenue * gp_margin_factor - labor`, with no floor. A factor of `1.0`
/// gives plain `revenue - labor`.
///
/// # Example
///
/// ```
/// use scheduling_engine::calculation::gross_profit;
///
/// assert_eq!(gross_profit(1000.0, 200.0, 0.72), 520.0);
/// assert_eq!(gross_profit(1000.0, 200.0, 1.0), 800.0);
/// ```
pub fn gross_profit(revenue: f64, labor: f64, gp_margin_factor: f64) -> f64 {
    revenue * gp_margin_factor - labor
}

/// Labor as a percentage of revenue; `0` when revenue is not positive.
pub fn labor_percent(labor: f64, revenue: f64) -> f64 {
    if revenue > 0.0 {
        labor / revenue * 100.0
    } else {
        0.0
    }
}

/// Revenue adjusted for how delivery sales are counted.
pub fn revenue_with_mode(base_revenue: f64, doordash_component: f64, mode: DeliveryMode) -> f64 {
    match mode {
        DeliveryMode::Include => base_revenue,
        DeliveryMode::Exclude => base_revenue - doordash_component,
        DeliveryMode::DoordashOnly => doordash_component,
    }
}

/// Average Tuesday revenue for a month, the basis for Monday projections.
pub fn tuesday_baseline_for_month(profile: &WeekdayProfile, mode: DeliveryMode) -> f64 {
    profile
        .day(Weekday::Tue)
        .map_or(0.0, |tue| revenue_with_mode(tue.avg_revenue, tue.avg_doordash_net, mode))
}

/// Weekly cost of a manager split evenly across two stores.
///
/// Floor hours replace hourly staff at `replacement_rate`, so only the
/// difference counts as added labor. `mgmt_share` is clamped to `0..=1`.
///
/// # Arguments
///
/// * `active` - Whether the shared manager exists at all
/// * `hourly_rate` - Manager hourly rate
/// * `weekly_hours` - Total weekly hours across both stores
/// * `mgmt_share` - Share of hours spent off the floor
/// * `replacement_rate` - Hourly rate of the staff floor hours replace
pub fn shared_manager_weekly_impact(
    active: bool,
    hourly_rate: f64,
    weekly_hours: f64,
    mgmt_share: f64,
    replacement_rate: f64,
) -> SharedManagerImpact {
    if !active {
        return SharedManagerImpact::default();
    }

    let share = mgmt_share.clamp(0.0, 1.0);
    let mgmt_hours = weekly_hours * share;
    let floor_hours = weekly_hours - mgmt_hours;
    let replacement_credit = floor_hours * replacement_rate;
    let total_labor = weekly_hours * hourly_rate - replacement_credit;

    SharedManagerImpact {
        total_labor,
        per_store_labor: total_labor / 2.0,
        total_mgmt_hours: mgmt_hours,
        per_store_mgmt_hours: mgmt_hours / 2.0,
        total_floor_hours: floor_hours,
        per_store_floor_hours: floor_hours / 2.0,
        replacement_credit,
    }
}

fn monday_factor(scenario: MondayScenario, settings: &TenantSettings) -> f64 {
    match scenario {
        MondayScenario::Low => settings.monday_scenarios.low,
        MondayScenario::Base => settings.monday_scenarios.base,
        MondayScenario::High => settings.monday_scenarios.high,
    }
}

fn shared_manager_for(scenario: &MetricsScenario, settings: &TenantSettings) -> SharedManagerImpact {
    shared_manager_weekly_impact(
        scenario.manager_active,
        settings.pay_rates.manager,
        SHARED_MANAGER_WEEKLY_HOURS,
        scenario.manager_mgmt_share,
        settings.pay_rates.scooper,
    )
}

/// Weekly metrics for a location, from one month's weekday averages.
///
/// Sums Tuesday through Sunday. Under the seven-day plan a Monday is added,
/// projected from the Tuesday baseline and the Monday scenario factor. An
/// active shared manager adds its per-store labor.
///
/// # Arguments
///
/// * `profile` - Weekday averages for the month
/// * `monday_labor` - Planned Monday labor for the seven-day plan
/// * `scenario` - Plan, Monday scenario, manager and delivery options
/// * `settings` - Tenant settings
pub fn weekly_metrics_for_location_at_month(
    profile: &WeekdayProfile,
    monday_labor: f64,
    scenario: &MetricsScenario,
    settings: &TenantSettings,
) -> WeeklyMetrics {
    let mut revenue = 0.0;
    let mut labor = 0.0;
    for day in OPERATING_DAYS_6.iter().filter_map(|&weekday| profile.day(weekday)) {
        revenue += revenue_with_mode(day.avg_revenue, day.avg_doordash_net, scenario.delivery_mode);
        labor += day.avg_labor;
    }

    let mut metrics = WeeklyMetrics::default();

    if scenario.plan == OperatingPlan::Open7Day {
        metrics.monday_revenue = tuesday_baseline_for_month(profile, scenario.delivery_mode)
            * monday_factor(scenario.monday_scenario, settings);
        metrics.monday_labor = monday_labor;
        revenue += metrics.monday_revenue;
        labor += metrics.monday_labor;
    }

    if scenario.manager_active {
        let shared = shared_manager_for(scenario, settings);
        metrics.manager_added_labor = shared.per_store_labor;
        metrics.manager_floor_hours = shared.per_store_floor_hours;
        metrics.manager_mgmt_hours = shared.per_store_mgmt_hours;
        labor += shared.per_store_labor;
    }

    metrics.revenue = revenue;
    metrics.labor = labor;
    metrics.gp = gross_profit(revenue, labor, settings.gp_margin_factor);
    metrics.labor_pct = labor_percent(labor, revenue);
    metrics
}

/// Monthly metrics for a location.
///
/// Starts from the month's recorded totals. The seven-day plan adds one
/// projected Monday per calendar Monday; shared-manager labor is scaled by
/// operating days over seven.
pub fn monthly_metrics_for_location_at_month(
    row: &MonthlyDataRow,
    profile: &WeekdayProfile,
    calendar: &CalendarMonth,
    monday_labor: f64,
    scenario: &MetricsScenario,
    settings: &TenantSettings,
) -> MonthlyMetrics {
    let mut revenue = revenue_with_mode(row.revenue, row.doordash_net_component, scenario.delivery_mode);
    let mut labor = row.store_labor;
    let mut metrics = MonthlyMetrics::default();

    let seven_day = scenario.plan == OperatingPlan::Open7Day;
    if seven_day {
        let mondays = f64::from(calendar.mondays);
        metrics.monday_revenue = tuesday_baseline_for_month(profile, scenario.delivery_mode)
            * monday_factor(scenario.monday_scenario, settings)
            * mondays;
        metrics.monday_labor = monday_labor * mondays;
        revenue += metrics.monday_revenue;
        labor += metrics.monday_labor;
    }

    if scenario.manager_active {
        let operating_days = if seven_day {
            calendar.operating_days_6 + calendar.mondays
        } else {
            calendar.operating_days_6
        };
        let shared = shared_manager_for(scenario, settings);
        metrics.manager_added_labor = shared.per_store_labor * f64::from(operating_days) / 7.0;
        labor += metrics.manager_added_labor;
    }

    metrics.revenue = revenue;
    metrics.labor = labor;
    metrics.gp = gross_profit(revenue, labor, settings.gp_margin_factor);
    metrics.labor_pct = labor_percent(labor, revenue);
    metrics
}

/// Mean of the last `window` finite values in `series`.
///
/// Non-finite entries are dropped before the window is taken. With fewer
/// finite values than `window`, all of them are averaged; with none, or a
/// zero window, the result is `0`.
///
/// # Example
///
/// ```
/// use scheduling_engine::calculation::rolling_average;
///
/// assert_eq!(rolling_average(&[10.0, 20.0, 30.0, 40.0], 2), 35.0);
/// assert_eq!(rolling_average(&[10.0, f64::NAN, 20.0], 5), 15.0);
/// ```
pub fn rolling_average(series: &[f64], window: usize) -> f64 {
    let finite: Vec<f64> = series.iter().copied().filter(|v| v.is_finite()).collect();
    let tail = &finite[finite.len().saturating_sub(window)..];
    if tail.is_empty() {
        return 0.0;
    }
    tail.iter().sum::<f64>() / tail.len() as f64
}

/// Trailing average at every index of `values`.
///
/// Each output is the mean of up to `window` values ending at that index.
/// Non-finite values count as zero so the output stays aligned with the
/// input.
pub fn rolling_average_series(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|idx| {
            let start = (idx + 1).saturating_sub(window);
            let slice = &values[start..=idx];
            let sum: f64 = slice.iter().map(|v| if v.is_finite() { *v } else { 0.0 }).sum();
            sum / slice.len() as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeekdayProfileDay;

    fn approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn day(revenue: f64, labor: f64, doordash: f64) -> Option<WeekdayProfileDay> {
        Some(WeekdayProfileDay {
            avg_revenue: revenue,
            avg_labor: labor,
            avg_doordash_net: doordash,
        })
    }

    fn sample_profile() -> WeekdayProfile {
        WeekdayProfile {
            mon: None,
            tue: day(1000.0, 200.0, 100.0),
            wed: day(1000.0, 200.0, 0.0),
            thu: day(1000.0, 200.0, 0.0),
            fri: day(1500.0, 250.0, 0.0),
            sat: day(2000.0, 300.0, 0.0),
            sun: day(1500.0, 250.0, 0.0),
        }
    }

    // =========================================================================
    // Gross profit and labor percent
    // =========================================================================

    #[test]
    fn test_gross_profit_applies_margin_factor() {
        approx(gross_profit(1000.0, 200.0, 0.72), 520.0);
        approx(gross_profit(100.0, 200.0, 1.0), -100.0);
    }

    #[test]
    fn test_labor_percent() {
        approx(labor_percent(200.0, 1000.0), 20.0);
        assert_eq!(labor_percent(200.0, 0.0), 0.0);
        assert_eq!(labor_percent(200.0, -50.0), 0.0);
    }

    #[test]
    fn test_revenue_with_mode() {
        assert_eq!(revenue_with_mode(1000.0, 150.0, DeliveryMode::Include), 1000.0);
        assert_eq!(revenue_with_mode(1000.0, 150.0, DeliveryMode::Exclude), 850.0);
        assert_eq!(revenue_with_mode(1000.0, 150.0, DeliveryMode::DoordashOnly), 150.0);
    }

    #[test]
    fn test_tuesday_baseline_for_month() {
        let profile = sample_profile();
        assert_eq!(tuesday_baseline_for_month(&profile, DeliveryMode::Exclude), 900.0);
        assert_eq!(
            tuesday_baseline_for_month(&WeekdayProfile::default(), DeliveryMode::Include),
            0.0
        );
    }

    // =========================================================================
    // Shared manager
    // =========================================================================

    #[test]
    fn test_shared_manager_inactive_is_zero() {
        assert_eq!(
            shared_manager_weekly_impact(false, 28.0, 40.0, 0.5, 15.0),
            SharedManagerImpact::default()
        );
    }

    #[test]
    fn test_shared_manager_splits_cost() {
        let impact = shared_manager_weekly_impact(true, 28.0, 40.0, 0.5, 15.0);
        approx(impact.total_mgmt_hours, 20.0);
        approx(impact.total_floor_hours, 20.0);
        approx(impact.replacement_credit, 300.0);
        approx(impact.total_labor, 1120.0 - 300.0);
        approx(impact.per_store_labor, 410.0);
        approx(impact.per_store_floor_hours, 10.0);
    }

    #[test]
    fn test_shared_manager_clamps_share() {
        let impact = shared_manager_weekly_impact(true, 28.0, 40.0, 1.5, 15.0);
        approx(impact.total_mgmt_hours, 40.0);
        approx(impact.replacement_credit, 0.0);
    }

    // =========================================================================
    // Weekly metrics
    // =========================================================================

    #[test]
    fn test_weekly_metrics_six_day_plan() {
        let settings = TenantSettings::default();
        let metrics = weekly_metrics_for_location_at_month(
            &sample_profile(),
            0.0,
            &MetricsScenario::default(),
            &settings,
        );
        approx(metrics.revenue, 8000.0);
        approx(metrics.labor, 1400.0);
        approx(metrics.gp, 8000.0 * 0.72 - 1400.0);
        approx(metrics.labor_pct, 17.5);
        assert_eq!(metrics.monday_revenue, 0.0);
    }

    #[test]
    fn test_weekly_metrics_seven_day_plan_projects_monday() {
        let settings = TenantSettings::default();
        let scenario = MetricsScenario {
            plan: OperatingPlan::Open7Day,
            monday_scenario: MondayScenario::High,
            ..MetricsScenario::default()
        };
        let metrics =
            weekly_metrics_for_location_at_month(&sample_profile(), 180.0, &scenario, &settings);
        approx(metrics.monday_revenue, 750.0);
        approx(metrics.monday_labor, 180.0);
        approx(metrics.revenue, 8750.0);
        approx(metrics.labor, 1580.0);
    }

    #[test]
    fn test_weekly_metrics_with_shared_manager() {
        let settings = TenantSettings::default();
        let scenario = MetricsScenario {
            manager_active: true,
            manager_mgmt_share: 0.5,
            ..MetricsScenario::default()
        };
        let metrics =
            weekly_metrics_for_location_at_month(&sample_profile(), 0.0, &scenario, &settings);
        approx(metrics.manager_added_labor, 410.0);
        approx(metrics.manager_floor_hours, 10.0);
        approx(metrics.manager_mgmt_hours, 10.0);
        approx(metrics.labor, 1810.0);
    }

    #[test]
    fn test_weekly_metrics_empty_profile() {
        let metrics = weekly_metrics_for_location_at_month(
            &WeekdayProfile::default(),
            0.0,
            &MetricsScenario::default(),
            &TenantSettings::default(),
        );
        assert_eq!(metrics.revenue, 0.0);
        assert_eq!(metrics.labor_pct, 0.0);
    }

    // =========================================================================
    // Monthly metrics
    // =========================================================================

    #[test]
    fn test_monthly_metrics_six_day_plan() {
        let row = MonthlyDataRow {
            revenue: 40000.0,
            store_labor: 8000.0,
            doordash_net_component: 4000.0,
        };
        let calendar = CalendarMonth {
            mondays: 4,
            operating_days_6: 26,
        };
        let scenario = MetricsScenario {
            delivery_mode: DeliveryMode::Exclude,
            ..MetricsScenario::default()
        };
        let metrics = monthly_metrics_for_location_at_month(
            &row,
            &sample_profile(),
            &calendar,
            0.0,
            &scenario,
            &TenantSettings::default(),
        );
        approx(metrics.revenue, 36000.0);
        approx(metrics.labor, 8000.0);
        approx(metrics.labor_pct, 8000.0 / 36000.0 * 100.0);
    }

    #[test]
    fn test_monthly_metrics_seven_day_plan_with_manager() {
        let row = MonthlyDataRow {
            revenue: 40000.0,
            store_labor: 8000.0,
            doordash_net_component: 0.0,
        };
        let calendar = CalendarMonth {
            mondays: 4,
            operating_days_6: 27,
        };
        let scenario = MetricsScenario {
            plan: OperatingPlan::Open7Day,
            manager_active: true,
            ..MetricsScenario::default()
        };
        let metrics = monthly_metrics_for_location_at_month(
            &row,
            &sample_profile(),
            &calendar,
            150.0,
            &scenario,
            &TenantSettings::default(),
        );
        approx(metrics.monday_revenue, 1000.0 * 0.65 * 4.0);
        approx(metrics.monday_labor, 600.0);
        approx(metrics.manager_added_labor, 410.0 * 31.0 / 7.0);
        approx(metrics.labor, 8000.0 + 600.0 + 410.0 * 31.0 / 7.0);
    }

    // =========================================================================
    // Rolling averages
    // =========================================================================

    #[test]
    fn test_rolling_average_uses_last_window() {
        approx(rolling_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3), 4.0);
    }

    #[test]
    fn test_rolling_average_short_series_uses_all_values() {
        approx(rolling_average(&[4.0, 8.0], 7), 6.0);
    }

    #[test]
    fn test_rolling_average_ignores_non_finite() {
        approx(rolling_average(&[2.0, f64::INFINITY, 4.0, f64::NAN], 2), 3.0);
    }

    #[test]
    fn test_rolling_average_empty_and_zero_window() {
        assert_eq!(rolling_average(&[], 3), 0.0);
        assert_eq!(rolling_average(&[1.0, 2.0], 0), 0.0);
        assert_eq!(rolling_average(&[f64::NAN], 3), 0.0);
    }

    #[test]
    fn test_rolling_average_series_expanding_window() {
        let series = rolling_average_series(&[2.0, 4.0, 6.0, 8.0], 2);
        assert_eq!(series, vec![2.0, 3.0, 5.0, 7.0]);
        assert!(rolling_average_series(&[], 3).is_empty());
    }
}
