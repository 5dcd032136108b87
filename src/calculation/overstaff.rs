//! Retrospective overstaffing assessment.
//!
//! Compares a finished day's actuals with its baseline. A day is overstaffed
//! when revenue missed the baseline and labor ran hot at the same time:
//!
//! ```text
//! revenue_miss   = actual_revenue < expected.revenue * revenue_miss_threshold
//! labor_pressure = actual_labor_pct > expected.labor_pct + labor_pressure_delta
//!                  || actual_labor_pct > labor_target_pct
//! overstaffed    = revenue_miss && labor_pressure
//! ```
//!
//! The assessment is recomputed on every call; nothing is remembered.

use tracing::debug;

use crate::config::{TenantSettings, WorkflowSettings};
use crate::models::{Baseline, OverstaffAssessment, WeatherImpact, WeatherSignal};

use super::metrics::labor_percent;

/// Recommendation when no baseline exists for the day.
pub const NO_BASELINE_MESSAGE: &str = "No month baseline available for this date.";

/// Recommendation when nothing calls for a change.
pub const WITHIN_RANGE_MESSAGE: &str = "Within expected staffing range.";

fn keep_floor_text(workflow: &WorkflowSettings) -> String {
    format!(
        "keep {} opener{} + {} closer{}",
        workflow.min_openers,
        if workflow.min_openers == 1 { "" } else { "s" },
        workflow.min_closers,
        if workflow.min_closers == 1 { "" } else { "s" },
    )
}

/// Assesses whether a past day carried more labor than its demand needed.
///
/// # Arguments
///
/// * `baseline` - The day's expected profile, possibly absent
/// * `actual_revenue` - Revenue the day produced
/// * `actual_labor` - Labor cost the day carried
/// * `weather` - The day's weather signal
/// * `settings` - Miss threshold, pressure delta, labor target and coverage floor
///
/// # Returns
///
/// An absent baseline is never overstaffed. Otherwise the recommendation is,
/// in priority order: weather-suppressed trim, generic trim, demand-lift
/// pre-add, or within range.
///
/// # Example
///
/// ```
/// use scheduling_engine::calculation::overstaff_assessment;
/// use scheduling_engine::config::TenantSettings;
/// use scheduling_engine::models::{Baseline, DayExpectedProfile, WeatherSignal};
///
/// let baseline = Baseline::Present(DayExpectedProfile {
///     revenue: 1000.0,
///     labor: 200.0,
///     gross_profit: 520.0,
///     labor_pct: 20.0,
/// });
/// let result = overstaff_assessment(
///     &baseline,
///     800.0,
///     250.0,
///     &WeatherSignal::unavailable(),
///     &TenantSettings::default(),
/// );
/// assert!(result.overstaffed);
/// assert!(result.recommendation.contains("Trim 1 non-closing support slot"));
/// ```
pub fn overstaff_assessment(
    baseline: &Baseline,
    actual_revenue: f64,
    actual_labor: f64,
    weather: &WeatherSignal,
    settings: &TenantSettings,
) -> OverstaffAssessment {
    let actual_labor_pct = labor_percent(actual_labor, actual_revenue);

    let Some(expected) = baseline.profile() else {
        return OverstaffAssessment {
            expected_revenue: 0.0,
            expected_labor: 0.0,
            expected_gross_profit: 0.0,
            expected_labor_pct: settings.target_profile.labor_target_pct,
            actual_labor_pct,
            overstaffed: false,
            recommendation: NO_BASELINE_MESSAGE.to_string(),
            weather_signal: weather.clone(),
        };
    };

    let revenue_miss = actual_revenue < expected.revenue * settings.revenue_miss_threshold;
    let labor_pressure = actual_labor_pct > expected.labor_pct + settings.labor_pressure_delta
        || actual_labor_pct > settings.target_profile.labor_target_pct;
    let overstaffed = revenue_miss && labor_pressure;

    debug!(
        revenue_miss,
        labor_pressure,
        actual_labor_pct,
        impact = ?weather.impact,
        "Overstaff decision"
    );

    let floor = keep_floor_text(&settings.workflow);
    let threshold = settings.weather_threshold_f;
    let recommendation = match (overstaffed, weather.impact) {
        (true, WeatherImpact::Down) => format!(
            "Demand looked weather-suppressed ({}F+ below expected). Next similar day, trim 1 peak/support slot; {}.",
            threshold, floor
        ),
        (true, _) => format!(
            "Revenue underperformed vs baseline. Trim 1 non-closing support slot next similar day; {}.",
            floor
        ),
        (false, WeatherImpact::Up) => format!(
            "Demand-lift weather ({}F+ above expected). Consider pre-adding 1 peak/support slot for similar upcoming days.",
            threshold
        ),
        (false, _) => WITHIN_RANGE_MESSAGE.to_string(),
    };

    OverstaffAssessment {
        expected_revenue: expected.revenue,
        expected_labor: expected.labor,
        expected_gross_profit: expected.gross_profit,
        expected_labor_pct: expected.labor_pct,
        actual_labor_pct,
        overstaffed,
        recommendation,
        weather_signal: weather.clone(),
    }
}
