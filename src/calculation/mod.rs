//! Calculation logic for the Scheduling Engine.
//!
//! Every function here is pure: inputs in, derived values out. The modules
//! cover location economics (weekly and monthly metrics, rolling baselines,
//! benchmark tones), schedule construction (role classification, templates,
//! slot costing, coverage validation, PTO conflicts), weather-driven demand
//! signals and staffing recommendations, retrospective overstaffing, and
//! seasonal transition triggers.

mod baseline;
mod benchmarks;
mod metrics;
mod overstaff;
mod pto_conflicts;
mod recommendations;
mod roles;
mod seasons;
mod slots;
mod templates;
mod trigger_profiles;
mod validation;
mod viability;
mod weather_impact;

pub use baseline::{day_expected_profile, weekday_profile_from_actuals};
pub use benchmarks::{
    DEFAULT_RISK_THRESHOLD, DEFAULT_WATCH_THRESHOLD, benchmark_tone, condition_gap,
    condition_met, health_signal,
};
pub use metrics::{
    OPERATING_DAYS_6, SHARED_MANAGER_WEEKLY_HOURS, gross_profit, labor_percent,
    monthly_metrics_for_location_at_month, revenue_with_mode, rolling_average,
    rolling_average_series, shared_manager_weekly_impact, tuesday_baseline_for_month,
    weekly_metrics_for_location_at_month,
};
pub use overstaff::{NO_BASELINE_MESSAGE, WITHIN_RANGE_MESSAGE, overstaff_assessment};
pub use pto_conflicts::{
    ALL_LOCATIONS, assigned_people_for_day, pto_date_overlap, pto_location_matches,
    pto_rows_for_day, pto_rows_for_range, pto_summary_for_day,
};
pub use recommendations::{WEATHER_SUPPORT_ROLE, apply_recommendation_to_day, day_recommendation};
pub use roles::{classify_role, is_adjustable_role, is_closer_role, is_opener_role};
pub use seasons::{
    closest_trigger_gap, days_to_nearest_trigger, next_trigger, season_for_date,
    season_from_month, trigger_timing_for_location,
};
pub use slots::{
    SeasonWindow, estimated_labor_for_day, is_evening_slot, make_slot, role_rate_for_slot,
    season_hours_for, slot_hours, template_slot_id, weather_slot_id,
};
pub use templates::{
    DEFAULT_TEMPLATE_ROLE, build_template_slots, merge_template_profiles,
    normalize_template_profile, normalize_template_slot,
};
pub use trigger_profiles::{
    FALLBACK_PROFILE, build_trigger_rules_for_profile, merge_trigger_overrides,
    profile_threshold_from_default, scale_action_for,
};
pub use validation::{
    COVERAGE_OK_MESSAGE, assignment_gap_summary, day_validation, next_week_checks,
    week_estimated_labor, week_labor_hours,
};
pub use viability::day_financial_viability;
pub use weather_impact::{
    EVENING_END_HOUR, EVENING_START_HOUR, expected_temp_for_date, staffing_weather_action,
    temperature_delta_for_date, timed_precip_signal, weather_code_label, weather_impact_signal,
};
