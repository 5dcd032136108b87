//! Request types for the Scheduling Engine API.
//!
//! Each body mirrors the parameters of the engine function behind its
//! endpoint. Every body accepts an optional `settings` patch that is merged
//! over the service's loaded settings for that request only.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::calculation::day_expected_profile;
use crate::config::{TenantSettings, TenantSettingsPatch};
use crate::models::{
    ActualDayRow, Baseline, CalendarMonth, DayExpectedProfile, HourlyWeatherRow,
    LocationTriggerRules, MetricsScenario, MonthKey, MonthlyDataRow, PlaybookMetrics, PtoRequest,
    ScheduleDay, ScheduleSlot, ScheduleWeek, TriggerRulesOverride, WeatherNormals, WeatherRow,
    WeatherSignal, WeekdayProfile,
};

/// Default rolling window, in comparable days, for baselines derived from
/// actuals.
pub const DEFAULT_BASELINE_WINDOW: usize = 4;

fn default_baseline_window() -> usize {
    DEFAULT_BASELINE_WINDOW
}

fn deserialize_window<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let window = usize::deserialize(deserializer)?;
    if window == 0 {
        return Err(serde::de::Error::custom("baseline window must be at least 1"));
    }
    Ok(window)
}

/// How a request supplies the expected profile for a day.
///
/// An explicit `baseline` wins. Otherwise the baseline is derived from
/// `actuals` preceding `date`; with neither the baseline is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaselineSource {
    /// Precomputed expected profile.
    pub baseline: Option<DayExpectedProfile>,
    /// Historical actuals to derive the baseline from.
    pub actuals: Vec<ActualDayRow>,
    /// Number of comparable days averaged.
    #[serde(
        default = "default_baseline_window",
        deserialize_with = "deserialize_window"
    )]
    pub window: usize,
}

impl Default for BaselineSource {
    fn default() -> Self {
        Self {
            baseline: None,
            actuals: Vec::new(),
            window: DEFAULT_BASELINE_WINDOW,
        }
    }
}

impl BaselineSource {
    /// Resolves the baseline for `date`.
    pub fn resolve(&self, date: Option<NaiveDate>, settings: &TenantSettings) -> Baseline {
        if let Some(profile) = self.baseline {
            return Baseline::Present(profile);
        }
        match date {
            Some(date) if !self.actuals.is_empty() => {
                day_expected_profile(&self.actuals, date, settings, self.window)
            }
            _ => Baseline::Absent,
        }
    }
}

/// Request body for `/compute/weekly-metrics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMetricsRequest {
    /// Weekday averages for the month.
    pub profile: WeekdayProfile,
    /// Planned Monday labor under the seven-day plan.
    #[serde(default)]
    pub monday_labor: f64,
    /// Plan, Monday scenario, manager and delivery options.
    #[serde(default)]
    pub scenario: MetricsScenario,
    /// Settings overrides for this request.
    #[serde(default)]
    pub settings: Option<TenantSettingsPatch>,
}

/// Request body for `/compute/monthly-metrics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyMetricsRequest {
    /// Recorded monthly totals.
    pub row: MonthlyDataRow,
    /// Weekday averages for the month.
    pub profile: WeekdayProfile,
    /// Calendar facts for the month.
    pub calendar: CalendarMonth,
    /// Planned labor for one Monday under the seven-day plan.
    #[serde(default)]
    pub monday_labor: f64,
    /// Plan, Monday scenario, manager and delivery options.
    #[serde(default)]
    pub scenario: MetricsScenario,
    /// Settings overrides for this request.
    #[serde(default)]
    pub settings: Option<TenantSettingsPatch>,
}

/// Request body for `/compute/day-validation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayValidationRequest {
    /// The day's slots.
    pub slots: Vec<ScheduleSlot>,
    /// Settings overrides for this request.
    #[serde(default)]
    pub settings: Option<TenantSettingsPatch>,
}

/// Request body for `/compute/financial-viability`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialViabilityRequest {
    /// The planned day, used to derive a baseline from actuals.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Planned slots.
    pub slots: Vec<ScheduleSlot>,
    /// Expected profile or the actuals to derive it from.
    #[serde(flatten)]
    pub baseline: BaselineSource,
    /// Settings overrides for this request.
    #[serde(default)]
    pub settings: Option<TenantSettingsPatch>,
}

/// Request body for `/compute/weather-impact`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherImpactRequest {
    /// The day being assessed.
    pub date: NaiveDate,
    /// Normal highs keyed by `MM-DD`.
    #[serde(default)]
    pub normals: WeatherNormals,
    /// Daily reading or forecast; absent when unavailable.
    #[serde(default)]
    pub weather: Option<WeatherRow>,
    /// Hourly forecast rows.
    #[serde(default)]
    pub hourly: Vec<HourlyWeatherRow>,
    /// Settings overrides for this request.
    #[serde(default)]
    pub settings: Option<TenantSettingsPatch>,
}

/// Request body for `/compute/overstaff-assessment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverstaffAssessmentRequest {
    /// The finished day.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Revenue the day produced.
    pub actual_revenue: f64,
    /// Labor cost the day carried.
    pub actual_labor: f64,
    /// The day's weather signal; unavailable when omitted.
    #[serde(default)]
    pub weather: Option<WeatherSignal>,
    /// Expected profile or the actuals to derive it from.
    #[serde(flatten)]
    pub baseline: BaselineSource,
    /// Settings overrides for this request.
    #[serde(default)]
    pub settings: Option<TenantSettingsPatch>,
}

/// Request body for `/compute/week-readiness`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekReadinessRequest {
    /// The planned week.
    pub week: ScheduleWeek,
    /// Location code the week belongs to.
    pub location: String,
    /// Time-off requests to check against assignments.
    #[serde(default)]
    pub pto: Vec<PtoRequest>,
    /// Settings overrides for this request.
    #[serde(default)]
    pub settings: Option<TenantSettingsPatch>,
}

/// Which trigger rules a request evaluates.
///
/// Explicit `rules` win; otherwise the location's configured defaults are
/// scaled by `profile` and then `overrides` replace whole rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TriggerRulesSource {
    /// Location whose configured rules apply.
    pub location: String,
    /// Target profile key, e.g. `growth`.
    pub profile: Option<String>,
    /// Per-rule replacements.
    pub overrides: Option<TriggerRulesOverride>,
    /// A complete rule set that bypasses configuration.
    pub rules: Option<LocationTriggerRules>,
}

/// Playbook metrics recorded for one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPlaybookRow {
    /// The month.
    pub month: MonthKey,
    /// Its metrics.
    #[serde(flatten)]
    pub metrics: PlaybookMetrics,
}

/// Request body for `/compute/trigger-timing`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerTimingRequest {
    /// Rules to evaluate.
    #[serde(flatten)]
    pub source: TriggerRulesSource,
    /// Months to evaluate, in display order.
    pub months: Vec<MonthlyPlaybookRow>,
    /// The current month, if known.
    #[serde(default)]
    pub current: Option<MonthKey>,
    /// Display labels keyed by `YYYY-MM`.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// Request body for `/compute/trigger-gap`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerGapRequest {
    /// Rules to evaluate.
    #[serde(flatten)]
    pub source: TriggerRulesSource,
    /// Metrics for the period under review.
    pub metrics: PlaybookMetrics,
}

/// Request body for `/compute/day-recommendation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecommendationRequest {
    /// The planned day.
    pub day: ScheduleDay,
    /// The day's weather signal.
    pub signal: WeatherSignal,
    /// Whether to return the day with the recommendation applied.
    #[serde(default)]
    pub apply: bool,
    /// Settings overrides for this request.
    #[serde(default)]
    pub settings: Option<TenantSettingsPatch>,
}
