//! Financial inputs and outputs: historical data rows, metric results,
//! baselines and viability.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// How delivery-marketplace revenue is treated when computing revenue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Count delivery revenue as part of store revenue.
    #[default]
    Include,
    /// Subtract the delivery component from store revenue.
    Exclude,
    /// Report only the delivery component.
    DoordashOnly,
}

/// Which operating week the metrics model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatingPlan {
    /// Closed Mondays, open Tuesday through Sunday.
    #[default]
    #[serde(rename = "current_6_day")]
    Current6Day,
    /// Open every day; Monday is projected from the Tuesday baseline.
    #[serde(rename = "open_7_day")]
    Open7Day,
}

/// Which Monday demand factor to apply under [`OperatingPlan::Open7Day`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MondayScenario {
    /// Conservative Monday demand.
    Low,
    /// Expected Monday demand.
    #[default]
    Base,
    /// Optimistic Monday demand.
    High,
}

/// Scenario knobs shared by the weekly and monthly metric functions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetricsScenario {
    /// Operating week.
    pub plan: OperatingPlan,
    /// Monday demand factor key.
    pub monday_scenario: MondayScenario,
    /// Whether a shared manager splits time across two stores.
    pub manager_active: bool,
    /// Share of the manager's hours spent on management, 0 to 1.
    pub manager_mgmt_share: f64,
    /// Delivery revenue treatment.
    pub delivery_mode: DeliveryMode,
}

impl Default for MetricsScenario {
    fn default() -> Self {
        Self {
            plan: OperatingPlan::Current6Day,
            monday_scenario: MondayScenario::Base,
            manager_active: false,
            manager_mgmt_share: 0.5,
            delivery_mode: DeliveryMode::Include,
        }
    }
}

/// Average figures for one weekday within a month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekdayProfileDay {
    /// Average daily revenue.
    pub avg_revenue: f64,
    /// Average daily labor cost.
    pub avg_labor: f64,
    /// Average delivery net revenue included in `avg_revenue`.
    #[serde(default)]
    pub avg_doordash_net: f64,
}

/// Per-weekday averages for one month. Days with no data are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekdayProfile {
    /// Monday averages.
    #[serde(rename = "Mon", default, skip_serializing_if = "Option::is_none")]
    pub mon: Option<WeekdayProfileDay>,
    /// Tuesday averages.
    #[serde(rename = "Tue", default, skip_serializing_if = "Option::is_none")]
    pub tue: Option<WeekdayProfileDay>,
    /// Wednesday averages.
    #[serde(rename = "Wed", default, skip_serializing_if = "Option::is_none")]
    pub wed: Option<WeekdayProfileDay>,
    /// Thursday averages.
    #[serde(rename = "Thu", default, skip_serializing_if = "Option::is_none")]
    pub thu: Option<WeekdayProfileDay>,
    /// Friday averages.
    #[serde(rename = "Fri", default, skip_serializing_if = "Option::is_none")]
    pub fri: Option<WeekdayProfileDay>,
    /// Saturday averages.
    #[serde(rename = "Sat", default, skip_serializing_if = "Option::is_none")]
    pub sat: Option<WeekdayProfileDay>,
    /// Sunday averages.
    #[serde(rename = "Sun", default, skip_serializing_if = "Option::is_none")]
    pub sun: Option<WeekdayProfileDay>,
}

impl WeekdayProfile {
    /// Averages for `weekday`, if any.
    pub fn day(&self, weekday: Weekday) -> Option<&WeekdayProfileDay> {
        match weekday {
            Weekday::Mon => self.mon.as_ref(),
            Weekday::Tue => self.tue.as_ref(),
            Weekday::Wed => self.wed.as_ref(),
            Weekday::Thu => self.thu.as_ref(),
            Weekday::Fri => self.fri.as_ref(),
            Weekday::Sat => self.sat.as_ref(),
            Weekday::Sun => self.sun.as_ref(),
        }
    }

    /// Replaces the averages for `weekday`.
    pub fn set_day(&mut self, weekday: Weekday, day: Option<WeekdayProfileDay>) {
        let slot = match weekday {
            Weekday::Mon => &mut self.mon,
            Weekday::Tue => &mut self.tue,
            Weekday::Wed => &mut self.wed,
            Weekday::Thu => &mut self.thu,
            Weekday::Fri => &mut self.fri,
            Weekday::Sat => &mut self.sat,
            Weekday::Sun => &mut self.sun,
        };
        *slot = day;
    }
}

/// Monthly totals for a location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyDataRow {
    /// Total revenue for the month.
    pub revenue: f64,
    /// Total store labor cost for the month.
    pub store_labor: f64,
    /// Delivery net revenue included in `revenue`.
    #[serde(default)]
    pub doordash_net_component: f64,
}

/// Calendar facts for a month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMonth {
    /// Number of Mondays in the month.
    pub mondays: u32,
    /// Number of Tuesday-through-Sunday days in the month.
    pub operating_days_6: u32,
}

/// One day of recorded actuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualDayRow {
    /// Business date.
    pub date: NaiveDate,
    /// Revenue taken.
    pub revenue: f64,
    /// Store labor cost.
    pub store_labor: f64,
    /// Location code, when rows from several stores are mixed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Weekly financial metrics for a location in a given month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMetrics {
    /// Weekly revenue.
    pub revenue: f64,
    /// Weekly labor cost.
    pub labor: f64,
    /// Gross profit after the tenant margin factor and labor.
    pub gp: f64,
    /// Labor as a percentage of revenue.
    pub labor_pct: f64,
    /// Projected Monday revenue (7-day plan only).
    pub monday_revenue: f64,
    /// Monday labor (7-day plan only).
    pub monday_labor: f64,
    /// Labor added by a shared manager.
    pub manager_added_labor: f64,
    /// Shared manager floor hours attributed to this store.
    pub manager_floor_hours: f64,
    /// Shared manager management hours attributed to this store.
    pub manager_mgmt_hours: f64,
}

/// Monthly financial metrics for a location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyMetrics {
    /// Monthly revenue.
    pub revenue: f64,
    /// Monthly labor cost.
    pub labor: f64,
    /// Gross profit after the tenant margin factor and labor.
    pub gp: f64,
    /// Labor as a percentage of revenue.
    pub labor_pct: f64,
    /// Projected Monday revenue for the month (7-day plan only).
    pub monday_revenue: f64,
    /// Monday labor for the month (7-day plan only).
    pub monday_labor: f64,
    /// Labor added by a shared manager, scaled to the month.
    pub manager_added_labor: f64,
}

/// Weekly cost of a manager shared between two stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedManagerImpact {
    /// Net labor cost across both stores.
    pub total_labor: f64,
    /// Net labor cost per store.
    pub per_store_labor: f64,
    /// Management hours across both stores.
    pub total_mgmt_hours: f64,
    /// Management hours per store.
    pub per_store_mgmt_hours: f64,
    /// Floor hours across both stores.
    pub total_floor_hours: f64,
    /// Floor hours per store.
    pub per_store_floor_hours: f64,
    /// Labor saved by floor hours replacing hourly staff.
    pub replacement_credit: f64,
}

/// Expected figures for a comparable day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayExpectedProfile {
    /// Expected revenue.
    pub revenue: f64,
    /// Expected labor cost.
    pub labor: f64,
    /// Expected gross profit.
    #[serde(default)]
    pub gross_profit: f64,
    /// Expected labor percentage (0-100).
    pub labor_pct: f64,
}

/// A baseline that may not exist yet.
///
/// Serializes as the profile object or `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<DayExpectedProfile>", into = "Option<DayExpectedProfile>")]
pub enum Baseline {
    /// A baseline was computed from history.
    Present(DayExpectedProfile),
    /// No comparable history exists.
    #[default]
    Absent,
}

impl Baseline {
    /// The profile, if present.
    pub fn profile(&self) -> Option<&DayExpectedProfile> {
        match self {
            Baseline::Present(profile) => Some(profile),
            Baseline::Absent => None,
        }
    }
}

impl From<Option<DayExpectedProfile>> for Baseline {
    fn from(value: Option<DayExpectedProfile>) -> Self {
        value.map_or(Baseline::Absent, Baseline::Present)
    }
}

impl From<Baseline> for Option<DayExpectedProfile> {
    fn from(value: Baseline) -> Self {
        match value {
            Baseline::Present(profile) => Some(profile),
            Baseline::Absent => None,
        }
    }
}

/// Viability tone for a planned day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViabilityTone {
    /// Within the target labor band.
    Good,
    /// Above target but within the watch threshold.
    Watch,
    /// Negative gross profit or above the watch threshold.
    Risk,
    /// No baseline to judge against.
    Pending,
}

/// Go/no-go assessment of a planned day against its baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialViability {
    /// Overall tone.
    pub tone: ViabilityTone,
    /// Short label.
    pub label: String,
    /// Planner-facing explanation.
    pub summary: String,
    /// Baseline revenue.
    pub expected_revenue: f64,
    /// Baseline labor.
    pub expected_labor: f64,
    /// Baseline labor percentage.
    pub expected_labor_pct: f64,
    /// Labor cost of the planned slots.
    pub planned_labor: f64,
    /// Planned labor as a percentage of expected revenue.
    pub planned_labor_pct: f64,
    /// Expected revenue after margin, less planned labor.
    pub expected_gp: f64,
}

/// Tone shared by health signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthTone {
    /// Healthy.
    Good,
    /// Needs attention.
    Watch,
    /// Out of band.
    Risk,
}

/// Labor-load health label and tone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSignal {
    /// Display label.
    pub label: String,
    /// Tone.
    pub tone: HealthTone,
}

/// Peer quartile band for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkBand {
    /// 25th percentile.
    pub p25: f64,
    /// Median.
    pub p50: f64,
    /// 75th percentile.
    pub p75: f64,
}

/// Pill class and label for a value compared against peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkTone {
    /// Status pill class.
    pub pill: String,
    /// Display label.
    pub label: String,
}
