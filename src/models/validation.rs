//! Coverage validation, week readiness and retrospective assessment results.

use serde::{Deserialize, Serialize};

use super::weather::WeatherSignal;

/// A workflow coverage rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageRule {
    /// Minimum opener positions.
    MinOpeners,
    /// Minimum closer positions.
    MinClosers,
}

/// One unmet coverage rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageFailure {
    /// The rule that failed.
    pub rule: CoverageRule,
    /// Positions required.
    pub required: u32,
    /// Positions scheduled.
    pub actual: u32,
    /// Planner-facing message.
    pub message: String,
}

/// Coverage result for a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayValidation {
    /// Whether every rule holds.
    pub ok: bool,
    /// First failure message, or a success message.
    pub message: String,
    /// Every failed rule.
    pub failures: Vec<CoverageFailure>,
}

/// Readiness counters for a week about to be published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekReadinessChecks {
    /// Days with an open approval request.
    pub pending_requests: u32,
    /// Days with an unsubmitted exception.
    pub unsubmitted_exceptions: u32,
    /// Open positions across the week.
    pub unassigned_positions: u32,
    /// Days failing coverage validation.
    pub invalid_coverage_days: u32,
    /// Assigned employees with approved or pending time off.
    pub pto_conflicts: u32,
}

impl WeekReadinessChecks {
    /// Whether nothing blocks publishing.
    pub fn is_ready(&self) -> bool {
        *self == Self::default()
    }
}

/// Open-position summary for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentGapRow {
    /// `"Week of <date>"`.
    pub week_label: String,
    /// Open positions in the week.
    pub unassigned: u32,
    /// Days with at least one open position.
    pub days_with_gaps: u32,
    /// Slots with no employee assigned at all.
    pub unstaffed_slot_ids: Vec<String>,
}

/// Retrospective staffing assessment for a completed day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverstaffAssessment {
    /// Baseline revenue (0 without a baseline).
    pub expected_revenue: f64,
    /// Baseline labor (0 without a baseline).
    pub expected_labor: f64,
    /// Baseline gross profit (0 without a baseline).
    pub expected_gross_profit: f64,
    /// Baseline labor percentage, or the tenant target without a baseline.
    pub expected_labor_pct: f64,
    /// Actual labor percentage.
    pub actual_labor_pct: f64,
    /// Whether revenue missed and labor ran hot.
    pub overstaffed: bool,
    /// Planner-facing recommendation.
    pub recommendation: String,
    /// Weather signal the assessment considered.
    pub weather_signal: WeatherSignal,
}
