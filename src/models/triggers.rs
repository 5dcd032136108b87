//! Seasonal trigger rules, target profiles and their evaluations.

use serde::{Deserialize, Serialize};

/// The four seasonal staffing transitions, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKey {
    /// Winter to spring scale-up.
    UpSpring,
    /// Spring to summer scale-up.
    UpSummer,
    /// Summer to fall de-ramp.
    DownFall,
    /// Fall to winter lean template.
    DownWinter,
}

/// Transitions in the order they are evaluated and reported.
pub const TRANSITION_ORDER: [TransitionKey; 4] = [
    TransitionKey::UpSpring,
    TransitionKey::UpSummer,
    TransitionKey::DownFall,
    TransitionKey::DownWinter,
];

/// Comparison applied between a metric and its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// Greater than or equal.
    #[serde(rename = ">=")]
    Gte,
    /// Less than or equal.
    #[serde(rename = "<=")]
    Lte,
    /// Strictly greater.
    #[serde(rename = ">")]
    Gt,
    /// Strictly less.
    #[serde(rename = "<")]
    Lt,
    /// Exactly equal.
    #[serde(rename = "==")]
    Eq,
}

/// Metrics a trigger condition can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybookMetric {
    /// Average daily revenue.
    AvgDailyRevenue,
    /// Weekend share of weekly revenue, 0-100.
    WeekendShare,
    /// Peak-hour share of daily revenue, 0-100.
    PeakShare,
}

/// Monthly figures trigger conditions are evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaybookMetrics {
    /// Average daily revenue.
    pub avg_daily_revenue: f64,
    /// Weekend share, 0-100.
    pub weekend_share: f64,
    /// Peak share, 0-100.
    pub peak_share: f64,
}

impl PlaybookMetrics {
    /// The value of `metric`.
    pub fn value(&self, metric: PlaybookMetric) -> f64 {
        match metric {
            PlaybookMetric::AvgDailyRevenue => self.avg_daily_revenue,
            PlaybookMetric::WeekendShare => self.weekend_share,
            PlaybookMetric::PeakShare => self.peak_share,
        }
    }
}

/// One threshold test within a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerCondition {
    /// Metric under test.
    pub metric: PlaybookMetric,
    /// Comparison.
    pub operator: ComparisonOperator,
    /// Threshold value.
    pub threshold: f64,
}

/// A transition rule: all conditions must hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerRule {
    /// Display label.
    pub label: String,
    /// Longer description.
    #[serde(default)]
    pub detail: String,
    /// Conditions, combined with AND.
    pub conditions: Vec<TriggerCondition>,
}

/// The full rule set for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationTriggerRules {
    /// Spring scale-up rule.
    pub up_spring: TriggerRule,
    /// Summer scale-up rule.
    pub up_summer: TriggerRule,
    /// Fall de-ramp rule.
    pub down_fall: TriggerRule,
    /// Winter lean rule.
    pub down_winter: TriggerRule,
}

impl LocationTriggerRules {
    /// The rule for `key`.
    pub fn rule(&self, key: TransitionKey) -> &TriggerRule {
        match key {
            TransitionKey::UpSpring => &self.up_spring,
            TransitionKey::UpSummer => &self.up_summer,
            TransitionKey::DownFall => &self.down_fall,
            TransitionKey::DownWinter => &self.down_winter,
        }
    }

    /// Applies per-rule overrides; a present override replaces the whole rule.
    pub fn merged(&self, overrides: &TriggerRulesOverride) -> Self {
        Self {
            up_spring: overrides.up_spring.clone().unwrap_or_else(|| self.up_spring.clone()),
            up_summer: overrides.up_summer.clone().unwrap_or_else(|| self.up_summer.clone()),
            down_fall: overrides.down_fall.clone().unwrap_or_else(|| self.down_fall.clone()),
            down_winter: overrides
                .down_winter
                .clone()
                .unwrap_or_else(|| self.down_winter.clone()),
        }
    }
}

/// Tenant overrides for a location's rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerRulesOverride {
    /// Replacement spring rule.
    pub up_spring: Option<TriggerRule>,
    /// Replacement summer rule.
    pub up_summer: Option<TriggerRule>,
    /// Replacement fall rule.
    pub down_fall: Option<TriggerRule>,
    /// Replacement winter rule.
    pub down_winter: Option<TriggerRule>,
}

/// A target profile that scales default trigger thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetProfile {
    /// Display label.
    pub label: String,
    /// Description.
    #[serde(default)]
    pub summary: String,
    /// Multiplier applied to revenue thresholds.
    pub revenue_factor: f64,
    /// Points added to share thresholds.
    pub share_delta: f64,
}

/// Where a transition sits relative to the current month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerStatus {
    /// Conditions hold in the current month.
    Due,
    /// The nearest qualifying month is ahead.
    Upcoming,
    /// The nearest qualifying month has passed.
    Overdue,
    /// No month in range qualifies.
    NotMet,
}

/// Timing summary for one transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerTiming {
    /// Transition.
    pub rule_key: TransitionKey,
    /// Rule label.
    pub label: String,
    /// Rule detail.
    pub detail: String,
    /// Label of the first qualifying month.
    pub first_hit: String,
    /// Label of the last qualifying month.
    pub last_hit: String,
    /// Share of evaluated months that qualify, 0-100.
    pub hit_rate: f64,
    /// Whether the current month qualifies.
    pub current_met: bool,
    /// Position relative to the current month.
    pub status: TriggerStatus,
    /// Signed days from the current month to the nearest qualifying month.
    pub days_from_current: Option<i64>,
}

/// A condition with its distance from being met.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerGapCondition {
    /// Metric under test.
    pub metric: PlaybookMetric,
    /// Comparison.
    pub operator: ComparisonOperator,
    /// Threshold.
    pub threshold: f64,
    /// Signed gap; positive means unmet.
    pub delta: f64,
    /// Whether the condition is unmet.
    pub unmet: bool,
    /// Gap relative to the threshold magnitude.
    pub norm_gap: f64,
}

/// Unmet conditions for one transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerGapEvaluation {
    /// Transition.
    pub rule_key: TransitionKey,
    /// Rule label.
    pub label: String,
    /// Rule detail.
    pub detail: String,
    /// Conditions that do not hold.
    pub unmet: Vec<TriggerGapCondition>,
    /// Sum of normalized gaps across unmet conditions.
    pub max_norm_gap: f64,
}

/// The nearest transition to becoming due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosestTrigger {
    /// Whether every transition's conditions already hold.
    pub all_met: bool,
    /// The unmet transition with the smallest normalized gap.
    pub next: Option<TriggerGapEvaluation>,
    /// Suggested staffing action for `next`.
    pub next_action: Option<String>,
    /// Every transition's evaluation, in order.
    pub evaluations: Vec<TriggerGapEvaluation>,
}
