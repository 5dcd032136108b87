//! Target profiles applied to default trigger rules.
//!
//! A profile scales revenue thresholds by a factor and shifts share
//! thresholds by a number of points. Tenant overrides then replace whole
//! rules key by key.

use std::collections::BTreeMap;

use tracing::warn;

use crate::models::{
    LocationTriggerRules, PlaybookMetric, TargetProfile, TransitionKey, TriggerCondition,
    TriggerRule, TriggerRulesOverride,
};

/// Profile used when a requested key is unknown.
pub const FALLBACK_PROFILE: &str = "balanced";

/// Threshold of `condition` adjusted by `profile`.
///
/// Revenue thresholds are multiplied by the revenue factor; share thresholds
/// have the share delta added.
///
/// # Example
///
/// ```
/// use scheduling_engine::calculation::profile_threshold_from_default;
/// use scheduling_engine::config::builtin_target_profiles;
/// use scheduling_engine::models::{ComparisonOperator, PlaybookMetric, TriggerCondition};
///
/// let growth = &builtin_target_profiles()["growth"];
/// let share = TriggerCondition {
///     metric: PlaybookMetric::WeekendShare,
///     operator: ComparisonOperator::Gte,
///     threshold: 68.0,
/// };
/// assert_eq!(profile_threshold_from_default(&share, growth), 66.0);
/// ```
pub fn profile_threshold_from_default(condition: &TriggerCondition, profile: &TargetProfile) -> f64 {
    match condition.metric {
        PlaybookMetric::AvgDailyRevenue => condition.threshold * profile.revenue_factor,
        PlaybookMetric::WeekendShare | PlaybookMetric::PeakShare => {
            condition.threshold + profile.share_delta
        }
    }
}

fn profiled_rule(rule: &TriggerRule, profile: &TargetProfile) -> TriggerRule {
    TriggerRule {
        label: rule.label.clone(),
        detail: rule.detail.clone(),
        conditions: rule
            .conditions
            .iter()
            .map(|condition| TriggerCondition {
                metric: condition.metric,
                operator: condition.operator,
                threshold: profile_threshold_from_default(condition, profile),
            })
            .collect(),
    }
}

/// Trigger rules for `locations` under the profile named `profile_key`.
///
/// Unknown keys fall back to [`FALLBACK_PROFILE`]. Locations without
/// defaults are skipped. When neither profile exists the defaults are
/// returned unchanged.
pub fn build_trigger_rules_for_profile(
    profile_key: &str,
    defaults: &BTreeMap<String, LocationTriggerRules>,
    profiles: &BTreeMap<String, TargetProfile>,
    locations: &[String],
) -> BTreeMap<String, LocationTriggerRules> {
    let Some(profile) = profiles
        .get(profile_key)
        .or_else(|| profiles.get(FALLBACK_PROFILE))
    else {
        warn!(profile = %profile_key, "No target profile available; using default triggers");
        return defaults.clone();
    };

    locations
        .iter()
        .filter_map(|location| {
            defaults.get(location).map(|rules| {
                let profiled = LocationTriggerRules {
                    up_spring: profiled_rule(&rules.up_spring, profile),
                    up_summer: profiled_rule(&rules.up_summer, profile),
                    down_fall: profiled_rule(&rules.down_fall, profile),
                    down_winter: profiled_rule(&rules.down_winter, profile),
                };
                (location.clone(), profiled)
            })
        })
        .collect()
}

/// Applies tenant overrides; each present rule replaces the default whole.
pub fn merge_trigger_overrides(
    rules: &LocationTriggerRules,
    overrides: &TriggerRulesOverride,
) -> LocationTriggerRules {
    rules.merged(overrides)
}

/// Staffing action to prepare when a transition is next.
pub fn scale_action_for(key: TransitionKey) -> &'static str {
    match key {
        TransitionKey::UpSpring => {
            "Prepare spring ramp: add weekend-close overlap and start flex training."
        }
        TransitionKey::UpSummer => "Prepare summer peak: schedule 5/6-10/11 PM flex blocks.",
        TransitionKey::DownFall => {
            "Start fall de-ramp: trim weekday flex first while protecting close coverage."
        }
        TransitionKey::DownWinter => {
            "Move to winter lean template and keep breaks/close coverage protected."
        }
    }
}
