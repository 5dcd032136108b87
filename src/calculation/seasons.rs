//! Seasons and seasonal trigger timing.
//!
//! A trigger is one of the four staffing transitions. Its rule holds for a
//! month when every condition is met by that month's playbook metrics.
//! Timing reports where the qualifying months sit relative to the current
//! month; gap analysis reports how far each unmet rule is from holding.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{
    ClosestTrigger, LocationTriggerRules, MonthKey, PlaybookMetrics, Season, TRANSITION_ORDER,
    TriggerGapCondition, TriggerGapEvaluation, TriggerStatus, TriggerTiming,
};

use super::benchmarks::{condition_gap, condition_met};
use super::trigger_profiles::scale_action_for;

/// Season of a month.
pub fn season_from_month(month: MonthKey) -> Season {
    Season::from_month(month.month())
}

/// Season of a date.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use scheduling_engine::calculation::season_for_date;
/// use scheduling_engine::models::Season;
///
/// assert_eq!(season_for_date(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()), Season::Winter);
/// assert_eq!(season_for_date(NaiveDate::from_ymd_opt(2025, 9, 30).unwrap()), Season::Fall);
/// ```
pub fn season_for_date(date: NaiveDate) -> Season {
    Season::from_month(date.month())
}

/// Signed days from `current` to the nearest qualifying month.
///
/// Measured between first days of months; positive means ahead. On a tie the
/// month ahead wins.
///
/// # Returns
///
/// `None` when `hits` is empty.
pub fn days_to_nearest_trigger(hits: &[MonthKey], current: MonthKey) -> Option<i64> {
    hits.iter()
        .map(|hit| (hit.first_day() - current.first_day()).num_days())
        .min_by_key(|days| (days.abs(), *days < 0))
}

/// Timing of every transition over a range of months.
///
/// # Arguments
///
/// * `rules` - The location's trigger rules
/// * `months` - Months to evaluate, in display order
/// * `metrics_for` - Playbook metrics for a month
/// * `current` - The current month, if known
/// * `labels` - Display labels keyed by `YYYY-MM`; missing keys show the key
///
/// # Returns
///
/// One [`TriggerTiming`] per transition. Status is `not_met` with no
/// qualifying month, `due` when the current month qualifies, and otherwise
/// `upcoming` or `overdue` by the sign of the day count. Without a current
/// month the day count is absent and any hit is `upcoming`.
pub fn trigger_timing_for_location<F>(
    rules: &LocationTriggerRules,
    months: &[MonthKey],
    metrics_for: F,
    current: Option<MonthKey>,
    labels: &BTreeMap<String, String>,
) -> Vec<TriggerTiming>
where
    F: Fn(MonthKey) -> PlaybookMetrics,
{
    let label_for = |month: &MonthKey| {
        let key = month.to_string();
        labels.get(&key).cloned().unwrap_or(key)
    };

    // metrics per month are shared by all four rules
    let evaluated: Vec<(MonthKey, PlaybookMetrics)> =
        months.iter().map(|&month| (month, metrics_for(month))).collect();

    TRANSITION_ORDER
        .iter()
        .map(|&rule_key| {
            let rule = rules.rule(rule_key);
            let hits: Vec<MonthKey> = evaluated
                .iter()
                .filter(|(_, metrics)| {
                    rule.conditions.iter().all(|condition| {
                        condition_met(metrics.value(condition.metric), condition.operator, condition.threshold)
                    })
                })
                .map(|(month, _)| *month)
                .collect();

            let hit_rate = if months.is_empty() {
                0.0
            } else {
                hits.len() as f64 / months.len() as f64 * 100.0
            };
            let current_met = current.is_some_and(|month| hits.contains(&month));

            let days_from_current = match current {
                Some(_) if current_met => Some(0),
                Some(month) => days_to_nearest_trigger(&hits, month),
                None => None,
            };
            let status = match (hits.is_empty(), days_from_current) {
                (true, _) => TriggerStatus::NotMet,
                (false, Some(0)) => TriggerStatus::Due,
                (false, Some(days)) if days < 0 => TriggerStatus::Overdue,
                (false, _) => TriggerStatus::Upcoming,
            };

            TriggerTiming {
                rule_key,
                label: rule.label.clone(),
                detail: rule.detail.clone(),
                first_hit: hits
                    .first()
                    .map_or_else(|| "Not met in selected range".to_string(), label_for),
                last_hit: hits.last().map_or_else(|| "Not met".to_string(), label_for),
                hit_rate,
                current_met,
                status,
                days_from_current,
            }
        })
        .collect()
}

/// How far each transition is from holding.
///
/// Each unmet condition reports its signed gap and the gap relative to the
/// threshold's magnitude (at least one). `max_norm_gap` sums the relative
/// gaps of the unmet conditions.
pub fn closest_trigger_gap(
    rules: &LocationTriggerRules,
    metrics: &PlaybookMetrics,
) -> Vec<TriggerGapEvaluation> {
    TRANSITION_ORDER
        .iter()
        .map(|&rule_key| {
            let rule = rules.rule(rule_key);
            let unmet: Vec<TriggerGapCondition> = rule
                .conditions
                .iter()
                .map(|condition| {
                    let delta = condition_gap(condition, metrics);
                    let unmet = delta > 0.0;
                    TriggerGapCondition {
                        metric: condition.metric,
                        operator: condition.operator,
                        threshold: condition.threshold,
                        delta,
                        unmet,
                        norm_gap: if unmet {
                            delta / condition.threshold.abs().max(1.0)
                        } else {
                            0.0
                        },
                    }
                })
                .filter(|condition| condition.unmet)
                .collect();

            TriggerGapEvaluation {
                rule_key,
                label: rule.label.clone(),
                detail: rule.detail.clone(),
                max_norm_gap: unmet.iter().map(|c| c.norm_gap).sum(),
                unmet,
            }
        })
        .collect()
}

/// The unmet transition closest to holding, with its staffing action.
///
/// Ties keep transition order.
pub fn next_trigger(rules: &LocationTriggerRules, metrics: &PlaybookMetrics) -> ClosestTrigger {
    let evaluations = closest_trigger_gap(rules, metrics);

    let next = evaluations
        .iter()
        .filter(|evaluation| !evaluation.unmet.is_empty())
        .min_by(|a, b| a.max_norm_gap.total_cmp(&b.max_norm_gap))
        .cloned();

    ClosestTrigger {
        all_met: next.is_none(),
        next_action: next
            .as_ref()
            .map(|evaluation| scale_action_for(evaluation.rule_key).to_string()),
        next,
        evaluations,
    }
}
