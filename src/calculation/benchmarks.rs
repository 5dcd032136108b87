//! Benchmark classification and threshold comparison.
//!
//! Classifies labor load and peer benchmarks into display tones, and
//! evaluates trigger conditions. Exactly meeting a threshold counts as met.

use crate::models::{
    BenchmarkBand, BenchmarkTone, ComparisonOperator, HealthSignal, HealthTone, PlaybookMetrics,
    TriggerCondition,
};

/// Default labor percentage at or below which a location is healthy.
pub const DEFAULT_WATCH_THRESHOLD: f64 = 16.0;

/// Default labor percentage above which a location is under high load.
pub const DEFAULT_RISK_THRESHOLD: f64 = 24.0;

/// Maps a labor percentage to a health signal.
///
/// At or below `watch` is Healthy, at or below `risk` is Watch, and anything
/// higher is High Load.
///
/// # Example
///
/// ```
/// use scheduling_engine::calculation::health_signal;
/// use scheduling_engine::models::HealthTone;
///
/// assert_eq!(health_signal(16.0, 16.0, 24.0).tone, HealthTone::Good);
/// assert_eq!(health_signal(30.0, 16.0, 24.0).label, "High Load");
/// ```
pub fn health_signal(labor_pct: f64, watch: f64, risk: f64) -> HealthSignal {
    let (label, tone) = if labor_pct <= watch {
        ("Healthy", HealthTone::Good)
    } else if labor_pct <= risk {
        ("Watch", HealthTone::Watch)
    } else {
        ("High Load", HealthTone::Risk)
    };
    HealthSignal {
        label: label.to_string(),
        tone,
    }
}

/// Places a value within a peer quartile band.
///
/// # Arguments
///
/// * `value` - The location's figure
/// * `band` - Peer quartiles
/// * `lower_is_better` - True for cost metrics such as labor percentage
pub fn benchmark_tone(value: f64, band: &BenchmarkBand, lower_is_better: bool) -> BenchmarkTone {
    let value = if value.is_finite() { value } else { 0.0 };
    let (pill, label) = if lower_is_better {
        if value <= band.p25 {
            ("status-good", "Top Quartile")
        } else if value <= band.p50 {
            ("status-good", "Better Than Median")
        } else if value <= band.p75 {
            ("status-watch", "Watch Zone")
        } else {
            ("status-risk", "High vs Peers")
        }
    } else if value >= band.p75 {
        ("status-good", "Top Quartile")
    } else if value >= band.p50 {
        ("status-good", "Better Than Median")
    } else if value >= band.p25 {
        ("status-watch", "Watch Zone")
    } else {
        ("status-risk", "Low vs Peers")
    };
    BenchmarkTone {
        pill: pill.to_string(),
        label: label.to_string(),
    }
}

/// Whether `value` satisfies `operator` against `threshold`.
pub fn condition_met(value: f64, operator: ComparisonOperator, threshold: f64) -> bool {
    match operator {
        ComparisonOperator::Gte => value >= threshold,
        ComparisonOperator::Lte => value <= threshold,
        ComparisonOperator::Gt => value > threshold,
        ComparisonOperator::Lt => value < threshold,
        ComparisonOperator::Eq => value == threshold,
    }
}

/// Signed distance from a metric to its threshold.
///
/// Positive means the condition is unmet by that much; zero or negative is
/// headroom. Upper-bound operators (`<=`, `<`) measure `value - threshold`,
/// everything else `threshold - value`.
pub fn condition_gap(condition: &TriggerCondition, metrics: &PlaybookMetrics) -> f64 {
    let value = metrics.value(condition.metric);
    let value = if value.is_finite() { value } else { 0.0 };
    match condition.operator {
        ComparisonOperator::Lte | ComparisonOperator::Lt => value - condition.threshold,
        ComparisonOperator::Gte | ComparisonOperator::Gt | ComparisonOperator::Eq => {
            condition.threshold - value
        }
    }
}
