//! Financial viability of a planned day.

use crate::config::TenantSettings;
use crate::models::{Baseline, FinancialViability, ScheduleSlot, ViabilityTone};

use super::metrics::labor_percent;
use super::slots::estimated_labor_for_day;

/// Judges a planned day against its baseline demand.
///
/// Planned labor comes from the slots and pay rates. The day is at risk
/// when expected gross profit is negative or planned labor exceeds the
/// watch percentage, on watch above the target percentage, and healthy
/// otherwise. With no baseline the result is pending.
pub fn day_financial_viability(
    baseline: &Baseline,
    slots: &[ScheduleSlot],
    settings: &TenantSettings,
) -> FinancialViability {
    let Some(expected) = baseline.profile() else {
        return FinancialViability {
            tone: ViabilityTone::Pending,
            label: "No Baseline".to_string(),
            summary: "Missing baseline for this day.".to_string(),
            expected_revenue: 0.0,
            expected_labor: 0.0,
            expected_labor_pct: 0.0,
            planned_labor: 0.0,
            planned_labor_pct: 0.0,
            expected_gp: 0.0,
        };
    };

    let planned_labor = estimated_labor_for_day(slots, &settings.pay_rates);
    let planned_labor_pct = labor_percent(planned_labor, expected.revenue);
    let expected_gp = expected.revenue * settings.gp_margin_factor - planned_labor;
    let targets = &settings.target_profile;

    let (tone, label, summary) = if expected_gp < 0.0 || planned_labor_pct > targets.labor_watch_pct {
        (
            ViabilityTone::Risk,
            "Likely Unprofitable",
            "Planned labor is high vs expected demand. Reduce support hours or tighten overlap.",
        )
    } else if planned_labor_pct > targets.labor_target_pct {
        (
            ViabilityTone::Watch,
            "Watch Labor Ratio",
            "Schedule is near your labor watch threshold. Monitor weather and demand early.",
        )
    } else {
        (
            ViabilityTone::Good,
            "Likely Healthy",
            "Schedule is within target labor band for expected demand.",
        )
    };

    FinancialViability {
        tone,
        label: label.to_string(),
        summary: summary.to_string(),
        expected_revenue: expected.revenue,
        expected_labor: expected.labor,
        expected_labor_pct: expected.labor_pct,
        planned_labor,
        planned_labor_pct,
        expected_gp,
    }
}
