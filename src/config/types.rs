//! Configuration types for the scheduling engine.
//!
//! This module contains the strongly-typed tenant settings and the trigger
//! catalogs that are deserialized from YAML configuration files. Every
//! settings struct deserializes with defaults, so a partial document is always
//! completed from [`TenantSettings::default`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    ClockTime, ComparisonOperator, LocationTriggerRules, PlaybookMetric, RoleTag, Season,
    TargetProfile, TriggerCondition, TriggerRule,
};

/// Monday demand factors relative to the Tuesday baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MondayScenarios {
    /// Conservative factor.
    pub low: f64,
    /// Expected factor.
    pub base: f64,
    /// Optimistic factor.
    pub high: f64,
}

impl Default for MondayScenarios {
    fn default() -> Self {
        Self {
            low: 0.55,
            base: 0.65,
            high: 0.75,
        }
    }
}

/// Hourly pay rates by role family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PayRates {
    /// Manager rate.
    pub manager: f64,
    /// Key lead rate.
    pub key_lead: f64,
    /// Scooper rate, also the fallback for unrecognised roles.
    pub scooper: f64,
}

impl Default for PayRates {
    fn default() -> Self {
        Self {
            manager: 28.0,
            key_lead: 17.0,
            scooper: 15.0,
        }
    }
}

impl PayRates {
    /// Hourly rate for a role name.
    ///
    /// Roles containing "manager" earn the manager rate, roles containing
    /// "lead" the key-lead rate, and everything else the scooper rate.
    pub fn rate_for_role(&self, role: &str) -> f64 {
        let name = role.to_lowercase();
        if name.contains("manager") {
            self.manager
        } else if name.contains("lead") {
            self.key_lead
        } else {
            self.scooper
        }
    }
}

/// Labor and profit targets, all in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TargetProfileSettings {
    /// Target labor percentage.
    pub labor_target_pct: f64,
    /// Labor percentage above which a day is at risk.
    pub labor_watch_pct: f64,
    /// Minimum acceptable profit percentage.
    pub profit_floor_pct: f64,
    /// Expected profit percentage.
    pub profit_base_pct: f64,
    /// Stretch profit percentage.
    pub profit_stretch_pct: f64,
}

impl Default for TargetProfileSettings {
    fn default() -> Self {
        Self {
            labor_target_pct: 24.0,
            labor_watch_pct: 27.0,
            profit_floor_pct: 11.0,
            profit_base_pct: 15.0,
            profit_stretch_pct: 17.0,
        }
    }
}

/// Coverage and approval rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowSettings {
    /// Minimum opener positions per day.
    pub min_openers: u32,
    /// Minimum closer positions per day.
    pub min_closers: u32,
    /// Whether schedule exceptions need policy approval.
    pub require_policy_approval: bool,
    /// Whether schedule exceptions need GM approval.
    #[serde(rename = "requireGMApproval")]
    pub require_gm_approval: bool,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            min_openers: 1,
            min_closers: 2,
            require_policy_approval: true,
            require_gm_approval: true,
        }
    }
}

impl WorkflowSettings {
    /// Minimum coverage phrased for recommendation text,
    /// e.g. "1 opener and 2 closers".
    pub fn coverage_floor_text(&self) -> String {
        format!(
            "{} opener{} and {} closer{}",
            self.min_openers,
            if self.min_openers == 1 { "" } else { "s" },
            self.min_closers,
            if self.min_closers == 1 { "" } else { "s" },
        )
    }
}

/// Opening hours for each season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeasonHours {
    /// Winter opening time.
    pub winter_open: ClockTime,
    /// Winter closing time.
    pub winter_close: ClockTime,
    /// Spring opening time.
    pub spring_open: ClockTime,
    /// Spring closing time.
    pub spring_close: ClockTime,
    /// Summer opening time.
    pub summer_open: ClockTime,
    /// Summer closing time.
    pub summer_close: ClockTime,
    /// Fall opening time.
    pub fall_open: ClockTime,
    /// Fall closing time.
    pub fall_close: ClockTime,
}

impl Default for SeasonHours {
    fn default() -> Self {
        let noon = ClockTime::from_minutes(12 * 60);
        let ten = ClockTime::from_minutes(22 * 60);
        Self {
            winter_open: noon,
            winter_close: ten,
            spring_open: noon,
            spring_close: ten,
            summer_open: noon,
            summer_close: ClockTime::from_minutes(23 * 60),
            fall_open: noon,
            fall_close: ten,
        }
    }
}

impl SeasonHours {
    /// Opening and closing time for `season`.
    pub fn for_season(&self, season: Season) -> (ClockTime, ClockTime) {
        match season {
            Season::Winter => (self.winter_open, self.winter_close),
            Season::Spring => (self.spring_open, self.spring_close),
            Season::Summer => (self.summer_open, self.summer_close),
            Season::Fall => (self.fall_open, self.fall_close),
        }
    }
}

/// A keyword that classifies role names containing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleKeyword {
    /// Case-insensitive substring to look for.
    pub keyword: String,
    /// Tag assigned on a match.
    pub tag: RoleTag,
}

/// Ordered keyword table mapping free-text role names to [`RoleTag`]s.
///
/// The first keyword found in the role name wins; names matching nothing are
/// [`RoleTag::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleTaxonomy {
    /// Keywords in priority order.
    pub rules: Vec<RoleKeyword>,
}

impl Default for RoleTaxonomy {
    fn default() -> Self {
        let rule = |keyword: &str, tag| RoleKeyword {
            keyword: keyword.to_string(),
            tag,
        };
        Self {
            rules: vec![
                rule("open", RoleTag::Opener),
                rule("close", RoleTag::Closer),
                rule("evening", RoleTag::Evening),
                rule("peak", RoleTag::Support),
                rule("support", RoleTag::Support),
                rule("scooper", RoleTag::Support),
            ],
        }
    }
}

/// Hours that mark a slot as an evening slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EveningWindow {
    /// Slots starting at or after this hour are evening slots.
    pub start_hour: f64,
    /// Slots ending at or after this hour are evening slots.
    pub end_hour: f64,
}

impl Default for EveningWindow {
    fn default() -> Self {
        Self {
            start_hour: 17.0,
            end_hour: 20.0,
        }
    }
}

/// Tunable thresholds and rate tables for one tenant.
///
/// # Example
///
/// ```
/// use scheduling_engine::config::TenantSettings;
///
/// let settings: TenantSettings =
///     serde_json::from_str(r#"{"payRates": {"keyLead": 18.5}}"#).unwrap();
/// assert_eq!(settings.pay_rates.key_lead, 18.5);
/// assert_eq!(settings.pay_rates.manager, 28.0);
/// assert_eq!(settings.gp_margin_factor, 0.72);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TenantSettings {
    /// Share of revenue left after cost of goods (1 - COGS%).
    pub gp_margin_factor: f64,
    /// Monday demand factors.
    pub monday_scenarios: MondayScenarios,
    /// Pay rates.
    pub pay_rates: PayRates,
    /// Labor and profit targets.
    pub target_profile: TargetProfileSettings,
    /// Coverage rules.
    pub workflow: WorkflowSettings,
    /// Opening hours by season.
    pub season_hours: SeasonHours,
    /// Temperature delta, in Fahrenheit, that moves demand.
    #[serde(rename = "weatherThresholdF")]
    pub weather_threshold_f: f64,
    /// Fraction of baseline revenue below which a day missed.
    pub revenue_miss_threshold: f64,
    /// Labor percentage points above baseline that signal pressure.
    pub labor_pressure_delta: f64,
    /// Weeks of history consulted for repeat assignments.
    pub repeat_assignment_weeks: u32,
    /// Years of history used for weather normals.
    pub weather_normals_years: u32,
    /// Role classification table.
    pub role_taxonomy: RoleTaxonomy,
    /// Evening slot thresholds.
    pub evening_window: EveningWindow,
}

impl Default for TenantSettings {
    fn default() -> Self {
        Self {
            gp_margin_factor: 0.72,
            monday_scenarios: MondayScenarios::default(),
            pay_rates: PayRates::default(),
            target_profile: TargetProfileSettings::default(),
            workflow: WorkflowSettings::default(),
            season_hours: SeasonHours::default(),
            weather_threshold_f: 10.0,
            revenue_miss_threshold: 0.9,
            labor_pressure_delta: 3.0,
            repeat_assignment_weeks: 12,
            weather_normals_years: 6,
            role_taxonomy: RoleTaxonomy::default(),
            evening_window: EveningWindow::default(),
        }
    }
}

impl TenantSettings {
    /// Applies a shallow patch: each present top-level field replaces the
    /// current value wholesale.
    pub fn merged(&self, patch: &TenantSettingsPatch) -> Self {
        Self {
            gp_margin_factor: patch.gp_margin_factor.unwrap_or(self.gp_margin_factor),
            monday_scenarios: patch.monday_scenarios.unwrap_or(self.monday_scenarios),
            pay_rates: patch.pay_rates.unwrap_or(self.pay_rates),
            target_profile: patch.target_profile.unwrap_or(self.target_profile),
            workflow: patch.workflow.unwrap_or(self.workflow),
            season_hours: patch.season_hours.unwrap_or(self.season_hours),
            weather_threshold_f: patch.weather_threshold_f.unwrap_or(self.weather_threshold_f),
            revenue_miss_threshold: patch
                .revenue_miss_threshold
                .unwrap_or(self.revenue_miss_threshold),
            labor_pressure_delta: patch.labor_pressure_delta.unwrap_or(self.labor_pressure_delta),
            repeat_assignment_weeks: patch
                .repeat_assignment_weeks
                .unwrap_or(self.repeat_assignment_weeks),
            weather_normals_years: patch
                .weather_normals_years
                .unwrap_or(self.weather_normals_years),
            role_taxonomy: patch
                .role_taxonomy
                .clone()
                .unwrap_or_else(|| self.role_taxonomy.clone()),
            evening_window: patch.evening_window.unwrap_or(self.evening_window),
        }
    }

    /// Checks that numeric settings are usable.
    ///
    /// # Returns
    ///
    /// Returns `InvalidSettings` naming the first offending field.
    pub fn validate(&self) -> EngineResult<()> {
        let finite = [
            ("gpMarginFactor", self.gp_margin_factor),
            ("mondayScenarios.low", self.monday_scenarios.low),
            ("mondayScenarios.base", self.monday_scenarios.base),
            ("mondayScenarios.high", self.monday_scenarios.high),
            ("weatherThresholdF", self.weather_threshold_f),
            ("revenueMissThreshold", self.revenue_miss_threshold),
            ("laborPressureDelta", self.labor_pressure_delta),
            ("targetProfile.laborTargetPct", self.target_profile.labor_target_pct),
            ("targetProfile.laborWatchPct", self.target_profile.labor_watch_pct),
        ];
        if let Some((field, _)) = finite.iter().find(|(_, value)| !value.is_finite()) {
            return Err(EngineError::InvalidSettings {
                field: field.to_string(),
                message: "must be a finite number".to_string(),
            });
        }

        let rates = [
            ("payRates.manager", self.pay_rates.manager),
            ("payRates.keyLead", self.pay_rates.key_lead),
            ("payRates.scooper", self.pay_rates.scooper),
        ];
        if let Some((field, _)) = rates
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(EngineError::InvalidSettings {
                field: field.to_string(),
                message: "must be a non-negative number".to_string(),
            });
        }

        if self.weather_threshold_f < 0.0 {
            return Err(EngineError::InvalidSettings {
                field: "weatherThresholdF".to_string(),
                message: "must not be negative".to_string(),
            });
        }

        if let Some(rule) = self.role_taxonomy.rules.iter().find(|r| r.keyword.trim().is_empty()) {
            return Err(EngineError::InvalidSettings {
                field: "roleTaxonomy".to_string(),
                message: format!("keyword for tag {:?} must not be empty", rule.tag),
            });
        }

        Ok(())
    }
}

/// Per-request or per-tenant overrides for [`TenantSettings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TenantSettingsPatch {
    /// Replacement margin factor.
    pub gp_margin_factor: Option<f64>,
    /// Replacement Monday factors.
    pub monday_scenarios: Option<MondayScenarios>,
    /// Replacement pay rates.
    pub pay_rates: Option<PayRates>,
    /// Replacement targets.
    pub target_profile: Option<TargetProfileSettings>,
    /// Replacement workflow rules.
    pub workflow: Option<WorkflowSettings>,
    /// Replacement season hours.
    pub season_hours: Option<SeasonHours>,
    /// Replacement weather threshold.
    #[serde(rename = "weatherThresholdF")]
    pub weather_threshold_f: Option<f64>,
    /// Replacement revenue-miss threshold.
    pub revenue_miss_threshold: Option<f64>,
    /// Replacement labor-pressure delta.
    pub labor_pressure_delta: Option<f64>,
    /// Replacement repeat-assignment window.
    pub repeat_assignment_weeks: Option<u32>,
    /// Replacement weather-normals window.
    pub weather_normals_years: Option<u32>,
    /// Replacement role taxonomy.
    pub role_taxonomy: Option<RoleTaxonomy>,
    /// Replacement evening window.
    pub evening_window: Option<EveningWindow>,
}

/// Everything the engine loads from a configuration directory.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    settings: TenantSettings,
    target_profiles: BTreeMap<String, TargetProfile>,
    trigger_defaults: BTreeMap<String, LocationTriggerRules>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(
        settings: TenantSettings,
        target_profiles: BTreeMap<String, TargetProfile>,
        trigger_defaults: BTreeMap<String, LocationTriggerRules>,
    ) -> Self {
        Self {
            settings,
            target_profiles,
            trigger_defaults,
        }
    }

    /// Returns the tenant settings.
    pub fn settings(&self) -> &TenantSettings {
        &self.settings
    }

    /// Returns the target profiles keyed by name.
    pub fn target_profiles(&self) -> &BTreeMap<String, TargetProfile> {
        &self.target_profiles
    }

    /// Returns the default trigger rules keyed by location code.
    pub fn trigger_defaults(&self) -> &BTreeMap<String, LocationTriggerRules> {
        &self.trigger_defaults
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(
            TenantSettings::default(),
            builtin_target_profiles(),
            builtin_trigger_rules(),
        )
    }
}

/// Target profiles shipped with the engine.
pub fn builtin_target_profiles() -> BTreeMap<String, TargetProfile> {
    let profile = |label: &str, summary: &str, revenue_factor, share_delta| TargetProfile {
        label: label.to_string(),
        summary: summary.to_string(),
        revenue_factor,
        share_delta,
    };
    BTreeMap::from([
        (
            "conservative".to_string(),
            profile(
                "Conservative",
                "Scale up later and scale down sooner.",
                1.08,
                2.0,
            ),
        ),
        (
            "balanced".to_string(),
            profile(
                "Balanced",
                "Historical defaults calibrated from EP/NL trends.",
                1.0,
                0.0,
            ),
        ),
        (
            "growth".to_string(),
            profile(
                "Growth",
                "Scale up earlier and hold higher capacity longer.",
                0.92,
                -2.0,
            ),
        ),
        (
            "custom".to_string(),
            profile("Custom", "Manual threshold edits are active.", 1.0, 0.0),
        ),
    ])
}

/// Default trigger rules for the two reference locations.
pub fn builtin_trigger_rules() -> BTreeMap<String, LocationTriggerRules> {
    BTreeMap::from([
        ("EP".to_string(), location_rules(3450.0, 68.0, 5000.0, 62.0, 4350.0, 2800.0)),
        ("NL".to_string(), location_rules(1950.0, 68.0, 3200.0, 65.0, 2900.0, 1650.0)),
    ])
}

fn location_rules(
    spring_revenue: f64,
    spring_weekend_share: f64,
    summer_revenue: f64,
    summer_peak_share: f64,
    fall_revenue: f64,
    winter_revenue: f64,
) -> LocationTriggerRules {
    let condition = |metric, operator, threshold| TriggerCondition {
        metric,
        operator,
        threshold,
    };
    LocationTriggerRules {
        up_spring: TriggerRule {
            label: "Winter -> Spring".to_string(),
            detail: "Scale Up 1".to_string(),
            conditions: vec![
                condition(PlaybookMetric::AvgDailyRevenue, ComparisonOperator::Gte, spring_revenue),
                condition(
                    PlaybookMetric::WeekendShare,
                    ComparisonOperator::Gte,
                    spring_weekend_share,
                ),
            ],
        },
        up_summer: TriggerRule {
            label: "Spring -> Summer".to_string(),
            detail: "Scale Up 2".to_string(),
            conditions: vec![
                condition(PlaybookMetric::AvgDailyRevenue, ComparisonOperator::Gte, summer_revenue),
                condition(PlaybookMetric::PeakShare, ComparisonOperator::Gte, summer_peak_share),
            ],
        },
        down_fall: TriggerRule {
            label: "Summer -> Fall".to_string(),
            detail: "Scale Down 1".to_string(),
            conditions: vec![condition(
                PlaybookMetric::AvgDailyRevenue,
                ComparisonOperator::Lte,
                fall_revenue,
            )],
        },
        down_winter: TriggerRule {
            label: "Fall -> Winter".to_string(),
            detail: "Scale Down 2".to_string(),
            conditions: vec![condition(
                PlaybookMetric::AvgDailyRevenue,
                ComparisonOperator::Lte,
                winter_revenue,
            )],
        },
    }
}
