//! Core data models for the Scheduling Engine.
//!
//! This module contains all the domain models used throughout the engine.
//! Every record is a plain value supplied by the caller for a single
//! computation and never retained.

mod adapters;
mod financial;
mod pto;
mod schedule;
mod time;
mod triggers;
mod validation;
mod weather;

pub use adapters::{
    DeliveryConnectionConfig, EmployeeStatus, NormalizedDailySales, NormalizedDeliveryDay,
    NormalizedEmployee, PosConnectionConfig, PublishResult, PublishShiftResult,
    ScheduleForPublish, ShiftForPublish, SyncResult, SyncStatus,
};
pub use financial::{
    ActualDayRow, Baseline, BenchmarkBand, BenchmarkTone, CalendarMonth, DayExpectedProfile,
    DeliveryMode, FinancialViability, HealthSignal, HealthTone, MetricsScenario, MondayScenario,
    MonthlyDataRow, MonthlyMetrics, OperatingPlan, SharedManagerImpact, ViabilityTone,
    WeekdayProfile, WeekdayProfileDay, WeeklyMetrics,
};
pub use pto::{PtoRequest, PtoStatus, PtoSummary};
pub use schedule::{
    MAX_SLOT_HEADCOUNT, RawTemplateSlot, RoleTag, ScheduleDay, ScheduleSlot, ScheduleWeek,
    TemplateSlotDef, WeeklyTemplateProfile,
};
pub use time::{ClockTime, MonthKey, Season, hour_to_time, parse_time_to_hours};
pub use triggers::{
    ClosestTrigger, ComparisonOperator, LocationTriggerRules, PlaybookMetric, PlaybookMetrics,
    TRANSITION_ORDER, TargetProfile, TransitionKey, TriggerCondition, TriggerGapCondition,
    TriggerGapEvaluation, TriggerRule, TriggerRulesOverride, TriggerStatus, TriggerTiming,
};
pub use validation::{
    AssignmentGapRow, CoverageFailure, CoverageRule, DayValidation, OverstaffAssessment,
    WeekReadinessChecks,
};
pub use weather::{
    HourlyWeatherRow, PrecipSignal, RecommendationAction, StaffingRecommendation,
    TemperatureDelta, WeatherImpact, WeatherNormals, WeatherRow, WeatherSignal, WeatherWindow,
};
