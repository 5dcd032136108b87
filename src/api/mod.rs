//! HTTP API module for the Scheduling Engine.
//!
//! This module exposes the engine's computations as stateless JSON
//! endpoints under `/compute`, plus a `/health` probe.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    BaselineSource, DEFAULT_BASELINE_WINDOW, DayRecommendationRequest, DayValidationRequest,
    FinancialViabilityRequest, MonthlyMetricsRequest, MonthlyPlaybookRow,
    OverstaffAssessmentRequest, TriggerGapRequest, TriggerRulesSource, TriggerTimingRequest,
    WeatherImpactRequest, WeekReadinessRequest, WeeklyMetricsRequest,
};
pub use response::{
    ApiError, ApiErrorResponse, DayRecommendationResponse, HealthResponse, WeatherImpactResponse,
    WeekReadinessResponse,
};
pub use state::AppState;
