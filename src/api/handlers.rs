//! HTTP request handlers for the Scheduling Engine API.
//!
//! This module contains the handler functions for all API endpoints. Each
//! handler resolves the request's settings, calls one engine operation and
//! returns its result as JSON.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    apply_recommendation_to_day, assignment_gap_summary, day_financial_viability,
    day_recommendation, day_validation, merge_trigger_overrides,
    monthly_metrics_for_location_at_month, next_trigger, next_week_checks, overstaff_assessment,
    pto_summary_for_day, staffing_weather_action, temperature_delta_for_date,
    trigger_timing_for_location, weather_impact_signal, week_estimated_labor, week_labor_hours,
    weekly_metrics_for_location_at_month,
};
use crate::models::{LocationTriggerRules, MonthKey, PlaybookMetrics, WeatherSignal};

use super::request::{
    DayRecommendationRequest, DayValidationRequest, FinancialViabilityRequest,
    MonthlyMetricsRequest, OverstaffAssessmentRequest, TriggerGapRequest, TriggerRulesSource,
    TriggerTimingRequest, WeatherImpactRequest, WeekReadinessRequest, WeeklyMetricsRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, DayRecommendationResponse, HealthResponse, WeatherImpactResponse,
    WeekReadinessResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/compute/weekly-metrics", post(weekly_metrics_handler))
        .route("/compute/monthly-metrics", post(monthly_metrics_handler))
        .route("/compute/day-validation", post(day_validation_handler))
        .route("/compute/financial-viability", post(financial_viability_handler))
        .route("/compute/weather-impact", post(weather_impact_handler))
        .route("/compute/overstaff-assessment", post(overstaff_assessment_handler))
        .route("/compute/week-readiness", post(week_readiness_handler))
        .route("/compute/trigger-timing", post(trigger_timing_handler))
        .route("/compute/trigger-gap", post(trigger_gap_handler))
        .route("/compute/day-recommendation", post(day_recommendation_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn error_response(api_error: ApiErrorResponse) -> Response {
    json_response(api_error.status, api_error.error)
}

/// Converts a body that failed to parse into a `400` error response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's message, including engine parse errors
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            ApiError::from_data_error(body_text)
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    error_response(ApiErrorResponse::bad_request(error))
}

fn engine_error_response(err: crate::error::EngineError, correlation_id: Uuid) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Computation rejected"
    );
    error_response(err.into())
}

/// Resolves the trigger rules a request evaluates.
fn resolve_trigger_rules(
    state: &AppState,
    source: &TriggerRulesSource,
) -> Result<LocationTriggerRules, ApiErrorResponse> {
    let rules = match &source.rules {
        Some(rules) => rules.clone(),
        None => state
            .config()
            .trigger_rules_for(&source.location, source.profile.as_deref())
            .ok_or_else(|| {
                ApiErrorResponse::bad_request(ApiError::unknown_location(&source.location))
            })?,
    };
    Ok(match &source.overrides {
        Some(overrides) => merge_trigger_overrides(&rules, overrides),
        None => rules,
    })
}

/// Unwraps a parsed body or returns the rejection response.
macro_rules! parse_body {
    ($payload:expr, $correlation_id:expr) => {
        match $payload {
            Ok(Json(request)) => request,
            Err(rejection) => return rejection_response(rejection, $correlation_id),
        }
    };
}

/// Resolves the request's settings or returns the error response.
macro_rules! resolve_settings {
    ($state:expr, $patch:expr, $correlation_id:expr) => {
        match $state.resolve_settings($patch) {
            Ok(settings) => settings,
            Err(err) => return engine_error_response(err, $correlation_id),
        }
    };
}

/// Handler for GET /health.
async fn health_handler() -> Response {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok".to_string(),
        },
    )
}

/// Handler for POST /compute/weekly-metrics.
async fn weekly_metrics_handler(
    State(state): State<AppState>,
    payload: Result<Json<WeeklyMetricsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint = "weekly-metrics", "Processing compute request");

    let request = parse_body!(payload, correlation_id);
    let settings = resolve_settings!(state, request.settings.as_ref(), correlation_id);

    let start_time = Instant::now();
    let result = weekly_metrics_for_location_at_month(
        &request.profile,
        request.monday_labor,
        &request.scenario,
        &settings,
    );
    info!(
        correlation_id = %correlation_id,
        revenue = result.revenue,
        labor_pct = result.labor_pct,
        duration_us = start_time.elapsed().as_micros(),
        "Weekly metrics computed"
    );
    json_response(StatusCode::OK, result)
}

/// Handler for POST /compute/monthly-metrics.
async fn monthly_metrics_handler(
    State(state): State<AppState>,
    payload: Result<Json<MonthlyMetricsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint = "monthly-metrics", "Processing compute request");

    let request = parse_body!(payload, correlation_id);
    let settings = resolve_settings!(state, request.settings.as_ref(), correlation_id);

    let start_time = Instant::now();
    let result = monthly_metrics_for_location_at_month(
        &request.row,
        &request.profile,
        &request.calendar,
        request.monday_labor,
        &request.scenario,
        &settings,
    );
    info!(
        correlation_id = %correlation_id,
        revenue = result.revenue,
        labor_pct = result.labor_pct,
        duration_us = start_time.elapsed().as_micros(),
        "Monthly metrics computed"
    );
    json_response(StatusCode::OK, result)
}

/// Handler for POST /compute/day-validation.
async fn day_validation_handler(
    State(state): State<AppState>,
    payload: Result<Json<DayValidationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint = "day-validation", "Processing compute request");

    let request = parse_body!(payload, correlation_id);
    let settings = resolve_settings!(state, request.settings.as_ref(), correlation_id);

    let start_time = Instant::now();
    let result = day_validation(&request.slots, &settings.workflow, &settings.role_taxonomy);
    info!(
        correlation_id = %correlation_id,
        slots = request.slots.len(),
        ok = result.ok,
        duration_us = start_time.elapsed().as_micros(),
        "Day validated"
    );
    json_response(StatusCode::OK, result)
}

/// Handler for POST /compute/financial-viability.
async fn financial_viability_handler(
    State(state): State<AppState>,
    payload: Result<Json<FinancialViabilityRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint = "financial-viability", "Processing compute request");

    let request = parse_body!(payload, correlation_id);
    let settings = resolve_settings!(state, request.settings.as_ref(), correlation_id);

    let start_time = Instant::now();
    let baseline = request.baseline.resolve(request.date, &settings);
    let result = day_financial_viability(&baseline, &request.slots, &settings);
    info!(
        correlation_id = %correlation_id,
        tone = ?result.tone,
        planned_labor = result.planned_labor,
        duration_us = start_time.elapsed().as_micros(),
        "Financial viability computed"
    );
    json_response(StatusCode::OK, result)
}

/// Handler for POST /compute/weather-impact.
async fn weather_impact_handler(
    State(state): State<AppState>,
    payload: Result<Json<WeatherImpactRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint = "weather-impact", "Processing compute request");

    let request = parse_body!(payload, correlation_id);
    let settings = resolve_settings!(state, request.settings.as_ref(), correlation_id);

    let start_time = Instant::now();
    let signal = weather_impact_signal(
        &request.normals,
        request.date,
        request.weather.as_ref(),
        &request.hourly,
        settings.weather_threshold_f,
    );
    let temperature = request
        .weather
        .as_ref()
        .map(|row| temperature_delta_for_date(&request.normals, request.date, row));
    let action = staffing_weather_action(&signal, &settings.workflow);
    info!(
        correlation_id = %correlation_id,
        date = %request.date,
        impact = ?signal.impact,
        duration_us = start_time.elapsed().as_micros(),
        "Weather impact computed"
    );
    json_response(
        StatusCode::OK,
        WeatherImpactResponse {
            signal,
            temperature,
            action,
        },
    )
}

/// Handler for POST /compute/overstaff-assessment.
async fn overstaff_assessment_handler(
    State(state): State<AppState>,
    payload: Result<Json<OverstaffAssessmentRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint = "overstaff-assessment", "Processing compute request");

    let request = parse_body!(payload, correlation_id);
    let settings = resolve_settings!(state, request.settings.as_ref(), correlation_id);

    let start_time = Instant::now();
    let baseline = request.baseline.resolve(request.date, &settings);
    let weather = request.weather.unwrap_or_else(WeatherSignal::unavailable);
    let result = overstaff_assessment(
        &baseline,
        request.actual_revenue,
        request.actual_labor,
        &weather,
        &settings,
    );
    info!(
        correlation_id = %correlation_id,
        overstaffed = result.overstaffed,
        actual_labor_pct = result.actual_labor_pct,
        duration_us = start_time.elapsed().as_micros(),
        "Overstaff assessment computed"
    );
    json_response(StatusCode::OK, result)
}

/// Handler for POST /compute/week-readiness.
async fn week_readiness_handler(
    State(state): State<AppState>,
    payload: Result<Json<WeekReadinessRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint = "week-readiness", "Processing compute request");

    let request = parse_body!(payload, correlation_id);
    let settings = resolve_settings!(state, request.settings.as_ref(), correlation_id);

    let start_time = Instant::now();
    let week = &request.week;
    let checks = next_week_checks(
        week,
        &request.location,
        &request.pto,
        &settings.workflow,
        &settings.role_taxonomy,
    );
    let pto_by_day = week
        .days
        .iter()
        .map(|day| {
            (
                day.date,
                pto_summary_for_day(&request.pto, &request.location, day.date, &day.slots),
            )
        })
        .collect();
    let response = WeekReadinessResponse {
        checks,
        ready: checks.is_ready(),
        labor_hours: week_labor_hours(week),
        estimated_labor: week_estimated_labor(week, &settings.pay_rates),
        pto_by_day,
        assignment_gaps: assignment_gap_summary(std::slice::from_ref(week), 1),
    };
    info!(
        correlation_id = %correlation_id,
        week_start = %week.week_start,
        ready = response.ready,
        duration_us = start_time.elapsed().as_micros(),
        "Week readiness computed"
    );
    json_response(StatusCode::OK, response)
}

/// Handler for POST /compute/trigger-timing.
async fn trigger_timing_handler(
    State(state): State<AppState>,
    payload: Result<Json<TriggerTimingRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint = "trigger-timing", "Processing compute request");

    let request = parse_body!(payload, correlation_id);
    let rules = match resolve_trigger_rules(&state, &request.source) {
        Ok(rules) => rules,
        Err(api_error) => {
            warn!(correlation_id = %correlation_id, location = %request.source.location, "No trigger rules");
            return error_response(api_error);
        }
    };

    let start_time = Instant::now();
    let by_month: BTreeMap<MonthKey, PlaybookMetrics> = request
        .months
        .iter()
        .map(|row| (row.month, row.metrics))
        .collect();
    let months: Vec<MonthKey> = request.months.iter().map(|row| row.month).collect();
    let result = trigger_timing_for_location(
        &rules,
        &months,
        |month| by_month.get(&month).copied().unwrap_or_default(),
        request.current,
        &request.labels,
    );
    info!(
        correlation_id = %correlation_id,
        location = %request.source.location,
        months = months.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Trigger timing computed"
    );
    json_response(StatusCode::OK, result)
}

/// Handler for POST /compute/trigger-gap.
async fn trigger_gap_handler(
    State(state): State<AppState>,
    payload: Result<Json<TriggerGapRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint = "trigger-gap", "Processing compute request");

    let request = parse_body!(payload, correlation_id);
    let rules = match resolve_trigger_rules(&state, &request.source) {
        Ok(rules) => rules,
        Err(api_error) => {
            warn!(correlation_id = %correlation_id, location = %request.source.location, "No trigger rules");
            return error_response(api_error);
        }
    };

    let start_time = Instant::now();
    let result = next_trigger(&rules, &request.metrics);
    info!(
        correlation_id = %correlation_id,
        location = %request.source.location,
        all_met = result.all_met,
        duration_us = start_time.elapsed().as_micros(),
        "Trigger gap computed"
    );
    json_response(StatusCode::OK, result)
}

/// Handler for POST /compute/day-recommendation.
///
/// With `apply` set, the response also carries the adjusted day.
async fn day_recommendation_handler(
    State(state): State<AppState>,
    payload: Result<Json<DayRecommendationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint = "day-recommendation", "Processing compute request");

    let request = parse_body!(payload, correlation_id);
    let settings = resolve_settings!(state, request.settings.as_ref(), correlation_id);

    let start_time = Instant::now();
    let recommendation = day_recommendation(&request.signal, &request.day, &settings);
    let day = request
        .apply
        .then(|| apply_recommendation_to_day(&request.day, &recommendation, &settings));
    info!(
        correlation_id = %correlation_id,
        date = %request.day.date,
        key = %recommendation.key,
        applied = day.is_some(),
        duration_us = start_time.elapsed().as_micros(),
        "Day recommendation computed"
    );
    json_response(StatusCode::OK, DayRecommendationResponse { recommendation, day })
}
