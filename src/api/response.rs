//! Response types for the Scheduling Engine API.
//!
//! This module defines the success payloads that wrap more than one engine
//! result, the error body, and the mapping from engine errors to HTTP
//! status codes.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{
    AssignmentGapRow, PtoSummary, ScheduleDay, StaffingRecommendation, TemperatureDelta,
    WeatherSignal, WeekReadinessChecks,
};

/// Body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the service is serving.
    pub status: String,
}

/// Body for `POST /compute/weather-impact`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherImpactResponse {
    /// The day's demand signal.
    pub signal: WeatherSignal,
    /// Actual high against the normal, when a reading was supplied.
    pub temperature: Option<TemperatureDelta>,
    /// Planner-facing staffing guidance for the signal.
    pub action: String,
}

/// Body for `POST /compute/week-readiness`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekReadinessResponse {
    /// Readiness checks for the week.
    pub checks: WeekReadinessChecks,
    /// Whether every check passed.
    pub ready: bool,
    /// Scheduled person-hours.
    pub labor_hours: f64,
    /// Estimated labor cost at the tenant's pay rates.
    pub estimated_labor: f64,
    /// Time-off picture per planned day.
    pub pto_by_day: BTreeMap<NaiveDate, PtoSummary>,
    /// Open positions for the week.
    pub assignment_gaps: Vec<AssignmentGapRow>,
}

/// Body for `POST /compute/day-recommendation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecommendationResponse {
    /// The recommendation for the day.
    pub recommendation: StaffingRecommendation,
    /// The day after applying the recommendation, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<ScheduleDay>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
    /// Error code for programmatic handling.
    pub code: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an error for a location with no trigger rules.
    pub fn unknown_location(location: &str) -> Self {
        Self::with_details(
            "UNKNOWN_LOCATION",
            format!("No trigger rules for location: {}", location),
            "Supply rules in the request or configure defaults for this location",
        )
    }

    /// Classifies a request body that parsed as JSON but failed to
    /// deserialize into the expected shape.
    ///
    /// Field-level domain errors surface through serde's message, so the
    /// code follows the engine error embedded in it.
    pub fn from_data_error(body_text: impl Into<String>) -> Self {
        let body_text = body_text.into();
        let code = if body_text.contains("Malformed time") {
            "MALFORMED_TIME"
        } else if body_text.contains("Malformed month key") {
            "MALFORMED_MONTH_KEY"
        } else if body_text.contains("Invalid slot") {
            "INVALID_SLOT"
        } else {
            "VALIDATION_ERROR"
        };
        Self::new(code, body_text)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A `400 Bad Request` carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::MalformedTime { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("MALFORMED_TIME", message))
            }
            EngineError::MalformedMonthKey { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("MALFORMED_MONTH_KEY", message))
            }
            EngineError::InvalidSlot { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("INVALID_SLOT", message))
            }
            EngineError::InvalidSettings { field, .. } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "INVALID_SETTINGS",
                    message,
                    format!("The settings field '{}' holds an unusable value", field),
                ),
            ),
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"error\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_data_error_classification() {
        assert_eq!(
            ApiError::from_data_error("slots[0].start: Malformed time '9:00': expected two-digit HH:MM").code,
            "MALFORMED_TIME"
        );
        assert_eq!(
            ApiError::from_data_error("Invalid slot 's1': end time 10:00 is before start time 12:00").code,
            "INVALID_SLOT"
        );
        assert_eq!(
            ApiError::from_data_error("missing field `slots`").code,
            "VALIDATION_ERROR"
        );
    }

    #[test]
    fn test_input_errors_are_bad_requests() {
        let api_error: ApiErrorResponse = EngineError::InvalidSettings {
            field: "gpMarginFactor".to_string(),
            message: "must be a finite number".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_SETTINGS");

        let api_error: ApiErrorResponse = EngineError::MalformedMonthKey {
            value: "2025-13".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "MALFORMED_MONTH_KEY");
    }

    #[test]
    fn test_config_errors_are_server_errors() {
        let api_error: ApiErrorResponse = EngineError::ConfigNotFound {
            path: "/missing".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
    }
}
