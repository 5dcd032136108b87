//! Error types for the Scheduling Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Only structurally malformed input and configuration problems are errors;
//! business-rule outcomes (an absent baseline, an uncovered day) are returned
//! as ordinary values by the calculation functions.

use thiserror::Error;

/// The main error type for the Scheduling Engine.
///
/// # Example
///
/// ```
/// use scheduling_engine::error::EngineError;
///
/// let error = EngineError::MalformedTime {
///     value: "25:00".to_string(),
///     reason: "hour must be between 00 and 23".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Malformed time '25:00': hour must be between 00 and 23"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A clock time was not a strict 24-hour `HH:MM` value.
    #[error("Malformed time '{value}': {reason}")]
    MalformedTime {
        /// The raw value that failed to parse.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A month key was not a strict `YYYY-MM` value.
    #[error("Malformed month key '{value}': expected YYYY-MM")]
    MalformedMonthKey {
        /// The raw value that failed to parse.
        value: String,
    },

    /// A schedule slot was structurally invalid.
    #[error("Invalid slot '{slot_id}': {message}")]
    InvalidSlot {
        /// The ID of the invalid slot.
        slot_id: String,
        /// A description of what made the slot invalid.
        message: String,
    },

    /// A tenant setting held a value outside its valid domain.
    #[error("Invalid setting '{field}': {message}")]
    InvalidSettings {
        /// The settings field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_time_displays_value_and_reason() {
        let error = EngineError::MalformedTime {
            value: "9:00".to_string(),
            reason: "expected two-digit HH:MM".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Malformed time '9:00': expected two-digit HH:MM"
        );
    }

    #[test]
    fn test_malformed_month_key_displays_value() {
        let error = EngineError::MalformedMonthKey {
            value: "2025-13".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Malformed month key '2025-13': expected YYYY-MM"
        );
    }

    #[test]
    fn test_invalid_slot_displays_id_and_message() {
        let error = EngineError::InvalidSlot {
            slot_id: "slot_tue_0".to_string(),
            message: "end time before start time".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid slot 'slot_tue_0': end time before start time"
        );
    }

    #[test]
    fn test_invalid_settings_displays_field_and_message() {
        let error = EngineError::InvalidSettings {
            field: "gpMarginFactor".to_string(),
            message: "must be finite".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid setting 'gpMarginFactor': must be finite"
        );
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/settings.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/settings.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_malformed_time() -> EngineResult<()> {
            Err(EngineError::MalformedTime {
                value: "noon".to_string(),
                reason: "not numeric".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_malformed_time()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
