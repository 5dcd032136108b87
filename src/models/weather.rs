//! Weather readings, normals and derived demand signals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Expected daily high temperature keyed by `"MM-DD"`.
pub type WeatherNormals = BTreeMap<String, f64>;

/// Daily weather reading or forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRow {
    /// Daily high in Fahrenheit.
    #[serde(default)]
    pub temp_max: Option<f64>,
    /// WMO weather code.
    #[serde(default)]
    pub code: Option<i32>,
    /// Precipitation probability, 0-100.
    #[serde(default)]
    pub precip_prob: Option<f64>,
    /// Precipitation amount in millimetres.
    #[serde(default)]
    pub precip_mm: Option<f64>,
}

/// Hourly precipitation forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyWeatherRow {
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Precipitation probability, 0-100.
    #[serde(default)]
    pub precip_prob: Option<f64>,
    /// Precipitation amount in millimetres.
    #[serde(default)]
    pub precip_mm: Option<f64>,
}

/// Actual high compared with the seasonal normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureDelta {
    /// Whether both figures were available.
    pub available: bool,
    /// Actual high.
    pub actual: Option<f64>,
    /// Expected high.
    pub expected: Option<f64>,
    /// `actual - expected`.
    pub delta: Option<f64>,
}

/// Direction weather is expected to push demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherImpact {
    /// Demand lift.
    Up,
    /// Demand risk.
    Down,
    /// No material effect.
    #[default]
    Neutral,
}

/// Part of the day a discrete weather event affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherWindow {
    /// 8pm through 11pm.
    Evening,
}

/// Weather-driven demand signal for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSignal {
    /// Demand direction.
    pub impact: WeatherImpact,
    /// Short label.
    #[serde(default)]
    pub label: String,
    /// Explanation.
    #[serde(default)]
    pub reason: String,
    /// Temperature delta vs normal.
    #[serde(default)]
    pub delta: Option<f64>,
    /// Expected high.
    #[serde(default)]
    pub expected: Option<f64>,
    /// Actual high.
    #[serde(default)]
    pub actual: Option<f64>,
    /// Window of a discrete event.
    #[serde(default)]
    pub window: Option<WeatherWindow>,
    /// Hour the discrete event starts.
    #[serde(default)]
    pub event_hour: Option<u32>,
}

impl WeatherSignal {
    /// A neutral signal with no figures attached.
    pub fn neutral(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            impact: WeatherImpact::Neutral,
            label: label.into(),
            reason: reason.into(),
            delta: None,
            expected: None,
            actual: None,
            window: None,
            event_hour: None,
        }
    }

    /// The signal used when no weather reading exists.
    pub fn unavailable() -> Self {
        Self::neutral("No weather signal", "Weather data unavailable.")
    }
}

impl Default for WeatherSignal {
    fn default() -> Self {
        Self::unavailable()
    }
}

/// A discrete precipitation event detected in the hourly forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecipSignal {
    /// Demand direction (always down).
    pub impact: WeatherImpact,
    /// Short label.
    pub label: String,
    /// Affected window.
    pub window: WeatherWindow,
    /// First affected hour.
    pub event_hour: u32,
    /// Explanation.
    pub reason: String,
}

/// Staffing change a recommendation proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationAction {
    /// Add one support position.
    IncreaseSupport,
    /// Remove one support position.
    DecreaseSupport,
}

impl RecommendationAction {
    /// Wire name used in recommendation keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationAction::IncreaseSupport => "increase_support",
            RecommendationAction::DecreaseSupport => "decrease_support",
        }
    }
}

/// Day-level staffing recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffingRecommendation {
    /// Proposed action, `None` when weather is neutral.
    pub action: Option<RecommendationAction>,
    /// Signal the recommendation derives from.
    pub signal: WeatherSignal,
    /// Planner-facing message.
    pub message: String,
    /// Whether the planner can apply it now.
    pub can_apply: bool,
    /// Button text.
    pub button_label: String,
    /// `"<date>:<action>"`, empty when there is no action.
    pub key: String,
    /// Whether the day already carries this recommendation.
    #[serde(default)]
    pub already_applied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_signal_deserializes_minimal_shape() {
        let signal: WeatherSignal = serde_json::from_value(json!({"impact": "down"})).unwrap();
        assert_eq!(signal.impact, WeatherImpact::Down);
        assert!(signal.window.is_none());
    }

    #[test]
    fn test_signal_serializes_nulls() {
        let value = serde_json::to_value(WeatherSignal::unavailable()).unwrap();
        assert_eq!(value["impact"], "neutral");
        assert_eq!(value["eventHour"], json!(null));
        assert_eq!(value["label"], "No weather signal");
    }

    #[test]
    fn test_action_wire_names() {
        assert_eq!(
            serde_json::to_value(RecommendationAction::DecreaseSupport).unwrap(),
            json!(RecommendationAction::DecreaseSupport.as_str())
        );
    }
}
