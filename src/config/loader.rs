//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tenant settings
//! and trigger catalogs from YAML files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::calculation::build_trigger_rules_for_profile;
use crate::error::{EngineError, EngineResult};
use crate::models::{LocationTriggerRules, TargetProfile};

use super::types::{EngineConfig, TenantSettings};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── settings.yaml         # Tenant settings (missing keys use defaults)
/// ├── target_profiles.yaml  # Named threshold profiles
/// └── trigger_rules.yaml    # Default trigger rules per location
/// ```
///
/// # Example
///
/// ```no_run
/// use scheduling_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Labor target: {}%", loader.settings().target_profile.labor_target_pct);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/default")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The settings hold values outside their valid domain
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<TenantSettings>(&path.join("settings.yaml"))?;
        settings.validate()?;

        let target_profiles =
            Self::load_yaml::<BTreeMap<String, TargetProfile>>(&path.join("target_profiles.yaml"))?;

        let trigger_defaults = Self::load_yaml::<BTreeMap<String, LocationTriggerRules>>(
            &path.join("trigger_rules.yaml"),
        )?;

        info!(
            path = %path.display(),
            profiles = target_profiles.len(),
            locations = trigger_defaults.len(),
            "Loaded engine configuration"
        );

        Ok(Self {
            config: EngineConfig::new(settings, target_profiles, trigger_defaults),
        })
    }

    /// Creates a loader around an already-built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;
        debug!(path = %path_str, bytes = content.len(), "Read configuration file");

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the full configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the tenant settings.
    pub fn settings(&self) -> &TenantSettings {
        self.config.settings()
    }

    /// Resolves the trigger rules for a location under a target profile.
    ///
    /// Unknown profile keys fall back to `balanced`; with no profile the
    /// location's defaults are returned unchanged.
    ///
    /// # Returns
    ///
    /// Returns `None` when the location has no default rules.
    pub fn trigger_rules_for(
        &self,
        location: &str,
        profile_key: Option<&str>,
    ) -> Option<LocationTriggerRules> {
        let defaults = self.config.trigger_defaults();
        match profile_key {
            None => defaults.get(location).cloned(),
            Some(key) => build_trigger_rules_for_profile(
                key,
                defaults,
                self.config.target_profiles(),
                &[location.to_string()],
            )
            .remove(location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransitionKey;

    fn config_path() -> &'static str {
        "./config/default"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.settings().gp_margin_factor, 0.72);
        assert_eq!(loader.settings().workflow.min_closers, 2);
        assert!(loader.config().target_profiles().contains_key("balanced"));
        assert!(loader.config().trigger_defaults().contains_key("EP"));
    }

    #[test]
    fn test_loaded_configuration_matches_builtin_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let builtin = ConfigLoader::default();
        assert_eq!(loader.config(), builtin.config());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("settings.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_trigger_rules_for_location_defaults() {
        let loader = ConfigLoader::default();
        let rules = loader.trigger_rules_for("NL", None).unwrap();
        assert_eq!(rules.rule(TransitionKey::UpSummer).conditions[0].threshold, 3200.0);
        assert!(loader.trigger_rules_for("ZZ", None).is_none());
    }

    #[test]
    fn test_trigger_rules_for_profile_scales_thresholds() {
        let loader = ConfigLoader::default();
        let rules = loader.trigger_rules_for("EP", Some("conservative")).unwrap();
        let spring = rules.rule(TransitionKey::UpSpring);
        assert!((spring.conditions[0].threshold - 3450.0 * 1.08).abs() < 1e-9);
        assert_eq!(spring.conditions[1].threshold, 70.0);
    }
}
