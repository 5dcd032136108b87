//! Application state for the Scheduling Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{ConfigLoader, TenantSettings, TenantSettingsPatch};
use crate::error::EngineResult;

/// Shared application state.
///
/// Holds the loaded configuration behind an `Arc`; handlers only read it.
#[derive(Clone)]
pub struct AppState {
    /// The loaded engine configuration.
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Settings for one request: the loaded settings with `patch` merged
    /// over them.
    ///
    /// # Returns
    ///
    /// Returns `InvalidSettings` when the merged settings are unusable.
    pub fn resolve_settings(&self, patch: Option<&TenantSettingsPatch>) -> EngineResult<TenantSettings> {
        let settings = match patch {
            Some(patch) => self.config.settings().merged(patch),
            None => self.config.settings().clone(),
        };
        settings.validate()?;
        Ok(settings)
    }
}
