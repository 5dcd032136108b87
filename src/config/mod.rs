//! Configuration loading and management for the Scheduling Engine.
//!
//! This module provides the tenant settings with their documented defaults,
//! the shallow override patch, and loading of settings and trigger catalogs
//! from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use scheduling_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Weather threshold: {}F", config.settings().weather_threshold_f);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    EngineConfig, EveningWindow, MondayScenarios, PayRates, RoleKeyword, RoleTaxonomy,
    SeasonHours, TargetProfileSettings, TenantSettings, TenantSettingsPatch, WorkflowSettings,
    builtin_target_profiles, builtin_trigger_rules,
};
