//! Scheduling Engine for multi-location scoop shops
//!
//! This crate computes location economics, validates and adjusts staffing
//! schedules, derives weather-driven demand signals, assesses overstaffing
//! after the fact, and times seasonal staffing transitions. Every
//! computation is a pure function over caller-supplied inputs; the `api`
//! module serves them over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
