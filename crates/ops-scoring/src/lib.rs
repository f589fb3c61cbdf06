//! Weighted criteria scoring and KPI aggregation for disruption recovery.
//!
//! The core (`scoring`, `analytics`) is pure and synchronous. `settings` and
//! `service` embed it for a host that persists weights and serves them over
//! HTTP.

pub mod analytics;
pub mod config;
pub mod error;
pub mod scoring;
pub mod service;
pub mod settings;
pub mod telemetry;
