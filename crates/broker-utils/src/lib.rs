//! Shared utilities for stock-broker
//!
//! This crate provides common functionality used across the stock-broker workspace:
//! logging setup and the engine configuration.

pub mod config;
pub mod logging;

pub use config::{ConfigError, EngineConfig};
pub use logging::init_tracing_with_filter;
