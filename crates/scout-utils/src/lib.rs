//! Shared utilities for signal-scout
//!
//! This crate provides common functionality used across the signal-scout workspace,
//! including logging setup, configuration file loading, and `${VAR}` interpolation.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{load_json_file, resolve_env_string, resolve_env_value};
pub use error::{Result, UtilsError};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
