//! Shared configuration and utilities for the phone OTP server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types (OTP lifecycle limits, environment, logging)
//! - Utility functions (phone masking for logs)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{AppConfig, ConfigError, Environment, LogFormat, LoggingConfig, OtpConfig};
pub use utils::phone;
