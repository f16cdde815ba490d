//! # Infrastructure Layer
//!
//! This crate provides the concrete implementations the OTP core runs on.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Cache**: the process-local OTP record store with per-phone-number atomic updates
//! - **Config**: layered configuration loading (defaults, TOML files, environment)
//! - **Telemetry**: `tracing` subscriber setup
//! - **Cleanup**: background sweep of abandoned expired records
//!
//! `initialize` wires everything into a ready-to-use [`OtpSystem`].

use std::sync::Arc;

use otp_core::services::otp::{OtpService, OtpServiceConfig, SecureCodeGenerator, SystemClock};
use otp_shared::config::{AppConfig, OtpConfig};

// Re-export core types for convenience
pub use otp_core::errors::*;

/// Cache module - in-memory OTP record store
pub mod cache;

/// Cleanup module - periodic purge of expired records
pub mod cleanup;

/// Configuration module - layered config loading
pub mod config;

/// Telemetry module - tracing subscriber setup
pub mod telemetry;

pub use cache::InMemoryOtpStore;
pub use cleanup::OtpCleanupTask;

/// The production OTP service: in-memory store, system clock, OS CSPRNG codes
pub type OtpSystem = OtpService<InMemoryOtpStore, SystemClock, SecureCodeGenerator>;

/// Build the production service over a fresh in-memory store
pub fn build_service(config: &OtpConfig) -> Result<OtpSystem, InfrastructureError> {
    config.validate()?;

    Ok(OtpService::new(
        Arc::new(InMemoryOtpStore::new()),
        Arc::new(SystemClock),
        Arc::new(SecureCodeGenerator),
        OtpServiceConfig::from(config),
    ))
}

/// Initialize infrastructure services
///
/// This function:
/// - Loads configuration (`.env`, TOML files, environment variables)
/// - Installs the tracing subscriber
/// - Builds the OTP service and starts the expired-record sweep
///
/// Must be called from within a tokio runtime.
pub async fn initialize() -> Result<(Arc<OtpSystem>, AppConfig), InfrastructureError> {
    let config = config::load_config()?;
    telemetry::init_tracing(&config.logging)?;

    tracing::info!(
        environment = %config.environment,
        "Initializing OTP infrastructure services..."
    );

    let service = Arc::new(build_service(&config.otp)?);
    OtpCleanupTask::new(service.clone(), config.otp.purge_interval_seconds)
        .start_background_task();

    tracing::info!("OTP infrastructure services initialized successfully");

    Ok((service, config))
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Configuration source could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Configuration loaded but holds unusable values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] otp_shared::ConfigError),

    /// Tracing subscriber could not be set up
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}
