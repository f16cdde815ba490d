//! Configuration module with business-specific sub-modules
//!
//! - `environment` - Environment detection and logging configuration
//! - `otp` - OTP lifecycle limits (expiry, resend delay, attempt budget, code length)

pub mod environment;
pub mod otp;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::{ConfigError, OtpConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// OTP lifecycle configuration
    #[serde(default)]
    pub otp: OtpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Create configuration with environment-appropriate logging defaults
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            otp: OtpConfig::default(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Validate all sub-configurations
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.otp.validate()
    }
}
