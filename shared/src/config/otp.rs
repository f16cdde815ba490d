//! OTP lifecycle configuration module
//!
//! Limits governing how long a code lives, how often it may be reissued and
//! how many wrong guesses are tolerated. Fixed at process start.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default code lifetime in seconds (5 minutes)
pub const DEFAULT_EXPIRY_SECONDS: i64 = 300;

/// Default minimum seconds between two issuances for the same phone number
pub const DEFAULT_RESEND_DELAY_SECONDS: i64 = 60;

/// Default number of wrong guesses before a code is invalidated
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default number of decimal digits in a code
pub const DEFAULT_CODE_LENGTH: usize = 4;

/// Default seconds between sweeps of expired records (0 disables the sweep)
pub const DEFAULT_PURGE_INTERVAL_SECONDS: u64 = 60;

/// Longest code the generator is allowed to produce
pub const MAX_CODE_LENGTH: usize = 12;

/// Longest accepted code lifetime in seconds (1 day)
pub const MAX_EXPIRY_SECONDS: i64 = 86_400;

/// Longest accepted resend delay in seconds (1 day)
pub const MAX_RESEND_DELAY_SECONDS: i64 = 86_400;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// OTP lifecycle configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Seconds after (re)issuance before a code stops being accepted
    #[serde(default = "default_expiry_seconds")]
    pub expiry_seconds: i64,

    /// Minimum seconds between successive issuances for one phone number
    #[serde(default = "default_resend_delay_seconds")]
    pub resend_delay_seconds: i64,

    /// Wrong guesses tolerated before the code is invalidated
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Number of decimal digits in a generated code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Seconds between background sweeps of abandoned expired records (0 disables)
    #[serde(default = "default_purge_interval_seconds")]
    pub purge_interval_seconds: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            expiry_seconds: DEFAULT_EXPIRY_SECONDS,
            resend_delay_seconds: DEFAULT_RESEND_DELAY_SECONDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            code_length: DEFAULT_CODE_LENGTH,
            purge_interval_seconds: DEFAULT_PURGE_INTERVAL_SECONDS,
        }
    }
}

impl OtpConfig {
    /// Check that every limit is usable by the lifecycle service
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_EXPIRY_SECONDS).contains(&self.expiry_seconds) {
            return Err(ConfigError::invalid(
                "expiry_seconds",
                format!("must be between 1 and {}", MAX_EXPIRY_SECONDS),
            ));
        }
        if !(0..=MAX_RESEND_DELAY_SECONDS).contains(&self.resend_delay_seconds) {
            return Err(ConfigError::invalid(
                "resend_delay_seconds",
                format!("must be between 0 and {}", MAX_RESEND_DELAY_SECONDS),
            ));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::invalid("max_attempts", "must be at least 1"));
        }
        if self.code_length == 0 || self.code_length > MAX_CODE_LENGTH {
            return Err(ConfigError::invalid(
                "code_length",
                format!("must be between 1 and {}", MAX_CODE_LENGTH),
            ));
        }
        Ok(())
    }
}

fn default_expiry_seconds() -> i64 {
    DEFAULT_EXPIRY_SECONDS
}

fn default_resend_delay_seconds() -> i64 {
    DEFAULT_RESEND_DELAY_SECONDS
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_code_length() -> usize {
    DEFAULT_CODE_LENGTH
}

fn default_purge_interval_seconds() -> u64 {
    DEFAULT_PURGE_INTERVAL_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OtpConfig::default();
        assert_eq!(config.expiry_seconds, 300);
        assert_eq!(config.resend_delay_seconds, 60);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.code_length, 4);
        assert_eq!(config.purge_interval_seconds, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_limits() {
        let zero_expiry = OtpConfig { expiry_seconds: 0, ..Default::default() };
        assert!(matches!(
            zero_expiry.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "expiry_seconds"
        ));

        let negative_delay = OtpConfig { resend_delay_seconds: -1, ..Default::default() };
        assert!(negative_delay.validate().is_err());

        let no_attempts = OtpConfig { max_attempts: 0, ..Default::default() };
        assert!(no_attempts.validate().is_err());

        let long_code = OtpConfig { code_length: MAX_CODE_LENGTH + 1, ..Default::default() };
        assert!(long_code.validate().is_err());

        let no_delay = OtpConfig { resend_delay_seconds: 0, ..Default::default() };
        assert!(no_delay.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_durations() {
        let huge_expiry = OtpConfig {
            expiry_seconds: 10_000_000_000_000,
            ..Default::default()
        };
        assert!(matches!(
            huge_expiry.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "expiry_seconds"
        ));

        let huge_delay = OtpConfig {
            resend_delay_seconds: MAX_RESEND_DELAY_SECONDS + 1,
            ..Default::default()
        };
        assert!(matches!(
            huge_delay.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "resend_delay_seconds"
        ));

        let longest = OtpConfig {
            expiry_seconds: MAX_EXPIRY_SECONDS,
            resend_delay_seconds: MAX_RESEND_DELAY_SECONDS,
            ..Default::default()
        };
        assert!(longest.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: OtpConfig = serde_json::from_str(r#"{"max_attempts": 5}"#).unwrap();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.expiry_seconds, DEFAULT_EXPIRY_SECONDS);
        assert_eq!(config.code_length, DEFAULT_CODE_LENGTH);
    }
}
