//! Configuration for the OTP service

use chrono::Duration;
use otp_shared::config::otp::{
    OtpConfig, DEFAULT_CODE_LENGTH, DEFAULT_EXPIRY_SECONDS, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_RESEND_DELAY_SECONDS, MAX_EXPIRY_SECONDS, MAX_RESEND_DELAY_SECONDS,
};

/// Configuration for the OTP service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpServiceConfig {
    /// How long a (re)issued code stays valid
    pub expiry: Duration,
    /// Minimum time between two issuances for the same phone number
    pub resend_delay: Duration,
    /// Wrong guesses tolerated before the code is invalidated
    pub max_attempts: u32,
    /// Number of decimal digits in a code
    pub code_length: usize,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            expiry: Duration::seconds(DEFAULT_EXPIRY_SECONDS),
            resend_delay: Duration::seconds(DEFAULT_RESEND_DELAY_SECONDS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            code_length: DEFAULT_CODE_LENGTH,
        }
    }
}

/// Durations are clamped to the ranges `OtpConfig::validate` accepts.
impl From<&OtpConfig> for OtpServiceConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            expiry: Duration::seconds(config.expiry_seconds.clamp(1, MAX_EXPIRY_SECONDS)),
            resend_delay: Duration::seconds(
                config.resend_delay_seconds.clamp(0, MAX_RESEND_DELAY_SECONDS),
            ),
            max_attempts: config.max_attempts,
            code_length: config.code_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_otp_config() {
        let config = OtpConfig {
            expiry_seconds: 120,
            resend_delay_seconds: 30,
            max_attempts: 5,
            code_length: 6,
            ..OtpConfig::default()
        };

        let service_config = OtpServiceConfig::from(&config);
        assert_eq!(service_config.expiry, Duration::seconds(120));
        assert_eq!(service_config.resend_delay, Duration::seconds(30));
        assert_eq!(service_config.max_attempts, 5);
        assert_eq!(service_config.code_length, 6);
    }

    #[test]
    fn test_from_oversized_config_is_clamped() {
        let config = OtpConfig {
            expiry_seconds: i64::MAX,
            resend_delay_seconds: i64::MAX,
            ..OtpConfig::default()
        };

        let service_config = OtpServiceConfig::from(&config);
        assert_eq!(service_config.expiry, Duration::seconds(MAX_EXPIRY_SECONDS));
        assert_eq!(
            service_config.resend_delay,
            Duration::seconds(MAX_RESEND_DELAY_SECONDS)
        );
    }
}
