//! Domain-specific error types for the OTP lifecycle.
//!
//! Every variant is a caller-recoverable condition, never a system fault.
//! The service surfaces them verbatim and never retries internally.

use chrono::Duration;
use thiserror::Error;

/// Typed failures of the generate, resend and verify operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    /// No active code for this phone number
    #[error("OTP not found. Please generate an OTP first")]
    NotFound,

    /// A code was issued too recently for another one to be sent
    #[error("Please wait {retry_after_seconds} seconds before requesting a new OTP")]
    Throttled { retry_after_seconds: i64 },

    /// The code expired; the record has been purged
    #[error("OTP expired, please generate a new OTP")]
    Expired,

    /// The attempt budget is spent; the record has been purged
    #[error("Too many failed attempts, please generate a new OTP")]
    Exhausted,

    /// Wrong code; the record survives with fewer attempts left
    #[error("Invalid OTP. {remaining_attempts} attempt(s) left")]
    Mismatch { remaining_attempts: u32 },
}

impl OtpError {
    /// Build a throttle failure from the remaining wait, rounded up to whole seconds
    pub fn throttled(wait: Duration) -> Self {
        let millis = wait.num_milliseconds().max(0);
        OtpError::Throttled {
            retry_after_seconds: (millis + 999) / 1000,
        }
    }

    /// HTTP status hint for the transport layer
    pub fn status_code(&self) -> u16 {
        match self {
            OtpError::NotFound => 404,
            OtpError::Throttled { .. } => 429,
            OtpError::Expired => 400,
            OtpError::Exhausted => 403,
            OtpError::Mismatch { .. } => 400,
        }
    }

    /// Stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            OtpError::NotFound => "OTP_NOT_FOUND",
            OtpError::Throttled { .. } => "OTP_THROTTLED",
            OtpError::Expired => "OTP_EXPIRED",
            OtpError::Exhausted => "OTP_EXHAUSTED",
            OtpError::Mismatch { .. } => "OTP_MISMATCH",
        }
    }

    /// Whether no record remains for the phone number after this failure
    ///
    /// The caller has to generate a new code to continue.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OtpError::NotFound | OtpError::Expired | OtpError::Exhausted
        )
    }
}

pub type OtpResult<T> = Result<T, OtpError>;
