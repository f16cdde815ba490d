//! Types for OTP service results

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Result of issuing (or reissuing) a code
///
/// Delivery of `code` to the phone number is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    /// Phone number the code is bound to
    pub phone: String,
    /// The code to deliver
    pub code: String,
    /// Session the code belongs to
    pub session_id: Uuid,
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
    /// When the caller can request another code
    pub next_resend_at: DateTime<Utc>,
}

/// Result of a successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCode {
    /// Phone number that was confirmed
    pub phone: String,
    /// Session the consumed code belonged to
    pub session_id: Uuid,
    /// When the verification happened
    pub verified_at: DateTime<Utc>,
}

/// Read-only view of an outstanding code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpStatus {
    /// Wrong guesses still tolerated
    pub remaining_attempts: u32,
    /// Seconds until the code expires
    pub expires_in_seconds: i64,
    /// Seconds until a resend is allowed (0 if allowed now)
    pub resend_available_in_seconds: i64,
}
