//! OTP record entity for phone-number verification.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The outstanding one-time code for a single phone number
///
/// At most one record exists per phone number. It lives only while a code is
/// outstanding and is removed on successful verification, on expiry detection
/// or once the attempt budget is spent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Identifier of this record's lineage, kept across resends (log correlation only)
    pub session_id: Uuid,

    /// The current fixed-length decimal code
    pub code: String,

    /// Timestamp of the original issuance in this lineage
    pub created_at: DateTime<Utc>,

    /// Timestamp of the most recent (re)issuance, gates resend throttling
    pub last_sent_at: DateTime<Utc>,

    /// Timestamp after which the code is no longer accepted
    pub expires_at: DateTime<Utc>,

    /// Failed verification attempts against the current code
    pub attempts: u32,
}

impl OtpRecord {
    /// Creates a fresh record for a newly generated code
    ///
    /// # Arguments
    ///
    /// * `code` - The generated code
    /// * `now` - Issuance time
    /// * `lifetime` - How long the code stays valid
    pub fn issue(code: String, now: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            code,
            created_at: now,
            last_sent_at: now,
            expires_at: now + lifetime,
            attempts: 0,
        }
    }

    /// Replaces the code in place, keeping `created_at` and the session
    ///
    /// The attempt counter is reset and both `last_sent_at` and `expires_at`
    /// advance, so a code never changes without a fresh budget.
    pub fn reissue(&mut self, code: String, now: DateTime<Utc>, lifetime: Duration) {
        self.code = code;
        self.last_sent_at = now;
        self.expires_at = now + lifetime;
        self.attempts = 0;
    }

    /// Checks if the code has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Checks if the attempt budget is spent
    pub fn is_exhausted(&self, max_attempts: u32) -> bool {
        self.attempts >= max_attempts
    }

    /// Earliest time another code may be issued for this phone number
    pub fn resend_available_at(&self, resend_delay: Duration) -> DateTime<Utc> {
        self.last_sent_at + resend_delay
    }

    /// Remaining wait before a reissue is allowed, `None` once the delay has elapsed
    pub fn resend_wait(&self, now: DateTime<Utc>, resend_delay: Duration) -> Option<Duration> {
        let available_at = self.resend_available_at(resend_delay);
        if now < available_at {
            Some(available_at - now)
        } else {
            None
        }
    }

    /// Compares a candidate against the stored code in constant time
    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.code.as_bytes(), candidate.as_bytes())
    }

    /// Counts one failed attempt and returns the new total
    pub fn record_failed_attempt(&mut self) -> u32 {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts
    }

    /// Gets the number of remaining verification attempts (0 if exceeded)
    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempts)
    }

    /// Gets the time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn lifetime() -> Duration {
        Duration::minutes(5)
    }

    #[test]
    fn test_issue_sets_timestamps() {
        let record = OtpRecord::issue("0427".to_string(), at(0), lifetime());

        assert_eq!(record.code, "0427");
        assert_eq!(record.created_at, at(0));
        assert_eq!(record.last_sent_at, at(0));
        assert_eq!(record.expires_at, at(300));
        assert_eq!(record.attempts, 0);
        assert!(record.created_at <= record.last_sent_at);
        assert!(record.last_sent_at < record.expires_at);
    }

    #[test]
    fn test_reissue_resets_attempts_and_keeps_lineage() {
        let mut record = OtpRecord::issue("1111".to_string(), at(0), lifetime());
        let session_id = record.session_id;
        record.record_failed_attempt();
        record.record_failed_attempt();

        record.reissue("2222".to_string(), at(90), lifetime());

        assert_eq!(record.code, "2222");
        assert_eq!(record.attempts, 0);
        assert_eq!(record.created_at, at(0));
        assert_eq!(record.last_sent_at, at(90));
        assert_eq!(record.expires_at, at(390));
        assert_eq!(record.session_id, session_id);
    }

    #[test]
    fn test_expiry_boundary() {
        let record = OtpRecord::issue("1234".to_string(), at(0), lifetime());

        assert!(!record.is_expired(at(299)));
        // Exactly at expires_at the code is still accepted
        assert!(!record.is_expired(at(300)));
        assert!(record.is_expired(at(301)));
    }

    #[test]
    fn test_resend_wait() {
        let record = OtpRecord::issue("1234".to_string(), at(0), lifetime());
        let delay = Duration::seconds(60);

        assert_eq!(record.resend_wait(at(0), delay), Some(Duration::seconds(60)));
        assert_eq!(record.resend_wait(at(45), delay), Some(Duration::seconds(15)));
        assert_eq!(record.resend_wait(at(60), delay), None);
        assert_eq!(record.resend_wait(at(61), delay), None);
        assert_eq!(record.resend_available_at(delay), at(60));
    }

    #[test]
    fn test_matches() {
        let record = OtpRecord::issue("0042".to_string(), at(0), lifetime());

        assert!(record.matches("0042"));
        assert!(!record.matches("42"));
        assert!(!record.matches("0043"));
        assert!(!record.matches(""));
    }

    #[test]
    fn test_attempt_budget() {
        let mut record = OtpRecord::issue("1234".to_string(), at(0), lifetime());

        assert_eq!(record.remaining_attempts(3), 3);
        assert_eq!(record.record_failed_attempt(), 1);
        assert_eq!(record.remaining_attempts(3), 2);
        assert!(!record.is_exhausted(3));

        record.record_failed_attempt();
        record.record_failed_attempt();
        assert!(record.is_exhausted(3));
        assert_eq!(record.remaining_attempts(3), 0);
    }

    #[test]
    fn test_time_until_expiration() {
        let record = OtpRecord::issue("1234".to_string(), at(0), lifetime());

        assert_eq!(record.time_until_expiration(at(100)), Duration::seconds(200));
        assert_eq!(record.time_until_expiration(at(400)), Duration::zero());
    }

    #[test]
    fn test_serialization() {
        let record = OtpRecord::issue("9876".to_string(), at(0), lifetime());

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: OtpRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }
}
