//! Main OTP service implementation

use chrono::{DateTime, Utc};
use std::sync::Arc;

use otp_shared::utils::phone::mask_phone_number;

use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::{OtpError, OtpResult};

use super::config::OtpServiceConfig;
use super::traits::{Clock, CodeGenerator, OtpStore, StoreAction};
use super::types::{IssuedCode, OtpStatus, VerifiedCode};

/// OTP lifecycle service: issues, resends and verifies codes per phone number
///
/// Every operation reads the clock and draws its code once up front, then runs
/// its read-check-mutate sequence inside a single `compare_and_update` call so
/// that racing requests for the same phone number cannot lose updates.
pub struct OtpService<S: OtpStore, C: Clock, G: CodeGenerator> {
    /// Record store
    store: Arc<S>,
    /// Time source
    clock: Arc<C>,
    /// Code source
    generator: Arc<G>,
    /// Service configuration
    config: OtpServiceConfig,
}

impl<S: OtpStore, C: Clock, G: CodeGenerator> OtpService<S, C, G> {
    /// Create a new OTP service
    ///
    /// # Arguments
    ///
    /// * `store` - Record store implementation
    /// * `clock` - Time source
    /// * `generator` - Code generator
    /// * `config` - Service configuration
    pub fn new(
        store: Arc<S>,
        clock: Arc<C>,
        generator: Arc<G>,
        config: OtpServiceConfig,
    ) -> Self {
        Self {
            store,
            clock,
            generator,
            config,
        }
    }

    /// Get the service configuration
    pub fn config(&self) -> &OtpServiceConfig {
        &self.config
    }

    /// Issue a code for a phone number
    ///
    /// Legal when no live record exists or when the resend delay since the last
    /// issuance has elapsed; a fresh record (new session, zero attempts) then
    /// replaces any previous one. Otherwise the existing record is left exactly
    /// as it was.
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedCode)` - The code to deliver and its expiry
    /// * `Err(OtpError::Throttled)` - A code was issued too recently
    pub async fn generate(&self, phone: &str) -> OtpResult<IssuedCode> {
        let now = self.clock.now();
        let code = self.generator.generate(self.config.code_length);
        let config = &self.config;

        let result = self
            .store
            .compare_and_update(phone, |current| match current {
                Some(record) if !record.is_expired(now) => {
                    match record.resend_wait(now, config.resend_delay) {
                        Some(wait) => (StoreAction::Keep, Err(OtpError::throttled(wait))),
                        None => issue_fresh(phone, code, now, config),
                    }
                }
                _ => issue_fresh(phone, code, now, config),
            })
            .await;

        match &result {
            Ok(issued) => tracing::info!(
                phone = %mask_phone_number(phone),
                session_id = %issued.session_id,
                expires_at = %issued.expires_at,
                event = "otp_generated",
                "Generated new OTP for phone number"
            ),
            Err(e) => log_failure("generate", phone, e),
        }

        result
    }

    /// Replace the outstanding code with a new one
    ///
    /// Keeps the record's `created_at` and session, resets the attempt budget
    /// and restarts the expiry window.
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedCode)` - The new code to deliver
    /// * `Err(OtpError::NotFound)` - Nothing to resend
    /// * `Err(OtpError::Throttled)` - The resend delay has not elapsed
    pub async fn resend(&self, phone: &str) -> OtpResult<IssuedCode> {
        let now = self.clock.now();
        let code = self.generator.generate(self.config.code_length);
        let config = &self.config;

        let result = self
            .store
            .compare_and_update(phone, |current| {
                let Some(record) = current else {
                    return (StoreAction::Keep, Err(OtpError::NotFound));
                };
                if let Some(wait) = record.resend_wait(now, config.resend_delay) {
                    return (StoreAction::Keep, Err(OtpError::throttled(wait)));
                }

                let mut record = record.clone();
                record.reissue(code, now, config.expiry);
                let issued = issued_code(phone, &record, config);
                (StoreAction::Put(record), Ok(issued))
            })
            .await;

        match &result {
            Ok(issued) => tracing::info!(
                phone = %mask_phone_number(phone),
                session_id = %issued.session_id,
                expires_at = %issued.expires_at,
                event = "otp_resent",
                "Resent OTP for phone number"
            ),
            Err(e) => log_failure("resend", phone, e),
        }

        result
    }

    /// Verify a candidate code
    ///
    /// Checks run in order: presence, expiry, spent budget, match. An expired
    /// or exhausted record is deleted on detection and a matching code is
    /// consumed. A wrong code costs one attempt; the attempt that spends the
    /// budget deletes the record and reports `Exhausted`.
    ///
    /// # Returns
    ///
    /// * `Ok(VerifiedCode)` - The code matched and has been consumed
    /// * `Err(OtpError)` - `NotFound`, `Expired`, `Exhausted` or `Mismatch`
    pub async fn verify(&self, phone: &str, candidate: &str) -> OtpResult<VerifiedCode> {
        let now = self.clock.now();
        let max_attempts = self.config.max_attempts;

        let result = self
            .store
            .compare_and_update(phone, |current| {
                let Some(record) = current else {
                    return (StoreAction::Keep, Err(OtpError::NotFound));
                };
                if record.is_expired(now) {
                    return (StoreAction::Delete, Err(OtpError::Expired));
                }
                if record.is_exhausted(max_attempts) {
                    return (StoreAction::Delete, Err(OtpError::Exhausted));
                }
                if record.matches(candidate) {
                    let verified = VerifiedCode {
                        phone: phone.to_string(),
                        session_id: record.session_id,
                        verified_at: now,
                    };
                    return (StoreAction::Delete, Ok(verified));
                }

                let mut record = record.clone();
                record.record_failed_attempt();
                if record.is_exhausted(max_attempts) {
                    (StoreAction::Delete, Err(OtpError::Exhausted))
                } else {
                    let remaining_attempts = record.remaining_attempts(max_attempts);
                    (
                        StoreAction::Put(record),
                        Err(OtpError::Mismatch { remaining_attempts }),
                    )
                }
            })
            .await;

        match &result {
            Ok(verified) => tracing::info!(
                phone = %mask_phone_number(phone),
                session_id = %verified.session_id,
                event = "otp_verified_success",
                "OTP successfully verified"
            ),
            Err(e) => log_failure("verify", phone, e),
        }

        result
    }

    /// Inspect the outstanding code without mutating it
    ///
    /// Returns `None` when there is no record or the record is no longer usable
    /// (expired or exhausted); cleanup of such records is left to `verify` and
    /// `purge_expired`.
    pub async fn status(&self, phone: &str) -> Option<OtpStatus> {
        let now = self.clock.now();
        let record = self.store.get(phone).await?;
        if record.is_expired(now) || record.is_exhausted(self.config.max_attempts) {
            return None;
        }

        let resend_wait = record
            .resend_wait(now, self.config.resend_delay)
            .map(ceil_seconds)
            .unwrap_or(0);

        Some(OtpStatus {
            remaining_attempts: record.remaining_attempts(self.config.max_attempts),
            expires_in_seconds: ceil_seconds(record.time_until_expiration(now)),
            resend_available_in_seconds: resend_wait,
        })
    }

    /// Drop every record whose code expired without being verified
    ///
    /// # Returns
    ///
    /// The number of records removed
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let purged = self.store.purge_expired(now).await;
        if purged > 0 {
            tracing::info!(
                purged = purged,
                event = "otp_purged",
                "Purged expired OTP records"
            );
        }
        purged
    }
}

fn issue_fresh(
    phone: &str,
    code: String,
    now: DateTime<Utc>,
    config: &OtpServiceConfig,
) -> (StoreAction, OtpResult<IssuedCode>) {
    let record = OtpRecord::issue(code, now, config.expiry);
    let issued = issued_code(phone, &record, config);
    (StoreAction::Put(record), Ok(issued))
}

fn issued_code(phone: &str, record: &OtpRecord, config: &OtpServiceConfig) -> IssuedCode {
    IssuedCode {
        phone: phone.to_string(),
        code: record.code.clone(),
        session_id: record.session_id,
        expires_at: record.expires_at,
        next_resend_at: record.resend_available_at(config.resend_delay),
    }
}

fn ceil_seconds(duration: chrono::Duration) -> i64 {
    (duration.num_milliseconds().max(0) + 999) / 1000
}

fn log_failure(operation: &str, phone: &str, error: &OtpError) {
    let phone = mask_phone_number(phone);
    match error {
        OtpError::NotFound => tracing::warn!(
            phone = %phone,
            operation = operation,
            event = "otp_not_found",
            "No active OTP for phone number"
        ),
        OtpError::Throttled { retry_after_seconds } => tracing::warn!(
            phone = %phone,
            operation = operation,
            retry_after_seconds = *retry_after_seconds,
            event = "otp_throttled",
            "OTP issuance throttled"
        ),
        OtpError::Expired => tracing::warn!(
            phone = %phone,
            event = "otp_expired",
            "OTP expired, record purged"
        ),
        OtpError::Exhausted => tracing::error!(
            phone = %phone,
            event = "otp_exhausted",
            "Maximum verification attempts exceeded, record purged"
        ),
        OtpError::Mismatch { remaining_attempts } => tracing::warn!(
            phone = %phone,
            remaining_attempts = *remaining_attempts,
            event = "otp_verification_failed",
            "OTP verification failed"
        ),
    }
}
