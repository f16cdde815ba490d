//! Traits for the collaborators the OTP service is built on

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::otp_record::OtpRecord;

/// What an atomic update commits for its key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    /// Leave the current state (record or absence) untouched
    Keep,
    /// Store this record, replacing any existing one
    Put(OtpRecord),
    /// Remove the record if present
    Delete,
}

/// Keyed container holding zero or one OTP record per phone number
///
/// A missing key is a valid "absent" result, not a failure, so none of the
/// operations can fail.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Get the record for a phone number
    async fn get(&self, phone: &str) -> Option<OtpRecord>;

    /// Store a record, replacing any existing one for that phone number
    async fn put(&self, phone: &str, record: OtpRecord);

    /// Remove the record if present; no-op if absent
    async fn delete(&self, phone: &str);

    /// Atomically read the current record, apply `update` and commit its action
    ///
    /// No other mutation of the same phone number may interleave between the
    /// read and the commit. `update` must be pure and non-blocking; its second
    /// return value is handed back to the caller.
    async fn compare_and_update<F, R>(&self, phone: &str, update: F) -> R
    where
        F: FnOnce(Option<&OtpRecord>) -> (StoreAction, R) + Send,
        R: Send;

    /// Remove every record that has expired at `now`, returning how many were dropped
    async fn purge_expired(&self, now: DateTime<Utc>) -> usize;

    /// Number of records currently held
    async fn len(&self) -> usize;

    /// Whether the store holds no records
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Source of the current wall-clock time
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Source of fresh codes
pub trait CodeGenerator: Send + Sync {
    /// Produce a decimal code of exactly `length` digits, leading zeros included
    fn generate(&self, length: usize) -> String;
}
