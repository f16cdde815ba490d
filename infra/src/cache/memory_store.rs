//! In-memory OTP record store with per-phone-number atomic updates
//!
//! Each phone number owns a slot guarded by its own mutex, so contention is
//! scoped to a single key. The outer map lock is only held to look up, create
//! or prune slots, never while an update closure runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::debug;

use otp_core::domain::entities::otp_record::OtpRecord;
use otp_core::services::otp::{OtpStore, StoreAction};

type Slot = Arc<Mutex<Option<OtpRecord>>>;

/// Concurrent in-memory implementation of [`OtpStore`]
#[derive(Debug, Default)]
pub struct InMemoryOtpStore {
    slots: RwLock<HashMap<String, Slot>>,
}

impl InMemoryOtpStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot for a phone number, if one exists
    fn existing_slot(&self, phone: &str) -> Option<Slot> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(phone)
            .cloned()
    }

    /// Slot for a phone number, created empty when missing
    fn slot(&self, phone: &str) -> Slot {
        if let Some(slot) = self.existing_slot(phone) {
            return slot;
        }
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(phone.to_string())
            .or_default()
            .clone()
    }

    /// Drop an empty slot nobody else holds
    ///
    /// New handles to a slot are only handed out under the map lock, so with
    /// the write lock held a strong count of one means the map owns the only
    /// reference and the slot can go.
    fn release(&self, phone: &str) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let unused = slots
            .get(phone)
            .map(|slot| Arc::strong_count(slot) == 1 && lock_slot(slot).is_none())
            .unwrap_or(false);
        if unused {
            slots.remove(phone);
        }
    }
}

fn lock_slot(slot: &Slot) -> MutexGuard<'_, Option<OtpRecord>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn get(&self, phone: &str) -> Option<OtpRecord> {
        let slot = self.existing_slot(phone)?;
        let record = lock_slot(&slot).clone();
        record
    }

    async fn put(&self, phone: &str, record: OtpRecord) {
        let slot = self.slot(phone);
        *lock_slot(&slot) = Some(record);
    }

    async fn delete(&self, phone: &str) {
        if let Some(slot) = self.existing_slot(phone) {
            lock_slot(&slot).take();
            drop(slot);
            self.release(phone);
        }
    }

    async fn compare_and_update<F, R>(&self, phone: &str, update: F) -> R
    where
        F: FnOnce(Option<&OtpRecord>) -> (StoreAction, R) + Send,
        R: Send,
    {
        let slot = self.slot(phone);
        let (result, emptied) = {
            let mut current = lock_slot(&slot);
            let (action, result) = update(current.as_ref());
            match action {
                StoreAction::Keep => {}
                StoreAction::Put(record) => *current = Some(record),
                StoreAction::Delete => *current = None,
            }
            (result, current.is_none())
        };
        drop(slot);

        if emptied {
            self.release(phone);
        }
        result
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let mut purged = 0;
        slots.retain(|_, slot| {
            let mut current = lock_slot(slot);
            if current.as_ref().is_some_and(|record| record.is_expired(now)) {
                *current = None;
                purged += 1;
            }
            current.is_some() || Arc::strong_count(slot) > 1
        });
        debug!(purged = purged, remaining = slots.len(), "Swept expired OTP records");
        purged
    }

    async fn len(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| lock_slot(slot).is_some())
            .count()
    }
}
