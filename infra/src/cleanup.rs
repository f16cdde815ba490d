//! Background sweep of expired OTP records
//!
//! `verify` purges an expired record when it sees one, but a caller who never
//! comes back would leave the record behind. This task drops those.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use otp_core::services::otp::{Clock, CodeGenerator, OtpService, OtpStore};

/// Periodic purge of expired records through the OTP service
pub struct OtpCleanupTask<S: OtpStore, C: Clock, G: CodeGenerator> {
    service: Arc<OtpService<S, C, G>>,
    interval_seconds: u64,
}

impl<S, C, G> OtpCleanupTask<S, C, G>
where
    S: OtpStore + 'static,
    C: Clock + 'static,
    G: CodeGenerator + 'static,
{
    /// Create a new cleanup task; an interval of 0 disables it
    pub fn new(service: Arc<OtpService<S, C, G>>, interval_seconds: u64) -> Self {
        Self {
            service,
            interval_seconds,
        }
    }

    /// Run a single sweep, returning the number of records removed
    pub async fn run_once(&self) -> usize {
        self.service.purge_expired().await
    }

    /// Start the sweep as a background task
    ///
    /// Returns `None` when the task is disabled. Must be called from within a
    /// tokio runtime.
    pub fn start_background_task(self) -> Option<JoinHandle<()>> {
        if self.interval_seconds == 0 {
            warn!("OTP cleanup task is disabled");
            return None;
        }

        let interval = Duration::from_secs(self.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = self.interval_seconds,
                "OTP cleanup task started"
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;
                self.run_once().await;
            }
        }))
    }
}
