//! Daily session reset.
//!
//! Sleeps until the next local midnight, clears the session store, and
//! repeats. The delay is recomputed from the wall clock every cycle, so a
//! late wake does not shift later resets, and a midnight that passed while
//! the process was down is simply skipped.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::clock::SystemClock;
use super::traits::Clock;
use crate::sessions::SessionStore;

/// Time zone whose midnight triggers the reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetZone {
    /// The host's local zone.
    Local,
    Named(Tz),
}

impl ResetZone {
    /// Parse an optional IANA zone name; `None` or blank means host-local.
    pub fn parse(name: Option<&str>) -> Result<Self> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => Ok(Self::Local),
            Some(name) => {
                let tz: Tz = name
                    .parse()
                    .map_err(|e| anyhow::anyhow!("{e}"))
                    .with_context(|| format!("unknown time zone: {name}"))?;
                Ok(Self::Named(tz))
            }
        }
    }

    pub fn next_midnight(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Local => next_midnight(&now.with_timezone(&Local)).with_timezone(&Utc),
            Self::Named(tz) => next_midnight(&now.with_timezone(tz)).with_timezone(&Utc),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Local => "local".to_string(),
            Self::Named(tz) => tz.name().to_string(),
        }
    }
}

/// Start of the calendar day after `now`, in `now`'s zone.
///
/// When DST removes local midnight, the first whole hour that exists that day
/// is used; when midnight occurs twice, the earlier one.
pub fn next_midnight<Z: TimeZone>(now: &DateTime<Z>) -> DateTime<Z> {
    let zone = now.timezone();
    let fallback = now.clone() + chrono::Duration::hours(24);
    let Some(tomorrow) = now.date_naive().succ_opt() else {
        return fallback;
    };

    (0..24)
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .find_map(|time| zone.from_local_datetime(&tomorrow.and_time(time)).earliest())
        .unwrap_or(fallback)
}

/// How long to sleep from `now` until the next reset.
pub fn delay_until_next_midnight(now: DateTime<Utc>, zone: ResetZone) -> Duration {
    (zone.next_midnight(now) - now)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// Clears every session once per day at midnight.
pub struct ResetScheduler {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    zone: ResetZone,
}

impl ResetScheduler {
    pub fn new(store: Arc<dyn SessionStore>, zone: ResetZone) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            zone,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn zone(&self) -> ResetZone {
        self.zone
    }

    pub fn next_reset(&self) -> DateTime<Utc> {
        self.zone.next_midnight(self.clock.now())
    }

    /// Wipe the store now. Returns how many sessions were dropped.
    pub fn reset_now(&self) -> usize {
        self.store.clear()
    }

    /// Run the reset loop on the tokio runtime until the handle is shut down.
    pub fn spawn(self) -> ResetHandle {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(self.run(cancel.clone()));
        ResetHandle { cancel, task }
    }

    async fn run(self, cancel: CancellationToken) {
        loop {
            let now = self.clock.now();
            let next = self.zone.next_midnight(now);
            let delay = delay_until_next_midnight(now, self.zone);
            tracing::debug!(
                zone = %self.zone.label(),
                next_reset = %next,
                delay_secs = delay.as_secs(),
                "session reset scheduled"
            );

            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!("session reset scheduler stopped");
                    return;
                }
                () = tokio::time::sleep(delay) => {}
            }

            let cleared = self.reset_now();
            tracing::info!(
                cleared,
                next_reset = %self.next_reset(),
                "🔄 All sessions reset (daily)"
            );
        }
    }
}

/// Handle to a running [`ResetScheduler`].
pub struct ResetHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ResetHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the pending sleep and wait for the task to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!("session reset task ended abnormally: {e}");
        }
    }
}
