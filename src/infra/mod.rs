pub mod clock;
pub mod reset;
pub mod traits;

pub use clock::SystemClock;
pub use reset::{delay_until_next_midnight, next_midnight, ResetHandle, ResetScheduler, ResetZone};
pub use traits::Clock;

use anyhow::Result;
use std::sync::Arc;

use crate::config::ResetConfig;
use crate::sessions::SessionStore;

/// Build the daily reset scheduler from `[reset]`, or `None` when disabled.
pub fn create_reset_scheduler(
    store: Arc<dyn SessionStore>,
    config: &ResetConfig,
) -> Result<Option<ResetScheduler>> {
    if !config.enabled {
        return Ok(None);
    }
    let zone = ResetZone::parse(config.timezone.as_deref())?;
    Ok(Some(ResetScheduler::new(store, zone)))
}
