use chrono::{DateTime, Utc};

/// Source of wall-clock time for scheduling.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
    fn name(&self) -> &str;
}
