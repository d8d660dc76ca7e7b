//! Cron-driven triggers for reconciliation and token refresh
//!
//! Lifecycle is explicit (`start`/`stop`), spawned tasks are joined, and every
//! asynchronous step is wrapped in a timeout.

pub mod error;
pub mod pinsync_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use pinsync_scheduler::{
    reconcile_tick, refresh_tick, PinSyncScheduler, PinSyncSchedulerConfig, TickOutcome,
};
