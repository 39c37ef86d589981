//! pve-zsync state handling
//!
//! Loads the `sync_state` file and computes how stale each job is:
//! - Jobs grouped by source, in file order
//! - Lag in seconds since the last sync

mod loader;
mod staleness;

pub use loader::{StateError, SyncState};
pub use staleness::{calculate_lag, lag_now, parse_timestamp};
