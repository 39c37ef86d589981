// zsync-zbx - pve-zsync replication status reporter for Zabbix
// Discovery of replication jobs and trapper metrics for their sync lag and state

pub mod cli;
pub mod models;
pub mod report;
pub mod sender;
pub mod state;

pub use anyhow::{Context, Result};

// Re-export commonly used types
pub use models::{Job, JobRecord, LastSync, ZsyncConfig};
pub use state::{StateError, SyncState};
