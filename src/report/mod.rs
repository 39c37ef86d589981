//! Zabbix output adapters
//!
//! - Low-level discovery document listing the replication jobs
//! - Status file in `zabbix_sender` input format

mod discovery;
mod status;

pub use discovery::{discover, DiscoveryDocument, DiscoveryEntry, REPLICA_MACRO};
pub use status::{collect_metrics, write_status, MetricLine, LAG_KEY, STATE_KEY};

use std::path::PathBuf;

/// Errors that can occur while producing report output
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to write status file '{}'", path.display())]
    StatusWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render discovery document")]
    Render(#[from] serde_json::Error),
}
