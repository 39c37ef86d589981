//! Push metrics to the Zabbix trapper through the external sender binary

mod trapper;

pub use trapper::TrapperSender;

use std::path::PathBuf;

/// Errors that can occur when invoking the sender
#[derive(Debug, thiserror::Error)]
pub enum SenderError {
    #[error("Failed to open sender log '{}'", path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' not found. Please ensure it is installed and in your PATH.")]
    NotFound {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start command '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' failed with exit code {code:?} (see {})", log.display())]
    Failed {
        command: String,
        code: Option<i32>,
        log: PathBuf,
    },
}
