pub mod config;
pub mod job;

pub use config::{ConfigError, SenderConfig, ZsyncConfig, DEFAULT_CONFIG_PATH};
pub use job::{Job, JobRecord, LastSync, TIMESTAMP_FORMAT};
