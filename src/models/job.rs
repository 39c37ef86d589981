//! Replication job records as stored in pve-zsync's `sync_state` file

use serde::{Deserialize, Deserializer};

/// Format pve-zsync uses for the `lsync` timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Last successful sync of a job
///
/// pve-zsync writes the number `0` for jobs that never ran and a local
/// wall-clock timestamp (see [`TIMESTAMP_FORMAT`]) otherwise. The timestamp
/// is kept raw here and only parsed when a lag is computed, so discovery
/// still works for a job whose timestamp is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastSync {
    Never,
    At(String),
}

impl<'de> Deserialize<'de> for LastSync {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(0) => Ok(LastSync::Never),
            Raw::Number(n) => Err(serde::de::Error::custom(format!(
                "invalid lsync value {}: expected 0 or a timestamp string",
                n
            ))),
            Raw::Text(value) => Ok(LastSync::At(value)),
        }
    }
}

/// One job entry under a source in the state file
///
/// Other keys pve-zsync keeps per job (`vm_type`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobRecord {
    /// Last sync timestamp, or the never-synced sentinel
    #[serde(rename = "lsync")]
    pub last_sync: LastSync,

    /// Free-form status label (`ok`, `error`, `syncing`, ...)
    pub state: String,
}

/// Borrowed view of a job together with its identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job<'a> {
    pub source: &'a str,
    pub name: &'a str,
    pub record: &'a JobRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_never_synced() {
        let record: JobRecord = serde_json::from_str(r#"{"lsync": 0, "state": "ok"}"#).unwrap();
        assert_eq!(record.last_sync, LastSync::Never);
        assert_eq!(record.state, "ok");
    }

    #[test]
    fn test_timestamp_kept_raw() {
        let record: JobRecord =
            serde_json::from_str(r#"{"lsync": "2024-03-01_12:00:00", "state": "syncing"}"#)
                .unwrap();
        assert_eq!(
            record.last_sync,
            LastSync::At("2024-03-01_12:00:00".to_string())
        );
    }

    #[test]
    fn test_garbage_timestamp_still_deserializes() {
        // Only parsed when computing lag
        let record: JobRecord =
            serde_json::from_str(r#"{"lsync": "yesterday", "state": "ok"}"#).unwrap();
        assert_eq!(record.last_sync, LastSync::At("yesterday".to_string()));
    }

    #[test]
    fn test_nonzero_number_rejected() {
        let result: Result<JobRecord, _> = serde_json::from_str(r#"{"lsync": 5, "state": "ok"}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("invalid lsync value 5"), "{}", err);
    }

    #[test]
    fn test_extra_keys_ignored() {
        let record: JobRecord = serde_json::from_str(
            r#"{"lsync": 0, "state": "stopped", "vm_type": "qemu"}"#,
        )
        .unwrap();
        assert_eq!(record.state, "stopped");
    }

    #[test]
    fn test_missing_state_rejected() {
        let result: Result<JobRecord, _> = serde_json::from_str(r#"{"lsync": 0}"#);
        assert!(result.is_err());
    }
}
