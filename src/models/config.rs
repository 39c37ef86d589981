use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the optional config file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/zabbix/zsync-zbx.toml";

/// Errors that can occur while loading the config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// zsync-zbx configuration (`zsync-zbx.toml`)
///
/// Every field is optional in the file; missing ones fall back to the
/// paths pve-zsync and the Zabbix agent use on a stock Proxmox host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZsyncConfig {
    /// pve-zsync state file
    pub state_file: PathBuf,

    /// Scratch file handed to the sender, overwritten on every send
    pub status_file: PathBuf,

    /// Sender output is appended here
    pub log_file: PathBuf,

    /// Host name reported in metric lines (defaults to the machine's hostname)
    pub hostname: Option<String>,

    /// External trapper sender
    pub sender: SenderConfig,
}

impl Default for ZsyncConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from("/var/lib/pve-zsync/sync_state"),
            status_file: PathBuf::from("/tmp/zsync.status.dat"),
            log_file: PathBuf::from("/tmp/zsync-zbx.log"),
            hostname: None,
            sender: SenderConfig::default(),
        }
    }
}

/// `[sender]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    /// Executable name or path
    pub command: String,

    /// Agent config passed to the sender with `-c`
    pub agent_config: PathBuf,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            command: "zabbix_sender".to_string(),
            agent_config: PathBuf::from("/etc/zabbix/zabbix_agentd.conf"),
        }
    }
}

impl ZsyncConfig {
    /// Load config from `path`, or defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ZsyncConfig::load(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config, ZsyncConfig::default());
        assert_eq!(config.sender.command, "zabbix_sender");
        assert_eq!(config.status_file, PathBuf::from("/tmp/zsync.status.dat"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("zsync-zbx.toml");
        std::fs::write(
            &path,
            r#"
state_file = "/srv/sync_state"
hostname = "pve1.example.org"

[sender]
agent_config = "/etc/zabbix/zabbix_agent2.conf"
"#,
        )
        .unwrap();

        let config = ZsyncConfig::load(&path).unwrap();
        assert_eq!(config.state_file, PathBuf::from("/srv/sync_state"));
        assert_eq!(config.hostname.as_deref(), Some("pve1.example.org"));
        assert_eq!(config.sender.command, "zabbix_sender");
        assert_eq!(
            config.sender.agent_config,
            PathBuf::from("/etc/zabbix/zabbix_agent2.conf")
        );
        assert_eq!(config.log_file, PathBuf::from("/tmp/zsync-zbx.log"));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("zsync-zbx.toml");
        std::fs::write(&path, "state_file = [").unwrap();

        let err = ZsyncConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
