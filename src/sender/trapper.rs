use super::SenderError;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Runs `zabbix_sender` (or a compatible binary) against a status file
#[derive(Debug, Clone)]
pub struct TrapperSender {
    command: String,
    agent_config: PathBuf,
    log_file: PathBuf,
}

impl TrapperSender {
    pub fn new(
        command: impl Into<String>,
        agent_config: impl Into<PathBuf>,
        log_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            command: command.into(),
            agent_config: agent_config.into(),
            log_file: log_file.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Arguments for sending `input`: `-c <agent config> -i <input>`
    pub fn args(&self, input: &Path) -> Vec<OsString> {
        vec![
            "-c".into(),
            self.agent_config.clone().into_os_string(),
            "-i".into(),
            input.as_os_str().to_os_string(),
        ]
    }

    /// Send the metrics in `input` and wait for the sender to exit
    ///
    /// The sender's stdout and stderr are appended to the log file. A
    /// non-zero exit status is an error.
    pub fn send(&self, input: &Path) -> Result<(), SenderError> {
        let stdout = self.open_log()?;
        let stderr = stdout.try_clone().map_err(|source| SenderError::Log {
            path: self.log_file.clone(),
            source,
        })?;

        tracing::debug!(
            command = %self.command,
            input = %input.display(),
            log = %self.log_file.display(),
            "invoking trapper sender"
        );

        let status = Command::new(&self.command)
            .args(self.args(input))
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .status()
            .map_err(|source| {
                let command = self.command.clone();
                if source.kind() == ErrorKind::NotFound {
                    SenderError::NotFound { command, source }
                } else {
                    SenderError::Spawn { command, source }
                }
            })?;

        if !status.success() {
            return Err(SenderError::Failed {
                command: self.command.clone(),
                code: status.code(),
                log: self.log_file.clone(),
            });
        }

        tracing::info!(command = %self.command, "metrics sent");
        Ok(())
    }

    fn open_log(&self) -> Result<File, SenderError> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)
            .map_err(|source| SenderError::Log {
                path: self.log_file.clone(),
                source,
            })
    }
}
