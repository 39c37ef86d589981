use crate::models::ZsyncConfig;
use crate::sender::TrapperSender;
use std::net::IpAddr;
use std::path::PathBuf;

/// What an invocation does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print the discovery document
    Discover,
    /// Write the status file and push it to the trapper
    Send,
}

/// Values given on the command line, taking precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub state_file: Option<PathBuf>,
    pub hostname: Option<String>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub state_file: PathBuf,
    pub status_file: PathBuf,
    pub log_file: PathBuf,
    pub hostname: String,
    pub sender_command: String,
    pub agent_config: PathBuf,
}

impl Settings {
    /// Merge CLI overrides over the config file
    ///
    /// The hostname falls back to the machine's fully-qualified name when
    /// neither sets it.
    pub fn resolve(config: ZsyncConfig, overrides: Overrides) -> Self {
        Self::resolve_with(config, overrides, local_hostname)
    }

    /// [`Settings::resolve`] with a custom hostname lookup, only called when
    /// neither the CLI nor the config names the host
    pub fn resolve_with(
        config: ZsyncConfig,
        overrides: Overrides,
        lookup_hostname: impl FnOnce() -> String,
    ) -> Self {
        let hostname = overrides
            .hostname
            .or(config.hostname)
            .unwrap_or_else(lookup_hostname);

        Self {
            state_file: overrides.state_file.unwrap_or(config.state_file),
            status_file: config.status_file,
            log_file: config.log_file,
            hostname,
            sender_command: config.sender.command,
            agent_config: config.sender.agent_config,
        }
    }

    /// Sender configured from these settings
    pub fn sender(&self) -> TrapperSender {
        TrapperSender::new(
            self.sender_command.clone(),
            self.agent_config.clone(),
            self.log_file.clone(),
        )
    }
}

/// Fully-qualified name of this machine
///
/// Resolves the kernel hostname and takes the first reverse name with a
/// domain part, as `/etc/hosts` on a Proxmox node maps it. Falls back to
/// the short name, then `localhost`.
pub fn local_hostname() -> String {
    let short = match hostname::get() {
        Ok(name) => name.to_string_lossy().to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "cannot read hostname, using localhost");
            return "localhost".to_string();
        }
    };

    let addrs = dns_lookup::lookup_host(&short).unwrap_or_else(|e| {
        tracing::debug!(host = %short, error = %e, "hostname does not resolve");
        Vec::new()
    });

    qualified_name(&short, &addrs, |addr| dns_lookup::lookup_addr(addr).ok())
}

/// First name from `reverse` over `addrs` that contains a dot, else `short`
fn qualified_name(
    short: &str,
    addrs: &[IpAddr],
    reverse: impl Fn(&IpAddr) -> Option<String>,
) -> String {
    if short.contains('.') {
        return short.to_string();
    }

    addrs
        .iter()
        .filter_map(|addr| reverse(addr))
        .find(|name| name.contains('.'))
        .unwrap_or_else(|| short.to_string())
}
