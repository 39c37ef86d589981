use clap::{ArgAction, ArgGroup, CommandFactory, Parser};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use zsync_zbx::cli::{Mode, Overrides, Settings};
use zsync_zbx::models::{ZsyncConfig, DEFAULT_CONFIG_PATH};
use zsync_zbx::Result;

#[derive(Parser)]
#[command(name = "zsync-zbx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Report pve-zsync jobs status to Zabbix", long_about = None)]
#[command(group(ArgGroup::new("mode").args(["discover", "send"])))]
struct Cli {
    /// Return a list of pve-zsync jobs in Zabbix discovery format
    #[arg(long)]
    discover: bool,

    /// Send data via zabbix_sender to Zabbix trapper
    #[arg(long)]
    send: bool,

    /// pve-zsync state file (overrides the config file)
    #[arg(short = 'f', long, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// Config file
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Host name reported to Zabbix (default: this machine's fully-qualified name)
    #[arg(long, value_name = "NAME")]
    host: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Selected mode, `None` when only help should be printed
    fn mode(&self) -> Option<Mode> {
        if self.discover {
            Some(Mode::Discover)
        } else if self.send {
            Some(Mode::Send)
        } else {
            None
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(mode) = cli.mode() else {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("{}", format!("Error: {}", e).red());
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    };

    match run(cli, mode) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", format!("Error: {:#}", e).red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, mode: Mode) -> Result<ExitCode> {
    let config = ZsyncConfig::load(&cli.config)?;
    let settings = Settings::resolve(
        config,
        Overrides {
            state_file: cli.state_file,
            hostname: cli.host,
        },
    );
    tracing::debug!(?settings, ?mode, "resolved settings");

    zsync_zbx::cli::run(&settings, mode)
}

/// Log to stderr; stdout carries the discovery JSON and the send marker
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
