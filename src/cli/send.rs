use super::Settings;
use crate::report::{collect_metrics, write_status};
use crate::sender::SenderError;
use crate::state::SyncState;
use crate::{Context, Result};
use chrono::{Local, NaiveDateTime};
use std::process::ExitCode;

/// Printed when the sender accepted the metrics
pub const SUCCESS_MARKER: &str = "1";

/// Printed when the sender failed
pub const FAILURE_MARKER: &str = "0";

pub fn run(settings: &Settings) -> Result<ExitCode> {
    let written = write_status_file(settings, Local::now().naive_local())?;
    tracing::info!(
        lines = written,
        path = %settings.status_file.display(),
        "status file ready"
    );

    let result = settings.sender().send(&settings.status_file);
    println!("{}", marker(&result));
    result.context("Failed to push metrics to the Zabbix trapper")?;
    Ok(ExitCode::SUCCESS)
}

/// Value printed for the Zabbix item once the sender has run
pub fn marker(result: &Result<(), SenderError>) -> &'static str {
    match result {
        Ok(()) => SUCCESS_MARKER,
        Err(_) => FAILURE_MARKER,
    }
}

/// Load the state file and write its metrics to the status file
///
/// Returns the number of lines written. Nothing is written when any job
/// has a malformed timestamp.
pub fn write_status_file(settings: &Settings, now: NaiveDateTime) -> Result<usize> {
    let state = SyncState::load(&settings.state_file)?;
    let lines = collect_metrics(&state, &settings.hostname, now)?;
    write_status(&settings.status_file, &lines)?;
    Ok(lines.len())
}
