use super::Settings;
use crate::report::discover;
use crate::state::SyncState;
use crate::{Context, Result};
use std::process::ExitCode;

pub fn run(settings: &Settings) -> Result<ExitCode> {
    println!("{}", render(settings)?);
    Ok(ExitCode::SUCCESS)
}

/// Discovery JSON for the jobs in the configured state file
pub fn render(settings: &Settings) -> Result<String> {
    let state = SyncState::load(&settings.state_file)?;
    let document = discover(&state);
    tracing::info!(jobs = document.len(), "discovered replication jobs");

    document
        .render()
        .context("Failed to build discovery output")
}
