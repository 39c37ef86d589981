pub mod discover;
pub mod send;
pub mod settings;

pub use settings::{local_hostname, Mode, Overrides, Settings};

use crate::Result;
use std::process::ExitCode;

/// Run one invocation in `mode`
pub fn run(settings: &Settings, mode: Mode) -> Result<ExitCode> {
    match mode {
        Mode::Discover => discover::run(settings),
        Mode::Send => send::run(settings),
    }
}
