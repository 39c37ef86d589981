use crate::models::{LastSync, TIMESTAMP_FORMAT};
use chrono::{Local, NaiveDateTime, ParseError};

/// Parse a pve-zsync `lsync` timestamp (local time, no zone)
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
}

/// Whole seconds elapsed between `last_sync` and `now`
///
/// A job that never synced has a lag of 0. A timestamp later than `now`
/// gives a negative lag.
pub fn calculate_lag(last_sync: &LastSync, now: NaiveDateTime) -> Result<i64, ParseError> {
    match last_sync {
        LastSync::Never => Ok(0),
        LastSync::At(value) => Ok((now - parse_timestamp(value)?).num_seconds()),
    }
}

/// [`calculate_lag`] against the local wall clock
pub fn lag_now(last_sync: &LastSync) -> Result<i64, ParseError> {
    calculate_lag(last_sync, Local::now().naive_local())
}
