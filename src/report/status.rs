use super::ReportError;
use crate::state::{StateError, SyncState};
use chrono::NaiveDateTime;
use std::fmt;
use std::io::Write;
use std::path::Path;

/// Item key for the seconds since the last sync
pub const LAG_KEY: &str = "zsync.lsync";

/// Item key for the job's state label
pub const STATE_KEY: &str = "zsync.state";

/// One `<host> <key> <value>` line of `zabbix_sender` input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricLine {
    pub host: String,
    pub key: String,
    pub value: String,
}

impl MetricLine {
    /// Line for item `item` parameterized by job name, e.g. `zsync.lsync[daily]`
    pub fn new(host: &str, item: &str, job: &str, value: impl ToString) -> Self {
        Self {
            host: host.to_string(),
            key: format!("{}[{}]", item, job),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for MetricLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            quote_field(&self.host),
            quote_field(&self.key),
            quote_field(&self.value)
        )
    }
}

/// Quote a field the way `zabbix_sender -i` expects when it holds blanks or quotes
///
/// Control characters become spaces so a field never spans input lines.
fn quote_field(field: &str) -> String {
    let field: String = field
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    let needs_quotes = field.is_empty()
        || field
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\\');
    if !needs_quotes {
        return field;
    }

    let escaped = field.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

/// Lag and state lines for every job, two per job in file order
///
/// Fails on the first job whose timestamp cannot be parsed, before anything
/// is written.
pub fn collect_metrics(
    state: &SyncState,
    host: &str,
    now: NaiveDateTime,
) -> Result<Vec<MetricLine>, StateError> {
    let mut lines = Vec::with_capacity(state.len() * 2);

    for job in state.jobs() {
        let lag = job.lag(now)?;
        if lag < 0 {
            tracing::warn!(
                job = job.name,
                source = job.source,
                lag,
                "last sync is in the future"
            );
        }

        lines.push(MetricLine::new(host, LAG_KEY, job.name, lag));
        lines.push(MetricLine::new(host, STATE_KEY, job.name, &job.record.state));
    }

    Ok(lines)
}

/// Write `lines` to the status file, replacing previous contents
pub fn write_status(path: &Path, lines: &[MetricLine]) -> Result<(), ReportError> {
    let to_error = |source| ReportError::StatusWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut file = std::fs::File::create(path).map_err(to_error)?;
    for line in lines {
        writeln!(file, "{}", line).map_err(to_error)?;
    }
    file.flush().map_err(to_error)?;

    tracing::debug!(path = %path.display(), lines = lines.len(), "wrote status file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_never_synced_job_lines() {
        let state =
            SyncState::parse(r#"{"src1": {"job1": {"lsync": 0, "state": "ok"}}}"#).unwrap();
        let lines = collect_metrics(&state, "pve1", now()).unwrap();

        let rendered: Vec<String> = lines.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["pve1 zsync.lsync[job1] 0", "pve1 zsync.state[job1] ok"]
        );
    }

    #[test]
    fn test_two_lines_per_job() {
        let state = SyncState::parse(
            r#"{
                "100": {"daily": {"lsync": "2024-03-01_10:58:59", "state": "ok"}},
                "101": {"hourly": {"lsync": "2024-03-01_11:59:00", "state": "syncing"},
                        "weekly": {"lsync": 0, "state": "stopped"}}
            }"#,
        )
        .unwrap();
        let lines = collect_metrics(&state, "pve1", now()).unwrap();

        assert_eq!(lines.len(), state.len() * 2);
        assert_eq!(lines[0], MetricLine::new("pve1", LAG_KEY, "daily", 3661));
        assert_eq!(lines[1], MetricLine::new("pve1", STATE_KEY, "daily", "ok"));
        assert_eq!(lines[2].value, "60");
        assert_eq!(lines[3].value, "syncing");
        assert_eq!(lines[4].key, "zsync.lsync[weekly]");
        assert_eq!(lines[5].value, "stopped");
    }

    #[test]
    fn test_future_timestamp_reported_negative() {
        let state = SyncState::parse(
            r#"{"100": {"daily": {"lsync": "2024-03-01_12:01:00", "state": "ok"}}}"#,
        )
        .unwrap();
        let lines = collect_metrics(&state, "pve1", now()).unwrap();
        assert_eq!(lines[0].value, "-60");
    }

    #[test]
    fn test_invalid_timestamp_aborts() {
        let state = SyncState::parse(
            r#"{"100": {"good": {"lsync": 0, "state": "ok"},
                        "bad": {"lsync": "01/03/2024", "state": "ok"}}}"#,
        )
        .unwrap();
        let err = collect_metrics(&state, "pve1", now()).unwrap_err();
        assert!(matches!(err, StateError::InvalidTimestamp { ref job, .. } if job == "bad"));
    }

    #[test]
    fn test_fields_with_blanks_are_quoted() {
        let line = MetricLine::new("pve1", STATE_KEY, "daily", "error: \"zfs send\" failed");
        assert_eq!(
            line.to_string(),
            r#"pve1 zsync.state[daily] "error: \"zfs send\" failed""#
        );
        assert_eq!(
            MetricLine::new("pve1", STATE_KEY, "daily", "").to_string(),
            r#"pve1 zsync.state[daily] """#
        );
    }

    #[test]
    fn test_control_characters_stay_on_one_line() {
        let line = MetricLine::new("pve1", STATE_KEY, "daily", "zfs send failed\nretrying\r\tlater");
        let rendered = line.to_string();

        assert_eq!(rendered.lines().count(), 1);
        assert_eq!(
            rendered,
            r#"pve1 zsync.state[daily] "zfs send failed retrying  later""#
        );
    }

    #[test]
    fn test_write_status_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("zsync.status.dat");
        std::fs::write(&path, "stale line\nanother\nand another\n").unwrap();

        let lines = vec![
            MetricLine::new("pve1", LAG_KEY, "job1", 0),
            MetricLine::new("pve1", STATE_KEY, "job1", "ok"),
        ];
        write_status(&path, &lines).unwrap();
        write_status(&path, &lines).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "pve1 zsync.lsync[job1] 0\npve1 zsync.state[job1] ok\n");
    }

    #[test]
    fn test_write_status_unwritable_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing-dir").join("zsync.status.dat");

        let err = write_status(&path, &[]).unwrap_err();
        assert!(matches!(err, ReportError::StatusWrite { .. }));
    }
}
