use super::ReportError;
use crate::state::SyncState;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use std::collections::HashSet;
use std::io;

/// LLD macro the Zabbix template's item prototypes use
pub const REPLICA_MACRO: &str = "{#REPLICA}";

/// One discovered job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryEntry {
    #[serde(rename = "{#REPLICA}")]
    pub replica: String,
}

/// Zabbix low-level discovery document: `{"data": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryDocument {
    pub data: Vec<DiscoveryEntry>,
}

impl DiscoveryDocument {
    /// Number of discovered jobs
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pretty-printed JSON with a four-space indent and no blank after `:`
    pub fn render(&self) -> Result<String, ReportError> {
        let mut buf = Vec::new();
        let formatter = DiscoveryFormatter(PrettyFormatter::with_indent(b"    "));
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Four-space indented layout with `"key":value` pairs
struct DiscoveryFormatter<'a>(PrettyFormatter<'a>);

impl Formatter for DiscoveryFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b":")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }
}

/// Build the discovery document for every job in `state`
///
/// Zabbix rejects an LLD payload that repeats a macro value, so a job name
/// present under several sources is listed once.
pub fn discover(state: &SyncState) -> DiscoveryDocument {
    let mut seen = HashSet::new();
    let mut data = Vec::with_capacity(state.len());

    for job in state.jobs() {
        if !seen.insert(job.name) {
            tracing::warn!(
                job = job.name,
                source = job.source,
                "job name already discovered under another source"
            );
            continue;
        }
        data.push(DiscoveryEntry {
            replica: job.name.to_string(),
        });
    }

    DiscoveryDocument { data }
}
