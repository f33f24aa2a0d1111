// Counter source reader: aggregates received/transmitted byte totals from a
// /proc/net/dev style table.

use crate::config::{DEFAULT_SOURCE, InterfaceFilter};
use crate::error::SampleError;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// 1-indexed position of the received-bytes field after the colon.
const RECEIVED_FIELD: usize = 1;
/// 1-indexed position of the transmitted-bytes field after the colon.
const TRANSMITTED_FIELD: usize = 9;

/// Current wall-clock time in unix seconds.
pub fn wall_clock() -> i64 {
    chrono::Utc::now().timestamp()
}

/// One point-in-time aggregate over every selected interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    pub received_bytes: u64,
    pub transmitted_bytes: u64,
    /// Capture time, unix seconds.
    pub timestamp: i64,
}

/// Aggregates a counter table into one snapshot stamped with `timestamp`.
///
/// Lines without a `:` are headers and skipped. The loopback interface is always skipped;
/// a non-empty filter additionally skips every interface it does not name. Lines with fewer
/// than nine fields contribute only what they carry. Any unparsable byte field on a selected
/// line fails the whole table.
pub fn parse_table(
    table: &str,
    filter: &InterfaceFilter,
    timestamp: i64,
) -> Result<CounterSnapshot, SampleError> {
    let mut snapshot = CounterSnapshot {
        timestamp,
        ..Default::default()
    };

    for line in table.lines() {
        let Some((name, rest)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        // Column banner such as "face |bytes ..." if a header ever carries a colon.
        // A name listed in a non-empty filter is always data.
        if (filter.is_empty() && name.contains('|')) || !filter.admits(name) {
            continue;
        }

        let mut fields = rest.split_whitespace();
        if let Some(v) = fields.next() {
            let n = parse_field(name, RECEIVED_FIELD, v)?;
            snapshot.received_bytes = snapshot.received_bytes.saturating_add(n);
        }
        if let Some(v) = fields.nth(TRANSMITTED_FIELD - RECEIVED_FIELD - 1) {
            let n = parse_field(name, TRANSMITTED_FIELD, v)?;
            snapshot.transmitted_bytes = snapshot.transmitted_bytes.saturating_add(n);
        }
    }

    Ok(snapshot)
}

fn parse_field(interface: &str, field: usize, value: &str) -> Result<u64, SampleError> {
    value.parse::<u64>().map_err(|_| SampleError::Parse {
        interface: interface.to_string(),
        field,
        value: value.to_string(),
    })
}

/// File-backed counter table.
#[derive(Debug, Clone)]
pub struct CounterSource {
    path: PathBuf,
}

impl Default for CounterSource {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE)
    }
}

impl CounterSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the table and aggregates it, stamped with the current wall-clock second.
    pub fn sample(&self, filter: &InterfaceFilter) -> Result<CounterSnapshot, SampleError> {
        self.sample_at(filter, wall_clock())
    }

    #[instrument(level = "debug", skip(self, filter), fields(source = %self.path.display()))]
    pub fn sample_at(
        &self,
        filter: &InterfaceFilter,
        timestamp: i64,
    ) -> Result<CounterSnapshot, SampleError> {
        let table = std::fs::read_to_string(&self.path).map_err(|source| SampleError::Io {
            path: self.path.clone(),
            source,
        })?;
        let snapshot = parse_table(&table, filter, timestamp)?;
        tracing::trace!(
            received_bytes = snapshot.received_bytes,
            transmitted_bytes = snapshot.transmitted_bytes,
            "sampled counters"
        );
        Ok(snapshot)
    }
}
