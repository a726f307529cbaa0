//! Persistence of per-operation latency samples for the measurement driver.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Append-only delimited text log of latency samples.
///
/// The log has the columns `operation,scenario,n,strategy,latency`, with the
/// latency reported in nanoseconds. The `strategy` column carries the probe
/// strategy label, or a reference-map label for baseline rows.
#[derive(Debug)]
pub struct LatencyLog {
    /// Buffered writer over the log file.
    out: BufWriter<File>,
}

impl LatencyLog {
    /// Creates the log file, truncating any previous contents, and writes
    /// the column header.
    ///
    /// # Errors
    ///
    /// Returns any error from creating or writing the file.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "operation,scenario,n,strategy,latency")?;
        Ok(Self { out })
    }

    /// Appends one latency sample row.
    ///
    /// # Errors
    ///
    /// Returns any error from writing the file.
    pub fn record(
        &mut self,
        operation: &str,
        scenario: &str,
        n: usize,
        strategy: &str,
        latency: Duration,
    ) -> io::Result<()> {
        writeln!(self.out, "{operation},{scenario},{n},{strategy},{}", latency.as_nanos())
    }

    /// Flushes buffered rows to disk.
    ///
    /// # Errors
    ///
    /// Returns any error from flushing the file.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
