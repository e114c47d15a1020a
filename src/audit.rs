//! Append-only record of objects the store confirmed deleted.
//!
//! The audit log is the single source of truth for what a run actually
//! removed, as opposed to what was merely eligible. One writer per run;
//! keys only reach it after the store confirms them, never on submission.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::stamp::RunStamp;

/// Run-scoped audit file: a header block identifying the run, then one
/// `<timestamp>\t<uri>` line per confirmed deletion.
pub struct AuditLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl AuditLog {
    /// Create the run's audit file and write its header block. The file
    /// name carries the same stamp as the preview artifacts.
    pub fn create(output_dir: &Path, stamp: RunStamp, bucket: &str) -> io::Result<Self> {
        std::fs::create_dir_all(output_dir)?;
        let path = output_dir.join(format!("deleted-{bucket}-{}.log", stamp.tag()));

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "run: {}", stamp.iso())?;
        writeln!(writer, "bucket: {bucket}")?;
        writer.flush()?;

        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one confirmed deletion with its scanner-recorded timestamp.
    pub fn append(&mut self, last_modified: DateTime<Utc>, uri: &str) -> io::Result<()> {
        writeln!(
            self.writer,
            "{}\t{uri}",
            last_modified.to_rfc3339_opts(SecondsFormat::Millis, true)
        )
    }

    /// Flush buffered lines to disk. Called after every chunk so a crash
    /// mid-run loses at most the in-flight chunk.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Drop for AuditLog {
    fn drop(&mut self) {
        // Last-resort flush for early-exit paths.
        if let Err(e) = self.writer.flush() {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to flush audit log");
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_header_then_append_only_lines() {
        let temp = TempDir::new().unwrap();
        let stamp = RunStamp::at(ts("2024-02-01T12:00:00Z"));

        let mut audit = AuditLog::create(temp.path(), stamp, "my-bucket").unwrap();
        audit
            .append(ts("2024-01-01T10:00:00Z"), "s3://my-bucket/a")
            .unwrap();
        audit
            .append(ts("2024-01-02T11:00:00Z"), "s3://my-bucket/b")
            .unwrap();
        audit.flush().unwrap();

        let contents = std::fs::read_to_string(audit.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "run: 2024-02-01T12:00:00.000Z");
        assert_eq!(lines[1], "bucket: my-bucket");
        assert_eq!(lines[2], "2024-01-01T10:00:00.000Z\ts3://my-bucket/a");
        assert_eq!(lines[3], "2024-01-02T11:00:00.000Z\ts3://my-bucket/b");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_drop_flushes_buffered_lines() {
        let temp = TempDir::new().unwrap();
        let stamp = RunStamp::at(ts("2024-02-01T12:00:00Z"));
        let path;

        {
            let mut audit = AuditLog::create(temp.path(), stamp, "b").unwrap();
            path = audit.path().to_path_buf();
            audit
                .append(ts("2024-01-01T00:00:00Z"), "s3://b/unflushed")
                .unwrap();
            // No explicit flush; Drop must not lose the line.
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("s3://b/unflushed"));
    }
}
