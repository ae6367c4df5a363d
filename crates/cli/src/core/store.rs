//! # Recommendation Record Store
//!
//! Append-only JSON Lines log of tools that were already recommended.
//!
//! ## Lifecycle
//!
//! - **Append**: one line per record, existing lines never touched
//! - **Read**: lines older than the retention window are pruned by
//!   atomically rewriting the log with the surviving records
//! - **Migrate**: the retired markdown log is imported once, then removed
//!
//! The store assumes a single writer. There is no locking between processes.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use seen_common::fs::{SafeFileWriter, WriteMode};
use seen_common::RuntimePaths;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::errors::{SeenError, SeenResult};
use super::legacy;
use super::record::{NewRecord, Record};

pub const LOG_FILE_NAME: &str = "seen-tools.jsonl";
pub const LEGACY_FILE_NAME: &str = "seen-tools.md";
pub const DEFAULT_RETENTION_DAYS: u32 = 90;

/// Result of a read pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOutcome {
    /// Records inside the retention window, in log order
    pub kept: Vec<Record>,
    /// Records dropped for being older than the cutoff
    pub expired: usize,
    /// Lines that could not be decoded
    pub malformed: usize,
    /// Earliest date still kept (inclusive)
    pub cutoff: NaiveDate,
}

/// Result of a legacy import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Whether a legacy file was found and consumed
    pub performed: bool,
    /// Entries written to the log
    pub migrated: usize,
    /// Entries dropped for an empty name or an invalid date
    pub skipped: usize,
}

pub struct RecordStore {
    log_path: PathBuf,
    legacy_path: PathBuf,
    writer: SafeFileWriter,
    clock: Box<dyn Clock>,
}

impl RecordStore {
    /// Store rooted in the skill's data directory.
    pub fn new(paths: &RuntimePaths) -> Self {
        Self::in_dir(paths.data_dir())
    }

    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            log_path: data_dir.join(LOG_FILE_NAME),
            legacy_path: data_dir.join(LEGACY_FILE_NAME),
            writer: SafeFileWriter::new(data_dir),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn legacy_path(&self) -> &Path {
        &self.legacy_path
    }

    /// Earliest date kept for a retention window (inclusive).
    pub fn cutoff(&self, retention_days: u32) -> NaiveDate {
        self.clock
            .today()
            .checked_sub_days(Days::new(u64::from(retention_days)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Returns records dated within the last `retention_days` days and prunes
    /// the rest from disk.
    pub fn read(&self, retention_days: u32) -> SeenResult<Vec<Record>> {
        Ok(self.read_with_stats(retention_days)?.kept)
    }

    /// Same as [`RecordStore::read`], with counts of what was dropped.
    ///
    /// The log is rewritten only when at least one record expired. Malformed
    /// lines never trigger a rewrite but do not survive one.
    pub fn read_with_stats(&self, retention_days: u32) -> SeenResult<ReadOutcome> {
        let cutoff = self.cutoff(retention_days);
        let mut outcome = ReadOutcome {
            cutoff,
            ..ReadOutcome::default()
        };

        let bytes = match fs::read(&self.log_path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(outcome),
            Err(err) => {
                return Err(SeenError::io(
                    self.log_path.clone(),
                    "read record log",
                    err,
                ))
            }
        };

        for (idx, raw) in bytes.split(|b| *b == b'\n').enumerate() {
            let line_no = idx + 1;
            let Ok(text) = std::str::from_utf8(raw) else {
                debug!(line = line_no, "skipping non UTF-8 line");
                outcome.malformed += 1;
                continue;
            };
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            match Record::from_line(text, line_no) {
                Ok(record) if record.date >= cutoff => outcome.kept.push(record),
                Ok(_) => outcome.expired += 1,
                Err(err) => {
                    debug!(error = %err, "skipping malformed record");
                    outcome.malformed += 1;
                }
            }
        }

        if outcome.expired > 0 {
            self.rewrite(&outcome.kept)?;
            info!(
                expired = outcome.expired,
                kept = outcome.kept.len(),
                cutoff = %cutoff,
                "pruned expired records"
            );
        }

        Ok(outcome)
    }

    /// Appends records in order and returns how many were written.
    ///
    /// The whole batch is validated before anything touches the disk. Records
    /// without a date share one "today", taken once per call.
    pub fn append(&self, records: &[NewRecord]) -> SeenResult<usize> {
        let today = self.clock.today();
        let mut buffer = String::new();
        for record in records {
            buffer.push_str(&record.resolve(today)?.to_line()?);
        }

        fs::create_dir_all(self.writer.base_dir()).map_err(|err| {
            SeenError::io(
                self.writer.base_dir().to_path_buf(),
                "create data directory",
                err,
            )
        })?;
        if buffer.is_empty() {
            return Ok(0);
        }

        self.writer
            .write_text(&self.log_path, &buffer, WriteMode::Append)
            .map_err(|err| convert_error(&self.log_path, "append records", err))?;
        debug!(count = records.len(), path = %self.log_path.display(), "appended records");
        Ok(records.len())
    }

    /// Imports the markdown predecessor of the log, then deletes it.
    ///
    /// Idempotent: once the legacy file is gone this is a no-op.
    pub fn migrate(&self) -> SeenResult<MigrationReport> {
        let text = match fs::read_to_string(&self.legacy_path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(MigrationReport::default())
            }
            Err(err) => {
                return Err(SeenError::io(
                    self.legacy_path.clone(),
                    "read legacy log",
                    err,
                ))
            }
        };

        let today = self.clock.today();
        let mut valid = Vec::new();
        let mut skipped = 0;
        for entry in legacy::parse(&text) {
            match entry.resolve(today) {
                Ok(_) => valid.push(entry),
                Err(err) => {
                    warn!(error = %err, name = ?entry.name, "skipping legacy entry");
                    skipped += 1;
                }
            }
        }

        let migrated = self.append(&valid)?;
        fs::remove_file(&self.legacy_path).map_err(|err| {
            SeenError::io(self.legacy_path.clone(), "remove legacy log", err)
        })?;
        info!(migrated, skipped, "migrated legacy markdown log");

        Ok(MigrationReport {
            performed: true,
            migrated,
            skipped,
        })
    }

    fn rewrite(&self, records: &[Record]) -> SeenResult<()> {
        let mut buffer = String::new();
        for record in records {
            buffer.push_str(&record.to_line()?);
        }
        self.writer
            .write_text(&self.log_path, &buffer, WriteMode::Replace)
            .map_err(|err| convert_error(&self.log_path, "rewrite record log", err))
    }
}

#[inline]
fn convert_error(path: &Path, operation: &str, err: anyhow::Error) -> SeenError {
    let message = format!("{err:#}");
    let source = match err.downcast::<std::io::Error>() {
        Ok(io_err) => io_err,
        Err(_) => std::io::Error::new(ErrorKind::Other, message),
    };
    SeenError::io(path.to_path_buf(), operation, source)
}
