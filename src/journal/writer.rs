//! Journal writer for the daily append-only journal
//!
//! Each audit line is appended to `<root_dir>/WhatsFlowing_<YYYY_MM_DD>.log`,
//! dated in local time. The file is opened, written, flushed, and closed for
//! every line; no handle outlives a single append.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local, NaiveDate};

use crate::error::{WhatsFlowingError, WhatsFlowingResult};
use crate::logging::LogSink;

const FILE_PREFIX: &str = "WhatsFlowing_";
const FILE_EXTENSION: &str = "log";

/// Journal file name for a calendar date, e.g. `WhatsFlowing_2024_03_07.log`
pub fn journal_file_name(date: NaiveDate) -> String {
    format!(
        "{}{:04}_{:02}_{:02}.{}",
        FILE_PREFIX,
        date.year(),
        date.month(),
        date.day(),
        FILE_EXTENSION
    )
}

/// Appends audit lines under one journal directory
#[derive(Debug, Clone)]
pub struct JournalWriter {
    root_dir: PathBuf,
}

impl JournalWriter {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Path of the journal file that receives lines written at `now`
    pub fn path_for(&self, now: &DateTime<Local>) -> PathBuf {
        self.root_dir.join(journal_file_name(now.date_naive()))
    }

    /// Append `line` to the journal for `now`, logging any failure
    ///
    /// Failures never reach the caller: a lost journal line must not hold up
    /// the record. Returns the journal path when the line was written.
    pub fn append(&self, now: &DateTime<Local>, line: &str, log: &dyn LogSink) -> Option<PathBuf> {
        match self.try_append(now, line) {
            Ok(path) => {
                log.debug(&format!("Appended audit line to {}", path.display()));
                Some(path)
            }
            Err(e) => {
                log.warn(&format!(
                    "Failed to append audit line to journal in {}: {}",
                    self.root_dir.display(),
                    e
                ));
                None
            }
        }
    }

    /// Append `line` to the journal for `now`
    ///
    /// Creates the root directory (and missing parents) if needed.
    pub fn try_append(&self, now: &DateTime<Local>, line: &str) -> WhatsFlowingResult<PathBuf> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(WhatsFlowingError::Journal(
                "journal directory evaluated to an empty path".to_string(),
            ));
        }

        if !self.root_dir.is_dir() {
            fs::create_dir_all(&self.root_dir).map_err(|e| {
                WhatsFlowingError::Journal(format!(
                    "Failed to create directory {}: {}",
                    self.root_dir.display(),
                    e
                ))
            })?;
        }

        let path = self.path_for(now);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                WhatsFlowingError::Journal(format!("Failed to open {}: {}", path.display(), e))
            })?;

        // Sized so line and terminator reach the file in a single write
        let mut writer = BufWriter::with_capacity(line.len() + 1, file);

        writeln!(writer, "{}", line).map_err(|e| {
            WhatsFlowingError::Journal(format!("Failed to write {}: {}", path.display(), e))
        })?;
        writer.flush().map_err(|e| {
            WhatsFlowingError::Journal(format!("Failed to flush {}: {}", path.display(), e))
        })?;

        Ok(path)
    }
}
