//! History of bookkeeping changes
//!
//! `Storage` appends one entry per category, expense or budget mutation to
//! `audit.log`, one JSON object per line. The `history` command reads the
//! tail back. A failed append is reported by `Storage` as a warning and never
//! undoes the mutation it describes.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{BookkeeperError, BookkeeperResult};

use super::entry::AuditEntry;

/// Append-only JSONL history at a fixed path
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry as a single line
    ///
    /// The entry is serialized before the file is touched, so a record that
    /// cannot be encoded leaves the log unchanged.
    pub fn log(&self, entry: &AuditEntry) -> BookkeeperResult<()> {
        let mut line = serde_json::to_string(entry)
            .map_err(|e| BookkeeperError::Json(format!("Failed to serialize audit entry: {}", e)))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| {
                BookkeeperError::Io(format!(
                    "Failed to open audit log '{}': {}",
                    self.log_path.display(),
                    e
                ))
            })?;

        file.write_all(line.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| BookkeeperError::Io(format!("Failed to write audit entry: {}", e)))
    }

    /// Every entry, oldest first
    pub fn read_all(&self) -> BookkeeperResult<Vec<AuditEntry>> {
        let mut entries = Vec::new();
        self.for_each_entry(|entry| entries.push(entry))?;
        Ok(entries)
    }

    /// The last `count` entries, oldest first
    ///
    /// Only `count` entries are held while the file is scanned.
    pub fn read_recent(&self, count: usize) -> BookkeeperResult<Vec<AuditEntry>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let mut tail = VecDeque::with_capacity(count);
        self.for_each_entry(|entry| {
            if tail.len() == count {
                tail.pop_front();
            }
            tail.push_back(entry);
        })?;
        Ok(tail.into())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    // A missing file is an empty history. Blank lines are skipped; any other
    // line that does not parse is an error naming its line number.
    fn for_each_entry(&self, mut f: impl FnMut(AuditEntry)) -> BookkeeperResult<()> {
        if !self.log_path.exists() {
            return Ok(());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| BookkeeperError::Io(format!("Failed to open audit log: {}", e)))?;

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line_num = index + 1;
            let line = line.map_err(|e| {
                BookkeeperError::Io(format!("Failed to read audit log line {}: {}", line_num, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let entry = serde_json::from_str(&line).map_err(|e| {
                BookkeeperError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num, e
                ))
            })?;
            f(entry);
        }

        Ok(())
    }
}
