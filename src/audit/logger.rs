//! Append-only audit log
//!
//! One JSON object per line, flushed after every write.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{CoinlogError, CoinlogResult};

use super::entry::AuditEntry;

/// Writes audit entries to `audit.log`
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry
    pub fn log(&self, entry: &AuditEntry) -> CoinlogResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append several entries with a single flush
    pub fn log_batch(&self, entries: &[AuditEntry]) -> CoinlogResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoinlogError::Io(format!("Failed to create log directory: {}", e)))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| CoinlogError::Io(format!("Failed to open audit log: {}", e)))?;

        for entry in entries {
            let json = serde_json::to_string(entry).map_err(|e| {
                CoinlogError::Json(format!("Failed to serialize audit entry: {}", e))
            })?;
            writeln!(file, "{}", json)
                .map_err(|e| CoinlogError::Io(format!("Failed to write audit entry: {}", e)))?;
        }

        file.flush()
            .map_err(|e| CoinlogError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Every entry, oldest first
    pub fn read_all(&self) -> CoinlogResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| CoinlogError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                CoinlogError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                CoinlogError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> CoinlogResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use serde_json::json;
    use tempfile::TempDir;

    fn logger() -> (TempDir, AuditLogger) {
        let dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(dir.path().join("audit.log"));
        (dir, logger)
    }

    fn created(id: &str) -> AuditEntry {
        AuditEntry::create(EntityType::Transaction, id, None, &json!({"id": id}))
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let (_dir, logger) = logger();
        assert!(logger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_entries_are_appended_as_lines() {
        let (_dir, logger) = logger();
        logger.log(&created("tx-00000001")).unwrap();
        logger
            .log_batch(&[created("tx-00000002"), created("tx-00000003")])
            .unwrap();

        let contents = std::fs::read_to_string(logger.path()).unwrap();
        assert_eq!(contents.lines().count(), 3);

        let entries = logger.read_all().unwrap();
        assert_eq!(entries[0].entity_id, "tx-00000001");
        assert_eq!(entries[2].operation, Operation::Create);
    }

    #[test]
    fn test_read_recent() {
        let (_dir, logger) = logger();
        for i in 0..5 {
            logger.log(&created(&format!("tx-0000000{}", i))).unwrap();
        }
        let recent = logger.read_recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].entity_id, "tx-00000003");
        assert_eq!(recent[1].entity_id, "tx-00000004");
    }
}
