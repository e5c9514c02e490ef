//! JSONL import manifest.
//!
//! With `--manifest FILE`, each unit that the writer stored successfully is
//! appended as one JSON line and synced to disk before the next unit starts.
//! There is no rollback, so after an aborted run the manifest lists exactly
//! the keys that made it into the store.
//!
//! ```json
//! {"key":"3f2a__1","path":"docs/a.txt","prefix":"3f2a","imported_at":"2025-01-20T10:00:00Z"}
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ImportUnit;

/// One imported unit as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    /// Store key
    pub key: String,
    /// Source file path (lossy UTF-8)
    pub path: String,
    /// Session prefix, `None` for unprefixed `file_N` keys
    pub prefix: Option<String>,
    /// RFC 3339 timestamp of the successful write
    pub imported_at: String,
}

impl ManifestRecord {
    /// Record for `unit`, stamped now.
    #[must_use]
    pub fn new(unit: &ImportUnit, prefix: Option<&str>) -> Self {
        Self {
            key: unit.key.clone(),
            path: unit.source_path.to_string_lossy().into_owned(),
            prefix: prefix.map(String::from),
            imported_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Append-only manifest file.
#[derive(Debug)]
pub struct Manifest {
    file: File,
}

impl Manifest {
    /// Open `path` for appending, creating it and its parent directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self { file })
    }

    /// Append one record and sync it.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn append(&mut self, record: &ManifestRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        writeln!(self.file, "{line}")?;
        self.file.sync_all()?;
        Ok(())
    }
}

/// Read every record from a manifest file.
///
/// Blank lines are skipped. A malformed line fails with its 1-based number.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is not a record.
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record = serde_json::from_str(&line).map_err(|e| {
            Error::InvalidArgument(format!(
                "{}: invalid manifest record at line {}: {e}",
                path.display(),
                line_num + 1
            ))
        })?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_append_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("manifest.jsonl");

        let mut manifest = Manifest::open(&path).unwrap();
        for (key, file) in [("p__1", "a.txt"), ("p__2", "b/c.txt")] {
            let unit = ImportUnit::file(key.to_string(), PathBuf::from(file));
            manifest.append(&ManifestRecord::new(&unit, Some("p"))).unwrap();
        }

        let records = read_manifest(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, "p__1");
        assert_eq!(records[1].path, "b/c.txt");
        assert_eq!(records[1].prefix.as_deref(), Some("p"));
        assert!(chrono::DateTime::parse_from_rfc3339(&records[0].imported_at).is_ok());
    }

    #[test]
    fn test_reopen_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manifest.jsonl");
        let unit = ImportUnit::file("file_1".to_string(), PathBuf::from("a.txt"));

        Manifest::open(&path).unwrap().append(&ManifestRecord::new(&unit, None)).unwrap();
        Manifest::open(&path).unwrap().append(&ManifestRecord::new(&unit, None)).unwrap();

        assert_eq!(read_manifest(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_line_reports_line_number() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manifest.jsonl");
        fs::write(&path, "\n{\"not\":\"a record\"}\n").unwrap();

        let err = read_manifest(&path).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
