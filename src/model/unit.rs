//! Import unit model.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

/// One file-to-key write.
///
/// Units are created by [`ImportSession::next_unit`](super::ImportSession::next_unit)
/// as files are discovered and live only for their single write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportUnit {
    /// Store key, unique within the session
    pub key: String,

    /// Path to the file whose content is stored under `key`
    #[serde(rename = "path", serialize_with = "serialize_lossy")]
    pub source_path: PathBuf,

    /// Whether the writer should read `source_path` as a file
    #[serde(skip)]
    pub is_file: bool,
}

impl ImportUnit {
    /// Create a file-mode unit.
    #[must_use]
    pub fn file(key: String, source_path: PathBuf) -> Self {
        Self {
            key,
            source_path,
            is_file: true,
        }
    }

    /// The `--file=` flag for this unit.
    #[must_use]
    pub const fn file_flag(&self) -> &'static str {
        if self.is_file { "--file=yes" } else { "--file=no" }
    }

    /// Positional arguments for the writer: `KEY PATH --file=yes`.
    #[must_use]
    pub fn writer_args(&self) -> [OsString; 3] {
        [
            OsString::from(&self.key),
            self.source_path.clone().into_os_string(),
            OsString::from(self.file_flag()),
        ]
    }
}

/// Non-UTF-8 path components are replaced with U+FFFD, never rejected.
fn serialize_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}
