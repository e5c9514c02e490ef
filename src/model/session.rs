//! Import session model.
//!
//! A session owns the counter that numbers units. The counter starts at 1,
//! grows by one per discovered file and is never reused, so keys are unique
//! within a session by construction.

use std::path::{Path, PathBuf};

use crate::import::key::{KeyPrefix, derive_key};
use crate::model::unit::ImportUnit;

/// One run of the driver over one root directory.
#[derive(Debug, Clone)]
pub struct ImportSession {
    root: PathBuf,
    prefix: Option<KeyPrefix>,
    counter: u64,
}

impl ImportSession {
    /// Start a session over `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, prefix: Option<KeyPrefix>) -> Self {
        Self {
            root: root.into(),
            prefix,
            counter: 0,
        }
    }

    /// Root directory of this session.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Key prefix in effect, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&KeyPrefix> {
        self.prefix.as_ref()
    }

    /// Number of units handed out so far.
    #[must_use]
    pub const fn units_assigned(&self) -> u64 {
        self.counter
    }

    /// Assign the next key to a discovered file.
    pub fn next_unit(&mut self, source_path: PathBuf) -> ImportUnit {
        self.counter += 1;
        let key = derive_key(self.prefix.as_ref(), self.counter);
        ImportUnit::file(key, source_path)
    }
}
