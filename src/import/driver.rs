//! The import driver.
//!
//! Walks the session root and hands each discovered file to the writer, one
//! at a time. The first failure of any kind ends the run: nothing after the
//! failing unit is written, and nothing before it is undone.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info};

use crate::error::Result;
use crate::import::manifest::{Manifest, ManifestRecord};
use crate::import::walk::{FileWalker, WalkOptions};
use crate::import::writer::Writer;
use crate::model::{ImportSession, ImportUnit};

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    /// Root directory that was walked.
    #[serde(serialize_with = "serialize_root")]
    pub root: PathBuf,
    /// Prefix used for keys, if any.
    pub prefix: Option<String>,
    /// Whether the writer only described invocations.
    pub dry_run: bool,
    /// Units in the order they were written.
    pub units: Vec<ImportUnit>,
}

impl ImportReport {
    /// Number of units written.
    #[must_use]
    pub fn imported(&self) -> usize {
        self.units.len()
    }
}

fn serialize_root<S: serde::Serializer>(
    root: &Path,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&root.to_string_lossy())
}

/// Drives one import session through a writer.
pub struct Importer<'a, W: Writer> {
    session: ImportSession,
    writer: &'a mut W,
    walk: WalkOptions,
    manifest: Option<Manifest>,
}

impl<'a, W: Writer> Importer<'a, W> {
    /// Create an importer for `session` writing through `writer`.
    #[must_use]
    pub fn new(session: ImportSession, writer: &'a mut W) -> Self {
        Self {
            session,
            writer,
            walk: WalkOptions::default(),
            manifest: None,
        }
    }

    /// Set traversal options.
    #[must_use]
    pub fn with_walk_options(mut self, walk: WalkOptions) -> Self {
        self.walk = walk;
        self
    }

    /// Record each successful write in `manifest`.
    ///
    /// Ignored for dry-run writers.
    #[must_use]
    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// Run the import.
    ///
    /// # Errors
    ///
    /// See [`Importer::run_with`].
    pub fn run(self) -> Result<ImportReport> {
        self.run_with(|_, _| {})
    }

    /// Run the import, calling `before_write` with each unit and its exact
    /// invocation line just before the writer is called.
    ///
    /// # Errors
    ///
    /// Fails before any write if the root is unusable. Otherwise fails on the
    /// first traversal error, launch failure, write failure or manifest
    /// error, after which no further unit is written.
    pub fn run_with<F>(mut self, mut before_write: F) -> Result<ImportReport>
    where
        F: FnMut(&ImportUnit, &str),
    {
        let dry_run = self.writer.is_dry_run();
        let walker = FileWalker::new(self.session.root(), self.walk)?;
        let prefix = self.session.prefix().map(|p| p.as_str().to_string());

        info!(
            root = %self.session.root().display(),
            prefix = prefix.as_deref().unwrap_or("<none>"),
            dry_run,
            "Starting import"
        );

        let mut units = Vec::new();

        for path in walker {
            let path = match path {
                Ok(path) => path,
                Err(e) => {
                    error!(imported = units.len(), "Traversal failed: {e}");
                    return Err(e);
                }
            };

            let unit = self.session.next_unit(path);
            let invocation = self.writer.invocation(&unit);

            info!(key = %unit.key, path = %unit.source_path.display(), "Execute: {invocation}");
            before_write(&unit, &invocation);

            if let Err(e) = self.writer.write(&unit) {
                error!(key = %unit.key, imported = units.len(), "Import aborted: {e}");
                return Err(e);
            }

            if !dry_run {
                if let Some(manifest) = self.manifest.as_mut() {
                    manifest.append(&ManifestRecord::new(&unit, prefix.as_deref()))?;
                }
            }

            units.push(unit);
        }

        info!(imported = units.len(), "Import complete");

        Ok(ImportReport {
            root: self.session.root().to_path_buf(),
            prefix,
            dry_run,
            units,
        })
    }
}
