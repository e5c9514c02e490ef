//! Directory import into an EasyKey store.
//!
//! - **Walk**: every regular file below the root, depth-first, sorted by name
//! - **Key**: `{prefix}__{n}` or `file_{n}`, restricted to `[A-Za-z0-9_]`
//! - **Write**: one blocking `writer KEY PATH --file=yes` per file
//! - **Manifest**: optional JSONL record of what was written
//!
//! # Example
//!
//! ```ignore
//! use ekimport::import::{ExternalWriter, Importer, KeyPrefix};
//! use ekimport::model::ImportSession;
//!
//! let session = ImportSession::new("./docs", Some(KeyPrefix::random()));
//! let mut writer = ExternalWriter::new("./cli-write.out");
//! let report = Importer::new(session, &mut writer).run()?;
//! println!("{} files imported", report.imported());
//! ```

mod driver;
pub mod key;
mod manifest;
mod walk;
mod writer;

pub use driver::{ImportReport, Importer};
pub use key::{KeyPrefix, derive_key, is_valid_key};
pub use manifest::{Manifest, ManifestRecord, read_manifest};
pub use walk::{FileWalker, WalkOptions, check_root, collect_files};
pub use writer::{ChildStdout, DEFAULT_WRITER, DryRunWriter, ExternalWriter, Writer};
