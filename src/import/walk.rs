//! Recursive file discovery.
//!
//! Walks the root depth-first and yields every regular file at any depth.
//! Directories are never yielded. Entries within a directory are visited in
//! file-name order so that counter assignment is reproducible on an
//! unchanged tree.
//!
//! By default a symlink to a regular file is yielded like the file itself,
//! while symlinked directories are not descended into and dangling links are
//! skipped. With [`WalkOptions::follow_links`], directory links are entered
//! too; `walkdir` then detects cycles and the walk fails with a path error
//! instead of looping.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Traversal options.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    /// Descend into symlinked directories
    pub follow_links: bool,
}

/// Check that `root` exists, is a directory and can be listed.
///
/// # Errors
///
/// Returns `PathNotFound`, `PathNotDirectory` or `PathUnreadable`.
pub fn check_root(root: &Path) -> Result<()> {
    let metadata = fs::metadata(root).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::PathNotFound {
            path: root.to_path_buf(),
        },
        _ => Error::PathUnreadable {
            path: root.to_path_buf(),
            source: e,
        },
    })?;

    if !metadata.is_dir() {
        return Err(Error::PathNotDirectory {
            path: root.to_path_buf(),
        });
    }

    fs::read_dir(root).map_err(|e| Error::PathUnreadable {
        path: root.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Lazy iterator over the regular files below a root.
///
/// Yields `Err` once for the first traversal failure. The caller is
/// expected to stop there.
pub struct FileWalker {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

impl FileWalker {
    /// Validate `root` and start walking it.
    ///
    /// # Errors
    ///
    /// Fails before yielding anything if the root is unusable (see [`check_root`]).
    pub fn new(root: &Path, options: WalkOptions) -> Result<Self> {
        check_root(root)?;

        let inner = WalkDir::new(root)
            .follow_links(options.follow_links)
            .sort_by_file_name()
            .into_iter();

        Ok(Self {
            root: root.to_path_buf(),
            inner,
        })
    }

    fn walk_error(&self, err: walkdir::Error) -> Error {
        let path = err
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if let Some(ancestor) = err.loop_ancestor() {
            return Error::PathUnreadable {
                path,
                source: io::Error::other(format!(
                    "filesystem loop back to {}",
                    ancestor.display()
                )),
            };
        }

        Error::PathUnreadable {
            path,
            source: err.into(),
        }
    }
}

impl Iterator for FileWalker {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(self.walk_error(err))),
            };

            let file_type = entry.file_type();
            if file_type.is_file() {
                return Some(Ok(entry.into_path()));
            }

            if file_type.is_symlink() {
                match fs::metadata(entry.path()) {
                    Ok(target) if target.is_file() => return Some(Ok(entry.into_path())),
                    Ok(target) if target.is_dir() => {
                        debug!(path = %entry.path().display(), "Not entering symlinked directory");
                    }
                    Ok(_) => {
                        debug!(path = %entry.path().display(), "Skipping symlink to special file");
                    }
                    Err(e) => {
                        debug!(path = %entry.path().display(), "Skipping dangling symlink: {e}");
                    }
                }
            } else if !file_type.is_dir() {
                debug!(path = %entry.path().display(), "Skipping special file");
            } else {
                trace!(path = %entry.path().display(), "Entering directory");
            }
        }
    }
}

/// Collect every regular file below `root`.
///
/// Convenience for callers that want the whole list up front; the driver
/// itself consumes [`FileWalker`] lazily.
///
/// # Errors
///
/// Returns the first path error encountered.
pub fn collect_files(root: &Path, options: WalkOptions) -> Result<Vec<PathBuf>> {
    FileWalker::new(root, options)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_tree(dir: &Path) {
        fs::write(dir.join("a.txt"), "a").unwrap();
        fs::create_dir_all(dir.join("b")).unwrap();
        fs::write(dir.join("b").join("c.txt"), "c").unwrap();
        fs::write(dir.join("b").join("d.txt"), "d").unwrap();
    }

    #[test]
    fn test_finds_files_at_every_depth() {
        let temp_dir = TempDir::new().unwrap();
        make_tree(temp_dir.path());
        fs::create_dir_all(temp_dir.path().join("x/y/z")).unwrap();
        fs::write(temp_dir.path().join("x/y/z/deep.bin"), [0u8, 1, 2]).unwrap();

        let files = collect_files(temp_dir.path(), WalkOptions::default()).unwrap();

        assert_eq!(files.len(), 4);
        assert!(files.iter().all(|p| p.is_file()));
        assert!(files.iter().any(|p| p.ends_with("x/y/z/deep.bin")));
    }

    #[test]
    fn test_order_is_sorted_depth_first() {
        let temp_dir = TempDir::new().unwrap();
        make_tree(temp_dir.path());

        let files = collect_files(temp_dir.path(), WalkOptions::default()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(temp_dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b").join("c.txt"),
                PathBuf::from("b").join("d.txt"),
            ]
        );
    }

    #[test]
    fn test_empty_directories_yield_nothing() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("empty/nested")).unwrap();

        let files = collect_files(temp_dir.path(), WalkOptions::default()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let result = FileWalker::new(&missing, WalkOptions::default());
        assert!(matches!(result, Err(Error::PathNotFound { .. })));
    }

    #[test]
    fn test_root_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.txt");
        fs::write(&file, "a").unwrap();

        let result = FileWalker::new(&file, WalkOptions::default());
        assert!(matches!(result, Err(Error::PathNotDirectory { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_symlinks_yielded_directory_symlinks_not_entered() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let tree = temp_dir.path().join("tree");
        fs::create_dir_all(&tree).unwrap();
        make_tree(&tree);
        fs::write(temp_dir.path().join("outside.txt"), "o").unwrap();
        symlink(temp_dir.path().join("outside.txt"), tree.join("link.txt")).unwrap();
        symlink(tree.join("b"), tree.join("linked_dir")).unwrap();
        symlink(temp_dir.path().join("gone.txt"), tree.join("dangling.txt")).unwrap();

        let files = collect_files(&tree, WalkOptions::default()).unwrap();
        assert_eq!(files.len(), 4);
        assert!(files.iter().any(|p| p.ends_with("link.txt")));
        assert!(!files.iter().any(|p| p.starts_with(tree.join("linked_dir"))));
        assert!(!files.iter().any(|p| p.ends_with("dangling.txt")));
    }

    #[cfg(unix)]
    #[test]
    fn test_followed_walk_covers_linked_directories() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        make_tree(temp_dir.path());
        symlink(temp_dir.path().join("a.txt"), temp_dir.path().join("link.txt")).unwrap();
        symlink(temp_dir.path().join("b"), temp_dir.path().join("linked_dir")).unwrap();

        let files = collect_files(temp_dir.path(), WalkOptions::default()).unwrap();
        assert_eq!(files.len(), 4);

        let followed = collect_files(temp_dir.path(), WalkOptions { follow_links: true }).unwrap();
        assert_eq!(followed.len(), 6);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_is_a_path_error_when_following() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("sub/f.txt"), "f").unwrap();
        symlink(temp_dir.path(), temp_dir.path().join("sub/back")).unwrap();

        let result = collect_files(temp_dir.path(), WalkOptions { follow_links: true });
        assert!(matches!(result, Err(Error::PathUnreadable { .. })));

        let files = collect_files(temp_dir.path(), WalkOptions::default()).unwrap();
        assert_eq!(files.len(), 1);
    }
}
