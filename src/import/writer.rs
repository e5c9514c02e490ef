//! The writer seam.
//!
//! A [`Writer`] performs the store write for one unit and blocks until it is
//! done. [`ExternalWriter`] spawns the EasyKey write client as a child
//! process and waits for it; [`DryRunWriter`] only reports what would run.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::ImportUnit;

/// Default location of the EasyKey write client.
pub const DEFAULT_WRITER: &str = "./cli-write.out";

/// Performs one blocking store write per unit.
pub trait Writer {
    /// The exact invocation that `write` performs for `unit`, for logging.
    fn invocation(&self, unit: &ImportUnit) -> String;

    /// Store `unit`, returning only once the write has finished.
    ///
    /// # Errors
    ///
    /// Returns `Invocation` if the write could not be started and
    /// `WriteFailure` if it ran and reported failure.
    fn write(&mut self, unit: &ImportUnit) -> Result<()>;

    /// Whether writes actually reach the store.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Where the child's standard output goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChildStdout {
    /// Share the driver's stdout
    #[default]
    Inherit,
    /// Send it to the driver's stderr, keeping stdout machine-readable
    Stderr,
}

/// Runs `PROGRAM KEY PATH --file=yes` as a child process per unit.
#[derive(Debug, Clone)]
pub struct ExternalWriter {
    program: PathBuf,
    stdout: ChildStdout,
}

impl ExternalWriter {
    /// Writer that runs `program`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            stdout: ChildStdout::Inherit,
        }
    }

    /// Route the child's stdout.
    #[must_use]
    pub fn with_stdout(mut self, stdout: ChildStdout) -> Self {
        self.stdout = stdout;
        self
    }

    fn command(&self, unit: &ImportUnit) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(unit.writer_args()).stdin(Stdio::null());
        if self.stdout == ChildStdout::Stderr {
            cmd.stdout(Stdio::from(io::stderr()));
        }
        cmd
    }
}

impl Writer for ExternalWriter {
    fn invocation(&self, unit: &ImportUnit) -> String {
        format_invocation(&self.program, unit)
    }

    fn write(&mut self, unit: &ImportUnit) -> Result<()> {
        let mut child = self
            .command(unit)
            .spawn()
            .map_err(|source| Error::Invocation {
                program: self.program.clone(),
                key: unit.key.clone(),
                source,
            })?;

        let pid = child.id();
        debug!(pid, key = %unit.key, "Writer started");

        // Blocks until the writer exits; no other child is started meanwhile.
        let status = child
            .wait()
            .map_err(|e| lost_writer(unit, pid, &e))?;

        if status.success() {
            debug!(pid, key = %unit.key, "Writer finished");
            return Ok(());
        }

        Err(Error::WriteFailure {
            key: unit.key.clone(),
            path: unit.source_path.clone(),
            pid: Some(pid),
            status: status.to_string(),
        })
    }
}

/// A spawned writer whose exit status could not be collected.
fn lost_writer(unit: &ImportUnit, pid: u32, err: &io::Error) -> Error {
    Error::WriteFailure {
        key: unit.key.clone(),
        path: unit.source_path.clone(),
        pid: Some(pid),
        status: format!("wait failed: {err}"),
    }
}

/// Reports invocations without running anything.
#[derive(Debug, Clone)]
pub struct DryRunWriter {
    program: PathBuf,
}

impl DryRunWriter {
    /// Dry-run writer that describes invocations of `program`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Writer for DryRunWriter {
    fn invocation(&self, unit: &ImportUnit) -> String {
        format_invocation(&self.program, unit)
    }

    fn write(&mut self, _unit: &ImportUnit) -> Result<()> {
        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

/// `PROGRAM KEY PATH FLAG`, space separated.
fn format_invocation(program: &Path, unit: &ImportUnit) -> String {
    format!(
        "{} {} {} {}",
        program.display(),
        unit.key,
        unit.source_path.display(),
        unit.file_flag()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(key: &str, path: &str) -> ImportUnit {
        ImportUnit::file(key.to_string(), PathBuf::from(path))
    }

    #[test]
    fn test_invocation_line() {
        let writer = ExternalWriter::new("./cli-write.out");
        assert_eq!(
            writer.invocation(&unit("file_1", "docs/a.txt")),
            "./cli-write.out file_1 docs/a.txt --file=yes"
        );
    }

    #[test]
    fn test_dry_run_never_fails() {
        let mut writer = DryRunWriter::new("/does/not/exist");
        assert!(writer.is_dry_run());
        assert!(writer.write(&unit("file_1", "a.txt")).is_ok());
    }

    #[test]
    fn test_missing_program_is_invocation_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut writer = ExternalWriter::new(temp_dir.path().join("no-such-writer"));

        let err = writer.write(&unit("file_1", "a.txt")).unwrap_err();
        match err {
            Error::Invocation { key, source, .. } => {
                assert_eq!(key, "file_1");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wait_failure_keeps_key() {
        let err = lost_writer(
            &unit("p__4", "d.txt"),
            4242,
            &io::Error::from(io::ErrorKind::Interrupted),
        );

        assert_eq!(err.failed_key(), Some("p__4"));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("pid 4242"));
        assert!(err.to_string().contains("wait failed"));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_maps_to_result() {
        let mut ok = ExternalWriter::new("true");
        assert!(ok.write(&unit("file_1", "a.txt")).is_ok());

        let mut failing = ExternalWriter::new("false");
        let err = failing.write(&unit("file_2", "b.txt")).unwrap_err();
        match err {
            Error::WriteFailure { key, pid, status, .. } => {
                assert_eq!(key, "file_2");
                assert!(pid.is_some());
                assert!(status.contains('1'));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
