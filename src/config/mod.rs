//! Configuration resolution.
//!
//! Effective settings for a run are resolved with the usual priority:
//! 1. Explicit command-line flag
//! 2. Environment variable (`EASYKEY_WRITER`, `EASYKEY_PREFIX`), bound by clap
//! 3. Built-in default
//!
//! The root directory has no default. When it is not given on the command
//! line the operator is prompted for it on standard input.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::import::{DEFAULT_WRITER, KeyPrefix};

/// Environment variable naming the write client.
pub const WRITER_ENV: &str = "EASYKEY_WRITER";

/// Environment variable holding a fixed key prefix.
pub const PREFIX_ENV: &str = "EASYKEY_PREFIX";

/// Prompt shown when no directory was passed.
pub const ROOT_PROMPT: &str = "Directory to traverse and get files: ";

/// Resolve the write client path.
///
/// Blank values fall through to [`DEFAULT_WRITER`].
#[must_use]
pub fn resolve_writer(explicit: Option<&Path>) -> PathBuf {
    explicit
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_WRITER), Path::to_path_buf)
}

/// Resolve the session key prefix.
///
/// - `no_prefix` wins and yields unprefixed `file_N` keys
/// - an explicit prefix is sanitized to the key grammar
/// - otherwise a random UUID-based prefix is generated
///
/// # Errors
///
/// Returns `InvalidPrefix` if an explicit prefix is blank.
pub fn resolve_prefix(explicit: Option<&str>, no_prefix: bool) -> Result<Option<KeyPrefix>> {
    if no_prefix {
        return Ok(None);
    }

    match explicit {
        Some(raw) => KeyPrefix::sanitize(raw).map(Some),
        None => Ok(Some(KeyPrefix::random())),
    }
}

/// Resolve the root directory, prompting on `input` if none was given.
///
/// The prompt is written to `prompt_out`. Only the line terminator is
/// stripped from the answer, so paths with surrounding spaces survive.
///
/// # Errors
///
/// Returns `InvalidArgument` for an empty answer or closed input, and `Io`
/// if the prompt cannot be written or the answer cannot be read.
pub fn resolve_root<R: BufRead, W: Write>(
    explicit: Option<&Path>,
    mut input: R,
    mut prompt_out: W,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    write!(prompt_out, "{ROOT_PROMPT}")?;
    prompt_out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Error::InvalidArgument(
            "no directory given and standard input is closed".to_string(),
        ));
    }

    let answer = line.trim_end_matches(['\n', '\r']);
    if answer.trim().is_empty() {
        return Err(Error::InvalidArgument("directory must not be empty".to_string()));
    }

    Ok(PathBuf::from(answer))
}
