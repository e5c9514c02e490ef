//! Version command implementation.

use crate::error::Result;
use crate::import::DEFAULT_WRITER;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    build: &'a str,
    protocol: &'a str,
    default_writer: &'a str,
}

/// Store protocol the generated keys and writer arguments target.
const PROTOCOL: &str = "easykey-v1";

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let build = if cfg!(debug_assertions) { "dev" } else { "release" };

    if json {
        let output = VersionOutput {
            version,
            build,
            protocol: PROTOCOL,
            default_writer: DEFAULT_WRITER,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("eki version {version} ({build}, {PROTOCOL})");
    println!("default writer: {DEFAULT_WRITER}");
    Ok(())
}
