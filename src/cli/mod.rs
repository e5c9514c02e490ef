//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{PREFIX_ENV, WRITER_ENV};

pub mod commands;

/// Output format for command results.
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON (same as --json)
    Json,
}

/// EasyKey import - load a directory tree into an EasyKey store
#[derive(Parser, Debug)]
#[command(name = "eki", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format (text, json)
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,

    /// Print the writer invocations without running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import every file below a directory, one key per file
    Import(ImportArgs),

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Import
// ============================================================================

#[derive(Args, Debug, Clone, Default)]
pub struct ImportArgs {
    /// Directory to import (prompted for when omitted)
    pub dir: Option<PathBuf>,

    /// EasyKey write client to run per file
    #[arg(long, env = WRITER_ENV, default_value = crate::import::DEFAULT_WRITER)]
    pub writer: PathBuf,

    /// Key prefix for this run (default: random UUID)
    #[arg(long, env = PREFIX_ENV)]
    pub prefix: Option<String>,

    /// Use plain `file_N` keys without a session prefix (overrides --prefix)
    #[arg(long)]
    pub no_prefix: bool,

    /// Follow symlinks to files and directories
    #[arg(long)]
    pub follow_links: bool,

    /// Append a JSONL record per imported file to this path
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_import_flags() {
        let cli = Cli::try_parse_from([
            "eki",
            "--dry-run",
            "import",
            "data",
            "--writer",
            "/bin/ek-write",
            "--prefix",
            "batch-1",
            "--follow-links",
        ])
        .unwrap();

        assert!(cli.dry_run);
        let Commands::Import(args) = cli.command else {
            panic!("expected import command");
        };
        assert_eq!(args.dir, Some(PathBuf::from("data")));
        assert_eq!(args.writer, PathBuf::from("/bin/ek-write"));
        assert_eq!(args.prefix.as_deref(), Some("batch-1"));
        assert!(args.follow_links);
        assert!(!args.no_prefix);
    }

    #[test]
    fn test_dir_is_optional() {
        let cli = Cli::try_parse_from(["eki", "import", "--no-prefix"]).unwrap();
        let Commands::Import(args) = cli.command else {
            panic!("expected import command");
        };
        assert!(args.dir.is_none());
        assert!(args.no_prefix);
    }
}
