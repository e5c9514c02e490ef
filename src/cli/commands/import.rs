//! Import command implementation.
//!
//! Resolves the run configuration, then drives the import through either the
//! external writer or, with `--dry-run`, a writer that only describes what it
//! would run. Each invocation line is printed before the writer starts, on
//! stderr when stdout carries JSON.

use std::io;
use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Serialize;

use crate::cli::ImportArgs;
use crate::config::{resolve_prefix, resolve_root, resolve_writer};
use crate::error::Result;
use crate::import::{
    ChildStdout, DryRunWriter, ExternalWriter, ImportReport, Importer, Manifest, WalkOptions,
    Writer, check_root,
};
use crate::model::ImportSession;

/// Global output flags as seen by the import command.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputMode {
    pub json: bool,
    pub quiet: bool,
    pub dry_run: bool,
}

#[derive(Serialize)]
struct ImportOutput<'a> {
    success: bool,
    imported: usize,
    #[serde(flatten)]
    report: &'a ImportReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    manifest: Option<String>,
}

/// Execute the import command.
///
/// # Errors
///
/// Returns the first error of the run. Files imported before it stay imported.
pub fn execute(args: &ImportArgs, mode: OutputMode) -> Result<()> {
    let root = resolve_root(args.dir.as_deref(), io::stdin().lock(), io::stderr())?;
    let prefix = resolve_prefix(args.prefix.as_deref(), args.no_prefix)?;
    let program = resolve_writer(Some(args.writer.as_path()));
    let walk = WalkOptions {
        follow_links: args.follow_links,
    };

    let session = ImportSession::new(root, prefix);

    let report = if mode.dry_run {
        let mut writer = DryRunWriter::new(&program);
        run(session, &mut writer, walk, None, mode)?
    } else {
        let stdout = if mode.json {
            ChildStdout::Stderr
        } else {
            ChildStdout::Inherit
        };
        let mut writer = ExternalWriter::new(&program).with_stdout(stdout);
        run(session, &mut writer, walk, args.manifest.as_deref(), mode)?
    };

    print_report(&report, args.manifest.as_deref(), mode)
}

fn run<W: Writer>(
    session: ImportSession,
    writer: &mut W,
    walk: WalkOptions,
    manifest: Option<&Path>,
    mode: OutputMode,
) -> Result<ImportReport> {
    // A bad root must fail before the manifest touches the filesystem.
    check_root(session.root())?;

    let mut importer = Importer::new(session, writer).with_walk_options(walk);
    if let Some(path) = manifest {
        importer = importer.with_manifest(Manifest::open(path)?);
    }

    importer.run_with(|_, invocation| {
        if mode.quiet {
            return;
        }
        if mode.json {
            eprintln!("Execute: {invocation}");
        } else {
            println!("Execute: {invocation}");
        }
    })
}

fn print_report(report: &ImportReport, manifest: Option<&Path>, mode: OutputMode) -> Result<()> {
    let manifest = manifest
        .filter(|_| !report.dry_run)
        .map(PathBuf::from);

    if mode.json {
        let output = ImportOutput {
            success: true,
            imported: report.imported(),
            report,
            manifest: manifest.map(|p| p.display().to_string()),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if mode.quiet {
        return Ok(());
    }

    println!();
    if report.units.is_empty() {
        println!("{}", format!("No files found under {}", report.root.display()).dimmed());
        return Ok(());
    }

    let count = report.imported();
    let noun = if count == 1 { "file" } else { "files" };
    if report.dry_run {
        println!(
            "{} {count} {noun} would be imported from {}",
            "Dry run:".yellow().bold(),
            report.root.display()
        );
    } else {
        println!(
            "{} {count} {noun} from {}",
            "Imported".green().bold(),
            report.root.display()
        );
    }

    if let (Some(first), Some(last)) = (report.units.first(), report.units.last()) {
        println!("  Keys:     {} .. {}", first.key, last.key);
    }
    if let Some(prefix) = &report.prefix {
        println!("  Prefix:   {prefix}");
    }
    if let Some(path) = manifest {
        println!("  Manifest: {}", path.display());
    }

    Ok(())
}
