//! CLI upgrade subcommand: migrate every power and origin of a datapack in place.

use std::path::Path;
use std::process;

use originport_core::{
    Diagnostic, DiagnosticSink, Diagnostics, Engine, MigrateError, Severity, Trace,
};
use originport_rules::{migrate_origin_document, migrate_power_document};
use serde::Serialize;
use serde_json::Value;

use crate::document::{read_document, write_document};
use crate::pack::{Datapack, Document, DocumentKind};
use crate::setup::Toolkit;
use crate::{report_error, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum FileStatus {
    Migrated,
    Failed,
}

#[derive(Debug, Serialize)]
pub(crate) struct FileOutcome {
    pub path: String,
    pub kind: DocumentKind,
    pub status: FileStatus,
}

#[derive(Debug, Serialize)]
pub(crate) struct Summary {
    pub files: usize,
    pub migrated: usize,
    pub errors: usize,
    pub warnings: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpgradeReport {
    pub files: Vec<FileOutcome>,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: Summary,
}

impl UpgradeReport {
    fn new(files: Vec<FileOutcome>, diagnostics: Vec<Diagnostic>) -> Self {
        let count = |s: Severity| diagnostics.iter().filter(|d| d.severity == s).count();
        let summary = Summary {
            files: files.len(),
            migrated: files
                .iter()
                .filter(|f| f.status == FileStatus::Migrated)
                .count(),
            errors: count(Severity::Error),
            warnings: count(Severity::Warning),
        };
        UpgradeReport {
            files,
            diagnostics,
            summary,
        }
    }
}

pub(crate) fn cmd_upgrade(pack_path: &Path, toolkit: &Toolkit, output: OutputFormat, quiet: bool) {
    let pack = match Datapack::open(pack_path) {
        Ok(p) => p,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    let report = match upgrade_pack(&pack, toolkit) {
        Ok(r) => r,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Json => {
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    report_error(&format!("serialization: {}", e), output, quiet);
                    process::exit(1);
                }
            }
        }
        OutputFormat::Text => {
            if !quiet {
                for d in &report.diagnostics {
                    println!("{}", d);
                }
            }
            println!(
                "{} files migrated, {} errors, {} warnings",
                report.summary.migrated, report.summary.errors, report.summary.warnings
            );
        }
    }
}

/// Migrate every namespace: powers, then origins, then folder renames.
pub(crate) fn upgrade_pack(
    pack: &Datapack,
    toolkit: &Toolkit,
) -> Result<UpgradeReport, crate::pack::PackError> {
    let sink = Diagnostics::new();
    let mut files = Vec::new();

    tracing::info!(pack = %pack.root().display(), "upgrading datapack");
    for namespace in pack.namespaces()? {
        for kind in [DocumentKind::Power, DocumentKind::Origin] {
            for doc in pack.documents(&namespace, kind)? {
                let status = upgrade_document(toolkit, &doc, &sink);
                files.push(FileOutcome {
                    path: doc.display,
                    kind,
                    status,
                });
            }
        }
        pack.rename_legacy_folders(&namespace, &sink);
    }

    Ok(UpgradeReport::new(files, sink.take()))
}

/// Failures stay scoped to the one file, which is left as it was on disk.
///
/// The document's diagnostics are only published once it has been written;
/// a failed file reports the failure and nothing it did not apply.
fn upgrade_document(toolkit: &Toolkit, doc: &Document, sink: &Diagnostics) -> FileStatus {
    let trace = doc.trace();
    let mut value = match read_document(&doc.path) {
        Ok(v) => v,
        Err(msg) => {
            sink.emit(Diagnostic::new(Severity::Error, &trace, msg));
            return FileStatus::Failed;
        }
    };

    let pending = Diagnostics::buffered();
    let engine = toolkit.engine(&pending);
    if let Err(e) = migrate(&engine, &trace, doc.kind, &mut value) {
        let msg = format!("Skipped file: {}", e.reason());
        sink.emit(Diagnostic::new(Severity::Error, e.trace(), msg));
        return FileStatus::Failed;
    }

    match write_document(&doc.path, &value) {
        Ok(()) => {
            pending.publish(sink);
            FileStatus::Migrated
        }
        Err(msg) => {
            sink.emit(Diagnostic::new(Severity::Error, &trace, msg));
            FileStatus::Failed
        }
    }
}

pub(crate) fn migrate(
    engine: &Engine<'_>,
    trace: &Trace,
    kind: DocumentKind,
    value: &mut Value,
) -> Result<(), MigrateError> {
    match kind {
        DocumentKind::Power => migrate_power_document(engine, trace, value),
        DocumentKind::Origin => migrate_origin_document(engine, trace, value),
    }
}
