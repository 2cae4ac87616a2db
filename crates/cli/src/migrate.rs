//! CLI migrate-file subcommand: migrate one document and print the result.
//!
//! The file on disk is not modified.

use std::path::Path;
use std::process;

use originport_core::{Diagnostics, Trace};

use crate::document::{read_document, to_pretty_string};
use crate::pack::DocumentKind;
use crate::setup::Toolkit;
use crate::upgrade::migrate;
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_migrate_file(
    file: &Path,
    kind: DocumentKind,
    namespace: Option<&str>,
    toolkit: &Toolkit,
    output: OutputFormat,
    quiet: bool,
) {
    let mut doc = match read_document(file) {
        Ok(v) => v,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let namespace = namespace
        .map(str::to_string)
        .or_else(|| namespace_from_path(file));
    let mut trace = Trace::new(file.display().to_string());
    if let Some(ns) = namespace {
        trace = trace.with_namespace(ns);
    }

    let sink = Diagnostics::new();
    let engine = toolkit.engine(&sink);
    if let Err(e) = migrate(&engine, &trace, kind, &mut doc) {
        report_error(&e.to_string(), output, quiet);
        process::exit(1);
    }

    match output {
        OutputFormat::Json => {
            let result = serde_json::json!({
                "document": doc,
                "diagnostics": sink.take(),
            });
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    report_error(&format!("serialization: {}", e), output, quiet);
                    process::exit(1);
                }
            }
        }
        OutputFormat::Text => match to_pretty_string(&doc) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                report_error(&format!("error serializing result: {}", e), output, quiet);
                process::exit(1);
            }
        },
    }
}

/// The `<ns>` of a `.../data/<ns>/...` path, if the file sits inside a pack.
fn namespace_from_path(file: &Path) -> Option<String> {
    let parts: Vec<&str> = file
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();
    let data = parts.iter().rposition(|p| *p == "data")?;
    (data + 2 < parts.len()).then(|| parts[data + 1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_is_taken_from_pack_layout() {
        assert_eq!(
            namespace_from_path(Path::new("pack/data/example/powers/claws.json")),
            Some("example".to_string())
        );
        assert_eq!(namespace_from_path(Path::new("claws.json")), None);
    }
}
