use std::path::Path;
use std::process;

use originport_schema::validate_catalog;

use crate::document::read_document;
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_check_schema(file: &Path, output: OutputFormat, quiet: bool) {
    let doc = match read_document(file) {
        Ok(v) => v,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    match validate_catalog(&doc) {
        Ok(()) => {
            if !quiet {
                match output {
                    OutputFormat::Text => println!("valid"),
                    OutputFormat::Json => println!("{{\"valid\": true}}"),
                }
            }
        }
        Err(errors) => {
            match output {
                OutputFormat::Text => {
                    if !quiet {
                        eprintln!("invalid schema catalogue");
                        for e in &errors {
                            eprintln!("  {}", e);
                        }
                    }
                }
                OutputFormat::Json => {
                    let result = serde_json::json!({
                        "valid": false,
                        "errors": errors,
                    });
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&result).unwrap_or_default()
                    );
                }
            }
            process::exit(1);
        }
    }
}
