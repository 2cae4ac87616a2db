//! Reading and writing JSON documents.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

pub(crate) fn read_document(path: &Path) -> Result<Value, String> {
    let src = fs::read_to_string(path)
        .map_err(|e| format!("error reading file '{}': {}", path.display(), e))?;
    serde_json::from_str(&src)
        .map_err(|e| format!("error parsing JSON in '{}': {}", path.display(), e))
}

/// Pretty-print with 4-space indentation, keeping key order.
pub(crate) fn to_pretty_string(value: &Value) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub(crate) fn write_document(path: &Path, value: &Value) -> Result<(), String> {
    let text = to_pretty_string(value)
        .map_err(|e| format!("error serializing '{}': {}", path.display(), e))?;
    fs::write(path, text).map_err(|e| format!("error writing file '{}': {}", path.display(), e))
}
