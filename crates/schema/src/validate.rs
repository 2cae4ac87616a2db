//! Meta-schema validation for schema catalogues supplied from outside the binary.

use serde_json::Value;

static CATALOG_SCHEMA_STR: &str = include_str!("../data/catalog.schema.json");

/// Validate a catalogue document against the embedded meta-schema.
///
/// Returns every validation failure as a message string.
pub fn validate_catalog(doc: &Value) -> Result<(), Vec<String>> {
    let schema: Value = serde_json::from_str(CATALOG_SCHEMA_STR)
        .map_err(|e| vec![format!("internal error: embedded meta-schema: {}", e)])?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| vec![format!("internal error: compiling meta-schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(doc)
        .map(|e| format!("{}", e))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
