//! The origin document driver.

use originport_core::{Engine, MigrateError, Trace};
use serde_json::{json, Value};

/// Migrate an origin file in place. Only the icon changed shape.
pub fn migrate_origin_document(
    engine: &Engine<'_>,
    trace: &Trace,
    doc: &mut Value,
) -> Result<(), MigrateError> {
    let Some(origin) = doc.as_object_mut() else {
        engine.error(trace, "Origin file is not a JSON object");
        return Ok(());
    };
    let Some(icon) = origin.get_mut("icon") else {
        return Ok(());
    };

    let trace = trace.field("icon");
    if let Some(item) = icon.as_str().map(str::to_string) {
        *icon = json!({ "item": item });
        engine.info(&trace, "Converted icon to an item stack object");
    }
    engine.dispatch(&trace, "Item Stack", icon, None)
}
