//! Power rules and the power document driver.

use std::sync::Arc;

use originport_core::{
    Engine, Family, Fragment, MigrateError, RuleContext, RuleRegistry, TableId, Trace,
};
use serde_json::Value;

use crate::remap::{Match, RemapTable, ValueRemapRule};

/// Fields any power may carry besides those of its type.
pub const COMMON_POWER_FIELDS: [&str; 7] = [
    "type",
    "name",
    "description",
    "hidden",
    "condition",
    "loading_priority",
    "badges",
];

const MULTIPLE: &str = "origins:multiple";

pub(crate) fn register(rules: &mut RuleRegistry, entity_groups: Arc<RemapTable>) {
    let power = TableId::Family(Family::Power);
    rules
        .register(power, "origins:overlay", overlay)
        .register(
            power,
            "origins:entity_group",
            ValueRemapRule {
                label: "entity group",
                source_key: "group",
                new_type: "origins:modify_type_tag",
                matching: Match::Suffix,
                table: entity_groups,
            },
        );
}

fn overlay(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    if fragment.contains_key("texture") {
        cx.error("Overlay texture change not implemented (if even necessary)");
    }
    Ok(())
}

/// Migrate a whole power file in place.
///
/// An `origins:multiple` power is a container: each key that is not a common
/// power field is a sub-power and is migrated on its own.
pub fn migrate_power_document(
    engine: &Engine<'_>,
    trace: &Trace,
    doc: &mut Value,
) -> Result<(), MigrateError> {
    let Some(fragment) = doc.as_object_mut() else {
        engine.error(trace, "Power file is not a JSON object");
        return Ok(());
    };
    if engine.resolver().resolve(trace, fragment)? != MULTIPLE {
        return migrate_power(engine, trace, doc);
    }

    engine.info(trace, "Fixing power");
    let declared: Vec<&str> = engine
        .schema()
        .shape(&TableId::Family(Family::Power).to_string(), MULTIPLE)
        .map(|shape| shape.iter().map(|field| field.name.as_str()).collect())
        .unwrap_or_default();

    for (key, sub_power) in fragment.iter_mut() {
        if COMMON_POWER_FIELDS.contains(&key.as_str()) || declared.contains(&key.as_str()) {
            continue;
        }
        migrate_power(engine, &trace.field(key), sub_power)?;
    }
    Ok(())
}

fn migrate_power(engine: &Engine<'_>, trace: &Trace, power: &mut Value) -> Result<(), MigrateError> {
    let Some(fragment) = power.as_object_mut() else {
        engine.warn(trace, "Expected a power object, skipping");
        return Ok(());
    };
    engine.info(trace, "Fixing power");

    if let Some(condition) = fragment.get_mut("condition") {
        engine.dispatch(
            &trace.field("condition"),
            "Entity Condition Type",
            condition,
            None,
        )?;
    }
    engine.dispatch(trace, "Power Type", power, None)
}
