//! Rules for untagged data types (modifiers, stacks, effect instances).

use std::path::Path;

use originport_core::{Fragment, MigrateError, RuleContext, RuleRegistry};
use serde_json::Value;

/// Old operation names of power-level modifiers and what replaces them.
const MODIFIER_OPERATIONS: [(&str, &str); 3] = [
    ("addition", "add_base_early"),
    ("multiply_base", "multiply_base_additive"),
    ("multiply_total", "multiply_total_multiplicative"),
];

/// Same, for modifiers applied straight to an entity attribute.
const ATTRIBUTE_OPERATIONS: [(&str, &str); 3] = [
    ("addition", "add_value"),
    ("multiply_base", "add_multiplied_base"),
    ("multiply_total", "add_multiplied_total"),
];

const REACH_ATTRIBUTES: [(&str, &str); 2] = [
    (
        "reach-entity-attributes:attack_range",
        "minecraft:player.entity_interaction_range",
    ),
    (
        "reach-entity-attributes:reach",
        "minecraft:player.block_interaction_range",
    ),
];

pub(crate) fn register(rules: &mut RuleRegistry) {
    rules
        .register_data("Attribute Modifier", attribute_modifier)
        .register_data("Attributed Attribute Modifier", attributed_attribute_modifier)
        .register_data("Status Effect Instance", status_effect_instance)
        .register_data("Food Component", food_component)
        .register_data("Crafting Recipe", crafting_recipe)
        .register_data("Item Stack", item_stack);
}

fn rename_operation(cx: &RuleContext<'_>, fragment: &mut Fragment, table: &[(&str, &str)]) {
    let Some(operation) = fragment.get("operation").and_then(Value::as_str) else {
        return;
    };
    if let Some((old, new)) = table.iter().find(|(old, _)| *old == operation) {
        fragment.insert("operation".to_string(), Value::String(new.to_string()));
        cx.info(format!("Renamed operation {} to {}", old, new));
    }
}

fn attribute_modifier(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    rename_operation(cx, fragment, &MODIFIER_OPERATIONS);
    cx.rename_field(fragment, "value", "amount");
    Ok(())
}

fn attributed_attribute_modifier(
    cx: &RuleContext<'_>,
    fragment: &mut Fragment,
) -> Result<(), MigrateError> {
    if let Some(attribute) = fragment.get("attribute").and_then(Value::as_str) {
        if let Some((_, vanilla)) = REACH_ATTRIBUTES.iter().find(|(old, _)| *old == attribute) {
            fragment.insert("attribute".to_string(), Value::String(vanilla.to_string()));
            cx.info("Updated reach attribute to work without the mod Reach Entity Attributes");
        }
    }

    if !fragment.contains_key("id") {
        match modifier_id(cx) {
            Some(id) => {
                cx.info(format!("Added id {} to attributed attribute modifier", id));
                fragment.insert("id".to_string(), Value::String(id));
            }
            None => cx.error("Attribute modifier has no id and none could be derived from the file"),
        }
    }

    rename_operation(cx, fragment, &ATTRIBUTE_OPERATIONS);
    cx.rename_field(fragment, "value", "amount");
    Ok(())
}

/// `<namespace>:<file stem>` of the document being migrated.
fn modifier_id(cx: &RuleContext<'_>) -> Option<String> {
    let namespace = cx.trace().namespace()?;
    let stem = Path::new(cx.trace().source()).file_stem()?.to_str()?;
    Some(format!("{}:{}", namespace, stem))
}

fn status_effect_instance(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.rename_field(fragment, "effect", "id");
    cx.rename_field(fragment, "is_ambient", "ambient");
    Ok(())
}

fn food_component(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.rename_field(fragment, "hunger", "nutrition");
    cx.rename_field(fragment, "always_edible", "can_always_eat");
    if fragment.get("snack").and_then(Value::as_bool) == Some(true) {
        fragment.shift_remove("snack");
        fragment.insert("eat_seconds".to_string(), Value::from(0.8));
        cx.info("Replaced snack with eat_seconds 0.8");
    }
    Ok(())
}

fn crafting_recipe(cx: &RuleContext<'_>, _fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.error("Fixing crafting recipes is unimplemented.");
    Ok(())
}

fn item_stack(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.rename_field(fragment, "item", "id");
    cx.rename_field(fragment, "amount", "count");
    if fragment.contains_key("tag") {
        cx.error("Fixing nbt tags is unimplemented.");
    }
    Ok(())
}
