//! Condition-type rules.

use std::sync::Arc;

use originport_core::{Category, Family, Fragment, MigrateError, RuleContext, RuleRegistry, TableId};
use serde_json::{json, Value};

use crate::remap::{Match, RemapTable, ValueRemapRule};

pub(crate) fn register(
    rules: &mut RuleRegistry,
    biome_categories: Arc<RemapTable>,
    entity_groups: Arc<RemapTable>,
) {
    let entity = TableId::Family(Family::Condition(Category::Entity));
    rules
        .register(
            entity,
            "origins:entity_group",
            ValueRemapRule {
                label: "entity group",
                source_key: "group",
                new_type: "origins:in_tag",
                matching: Match::Suffix,
                table: entity_groups,
            },
        )
        .register(entity, "origins:set_size", set_size);

    let bientity = TableId::Family(Family::Condition(Category::BiEntity));
    rules.register(bientity, "origins:in_set", in_set);

    let block = TableId::Family(Family::Condition(Category::Block));
    rules
        .register(block, "origins:replacable", replacable)
        .register(block, "origins:material", material);

    let item = TableId::Family(Family::Condition(Category::Item));
    rules
        .register(item, "origins:harvest_level", harvest_level)
        .register(item, "origins:nbt", nbt)
        .register(item, "origins:meat", meat)
        .register(item, "origins:is_damageable", is_damageable)
        .register(item, "origins:is_equippable", is_equippable)
        .register(item, "origins:fireproof", fireproof);

    let biome = TableId::Family(Family::Condition(Category::Biome));
    rules.register(
        biome,
        "origins:category",
        ValueRemapRule {
            label: "biome category",
            source_key: "category",
            new_type: "origins:in_tag",
            matching: Match::Exact,
            table: biome_categories,
        },
    );
}

fn set_size(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.retag(fragment, "origins:entity_set_size");
    Ok(())
}

fn in_set(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.retag(fragment, "origins:in_entity_set");
    Ok(())
}

fn replacable(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.retag(fragment, "origins:replaceable");
    Ok(())
}

fn material(cx: &RuleContext<'_>, _fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.error(
        "Material condition fix not implemented, see \
         https://origins.readthedocs.io/en/latest/types/data_types/material/ for how to fix it",
    );
    Ok(())
}

// Tool tiers are tag based now; one level may need several tags.
fn harvest_level(cx: &RuleContext<'_>, _fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.warn("Harvest levels don't exist anymore.");
    cx.error("Fixing harvest level condition is unimplemented.");
    Ok(())
}

fn nbt(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.retag(fragment, "origins:custom_data");
    cx.error("Fixing nbt/custom_data condition is unimplemented.");
    Ok(())
}

fn meat(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    fragment.insert("type".to_string(), Value::String("origins:ingredient".to_string()));
    fragment.insert("ingredient".to_string(), json!({ "tag": "minecraft:wolf_food" }));
    cx.info("Updated meat item condition to use the minecraft:wolf_food tag instead");
    Ok(())
}

fn is_damageable(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.retag(fragment, "origins:damageable");
    Ok(())
}

fn is_equippable(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.retag(fragment, "origins:equippable");
    Ok(())
}

fn fireproof(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.retag(fragment, "origins:fire_resistant");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, run, run_in};
    use originport_core::Severity;

    #[test]
    fn entity_group_becomes_in_tag() {
        let (out, diags) = run(
            "Entity Condition Type",
            json!({"type": "origins:entity_group", "group": "undead"}),
        );
        assert_eq!(out, json!({"type": "origins:in_tag", "tag": "minecraft:undead"}));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Info);
    }

    #[test]
    fn entity_group_matches_namespaced_values() {
        let (out, _) = run(
            "Entity Condition Type",
            json!({"type": "origins:entity_group", "group": "minecraft:arthropod"}),
        );
        assert_eq!(out["tag"], "minecraft:arthropod");
    }

    #[test]
    fn unknown_entity_group_is_left_alone() {
        let input = json!({"type": "origins:entity_group", "group": "default"});
        let (out, diags) = run("Entity Condition Type", input.clone());
        assert_eq!(out, input);
        assert_eq!(diags[0].severity, Severity::Error);
        assert!(diags[0].message.contains("'default'"));
    }

    #[test]
    fn biome_category_remaps_with_note() {
        let (out, diags) = run(
            "Biome Condition Type",
            json!({"type": "origins:category", "category": "desert"}),
        );
        assert_eq!(out["type"], "origins:in_tag");
        assert_eq!(out["tag"], "c:desert");
        assert!(out.get("category").is_none());
        let severities: Vec<Severity> = diags.iter().map(|d| d.severity).collect();
        assert_eq!(severities, vec![Severity::Info, Severity::Warning]);
        assert_eq!(diags[1].message, "This tag will only work on fabric");
    }

    #[test]
    fn biome_category_inside_entity_biome_condition() {
        let (out, _) = run(
            "Entity Condition Type",
            json!({"type": "origins:biome", "condition": {"type": "origins:category", "category": "forest"}}),
        );
        assert_eq!(out["condition"]["tag"], "minecraft:is_forest");
    }

    #[test]
    fn simple_renames() {
        for (spec, old, new) in [
            ("Entity Condition Type", "origins:set_size", "origins:entity_set_size"),
            ("Bi-entity Condition Type", "origins:in_set", "origins:in_entity_set"),
            ("Block Condition Type", "origins:replacable", "origins:replaceable"),
            ("Item Condition Type", "origins:is_damageable", "origins:damageable"),
            ("Item Condition Type", "origins:is_equippable", "origins:equippable"),
            ("Item Condition Type", "origins:fireproof", "origins:fire_resistant"),
        ] {
            let (out, diags) = run(spec, json!({ "type": old }));
            assert_eq!(out["type"], new, "{}", old);
            assert_eq!(messages(&diags), vec![format!("Renamed {} to {}", old, new)]);
        }
    }

    #[test]
    fn meat_uses_wolf_food_ingredient() {
        let (out, _) = run("Item Condition Type", json!({"type": "origins:meat"}));
        assert_eq!(
            out,
            json!({"type": "origins:ingredient", "ingredient": {"tag": "minecraft:wolf_food"}})
        );
    }

    #[test]
    fn unimplemented_conditions_are_reported() {
        let (_, diags) = run("Item Condition Type", json!({"type": "origins:harvest_level", "compare_to": 2}));
        let severities: Vec<Severity> = diags.iter().map(|d| d.severity).collect();
        assert_eq!(severities, vec![Severity::Warning, Severity::Error]);

        let (out, diags) = run("Item Condition Type", json!({"type": "origins:nbt", "nbt": "{}"}));
        assert_eq!(out["type"], "origins:custom_data");
        assert_eq!(diags.last().map(|d| d.severity), Some(Severity::Error));

        let (out, diags) = run("Block Condition Type", json!({"type": "origins:material", "material": "stone"}));
        assert_eq!(out["type"], "origins:material");
        assert_eq!(diags[0].severity, Severity::Error);
    }

    #[test]
    fn meta_conditions_expand_to_enclosing_category() {
        let (out, _) = run_in(
            "Condition Type",
            Some(Category::Item),
            json!({"type": "origins:and", "conditions": [{"type": "origins:fireproof"}]}),
        );
        assert_eq!(out["conditions"][0]["type"], "origins:fire_resistant");
    }
}
