//! End-to-end runs of the built-in catalogue over realistic power and origin files.

use originport_core::{Category, Diagnostic, Diagnostics, Engine, Severity, Trace};
use originport_rules::{
    builtin_schema, migrate_origin_document, migrate_power_document, standard_registry,
    RemapConfig,
};
use serde_json::{json, Value};

struct Harness {
    schema: originport_schema::SchemaCatalog,
    rules: originport_core::RuleRegistry,
    remaps: RemapConfig,
}

impl Harness {
    fn new() -> Self {
        let remaps = RemapConfig::builtin().unwrap();
        Harness {
            schema: builtin_schema().unwrap(),
            rules: standard_registry(&remaps),
            remaps,
        }
    }

    fn dispatch(&self, spec: &str, category: Option<Category>, mut value: Value) -> (Value, Vec<Diagnostic>) {
        let sink = Diagnostics::new();
        let engine = Engine::new(&self.schema, &self.rules, &sink).with_resolver(self.remaps.resolver());
        engine
            .dispatch(&Trace::new("inline.json"), spec, &mut value, category)
            .unwrap();
        (value, sink.take())
    }

    fn power(&self, file: &str, mut doc: Value) -> (Value, Vec<Diagnostic>) {
        let sink = Diagnostics::new();
        let engine = Engine::new(&self.schema, &self.rules, &sink).with_resolver(self.remaps.resolver());
        let trace = Trace::new(file).with_namespace("example");
        migrate_power_document(&engine, &trace, &mut doc).unwrap();
        (doc, sink.take())
    }

    fn origin(&self, mut doc: Value) -> (Value, Vec<Diagnostic>) {
        let sink = Diagnostics::new();
        let engine = Engine::new(&self.schema, &self.rules, &sink).with_resolver(self.remaps.resolver());
        let trace = Trace::new("data/example/origins/merling.json").with_namespace("example");
        migrate_origin_document(&engine, &trace, &mut doc).unwrap();
        (doc, sink.take())
    }
}

fn infos(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Info)
        .map(|d| d.message.as_str())
        .collect()
}

#[test]
fn chance_renames_action_to_success_action() {
    let h = Harness::new();
    let (out, diags) = h.dispatch(
        "Action Type",
        Some(Category::Entity),
        json!({"type": "origins:chance", "action": {"type": "origins:example"}}),
    );
    assert_eq!(
        out,
        json!({"type": "origins:chance", "success_action": {"type": "origins:example"}})
    );
    assert_eq!(diags[0].severity, Severity::Info);
    assert_eq!(diags[0].message, "Renamed action to success_action");
}

#[test]
fn item_stack_renames_item_then_amount() {
    let h = Harness::new();
    let (out, diags) = h.dispatch(
        "Item Stack",
        None,
        json!({"item": "minecraft:apple", "amount": 3}),
    );
    assert_eq!(out, json!({"id": "minecraft:apple", "count": 3}));
    assert_eq!(infos(&diags), vec!["Renamed item to id", "Renamed amount to count"]);
}

#[test]
fn legacy_apoli_tags_are_rewritten() {
    let h = Harness::new();
    let (out, diags) = h.dispatch(
        "Entity Condition Type",
        None,
        json!({"type": "apoli:and", "conditions": [{"type": "apoli:sneaking"}, {"type": "apoli:set_size", "set": "x"}]}),
    );
    assert_eq!(out["conditions"][1]["type"], "origins:entity_set_size");
    assert!(diags.iter().all(|d| d.severity == Severity::Info));
}

#[test]
fn nested_actions_reach_every_family() {
    let h = Harness::new();
    let (out, diags) = h.power(
        "data/example/powers/hunter.json",
        json!({
            "type": "origins:action_on_hit",
            "bientity_action": {
                "type": "origins:and",
                "actions": [
                    {"type": "origins:add_to_set", "set": "hunted"},
                    {"type": "origins:target_action", "action": {
                        "type": "origins:if_else_list",
                        "actions": [
                            {
                                "condition": {"type": "origins:entity_group", "group": "undead"},
                                "action": {"type": "origins:give", "stack": {"item": "minecraft:bone", "amount": 2}}
                            }
                        ]
                    }}
                ]
            },
            "damage_condition": {"type": "origins:amount", "comparison": ">", "compare_to": 2}
        }),
    );
    let actions = &out["bientity_action"]["actions"];
    assert_eq!(actions[0]["type"], "origins:add_to_entity_set");
    let branch = &actions[1]["action"]["actions"][0];
    assert_eq!(branch["condition"], json!({"type": "origins:in_tag", "tag": "minecraft:undead"}));
    assert_eq!(branch["action"]["stack"], json!({"id": "minecraft:bone", "count": 2}));
    assert!(diags
        .iter()
        .any(|d| d.path == ".bientity_action.actions[1].action.actions[0].action.stack"));
    assert!(diags.iter().all(|d| d.severity == Severity::Info));
}

#[test]
fn edible_item_power() {
    let h = Harness::new();
    let (out, _) = h.power(
        "data/example/powers/berries.json",
        json!({
            "type": "origins:edible_item",
            "item_condition": {"type": "origins:meat"},
            "food_component": {"hunger": 3, "saturation": 1.0, "snack": true},
            "result_stack": {"item": "minecraft:bowl"}
        }),
    );
    assert_eq!(out["item_condition"]["type"], "origins:ingredient");
    assert_eq!(
        out["food_component"],
        json!({"saturation": 1.0, "nutrition": 3, "eat_seconds": 0.8})
    );
    assert_eq!(out["result_stack"], json!({"id": "minecraft:bowl"}));
}

#[test]
fn particle_power() {
    let h = Harness::new();
    let (out, _) = h.power(
        "data/example/powers/sparkle.json",
        json!({
            "type": "origins:particle",
            "particle": {"type": "minecraft:dust", "params": "0 1 0 0.5"},
            "frequency": 4
        }),
    );
    assert_eq!(out["particle"]["params"], json!({"color": [0.0, 1.0, 0.0], "scale": 0.5}));
}

#[test]
fn biome_category_with_note_warns() {
    let h = Harness::new();
    let (out, diags) = h.dispatch(
        "Biome Condition Type",
        None,
        json!({"type": "origins:category", "category": "desert"}),
    );
    assert_eq!(out, json!({"type": "origins:in_tag", "tag": "c:desert"}));
    assert_eq!(diags.iter().filter(|d| d.severity == Severity::Warning).count(), 1);
}

#[test]
fn unknown_addon_type_is_reported_and_kept() {
    let h = Harness::new();
    let input = json!({"type": "origins:active_self", "entity_action": {"type": "addon:teleport", "distance": 8}});
    let (out, diags) = h.power("data/example/powers/blink.json", input.clone());
    assert_eq!(out, input);
    let errors: Vec<&Diagnostic> = diags.iter().filter(|d| d.severity == Severity::Error).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, ".entity_action");
    assert!(errors[0].message.contains("addon:teleport"));
}

#[test]
fn migrating_twice_is_quiet_the_second_time() {
    let h = Harness::new();
    let (once, _) = h.power(
        "data/example/powers/tough.json",
        json!({
            "type": "origins:attribute",
            "modifier": {"attribute": "minecraft:generic.armor", "operation": "addition", "value": 4}
        }),
    );
    let (twice, diags) = h.power("data/example/powers/tough.json", once.clone());
    assert_eq!(once, twice);
    assert_eq!(infos(&diags), vec!["Fixing power"]);
}

#[test]
fn origin_icon() {
    let h = Harness::new();
    let (out, diags) = h.origin(json!({
        "powers": ["example:water_breathing"],
        "icon": "minecraft:cod",
        "order": 2,
        "impact": 1
    }));
    assert_eq!(out["icon"], json!({"id": "minecraft:cod"}));
    assert_eq!(diags[0].path, ".icon");
}

#[test]
fn common_combat_powers_reach_their_nested_actions() {
    let h = Harness::new();
    let (out, diags) = h.power(
        "data/example/powers/thorns.json",
        json!({
            "type": "apoli:self_action_on_hit",
            "entity_action": {"type": "origins:action_on_set", "set": "example:hit"},
            "target_condition": {"type": "origins:set_size", "set": "example:hit", "comparison": ">", "compare_to": 0},
            "cooldown": 20
        }),
    );
    assert!(diags.iter().all(|d| d.severity == Severity::Info));
    assert_eq!(out["type"], "apoli:self_action_on_hit");
    assert_eq!(out["entity_action"]["type"], "origins:action_on_entity_set");
    assert_eq!(out["target_condition"]["type"], "origins:entity_set_size");

    let (launch, diags) = h.power(
        "data/example/powers/leap.json",
        json!({
            "type": "origins:launch",
            "speed": 1.5,
            "key": {"key": "key.origins.primary_active"},
            "cooldown": 40
        }),
    );
    assert!(diags.iter().all(|d| d.severity == Severity::Info));
    assert_eq!(launch["speed"], 1.5);
}
