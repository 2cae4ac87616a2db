//! Action-type rules.

use originport_core::{
    Category, Family, Fragment, MetaKind, MigrateError, RuleContext, RuleRegistry, TableId,
};
use serde_json::{json, Value};

pub(crate) fn register(rules: &mut RuleRegistry) {
    rules.register(TableId::Meta(MetaKind::Action), "origins:chance", chance);

    let entity = TableId::Family(Family::Action(Category::Entity));
    rules
        .register(entity, "origins:action_on_set", action_on_set)
        .register(entity, "origins:spawn_effect_cloud", spawn_effect_cloud)
        .register(entity, "origins:damage", damage);

    let bientity = TableId::Family(Family::Action(Category::BiEntity));
    rules
        .register(bientity, "origins:add_to_set", add_to_set)
        .register(bientity, "origins:remove_from_set", remove_from_set)
        .register(bientity, "origins:damage", damage);

    let item = TableId::Family(Family::Action(Category::Item));
    rules.register(item, "origins:merge_nbt", merge_nbt);
}

fn chance(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.rename_field(fragment, "action", "success_action");
    Ok(())
}

fn action_on_set(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.retag(fragment, "origins:action_on_entity_set");
    Ok(())
}

/// Effects now live in a potion-contents style component.
///
/// The moved effects are no longer where the schema declares them, so they
/// are migrated here.
fn spawn_effect_cloud(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    let mut effects = Vec::new();
    if let Some(effect) = fragment.shift_remove("effect") {
        effects.push(effect);
    }
    match fragment.shift_remove("effects") {
        Some(Value::Array(list)) => effects.extend(list),
        Some(other) => effects.push(other),
        None => {}
    }
    if effects.is_empty() {
        return Ok(());
    }

    let base = cx.trace().field("effect_component").field("custom_effects");
    for (i, effect) in effects.iter_mut().enumerate() {
        cx.dispatch_at(&base.index(i), "Status Effect Instance", effect)?;
    }
    fragment.insert(
        "effect_component".to_string(),
        json!({ "custom_effects": effects }),
    );
    cx.info("Updated action spawn effect cloud to use components");
    Ok(())
}

fn damage(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    if fragment.contains_key("damage_type") {
        return Ok(());
    }
    if fragment.contains_key("source") {
        cx.warn("Fixing damage types is unimplemented.");
    } else {
        cx.error("Couldn't find damage source");
    }
    Ok(())
}

fn add_to_set(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.retag(fragment, "origins:add_to_entity_set");
    Ok(())
}

fn remove_from_set(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.retag(fragment, "origins:remove_from_entity_set");
    Ok(())
}

fn merge_nbt(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    cx.retag(fragment, "origins:merge_custom_data");
    Ok(())
}
