//! Particle options: the old string `params` become structured objects.

use std::sync::LazyLock;

use originport_core::{Fragment, MigrateError, RuleContext, RuleRegistry};
use regex::Regex;
use serde_json::{json, Map, Value};

pub(crate) fn register(rules: &mut RuleRegistry) {
    rules.register_data("Particle Effect", particle_effect);
}

static BLOCK_STATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<block>[a-z0-9/:._-]+)(?:\[(?P<props>[^\]]*)\])?$")
        .expect("block state pattern is valid")
});

static PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<property>[a-z0-9/._-]+)\s*=\s*(?P<value>[a-z0-9/._-]+)\s*$")
        .expect("property pattern is valid")
});

fn particle_effect(cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
    let Some(params) = fragment.get("params").and_then(Value::as_str) else {
        return Ok(());
    };
    let Some(kind) = fragment.get("type").and_then(Value::as_str) else {
        cx.error("Particle effect has no type, unable to update params");
        return Ok(());
    };
    let kind = kind.strip_prefix("minecraft:").unwrap_or(kind).to_string();

    let converted = match kind.as_str() {
        "block" | "block_marker" | "falling_dust" => block_state(params),
        "dragon_breath" => numbers(params, 1).map(|n| json!({ "power": n[0] })),
        "dust" => numbers(params, 4).map(|n| json!({ "color": [n[0], n[1], n[2]], "scale": n[3] })),
        "dust_color_transition" => numbers(params, 7).map(|n| {
            json!({
                "from_color": [n[0], n[1], n[2]],
                "scale": n[3],
                "to_color": [n[4], n[5], n[6]],
            })
        }),
        "item" => Some(json!({ "item": { "id": params.trim() } })),
        "sculk_charge" => numbers(params, 1).map(|n| json!({ "roll": n[0] })),
        "shriek" => integers(params, 1).map(|n| json!({ "delay": n[0] })),
        "vibration" => integers(params, 4).map(|n| {
            json!({
                "destination": { "type": "block", "pos": [n[0], n[1], n[2]] },
                "arrival_in_ticks": n[3],
            })
        }),
        _ => return Ok(()),
    };

    match converted {
        Some(new_params) => {
            fragment.insert("params".to_string(), new_params);
            cx.info(format!("Updated params for \"{}\" particle.", kind));
        }
        None => cx.error(format!(
            "Unable to parse params for \"{}\" particle, left unchanged.",
            kind
        )),
    }
    Ok(())
}

/// `minecraft:stone[axis=y,lit=true]` -> `{"block_state": {"Name": .., "Properties": {..}}}`.
fn block_state(params: &str) -> Option<Value> {
    let captures = BLOCK_STATE_RE.captures(params.trim())?;
    let mut state = Map::new();
    state.insert("Name".to_string(), Value::String(captures["block"].to_string()));

    if let Some(props) = captures.name("props") {
        let mut properties = Map::new();
        for prop in props.as_str().split(',').filter(|p| !p.trim().is_empty()) {
            let prop = PROPERTY_RE.captures(prop)?;
            properties.insert(
                prop["property"].to_string(),
                Value::String(prop["value"].to_string()),
            );
        }
        if !properties.is_empty() {
            state.insert("Properties".to_string(), Value::Object(properties));
        }
    }
    Some(json!({ "block_state": state }))
}

/// Exactly `count` whitespace separated floats.
fn numbers(params: &str, count: usize) -> Option<Vec<f64>> {
    let values = params
        .split_whitespace()
        .map(|n| n.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<Vec<_>>>()?;
    (values.len() == count).then_some(values)
}

/// Like [`numbers`], for fields stored as whole numbers. A fractional value
/// fails the whole parse: block positions and tick counts have no fraction.
fn integers(params: &str, count: usize) -> Option<Vec<i64>> {
    numbers(params, count)?
        .into_iter()
        .map(|v| (v.fract() == 0.0).then_some(v as i64))
        .collect()
}
