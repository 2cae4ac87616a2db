//! originport-rules: the Origins 1.x -> 1.21 migration catalogue.
//!
//! Provides the built-in [`SchemaCatalog`] describing every covered power,
//! action, condition and data type, the [`RuleRegistry`] of type-specific
//! rules, and the per-document drivers for power and origin files.

mod actions;
mod conditions;
mod data_types;
pub mod origins;
mod particle;
pub mod powers;
pub mod remap;

use std::sync::Arc;

use originport_core::RuleRegistry;
use originport_schema::{SchemaCatalog, SchemaError};

pub use origins::migrate_origin_document;
pub use powers::{migrate_power_document, COMMON_POWER_FIELDS};
pub use remap::{Match, RemapConfig, RemapEntry, RemapError, RemapTable, ValueRemapRule};

static BUILTIN_SCHEMA: [(&str, &str); 4] = [
    ("schema/actions.json", include_str!("../data/schema/actions.json")),
    ("schema/conditions.json", include_str!("../data/schema/conditions.json")),
    ("schema/powers.json", include_str!("../data/schema/powers.json")),
    ("schema/data_types.json", include_str!("../data/schema/data_types.json")),
];

/// The schema catalogue shipped with the binary.
pub fn builtin_schema() -> Result<SchemaCatalog, SchemaError> {
    let mut catalog = SchemaCatalog::new();
    for (origin, src) in BUILTIN_SCHEMA {
        catalog.merge(SchemaCatalog::from_json_str(origin, src)?)?;
    }
    Ok(catalog)
}

/// Every rule of the catalogue, with value remaps drawn from `remaps`.
pub fn standard_registry(remaps: &RemapConfig) -> RuleRegistry {
    let biome_categories = Arc::new(remaps.biome_categories.clone());
    let entity_groups = Arc::new(remaps.entity_groups.clone());

    let mut rules = RuleRegistry::new();
    actions::register(&mut rules);
    conditions::register(&mut rules, biome_categories, Arc::clone(&entity_groups));
    data_types::register(&mut rules);
    particle::register(&mut rules);
    powers::register(&mut rules, entity_groups);
    rules
}

#[cfg(test)]
pub(crate) mod testing {
    use originport_core::{Category, Diagnostic, Diagnostics, Engine, Trace};
    use serde_json::Value;

    use super::*;

    pub const SOURCE: &str = "data/example/powers/test.json";

    /// Run one dispatch against the built-in schema and rules.
    pub fn run(spec: &str, value: Value) -> (Value, Vec<Diagnostic>) {
        run_in(spec, None, value)
    }

    /// Like [`run`], inside an enclosing category.
    pub fn run_in(spec: &str, category: Option<Category>, mut value: Value) -> (Value, Vec<Diagnostic>) {
        let schema = builtin_schema().unwrap();
        let remaps = RemapConfig::builtin().unwrap();
        let rules = standard_registry(&remaps);
        let sink = Diagnostics::new();
        let engine = Engine::new(&schema, &rules, &sink).with_resolver(remaps.resolver());
        let trace = Trace::new(SOURCE).with_namespace("example");
        engine.dispatch(&trace, spec, &mut value, category).unwrap();
        (value, sink.take())
    }

    pub fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }
}
