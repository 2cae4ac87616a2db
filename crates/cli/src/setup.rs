//! Schema and remap loading shared by the subcommands.

use std::path::Path;

use originport_core::{DiagnosticSink, Engine, RuleRegistry};
use originport_rules::{builtin_schema, standard_registry, RemapConfig};
use originport_schema::SchemaCatalog;

/// Everything an [`Engine`] borrows, loaded once per invocation.
pub(crate) struct Toolkit {
    pub schema: SchemaCatalog,
    pub rules: RuleRegistry,
    pub remaps: RemapConfig,
}

impl Toolkit {
    /// Built-in schema and remaps unless a path overrides them.
    pub fn load(schema: Option<&Path>, remaps: Option<&Path>) -> Result<Toolkit, String> {
        let schema = match schema {
            Some(path) => {
                let src = std::fs::read_to_string(path)
                    .map_err(|e| format!("error reading schema '{}': {}", path.display(), e))?;
                SchemaCatalog::from_json_str(&path.display().to_string(), &src)
                    .map_err(|e| e.to_string())?
            }
            None => builtin_schema()
                .map_err(|e| format!("internal error: built-in schema is broken: {}", e))?,
        };

        let remaps = match remaps {
            Some(path) => RemapConfig::load(path),
            None => RemapConfig::builtin(),
        }
        .map_err(|e| e.to_string())?;

        let rules = standard_registry(&remaps);
        tracing::debug!(rules = rules.len(), "loaded rule catalogue");
        Ok(Toolkit {
            schema,
            rules,
            remaps,
        })
    }

    pub fn engine<'a>(&'a self, sink: &'a dyn DiagnosticSink) -> Engine<'a> {
        Engine::new(&self.schema, &self.rules, sink).with_resolver(self.remaps.resolver())
    }
}
