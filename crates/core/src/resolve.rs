use serde_json::{Map, Value};

use crate::error::MigrateError;
use crate::trace::Trace;

/// Reads a fragment's `type` tag and normalises a legacy namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeResolver {
    legacy_prefix: String,
    current_prefix: String,
}

impl Default for TypeResolver {
    fn default() -> Self {
        TypeResolver::new("apoli:", "origins:")
    }
}

impl TypeResolver {
    pub fn new(legacy_prefix: impl Into<String>, current_prefix: impl Into<String>) -> Self {
        TypeResolver {
            legacy_prefix: legacy_prefix.into(),
            current_prefix: current_prefix.into(),
        }
    }

    /// Replace the legacy prefix with the current one; other tags pass through.
    pub fn normalize(&self, tag: &str) -> String {
        match tag.strip_prefix(&self.legacy_prefix) {
            Some(rest) if !self.legacy_prefix.is_empty() => {
                format!("{}{}", self.current_prefix, rest)
            }
            _ => tag.to_string(),
        }
    }

    /// The normalised tag of `fragment`. The stored tag is not modified.
    pub fn resolve(&self, trace: &Trace, fragment: &Map<String, Value>) -> Result<String, MigrateError> {
        fragment
            .get("type")
            .and_then(Value::as_str)
            .map(|tag| self.normalize(tag))
            .ok_or_else(|| MigrateError::MissingTypeTag {
                trace: trace.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn normalizes_legacy_prefix_only_at_start() {
        let r = TypeResolver::default();
        assert_eq!(r.normalize("apoli:and"), "origins:and");
        assert_eq!(r.normalize("origins:and"), "origins:and");
        assert_eq!(r.normalize("mymod:apoli:x"), "mymod:apoli:x");
    }

    #[test]
    fn resolve_leaves_fragment_untouched() {
        let r = TypeResolver::default();
        let frag = object(json!({"type": "apoli:chance"}));
        let tag = r.resolve(&Trace::new("a.json"), &frag).unwrap();
        assert_eq!(tag, "origins:chance");
        assert_eq!(frag["type"], "apoli:chance");
    }

    #[test]
    fn missing_or_non_string_type_is_a_precondition_error() {
        let r = TypeResolver::default();
        let trace = Trace::new("a.json").field("condition");
        for frag in [json!({}), json!({"type": 4})] {
            let err = r.resolve(&trace, &object(frag)).unwrap_err();
            assert!(matches!(err, MigrateError::MissingTypeTag { .. }));
            assert_eq!(err.trace().path(), ".condition");
        }
    }
}
