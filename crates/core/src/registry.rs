//! Rule contract and the registry the engine dispatches through.
//!
//! A rule transforms the one fragment it governs. It may rename, add or
//! remove keys, change the `type` tag, or report that a step is not
//! implemented. General field recursion belongs to the engine; a rule only
//! reaches into a sub-fragment it owns outright, through
//! [`RuleContext::dispatch`].

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::diagnostics::Severity;
use crate::engine::Engine;
use crate::error::MigrateError;
use crate::trace::Trace;
use crate::typespec::{Category, TableId};

/// A JSON object being migrated.
pub type Fragment = Map<String, Value>;

pub trait Rule: Send + Sync {
    fn apply(&self, cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError>;
}

impl<F> Rule for F
where
    F: Fn(&RuleContext<'_>, &mut Fragment) -> Result<(), MigrateError> + Send + Sync,
{
    fn apply(&self, cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
        self(cx, fragment)
    }
}

/// What a rule can see and do while it runs.
pub struct RuleContext<'a> {
    engine: &'a Engine<'a>,
    trace: &'a Trace,
    type_name: &'a str,
    category: Option<Category>,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(
        engine: &'a Engine<'a>,
        trace: &'a Trace,
        type_name: &'a str,
        category: Option<Category>,
    ) -> Self {
        RuleContext {
            engine,
            trace,
            type_name,
            category,
        }
    }

    pub fn trace(&self) -> &Trace {
        self.trace
    }

    /// The resolved tag (typed rules) or type-spec name (data rules).
    pub fn type_name(&self) -> &str {
        self.type_name
    }

    /// Enclosing category when the rule runs for a meta type.
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn engine(&self) -> &Engine<'a> {
        self.engine
    }

    pub fn info(&self, message: impl Into<String>) {
        self.engine.report(Severity::Info, self.trace, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.engine.report(Severity::Warning, self.trace, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.engine.report(Severity::Error, self.trace, message);
    }

    /// Move `old` to `new`, reporting the rename. Returns whether it happened.
    pub fn rename_field(&self, fragment: &mut Fragment, old: &str, new: &str) -> bool {
        match fragment.shift_remove(old) {
            Some(value) => {
                fragment.insert(new.to_string(), value);
                self.info(format!("Renamed {} to {}", old, new));
                true
            }
            None => false,
        }
    }

    /// Replace the fragment's `type` tag and report it.
    pub fn retag(&self, fragment: &mut Fragment, new_tag: &str) {
        fragment.insert("type".to_string(), Value::String(new_tag.to_string()));
        self.info(format!("Renamed {} to {}", self.type_name, new_tag));
    }

    /// Migrate a sub-fragment this rule owns, stored under `key`.
    ///
    /// Use this only for values the schema does not declare for the current
    /// type; declared fields are walked by the engine after the rule returns.
    pub fn dispatch(&self, key: &str, spec: &str, value: &mut Value) -> Result<(), MigrateError> {
        self.engine.dispatch(&self.trace.field(key), spec, value, None)
    }

    /// Migrate an owned sub-fragment with an explicit trace.
    pub fn dispatch_at(
        &self,
        trace: &Trace,
        spec: &str,
        value: &mut Value,
    ) -> Result<(), MigrateError> {
        self.engine.dispatch(trace, spec, value, None)
    }
}

/// Rules keyed by table and type tag, plus data-type rules keyed by spec name.
///
/// Built once before a batch and read-only afterwards.
#[derive(Default)]
pub struct RuleRegistry {
    typed: HashMap<(TableId, String), Box<dyn Rule>>,
    data: HashMap<String, Box<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the rule for `tag` in `table`. Replaces an earlier registration.
    pub fn register(&mut self, table: TableId, tag: &str, rule: impl Rule + 'static) -> &mut Self {
        self.typed.insert((table, tag.to_string()), Box::new(rule));
        self
    }

    /// Register the rule for a data type such as `"Item Stack"`.
    pub fn register_data(&mut self, name: &str, rule: impl Rule + 'static) -> &mut Self {
        self.data.insert(name.to_string(), Box::new(rule));
        self
    }

    pub fn typed_rule(&self, table: TableId, tag: &str) -> Option<&dyn Rule> {
        self.typed.get(&(table, tag.to_string())).map(Box::as_ref)
    }

    pub fn data_rule(&self, name: &str) -> Option<&dyn Rule> {
        self.data.get(name).map(Box::as_ref)
    }

    pub fn len(&self) -> usize {
        self.typed.len() + self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.typed.is_empty() && self.data.is_empty()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut typed: Vec<String> = self
            .typed
            .keys()
            .map(|(table, tag)| format!("{}/{}", table, tag))
            .collect();
        typed.sort();
        let mut data: Vec<&String> = self.data.keys().collect();
        data.sort();
        f.debug_struct("RuleRegistry")
            .field("typed", &typed)
            .field("data", &data)
            .finish()
    }
}
