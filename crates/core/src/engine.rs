//! The traversal engine.
//!
//! Dispatch works on three levels:
//!
//! - [`Engine::dispatch`] takes a type-spec name and a value. Scalars are
//!   never dispatched. Typed families resolve the fragment's tag, meta
//!   markers are expanded against the enclosing category first, and any
//!   other name is a data type: its registered rule runs, then its shape in
//!   the "Data Type" table (if any) is walked with the same category.
//! - [`Engine::walk`] visits the declared fields of one type, in schema
//!   order, skipping fields the fragment does not carry.
//! - [`Engine::fan_out`] checks one field value against each admissible
//!   type spec, element by element for array specs.

use originport_schema::{SchemaCatalog, TypeRef};
use serde_json::Value;

use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use crate::error::MigrateError;
use crate::registry::{Fragment, RuleContext, RuleRegistry};
use crate::resolve::TypeResolver;
use crate::trace::Trace;
use crate::typespec::{expand_meta, Category, Family, TableId, TypeSpec};

pub struct Engine<'a> {
    schema: &'a SchemaCatalog,
    rules: &'a RuleRegistry,
    sink: &'a dyn DiagnosticSink,
    resolver: TypeResolver,
}

impl<'a> Engine<'a> {
    pub fn new(
        schema: &'a SchemaCatalog,
        rules: &'a RuleRegistry,
        sink: &'a dyn DiagnosticSink,
    ) -> Self {
        Engine {
            schema,
            rules,
            sink,
            resolver: TypeResolver::default(),
        }
    }

    pub fn with_resolver(mut self, resolver: TypeResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn schema(&self) -> &SchemaCatalog {
        self.schema
    }

    pub fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    pub fn report(&self, severity: Severity, trace: &Trace, message: impl Into<String>) {
        self.sink.emit(Diagnostic::new(severity, trace, message));
    }

    pub fn info(&self, trace: &Trace, message: impl Into<String>) {
        self.report(Severity::Info, trace, message);
    }

    pub fn warn(&self, trace: &Trace, message: impl Into<String>) {
        self.report(Severity::Warning, trace, message);
    }

    pub fn error(&self, trace: &Trace, message: impl Into<String>) {
        self.report(Severity::Error, trace, message);
    }

    /// Migrate `value` as an instance of the type spec `spec`.
    ///
    /// `category` is the enclosing category meta markers expand against.
    /// Names with no matching family or data rule are a silent no-op.
    pub fn dispatch(
        &self,
        trace: &Trace,
        spec: &str,
        value: &mut Value,
        category: Option<Category>,
    ) -> Result<(), MigrateError> {
        let Some(fragment) = value.as_object_mut() else {
            return Ok(());
        };

        match TypeSpec::parse(spec) {
            TypeSpec::Family(family) => self.migrate_typed(trace, family, fragment),
            TypeSpec::Meta(kind) => {
                let category = category.ok_or_else(|| MigrateError::MissingCategory {
                    marker: kind.marker().to_string(),
                    trace: trace.clone(),
                })?;
                self.migrate_typed(trace, expand_meta(kind, category), fragment)
            }
            TypeSpec::Data(name) => self.migrate_data(trace, &name, fragment, category),
        }
    }

    /// Run `value` through every admissible type spec of its field.
    pub fn fan_out(
        &self,
        trace: &Trace,
        admissible: &[TypeRef],
        value: &mut Value,
        category: Option<Category>,
    ) -> Result<(), MigrateError> {
        for spec in admissible {
            if spec.is_array {
                if let Some(items) = value.as_array_mut() {
                    for (i, item) in items.iter_mut().enumerate() {
                        self.dispatch(&trace.index(i), &spec.type_name, item, category)?;
                    }
                }
            } else {
                self.dispatch(trace, &spec.type_name, value, category)?;
            }
        }
        Ok(())
    }

    /// Visit the fields `type_name` declares in `table`, in declared order.
    ///
    /// A type the table does not cover is reported and the fragment is left alone.
    pub fn walk(
        &self,
        trace: &Trace,
        table: TableId,
        type_name: &str,
        fragment: &mut Fragment,
        category: Option<Category>,
    ) -> Result<(), MigrateError> {
        let Some(shape) = self.schema.shape(&table.to_string(), type_name) else {
            self.report_unknown(trace, table, type_name);
            return Ok(());
        };

        for field in shape {
            if let Some(value) = fragment.get_mut(&field.name) {
                self.fan_out(&trace.field(&field.name), &field.admissible, value, category)?;
            }
        }
        Ok(())
    }

    fn migrate_typed(
        &self,
        trace: &Trace,
        family: Family,
        fragment: &mut Fragment,
    ) -> Result<(), MigrateError> {
        let type_name = self.resolver.resolve(trace, fragment)?;

        if let Some((kind, category)) = family.meta() {
            let meta = TableId::Meta(kind);
            if self.covers(meta, &type_name) {
                self.apply_rule(trace, meta, &type_name, Some(category), fragment)?;
                return self.walk(trace, meta, &type_name, fragment, Some(category));
            }
        }

        let table = TableId::Family(family);
        if !self.covers(table, &type_name) {
            self.report_unknown(trace, table, &type_name);
            return Ok(());
        }
        self.apply_rule(trace, table, &type_name, None, fragment)?;
        self.walk(trace, table, &type_name, fragment, None)
    }

    fn migrate_data(
        &self,
        trace: &Trace,
        name: &str,
        fragment: &mut Fragment,
        category: Option<Category>,
    ) -> Result<(), MigrateError> {
        if let Some(rule) = self.rules.data_rule(name) {
            rule.apply(&RuleContext::new(self, trace, name, category), fragment)?;
        }
        if self.covers(TableId::Data, name) {
            self.walk(trace, TableId::Data, name, fragment, category)?;
        }
        Ok(())
    }

    fn apply_rule(
        &self,
        trace: &Trace,
        table: TableId,
        type_name: &str,
        category: Option<Category>,
        fragment: &mut Fragment,
    ) -> Result<(), MigrateError> {
        match self.rules.typed_rule(table, type_name) {
            Some(rule) => rule.apply(
                &RuleContext::new(self, trace, type_name, category),
                fragment,
            ),
            None => Ok(()),
        }
    }

    fn covers(&self, table: TableId, type_name: &str) -> bool {
        self.schema.shape(&table.to_string(), type_name).is_some()
    }

    fn report_unknown(&self, trace: &Trace, table: TableId, type_name: &str) {
        self.error(
            trace,
            format!(
                "Type {} is unknown to {} or not covered by this schema version (addon?)",
                type_name, table
            ),
        );
    }
}
