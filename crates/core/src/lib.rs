//! originport-core: schema-driven traversal and rule dispatch.
//!
//! The [`Engine`] walks a JSON document according to the shapes declared in
//! a [`SchemaCatalog`](originport_schema::SchemaCatalog). For every typed
//! fragment it resolves the `type` tag, runs the fragment's own rule from the
//! [`RuleRegistry`] once, then visits each declared field that is present,
//! expanding arrays element by element and descending into nested fragments.
//!
//! Every call carries a [`Trace`] (source file + field path) and every message
//! goes to a [`DiagnosticSink`]. Recoverable problems are reported there and
//! the walk continues; only precondition violations come back as
//! [`MigrateError`].

pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod registry;
pub mod resolve;
pub mod trace;
pub mod typespec;

pub use diagnostics::{Diagnostic, DiagnosticSink, Diagnostics, Severity};
pub use engine::Engine;
pub use error::MigrateError;
pub use registry::{Fragment, Rule, RuleContext, RuleRegistry};
pub use resolve::TypeResolver;
pub use trace::Trace;
pub use typespec::{expand_meta, Category, Family, MetaKind, TableId, TypeSpec};
