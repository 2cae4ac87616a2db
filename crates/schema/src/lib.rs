//! originport-schema: declarative field shapes for datapack types.
//!
//! A [`SchemaCatalog`] is a set of named [`SchemaTable`]s ("Power Type",
//! "Entity Action Type", "Meta Condition Type", ...). Each table maps a type
//! tag such as `origins:chance` to the ordered list of fields documents of
//! that type may carry, and each field lists the type specifications its
//! value is checked against.
//!
//! The catalogue is read-only data. It is loaded once per batch and shared
//! by reference with the traversal engine.

pub mod catalog;
pub mod error;
pub mod types;
pub mod validate;

pub use catalog::SchemaCatalog;
pub use error::SchemaError;
pub use types::{FieldDescriptor, SchemaTable, TypeRef};
pub use validate::validate_catalog;
