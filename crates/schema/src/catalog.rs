use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;
use crate::types::{FieldDescriptor, SchemaTable};
use crate::validate::validate_catalog;

/// All schema tables known to a migration run, keyed by table name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaCatalog {
    tables: BTreeMap<String, SchemaTable>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a catalogue document.
    ///
    /// `origin` names the source (a file path or an embedded resource) in errors.
    pub fn from_json_str(origin: &str, src: &str) -> Result<Self, SchemaError> {
        let doc: Value = serde_json::from_str(src).map_err(|source| SchemaError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        Self::from_value(origin, doc)
    }

    pub fn from_value(origin: &str, doc: Value) -> Result<Self, SchemaError> {
        validate_catalog(&doc).map_err(|errors| SchemaError::Invalid {
            origin: origin.to_string(),
            errors,
        })?;
        serde_json::from_value(doc).map_err(|source| SchemaError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    /// Fold `other` into this catalogue. A type declared in both is an error.
    pub fn merge(&mut self, other: SchemaCatalog) -> Result<(), SchemaError> {
        for (table_name, table) in other.tables {
            let target = self.tables.entry(table_name.clone()).or_default();
            for (type_name, fields) in table.into_shapes() {
                if target.contains(&type_name) {
                    return Err(SchemaError::DuplicateType {
                        table: table_name,
                        type_name,
                    });
                }
                target.insert(type_name, fields);
            }
        }
        Ok(())
    }

    pub fn table(&self, name: &str) -> Option<&SchemaTable> {
        self.tables.get(name)
    }

    /// Shape of `type_name` in table `table`, if both exist.
    pub fn shape(&self, table: &str, type_name: &str) -> Option<&[FieldDescriptor]> {
        self.table(table).and_then(|t| t.shape(type_name))
    }

    pub fn insert_table(&mut self, name: impl Into<String>, table: SchemaTable) {
        self.tables.insert(name.into(), table);
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &SchemaTable)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }
}
