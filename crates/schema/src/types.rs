use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One admissible type specification for a field value.
///
/// `is_array` means the value is a sequence and every element is checked
/// against `type_name` on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub is_array: bool,
}

impl TypeRef {
    pub fn scalar(type_name: impl Into<String>) -> Self {
        TypeRef {
            type_name: type_name.into(),
            is_array: false,
        }
    }

    pub fn array(type_name: impl Into<String>) -> Self {
        TypeRef {
            type_name: type_name.into(),
            is_array: true,
        }
    }
}

/// A field a type's documents may carry, with its admissible value types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "types")]
    pub admissible: Vec<TypeRef>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, admissible: Vec<TypeRef>) -> Self {
        FieldDescriptor {
            name: name.into(),
            admissible,
        }
    }
}

/// The shapes of every type in one table, keyed by type tag.
///
/// Field order inside a shape is the declared order and is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaTable {
    shapes: BTreeMap<String, Vec<FieldDescriptor>>,
}

impl SchemaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The declared shape of `type_name`, or `None` if the table does not cover it.
    pub fn shape(&self, type_name: &str) -> Option<&[FieldDescriptor]> {
        self.shapes.get(type_name).map(Vec::as_slice)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.shapes.contains_key(type_name)
    }

    /// Add or replace a shape. Returns the previous shape, if any.
    pub fn insert(
        &mut self,
        type_name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Option<Vec<FieldDescriptor>> {
        self.shapes.insert(type_name.into(), fields)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.shapes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub(crate) fn into_shapes(self) -> BTreeMap<String, Vec<FieldDescriptor>> {
        self.shapes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_ref_defaults_to_scalar() {
        let r: TypeRef = serde_json::from_value(json!({"type": "Entity Action Type"})).unwrap();
        assert_eq!(r, TypeRef::scalar("Entity Action Type"));
    }

    #[test]
    fn shape_keeps_declared_field_order() {
        let table: SchemaTable = serde_json::from_value(json!({
            "origins:and": [
                {"name": "zeta", "types": [{"type": "Int"}]},
                {"name": "alpha", "types": [{"type": "Action Type", "is_array": true}]}
            ]
        }))
        .unwrap();

        let names: Vec<&str> = table
            .shape("origins:and")
            .unwrap()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert!(table.shape("origins:or").is_none());
    }
}
