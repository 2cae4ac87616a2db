/// Errors raised while loading a schema catalogue.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The catalogue source is not valid JSON or does not have the catalogue shape.
    #[error("invalid schema catalogue '{origin}': {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// The catalogue failed meta-schema validation.
    #[error("schema catalogue '{origin}' failed validation:\n  {}", .errors.join("\n  "))]
    Invalid { origin: String, errors: Vec<String> },

    /// Two catalogue sources declare the same type in the same table.
    #[error("type '{type_name}' is declared twice in table '{table}'")]
    DuplicateType { table: String, type_name: String },
}
