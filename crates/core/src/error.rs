use crate::trace::Trace;

/// Precondition violations that stop the migration of one document.
///
/// Everything recoverable is reported through the diagnostic sink instead;
/// these are the cases where the rest of the document's shape cannot be
/// determined. The caller isolates them per document.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// A fragment dispatched as a typed family carries no string `type`.
    #[error("{trace}: fragment does not declare a string 'type'")]
    MissingTypeTag { trace: Trace },

    /// A meta type ("Action Type", "Condition Type") was reached with no
    /// enclosing category to expand it against.
    #[error("{trace}: meta type '{marker}' used without an enclosing category")]
    MissingCategory { marker: String, trace: Trace },
}

impl MigrateError {
    /// The trace of the fragment that failed.
    pub fn trace(&self) -> &Trace {
        match self {
            MigrateError::MissingTypeTag { trace } => trace,
            MigrateError::MissingCategory { trace, .. } => trace,
        }
    }

    /// The failure without its location, for reports that print the trace separately.
    pub fn reason(&self) -> String {
        match self {
            MigrateError::MissingTypeTag { .. } => {
                "fragment does not declare a string 'type'".to_string()
            }
            MigrateError::MissingCategory { marker, .. } => {
                format!("meta type '{}' used without an enclosing category", marker)
            }
        }
    }
}
