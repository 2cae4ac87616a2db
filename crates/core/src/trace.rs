use std::fmt;
use std::sync::Arc;

/// Diagnostic context threaded through the traversal.
///
/// A trace names the document being migrated and the path from its root to
/// the fragment currently being processed (`.powers[2].condition`). Descents
/// never mutate a trace; [`Trace::field`] and [`Trace::index`] return a fork
/// with one more segment, so sibling branches never see each other's suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    source: Arc<str>,
    namespace: Option<Arc<str>>,
    path: String,
}

impl Trace {
    pub fn new(source: impl Into<String>) -> Self {
        Trace {
            source: Arc::from(source.into()),
            namespace: None,
            path: String::new(),
        }
    }

    /// Attach the datapack namespace the document belongs to.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(Arc::from(namespace.into()));
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fork this trace for a named field.
    pub fn field(&self, name: &str) -> Trace {
        let mut next = self.clone();
        next.path.push('.');
        next.path.push_str(name);
        next
    }

    /// Fork this trace for a sequence element.
    pub fn index(&self, index: usize) -> Trace {
        let mut next = self.clone();
        next.path.push_str(&format!("[{}]", index));
        next
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "File: {}", self.source)
        } else {
            write!(f, "File: {} in {}", self.source, self.path)
        }
    }
}
