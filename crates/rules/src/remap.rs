//! Remap tables and the generic value-remap rule.
//!
//! Several old condition and power types selected a fixed vocabulary value
//! (a biome category, an entity group) that the new format expresses as a
//! tag. Those mappings are data, loaded from TOML, and a single
//! [`ValueRemapRule`] applies any of them.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use originport_core::{Fragment, MigrateError, Rule, RuleContext, TypeResolver};
use serde::{Deserialize, Serialize};
use serde_json::Value;

static BUILTIN_REMAPS: &str = include_str!("../data/remaps.toml");

#[derive(Debug, thiserror::Error)]
pub enum RemapError {
    #[error("could not read remap file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse remap file '{origin}': {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
}

/// One old value and what replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapEntry {
    pub tag: String,
    /// Reported as a warning whenever the entry is applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// How an old value selects its entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    Exact,
    /// First entry (in key order) the old value ends with.
    Suffix,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemapTable {
    entries: BTreeMap<String, RemapEntry>,
}

impl RemapTable {
    pub fn lookup(&self, value: &str, matching: Match) -> Option<&RemapEntry> {
        match matching {
            Match::Exact => self.entries.get(value),
            Match::Suffix => self
                .entries
                .iter()
                .find(|(key, _)| value.ends_with(key.as_str()))
                .map(|(_, entry)| entry),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: RemapEntry) {
        self.entries.insert(key.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceConfig {
    pub legacy: String,
    pub current: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        NamespaceConfig {
            legacy: "apoli:".to_string(),
            current: "origins:".to_string(),
        }
    }
}

/// All remap tables of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapConfig {
    #[serde(default)]
    pub namespace: NamespaceConfig,
    #[serde(default)]
    pub biome_categories: RemapTable,
    #[serde(default)]
    pub entity_groups: RemapTable,
}

impl RemapConfig {
    /// The tables shipped with the binary.
    pub fn builtin() -> Result<Self, RemapError> {
        Self::from_toml_str("builtin remaps.toml", BUILTIN_REMAPS)
    }

    pub fn from_toml_str(origin: &str, src: &str) -> Result<Self, RemapError> {
        toml::from_str(src).map_err(|source| RemapError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, RemapError> {
        let src = std::fs::read_to_string(path).map_err(|source| RemapError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&path.display().to_string(), &src)
    }

    pub fn resolver(&self) -> TypeResolver {
        TypeResolver::new(&self.namespace.legacy, &self.namespace.current)
    }
}

/// Replace a vocabulary field with a tag and retag the fragment.
///
/// On a hit, `source_key` is removed, `tag` is written with the mapped value
/// and the type becomes `new_type`. An unknown value is an error diagnostic
/// and leaves the fragment as it was.
pub struct ValueRemapRule {
    pub label: &'static str,
    pub source_key: &'static str,
    pub new_type: &'static str,
    pub matching: Match,
    pub table: Arc<RemapTable>,
}

impl Rule for ValueRemapRule {
    fn apply(&self, cx: &RuleContext<'_>, fragment: &mut Fragment) -> Result<(), MigrateError> {
        let Some(old) = fragment.get(self.source_key).and_then(Value::as_str) else {
            cx.error(format!(
                "Missing '{}' field, unable to update {}",
                self.source_key, self.label
            ));
            return Ok(());
        };
        let old = old.to_string();

        let Some(entry) = self.table.lookup(&old, self.matching) else {
            cx.error(format!(
                "No tag known for {} '{}', was unable to find correct tag",
                self.label, old
            ));
            return Ok(());
        };

        fragment.shift_remove(self.source_key);
        fragment.insert("tag".to_string(), Value::String(entry.tag.clone()));
        fragment.insert("type".to_string(), Value::String(self.new_type.to_string()));
        cx.info(format!(
            "Updated {} {} to {} tag ({})",
            self.label, old, entry.tag, self.new_type
        ));
        if let Some(note) = &entry.note {
            cx.warn(note.clone());
        }
        Ok(())
    }
}
