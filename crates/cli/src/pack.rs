//! Datapack layout: validation, namespaces, document discovery and the
//! plural-to-singular folder renames.

use std::fs;
use std::path::{Path, PathBuf};

use originport_core::{DiagnosticSink, Diagnostic, Severity, Trace};

/// Legacy folders under `data/<namespace>/tags/`.
const TAG_FOLDERS: [(&str, &str); 6] = [
    ("items", "item"),
    ("blocks", "block"),
    ("entity_types", "entity_type"),
    ("fluids", "fluid"),
    ("game_events", "game_event"),
    ("functions", "function"),
];

/// Legacy folders directly under `data/<namespace>/`.
const NAMESPACE_FOLDERS: [(&str, &str); 7] = [
    ("structures", "structure"),
    ("advancements", "advancement"),
    ("recipes", "recipe"),
    ("loot_tables", "loot_table"),
    ("predicates", "predicate"),
    ("item_modifiers", "item_modifier"),
    ("functions", "function"),
];

#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("'{}' is not a valid datapack: missing {}", root.display(), missing.join(", "))]
    Invalid { root: PathBuf, missing: Vec<String> },

    #[error("could not list '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a document under a namespace describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Power,
    Origin,
}

impl DocumentKind {
    fn folder(self) -> &'static str {
        match self {
            DocumentKind::Power => "powers",
            DocumentKind::Origin => "origins",
        }
    }
}

/// A JSON document found in a pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    /// Path relative to the pack root, `/` separated, used in diagnostics.
    pub display: String,
    pub namespace: String,
    pub kind: DocumentKind,
}

impl Document {
    pub fn trace(&self) -> Trace {
        Trace::new(self.display.as_str()).with_namespace(self.namespace.as_str())
    }
}

/// A validated datapack directory.
#[derive(Debug)]
pub struct Datapack {
    root: PathBuf,
}

impl Datapack {
    /// Check for `pack.mcmeta` and a `data/` folder, reporting each that is missing.
    pub fn open(root: &Path) -> Result<Datapack, PackError> {
        let mut missing = Vec::new();
        if !root.join("data").is_dir() {
            missing.push("data folder".to_string());
        }
        if !root.join("pack.mcmeta").is_file() {
            missing.push("pack.mcmeta".to_string());
        }
        if !missing.is_empty() {
            return Err(PackError::Invalid {
                root: root.to_path_buf(),
                missing,
            });
        }
        Ok(Datapack {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Namespace folder names under `data/`, sorted.
    pub fn namespaces(&self) -> Result<Vec<String>, PackError> {
        let data = self.root.join("data");
        let mut names: Vec<String> = read_dir_sorted(&data)?
            .into_iter()
            .filter(|p| p.is_dir())
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Every `.json` file of `kind` in `namespace`, recursively, sorted by path.
    pub fn documents(&self, namespace: &str, kind: DocumentKind) -> Result<Vec<Document>, PackError> {
        let dir = self.namespace_dir(namespace).join(kind.folder());
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        collect_json_files(&dir, &mut files)?;
        files.sort();
        Ok(files
            .into_iter()
            .map(|path| Document {
                display: self.display(&path),
                path,
                namespace: namespace.to_string(),
                kind,
            })
            .collect())
    }

    /// Rename the legacy plural folders of `namespace`, one diagnostic each.
    ///
    /// A folder whose singular name already exists is left in place and
    /// reported as an error.
    pub fn rename_legacy_folders(&self, namespace: &str, sink: &dyn DiagnosticSink) {
        let base = self.namespace_dir(namespace);
        self.rename_all(&base.join("tags"), &TAG_FOLDERS, sink);
        self.rename_all(&base, &NAMESPACE_FOLDERS, sink);
    }

    fn rename_all(&self, dir: &Path, renames: &[(&str, &str)], sink: &dyn DiagnosticSink) {
        let trace = Trace::new(self.display(dir));
        for (old, new) in renames {
            let from = dir.join(old);
            if !from.is_dir() {
                continue;
            }
            let to = dir.join(new);
            let outcome = if to.exists() {
                Err(format!(
                    "Could not rename folder {} to {}: {} already exists",
                    old, new, new
                ))
            } else {
                fs::rename(&from, &to)
                    .map_err(|e| format!("Could not rename folder {} to {}: {}", old, new, e))
            };
            let diagnostic = match outcome {
                Ok(()) => Diagnostic::new(
                    Severity::Info,
                    &trace,
                    format!("Renamed folder {} to {}", old, new),
                ),
                Err(msg) => Diagnostic::new(Severity::Error, &trace, msg),
            };
            sink.emit(diagnostic);
        }
    }

    fn namespace_dir(&self, namespace: &str) -> PathBuf {
        self.root.join("data").join(namespace)
    }

    fn display(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>, PackError> {
    let entries = fs::read_dir(dir).map_err(|source| PackError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    paths.sort();
    Ok(paths)
}

fn collect_json_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), PackError> {
    for path in read_dir_sorted(dir)? {
        if path.is_dir() {
            collect_json_files(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
            out.push(path);
        }
    }
    Ok(())
}
