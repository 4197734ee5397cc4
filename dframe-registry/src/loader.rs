//! Module loading: definition files are TOML manifests parsed into a JSON options tree.
//!
//! Parsed documents are cached by path until [`ModuleLoader::invalidate`] is called, so a
//! reload always re-reads the file from disk while repeated imports stay cheap.

use dashmap::DashMap;
use dframe_core::{FrameworkError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// File extension of definition manifests.
pub const MANIFEST_EXTENSION: &str = "toml";

/// Imports definition modules by path.
pub trait ModuleLoader: Send + Sync {
    /// Returns the module document at `path`, from cache when available.
    fn import(&self, path: &Path) -> Result<Arc<Value>>;

    /// Drops any cached document for `path`.
    fn invalidate(&self, path: &Path);
}

/// [`ModuleLoader`] over TOML manifest files.
#[derive(Debug, Default)]
pub struct ManifestLoader {
    cache: DashMap<PathBuf, Arc<Value>>,
}

impl ManifestLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cached(&self, path: &Path) -> bool {
        self.cache.contains_key(path)
    }

    fn parse(path: &Path) -> Result<Value> {
        let text = std::fs::read_to_string(path).map_err(|e| FrameworkError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let table: toml::Table = toml::from_str(&text).map_err(|e| FrameworkError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::to_value(table).map_err(|e| FrameworkError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl ModuleLoader for ManifestLoader {
    fn import(&self, path: &Path) -> Result<Arc<Value>> {
        if let Some(doc) = self.cache.get(path) {
            return Ok(Arc::clone(doc.value()));
        }
        let doc = Arc::new(Self::parse(path)?);
        debug!(path = %path.display(), "manifest parsed");
        self.cache.insert(path.to_path_buf(), Arc::clone(&doc));
        Ok(doc)
    }

    fn invalidate(&self, path: &Path) {
        if self.cache.remove(path).is_some() {
            debug!(path = %path.display(), "manifest cache invalidated");
        }
    }
}

/// Picks the exported definition out of a module document.
///
/// Priority: the named table (`command`, `listener`, `autocomplete`), then `default.default`,
/// then `default`, then the document itself.
pub fn resolve_export<'a>(module: &'a Value, named: &str) -> &'a Value {
    module
        .get(named)
        .or_else(|| module.get("default").and_then(|d| d.get("default")))
        .or_else(|| module.get("default"))
        .unwrap_or(module)
}
