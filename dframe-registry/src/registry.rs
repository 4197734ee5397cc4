//! Generic component registry: load, load-all, unload and reload of one definition kind.

use crate::component::Component;
use crate::files::list_files;
use crate::loader::{resolve_export, ModuleLoader, MANIFEST_EXTENSION};
use dashmap::DashMap;
use dframe_core::{FrameworkError, FrameworkEvent, HandlerCatalog, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument};

/// Kind-specific side effects around the table insert and removal.
pub trait RegistryHooks<C>: Send + Sync {
    /// Runs after `component` has been stored.
    fn loaded(&self, _component: &Arc<C>) {}

    /// Runs before `component` is unloaded or replaced by a reload.
    fn unloading(&self, _component: &C) {}
}

/// Hooks for kinds without side effects.
pub struct NoHooks;

impl<C> RegistryHooks<C> for NoHooks {}

/// Outcome of [`ComponentRegistry::load_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    /// Files that exported nothing loadable or a disabled definition.
    pub skipped: usize,
    pub failed: usize,
}

impl LoadReport {
    pub fn merge(self, other: LoadReport) -> LoadReport {
        LoadReport {
            loaded: self.loaded + other.loaded,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
        }
    }
}

/// Everything a registry shares with its siblings.
#[derive(Clone)]
pub struct RegistryContext {
    pub root_dir: PathBuf,
    pub loader: Arc<dyn ModuleLoader>,
    pub catalog: Arc<HandlerCatalog>,
    pub events: broadcast::Sender<FrameworkEvent>,
}

/// Table of loaded definitions of one kind, keyed by id.
pub struct ComponentRegistry<C: Component> {
    entries: DashMap<String, Arc<C>>,
    ctx: RegistryContext,
    hooks: Box<dyn RegistryHooks<C>>,
}

impl<C: Component> ComponentRegistry<C> {
    pub fn new(ctx: RegistryContext) -> Self {
        Self::with_hooks(ctx, Box::new(NoHooks))
    }

    pub fn with_hooks(ctx: RegistryContext, hooks: Box<dyn RegistryHooks<C>>) -> Self {
        Self {
            entries: DashMap::new(),
            ctx,
            hooks,
        }
    }

    /// Directory scanned by [`load_all`](Self::load_all).
    pub fn directory(&self) -> PathBuf {
        self.ctx.root_dir.join(C::DIRECTORY)
    }

    /// Imports `location` and stores the definition it exports.
    ///
    /// Returns `Ok(false)` when the file exports nothing with a name or a disabled definition.
    /// Unless `is_reload`, an id that is already loaded fails with `ComponentAlreadyLoaded`.
    #[instrument(skip(self, location), fields(kind = C::KIND, path = %location.display()))]
    pub fn load(&self, location: &Path, is_reload: bool) -> Result<bool> {
        let module = self.ctx.loader.import(location)?;
        let options = resolve_export(&module, C::EXPORT);
        if !options.is_object() || options.get("name").map_or(true, |n| n.is_null()) {
            debug!("no definition exported, skipping");
            return Ok(false);
        }

        let mut component = C::build(options, &self.ctx.catalog)?;
        if component.disabled() {
            debug!(id = component.id(), "definition disabled, skipping");
            return Ok(false);
        }
        if !is_reload && self.entries.contains_key(component.id()) {
            return Err(FrameworkError::ComponentAlreadyLoaded {
                kind: C::KIND,
                id: component.id().to_string(),
            });
        }

        component.set_source(location.to_path_buf());
        let id = component.id().to_string();
        let component = Arc::new(component);
        self.entries.insert(id.clone(), Arc::clone(&component));
        self.hooks.loaded(&component);
        info!(id = %id, "component loaded");
        Ok(true)
    }

    /// Loads every manifest under the kind's directory. Failures are logged and published
    /// as [`FrameworkEvent::Error`]; the rest of the batch still loads.
    #[instrument(skip(self), fields(kind = C::KIND))]
    pub fn load_all(&self) -> LoadReport {
        let dir = self.directory();
        let mut report = LoadReport::default();

        for file in list_files(&dir, MANIFEST_EXTENSION) {
            match self.load(&file, false) {
                Ok(true) => report.loaded += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    report.failed += 1;
                    error!(path = %file.display(), error = %e, "component failed to load");
                    let _ = self.ctx.events.send(FrameworkEvent::error(FrameworkError::ComponentLoadError {
                        kind: C::KIND,
                        path: file.clone(),
                        source: Box::new(e),
                    }));
                }
            }
        }

        info!(
            dir = %dir.display(),
            loaded = report.loaded,
            skipped = report.skipped,
            failed = report.failed,
            "components loaded"
        );
        report
    }

    /// Detaches `id` and drops its cached module. The entry itself is kept when `is_reload`.
    #[instrument(skip(self), fields(kind = C::KIND))]
    pub fn unload(&self, id: &str, is_reload: bool) -> Result<()> {
        let component = self.get(id).ok_or_else(|| FrameworkError::UnknownComponent {
            kind: C::KIND,
            id: id.to_string(),
        })?;

        self.hooks.unloading(&component);
        if let Some(source) = component.source() {
            self.ctx.loader.invalidate(source);
        }
        if !is_reload {
            self.entries.remove(id);
            info!(id, "component unloaded");
        }
        Ok(())
    }

    /// Re-imports the file `id` was loaded from and replaces the entry in place.
    ///
    /// Not transactional: if the reload fails, the old entry stays but is already detached.
    #[instrument(skip(self), fields(kind = C::KIND))]
    pub fn reload(&self, id: &str) -> Result<bool> {
        let component = self.get(id).ok_or_else(|| FrameworkError::UnknownComponent {
            kind: C::KIND,
            id: id.to_string(),
        })?;
        let source = component
            .source()
            .map(Path::to_path_buf)
            .ok_or_else(|| FrameworkError::UnknownComponent {
                kind: C::KIND,
                id: id.to_string(),
            })?;

        self.unload(id, true)?;
        self.load(&source, true)
    }

    pub fn get(&self, id: &str) -> Option<Arc<C>> {
        self.entries.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Loaded ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        ids.sort_unstable();
        ids
    }

    /// Snapshot of the loaded definitions, sorted by id.
    pub fn values(&self) -> Vec<Arc<C>> {
        let mut values: Vec<Arc<C>> = self.entries.iter().map(|e| Arc::clone(e.value())).collect();
        values.sort_by(|a, b| a.id().cmp(b.id()));
        values
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
