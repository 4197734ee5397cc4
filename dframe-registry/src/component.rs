//! The [`Component`] trait ties a definition kind to its directory, export key and factory.

use dframe_core::definition::{self, Autocompleter, Command, Listener};
use dframe_core::{HandlerCatalog, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A definition kind the registry can load from disk.
pub trait Component: Send + Sync + Sized + 'static {
    /// Label used in errors and logs.
    const KIND: &'static str;
    /// Subdirectory of the root scanned by `load_all`.
    const DIRECTORY: &'static str;
    /// Named export table checked first in a manifest.
    const EXPORT: &'static str;

    fn build(options: &Value, catalog: &HandlerCatalog) -> Result<Self>;

    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn disabled(&self) -> bool;
    fn source(&self) -> Option<&Path>;
    fn set_source(&mut self, path: PathBuf);
}

impl Component for Command {
    const KIND: &'static str = "command";
    const DIRECTORY: &'static str = "commands";
    const EXPORT: &'static str = "command";

    fn build(options: &Value, catalog: &HandlerCatalog) -> Result<Self> {
        definition::build_command(options, catalog)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn disabled(&self) -> bool {
        self.disabled
    }

    fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn set_source(&mut self, path: PathBuf) {
        self.source = Some(path);
    }
}

impl Component for Listener {
    const KIND: &'static str = "listener";
    const DIRECTORY: &'static str = "listeners";
    const EXPORT: &'static str = "listener";

    fn build(options: &Value, catalog: &HandlerCatalog) -> Result<Self> {
        definition::listener(options, catalog)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn disabled(&self) -> bool {
        self.disabled
    }

    fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn set_source(&mut self, path: PathBuf) {
        self.source = Some(path);
    }
}

impl Component for Autocompleter {
    const KIND: &'static str = "autocomplete";
    const DIRECTORY: &'static str = "autocomplete";
    const EXPORT: &'static str = "autocomplete";

    fn build(options: &Value, catalog: &HandlerCatalog) -> Result<Self> {
        definition::autocompleter(options, catalog)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn disabled(&self) -> bool {
        self.disabled
    }

    fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn set_source(&mut self, path: PathBuf) {
        self.source = Some(path);
    }
}
