//! # dframe-registry
//!
//! Discovers definition manifests under the component root and keeps one table per kind:
//! commands (with aliases), listeners (subscribed to the [`EventBus`]) and autocompleters.
//! Supports load, load-all, unload and in-place reload.

pub mod commands;
pub mod component;
pub mod event_bus;
pub mod files;
pub mod listeners;
pub mod loader;
pub mod registry;

pub use commands::{AliasTable, CommandRegistry};
pub use component::Component;
pub use event_bus::EventBus;
pub use files::list_files;
pub use listeners::ListenerRegistry;
pub use loader::{resolve_export, ManifestLoader, ModuleLoader, MANIFEST_EXTENSION};
pub use registry::{ComponentRegistry, LoadReport, NoHooks, RegistryContext, RegistryHooks};

/// Registry of standalone autocompleters, keyed by option name.
pub type AutocompleteRegistry = ComponentRegistry<dframe_core::Autocompleter>;
