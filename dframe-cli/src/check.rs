//! `dframe check`: loads every definition kind and collects what went wrong.

use dframe_core::{FrameworkEvent, FrameworkSettings, HandlerCatalog};
use dframe_registry::{
    AutocompleteRegistry, CommandRegistry, EventBus, ListenerRegistry, LoadReport, ManifestLoader, RegistryContext,
};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Loaded ids per kind plus every load error, in the order they were reported.
#[derive(Debug, Default)]
pub struct CheckSummary {
    pub commands: Vec<String>,
    pub listeners: Vec<String>,
    pub autocomplete: Vec<String>,
    pub report: LoadReport,
    pub errors: Vec<String>,
}

impl CheckSummary {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn check_components(settings: &FrameworkSettings, catalog: HandlerCatalog) -> CheckSummary {
    let (events, mut errors) = broadcast::channel(1024);
    let ctx = RegistryContext {
        root_dir: settings.root_dir.clone(),
        loader: Arc::new(ManifestLoader::new()),
        catalog: Arc::new(catalog),
        events,
    };
    let completers = AutocompleteRegistry::new(ctx.clone());
    let commands = CommandRegistry::new(ctx.clone());
    let listeners = ListenerRegistry::new(ctx, Arc::new(EventBus::new()));

    let report = completers
        .load_all()
        .merge(commands.load_all())
        .merge(listeners.load_all());

    let mut summary = CheckSummary {
        commands: commands.ids(),
        listeners: listeners.ids(),
        autocomplete: completers.ids(),
        report,
        errors: Vec::new(),
    };
    while let Ok(FrameworkEvent::Error(e)) = errors.try_recv() {
        summary.errors.push(e.to_string());
    }
    summary
}
