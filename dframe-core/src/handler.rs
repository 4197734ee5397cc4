//! Definition handlers and the catalog that resolves handler keys named in definition files.
//!
//! A definition file names its handler (`execute = "ping"`); the factory resolves that key
//! against the [`HandlerCatalog`] the application builds at start-up. Reloading a definition
//! re-resolves the key, so pointing a file at another handler takes effect on reload.

use crate::definition::Command;
use crate::platform::BotContext;
use crate::types::{ClientEvent, IncomingMessage, Interaction};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Runs a message (prefix) command with its positional arguments.
#[async_trait]
pub trait MessageCommandHandler: Send + Sync {
    async fn execute(&self, bot: &BotContext, message: &IncomingMessage, args: &[String]) -> anyhow::Result<()>;
}

/// Runs a slash or context-menu command.
#[async_trait]
pub trait InteractionCommandHandler: Send + Sync {
    async fn execute(&self, bot: &BotContext, interaction: &Interaction) -> anyhow::Result<()>;
}

/// Inline autocomplete declared by a slash command.
#[async_trait]
pub trait CommandAutocompleteHandler: Send + Sync {
    async fn autocomplete(&self, bot: &BotContext, interaction: &Interaction) -> anyhow::Result<()>;
}

/// Standalone autocompleter, matched by the focused option's name.
#[async_trait]
pub trait AutocompleterHandler: Send + Sync {
    async fn execute(
        &self,
        bot: &BotContext,
        interaction: &Interaction,
        command: &Command,
        value: &str,
    ) -> anyhow::Result<()>;
}

/// Listener for a named client event.
#[async_trait]
pub trait ListenerHandler: Send + Sync {
    async fn execute(&self, bot: &BotContext, event: &ClientEvent) -> anyhow::Result<()>;
}

/// Handler kinds; used to label catalog lookups in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    MessageCommand,
    InteractionCommand,
    CommandAutocomplete,
    Autocompleter,
    Listener,
}

impl HandlerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::MessageCommand => "message command",
            HandlerKind::InteractionCommand => "interaction command",
            HandlerKind::CommandAutocomplete => "command autocomplete",
            HandlerKind::Autocompleter => "autocompleter",
            HandlerKind::Listener => "listener",
        }
    }
}

/// Handlers keyed by the names definition files refer to.
#[derive(Clone, Default)]
pub struct HandlerCatalog {
    message_commands: HashMap<String, Arc<dyn MessageCommandHandler>>,
    interaction_commands: HashMap<String, Arc<dyn InteractionCommandHandler>>,
    command_autocompletes: HashMap<String, Arc<dyn CommandAutocompleteHandler>>,
    autocompleters: HashMap<String, Arc<dyn AutocompleterHandler>>,
    listeners: HashMap<String, Arc<dyn ListenerHandler>>,
}

impl HandlerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_command(mut self, key: impl Into<String>, handler: Arc<dyn MessageCommandHandler>) -> Self {
        self.message_commands.insert(key.into(), handler);
        self
    }

    pub fn interaction_command(
        mut self,
        key: impl Into<String>,
        handler: Arc<dyn InteractionCommandHandler>,
    ) -> Self {
        self.interaction_commands.insert(key.into(), handler);
        self
    }

    pub fn command_autocomplete(
        mut self,
        key: impl Into<String>,
        handler: Arc<dyn CommandAutocompleteHandler>,
    ) -> Self {
        self.command_autocompletes.insert(key.into(), handler);
        self
    }

    pub fn autocompleter(mut self, key: impl Into<String>, handler: Arc<dyn AutocompleterHandler>) -> Self {
        self.autocompleters.insert(key.into(), handler);
        self
    }

    pub fn listener(mut self, key: impl Into<String>, handler: Arc<dyn ListenerHandler>) -> Self {
        self.listeners.insert(key.into(), handler);
        self
    }

    pub fn get_message_command(&self, key: &str) -> Option<Arc<dyn MessageCommandHandler>> {
        self.message_commands.get(key).cloned()
    }

    pub fn get_interaction_command(&self, key: &str) -> Option<Arc<dyn InteractionCommandHandler>> {
        self.interaction_commands.get(key).cloned()
    }

    pub fn get_command_autocomplete(&self, key: &str) -> Option<Arc<dyn CommandAutocompleteHandler>> {
        self.command_autocompletes.get(key).cloned()
    }

    pub fn get_autocompleter(&self, key: &str) -> Option<Arc<dyn AutocompleterHandler>> {
        self.autocompleters.get(key).cloned()
    }

    pub fn get_listener(&self, key: &str) -> Option<Arc<dyn ListenerHandler>> {
        self.listeners.get(key).cloned()
    }
}

impl fmt::Debug for HandlerCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn keys<V>(map: &HashMap<String, V>) -> Vec<&str> {
            let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
            keys.sort_unstable();
            keys
        }
        f.debug_struct("HandlerCatalog")
            .field("message_commands", &keys(&self.message_commands))
            .field("interaction_commands", &keys(&self.interaction_commands))
            .field("command_autocompletes", &keys(&self.command_autocompletes))
            .field("autocompleters", &keys(&self.autocompleters))
            .field("listeners", &keys(&self.listeners))
            .finish()
    }
}
