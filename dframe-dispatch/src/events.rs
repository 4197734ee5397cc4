//! Lifecycle events published by the dispatcher.

use dframe_core::{Autocompleter, Command, FrameworkEvent, IncomingMessage, Interaction};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of each lifecycle channel; slow subscribers lag and miss older events.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// What triggered a command.
#[derive(Debug, Clone)]
pub enum Invocation {
    Message(IncomingMessage),
    Interaction(Interaction),
}

impl Invocation {
    pub fn user_id(&self) -> &str {
        match self {
            Invocation::Message(message) => &message.author.id,
            Invocation::Interaction(interaction) => &interaction.user.id,
        }
    }

    pub fn guild_id(&self) -> Option<&str> {
        match self {
            Invocation::Message(message) => message.guild_id.as_deref(),
            Invocation::Interaction(interaction) => interaction.guild_id.as_deref(),
        }
    }
}

/// Command lifecycle.
#[derive(Debug, Clone)]
pub enum CommandEvent {
    Execute {
        invocation: Invocation,
        command: Arc<Command>,
    },
    Success {
        invocation: Invocation,
        command: Arc<Command>,
    },
    Error {
        invocation: Invocation,
        command: Arc<Command>,
        error: Arc<anyhow::Error>,
    },
    /// An interaction named a command that is not loaded, is disabled, or is a message command.
    Unknown(Interaction),
}

/// Autocomplete lifecycle. `completer` is `None` when the command's inline handler ran.
#[derive(Debug, Clone)]
pub enum AutocompleteEvent {
    Execute {
        interaction: Interaction,
        command: Arc<Command>,
        completer: Option<Arc<Autocompleter>>,
    },
    Success {
        interaction: Interaction,
        command: Arc<Command>,
        completer: Option<Arc<Autocompleter>>,
    },
    Error {
        interaction: Interaction,
        command: Arc<Command>,
        completer: Option<Arc<Autocompleter>>,
        error: Arc<anyhow::Error>,
    },
    Unknown(Interaction),
}

/// Broadcast senders for every event stream. Sending with no subscribers is not an error.
#[derive(Clone)]
pub struct EventChannels {
    pub commands: broadcast::Sender<CommandEvent>,
    pub autocomplete: broadcast::Sender<AutocompleteEvent>,
    pub framework: broadcast::Sender<FrameworkEvent>,
}

impl Default for EventChannels {
    fn default() -> Self {
        Self {
            commands: broadcast::channel(EVENT_CHANNEL_CAPACITY).0,
            autocomplete: broadcast::channel(EVENT_CHANNEL_CAPACITY).0,
            framework: broadcast::channel(EVENT_CHANNEL_CAPACITY).0,
        }
    }
}

impl EventChannels {
    pub fn command(&self, event: CommandEvent) {
        let _ = self.commands.send(event);
    }

    pub fn autocomplete(&self, event: AutocompleteEvent) {
        let _ = self.autocomplete.send(event);
    }

    pub fn framework(&self, event: FrameworkEvent) {
        let _ = self.framework.send(event);
    }
}
