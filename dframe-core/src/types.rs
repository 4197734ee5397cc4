//! Core types: users, inbound messages, interactions, and the client events that carry them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identity (a member, or the bot itself).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    /// Whether the account is a bot; bot-authored messages never trigger commands.
    pub bot: bool,
}

impl User {
    /// Display name, falling back to the username and then the id.
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or(self.id.as_str())
    }
}

/// Where a message or interaction originates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    /// A channel inside a server (guild, group chat).
    Guild,
    /// The direct-message channel between a user and the bot.
    BotDm,
    /// Any other private channel (other users' DMs, group DMs).
    PrivateChannel,
}

/// An inbound chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: String,
    pub author: User,
    pub channel_id: String,
    /// Set when the message was posted inside a server.
    pub guild_id: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl IncomingMessage {
    /// True when the message was posted inside a server.
    pub fn in_guild(&self) -> bool {
        self.guild_id.is_some()
    }
}

/// A message the bot has sent; enough to delete it later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    pub id: String,
    pub channel_id: String,
}

/// Interaction variants delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    ChatInput,
    UserContextMenu,
    MessageContextMenu,
    Autocomplete,
    Button,
    SelectMenu,
    ModalSubmit,
}

/// One option value attached to an interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionOption {
    pub name: String,
    pub value: serde_json::Value,
    /// Marks the option the user is currently typing (autocomplete only).
    #[serde(default)]
    pub focused: bool,
}

/// An inbound interaction: slash command, context menu, autocomplete, or component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub kind: InteractionKind,
    /// Command name for command and autocomplete interactions, custom id for components.
    pub command_name: String,
    pub user: User,
    pub guild_id: Option<String>,
    pub channel_id: Option<String>,
    pub channel_kind: ChannelKind,
    #[serde(default)]
    pub options: Vec<InteractionOption>,
    /// Target user or message id for context-menu commands.
    pub target_id: Option<String>,
}

impl Interaction {
    /// True for chat-input and context-menu command interactions.
    pub fn is_command(&self) -> bool {
        matches!(
            self.kind,
            InteractionKind::ChatInput
                | InteractionKind::UserContextMenu
                | InteractionKind::MessageContextMenu
        )
    }

    /// The option currently being typed, if any.
    pub fn focused_option(&self) -> Option<&InteractionOption> {
        self.options.iter().find(|o| o.focused)
    }

    /// Looks up an option by name.
    pub fn option(&self, name: &str) -> Option<&InteractionOption> {
        self.options.iter().find(|o| o.name == name)
    }
}

impl InteractionOption {
    /// The value as typed text; non-string values are rendered as JSON.
    pub fn text(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Events delivered by the platform client. Listeners subscribe by [`ClientEvent::name`].
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// The client connected; carries the bot's own user.
    Ready(User),
    MessageCreate(IncomingMessage),
    InteractionCreate(Interaction),
    /// Re-emitted component interaction (button, select menu, modal submit).
    Component(Interaction),
    /// Any other platform event, addressed by name.
    Custom {
        name: String,
        payload: serde_json::Value,
    },
}

impl ClientEvent {
    /// Event name used for listener ids (`Client:<name>`).
    pub fn name(&self) -> &str {
        match self {
            ClientEvent::Ready(_) => "ready",
            ClientEvent::MessageCreate(_) => "messageCreate",
            ClientEvent::InteractionCreate(_) => "interactionCreate",
            ClientEvent::Component(interaction) => match interaction.kind {
                InteractionKind::Button => "buttonInteraction",
                InteractionKind::SelectMenu => "selectMenuInteraction",
                _ => "modalSubmitInteraction",
            },
            ClientEvent::Custom { name, .. } => name,
        }
    }
}

/// Handle for a live event-bus subscription, kept on the listener that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);
