//! Command definitions: the shared base plus message, slash, and context-menu specifics.

use crate::handler::{CommandAutocompleteHandler, InteractionCommandHandler, MessageCommandHandler};
use crate::permissions::Permissions;
use crate::types::{ChannelKind, InteractionKind};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// How a command is invoked. Also the prefix of its id (`Slash:ping`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    Slash,
    Message,
    ContextMessage,
    ContextUser,
}

impl CommandType {
    pub const NAMES: [&'static str; 4] = ["Slash", "Message", "ContextMessage", "ContextUser"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Slash => "Slash",
            CommandType::Message => "Message",
            CommandType::ContextMessage => "ContextMessage",
            CommandType::ContextUser => "ContextUser",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Slash" => Some(CommandType::Slash),
            "Message" => Some(CommandType::Message),
            "ContextMessage" => Some(CommandType::ContextMessage),
            "ContextUser" => Some(CommandType::ContextUser),
            _ => None,
        }
    }

    /// Command type an interaction addresses; `None` for non-command interactions.
    pub fn from_interaction(kind: InteractionKind) -> Option<Self> {
        match kind {
            InteractionKind::ChatInput => Some(CommandType::Slash),
            InteractionKind::UserContextMenu => Some(CommandType::ContextUser),
            InteractionKind::MessageContextMenu => Some(CommandType::ContextMessage),
            _ => None,
        }
    }

    /// Platform application-command type: 1 chat input, 2 user, 3 message.
    pub fn application_type(&self) -> u8 {
        match self {
            CommandType::Slash => 1,
            CommandType::ContextUser => 2,
            CommandType::ContextMessage | CommandType::Message => 3,
        }
    }

    /// Builds a command id: `<type>:<name>`.
    pub fn id_for(&self, name: &str) -> String {
        format!("{}:{}", self.as_str(), name)
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an application command may be published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandScope {
    /// Both guild and global publishing.
    Default,
    Guild,
    Global,
}

impl CommandScope {
    pub const NAMES: [&'static str; 3] = ["default", "guild", "global"];

    pub(crate) fn parse(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "default" => Some(CommandScope::Default),
            "guild" => Some(CommandScope::Guild),
            "global" => Some(CommandScope::Global),
            _ => None,
        }
    }
}

/// Where a command may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandContext {
    Guild,
    BotDm,
    PrivateChannel,
}

impl CommandContext {
    pub const NAMES: [&'static str; 6] = ["Guild", "BotDM", "PrivateChannel", "0", "1", "2"];
    pub const MESSAGE_NAMES: [&'static str; 2] = ["BotDM", "Guild"];

    /// Accepts the names or their numeric codes.
    pub(crate) fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => match s.as_str() {
                "Guild" => Some(CommandContext::Guild),
                "BotDM" => Some(CommandContext::BotDm),
                "PrivateChannel" => Some(CommandContext::PrivateChannel),
                _ => None,
            },
            Value::Number(n) => match n.as_u64()? {
                0 => Some(CommandContext::Guild),
                1 => Some(CommandContext::BotDm),
                2 => Some(CommandContext::PrivateChannel),
                _ => None,
            },
            _ => None,
        }
    }

    /// Message commands only distinguish servers from the bot's DMs, by name.
    pub(crate) fn parse_message(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "Guild" => Some(CommandContext::Guild),
            "BotDM" => Some(CommandContext::BotDm),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            CommandContext::Guild => 0,
            CommandContext::BotDm => 1,
            CommandContext::PrivateChannel => 2,
        }
    }

    pub fn matches(&self, channel: ChannelKind) -> bool {
        matches!(
            (self, channel),
            (CommandContext::Guild, ChannelKind::Guild)
                | (CommandContext::BotDm, ChannelKind::BotDm)
                | (CommandContext::PrivateChannel, ChannelKind::PrivateChannel)
        )
    }
}

/// Where the application may be installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrationType {
    GuildInstall,
    UserInstall,
}

impl IntegrationType {
    pub const NAMES: [&'static str; 4] = ["GuildInstall", "UserInstall", "0", "1"];

    pub(crate) fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => match s.as_str() {
                "GuildInstall" => Some(IntegrationType::GuildInstall),
                "UserInstall" => Some(IntegrationType::UserInstall),
                _ => None,
            },
            Value::Number(n) => match n.as_u64()? {
                0 => Some(IntegrationType::GuildInstall),
                1 => Some(IntegrationType::UserInstall),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            IntegrationType::GuildInstall => 0,
            IntegrationType::UserInstall => 1,
        }
    }
}

/// Settings shared by slash and context-menu commands.
#[derive(Debug, Clone, PartialEq)]
pub struct AppCommandSettings {
    pub scope: CommandScope,
    pub contexts: Vec<CommandContext>,
    pub integration_types: Vec<IntegrationType>,
    pub name_localizations: Option<BTreeMap<String, String>>,
    pub description_localizations: Option<BTreeMap<String, String>>,
}

/// Kind-specific part of a command.
#[derive(Clone)]
pub enum CommandKind {
    Slash {
        app: AppCommandSettings,
        /// Application-command option objects, passed through to registration.
        options: Vec<Value>,
        execute: Arc<dyn InteractionCommandHandler>,
        autocomplete: Option<Arc<dyn CommandAutocompleteHandler>>,
    },
    Context {
        app: AppCommandSettings,
        execute: Arc<dyn InteractionCommandHandler>,
    },
    Message {
        aliases: Vec<String>,
        usage: Option<String>,
        dev_only: bool,
        contexts: Vec<CommandContext>,
        execute: Arc<dyn MessageCommandHandler>,
    },
}

impl fmt::Debug for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::Slash {
                app,
                options,
                autocomplete,
                ..
            } => f
                .debug_struct("Slash")
                .field("app", app)
                .field("options", options)
                .field("autocomplete", &autocomplete.is_some())
                .finish_non_exhaustive(),
            CommandKind::Context { app, .. } => {
                f.debug_struct("Context").field("app", app).finish_non_exhaustive()
            }
            CommandKind::Message {
                aliases,
                usage,
                dev_only,
                contexts,
                ..
            } => f
                .debug_struct("Message")
                .field("aliases", aliases)
                .field("usage", usage)
                .field("dev_only", dev_only)
                .field("contexts", contexts)
                .finish_non_exhaustive(),
        }
    }
}

/// A validated command definition.
#[derive(Debug, Clone)]
pub struct Command {
    pub id: String,
    pub name: String,
    pub description: String,
    pub command_type: CommandType,
    /// Milliseconds; only enforced above the one-second floor.
    pub cooldown: Option<u64>,
    pub member_permissions: Option<Permissions>,
    pub client_permissions: Option<Permissions>,
    pub disabled: bool,
    /// File the definition was loaded from; set by the registry.
    pub source: Option<PathBuf>,
    pub kind: CommandKind,
}

impl Command {
    pub fn app_settings(&self) -> Option<&AppCommandSettings> {
        match &self.kind {
            CommandKind::Slash { app, .. } | CommandKind::Context { app, .. } => Some(app),
            CommandKind::Message { .. } => None,
        }
    }

    pub fn scope(&self) -> Option<CommandScope> {
        self.app_settings().map(|app| app.scope)
    }

    pub fn aliases(&self) -> &[String] {
        match &self.kind {
            CommandKind::Message { aliases, .. } => aliases,
            _ => &[],
        }
    }

    pub fn dev_only(&self) -> bool {
        matches!(self.kind, CommandKind::Message { dev_only: true, .. })
    }

    /// Whether a message command may run in the given channel kind.
    pub fn runs_in(&self, channel: ChannelKind) -> bool {
        match &self.kind {
            CommandKind::Message { contexts, .. } => contexts.iter().any(|c| c.matches(channel)),
            CommandKind::Slash { app, .. } | CommandKind::Context { app, .. } => {
                app.contexts.iter().any(|c| c.matches(channel))
            }
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}
