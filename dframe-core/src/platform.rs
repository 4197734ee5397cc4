//! Platform abstraction for replies, deletions, capability lookups, and command publishing.
//!
//! [`Platform`] is transport-agnostic; `dframe-telegram` implements it via teloxide and tests
//! substitute a recording mock.

use crate::definition::ApplicationCommandData;
use crate::error::Result;
use crate::permissions::PermissionSnapshot;
use crate::settings::FrameworkSettings;
use crate::types::{IncomingMessage, Interaction, SentMessage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Operations the dispatcher needs from the chat platform.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Regex fragment matching a mention of the bot at the start of a message (e.g. `<@!?42>`
    /// or `@my_bot`). `None` until the client knows its own identity.
    fn self_mention_pattern(&self) -> Option<String>;

    /// Replies to a message in its channel and returns the sent message.
    async fn reply(&self, message: &IncomingMessage, text: &str) -> Result<SentMessage>;

    /// Deletes a message previously sent by the bot.
    async fn delete_message(&self, message: &SentMessage) -> Result<()>;

    /// Responds to a command interaction. `ephemeral` replies are visible to the invoker only.
    async fn reply_interaction(&self, interaction: &Interaction, text: &str, ephemeral: bool) -> Result<()>;

    /// Capabilities of `user_id` in `guild_id`, channel-scoped where resolvable.
    async fn member_permissions(
        &self,
        guild_id: &str,
        channel_id: &str,
        user_id: &str,
    ) -> Result<PermissionSnapshot>;

    /// Capabilities of the bot itself in `guild_id`, channel-scoped where resolvable.
    async fn client_permissions(&self, guild_id: &str, channel_id: &str) -> Result<PermissionSnapshot>;

    /// The bot's display name inside `guild_id`.
    async fn client_display_name(&self, guild_id: &str) -> Result<String>;

    /// Replaces the global application commands.
    async fn set_global_commands(&self, commands: &[ApplicationCommandData]) -> Result<()>;

    /// Replaces the application commands of one guild.
    async fn set_guild_commands(&self, guild_id: &str, commands: &[ApplicationCommandData]) -> Result<()>;

    /// Renders a point in time relative to now, as the platform displays it.
    fn relative_time(&self, at: DateTime<Utc>) -> String {
        unix_timestamp(at, 'R')
    }
}

/// Platform timestamp markup: `<t:SECONDS:STYLE>`.
pub fn unix_timestamp(at: DateTime<Utc>, style: char) -> String {
    format!("<t:{}:{}>", at.timestamp(), style)
}

/// What definition handlers receive besides the triggering context: the platform and settings.
#[derive(Clone)]
pub struct BotContext {
    pub platform: Arc<dyn Platform>,
    pub settings: Arc<FrameworkSettings>,
}

impl BotContext {
    pub fn new(platform: Arc<dyn Platform>, settings: Arc<FrameworkSettings>) -> Self {
        Self { platform, settings }
    }

    pub fn prefix(&self) -> &str {
        &self.settings.prefix
    }

    pub fn is_developer(&self, user_id: &str) -> bool {
        self.settings.is_developer(user_id)
    }
}
