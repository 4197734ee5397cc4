//! [`TelegramPlatform`]: the Bot API behind [`dframe_core::Platform`].
//!
//! Telegram has no per-channel permission overwrites, so snapshots only carry the chat-wide
//! set derived from the member's status and admin rights.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dframe_core::{
    ApplicationCommandData, FrameworkError, IncomingMessage, Interaction, PermissionSnapshot, Permissions, Platform,
    Result, SentMessage,
};
use std::sync::RwLock;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, BotCommandScope, ChatId, ChatMember, MessageId, Recipient, ReplyParameters, UserId};
use tracing::{debug, info, instrument};

/// Bot identity learned from `getMe`.
#[derive(Debug, Clone)]
struct Identity {
    id: UserId,
    username: Option<String>,
    first_name: String,
}

/// Wraps teloxide::Bot and implements the framework's platform trait.
pub struct TelegramPlatform {
    bot: teloxide::Bot,
    identity: RwLock<Option<Identity>>,
}

impl TelegramPlatform {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self {
            bot,
            identity: RwLock::new(None),
        }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }

    /// Calls `getMe` and remembers the bot's id and username. Returns the bot user.
    #[instrument(skip(self))]
    pub async fn identify(&self) -> Result<dframe_core::User> {
        let me = self.bot.get_me().await.map_err(platform_error)?;
        let identity = Identity {
            id: me.user.id,
            username: me.user.username.clone(),
            first_name: me.user.first_name.clone(),
        };
        info!(username = ?identity.username, "bot identity resolved");
        *self.identity.write().unwrap_or_else(|e| e.into_inner()) = Some(identity);
        Ok(crate::adapters::TelegramUser(&me.user).to_core())
    }

    pub fn username(&self) -> Option<String> {
        self.identity().and_then(|i| i.username)
    }

    fn identity(&self) -> Option<Identity> {
        self.identity.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    async fn snapshot(&self, chat: &str, user: UserId) -> Result<PermissionSnapshot> {
        let member = self
            .bot
            .get_chat_member(parse_chat(chat)?, user)
            .await
            .map_err(platform_error)?;
        Ok(PermissionSnapshot {
            channel: None,
            guild: MemberRights::from_member(&member).permissions(),
        })
    }
}

/// The parts of a chat member's status that map onto permission flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberRights {
    pub owner: bool,
    pub present: bool,
    pub administrator: bool,
    pub can_manage_chat: bool,
    pub can_delete_messages: bool,
    pub can_restrict_members: bool,
    pub can_promote_members: bool,
    pub can_change_info: bool,
    pub can_invite_users: bool,
    pub can_pin_messages: bool,
}

impl MemberRights {
    pub fn from_member(member: &ChatMember) -> Self {
        Self {
            owner: member.is_owner(),
            present: member.is_present(),
            administrator: member.is_administrator(),
            can_manage_chat: member.can_manage_chat(),
            can_delete_messages: member.can_delete_messages(),
            can_restrict_members: member.can_restrict_members(),
            can_promote_members: member.can_promote_members(),
            can_change_info: member.can_change_info(),
            can_invite_users: member.can_invite_users(),
            can_pin_messages: member.can_pin_messages(),
        }
    }

    /// Owners hold `Administrator`; present members can read and send; admin rights add the rest.
    pub fn permissions(&self) -> Permissions {
        if self.owner {
            return Permissions::ADMINISTRATOR;
        }
        let mut names = Vec::new();
        if self.present {
            names.extend(["ViewChannel", "SendMessages", "ReadMessageHistory", "EmbedLinks", "AttachFiles", "AddReactions"]);
        }
        let rights = [
            (self.can_manage_chat, "ManageGuild"),
            (self.can_delete_messages, "ManageMessages"),
            (self.can_restrict_members, "BanMembers"),
            (self.can_restrict_members, "KickMembers"),
            (self.can_restrict_members, "ModerateMembers"),
            (self.can_promote_members, "ManageRoles"),
            (self.can_change_info, "ManageChannels"),
            (self.can_invite_users, "CreateInstantInvite"),
            (self.can_pin_messages, "ManageThreads"),
        ];
        names.extend(rights.iter().filter(|(granted, _)| *granted).map(|(_, name)| *name));
        names
            .into_iter()
            .filter_map(Permissions::from_name)
            .fold(Permissions::empty(), |acc, p| acc | p)
    }
}

fn platform_error(e: impl std::fmt::Display) -> FrameworkError {
    FrameworkError::Platform(e.to_string())
}

fn parse_chat(raw: &str) -> Result<ChatId> {
    raw.parse::<i64>()
        .map(ChatId)
        .map_err(|_| FrameworkError::Platform(format!("invalid chat id: {}", raw)))
}

fn parse_message(raw: &str) -> Result<MessageId> {
    raw.parse::<i32>()
        .map(MessageId)
        .map_err(|_| FrameworkError::Platform(format!("invalid message id: {}", raw)))
}

/// Telegram only lists chat-input commands; names must be lowercase.
fn bot_commands(commands: &[ApplicationCommandData]) -> Vec<BotCommand> {
    commands
        .iter()
        .filter(|c| {
            let listed = c.kind == 1;
            if !listed {
                debug!(name = %c.name, "context-menu command has no Telegram equivalent");
            }
            listed
        })
        .map(|c| BotCommand::new(c.name.to_lowercase(), c.description.clone()))
        .collect()
}

/// Human wording of `at` relative to `now`, e.g. `in 42 seconds`.
pub fn relative_phrase(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = ((at - now).num_milliseconds() + 999).div_euclid(1000).max(1);
    match secs {
        1 => "in 1 second".to_string(),
        s if s < 120 => format!("in {} seconds", s),
        s if s < 7200 => format!("in {} minutes", s / 60),
        s => format!("in {} hours", s / 3600),
    }
}

#[async_trait]
impl Platform for TelegramPlatform {
    fn self_mention_pattern(&self) -> Option<String> {
        self.username().map(|u| format!("@{}", u))
    }

    async fn reply(&self, message: &IncomingMessage, text: &str) -> Result<SentMessage> {
        let sent = self
            .bot
            .send_message(parse_chat(&message.channel_id)?, text.to_string())
            .reply_parameters(ReplyParameters::new(parse_message(&message.id)?))
            .await
            .map_err(platform_error)?;
        Ok(SentMessage {
            id: sent.id.to_string(),
            channel_id: sent.chat.id.0.to_string(),
        })
    }

    async fn delete_message(&self, message: &SentMessage) -> Result<()> {
        self.bot
            .delete_message(parse_chat(&message.channel_id)?, parse_message(&message.id)?)
            .await
            .map_err(platform_error)?;
        Ok(())
    }

    /// Telegram has no ephemeral messages; `ephemeral` replies are sent to the chat like any other.
    async fn reply_interaction(&self, interaction: &Interaction, text: &str, _ephemeral: bool) -> Result<()> {
        let chat = interaction
            .channel_id
            .as_deref()
            .ok_or_else(|| FrameworkError::Platform(format!("interaction {} has no chat", interaction.id)))?;
        let mut request = self.bot.send_message(parse_chat(chat)?, text.to_string());
        if let Some((_, message_id)) = interaction.id.rsplit_once(':') {
            request = request.reply_parameters(ReplyParameters::new(parse_message(message_id)?));
        }
        request.await.map_err(platform_error)?;
        Ok(())
    }

    async fn member_permissions(&self, guild_id: &str, _channel_id: &str, user_id: &str) -> Result<PermissionSnapshot> {
        let user = user_id
            .parse::<u64>()
            .map(UserId)
            .map_err(|_| FrameworkError::Platform(format!("invalid user id: {}", user_id)))?;
        self.snapshot(guild_id, user).await
    }

    async fn client_permissions(&self, guild_id: &str, _channel_id: &str) -> Result<PermissionSnapshot> {
        let me = self
            .identity()
            .ok_or_else(|| FrameworkError::Platform("bot identity not resolved".to_string()))?;
        self.snapshot(guild_id, me.id).await
    }

    async fn client_display_name(&self, _guild_id: &str) -> Result<String> {
        self.identity()
            .map(|i| i.first_name)
            .ok_or_else(|| FrameworkError::Platform("bot identity not resolved".to_string()))
    }

    async fn set_global_commands(&self, commands: &[ApplicationCommandData]) -> Result<()> {
        self.bot
            .set_my_commands(bot_commands(commands))
            .await
            .map_err(platform_error)?;
        Ok(())
    }

    async fn set_guild_commands(&self, guild_id: &str, commands: &[ApplicationCommandData]) -> Result<()> {
        let scope = BotCommandScope::Chat {
            chat_id: Recipient::Id(parse_chat(guild_id)?),
        };
        self.bot
            .set_my_commands(bot_commands(commands))
            .scope(scope)
            .await
            .map_err(platform_error)?;
        Ok(())
    }

    fn relative_time(&self, at: DateTime<Utc>) -> String {
        relative_phrase(at, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn data(name: &str, kind: u8) -> ApplicationCommandData {
        ApplicationCommandData {
            name: name.to_string(),
            description: format!("{} command", name),
            kind,
            default_member_permissions: None,
            contexts: vec![0],
            integration_types: vec![0],
            name_localizations: None,
            description_localizations: None,
            options: None,
        }
    }

    #[test]
    fn test_owner_is_administrator() {
        let rights = MemberRights {
            owner: true,
            ..MemberRights::default()
        };
        assert_eq!(rights.permissions(), Permissions::ADMINISTRATOR);
    }

    #[test]
    fn test_member_and_admin_rights() {
        let member = MemberRights {
            present: true,
            ..MemberRights::default()
        };
        let perms = member.permissions();
        assert!(perms.contains(Permissions::from_name("SendMessages").unwrap()));
        assert!(!perms.contains(Permissions::from_name("BanMembers").unwrap()));

        let admin = MemberRights {
            present: true,
            administrator: true,
            can_restrict_members: true,
            can_delete_messages: true,
            ..MemberRights::default()
        };
        let perms = admin.permissions();
        for name in ["BanMembers", "KickMembers", "ManageMessages", "EmbedLinks"] {
            assert!(perms.contains(Permissions::from_name(name).unwrap()), "{}", name);
        }
        assert!(!perms.contains(Permissions::ADMINISTRATOR));
    }

    #[test]
    fn test_departed_member_has_nothing() {
        assert!(MemberRights::default().permissions().is_empty());
    }

    #[test]
    fn test_bot_commands_skip_context_menus() {
        let listed = bot_commands(&[data("Ping", 1), data("inspect", 2)]);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].command, "ping");
    }

    #[test]
    fn test_relative_phrase() {
        let now = Utc::now();
        assert_eq!(relative_phrase(now, now), "in 1 second");
        assert_eq!(relative_phrase(now + Duration::milliseconds(1500), now), "in 2 seconds");
        assert_eq!(relative_phrase(now + Duration::seconds(600), now), "in 10 minutes");
        assert_eq!(relative_phrase(now + Duration::hours(5), now), "in 5 hours");
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(parse_chat("-1001").unwrap(), ChatId(-1001));
        assert!(matches!(parse_chat("general"), Err(FrameworkError::Platform(_))));
        assert_eq!(parse_message("42").unwrap(), MessageId(42));
    }
}
