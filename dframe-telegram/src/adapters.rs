//! teloxide 类型到框架类型的适配。
//!
//! 群组与超级群组映射为 guild（chat id 同时作为 guild id 与 channel id）；私聊映射为 bot 的私信。

use dframe_core::{ChannelKind, ClientEvent, IncomingMessage, Interaction, InteractionKind, InteractionOption, User};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUser<'a>(pub &'a teloxide::types::User);

impl<'a> TelegramUser<'a> {
    pub fn to_core(&self) -> User {
        User {
            id: self.0.id.0.to_string(),
            username: self.0.username.clone(),
            display_name: Some(self.0.full_name()),
            bot: self.0.is_bot,
        }
    }
}

/// Wraps a teloxide Message for conversion to a client event.
pub struct TelegramMessage<'a>(pub &'a teloxide::types::Message);

impl<'a> TelegramMessage<'a> {
    /// Core message; `None` for channel posts and other messages without a sender.
    pub fn to_core(&self) -> Option<IncomingMessage> {
        let author = self.0.from.as_ref().map(|u| TelegramUser(u).to_core())?;
        let chat_id = self.0.chat.id.0.to_string();
        let in_group = self.0.chat.is_group() || self.0.chat.is_supergroup();
        Some(IncomingMessage {
            id: self.0.id.to_string(),
            author,
            guild_id: in_group.then(|| chat_id.clone()),
            channel_id: chat_id,
            content: self.0.text().unwrap_or("").to_string(),
            created_at: self.0.date,
        })
    }

    /// `/name` messages become chat-input interactions, everything else a message event.
    pub fn to_event(&self, bot_username: Option<&str>) -> Option<ClientEvent> {
        let message = self.to_core()?;
        Some(match command_interaction(&message, bot_username) {
            Some(interaction) => ClientEvent::InteractionCreate(interaction),
            None => ClientEvent::MessageCreate(message),
        })
    }
}

/// Reads `/name[@bot] rest` as a chat-input interaction. The text after the name is passed as
/// the string option `input`. Commands addressed to another bot are not ours.
pub fn command_interaction(message: &IncomingMessage, bot_username: Option<&str>) -> Option<Interaction> {
    let body = message.content.strip_prefix('/')?;
    let (head, rest) = match body.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (body, ""),
    };
    let name = match head.split_once('@') {
        Some((name, target)) => {
            if bot_username.map_or(true, |me| !me.eq_ignore_ascii_case(target)) {
                return None;
            }
            name
        }
        None => head,
    };
    if name.is_empty() {
        return None;
    }

    let options = if rest.is_empty() {
        Vec::new()
    } else {
        vec![InteractionOption {
            name: "input".to_string(),
            value: serde_json::Value::String(rest.to_string()),
            focused: false,
        }]
    };
    Some(Interaction {
        id: format!("{}:{}", message.channel_id, message.id),
        kind: InteractionKind::ChatInput,
        command_name: name.to_lowercase(),
        user: message.author.clone(),
        guild_id: message.guild_id.clone(),
        channel_id: Some(message.channel_id.clone()),
        channel_kind: if message.in_guild() {
            ChannelKind::Guild
        } else {
            ChannelKind::BotDm
        },
        options,
        target_id: None,
    })
}
