//! Convenience accessors on inbound messages.

use crate::platform::BotContext;
use crate::types::IncomingMessage;

/// Helpers handlers use on the message that triggered them.
pub trait MessageExt {
    /// Message-command prefix in effect for this message.
    fn prefix<'a>(&self, bot: &'a BotContext) -> &'a str;

    /// Whether the author is one of the configured developers.
    fn is_developer(&self, bot: &BotContext) -> bool;
}

impl MessageExt for IncomingMessage {
    fn prefix<'a>(&self, bot: &'a BotContext) -> &'a str {
        bot.prefix()
    }

    fn is_developer(&self, bot: &BotContext) -> bool {
        bot.is_developer(&self.author.id)
    }
}
