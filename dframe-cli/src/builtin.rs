//! Handlers bundled with the binary, so a component root can be run without writing Rust.
//!
//! Keys: `ping` (message and interaction), `echo` (message and interaction), `log` (listener).

use async_trait::async_trait;
use dframe_core::{
    BotContext, ClientEvent, HandlerCatalog, IncomingMessage, Interaction, InteractionCommandHandler, ListenerHandler,
    MessageCommandHandler,
};
use std::sync::Arc;
use tracing::info;

pub const PONG: &str = "Pong!";

struct Ping;

#[async_trait]
impl MessageCommandHandler for Ping {
    async fn execute(&self, bot: &BotContext, message: &IncomingMessage, _args: &[String]) -> anyhow::Result<()> {
        bot.platform.reply(message, PONG).await?;
        Ok(())
    }
}

#[async_trait]
impl InteractionCommandHandler for Ping {
    async fn execute(&self, bot: &BotContext, interaction: &Interaction) -> anyhow::Result<()> {
        bot.platform.reply_interaction(interaction, PONG, false).await?;
        Ok(())
    }
}

struct Echo;

/// Text to echo back; `None` when there is nothing to say.
pub fn echo_text(args: &[String]) -> Option<String> {
    let text = args.join(" ");
    (!text.is_empty()).then_some(text)
}

#[async_trait]
impl MessageCommandHandler for Echo {
    async fn execute(&self, bot: &BotContext, message: &IncomingMessage, args: &[String]) -> anyhow::Result<()> {
        let text = echo_text(args).ok_or_else(|| anyhow::anyhow!("nothing to echo"))?;
        bot.platform.reply(message, &text).await?;
        Ok(())
    }
}

#[async_trait]
impl InteractionCommandHandler for Echo {
    async fn execute(&self, bot: &BotContext, interaction: &Interaction) -> anyhow::Result<()> {
        let text = interaction
            .option("input")
            .map(|o| o.text())
            .ok_or_else(|| anyhow::anyhow!("nothing to echo"))?;
        bot.platform.reply_interaction(interaction, &text, false).await?;
        Ok(())
    }
}

struct LogEvent;

#[async_trait]
impl ListenerHandler for LogEvent {
    async fn execute(&self, _bot: &BotContext, event: &ClientEvent) -> anyhow::Result<()> {
        info!(event = %event.name(), "client event");
        Ok(())
    }
}

pub fn catalog() -> HandlerCatalog {
    HandlerCatalog::new()
        .message_command("ping", Arc::new(Ping))
        .interaction_command("ping", Arc::new(Ping))
        .message_command("echo", Arc::new(Echo))
        .interaction_command("echo", Arc::new(Echo))
        .listener("log", Arc::new(LogEvent))
}
