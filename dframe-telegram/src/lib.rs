//! # dframe-telegram
//!
//! Telegram transport for the framework: converts teloxide updates into [`dframe_core::ClientEvent`]s,
//! implements [`dframe_core::Platform`] on top of the Bot API, and runs the polling REPL.
//! Group chats play the role of guilds; `/name` messages arrive as chat-input interactions.

mod adapters;
mod config;
mod platform;
mod runner;

pub use adapters::{command_interaction, TelegramMessage, TelegramUser};
pub use config::{TelegramConfig, DEFAULT_LOG_FILE};
pub use platform::{relative_phrase, MemberRights, TelegramPlatform};
pub use runner::{build_bot, run};
