//! Definition records and the factories that validate raw options into them.

mod app_command;
mod autocompleter;
mod command;
mod factory;
mod listener;
mod options;

pub use app_command::ApplicationCommandData;
pub use autocompleter::{autocompleter, Autocompleter};
pub use command::{
    AppCommandSettings, Command, CommandContext, CommandKind, CommandScope, CommandType, IntegrationType,
};
pub use factory::{build_command, context_command, message_command, slash_command};
pub use listener::{listener, Listener};
